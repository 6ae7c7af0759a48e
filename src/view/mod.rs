//! Controller-owned view state and the page it renders into.

pub mod controller;
pub mod notify;
pub mod page;
pub mod state;

pub use controller::Controller;
pub use notify::{Notice, NoticeKind, Notifier};
pub use page::Page;
pub use state::{Tab, ViewState};
