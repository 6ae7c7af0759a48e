//! Presentation: HTML for the dashboard page, tables and CSV for the terminal.

pub mod html;
pub mod table;
