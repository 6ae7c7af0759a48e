//! Client for a Mercado Pago settlement reconciliation backend.
//!
//! Fetches installments, transactions, cash flow and reconciliation reports,
//! filters them locally and renders terminal tables or an HTML dashboard.

pub mod api;
pub mod cmd;
pub mod core;
pub mod render;
pub mod view;
