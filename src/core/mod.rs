pub mod cashflow;
mod de;
pub mod filter;
pub mod format;
pub mod installment;
pub mod reconciliation;
pub mod summary;
pub mod transaction;

// Flat public surface for domain types and functions.
pub use cashflow::{CashflowRow, Granularity};
pub use filter::{filter, filter_transactions, FilterCriteria, FilterInput, Filterable};
pub use format::{brl, format_currency, format_date};
pub use installment::{Installment, InstallmentBucket, InstallmentStatus};
pub use reconciliation::{DebugReference, Movement, ReconciliationReport, ReleaseKind, ReleaseLine};
pub use summary::{BackendStatus, DashboardCard, ProcessOutcome, Summary};
pub use transaction::{Transaction, TransactionGroup, TransactionGroups};
