use crate::core::{FilterCriteria, Granularity, InstallmentBucket};
use std::collections::HashMap;

/// Dashboard tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Tab {
    #[default]
    Dashboard,
    Cashflow,
    Overdue,
    Pending,
    Received,
    Advance,
    Transactions,
    Reconciliation,
    Debug,
}

impl Tab {
    pub const ALL: [Tab; 9] = [
        Tab::Dashboard,
        Tab::Cashflow,
        Tab::Overdue,
        Tab::Pending,
        Tab::Received,
        Tab::Advance,
        Tab::Transactions,
        Tab::Reconciliation,
        Tab::Debug,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Tab::Dashboard => "dashboard",
            Tab::Cashflow => "cashflow",
            Tab::Overdue => "overdue",
            Tab::Pending => "pending",
            Tab::Received => "received",
            Tab::Advance => "advance",
            Tab::Transactions => "transactions",
            Tab::Reconciliation => "reconciliation",
            Tab::Debug => "debug",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Cashflow => "Fluxo de Caixa",
            Tab::Overdue => "Atrasadas",
            Tab::Pending => "Pendentes",
            Tab::Received => "Recebidas",
            Tab::Advance => "Antecipadas",
            Tab::Transactions => "Transações",
            Tab::Reconciliation => "Conciliação",
            Tab::Debug => "Debug",
        }
    }

    pub fn bucket(self) -> Option<InstallmentBucket> {
        match self {
            Tab::Overdue => Some(InstallmentBucket::Overdue),
            Tab::Pending => Some(InstallmentBucket::Pending),
            Tab::Received => Some(InstallmentBucket::Received),
            Tab::Advance => Some(InstallmentBucket::Advance),
            _ => None,
        }
    }
}

/// User-controlled view state, owned by the controller. Starts at defaults
/// and is never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub tab: Tab,
    pub cashflow_view: Granularity,
    /// Whether the backend reports processed data
    pub processed: bool,
    pub received_filter: FilterCriteria,
    pub transaction_filter: FilterCriteria,
}

/// A request stream whose responses render into one page region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Status,
    Summary,
    CashflowMonthly,
    CashflowDaily,
    Installments(InstallmentBucket),
    Transactions,
    Reconciliation,
    Debug,
}

/// Identifies one request; only the newest ticket of a view is current
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    view: View,
    generation: u64,
}

impl Ticket {
    pub fn view(&self) -> View {
        self.view
    }
}

/// Monotonic request generations per view, used to drop responses that
/// arrive after a newer request for the same view was issued.
///
/// The controller takes `&mut self` across each fetch, so today only
/// [`Generations::invalidate_all`] on reset makes a ticket stale. Tickets are
/// kept so a caller that overlaps requests for one view stays correct.
#[derive(Debug, Default)]
pub struct Generations {
    next: u64,
    current: HashMap<View, u64>,
}

impl Generations {
    pub fn begin(&mut self, view: View) -> Ticket {
        self.next += 1;
        self.current.insert(view, self.next);
        Ticket {
            view,
            generation: self.next,
        }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.current.get(&ticket.view) == Some(&ticket.generation)
    }

    /// Make every outstanding ticket stale
    pub fn invalidate_all(&mut self) {
        self.current.clear();
    }
}
