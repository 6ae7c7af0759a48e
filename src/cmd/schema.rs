//! Schema command - print the JSON schema of backend payloads

use crate::core::{
    BackendStatus, CashflowRow, DebugReference, Installment, Movement, ReconciliationReport,
    Summary, TransactionGroups,
};
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Payload to describe
    #[arg(value_enum)]
    payload: Payload,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum Payload {
    /// `/api/status`
    Status,
    /// `/api/summary`
    Summary,
    /// `/api/cashflow/monthly` and `/api/cashflow/daily`
    Cashflow,
    /// `/api/installments/*`
    Installments,
    /// `/api/transactions`
    Transactions,
    /// `/api/reconciliation`
    Reconciliation,
    /// `/api/debug/reference/{ref}`
    Debug,
    /// `/api/payouts` and `/api/advance-fees`
    Movements,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let schema = match self.payload {
            Payload::Status => schema_for!(BackendStatus),
            Payload::Summary => schema_for!(Summary),
            Payload::Cashflow => schema_for!(Vec<CashflowRow>),
            Payload::Installments => schema_for!(Vec<Installment>),
            Payload::Transactions => schema_for!(TransactionGroups),
            Payload::Reconciliation => schema_for!(ReconciliationReport),
            Payload::Debug => schema_for!(DebugReference),
            Payload::Movements => schema_for!(Vec<Movement>),
        };
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }
}
