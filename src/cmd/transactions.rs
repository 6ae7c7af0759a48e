//! Transactions command - settled sales grouped by type

use super::{connect, read_payload, FilterArgs, OutputArgs};
use crate::api::{ClientConfig, Endpoint};
use crate::core::transaction::flatten;
use crate::core::{brl, filter_transactions, FilterCriteria, TransactionGroups};
use crate::render::table::{TransactionGroupRow, TransactionRow};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct TransactionsCommand {
    /// Show per-type totals only. The summary endpoint omits the items, so
    /// it cannot be combined with filters.
    #[arg(long, conflicts_with_all = ["kind", "method", "start", "end", "min", "max"])]
    summary: bool,

    #[command(flatten)]
    filter: FilterArgs,

    /// Render a saved API response instead of querying the backend ("-" for stdin)
    #[arg(long)]
    from_file: Option<PathBuf>,

    #[command(flatten)]
    output: OutputArgs,
}

impl TransactionsCommand {
    pub async fn exec(&self, config: &ClientConfig) -> anyhow::Result<()> {
        let endpoint = if self.summary {
            Endpoint::TransactionsSummary
        } else {
            Endpoint::Transactions
        };
        let groups: TransactionGroups = match &self.from_file {
            Some(path) => read_payload(path, &endpoint)?,
            None => {
                let api = connect(config)?;
                if self.summary {
                    api.transactions_summary().await?
                } else {
                    api.transactions().await?
                }
            }
        };

        let criteria = FilterCriteria::parse(&self.filter.to_input());
        let groups = if criteria.is_empty() {
            groups
        } else {
            let all = flatten(&groups);
            if all.is_empty() && groups.values().any(|g| g.count > 0) {
                log::warn!("Groups carry totals but no transaction items, nothing to filter");
            }
            filter_transactions(&all, &criteria)
        };

        if self.summary {
            self.print_summary(&groups)
        } else {
            self.print_transactions(&groups)
        }
    }

    fn print_summary(&self, groups: &TransactionGroups) -> anyhow::Result<()> {
        let rows: Vec<TransactionGroupRow> = groups
            .iter()
            .map(|(kind, group)| TransactionGroupRow {
                kind: kind.clone(),
                count: group.count,
                total_amount: brl(group.total_amount),
            })
            .collect();
        self.output
            .emit(&rows, groups, 1, "Nenhuma transação encontrada")?;
        Ok(())
    }

    fn print_transactions(&self, groups: &TransactionGroups) -> anyhow::Result<()> {
        let all = flatten(groups);
        let rows: Vec<TransactionRow> = all.iter().map(TransactionRow::from).collect();
        if self
            .output
            .emit(&rows, groups, 2, "Nenhuma transação encontrada")?
        {
            for (kind, group) in groups {
                println!("{} ({}): {}", kind, group.count, brl(group.total_amount));
            }
        }
        Ok(())
    }
}
