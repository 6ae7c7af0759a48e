//! Cashflow command - monthly or daily amounts still to be received

use super::{connect, OutputArgs};
use crate::api::ClientConfig;
use crate::core::cashflow::{days_with_receipts, total_to_receive};
use crate::core::{brl, CashflowRow, Granularity};
use crate::render::table::CashflowTableRow;
use chrono::NaiveDate;
use clap::Args;

#[derive(Args, Debug)]
pub struct CashflowCommand {
    /// Show daily instead of monthly cash flow
    #[arg(long)]
    daily: bool,

    /// First day of the daily cash flow (YYYY-MM-DD)
    #[arg(long, requires = "daily")]
    start_date: Option<NaiveDate>,

    /// Include days with nothing left to receive
    #[arg(long, requires = "daily")]
    all_days: bool,

    #[command(flatten)]
    output: OutputArgs,
}

impl CashflowCommand {
    pub async fn exec(&self, config: &ClientConfig) -> anyhow::Result<()> {
        let granularity = if self.daily {
            Granularity::Daily
        } else {
            Granularity::Monthly
        };
        let rows = connect(config)?
            .cashflow(granularity, self.start_date)
            .await?;

        let shown: Vec<CashflowRow> = match granularity {
            Granularity::Daily if !self.all_days => {
                days_with_receipts(&rows).into_iter().cloned().collect()
            }
            _ => rows,
        };
        let table_rows: Vec<CashflowTableRow> = shown
            .iter()
            .map(|row| match granularity {
                Granularity::Monthly => CashflowTableRow::monthly(row),
                Granularity::Daily => CashflowTableRow::daily(row),
            })
            .collect();

        if self.output.emit(&table_rows, &shown, 1, "Nenhum valor a receber")? {
            println!("Total a receber: {}", brl(total_to_receive(&shown)));
        }
        Ok(())
    }
}
