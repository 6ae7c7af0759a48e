//! Installments command - overdue, pending, received or advance installments

use super::{connect, read_payload, FilterArgs, OutputArgs};
use crate::api::{ClientConfig, Endpoint};
use crate::core::installment::total_amount;
use crate::core::{brl, filter, FilterCriteria, Installment, InstallmentBucket};
use crate::render::table::InstallmentRow;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InstallmentsCommand {
    /// Which installments to list
    #[arg(value_enum)]
    bucket: InstallmentBucket,

    #[command(flatten)]
    filter: FilterArgs,

    /// Render a saved API response instead of querying the backend ("-" for stdin)
    #[arg(long)]
    from_file: Option<PathBuf>,

    #[command(flatten)]
    output: OutputArgs,
}

impl InstallmentsCommand {
    pub async fn exec(&self, config: &ClientConfig) -> anyhow::Result<()> {
        let installments: Vec<Installment> = match &self.from_file {
            Some(path) => read_payload(path, &Endpoint::Installments(self.bucket))?,
            None => connect(config)?.installments(self.bucket).await?,
        };

        let criteria = FilterCriteria::parse(&self.filter.to_input());
        let shown = filter(&installments, &criteria);
        let title = if criteria.is_empty() {
            self.bucket.label().to_string()
        } else {
            format!("{} (filtradas)", self.bucket.label())
        };

        let rows: Vec<InstallmentRow> = shown.iter().map(InstallmentRow::from).collect();
        if self.output.emit(&rows, &shown, 2, "Nenhuma parcela encontrada")? {
            println!(
                "Parcelas {} ({}) - Total: {}",
                title,
                shown.len(),
                brl(total_amount(&shown))
            );
        }
        Ok(())
    }
}
