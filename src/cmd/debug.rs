//! Debug command - settlement and releases side by side for one order

use super::connect;
use crate::api::ClientConfig;
use crate::core::{brl, DebugReference};
use crate::render::table::{self, InstallmentRow, ReleaseRow};
use clap::Args;

#[derive(Args, Debug)]
pub struct DebugCommand {
    /// External reference of the order
    reference: String,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl DebugCommand {
    pub async fn exec(&self, config: &ClientConfig) -> anyhow::Result<()> {
        let result = connect(config)?.debug_reference(&self.reference).await?;
        if self.json {
            return table::print_json(&result);
        }
        print_result(&result);
        Ok(())
    }
}

fn print_result(result: &DebugReference) {
    let releases = &result.releases;

    println!("Análise: {}", result.external_reference);
    if result.has_divergence() {
        println!("Status: DIVERGÊNCIA (diferença {})", brl(result.difference()));
    } else {
        println!("Status: CONCILIADO");
    }
    println!();
    println!("Settlement (Esperado)");
    println!("  Parcelas:       {}", result.settlement.installments_count);
    println!("  Total Líquido:  {}", brl(result.settlement_total()));
    println!("  Recebido:       {}", brl(result.settlement_received()));
    if let Some(balance) = &result.settlement.order_balance {
        println!(
            "  Order Balance:  net {} | refunded {} | chargeback {}",
            brl(balance.total_net),
            brl(balance.refunded),
            brl(balance.chargeback)
        );
    }
    println!();
    println!("Releases");
    println!("  Linhas:            {}", releases.all_releases_count);
    println!("  Payments válidos:  {}", releases.payments_count);
    println!("  Total Payments:    {}", brl(releases.total_payments));
    if releases.has_refund {
        println!("  Contém REFUND");
    }
    if releases.has_chargeback {
        println!("  Contém CHARGEBACK");
    }

    let installments: Vec<InstallmentRow> = result
        .settlement
        .installments
        .iter()
        .map(InstallmentRow::from)
        .collect();
    if !installments.is_empty() {
        println!();
        table::print_table(&installments, 2, "");
    }
    let lines: Vec<ReleaseRow> = releases.all_releases.iter().map(ReleaseRow::from).collect();
    if !lines.is_empty() {
        println!();
        table::print_table(&lines, 3, "");
    }
    if result.has_no_valid_payment() {
        println!();
        println!(
            "Problema: o releases tem {} linha(s), mas nenhuma é um payment válido.",
            releases.all_releases_count
        );
    }
}
