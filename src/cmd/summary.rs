//! Summary command - dashboard cards and system information

use super::connect;
use crate::api::ClientConfig;
use crate::core::{brl, Summary};
use crate::render::table::{self, CardRow};
use clap::Args;

#[derive(Args, Debug)]
pub struct SummaryCommand {
    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl SummaryCommand {
    pub async fn exec(&self, config: &ClientConfig) -> anyhow::Result<()> {
        let summary = connect(config)?.summary().await?;
        if self.json {
            return table::print_json(&summary);
        }

        let rows: Vec<CardRow> = summary.cards().iter().map(CardRow::from).collect();
        table::print_table(&rows, 1, "Sem dados");
        print_system_info(&summary);
        Ok(())
    }
}

fn print_system_info(summary: &Summary) {
    let cashflow = &summary.cashflow;
    let movements = &summary.movements;

    println!();
    println!("Informações do Sistema");
    println!("======================");
    if cashflow.count_received_advance > 0 {
        println!("Parcelas Antecipadas:  {}", cashflow.count_received_advance);
    }
    if cashflow.count_cancelled > 0 {
        println!("Parcelas Canceladas:   {}", cashflow.count_cancelled);
    }
    if !movements.chargebacks.net_chargeback.is_zero() {
        println!(
            "Chargebacks Líquido:   {}",
            brl(movements.chargebacks.net_chargeback)
        );
    }
    if !movements.advance_fees.total_amount.is_zero() {
        println!(
            "Taxas de Antecipação:  {}",
            brl(movements.advance_fees.total_amount)
        );
    }
    if !movements.payouts.total_amount.is_zero() {
        println!(
            "Saques:                {} ({})",
            brl(movements.payouts.total_amount),
            movements.payouts.count
        );
    }
    println!("Total de Pedidos:      {}", summary.settlement.total_orders);
    println!("Total de Parcelas:     {}", summary.settlement.total_installments);
    println!("Parcelas Ativas:       {}", summary.count_active());
    println!("Payments Recebidos:    {}", summary.releases.total_payments);
    if summary.orphan_payments.count > 0 {
        println!(
            "Payments Órfãos:       {} ({})",
            summary.orphan_payments.count,
            brl(summary.orphan_payments.total_amount)
        );
    }
}
