//! Reconciliation command - received installments checked against releases

use super::connect;
use crate::api::ClientConfig;
use crate::core::{brl, ReconciliationReport};
use crate::render::table::{self, status_rows};
use clap::Args;

#[derive(Args, Debug)]
pub struct ReconciliationCommand {
    /// Fetch the full report
    #[arg(long)]
    full: bool,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl ReconciliationCommand {
    pub async fn exec(&self, config: &ClientConfig) -> anyhow::Result<()> {
        let report = connect(config)?.reconciliation(self.full).await?;
        if self.json {
            return table::print_json(&report);
        }
        print_report(&report);
        Ok(())
    }
}

fn print_report(report: &ReconciliationReport) {
    let summary = &report.detailed_status.summary;
    let check = &report.validation.installments_vs_payments;

    if report.is_divergent() {
        println!("DIVERGÊNCIA ENCONTRADA - diferença {}", brl(report.difference()));
    } else {
        println!("CONCILIADO");
    }
    println!();
    println!(
        "Parcelas: {} total, {} ativas, {} canceladas",
        summary.total_installments, summary.active_installments, summary.cancelled_installments
    );
    println!(
        "Esperado: {}  Recebido: {}  Pendente: {}",
        brl(summary.total_expected),
        brl(summary.total_received),
        brl(summary.total_pending)
    );
    println!();
    table::print_table(&status_rows(report), 1, "");

    println!();
    println!("Validação: Parcelas Recebidas vs Payments");
    println!("  Parcelas Recebidas (Settlement)  {}", brl(check.installments_received));
    println!("  Payments Totais (Releases)       {}", brl(check.payments_all));
    println!("  (-) Payments Órfãos              ({})", brl(check.payments_orphan));
    println!("  Payments Filtrados               {}", brl(check.payments_filtered));
    println!("  Diferença                        {}", brl(report.difference()));

    if summary.has_adjustments() {
        println!();
        println!("Ajustes Aplicados");
        println!("  Estornos     {}", brl(summary.total_refund_applied));
        println!("  Chargebacks  {}", brl(summary.total_chargeback_applied));
        println!("  Total        {}", brl(summary.total_adjustments()));
        println!(
            "  Pedidos com ajustes: {}",
            report.adjustments_analysis.orders_with_adjustments
        );
    }
    if report.orphan_payments.count > 0 {
        println!();
        println!(
            "Payments Órfãos (sem match): {} - {}",
            report.orphan_payments.count,
            brl(report.orphan_payments.total_amount)
        );
    }
    if report.advance_payments.count > 0 {
        println!();
        print!("Pedidos com antecipação: {}", report.advance_payments.count);
        match report
            .detailed_status
            .status_breakdown
            .received_advance
            .avg_days_advance
        {
            Some(days) => println!(" (média de {} dias)", days),
            None => println!(),
        }
    }
}
