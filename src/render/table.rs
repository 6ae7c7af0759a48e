//! Terminal tables and CSV rows for the listing commands.

use crate::core::format::{observation, status_label};
use crate::core::reconciliation::{ReleaseLine, StatusBucket};
use crate::core::{
    brl, format_date, CashflowRow, DashboardCard, Installment, Movement, ReconciliationReport,
    Transaction,
};
use serde::Serialize;
use std::io;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct InstallmentRow {
    #[tabled(rename = "External Ref")]
    pub external_reference: String,
    #[tabled(rename = "Parcela")]
    pub installment: String,
    #[tabled(rename = "Valor")]
    pub amount: String,
    #[tabled(rename = "Data Prevista")]
    pub expected_date: String,
    #[tabled(rename = "Data Recebida")]
    pub received_date: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Observações")]
    pub notes: String,
}

impl From<&Installment> for InstallmentRow {
    fn from(inst: &Installment) -> Self {
        Self {
            external_reference: inst.external_reference.clone(),
            installment: inst.installment_label(),
            amount: brl(inst.display_amount()),
            expected_date: format_date(inst.money_release_date.as_deref()),
            received_date: format_date(inst.received_date.as_deref()),
            status: status_label(inst.status).to_string(),
            notes: observation(inst),
        }
    }
}

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct TransactionRow {
    #[tabled(rename = "Tipo")]
    pub kind: String,
    #[tabled(rename = "External Ref")]
    pub external_reference: String,
    #[tabled(rename = "Valor Bruto")]
    pub amount: String,
    #[tabled(rename = "Valor Líquido")]
    pub net_amount: String,
    #[tabled(rename = "Método")]
    pub payment_method: String,
    #[tabled(rename = "Data")]
    pub date: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(t: &Transaction) -> Self {
        Self {
            kind: t.kind.clone(),
            external_reference: t.external_reference.clone(),
            amount: brl(t.amount),
            net_amount: brl(t.net_amount),
            payment_method: t.payment_method.clone(),
            date: format_date(t.date.as_deref()),
        }
    }
}

/// One line of `transactions --summary`
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct TransactionGroupRow {
    #[tabled(rename = "Tipo")]
    pub kind: String,
    #[tabled(rename = "Quantidade")]
    pub count: u64,
    #[tabled(rename = "Total")]
    pub total_amount: String,
}

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct CashflowTableRow {
    #[tabled(rename = "Período")]
    pub period: String,
    #[tabled(rename = "A Receber")]
    pub to_receive: String,
    #[tabled(rename = "Pendente")]
    pub pending: String,
    #[tabled(rename = "Atrasado")]
    pub overdue: String,
    #[tabled(rename = "Parcelas")]
    pub count: u64,
}

impl CashflowTableRow {
    pub fn monthly(row: &CashflowRow) -> Self {
        Self::with_period(row, row.period.clone())
    }

    pub fn daily(row: &CashflowRow) -> Self {
        Self::with_period(row, format_date(Some(&row.period)))
    }

    fn with_period(row: &CashflowRow, period: String) -> Self {
        Self {
            period,
            to_receive: brl(row.to_receive()),
            pending: brl(row.pending),
            overdue: brl(row.overdue),
            count: row.count_to_receive(),
        }
    }
}

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct CardRow {
    #[tabled(rename = "")]
    pub title: String,
    #[tabled(rename = "Valor")]
    pub amount: String,
    #[tabled(rename = "Parcelas")]
    pub count: u64,
    #[tabled(rename = "% do Esperado")]
    pub percent: String,
}

impl From<&DashboardCard> for CardRow {
    fn from(card: &DashboardCard) -> Self {
        Self {
            title: card.title.to_string(),
            amount: brl(card.amount),
            count: card.count,
            percent: card
                .percent_of_expected
                .map(|p| format!("{}%", p))
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct StatusRow {
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Quantidade")]
    pub count: u64,
    #[tabled(rename = "Valor Total")]
    pub amount: String,
    #[tabled(rename = "Percentual")]
    pub percentage: String,
}

impl StatusRow {
    fn new(status: &str, bucket: &StatusBucket) -> Self {
        Self {
            status: status.to_string(),
            count: bucket.count,
            amount: brl(bucket.amount),
            percentage: format!("{}%", bucket.percentage),
        }
    }
}

/// Status breakdown of a reconciliation report
pub fn status_rows(report: &ReconciliationReport) -> Vec<StatusRow> {
    let breakdown = &report.detailed_status.status_breakdown;
    vec![
        StatusRow::new("Recebido", &breakdown.received),
        StatusRow::new("Antecipado", &breakdown.received_advance),
        StatusRow::new("Pendente", &breakdown.pending),
        StatusRow::new("Atrasado", &breakdown.overdue),
        StatusRow::new("Cancelado", &breakdown.cancelled),
    ]
}

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ReleaseRow {
    #[tabled(rename = "Data")]
    pub date: String,
    #[tabled(rename = "Descrição")]
    pub description: String,
    #[tabled(rename = "Tipo")]
    pub record_type: String,
    #[tabled(rename = "Líquido")]
    pub net: String,
    #[tabled(rename = "Source ID")]
    pub source_id: String,
}

impl From<&ReleaseLine> for ReleaseRow {
    fn from(line: &ReleaseLine) -> Self {
        Self {
            date: format_date(line.settlement_date.as_deref()),
            description: line.description.clone().unwrap_or_else(|| "-".to_string()),
            record_type: line.record_type.clone().unwrap_or_else(|| "-".to_string()),
            net: brl(line.net()),
            source_id: line.source_id.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct MovementRow {
    #[tabled(rename = "Data")]
    pub date: String,
    #[tabled(rename = "Source ID")]
    pub source_id: String,
    #[tabled(rename = "Valor")]
    pub amount: String,
    #[tabled(rename = "Valor Bruto")]
    pub gross_amount: String,
    #[tabled(rename = "Taxa MP")]
    pub fee: String,
}

impl From<&Movement> for MovementRow {
    fn from(m: &Movement) -> Self {
        Self {
            date: format_date(m.date.as_deref()),
            source_id: m.source_id.clone().unwrap_or_else(|| "-".to_string()),
            amount: brl(m.amount),
            gross_amount: brl(m.gross_amount),
            fee: m.mp_fee.map(brl).unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Print `rows` as a rounded table, amounts right aligned from `right_from`
/// onwards. Prints `empty` instead when there are no rows.
pub fn print_table<T: Tabled>(rows: &[T], right_from: usize, empty: &str) {
    if rows.is_empty() {
        println!("{}", empty);
        return;
    }
    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(right_from..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

pub fn write_csv<T: Serialize, W: io::Write>(rows: &[T], writer: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::InstallmentStatus;
    use rust_decimal_macros::dec;

    #[test]
    fn installment_row_formats_for_display() {
        let inst = Installment {
            external_reference: "PED-7".to_string(),
            installment_number: 2,
            total_installments: 3,
            installment_net_amount: dec!(1234.5),
            money_release_date: Some("2024-03-05".to_string()),
            status: InstallmentStatus::Overdue,
            ..Default::default()
        };
        let row = InstallmentRow::from(&inst);
        assert_eq!(row.installment, "2/3");
        assert_eq!(row.amount, "R$ 1.234,50");
        assert_eq!(row.expected_date, "05/03/2024");
        assert_eq!(row.received_date, "-");
        assert_eq!(row.status, "Atrasado");
    }

    #[test]
    fn csv_has_header_and_rows() {
        let rows = vec![TransactionRow::from(&Transaction {
            external_reference: "T1".to_string(),
            amount: dec!(10),
            net_amount: dec!(9.5),
            payment_method: "pix".to_string(),
            date: Some("2024-01-02".to_string()),
            kind: "payment".to_string(),
        })];
        let mut out = Vec::new();
        write_csv(&rows, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("kind,external_reference,amount,net_amount,payment_method,date")
        );
        assert_eq!(
            lines.next(),
            Some(r#"payment,T1,"R$ 10,00","R$ 9,50",pix,02/01/2024"#)
        );
    }

    #[test]
    fn daily_rows_format_the_date() {
        let row = CashflowRow {
            period: "2024-03-05".to_string(),
            pending: dec!(10),
            count_pending: 1,
            ..Default::default()
        };
        let daily = CashflowTableRow::daily(&row);
        assert_eq!(daily.period, "05/03/2024");
        assert_eq!(daily.to_receive, "R$ 10,00");
        assert_eq!(daily.count, 1);
        assert_eq!(CashflowTableRow::monthly(&row).period, "2024-03-05");
    }
}
