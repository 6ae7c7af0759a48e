use super::de;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Cash flow granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Granularity {
    #[default]
    Monthly,
    Daily,
}

/// One month or day of expected receipts.
///
/// Monthly rows carry `month` (`YYYY-MM`), daily rows carry `date`; both land
/// in `period`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct CashflowRow {
    #[serde(default, alias = "month", alias = "date")]
    pub period: String,
    #[serde(default, deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub expected: Decimal,
    #[serde(default, deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub received: Decimal,
    #[serde(default, deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub received_advance: Decimal,
    #[serde(default, deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub pending: Decimal,
    #[serde(default, deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub overdue: Decimal,
    /// Still to be received; older backends omit it
    #[serde(default, deserialize_with = "de::optional_decimal")]
    #[schemars(with = "Option<f64>")]
    pub to_receive: Option<Decimal>,
    #[serde(default, deserialize_with = "de::count_or_zero")]
    pub count_pending: u64,
    #[serde(default, deserialize_with = "de::count_or_zero")]
    pub count_overdue: u64,
    #[serde(default, deserialize_with = "de::optional_count")]
    pub count_to_receive: Option<u64>,
}

impl CashflowRow {
    pub fn to_receive(&self) -> Decimal {
        self.to_receive.unwrap_or(self.pending + self.overdue)
    }

    pub fn count_to_receive(&self) -> u64 {
        self.count_to_receive
            .unwrap_or(self.count_pending + self.count_overdue)
    }
}

/// Total still to be received across `rows`
pub fn total_to_receive(rows: &[CashflowRow]) -> Decimal {
    rows.iter().map(CashflowRow::to_receive).sum()
}

/// Daily rows that still have something to receive
pub fn days_with_receipts(rows: &[CashflowRow]) -> Vec<&CashflowRow> {
    rows.iter()
        .filter(|row| row.to_receive() > Decimal::ZERO)
        .collect()
}
