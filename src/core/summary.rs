use super::de;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `/api/status` response
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct BackendStatus {
    #[serde(default, deserialize_with = "de::bool_or_false")]
    pub processed: bool,
    #[serde(default, deserialize_with = "de::count_or_zero")]
    pub settlement_files: u64,
    #[serde(default, deserialize_with = "de::count_or_zero")]
    pub recebimentos_files: u64,
    #[serde(default, deserialize_with = "de::optional_string")]
    pub version: Option<String>,
}

/// Count and amount pair used by several summary sections
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Totals {
    #[serde(default, deserialize_with = "de::count_or_zero")]
    pub count: u64,
    #[serde(default, deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub total_amount: Decimal,
}

/// Installment totals by status, as computed by the backend cash flow
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CashflowSummary {
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub total_expected: Decimal,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub total_received: Decimal,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub total_received_advance: Decimal,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub total_pending: Decimal,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub total_overdue: Decimal,
    #[serde(deserialize_with = "de::count_or_zero")]
    pub count_total: u64,
    #[serde(deserialize_with = "de::count_or_zero")]
    pub count_active: u64,
    #[serde(deserialize_with = "de::count_or_zero")]
    pub count_cancelled: u64,
    #[serde(deserialize_with = "de::count_or_zero")]
    pub count_received: u64,
    #[serde(deserialize_with = "de::count_or_zero")]
    pub count_received_advance: u64,
    #[serde(deserialize_with = "de::count_or_zero")]
    pub count_pending: u64,
    #[serde(deserialize_with = "de::count_or_zero")]
    pub count_overdue: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SettlementSummary {
    #[serde(deserialize_with = "de::count_or_zero")]
    pub total_orders: u64,
    #[serde(deserialize_with = "de::count_or_zero")]
    pub total_installments: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ReleasesSummary {
    /// Number of payment releases
    #[serde(deserialize_with = "de::count_or_zero")]
    pub total_payments: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ChargebackSummary {
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub net_chargeback: Decimal,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MovementsSummary {
    pub chargebacks: ChargebackSummary,
    pub advance_fees: Totals,
    pub payouts: Totals,
}

/// `/api/summary` response: everything the dashboard tab shows
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Summary {
    pub cashflow: CashflowSummary,
    pub settlement: SettlementSummary,
    pub releases: ReleasesSummary,
    pub movements: MovementsSummary,
    pub orphan_payments: Totals,
    pub advance_payments: Totals,
}

/// One of the four headline dashboard cards
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardCard {
    /// Element id prefix of the card on the page
    pub id: &'static str,
    pub title: &'static str,
    pub amount: Decimal,
    pub count: u64,
    /// Share of the expected total, one decimal place
    pub percent_of_expected: Option<Decimal>,
}

impl Summary {
    /// Received including installments received in advance
    pub fn total_received(&self) -> Decimal {
        self.cashflow.total_received + self.cashflow.total_received_advance
    }

    pub fn count_received(&self) -> u64 {
        self.cashflow.count_received + self.cashflow.count_received_advance
    }

    /// Active installments, falling back to the total when the backend does
    /// not report cancellations separately
    pub fn count_active(&self) -> u64 {
        if self.cashflow.count_active > 0 {
            self.cashflow.count_active
        } else {
            self.cashflow.count_total
        }
    }

    pub fn cards(&self) -> Vec<DashboardCard> {
        let expected = self.cashflow.total_expected;
        vec![
            DashboardCard {
                id: "total-expected",
                title: "Total Esperado",
                amount: expected,
                count: self.count_active(),
                percent_of_expected: None,
            },
            DashboardCard {
                id: "total-received",
                title: "Recebido",
                amount: self.total_received(),
                count: self.count_received(),
                percent_of_expected: percent_of(self.total_received(), expected),
            },
            DashboardCard {
                id: "total-pending",
                title: "Pendente",
                amount: self.cashflow.total_pending,
                count: self.cashflow.count_pending,
                percent_of_expected: percent_of(self.cashflow.total_pending, expected),
            },
            DashboardCard {
                id: "total-overdue",
                title: "Atrasado",
                amount: self.cashflow.total_overdue,
                count: self.cashflow.count_overdue,
                percent_of_expected: percent_of(self.cashflow.total_overdue, expected),
            },
        ]
    }
}

/// `value` as a percentage of `total`, rounded to one decimal place.
/// `None` when `total` is not positive.
pub fn percent_of(value: Decimal, total: Decimal) -> Option<Decimal> {
    if total <= Decimal::ZERO {
        return None;
    }
    Some((value / total * dec!(100)).round_dp(1))
}

/// `/api/process` response
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ProcessOutcome {
    pub settlement: SettlementSummary,
    pub releases: ReleasesSummary,
    pub movements: MovementsSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> Summary {
        serde_json::from_str(
            r#"{
                "success": true,
                "cashflow": {
                    "total_expected": 1000, "total_received": 400, "total_received_advance": 100,
                    "total_pending": 300, "total_overdue": 200,
                    "count_total": 12, "count_active": 10, "count_received": 4,
                    "count_received_advance": 1, "count_pending": 3, "count_overdue": 2
                },
                "settlement": {"total_orders": 5, "total_installments": 12},
                "releases": {"total_payments": 5},
                "movements": {"chargebacks": {"net_chargeback": -15.5}}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn received_includes_advance() {
        let s = summary();
        assert_eq!(s.total_received(), dec!(500));
        assert_eq!(s.count_received(), 5);
    }

    #[test]
    fn cards_show_share_of_expected() {
        let cards = summary().cards();
        assert_eq!(cards[0].count, 10);
        assert_eq!(cards[0].percent_of_expected, None);
        assert_eq!(cards[1].percent_of_expected, Some(dec!(50.0)));
        assert_eq!(cards[3].percent_of_expected, Some(dec!(20.0)));
    }

    #[test]
    fn empty_summary_has_no_percentages() {
        let cards = Summary::default().cards();
        assert!(cards.iter().all(|c| c.percent_of_expected.is_none()));
        assert!(cards.iter().all(|c| c.amount.is_zero()));
    }

    #[test]
    fn null_processed_flag_reads_as_unprocessed() {
        let status: BackendStatus =
            serde_json::from_str(r#"{"processed": null, "settlement_files": 2}"#).unwrap();
        assert!(!status.processed);
        assert_eq!(status.settlement_files, 2);
    }

    #[test]
    fn count_active_falls_back_to_total() {
        let mut s = Summary::default();
        s.cashflow.count_total = 7;
        assert_eq!(s.count_active(), 7);
    }
}
