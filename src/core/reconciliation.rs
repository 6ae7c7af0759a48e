use super::de;
use super::installment::Installment;
use super::summary::Totals;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Differences at or below one cent are rounding noise
pub const DIVERGENCE_TOLERANCE: Decimal = dec!(0.01);

/// Count, amount and share of installments in one status
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StatusBucket {
    #[serde(deserialize_with = "de::count_or_zero")]
    pub count: u64,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub amount: Decimal,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub percentage: Decimal,
    #[serde(deserialize_with = "de::optional_decimal")]
    #[schemars(with = "Option<f64>")]
    pub avg_days_advance: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StatusBreakdown {
    pub received: StatusBucket,
    pub received_advance: StatusBucket,
    pub pending: StatusBucket,
    pub overdue: StatusBucket,
    pub cancelled: StatusBucket,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ReconciliationSummary {
    #[serde(deserialize_with = "de::count_or_zero")]
    pub total_installments: u64,
    #[serde(deserialize_with = "de::count_or_zero")]
    pub active_installments: u64,
    #[serde(deserialize_with = "de::count_or_zero")]
    pub cancelled_installments: u64,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub total_expected: Decimal,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub total_received: Decimal,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub total_pending: Decimal,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub total_refund_applied: Decimal,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub total_chargeback_applied: Decimal,
}

impl ReconciliationSummary {
    pub fn total_adjustments(&self) -> Decimal {
        self.total_refund_applied + self.total_chargeback_applied
    }

    pub fn has_adjustments(&self) -> bool {
        self.total_refund_applied > Decimal::ZERO || self.total_chargeback_applied > Decimal::ZERO
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DetailedStatus {
    pub summary: ReconciliationSummary,
    pub status_breakdown: StatusBreakdown,
}

/// Received installments checked against the payments in the releases file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct InstallmentsVsPayments {
    /// Absent means the backend did not validate, which is shown as divergent
    #[serde(deserialize_with = "de::bool_or_false")]
    pub is_valid: bool,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub difference: Decimal,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub installments_received: Decimal,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub payments_all: Decimal,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub payments_orphan: Decimal,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub payments_filtered: Decimal,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Validation {
    pub installments_vs_payments: InstallmentsVsPayments,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AdjustmentsAnalysis {
    #[serde(deserialize_with = "de::count_or_zero")]
    pub orders_with_adjustments: u64,
}

/// `/api/reconciliation` report
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ReconciliationReport {
    pub detailed_status: DetailedStatus,
    pub validation: Validation,
    /// Releases with no matching settlement installment
    pub orphan_payments: Totals,
    pub advance_payments: Totals,
    pub adjustments_analysis: AdjustmentsAnalysis,
}

impl ReconciliationReport {
    pub fn is_divergent(&self) -> bool {
        !self.validation.installments_vs_payments.is_valid
    }

    pub fn difference(&self) -> Decimal {
        self.validation.installments_vs_payments.difference.abs()
    }
}

/// Kind of a line in the releases file, derived from its description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseKind {
    Payment,
    Refund,
    Chargeback,
    Other,
}

/// One line of the releases file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ReleaseLine {
    #[serde(deserialize_with = "de::optional_string")]
    pub settlement_date: Option<String>,
    #[serde(deserialize_with = "de::optional_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "de::optional_string")]
    pub record_type: Option<String>,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub gross_amount: Decimal,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub net_credit_amount: Decimal,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub net_debit_amount: Decimal,
    #[serde(deserialize_with = "de::optional_string")]
    pub source_id: Option<String>,
}

impl ReleaseLine {
    pub fn net(&self) -> Decimal {
        self.net_credit_amount - self.net_debit_amount
    }

    pub fn kind(&self) -> ReleaseKind {
        match self.description.as_deref() {
            Some("payment") => ReleaseKind::Payment,
            Some("refund") => ReleaseKind::Refund,
            Some(d) if d.contains("chargeback") => ReleaseKind::Chargeback,
            _ => ReleaseKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OrderBalance {
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub total_net: Decimal,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub refunded: Decimal,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub chargeback: Decimal,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DebugSettlement {
    #[serde(deserialize_with = "de::count_or_zero")]
    pub installments_count: u64,
    pub installments: Vec<Installment>,
    pub order_balance: Option<OrderBalance>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DebugReleases {
    #[serde(deserialize_with = "de::count_or_zero")]
    pub all_releases_count: u64,
    #[serde(deserialize_with = "de::count_or_zero")]
    pub payments_count: u64,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub total_payments: Decimal,
    #[serde(deserialize_with = "de::bool_or_false")]
    pub has_refund: bool,
    #[serde(deserialize_with = "de::bool_or_false")]
    pub has_chargeback: bool,
    pub all_releases: Vec<ReleaseLine>,
    pub payments: Vec<ReleaseLine>,
}

/// `/api/debug/reference/{ref}`: settlement and releases side by side for one order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DebugReference {
    #[serde(deserialize_with = "de::string_or_number")]
    pub external_reference: String,
    pub settlement: DebugSettlement,
    pub releases: DebugReleases,
}

impl DebugReference {
    /// Expected net total over all settlement installments
    pub fn settlement_total(&self) -> Decimal {
        self.settlement
            .installments
            .iter()
            .map(|i| i.installment_net_amount)
            .sum()
    }

    /// Amount the settlement side considers received
    pub fn settlement_received(&self) -> Decimal {
        self.settlement
            .installments
            .iter()
            .filter(|i| i.status.is_received())
            .map(|i| i.received_amount.unwrap_or(Decimal::ZERO))
            .sum()
    }

    pub fn difference(&self) -> Decimal {
        (self.settlement_received() - self.releases.total_payments).abs()
    }

    pub fn has_divergence(&self) -> bool {
        self.difference() > DIVERGENCE_TOLERANCE
    }

    /// Releases exist but none of them is a sale
    pub fn has_no_valid_payment(&self) -> bool {
        self.releases.payments.is_empty() && self.releases.all_releases_count > 0
    }
}

/// A payout or advance fee debited from the account
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Movement {
    #[serde(deserialize_with = "de::optional_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "de::optional_string")]
    pub source_id: Option<String>,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub amount: Decimal,
    #[serde(deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub gross_amount: Decimal,
    /// Mercado Pago fee, advance fees only
    #[serde(deserialize_with = "de::optional_decimal")]
    #[schemars(with = "Option<f64>")]
    pub mp_fee: Option<Decimal>,
}
