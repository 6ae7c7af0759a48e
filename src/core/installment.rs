use super::de;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reconciliation status of a settlement installment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    Received,
    /// Received before the expected release date
    ReceivedAdvance,
    #[default]
    Pending,
    Overdue,
    Cancelled,
    /// Any status string this client does not know about
    #[serde(other)]
    Unknown,
}

impl InstallmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::ReceivedAdvance => "received_advance",
            Self::Pending => "pending",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_received(self) -> bool {
        matches!(self, Self::Received | Self::ReceivedAdvance)
    }
}

impl fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which installment listing to request from the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum InstallmentBucket {
    Overdue,
    Pending,
    Received,
    /// Received ahead of schedule
    Advance,
}

impl InstallmentBucket {
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::Pending => "pending",
            Self::Received => "received",
            Self::Advance => "advance",
        }
    }

    /// Plural label used in table headings
    pub fn label(self) -> &'static str {
        match self {
            Self::Overdue => "atrasadas",
            Self::Pending => "pendentes",
            Self::Received => "recebidas",
            Self::Advance => "antecipadas",
        }
    }
}

/// One scheduled portion of a multi-part payment.
///
/// Field names follow the backend's settlement processor output; amounts are
/// net of Mercado Pago fees.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Installment {
    /// Order identifier shared by all installments of a sale
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub external_reference: String,
    #[serde(default, deserialize_with = "de::count_or_zero")]
    pub installment_number: u64,
    #[serde(default, deserialize_with = "de::count_or_zero")]
    pub total_installments: u64,
    /// Expected net amount of this installment
    #[serde(default, deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub installment_net_amount: Decimal,
    #[serde(default, deserialize_with = "de::optional_decimal")]
    #[schemars(with = "Option<f64>")]
    pub received_amount: Option<Decimal>,
    /// Expected release date (`YYYY-MM-DD`)
    #[serde(default, deserialize_with = "de::optional_string")]
    pub money_release_date: Option<String>,
    #[serde(default, deserialize_with = "de::optional_string")]
    pub received_date: Option<String>,
    #[serde(default, deserialize_with = "de::or_default")]
    pub status: InstallmentStatus,
    #[serde(default, deserialize_with = "de::optional_decimal")]
    #[schemars(with = "Option<f64>")]
    pub refund_applied: Option<Decimal>,
    #[serde(default, deserialize_with = "de::optional_decimal")]
    #[schemars(with = "Option<f64>")]
    pub chargeback_applied: Option<Decimal>,
    /// `full_refund`, `chargeback` or `partial_refund_full_cancellation`
    #[serde(default, deserialize_with = "de::optional_string")]
    pub cancelled_reason: Option<String>,
    /// Days between receipt and the expected date for advance receipts
    #[serde(default, deserialize_with = "de::count_or_zero")]
    pub days_advance: u64,
    #[serde(default, deserialize_with = "de::bool_or_false")]
    pub has_adjustment: bool,
    #[serde(default, deserialize_with = "de::bool_or_false")]
    pub is_cancelled: bool,
    /// Preformatted "n/m" label, when the backend provides one
    #[serde(default, deserialize_with = "de::optional_string")]
    pub installment_display: Option<String>,
}

impl Installment {
    /// Amount shown for the installment: what was received, or what is expected
    /// when nothing (or zero) has been received yet.
    pub fn display_amount(&self) -> Decimal {
        match self.received_amount {
            Some(received) if !received.is_zero() => received,
            _ => self.installment_net_amount,
        }
    }

    pub fn installment_label(&self) -> String {
        self.installment_display.clone().unwrap_or_else(|| {
            format!("{}/{}", self.installment_number, self.total_installments)
        })
    }

    pub fn is_cancelled(&self) -> bool {
        self.is_cancelled || self.status == InstallmentStatus::Cancelled
    }

    /// Date used by date-range filters: the received date when known,
    /// otherwise the expected release date.
    pub fn filter_date(&self) -> Option<&str> {
        self.received_date
            .as_deref()
            .or(self.money_release_date.as_deref())
    }
}

/// Sum of the display amounts of `installments`
pub fn total_amount(installments: &[Installment]) -> Decimal {
    installments.iter().map(Installment::display_amount).sum()
}
