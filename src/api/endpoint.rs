use crate::core::InstallmentBucket;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Backend endpoints consumed by this client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Status,
    Process,
    Reset,
    Summary,
    CashflowMonthly,
    CashflowDaily { start_date: Option<NaiveDate> },
    Installments(InstallmentBucket),
    Transactions,
    TransactionsSummary,
    Reconciliation,
    ReconciliationFull,
    DebugReference(String),
    Payouts,
    AdvanceFees,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Process => Method::Post,
            _ => Method::Get,
        }
    }

    /// Path segments after `/api`, unencoded
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Endpoint::Status => vec!["status"],
            Endpoint::Process => vec!["process"],
            Endpoint::Reset => vec!["reset"],
            Endpoint::Summary => vec!["summary"],
            Endpoint::CashflowMonthly => vec!["cashflow", "monthly"],
            Endpoint::CashflowDaily { .. } => vec!["cashflow", "daily"],
            Endpoint::Installments(bucket) => vec!["installments", bucket.path_segment()],
            Endpoint::Transactions => vec!["transactions"],
            Endpoint::TransactionsSummary => vec!["transactions", "summary"],
            Endpoint::Reconciliation => vec!["reconciliation"],
            Endpoint::ReconciliationFull => vec!["reconciliation", "full"],
            Endpoint::DebugReference(reference) => vec!["debug", "reference", reference.as_str()],
            Endpoint::Payouts => vec!["payouts"],
            Endpoint::AdvanceFees => vec!["advance-fees"],
        }
    }

    pub fn query(&self) -> Option<(&'static str, String)> {
        match self {
            Endpoint::CashflowDaily {
                start_date: Some(date),
            } => Some(("start_date", date.format("%Y-%m-%d").to_string())),
            _ => None,
        }
    }

    /// Keys that may hold the payload, in order of preference. Empty when the
    /// payload is the response object itself.
    pub fn payload_keys(&self) -> &'static [&'static str] {
        match self {
            Endpoint::CashflowMonthly | Endpoint::CashflowDaily { .. } => &["cashflow", "data"],
            Endpoint::Installments(_) => &["installments", "data"],
            Endpoint::Transactions | Endpoint::TransactionsSummary => &["transactions", "data"],
            Endpoint::Reconciliation | Endpoint::ReconciliationFull => &["report", "data"],
            Endpoint::Payouts => &["data", "payouts"],
            Endpoint::AdvanceFees => &["data", "fees"],
            Endpoint::Status
            | Endpoint::Process
            | Endpoint::Reset
            | Endpoint::Summary
            | Endpoint::DebugReference(_) => &[],
        }
    }

    /// Whether the response must carry `"success": true`. The status
    /// endpoint only reports `processed`.
    pub fn requires_success_flag(&self) -> bool {
        !matches!(self, Endpoint::Status)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/api/{}", self.segments().join("/"))?;
        if let Some((key, value)) = self.query() {
            write!(f, "?{}={}", key, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_match_backend_routes() {
        assert_eq!(Endpoint::Status.to_string(), "/api/status");
        assert_eq!(
            Endpoint::Installments(InstallmentBucket::Overdue).to_string(),
            "/api/installments/overdue"
        );
        assert_eq!(
            Endpoint::CashflowDaily {
                start_date: NaiveDate::from_ymd_opt(2024, 3, 1)
            }
            .to_string(),
            "/api/cashflow/daily?start_date=2024-03-01"
        );
        assert_eq!(Endpoint::AdvanceFees.to_string(), "/api/advance-fees");
        assert_eq!(Endpoint::Process.method(), Method::Post);
    }
}
