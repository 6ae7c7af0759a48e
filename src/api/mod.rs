//! HTTP access to the reconciliation backend.
//!
//! [`Backend`] is the transport seam: [`HttpBackend`] talks to the real
//! server, tests substitute canned responses. [`Api`] layers typed requests
//! and envelope unwrapping on top of any backend.

mod endpoint;
pub mod envelope;
mod http;

pub use endpoint::{Endpoint, Method};
pub use http::{ClientConfig, HttpBackend, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};

use crate::core::{
    BackendStatus, CashflowRow, DebugReference, Granularity, Installment, InstallmentBucket,
    Movement, ProcessOutcome, ReconciliationReport, Summary, TransactionGroups,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid client configuration: {0}")]
    Config(String),
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}: {message}")]
    Status {
        endpoint: String,
        status: u16,
        message: String,
    },
    #[error("{endpoint} reported a failure: {message}")]
    Backend { endpoint: String, message: String },
    #[error("unexpected payload from {endpoint}: {message}")]
    Payload { endpoint: String, message: String },
    #[error("external reference must not be empty")]
    EmptyReference,
}

/// Issues one request and returns the decoded JSON body
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn call(&self, endpoint: &Endpoint) -> Result<Value, ApiError>;
}

/// Payouts or advance fees listing
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovementList {
    pub items: Vec<Movement>,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementKind {
    Payouts,
    AdvanceFees,
}

impl MovementKind {
    fn endpoint(self) -> Endpoint {
        match self {
            MovementKind::Payouts => Endpoint::Payouts,
            MovementKind::AdvanceFees => Endpoint::AdvanceFees,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            MovementKind::Payouts => "Saques",
            MovementKind::AdvanceFees => "Taxas de Antecipação",
        }
    }
}

#[derive(Deserialize)]
struct TotalOnly {
    #[serde(default)]
    total_amount: Option<Decimal>,
}

/// Typed requests against a [`Backend`]
pub struct Api<B> {
    backend: B,
}

impl<B: Backend> Api<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, ApiError> {
        log::debug!("fetching {}", endpoint);
        let response = self.backend.call(&endpoint).await?;
        envelope::payload(&endpoint, response)
    }

    pub async fn status(&self) -> Result<BackendStatus, ApiError> {
        self.fetch(Endpoint::Status).await
    }

    /// Ask the backend to (re)process its settlement and release files
    pub async fn process(&self) -> Result<ProcessOutcome, ApiError> {
        self.fetch(Endpoint::Process).await
    }

    /// Drop the backend's processed data
    pub async fn reset(&self) -> Result<(), ApiError> {
        let response = self.backend.call(&Endpoint::Reset).await?;
        envelope::check_success(&Endpoint::Reset, &response)
    }

    pub async fn summary(&self) -> Result<Summary, ApiError> {
        self.fetch(Endpoint::Summary).await
    }

    pub async fn cashflow(
        &self,
        granularity: Granularity,
        start_date: Option<NaiveDate>,
    ) -> Result<Vec<CashflowRow>, ApiError> {
        let endpoint = match granularity {
            Granularity::Monthly => Endpoint::CashflowMonthly,
            Granularity::Daily => Endpoint::CashflowDaily { start_date },
        };
        self.fetch(endpoint).await
    }

    pub async fn installments(&self, bucket: InstallmentBucket) -> Result<Vec<Installment>, ApiError> {
        self.fetch(Endpoint::Installments(bucket)).await
    }

    pub async fn transactions(&self) -> Result<TransactionGroups, ApiError> {
        self.fetch(Endpoint::Transactions).await
    }

    pub async fn transactions_summary(&self) -> Result<TransactionGroups, ApiError> {
        self.fetch(Endpoint::TransactionsSummary).await
    }

    pub async fn reconciliation(&self, full: bool) -> Result<ReconciliationReport, ApiError> {
        let endpoint = if full {
            Endpoint::ReconciliationFull
        } else {
            Endpoint::Reconciliation
        };
        self.fetch(endpoint).await
    }

    pub async fn debug_reference(&self, reference: &str) -> Result<DebugReference, ApiError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(ApiError::EmptyReference);
        }
        self.fetch(Endpoint::DebugReference(reference.to_string()))
            .await
    }

    /// Payouts or advance fees. The total falls back to the sum of the items
    /// when the backend omits it.
    pub async fn movements(&self, kind: MovementKind) -> Result<MovementList, ApiError> {
        let endpoint = kind.endpoint();
        log::debug!("fetching {}", endpoint);
        let response = self.backend.call(&endpoint).await?;
        let total: Option<Decimal> = serde_json::from_value::<TotalOnly>(response.clone())
            .ok()
            .and_then(|t| t.total_amount);
        let items: Vec<Movement> = envelope::payload(&endpoint, response)?;
        let total_amount = total.unwrap_or_else(|| items.iter().map(|m| m.amount).sum());
        Ok(MovementList {
            items,
            total_amount,
        })
    }
}
