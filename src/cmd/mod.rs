pub mod cashflow;
pub mod debug;
pub mod installments;
pub mod movements;
pub mod reconciliation;
pub mod report;
pub mod schema;
pub mod status;
pub mod summary;
pub mod transactions;

use crate::api::{envelope, Api, ClientConfig, Endpoint, HttpBackend};
use crate::core::FilterInput;
use crate::render::table;
use clap::Args;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use tabled::Tabled;

/// Open a client against the configured backend
pub fn connect(config: &ClientConfig) -> anyhow::Result<Api<HttpBackend>> {
    Ok(Api::new(HttpBackend::new(config)?))
}

/// Filter flags shared by the installments, transactions and report commands
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Installment status or transaction type ("all" for any)
    #[arg(long = "status", visible_alias = "type")]
    pub kind: Option<String>,

    /// Payment method (transactions only)
    #[arg(long)]
    pub method: Option<String>,

    /// Earliest date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// Latest date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,

    /// Minimum amount, e.g. 100 or 1.234,56
    #[arg(long, allow_hyphen_values = true)]
    pub min: Option<String>,

    /// Maximum amount
    #[arg(long, allow_hyphen_values = true)]
    pub max: Option<String>,
}

impl FilterArgs {
    pub fn to_input(&self) -> FilterInput {
        FilterInput {
            kind: self.kind.clone(),
            payment_method: self.method.clone(),
            date_start: self.start.clone(),
            date_end: self.end.clone(),
            min_value: self.min.clone(),
            max_value: self.max.clone(),
        }
    }

    pub fn is_set(&self) -> bool {
        self.to_input() != FilterInput::default()
    }
}

/// Output format flags for listing commands
#[derive(Args, Debug, Default, Clone, Copy)]
pub struct OutputArgs {
    /// Output as CSV instead of formatted table
    #[arg(long, conflicts_with = "json")]
    pub csv: bool,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    pub json: bool,
}

impl OutputArgs {
    /// Write `rows` as a table or CSV, or `json` as JSON. Returns whether a
    /// table was printed, so callers know to add totals underneath.
    pub fn emit<R, J>(&self, rows: &[R], json: &J, right_from: usize, empty: &str) -> anyhow::Result<bool>
    where
        R: Tabled + Serialize,
        J: Serialize + ?Sized,
    {
        if self.json {
            table::print_json(json)?;
            Ok(false)
        } else if self.csv {
            table::write_csv(rows, io::stdout())?;
            Ok(false)
        } else {
            table::print_table(rows, right_from, empty);
            Ok(!rows.is_empty())
        }
    }
}

/// Read a saved API response for `endpoint` from a file (or stdin with "-").
/// A bare JSON payload without the response envelope is accepted too.
pub fn read_payload<T: DeserializeOwned>(path: &Path, endpoint: &Endpoint) -> anyhow::Result<T> {
    let value: Value = if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        BufReader::new(io::stdin().lock()).read_to_end(&mut buffer)?;
        if buffer.is_empty() {
            anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
        }
        serde_json::from_slice(&buffer)?
    } else {
        let file = File::open(path)
            .map_err(|e| anyhow::anyhow!("cannot open {}: {}", path.display(), e))?;
        serde_json::from_reader(BufReader::new(file))?
    };
    log::debug!("read {} response from {}", endpoint, path.display());

    if value.get("success").is_some() {
        Ok(envelope::payload(endpoint, value)?)
    } else {
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Installment, InstallmentBucket};
    use std::io::Write;

    #[test]
    fn filter_args_map_to_input() {
        let args = FilterArgs {
            kind: Some("received".to_string()),
            min: Some("10".to_string()),
            ..Default::default()
        };
        assert!(args.is_set());
        let input = args.to_input();
        assert_eq!(input.kind.as_deref(), Some("received"));
        assert_eq!(input.min_value.as_deref(), Some("10"));
        assert!(!FilterArgs::default().is_set());
    }

    #[test]
    fn reads_enveloped_and_bare_payloads() {
        let dir = std::env::temp_dir();
        let enveloped = dir.join("settleview-enveloped.json");
        let bare = dir.join("settleview-bare.json");
        File::create(&enveloped)
            .unwrap()
            .write_all(br#"{"success": true, "installments": [{"external_reference": "A"}]}"#)
            .unwrap();
        File::create(&bare)
            .unwrap()
            .write_all(br#"[{"external_reference": 42}]"#)
            .unwrap();

        let endpoint = Endpoint::Installments(InstallmentBucket::Received);
        let a: Vec<Installment> = read_payload(&enveloped, &endpoint).unwrap();
        let b: Vec<Installment> = read_payload(&bare, &endpoint).unwrap();
        assert_eq!(a[0].external_reference, "A");
        assert_eq!(b[0].external_reference, "42");

        std::fs::remove_file(enveloped).unwrap();
        std::fs::remove_file(bare).unwrap();
    }
}
