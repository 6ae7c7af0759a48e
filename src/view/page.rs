//! Named page regions holding rendered HTML fragments.

use crate::core::InstallmentBucket;
use std::collections::BTreeMap;

pub const SYSTEM_STATUS: &str = "system-status";
pub const SYSTEM_INFO: &str = "system-info";
pub const CASHFLOW_MONTHLY: &str = "cashflow-monthly-view";
pub const CASHFLOW_DAILY: &str = "cashflow-daily-view";
pub const TRANSACTIONS_TABLE: &str = "transactions-table";
pub const TRANSACTION_TYPES: &str = "filter-transaction-type";
pub const PAYMENT_METHODS: &str = "filter-payment-method";
pub const RECONCILIATION_REPORT: &str = "reconciliation-report";
pub const DEBUG_RESULTS: &str = "debug-results";

/// Region of the table listing installments of `bucket`
pub fn installments_region(bucket: InstallmentBucket) -> &'static str {
    match bucket {
        InstallmentBucket::Overdue => "overdue-table",
        InstallmentBucket::Pending => "pending-table",
        InstallmentBucket::Received => "received-table",
        InstallmentBucket::Advance => "advance-table",
    }
}

/// Rendered content keyed by element id. A region that was never set has
/// not been loaded, which is distinct from a region showing an empty result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    regions: BTreeMap<&'static str, String>,
}

impl Page {
    pub fn set(&mut self, id: &'static str, html: String) {
        self.regions.insert(id, html);
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.regions.get(id).map(String::as_str)
    }

    pub fn is_loaded(&self, id: &str) -> bool {
        self.regions.contains_key(id)
    }

    pub fn clear(&mut self, id: &str) {
        self.regions.remove(id);
    }

    pub fn regions(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.regions.iter().map(|(id, html)| (*id, html.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_region_is_not_loaded() {
        let mut page = Page::default();
        assert!(!page.is_loaded(DEBUG_RESULTS));
        page.set(DEBUG_RESULTS, String::new());
        assert!(page.is_loaded(DEBUG_RESULTS));
        assert_eq!(page.get(DEBUG_RESULTS), Some(""));
        page.clear(DEBUG_RESULTS);
        assert!(page.get(DEBUG_RESULTS).is_none());
    }

    #[test]
    fn installment_regions_are_distinct() {
        let ids: std::collections::HashSet<_> = [
            InstallmentBucket::Overdue,
            InstallmentBucket::Pending,
            InstallmentBucket::Received,
            InstallmentBucket::Advance,
        ]
        .into_iter()
        .map(installments_region)
        .collect();
        assert_eq!(ids.len(), 4);
    }
}
