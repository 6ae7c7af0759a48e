use super::de;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Sort key used for transactions without a date, so they sort last when
/// ordering newest first.
const MISSING_DATE: &str = "0000-01-01";

/// A settled sale as listed by `/api/transactions`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Transaction {
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub external_reference: String,
    /// Gross transaction amount
    #[serde(default, deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub amount: Decimal,
    /// Amount settled after fees
    #[serde(default, deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub net_amount: Decimal,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub payment_method: String,
    /// Approval date (`YYYY-MM-DD` or an ISO timestamp)
    #[serde(default, deserialize_with = "de::optional_string")]
    pub date: Option<String>,
    /// Transaction type; filled from the group key when flattening
    #[serde(default, rename = "type", deserialize_with = "de::string_or_number")]
    pub kind: String,
}

impl Transaction {
    fn sort_date(&self) -> &str {
        self.date.as_deref().unwrap_or(MISSING_DATE)
    }
}

/// Transactions of a single type with their count and net total
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct TransactionGroup {
    #[serde(default, deserialize_with = "de::count_or_zero")]
    pub count: u64,
    #[serde(default, deserialize_with = "de::decimal_or_zero")]
    #[schemars(with = "f64")]
    pub total_amount: Decimal,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// Transactions grouped by type name
pub type TransactionGroups = BTreeMap<String, TransactionGroup>;

/// Newest first. Stable, so equal dates keep their fetch order.
pub fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| compare_newest_first(a, b));
}

fn compare_newest_first(a: &Transaction, b: &Transaction) -> Ordering {
    b.sort_date().cmp(a.sort_date())
}

/// Flatten grouped transactions into one list, tagging each with its group
/// type and ordering newest first.
pub fn flatten(groups: &TransactionGroups) -> Vec<Transaction> {
    let mut all: Vec<Transaction> = groups
        .iter()
        .flat_map(|(kind, group)| {
            group.transactions.iter().map(move |t| Transaction {
                kind: kind.clone(),
                ..t.clone()
            })
        })
        .collect();
    sort_newest_first(&mut all);
    all
}

/// Group transactions by type, recomputing each group's count and net total.
/// Only types with at least one transaction appear.
pub fn group_by_type(transactions: &[Transaction]) -> TransactionGroups {
    let mut groups = TransactionGroups::new();
    for transaction in transactions {
        let group = groups.entry(transaction.kind.clone()).or_default();
        group.count += 1;
        group.total_amount += transaction.net_amount;
        group.transactions.push(transaction.clone());
    }
    groups
}

/// Distinct transaction types, sorted
pub fn types(transactions: &[Transaction]) -> Vec<String> {
    let mut types: Vec<String> = transactions.iter().map(|t| t.kind.clone()).collect();
    types.sort();
    types.dedup();
    types
}

/// Distinct payment methods, sorted
pub fn payment_methods(transactions: &[Transaction]) -> Vec<String> {
    let mut methods: Vec<String> = transactions
        .iter()
        .map(|t| t.payment_method.clone())
        .filter(|m| !m.is_empty())
        .collect();
    methods.sort();
    methods.dedup();
    methods
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tx(reference: &str, net: Decimal, method: &str, date: Option<&str>) -> Transaction {
        Transaction {
            external_reference: reference.to_string(),
            amount: net,
            net_amount: net,
            payment_method: method.to_string(),
            date: date.map(str::to_string),
            kind: String::new(),
        }
    }

    fn sample_groups() -> TransactionGroups {
        let mut groups = TransactionGroups::new();
        groups.insert(
            "SETTLEMENT".to_string(),
            TransactionGroup {
                count: 2,
                total_amount: dec!(150),
                transactions: vec![
                    tx("A", dec!(100), "credit_card", Some("2024-01-10")),
                    tx("B", dec!(50), "pix", Some("2024-02-01")),
                ],
            },
        );
        groups.insert(
            "REFUND".to_string(),
            TransactionGroup {
                count: 1,
                total_amount: dec!(10),
                transactions: vec![tx("C", dec!(10), "credit_card", None)],
            },
        );
        groups
    }

    #[test]
    fn flatten_tags_type_and_sorts_newest_first() {
        let all = flatten(&sample_groups());
        let refs: Vec<_> = all.iter().map(|t| t.external_reference.as_str()).collect();
        assert_eq!(refs, ["B", "A", "C"]);
        assert_eq!(all[0].kind, "SETTLEMENT");
        assert_eq!(all[2].kind, "REFUND");
    }

    #[test]
    fn sort_is_stable_for_equal_dates() {
        let mut list = vec![
            tx("first", dec!(1), "pix", Some("2024-01-01")),
            tx("second", dec!(2), "pix", Some("2024-01-01")),
            tx("newer", dec!(3), "pix", Some("2024-01-02")),
        ];
        sort_newest_first(&mut list);
        let refs: Vec<_> = list.iter().map(|t| t.external_reference.as_str()).collect();
        assert_eq!(refs, ["newer", "first", "second"]);
    }

    #[test]
    fn regroup_recomputes_totals() {
        let all = flatten(&sample_groups());
        let groups = group_by_type(&all);
        assert_eq!(groups["SETTLEMENT"].count, 2);
        assert_eq!(groups["SETTLEMENT"].total_amount, dec!(150));
        assert_eq!(groups["REFUND"].count, 1);
    }

    #[test]
    fn distinct_types_and_methods() {
        let all = flatten(&sample_groups());
        assert_eq!(types(&all), ["REFUND", "SETTLEMENT"]);
        assert_eq!(payment_methods(&all), ["credit_card", "pix"]);
    }
}
