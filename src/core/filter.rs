//! Client-side filtering of fetched installments and transactions.
//!
//! Criteria are built from raw form values, then applied as a logical AND
//! across every active dimension. Filtering always returns a new list; the
//! stored source list is left untouched so clearing a filter restores it.

use super::format::parse_calendar_date;
use super::installment::Installment;
use super::transaction::{group_by_type, sort_newest_first, Transaction, TransactionGroups};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Select value meaning "no constraint"
const ALL: &str = "all";

/// Raw filter values as entered by a user. Every field is optional text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterInput {
    /// Installment status or transaction type
    pub kind: Option<String>,
    pub payment_method: Option<String>,
    pub date_start: Option<String>,
    pub date_end: Option<String>,
    pub min_value: Option<String>,
    pub max_value: Option<String>,
}

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// A record without a usable date only passes an unbounded range
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(date) = date else {
            return false;
        };
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

/// Inclusive value range. An unset minimum means zero, an unset maximum
/// means no upper bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValueRange {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl ValueRange {
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min.unwrap_or(Decimal::ZERO) && self.max.map_or(true, |max| value <= max)
    }
}

/// Parsed filter: absent bounds are unconstrained
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub kind: Option<String>,
    pub payment_method: Option<String>,
    pub dates: DateRange,
    pub values: ValueRange,
}

impl FilterCriteria {
    /// Build criteria from raw input. Blank text and `all` leave a dimension
    /// unset, as do dates and numbers that fail to parse.
    pub fn parse(input: &FilterInput) -> Self {
        Self {
            kind: parse_choice(input.kind.as_deref()),
            payment_method: parse_choice(input.payment_method.as_deref()),
            dates: DateRange {
                start: input.date_start.as_deref().and_then(parse_calendar_date),
                end: input.date_end.as_deref().and_then(parse_calendar_date),
            },
            values: ValueRange {
                min: input.min_value.as_deref().and_then(parse_amount),
                max: input.max_value.as_deref().and_then(parse_amount),
            },
        }
    }

    /// True when no dimension is constrained
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.payment_method.is_none()
            && self.dates.is_unbounded()
            && self.values.is_unbounded()
    }

    pub fn matches<R: Filterable>(&self, record: &R) -> bool {
        if let Some(kind) = &self.kind {
            if record.kind() != kind.as_str() {
                return false;
            }
        }
        if let Some(method) = &self.payment_method {
            if record.payment_method() != Some(method.as_str()) {
                return false;
            }
        }
        if !self
            .dates
            .contains(record.filter_date().and_then(parse_calendar_date))
        {
            return false;
        }
        self.values.contains(record.filter_value())
    }
}

fn parse_choice(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL))
        .map(str::to_string)
}

/// Parse a user-typed amount. Accepts `1234.56`, `1234,56` and `1.234,56`.
pub fn parse_amount(value: &str) -> Option<Decimal> {
    let value = value.trim().trim_start_matches("R$").trim();
    if value.is_empty() {
        return None;
    }
    let normalized = if value.contains(',') {
        value.replace('.', "").replace(',', ".")
    } else {
        value.to_string()
    };
    Decimal::from_str(&normalized).ok()
}

/// Record fields a [`FilterCriteria`] can constrain
pub trait Filterable {
    /// Status of an installment, type of a transaction
    fn kind(&self) -> &str;
    fn payment_method(&self) -> Option<&str>;
    fn filter_date(&self) -> Option<&str>;
    fn filter_value(&self) -> Decimal;
}

impl Filterable for Installment {
    fn kind(&self) -> &str {
        self.status.as_str()
    }

    fn payment_method(&self) -> Option<&str> {
        None
    }

    fn filter_date(&self) -> Option<&str> {
        Installment::filter_date(self)
    }

    fn filter_value(&self) -> Decimal {
        self.display_amount()
    }
}

impl Filterable for Transaction {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn payment_method(&self) -> Option<&str> {
        Some(&self.payment_method)
    }

    fn filter_date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    fn filter_value(&self) -> Decimal {
        self.net_amount
    }
}

/// Records matching every active predicate, in their original order.
/// With no active predicate the whole list is returned.
pub fn filter<R: Filterable + Clone>(records: &[R], criteria: &FilterCriteria) -> Vec<R> {
    if criteria.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| criteria.matches(*r))
        .cloned()
        .collect()
}

/// Filter a flat transaction list and regroup the survivors by type, newest
/// first within each group. Types left without transactions are dropped.
pub fn filter_transactions(
    transactions: &[Transaction],
    criteria: &FilterCriteria,
) -> TransactionGroups {
    let mut matching = filter(transactions, criteria);
    sort_newest_first(&mut matching);
    group_by_type(&matching)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::installment::{total_amount, InstallmentStatus};
    use crate::core::transaction::{flatten, TransactionGroup};
    use rust_decimal_macros::dec;

    fn installment(status: InstallmentStatus, net: Decimal, date: &str) -> Installment {
        Installment {
            external_reference: format!("{}-{}", status, date),
            installment_net_amount: net,
            money_release_date: Some(date.to_string()),
            status,
            ..Default::default()
        }
    }

    fn installments() -> Vec<Installment> {
        vec![
            installment(InstallmentStatus::Pending, dec!(100), "2024-01-10"),
            installment(InstallmentStatus::Received, dec!(50), "2024-02-01"),
            installment(InstallmentStatus::Overdue, dec!(-20), "2024-02-15"),
            Installment {
                external_reference: "no-date".to_string(),
                installment_net_amount: dec!(70),
                status: InstallmentStatus::Pending,
                ..Default::default()
            },
        ]
    }

    fn tx(reference: &str, kind: &str, method: &str, net: Decimal, date: &str) -> Transaction {
        Transaction {
            external_reference: reference.to_string(),
            amount: net,
            net_amount: net,
            payment_method: method.to_string(),
            date: Some(date.to_string()),
            kind: kind.to_string(),
        }
    }

    fn input(kind: Option<&str>) -> FilterInput {
        FilterInput {
            kind: kind.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn unset_criteria_is_identity() {
        let list = installments();
        let criteria = FilterCriteria::parse(&FilterInput::default());
        assert!(criteria.is_empty());
        assert_eq!(filter(&list, &criteria), list);
    }

    #[test]
    fn all_and_blank_values_are_unset() {
        let criteria = FilterCriteria::parse(&FilterInput {
            kind: Some("all".to_string()),
            payment_method: Some("  ".to_string()),
            date_start: Some("not a date".to_string()),
            min_value: Some("abc".to_string()),
            ..Default::default()
        });
        assert!(criteria.is_empty());
    }

    #[test]
    fn status_filter_selects_pending_only() {
        let list = vec![
            installment(InstallmentStatus::Pending, dec!(100), "2024-01-10"),
            installment(InstallmentStatus::Received, dec!(50), "2024-02-01"),
        ];
        let criteria = FilterCriteria::parse(&input(Some("pending")));
        let result = filter(&list, &criteria);
        assert_eq!(result, vec![list[0].clone()]);
        assert_eq!(total_amount(&result), dec!(100));
    }

    #[test]
    fn active_filter_defaults_min_to_zero() {
        let criteria = FilterCriteria::parse(&input(Some("overdue")));
        assert!(filter(&installments(), &criteria).is_empty());

        let criteria = FilterCriteria::parse(&FilterInput {
            kind: Some("overdue".to_string()),
            min_value: Some("-50".to_string()),
            ..Default::default()
        });
        assert_eq!(filter(&installments(), &criteria).len(), 1);
    }

    #[test]
    fn date_range_is_inclusive_and_excludes_undated() {
        let criteria = FilterCriteria::parse(&FilterInput {
            date_start: Some("2024-01-10".to_string()),
            date_end: Some("2024-02-01".to_string()),
            ..Default::default()
        });
        let refs: Vec<_> = filter(&installments(), &criteria)
            .into_iter()
            .map(|i| i.external_reference)
            .collect();
        assert_eq!(refs, ["pending-2024-01-10", "received-2024-02-01"]);
    }

    #[test]
    fn value_range_is_inclusive() {
        let criteria = FilterCriteria::parse(&FilterInput {
            min_value: Some("50".to_string()),
            max_value: Some("70,00".to_string()),
            ..Default::default()
        });
        let values: Vec<_> = filter(&installments(), &criteria)
            .iter()
            .map(Installment::display_amount)
            .collect();
        assert_eq!(values, [dec!(50), dec!(70)]);
    }

    #[test]
    fn no_false_positives_or_negatives() {
        let list = installments();
        let criteria = FilterCriteria::parse(&FilterInput {
            kind: Some("pending".to_string()),
            max_value: Some("80".to_string()),
            ..Default::default()
        });
        let result = filter(&list, &criteria);
        for inst in &list {
            let expected = inst.status == InstallmentStatus::Pending
                && inst.display_amount() >= Decimal::ZERO
                && inst.display_amount() <= dec!(80);
            assert_eq!(result.contains(inst), expected, "{}", inst.external_reference);
        }
    }

    #[test]
    fn source_list_is_not_mutated() {
        let list = installments();
        let before = list.clone();
        let _ = filter(&list, &FilterCriteria::parse(&input(Some("received"))));
        assert_eq!(list, before);
    }

    #[test]
    fn parse_amount_accepts_brazilian_notation() {
        assert_eq!(parse_amount("1.234,56"), Some(dec!(1234.56)));
        assert_eq!(parse_amount("R$ 10,5"), Some(dec!(10.5)));
        assert_eq!(parse_amount("99.9"), Some(dec!(99.9)));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("dez"), None);
    }

    #[test]
    fn transactions_regroup_after_filtering() {
        let list = vec![
            tx("A", "SETTLEMENT", "credit_card", dec!(100), "2024-01-10"),
            tx("B", "SETTLEMENT", "pix", dec!(50), "2024-02-01"),
            tx("C", "REFUND", "credit_card", dec!(10), "2024-03-01"),
        ];
        let criteria = FilterCriteria::parse(&FilterInput {
            payment_method: Some("credit_card".to_string()),
            ..Default::default()
        });
        let groups = filter_transactions(&list, &criteria);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups["SETTLEMENT"].count, 1);
        assert_eq!(groups["SETTLEMENT"].total_amount, dec!(100));
        assert_eq!(groups["REFUND"].transactions[0].external_reference, "C");
    }

    #[test]
    fn unmatched_payment_method_leaves_no_groups() {
        let mut grouped = TransactionGroups::new();
        grouped.insert(
            "credit_card".to_string(),
            TransactionGroup {
                count: 2,
                total_amount: dec!(150),
                transactions: vec![
                    tx("A", "", "visa", dec!(100), "2024-01-10"),
                    tx("B", "", "master", dec!(50), "2024-01-11"),
                ],
            },
        );
        let all = flatten(&grouped);
        let criteria = FilterCriteria::parse(&FilterInput {
            payment_method: Some("boleto".to_string()),
            ..Default::default()
        });
        assert!(filter_transactions(&all, &criteria).is_empty());
    }

    #[test]
    fn installments_never_match_a_payment_method() {
        let criteria = FilterCriteria::parse(&FilterInput {
            payment_method: Some("pix".to_string()),
            ..Default::default()
        });
        assert!(filter(&installments(), &criteria).is_empty());
    }
}
