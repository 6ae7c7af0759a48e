//! Display formatting for amounts, dates and installment statuses.
//!
//! Everything here is pure and never fails: bad input degrades to a
//! placeholder or passes through unchanged.

use super::installment::{Installment, InstallmentStatus};
use chrono::{DateTime, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount as Brazilian reais, e.g. `R$ 1.234,56`.
///
/// A missing amount renders as `R$ 0,00`.
pub fn format_currency(amount: Option<Decimal>) -> String {
    let amount = amount
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if amount < Decimal::ZERO { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (units, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{}R$ {},{}", sign, group_thousands(units), cents)
}

/// Shorthand for [`format_currency`] with a known amount
pub fn brl(amount: Decimal) -> String {
    format_currency(Some(amount))
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Format a backend date as `DD/MM/YYYY`.
///
/// A `YYYY-MM-DD` prefix is read as a calendar date, so no timezone can move
/// it to the previous day. Other timestamps are tried as RFC 3339/2822.
/// Missing dates render as `-`; anything unparseable is returned unchanged.
pub fn format_date(date: Option<&str>) -> String {
    let Some(raw) = date else {
        return "-".to_string();
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return "-".to_string();
    }

    let parsed = match iso_date_prefix(trimmed) {
        Some(prefix) => NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok(),
        None => DateTime::parse_from_rfc3339(trimmed)
            .or_else(|_| DateTime::parse_from_rfc2822(trimmed))
            .ok()
            .map(|dt| dt.date_naive()),
    };

    match parsed {
        Some(d) => d.format("%d/%m/%Y").to_string(),
        None => raw.to_string(),
    }
}

/// The leading `YYYY-MM-DD` of `s`, if it has that shape
pub fn iso_date_prefix(s: &str) -> Option<&str> {
    let prefix = s.get(..10)?;
    let shaped = prefix.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 => b == b'-',
        _ => b.is_ascii_digit(),
    });
    shaped.then_some(prefix)
}

/// Parse the calendar date at the start of `s`
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    iso_date_prefix(s.trim()).and_then(|p| NaiveDate::parse_from_str(p, "%Y-%m-%d").ok())
}

pub fn status_label(status: InstallmentStatus) -> &'static str {
    match status {
        InstallmentStatus::Received => "Recebido",
        InstallmentStatus::ReceivedAdvance => "Antecipado",
        InstallmentStatus::Pending => "Pendente",
        InstallmentStatus::Overdue => "Atrasado",
        InstallmentStatus::Cancelled => "Cancelado",
        InstallmentStatus::Unknown => "Desconhecido",
    }
}

/// CSS badge class for a status
pub fn status_class(status: InstallmentStatus) -> &'static str {
    match status {
        InstallmentStatus::Received => "badge-success",
        InstallmentStatus::ReceivedAdvance => "badge-info",
        InstallmentStatus::Pending => "badge-warning",
        InstallmentStatus::Overdue => "badge-danger",
        InstallmentStatus::Cancelled | InstallmentStatus::Unknown => "badge-secondary",
    }
}

/// Free-text notes for an installment: cancellation reason, advance receipt
/// and applied refunds or chargebacks.
pub fn observation(inst: &Installment) -> String {
    if inst.is_cancelled() {
        return match inst.cancelled_reason.as_deref() {
            Some("full_refund") => "Cancelada (Refund Total)".to_string(),
            Some("chargeback") => "Cancelada (Chargeback Total)".to_string(),
            Some("partial_refund_full_cancellation") => {
                format!("Cancelada (Refund: {})", format_currency(inst.refund_applied))
            }
            _ => "Cancelada".to_string(),
        };
    }

    let mut notes = Vec::new();
    if inst.has_adjustment {
        notes.push("Ajustado".to_string());
    }
    if inst.status == InstallmentStatus::ReceivedAdvance {
        notes.push(format!("Antecipado {} dias", inst.days_advance));
    }
    if let Some(refund) = inst.refund_applied.filter(|r| *r > Decimal::ZERO) {
        notes.push(format!("Estorno: {}", brl(refund)));
    }
    if let Some(chargeback) = inst.chargeback_applied.filter(|c| *c > Decimal::ZERO) {
        notes.push(format!("Chargeback: {}", brl(chargeback)));
    }
    notes.join(" ")
}
