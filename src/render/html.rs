//! HTML fragments for each page region, and the full dashboard page.

use crate::core::cashflow::{days_with_receipts, total_to_receive};
use crate::core::format::{observation, status_class, status_label};
use crate::core::installment::total_amount;
use crate::core::reconciliation::StatusBucket;
use crate::core::{
    brl, format_currency, format_date, BackendStatus, CashflowRow, DashboardCard, DebugReference,
    Granularity, Installment, ReconciliationReport, ReleaseKind, Summary, TransactionGroups,
};
use crate::view::notify::Notice;
use crate::view::page::{self, Page};
use crate::view::state::{Tab, ViewState};
use rust_decimal::Decimal;

const TEMPLATE: &str = include_str!("report.html");
const CSS: &str = include_str!("report.css");

/// Transactions shown per type when the list is not filtered
pub const GROUP_PREVIEW_LIMIT: usize = 10;

/// Shown in place of a region that has never been loaded
const NOT_LOADED: &str = r#"<p class="not-loaded">Dados não carregados</p>"#;

/// Escape text for inclusion in HTML content or attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn status_badge(status: &BackendStatus) -> String {
    if status.processed {
        r#"<span class="badge badge-success">Processado</span>"#.to_string()
    } else {
        r#"<span class="badge badge-warning">Não processado</span>"#.to_string()
    }
}

pub fn card(card: &DashboardCard) -> String {
    let percent = card
        .percent_of_expected
        .map(|p| format!("{}% do esperado", p))
        .unwrap_or_default();
    format!(
        r#"<div class="card" id="{id}">
  <h3>{title}</h3>
  <p class="card-value" id="{id}-value">{value}</p>
  <p class="card-count" id="{id}-count">{count} parcelas</p>
  <p class="card-percent" id="{id}-percent">{percent}</p>
</div>"#,
        id = card.id,
        title = card.title,
        value = brl(card.amount),
        count = card.count,
        percent = percent,
    )
}

fn info_item(label: &str, value: impl std::fmt::Display) -> String {
    format!(
        r#"<div class="info-item"><strong>{}:</strong> {}</div>"#,
        label, value
    )
}

pub fn system_info(summary: &Summary) -> String {
    let cashflow = &summary.cashflow;
    let movements = &summary.movements;
    let mut items = vec![
        info_item("Total Esperado", brl(cashflow.total_expected)),
        info_item("Total Recebido", brl(summary.total_received())),
        info_item("Total Pendente", brl(cashflow.total_pending)),
        info_item("Total Atrasado", brl(cashflow.total_overdue)),
    ];
    if cashflow.count_received_advance > 0 {
        items.push(info_item(
            "Parcelas Antecipadas",
            cashflow.count_received_advance,
        ));
    }
    if cashflow.count_cancelled > 0 {
        items.push(info_item("Parcelas Canceladas", cashflow.count_cancelled));
    }
    if !movements.chargebacks.net_chargeback.is_zero() {
        items.push(info_item(
            "Chargebacks Líquido",
            brl(movements.chargebacks.net_chargeback),
        ));
    }
    if !movements.advance_fees.total_amount.is_zero() {
        items.push(info_item(
            "Taxas de Antecipação",
            brl(movements.advance_fees.total_amount),
        ));
    }
    items.push(r#"<div class="info-separator"></div>"#.to_string());
    items.push(info_item("Total de Pedidos", summary.settlement.total_orders));
    items.push(info_item(
        "Total de Parcelas",
        summary.settlement.total_installments,
    ));
    items.push(info_item("Parcelas Ativas", cashflow.count_active));
    items.push(info_item(
        "Payments Recebidos",
        summary.releases.total_payments,
    ));
    items.join("\n")
}

pub fn system_info_unprocessed() -> String {
    "<p>Dados não processados</p>".to_string()
}

fn empty_row(columns: usize) -> String {
    format!(
        r#"<tr><td colspan="{}" class="empty">Nenhum registro encontrado</td></tr>"#,
        columns
    )
}

fn table(headers: &[&str], rows: Vec<String>) -> String {
    let head: String = headers.iter().map(|h| format!("<th>{}</th>", h)).collect();
    let body = if rows.is_empty() {
        empty_row(headers.len())
    } else {
        rows.join("\n")
    };
    format!(
        r#"<table class="data-table">
<thead><tr>{}</tr></thead>
<tbody>
{}
</tbody>
</table>"#,
        head, body
    )
}

fn header(title: &str, subtitle: &str) -> String {
    format!(
        r#"<div class="table-header"><h3>{}</h3><p>{}</p></div>"#,
        title, subtitle
    )
}

fn date_or_dash(date: Option<&str>) -> String {
    escape(&format_date(date))
}

/// Installments table titled "Parcelas {title} (n)" with the total shown
pub fn installments_table(installments: &[Installment], title: &str) -> String {
    let rows = installments
        .iter()
        .map(|inst| {
            format!(
                r#"<tr>
  <td><code>{reference}</code></td>
  <td>{label}</td>
  <td><strong>{amount}</strong></td>
  <td>{expected}</td>
  <td>{received}</td>
  <td><span class="badge {class}">{status}</span></td>
  <td>{notes}</td>
</tr>"#,
                reference = escape(&inst.external_reference),
                label = escape(&inst.installment_label()),
                amount = brl(inst.display_amount()),
                expected = date_or_dash(inst.money_release_date.as_deref()),
                received = date_or_dash(inst.received_date.as_deref()),
                class = status_class(inst.status),
                status = status_label(inst.status),
                notes = escape(&observation(inst)),
            )
        })
        .collect();
    let headers = [
        "External Ref",
        "Parcela",
        "Valor",
        "Data Prevista",
        "Data Recebida",
        "Status",
        "Observações",
    ];
    format!(
        "{}\n{}",
        header(
            &format!("Parcelas {} ({})", escape(title), installments.len()),
            &format!("Total: {}", brl(total_amount(installments))),
        ),
        table(&headers, rows)
    )
}

const CASHFLOW_HEADERS: [&str; 4] = ["A Receber", "Pendente", "Atrasado", "Parcelas"];

fn cashflow_rows<'a>(
    rows: impl Iterator<Item = &'a CashflowRow>,
    period: impl Fn(&str) -> String,
) -> Vec<String> {
    rows.map(|row| {
        format!(
            r#"<tr>
  <td><strong>{period}</strong></td>
  <td><strong>{to_receive}</strong></td>
  <td class="text-warning">{pending}</td>
  <td class="text-danger">{overdue}</td>
  <td>{count}</td>
</tr>"#,
            period = period(&row.period),
            to_receive = brl(row.to_receive()),
            pending = brl(row.pending),
            overdue = brl(row.overdue),
            count = row.count_to_receive(),
        )
    })
    .collect()
}

fn cashflow_headers(first: &'static str) -> Vec<&'static str> {
    let mut headers = vec![first];
    headers.extend_from_slice(&CASHFLOW_HEADERS);
    headers
}

pub fn monthly_cashflow(rows: &[CashflowRow]) -> String {
    format!(
        "{}\n{}",
        header(
            "Fluxo de Caixa Mensal - A Receber",
            &format!("Total: {}", brl(total_to_receive(rows))),
        ),
        table(
            &cashflow_headers("Mês"),
            cashflow_rows(rows.iter(), |p| escape(p))
        )
    )
}

/// Daily cash flow, limited to days that still have something to receive
pub fn daily_cashflow(rows: &[CashflowRow]) -> String {
    let days = days_with_receipts(rows);
    let total: Decimal = days.iter().map(|d| d.to_receive()).sum();
    format!(
        "{}\n{}",
        header(
            "Fluxo de Caixa Diário - A Receber",
            &format!(
                "{} dias com recebimentos | Total: {}",
                days.len(),
                brl(total)
            ),
        ),
        table(
            &cashflow_headers("Data"),
            cashflow_rows(days.into_iter(), |p| date_or_dash(Some(p)))
        )
    )
}

/// Transactions grouped by type. Unfiltered groups show only their newest
/// transactions; filtered groups show everything that matched.
pub fn transactions(groups: &TransactionGroups, filtered: bool) -> String {
    let title = if filtered {
        "Transações Filtradas"
    } else {
        "Transações por Tipo"
    };
    let mut html = format!(r#"<div class="table-header"><h3>{}</h3></div>"#, title);
    if groups.is_empty() {
        html.push_str(r#"<p class="empty">Nenhuma transação encontrada</p>"#);
        return html;
    }
    for (kind, group) in groups {
        let mut sorted = group.transactions.clone();
        crate::core::transaction::sort_newest_first(&mut sorted);
        if !filtered {
            sorted.truncate(GROUP_PREVIEW_LIMIT);
        }
        let rows = sorted
            .iter()
            .map(|t| {
                format!(
                    r#"<tr>
  <td><code>{}</code></td>
  <td>{}</td>
  <td>{}</td>
  <td>{}</td>
  <td>{}</td>
</tr>"#,
                    escape(&t.external_reference),
                    brl(t.amount),
                    brl(t.net_amount),
                    escape(&t.payment_method),
                    date_or_dash(t.date.as_deref()),
                )
            })
            .collect();
        html.push_str(&format!(
            r#"
<div class="transaction-group">
<h4>{} ({})</h4>
<p>Total: {}</p>
{}
</div>"#,
            escape(kind),
            group.count,
            brl(group.total_amount),
            table(
                &["External Ref", "Valor Bruto", "Valor Líquido", "Método", "Data"],
                rows
            )
        ));
    }
    html
}

/// `<option>` list for a select, led by the "all" choice
pub fn select_options(values: &[String], selected: Option<&str>) -> String {
    let mut html = String::from(r#"<option value="all">Todos</option>"#);
    for value in values {
        let mark = if selected == Some(value.as_str()) {
            " selected"
        } else {
            ""
        };
        html.push_str(&format!(
            r#"<option value="{v}"{mark}>{v}</option>"#,
            v = escape(value),
            mark = mark
        ));
    }
    html
}

fn breakdown_row(class: &str, label: &str, bucket: &StatusBucket, show_amount: bool) -> String {
    let amount = if show_amount {
        brl(bucket.amount)
    } else {
        format_currency(None)
    };
    format!(
        r#"<tr><td><span class="badge {}">{}</span></td><td>{}</td><td>{}</td><td>{}%</td></tr>"#,
        class, label, bucket.count, amount, bucket.percentage
    )
}

fn amount_row(label: &str, amount: String, class: &str) -> String {
    format!(
        r#"<tr><td>{}</td><td class="text-right {}">{}</td></tr>"#,
        label, class, amount
    )
}

pub fn reconciliation(report: &ReconciliationReport) -> String {
    let summary = &report.detailed_status.summary;
    let breakdown = &report.detailed_status.status_breakdown;
    let check = &report.validation.installments_vs_payments;
    let divergent = report.is_divergent();
    let (card_class, text_class, verdict, mark) = if divergent {
        ("card-danger", "text-danger", "DIVERGÊNCIA ENCONTRADA", "❌")
    } else {
        ("card-success", "text-success", "CONCILIADO", "✅")
    };

    let mut html = format!(
        r#"<div class="reconciliation-summary">
<h3>Relatório de Conciliação</h3>
<div class="summary-cards">
  <div class="summary-card {card_class}">
    <h4>Status da Conciliação</h4>
    <p class="reconciliation-status {text_class}">{mark} {verdict}</p>
    {difference}
  </div>
  <div class="summary-card">
    <h4>Parcelas Totais</h4>
    <p>Total: {total}</p>
    <p>Ativas: {active}</p>
    <p>Canceladas: {cancelled}</p>
  </div>
  <div class="summary-card">
    <h4>Valores Totais</h4>
    <p>Esperado: {expected}</p>
    <p>Recebido: {received}</p>
    <p>Pendente: {pending}</p>
  </div>
</div>"#,
        card_class = card_class,
        text_class = text_class,
        mark = mark,
        verdict = verdict,
        difference = if divergent {
            format!(
                "<p><strong>Diferença: {}</strong></p>",
                brl(report.difference())
            )
        } else {
            String::new()
        },
        total = summary.total_installments,
        active = summary.active_installments,
        cancelled = summary.cancelled_installments,
        expected = brl(summary.total_expected),
        received = brl(summary.total_received),
        pending = brl(summary.total_pending),
    );

    html.push_str(&format!(
        r#"
<div class="reconciliation-section">
<h4>Breakdown por Status</h4>
{}
</div>"#,
        table(
            &["Status", "Quantidade", "Valor Total", "Percentual"],
            vec![
                breakdown_row("badge-success", "Recebido", &breakdown.received, true),
                breakdown_row("badge-info", "Antecipado", &breakdown.received_advance, true),
                breakdown_row("badge-warning", "Pendente", &breakdown.pending, true),
                breakdown_row("badge-danger", "Atrasado", &breakdown.overdue, true),
                breakdown_row("badge-secondary", "Cancelado", &breakdown.cancelled, false),
            ]
        )
    ));

    html.push_str(&format!(
        r#"
<div class="reconciliation-section {section}">
<h4>Validação: Parcelas Recebidas vs Payments</h4>
<table class="data-table"><tbody>
{}
{}
{}
<tr class="table-separator"><td><strong>Payments Filtrados</strong></td><td class="text-right"><strong>{}</strong></td></tr>
<tr class="{row}"><td><strong>Diferença</strong></td><td class="text-right {text}"><strong>{}</strong> {mark}</td></tr>
</tbody></table>
</div>"#,
        amount_row(
            "<strong>Parcelas Recebidas (Settlement)</strong>",
            format!("<strong>{}</strong>", brl(check.installments_received)),
            ""
        ),
        amount_row("Payments Totais (Releases)", brl(check.payments_all), ""),
        amount_row(
            "(-) Payments Órfãos",
            format!("({})", brl(check.payments_orphan)),
            "text-danger"
        ),
        brl(check.payments_filtered),
        brl(report.difference()),
        section = if divergent { "section-error" } else { "" },
        row = if divergent { "row-error" } else { "row-success" },
        text = text_class,
        mark = mark,
    ));

    if summary.has_adjustments() {
        html.push_str(&format!(
            r#"
<div class="reconciliation-section">
<h4>Ajustes Aplicados</h4>
<table class="data-table"><tbody>
{}
{}
{}
</tbody></table>
<p class="info-text">Pedidos com ajustes: {}</p>
</div>"#,
            amount_row(
                "Estornos Aplicados",
                brl(summary.total_refund_applied),
                "text-warning"
            ),
            amount_row(
                "Chargebacks Aplicados",
                brl(summary.total_chargeback_applied),
                "text-danger"
            ),
            amount_row(
                "<strong>Total de Ajustes</strong>",
                format!("<strong>{}</strong>", brl(summary.total_adjustments())),
                ""
            ),
            report.adjustments_analysis.orders_with_adjustments,
        ));
    }

    if report.orphan_payments.count > 0 {
        html.push_str(&format!(
            r#"
<div class="reconciliation-section section-warning">
<h4>Payments Órfãos (Sem Match)</h4>
<p>Quantidade: <strong>{}</strong></p>
<p>Valor Total: <strong>{}</strong></p>
<p class="info-text">Payments que não foram associados a nenhuma parcela do settlement.</p>
</div>"#,
            report.orphan_payments.count,
            brl(report.orphan_payments.total_amount),
        ));
    }

    if report.advance_payments.count > 0 {
        let average = breakdown
            .received_advance
            .avg_days_advance
            .map(|days| {
                format!(
                    "<p>Média de dias antecipados: <strong>{}</strong></p>",
                    days
                )
            })
            .unwrap_or_default();
        html.push_str(&format!(
            r#"
<div class="reconciliation-section">
<h4>Adiantamentos Detectados</h4>
<p>Pedidos com antecipação: <strong>{}</strong></p>
{}
</div>"#,
            report.advance_payments.count, average,
        ));
    }

    html.push_str("\n</div>");
    html
}

fn release_badge(kind: ReleaseKind) -> (&'static str, &'static str) {
    match kind {
        ReleaseKind::Payment => ("", "badge-success"),
        ReleaseKind::Refund | ReleaseKind::Chargeback => ("row-warning", "badge-danger"),
        ReleaseKind::Other => ("row-light", "badge-secondary"),
    }
}

fn positive_or_dash(amount: Decimal) -> String {
    if amount > Decimal::ZERO {
        brl(amount)
    } else {
        "-".to_string()
    }
}

fn text_or_dash(text: Option<&str>) -> String {
    escape(text.unwrap_or("-"))
}

/// Settlement and releases side by side for one external reference
pub fn debug_reference(result: &DebugReference) -> String {
    let settlement = &result.settlement;
    let releases = &result.releases;
    let divergent = result.has_divergence();
    let (box_class, text_class, verdict, mark) = if divergent {
        ("debug-error", "text-danger", "DIVERGÊNCIA", "❌")
    } else {
        ("debug-success", "text-success", "CONCILIADO", "✅")
    };

    let mut html = format!(
        r#"<div class="debug-results-box {box_class}">
<h4>Análise: {reference}</h4>
<div class="debug-summary">
  <div class="debug-summary-item"><strong>Status:</strong> <span class="{text_class}">{mark} {verdict}</span></div>
  {difference}
</div>"#,
        box_class = box_class,
        reference = escape(&result.external_reference),
        text_class = text_class,
        mark = mark,
        verdict = verdict,
        difference = if divergent {
            format!(
                r#"<div class="debug-summary-item"><strong>Diferença:</strong> <span class="text-danger">{}</span></div>"#,
                brl(result.difference())
            )
        } else {
            String::new()
        },
    );

    let balance = settlement
        .order_balance
        .as_ref()
        .map(|b| {
            format!(
                r#"<p class="info-text">Order Balance: Total Net = {} | Refunded = {} | Chargeback = {}</p>"#,
                brl(b.total_net),
                brl(b.refunded),
                brl(b.chargeback)
            )
        })
        .unwrap_or_default();
    html.push_str(&format!(
        r#"
<div class="debug-section">
<h5>Settlement (Esperado)</h5>
<table class="data-table"><tbody>
{}
{}
{}
</tbody></table>
{}
</div>"#,
        amount_row(
            "Parcelas no Settlement:",
            format!("<strong>{}</strong>", settlement.installments_count),
            ""
        ),
        amount_row("Valor Total Líquido:", brl(result.settlement_total()), ""),
        amount_row(
            "Valor Recebido:",
            format!("<strong>{}</strong>", brl(result.settlement_received())),
            ""
        ),
        balance,
    ));

    let mut release_rows = vec![
        amount_row(
            "Total de Linhas no Releases:",
            format!("<strong>{}</strong>", releases.all_releases_count),
            "",
        ),
        amount_row(
            "Payments Válidos (vendas):",
            format!("<strong>{}</strong>", releases.payments_count),
            "",
        ),
        amount_row(
            "Total de Payments:",
            format!("<strong>{}</strong>", brl(releases.total_payments)),
            "",
        ),
    ];
    if releases.has_refund {
        release_rows.push(
            r#"<tr class="row-warning"><td>Contém REFUND</td><td class="text-right text-warning"><strong>SIM</strong></td></tr>"#.to_string(),
        );
    }
    if releases.has_chargeback {
        release_rows.push(
            r#"<tr class="row-warning"><td>Contém CHARGEBACK</td><td class="text-right text-warning"><strong>SIM</strong></td></tr>"#.to_string(),
        );
    }
    html.push_str(&format!(
        r#"
<div class="debug-section">
<h5>Releases (Arquivo de Liberações)</h5>
<table class="data-table"><tbody>
{}
</tbody></table>
</div>"#,
        release_rows.join("\n")
    ));

    html.push_str(&format!(
        r#"
<div class="debug-section {section}">
<h5>Comparação</h5>
<table class="data-table"><tbody>
{}
{}
<tr class="{row}"><td><strong>Diferença</strong></td><td class="text-right {text}"><strong>{}</strong> {mark}</td></tr>
</tbody></table>
</div>"#,
        amount_row(
            "<strong>Settlement (Recebido)</strong>",
            format!("<strong>{}</strong>", brl(result.settlement_received())),
            ""
        ),
        amount_row(
            "<strong>Releases (Payments)</strong>",
            format!("<strong>{}</strong>", brl(releases.total_payments)),
            ""
        ),
        brl(result.difference()),
        section = if divergent { "section-error" } else { "" },
        row = if divergent { "row-error" } else { "row-success" },
        text = text_class,
        mark = mark,
    ));

    if !settlement.installments.is_empty() {
        let rows = settlement
            .installments
            .iter()
            .map(|inst| {
                format!(
                    r#"<tr><td>{}/{}</td><td><span class="badge {}">{}</span></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
                    inst.installment_number,
                    inst.total_installments,
                    status_class(inst.status),
                    status_label(inst.status),
                    brl(inst.installment_net_amount),
                    inst.received_amount
                        .filter(|r| !r.is_zero())
                        .map(brl)
                        .unwrap_or_else(|| "-".to_string()),
                    date_or_dash(inst.money_release_date.as_deref()),
                    date_or_dash(inst.received_date.as_deref()),
                )
            })
            .collect();
        html.push_str(&format!(
            r#"
<div class="debug-section">
<h5>Detalhes das Parcelas</h5>
{}
</div>"#,
            table(
                &[
                    "Parcela",
                    "Status",
                    "Valor Líquido",
                    "Valor Recebido",
                    "Data Prevista",
                    "Data Recebida"
                ],
                rows
            )
        ));
    }

    if !releases.all_releases.is_empty() {
        let rows = releases
            .all_releases
            .iter()
            .map(|line| {
                let (row_class, badge) = release_badge(line.kind());
                format!(
                    r#"<tr class="{}"><td>{}</td><td><span class="badge {}">{}</span></td><td>{}</td><td class="text-right">{}</td><td class="text-right">{}</td><td class="text-right"><strong>{}</strong></td><td><code>{}</code></td></tr>"#,
                    row_class,
                    date_or_dash(line.settlement_date.as_deref()),
                    badge,
                    text_or_dash(line.description.as_deref()),
                    text_or_dash(line.record_type.as_deref()),
                    positive_or_dash(line.net_credit_amount),
                    positive_or_dash(line.net_debit_amount),
                    brl(line.net()),
                    text_or_dash(line.source_id.as_deref()),
                )
            })
            .collect();
        html.push_str(&format!(
            r#"
<div class="debug-section">
<h5>Todas as Linhas do Releases ({})</h5>
{}
<p class="info-text"><strong>Legenda:</strong>
<span class="badge badge-success">payment</span> = Venda válida (usado na conciliação) |
<span class="badge badge-danger">refund/chargeback</span> = Estorno/Contestação (não usado) |
<span class="badge badge-secondary">outros</span> = Movimentação interna</p>
</div>"#,
            releases.all_releases_count,
            table(
                &["Data", "Descrição", "Tipo", "Crédito", "Débito", "Líquido", "Source ID"],
                rows
            )
        ));
    }

    if !releases.payments.is_empty() {
        let rows = releases
            .payments
            .iter()
            .map(|p| {
                format!(
                    r#"<tr><td>{}</td><td>{}</td><td>{}</td><td><strong>{}</strong></td><td><code>{}</code></td></tr>"#,
                    date_or_dash(p.settlement_date.as_deref()),
                    text_or_dash(p.record_type.as_deref()),
                    brl(p.gross_amount),
                    brl(p.net_credit_amount),
                    text_or_dash(p.source_id.as_deref()),
                )
            })
            .collect();
        html.push_str(&format!(
            r#"
<div class="debug-section">
<h5>Payments Válidos (Usados na Conciliação)</h5>
{}
</div>"#,
            table(
                &["Data", "Tipo", "Valor Bruto", "Valor Líquido", "Source ID"],
                rows
            )
        ));
    } else if result.has_no_valid_payment() {
        html.push_str(&format!(
            r#"
<div class="debug-section section-error">
<h5>Problema: Nenhum Payment Válido</h5>
<p class="text-danger"><strong>O releases tem {} linha(s), mas nenhuma é um "payment" válido!</strong></p>
<p>Todas as linhas são refunds, chargebacks ou outras movimentações que não representam vendas, por isso a parcela aparece como pendente.</p>
</div>"#,
            releases.all_releases_count
        ));
    }

    html.push_str("\n</div>");
    html
}

pub fn analysing() -> String {
    "<p>Analisando...</p>".to_string()
}

fn region(page: &Page, id: &str) -> String {
    format!(
        r#"<div id="{}">{}</div>"#,
        id,
        page.get(id).unwrap_or(NOT_LOADED)
    )
}

fn tab_content(tab: Tab, page: &Page, state: &ViewState) -> String {
    match tab {
        Tab::Dashboard => {
            let cards: String = Summary::default()
                .cards()
                .iter()
                .map(|c| page.get(c.id).map(str::to_string).unwrap_or_else(|| card(c)))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                r#"<div class="cards">{}</div>
<div class="system-info"><h3>Informações do Sistema</h3>{}</div>"#,
                cards,
                region(page, page::SYSTEM_INFO)
            )
        }
        Tab::Cashflow => {
            let (monthly, daily) = match state.cashflow_view {
                Granularity::Monthly => ("block", "none"),
                Granularity::Daily => ("none", "block"),
            };
            format!(
                r#"<div style="display: {}">{}</div>
<div style="display: {}">{}</div>"#,
                monthly,
                region(page, page::CASHFLOW_MONTHLY),
                daily,
                region(page, page::CASHFLOW_DAILY)
            )
        }
        Tab::Transactions => format!(
            r#"<div class="filters">
<select id="{}">{}</select>
<select id="{}">{}</select>
</div>
{}"#,
            page::TRANSACTION_TYPES,
            page.get(page::TRANSACTION_TYPES).unwrap_or_default(),
            page::PAYMENT_METHODS,
            page.get(page::PAYMENT_METHODS).unwrap_or_default(),
            region(page, page::TRANSACTIONS_TABLE)
        ),
        Tab::Reconciliation => region(page, page::RECONCILIATION_REPORT),
        Tab::Debug => region(page, page::DEBUG_RESULTS),
        other => match other.bucket() {
            Some(bucket) => region(page, page::installments_region(bucket)),
            None => String::new(),
        },
    }
}

fn notification(notice: Option<&Notice>) -> String {
    match notice {
        Some(n) => format!(
            r#"<div id="notification" class="notification notification-{} show">{}</div>"#,
            n.kind.as_str(),
            escape(&n.message)
        ),
        None => r#"<div id="notification" class="notification"></div>"#.to_string(),
    }
}

/// Render the whole dashboard as a self-contained HTML document
pub fn page(page: &Page, state: &ViewState, notice: Option<&Notice>) -> String {
    let tabs: String = Tab::ALL
        .iter()
        .map(|tab| {
            let active = if *tab == state.tab { " active" } else { "" };
            format!(
                r#"<button class="tab-button{}" data-tab="{}">{}</button>"#,
                active,
                tab.id(),
                tab.title()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let content: String = Tab::ALL
        .iter()
        .map(|tab| {
            let active = if *tab == state.tab { " active" } else { "" };
            format!(
                r#"<section class="tab-content{}" id="tab-{}">
{}
</section>"#,
                active,
                tab.id(),
                tab_content(*tab, page, state)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let status = page
        .get(page::SYSTEM_STATUS)
        .unwrap_or(r#"<span class="badge badge-secondary">Desconhecido</span>"#);

    TEMPLATE
        .replace("__CSS__", CSS)
        .replace("__STATUS__", status)
        .replace("__NOTIFICATION__", &notification(notice))
        .replace("__TABS__", &tabs)
        .replace("__CONTENT__", &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{InstallmentStatus, Transaction, TransactionGroup};
    use rust_decimal_macros::dec;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn installments_table_shows_count_and_total() {
        let installments = vec![Installment {
            external_reference: "PED-1".to_string(),
            installment_number: 1,
            total_installments: 3,
            installment_net_amount: dec!(100),
            money_release_date: Some("2024-03-05".to_string()),
            status: InstallmentStatus::Pending,
            ..Default::default()
        }];
        let html = installments_table(&installments, "pendentes");
        assert!(html.contains("Parcelas pendentes (1)"));
        assert!(html.contains("Total: R$ 100,00"));
        assert!(html.contains("05/03/2024"));
        assert!(html.contains("badge-warning"));
        assert!(html.contains("1/3"));
    }

    #[test]
    fn empty_table_differs_from_not_loaded() {
        let html = installments_table(&[], "recebidas");
        assert!(html.contains("Nenhum registro encontrado"));
        assert!(!html.contains("Dados não carregados"));

        let page = Page::default();
        assert!(region(&page, "received-table").contains("Dados não carregados"));
    }

    #[test]
    fn unfiltered_groups_are_truncated() {
        let items: Vec<Transaction> = (1..=12)
            .map(|day| Transaction {
                external_reference: format!("T{}", day),
                net_amount: dec!(1),
                date: Some(format!("2024-01-{:02}", day)),
                ..Default::default()
            })
            .collect();
        let mut groups = TransactionGroups::new();
        groups.insert(
            "pix".to_string(),
            TransactionGroup {
                count: 12,
                total_amount: dec!(12),
                transactions: items,
            },
        );

        let preview = transactions_html_count(&transactions(&groups, false));
        let full = transactions_html_count(&transactions(&groups, true));
        assert_eq!(preview, GROUP_PREVIEW_LIMIT);
        assert_eq!(full, 12);
        assert!(transactions(&groups, false).contains("T12"));
        assert!(!transactions(&groups, false).contains("<code>T1</code>"));
    }

    fn transactions_html_count(html: &str) -> usize {
        html.matches("<code>").count()
    }

    #[test]
    fn empty_transaction_groups_render_message() {
        let html = transactions(&TransactionGroups::new(), true);
        assert!(html.contains("Transações Filtradas"));
        assert!(html.contains("Nenhuma transação encontrada"));
    }

    #[test]
    fn divergent_report_shows_difference() {
        let report: ReconciliationReport = serde_json::from_str(
            r#"{"validation": {"installments_vs_payments": {"is_valid": false, "difference": -12.5}}}"#,
        )
        .unwrap();
        let html = reconciliation(&report);
        assert!(html.contains("DIVERGÊNCIA ENCONTRADA"));
        assert!(html.contains("Diferença: R$ 12,50"));
        assert!(!html.contains("Ajustes Aplicados"));
    }

    #[test]
    fn debug_without_valid_payment_explains_problem() {
        let result: DebugReference = serde_json::from_str(
            r#"{
                "external_reference": "PED-9",
                "settlement": {"installments_count": 1, "installments": [
                    {"installment_number": 1, "total_installments": 1, "installment_net_amount": 50, "status": "pending"}
                ]},
                "releases": {"all_releases_count": 1, "all_releases": [
                    {"description": "refund", "net_debit_amount": 50}
                ]}
            }"#,
        )
        .unwrap();
        let html = debug_reference(&result);
        assert!(html.contains("Análise: PED-9"));
        assert!(html.contains("Nenhum Payment Válido"));
        assert!(html.contains("row-warning"));
    }

    #[test]
    fn page_marks_active_tab_and_notification() {
        let state = ViewState {
            tab: Tab::Received,
            ..Default::default()
        };
        let mut notifier = crate::view::notify::Notifier::default();
        notifier.success("3 parcelas encontradas");
        let html = page(&Page::default(), &state, notifier.last());
        assert!(html.contains(r#"class="tab-button active" data-tab="received""#));
        assert!(html.contains(r#"class="tab-content active" id="tab-received""#));
        assert!(html.contains("notification-success show"));
        assert!(!html.contains("__CONTENT__"));
    }
}
