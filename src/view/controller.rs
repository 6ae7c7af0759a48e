//! Fetch, store, filter and render, one operation per user action.
//!
//! Every load takes a ticket from [`Generations`] before its request is
//! issued; a response is only applied while its ticket is still current.
//! Failures never clear what a region already shows, they only raise an
//! error notification.

use super::notify::Notifier;
use super::page::{self, Page};
use super::state::{Generations, Tab, Ticket, View, ViewState};
use crate::api::{Api, ApiError, Backend};
use crate::core::transaction::{self, flatten};
use crate::core::{
    filter, filter_transactions, BackendStatus, CashflowRow, DebugReference, FilterCriteria,
    FilterInput, Granularity, Installment, InstallmentBucket, ReconciliationReport, Summary,
    Transaction, TransactionGroups,
};
use crate::render::html;
use chrono::NaiveDate;

/// Transactions as last fetched: the grouped response for the unfiltered
/// rendering and a flat, newest-first list for filtering.
#[derive(Debug, Clone, Default)]
struct LoadedTransactions {
    groups: TransactionGroups,
    all: Vec<Transaction>,
}

pub struct Controller<B> {
    api: Api<B>,
    state: ViewState,
    page: Page,
    generations: Generations,
    notifier: Notifier,
    summary: Option<Summary>,
    received: Option<Vec<Installment>>,
    transactions: Option<LoadedTransactions>,
}

impl<B: Backend> Controller<B> {
    pub fn new(api: Api<B>) -> Self {
        Self {
            api,
            state: ViewState::default(),
            page: Page::default(),
            generations: Generations::default(),
            notifier: Notifier::default(),
            summary: None,
            received: None,
            transactions: None,
        }
    }

    pub fn api(&self) -> &Api<B> {
        &self.api
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    /// Received installments as last fetched
    pub fn received(&self) -> Option<&[Installment]> {
        self.received.as_deref()
    }

    /// Every fetched transaction, newest first
    pub fn transactions(&self) -> Option<&[Transaction]> {
        self.transactions.as_ref().map(|t| t.all.as_slice())
    }

    /// Render the current page as a standalone HTML document
    pub fn render(&self) -> String {
        html::page(
            &self.page,
            &self.state,
            self.notifier.visible(std::time::Instant::now()),
        )
    }

    fn accept(&self, ticket: &Ticket) -> bool {
        let current = self.generations.is_current(ticket);
        if !current {
            log::debug!("discarding stale response for {:?}", ticket.view());
        }
        current
    }

    /// Query backend status and, when data is processed, the summary
    pub async fn load_status(&mut self) {
        let ticket = self.generations.begin(View::Status);
        let result = self.api.status().await;
        self.apply_status(ticket, result).await;
    }

    async fn apply_status(&mut self, ticket: Ticket, result: Result<BackendStatus, ApiError>) {
        if !self.accept(&ticket) {
            return;
        }
        match result {
            Ok(status) => {
                self.state.processed = status.processed;
                self.page.set(page::SYSTEM_STATUS, html::status_badge(&status));
                if status.processed {
                    self.load_summary().await;
                }
            }
            Err(e) => {
                log::debug!("status failed: {}", e);
                self.notifier.error("Erro ao conectar com o servidor");
            }
        }
    }

    /// Ask the backend to process its files, then reload the summary
    pub async fn process(&mut self) {
        self.notifier
            .info("Processando dados... Isso pode levar alguns segundos.");
        match self.api.process().await {
            Ok(outcome) => {
                log::info!(
                    "processed {} orders, {} installments",
                    outcome.settlement.total_orders,
                    outcome.settlement.total_installments
                );
                self.notifier.success("Dados processados com sucesso!");
                self.state.processed = true;
                self.page.set(
                    page::SYSTEM_STATUS,
                    html::status_badge(&BackendStatus {
                        processed: true,
                        ..Default::default()
                    }),
                );
                self.load_summary().await;
            }
            Err(e) => self
                .notifier
                .error(format!("Erro ao processar dados: {}", e)),
        }
    }

    /// Clear the backend cache and every list held here
    pub async fn reset(&mut self) {
        match self.api.reset().await {
            Ok(()) => {
                self.notifier.success("Cache limpo com sucesso!");
                self.state.processed = false;
                self.clear_all_data();
                self.load_status().await;
            }
            Err(e) => {
                log::debug!("reset failed: {}", e);
                self.notifier.error("Erro ao limpar cache");
            }
        }
    }

    fn clear_all_data(&mut self) {
        self.generations.invalidate_all();
        self.summary = None;
        self.received = None;
        self.transactions = None;
        self.state.received_filter = FilterCriteria::default();
        self.state.transaction_filter = FilterCriteria::default();
        for card in Summary::default().cards() {
            self.page.set(card.id, html::card(&card));
        }
        self.page
            .set(page::SYSTEM_INFO, html::system_info_unprocessed());
    }

    /// Load the dashboard summary. Does nothing until data is processed.
    pub async fn load_summary(&mut self) {
        if !self.state.processed {
            log::debug!("data not processed yet, skipping summary");
            return;
        }
        self.notifier.info("Carregando dados...");
        let ticket = self.generations.begin(View::Summary);
        let result = self.api.summary().await;
        if !self.accept(&ticket) {
            return;
        }
        match result {
            Ok(summary) => {
                for card in summary.cards() {
                    self.page.set(card.id, html::card(&card));
                }
                self.page.set(page::SYSTEM_INFO, html::system_info(&summary));
                self.summary = Some(summary);
                self.notifier.hide();
                if self.state.tab != Tab::Dashboard {
                    self.load_tab(self.state.tab).await;
                }
            }
            Err(e) => {
                log::debug!("summary failed: {}", e);
                self.notifier.error("Erro ao carregar dados do resumo");
            }
        }
    }

    /// Make `tab` active and refresh its data when the backend has any
    pub async fn switch_tab(&mut self, tab: Tab) {
        self.state.tab = tab;
        if self.state.processed {
            self.load_tab(tab).await;
        }
    }

    async fn load_tab(&mut self, tab: Tab) {
        match tab {
            Tab::Cashflow => self.load_cashflow(None).await,
            Tab::Transactions => self.load_transactions().await,
            Tab::Reconciliation => self.load_reconciliation().await,
            Tab::Dashboard | Tab::Debug => {}
            other => {
                if let Some(bucket) = other.bucket() {
                    self.load_installments(bucket).await;
                }
            }
        }
    }

    pub fn switch_cashflow_view(&mut self, granularity: Granularity) {
        self.state.cashflow_view = granularity;
    }

    /// Load monthly and daily cash flow concurrently. Each view renders on
    /// its own; one failing does not hold back the other.
    pub async fn load_cashflow(&mut self, start_date: Option<NaiveDate>) {
        let monthly_ticket = self.generations.begin(View::CashflowMonthly);
        let daily_ticket = self.generations.begin(View::CashflowDaily);
        let (monthly, daily) = tokio::join!(
            self.api.cashflow(Granularity::Monthly, None),
            self.api.cashflow(Granularity::Daily, start_date),
        );
        self.apply_cashflow(monthly_ticket, page::CASHFLOW_MONTHLY, monthly, html::monthly_cashflow);
        self.apply_cashflow(daily_ticket, page::CASHFLOW_DAILY, daily, html::daily_cashflow);
    }

    fn apply_cashflow(
        &mut self,
        ticket: Ticket,
        region: &'static str,
        result: Result<Vec<CashflowRow>, ApiError>,
        render: fn(&[CashflowRow]) -> String,
    ) {
        if !self.accept(&ticket) {
            return;
        }
        match result {
            Ok(rows) => self.page.set(region, render(&rows)),
            Err(e) => self.load_failed(e),
        }
    }

    fn load_failed(&mut self, error: ApiError) {
        self.notifier
            .error(format!("Erro ao carregar dados: {}", error));
    }

    pub async fn load_installments(&mut self, bucket: InstallmentBucket) {
        let ticket = self.generations.begin(View::Installments(bucket));
        let result = self.api.installments(bucket).await;
        self.apply_installments(ticket, bucket, result);
    }

    fn apply_installments(
        &mut self,
        ticket: Ticket,
        bucket: InstallmentBucket,
        result: Result<Vec<Installment>, ApiError>,
    ) {
        if !self.accept(&ticket) {
            return;
        }
        match result {
            Ok(installments) => {
                self.page.set(
                    page::installments_region(bucket),
                    html::installments_table(&installments, bucket.label()),
                );
                if bucket == InstallmentBucket::Received {
                    self.state.received_filter = FilterCriteria::default();
                    self.received = Some(installments);
                }
            }
            Err(e) => self.load_failed(e),
        }
    }

    /// Render received installments from an already fetched list
    pub fn show_received(&mut self, installments: Vec<Installment>) {
        let ticket = self
            .generations
            .begin(View::Installments(InstallmentBucket::Received));
        self.apply_installments(ticket, InstallmentBucket::Received, Ok(installments));
    }

    /// Filter the stored received installments without refetching
    pub fn apply_received_filter(&mut self, input: &FilterInput) {
        let Some(installments) = self.received.as_ref().filter(|l| !l.is_empty()) else {
            self.notifier.info("Nenhuma parcela recebida para filtrar");
            return;
        };
        let criteria = FilterCriteria::parse(input);
        let filtered = filter(installments, &criteria);
        self.page.set(
            page::installments_region(InstallmentBucket::Received),
            html::installments_table(&filtered, "recebidas (filtradas)"),
        );
        self.notifier
            .success(format!("{} parcelas encontradas", filtered.len()));
        self.state.received_filter = criteria;
    }

    /// Show the full stored received list again
    pub fn clear_received_filter(&mut self) {
        self.state.received_filter = FilterCriteria::default();
        if let Some(installments) = self.received.as_ref().filter(|l| !l.is_empty()) {
            self.page.set(
                page::installments_region(InstallmentBucket::Received),
                html::installments_table(installments, InstallmentBucket::Received.label()),
            );
            self.notifier.success("Filtros limpos");
        }
    }

    pub async fn load_transactions(&mut self) {
        let ticket = self.generations.begin(View::Transactions);
        let result = self.api.transactions().await;
        self.apply_transactions(ticket, result);
    }

    fn apply_transactions(&mut self, ticket: Ticket, result: Result<TransactionGroups, ApiError>) {
        if !self.accept(&ticket) {
            return;
        }
        match result {
            Ok(groups) => self.store_transactions(groups),
            Err(e) => self.load_failed(e),
        }
    }

    /// Render grouped transactions from an already fetched response
    pub fn show_transactions(&mut self, groups: TransactionGroups) {
        let ticket = self.generations.begin(View::Transactions);
        self.apply_transactions(ticket, Ok(groups));
    }

    fn store_transactions(&mut self, groups: TransactionGroups) {
        let all = flatten(&groups);
        self.page.set(
            page::TRANSACTION_TYPES,
            html::select_options(&transaction::types(&all), None),
        );
        self.page.set(
            page::PAYMENT_METHODS,
            html::select_options(&transaction::payment_methods(&all), None),
        );
        self.page
            .set(page::TRANSACTIONS_TABLE, html::transactions(&groups, false));
        self.state.transaction_filter = FilterCriteria::default();
        self.transactions = Some(LoadedTransactions { groups, all });
    }

    /// Filter the stored transactions and show the matches regrouped by type
    pub fn apply_transaction_filter(&mut self, input: &FilterInput) {
        let Some(loaded) = self.transactions.as_ref().filter(|t| !t.all.is_empty()) else {
            self.notifier.info("Nenhuma transação para filtrar");
            return;
        };
        let criteria = FilterCriteria::parse(input);
        let grouped = filter_transactions(&loaded.all, &criteria);
        let matched: u64 = grouped.values().map(|g| g.count).sum();
        self.page
            .set(page::TRANSACTIONS_TABLE, html::transactions(&grouped, true));
        self.notifier
            .success(format!("{} transações encontradas", matched));
        self.state.transaction_filter = criteria;
    }

    /// Restore the unfiltered grouped rendering from the stored response
    pub fn clear_transaction_filter(&mut self) {
        self.state.transaction_filter = FilterCriteria::default();
        if let Some(loaded) = self.transactions.as_ref().filter(|t| !t.all.is_empty()) {
            self.page.set(
                page::TRANSACTIONS_TABLE,
                html::transactions(&loaded.groups, false),
            );
            self.notifier.success("Filtros limpos");
        }
    }

    /// Apply a filter to the received or transactions view, whichever `tab` is
    pub fn apply_filter(&mut self, tab: Tab, input: &FilterInput) {
        match tab {
            Tab::Received => self.apply_received_filter(input),
            Tab::Transactions => self.apply_transaction_filter(input),
            other => log::warn!("{} has no filters", other.title()),
        }
    }

    pub fn clear_filter(&mut self, tab: Tab) {
        match tab {
            Tab::Received => self.clear_received_filter(),
            Tab::Transactions => self.clear_transaction_filter(),
            other => log::warn!("{} has no filters", other.title()),
        }
    }

    pub async fn load_reconciliation(&mut self) {
        let ticket = self.generations.begin(View::Reconciliation);
        let result = self.api.reconciliation(false).await;
        self.apply_reconciliation(ticket, result);
    }

    fn apply_reconciliation(
        &mut self,
        ticket: Ticket,
        result: Result<ReconciliationReport, ApiError>,
    ) {
        if !self.accept(&ticket) {
            return;
        }
        match result {
            Ok(report) => self
                .page
                .set(page::RECONCILIATION_REPORT, html::reconciliation(&report)),
            Err(e) => self.load_failed(e),
        }
    }

    /// Compare settlement and releases for one external reference. A blank
    /// reference is rejected without contacting the backend.
    pub async fn debug_reference(&mut self, reference: &str) {
        let reference = reference.trim();
        if reference.is_empty() {
            self.notifier
                .error("Digite uma external reference para analisar");
            return;
        }
        let previous = self.page.get(page::DEBUG_RESULTS).map(str::to_string);
        self.page.set(page::DEBUG_RESULTS, html::analysing());

        let ticket = self.generations.begin(View::Debug);
        let result = self.api.debug_reference(reference).await;
        self.apply_debug(ticket, previous, result);
    }

    fn apply_debug(
        &mut self,
        ticket: Ticket,
        previous: Option<String>,
        result: Result<DebugReference, ApiError>,
    ) {
        if !self.accept(&ticket) {
            return;
        }
        match result {
            Ok(found) => {
                self.page
                    .set(page::DEBUG_RESULTS, html::debug_reference(&found));
                self.notifier.success("Análise concluída");
            }
            Err(e) => {
                match previous {
                    Some(html) => self.page.set(page::DEBUG_RESULTS, html),
                    None => self.page.clear(page::DEBUG_RESULTS),
                }
                self.notifier.error(format!("Erro ao analisar: {}", e));
            }
        }
    }
}
