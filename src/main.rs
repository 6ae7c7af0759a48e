use clap::{Parser, Subcommand};
use settleview::api::{ClientConfig, MovementKind, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
use settleview::cmd::{
    cashflow::CashflowCommand,
    debug::DebugCommand,
    installments::InstallmentsCommand,
    movements::MovementsCommand,
    reconciliation::ReconciliationCommand,
    report::ReportCommand,
    schema::SchemaCommand,
    status::{ProcessCommand, ResetCommand, StatusCommand},
    summary::SummaryCommand,
    transactions::TransactionsCommand,
};

#[derive(Parser, Debug)]
#[command(
    name = "settleview",
    version,
    about = "Settlement reconciliation viewer for Mercado Pago backends"
)]
struct Cli {
    /// Base URL of the reconciliation backend
    #[arg(long, global = true, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show whether the backend has processed data
    Status(StatusCommand),
    /// Process settlement and release files on the backend
    Process(ProcessCommand),
    /// Clear the backend cache
    Reset(ResetCommand),
    /// Dashboard totals
    Summary(SummaryCommand),
    /// Amounts to receive per month or day
    Cashflow(CashflowCommand),
    /// List installments by status
    Installments(InstallmentsCommand),
    /// List transactions grouped by type
    Transactions(TransactionsCommand),
    /// Reconciliation report
    Reconciliation(ReconciliationCommand),
    /// Analyse one external reference
    Debug(DebugCommand),
    /// List payouts
    Payouts(MovementsCommand),
    /// List advance fees
    AdvanceFees(MovementsCommand),
    /// Render the dashboard as an HTML page
    Report(ReportCommand),
    /// Print the JSON schema of a backend payload
    Schema(SchemaCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let config = ClientConfig {
        base_url: cli.api_url,
        timeout_secs: cli.timeout,
    };
    log::debug!("using backend at {}", config.base_url);

    match cli.command {
        Command::Status(cmd) => cmd.exec(&config).await,
        Command::Process(cmd) => cmd.exec(&config).await,
        Command::Reset(cmd) => cmd.exec(&config).await,
        Command::Summary(cmd) => cmd.exec(&config).await,
        Command::Cashflow(cmd) => cmd.exec(&config).await,
        Command::Installments(cmd) => cmd.exec(&config).await,
        Command::Transactions(cmd) => cmd.exec(&config).await,
        Command::Reconciliation(cmd) => cmd.exec(&config).await,
        Command::Debug(cmd) => cmd.exec(&config).await,
        Command::Payouts(cmd) => cmd.exec(&config, MovementKind::Payouts).await,
        Command::AdvanceFees(cmd) => cmd.exec(&config, MovementKind::AdvanceFees).await,
        Command::Report(cmd) => cmd.exec(&config).await,
        Command::Schema(cmd) => cmd.exec(),
    }
}
