//! Report command - render the dashboard as a standalone HTML page

use super::{connect, FilterArgs};
use crate::api::ClientConfig;
use crate::core::Granularity;
use crate::view::{Controller, NoticeKind, Tab};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ReportCommand {
    /// Tab to open
    #[arg(short, long, value_enum, default_value_t = Tab::Dashboard)]
    tab: Tab,

    /// Show the daily cash flow on the cashflow tab
    #[arg(long)]
    daily: bool,

    /// External reference to analyse on the debug tab
    #[arg(long)]
    reference: Option<String>,

    /// Filter applied to the received or transactions tab
    #[command(flatten)]
    filter: FilterArgs,

    /// Output file path (default: opens in browser)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ReportCommand {
    pub async fn exec(&self, config: &ClientConfig) -> anyhow::Result<()> {
        let mut controller = Controller::new(connect(config)?);
        controller.load_status().await;
        controller.switch_tab(self.tab).await;

        if self.daily {
            controller.switch_cashflow_view(Granularity::Daily);
        }
        if self.tab == Tab::Debug {
            if let Some(reference) = &self.reference {
                controller.debug_reference(reference).await;
            }
        }
        if self.filter.is_set() {
            controller.apply_filter(self.tab, &self.filter.to_input());
        }

        for notice in controller.notifier().history() {
            if notice.kind == NoticeKind::Error {
                eprintln!("{}", notice.message);
            }
        }

        let html = controller.render();
        if let Some(ref output_path) = self.output {
            std::fs::write(output_path, &html)?;
            println!("HTML report written to: {}", output_path.display());
        } else {
            let temp_path = std::env::temp_dir().join("settleview-report.html");
            std::fs::write(&temp_path, &html)?;
            opener::open(&temp_path)?;
            println!("Opened HTML report in browser: {}", temp_path.display());
        }
        Ok(())
    }
}
