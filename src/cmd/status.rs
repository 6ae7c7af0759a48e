//! Status, process and reset commands - backend lifecycle

use super::connect;
use crate::api::ClientConfig;
use clap::Args;

#[derive(Args, Debug)]
pub struct StatusCommand {
    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl StatusCommand {
    pub async fn exec(&self, config: &ClientConfig) -> anyhow::Result<()> {
        let status = connect(config)?.status().await?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&status)?);
            return Ok(());
        }

        let label = if status.processed {
            "Processado"
        } else {
            "Não processado"
        };
        println!("Status:            {}", label);
        println!("Settlement files:  {}", status.settlement_files);
        println!("Recebimentos files: {}", status.recebimentos_files);
        if let Some(version) = &status.version {
            println!("Versão:            {}", version);
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ProcessCommand {}

impl ProcessCommand {
    pub async fn exec(&self, config: &ClientConfig) -> anyhow::Result<()> {
        log::info!("Processando dados... Isso pode levar alguns segundos.");
        let outcome = connect(config)?.process().await?;
        println!("Dados processados com sucesso!");
        println!("Pedidos:   {}", outcome.settlement.total_orders);
        println!("Parcelas:  {}", outcome.settlement.total_installments);
        println!("Payments:  {}", outcome.releases.total_payments);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ResetCommand {}

impl ResetCommand {
    pub async fn exec(&self, config: &ClientConfig) -> anyhow::Result<()> {
        connect(config)?.reset().await?;
        println!("Cache limpo com sucesso!");
        Ok(())
    }
}
