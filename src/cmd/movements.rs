//! Payouts and advance-fees commands - money debited from the account

use super::{connect, OutputArgs};
use crate::api::{ClientConfig, MovementKind};
use crate::core::brl;
use crate::render::table::MovementRow;
use clap::Args;

#[derive(Args, Debug)]
pub struct MovementsCommand {
    #[command(flatten)]
    output: OutputArgs,
}

impl MovementsCommand {
    pub async fn exec(&self, config: &ClientConfig, kind: MovementKind) -> anyhow::Result<()> {
        let list = connect(config)?.movements(kind).await?;
        let rows: Vec<MovementRow> = list.items.iter().map(MovementRow::from).collect();
        if self.output.emit(&rows, &list.items, 2, "Nenhuma movimentação")? {
            println!("{}: {} ({})", kind.title(), brl(list.total_amount), rows.len());
        }
        Ok(())
    }
}
