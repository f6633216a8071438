use clap::{Args, Subcommand};

pub mod list;
pub mod remove;
pub mod remove_all;
pub mod save;

use crate::cli::op::Op;

crate::command_enum! {
    (List, list::List),
    (Save, save::Save),
    (Remove, remove::Remove),
    (RemoveAll, remove_all::RemoveAll),
}

// Rename the generated Command to IgfsCommand for clarity
pub type IgfsCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Igfs {
    #[command(subcommand)]
    pub command: IgfsCommand,
}

#[async_trait::async_trait]
impl Op for Igfs {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
