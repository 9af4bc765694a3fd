//! Generic delete command

use anyhow::Result;
use clap::Args;
use quantum_client::{ResourceApi, ResourceKind};

use super::CommandOutput;

/// Options shared by every delete command.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct DeleteArgs {
    /// ID or name of the resource to delete
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Delete a resource.
pub trait DeleteCommand: Send + Sync {
    fn resource(&self) -> ResourceKind;

    fn args(&self) -> &DeleteArgs;
}

pub async fn run<C: DeleteCommand + ?Sized>(cmd: &C, api: &dyn ResourceApi) -> Result<CommandOutput> {
    let kind = cmd.resource();
    let args = cmd.args();
    let id = api.find_resource_id(kind, &args.id).await?;
    api.delete(kind, &id).await?;
    Ok(CommandOutput::Message(format!("Deleted {kind}: {}", args.id)))
}
