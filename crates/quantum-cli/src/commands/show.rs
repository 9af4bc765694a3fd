//! Generic show command

use anyhow::Result;
use clap::Args;
use quantum_client::{ResourceApi, ResourceKind};
use quantum_core::query::QueryParams;

use super::CommandOutput;

/// Options shared by every show command.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ShowArgs {
    /// ID or name of the resource to look up
    #[arg(value_name = "ID")]
    pub id: String,

    /// Show detailed information
    #[arg(short = 'D', long)]
    pub show_details: bool,

    /// Field to return from the server, can be repeated
    #[arg(short = 'F', long = "field", value_name = "FIELD")]
    pub fields: Vec<String>,
}

/// Display a single resource.
pub trait ShowCommand: Send + Sync {
    fn resource(&self) -> ResourceKind;

    fn args(&self) -> &ShowArgs;
}

/// Resolve the name or id, then fetch and show the resource.
pub async fn run<C: ShowCommand + ?Sized>(cmd: &C, api: &dyn ResourceApi) -> Result<CommandOutput> {
    let kind = cmd.resource();
    let args = cmd.args();
    let id = api.find_resource_id(kind, &args.id).await?;

    let mut query = QueryParams::new();
    query.push_all("fields", &args.fields);
    if args.show_details {
        query.push("verbose", "True");
    }
    let record = api.show(kind, &id, &query).await?;
    Ok(CommandOutput::Record {
        heading: None,
        record,
    })
}
