//! Generic update command

use anyhow::{bail, Result};
use clap::Args;
use quantum_client::{ResourceApi, ResourceKind};
use serde_json::{Map, Value};

use super::CommandOutput;
use crate::specs::parse_args_to_dict;

/// Options shared by every update command.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct UpdateArgs {
    /// ID or name of the resource to update
    #[arg(value_name = "ID")]
    pub id: String,

    /// New values as --key=value or --key value
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "ATTRIBUTES"
    )]
    pub values_specs: Vec<String>,
}

/// Update a resource with free-form values.
pub trait UpdateCommand: Send + Sync {
    fn resource(&self) -> ResourceKind;

    fn args(&self) -> &UpdateArgs;
}

pub async fn run<C: UpdateCommand + ?Sized>(cmd: &C, api: &dyn ResourceApi) -> Result<CommandOutput> {
    let kind = cmd.resource();
    let args = cmd.args();
    let values = parse_args_to_dict(&args.values_specs)?;
    if values.is_empty() {
        bail!("Must specify new values to update {kind}");
    }

    let id = api.find_resource_id(kind, &args.id).await?;
    let mut body = Map::new();
    body.insert(kind.singular.to_string(), Value::Object(values));
    api.update(kind, &id, &Value::Object(body)).await?;
    Ok(CommandOutput::Message(format!("Updated {kind}: {}", args.id)))
}
