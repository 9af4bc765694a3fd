//! Generic create command

use anyhow::{anyhow, Result};
use clap::Args;
use quantum_client::{ResourceApi, ResourceKind};
use serde_json::Value;

use super::CommandOutput;
use crate::specs::parse_args_to_dict;

/// Options shared by every create command.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct CreateArgs {
    /// The owner tenant ID
    #[arg(long = "tenant-id", alias = "tenant_id", value_name = "TENANT_ID")]
    pub tenant_id: Option<String>,

    /// Extra attributes as --key=value or --key value
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "ATTRIBUTES"
    )]
    pub values_specs: Vec<String>,
}

/// Create a resource from parsed arguments.
pub trait CreateCommand: Send + Sync {
    fn resource(&self) -> ResourceKind;

    fn common(&self) -> &CreateArgs;

    /// Request body from the known options, wrapped under the singular name.
    fn args2body(&self) -> Result<Value>;
}

/// Build the body, merge free-form attributes and send it.
///
/// Free-form attributes override known options of the same name.
pub async fn run<C: CreateCommand + ?Sized>(cmd: &C, api: &dyn ResourceApi) -> Result<CommandOutput> {
    let kind = cmd.resource();
    let mut body = cmd.args2body()?;
    let extra = parse_args_to_dict(&cmd.common().values_specs)?;
    if !extra.is_empty() {
        let inner = body
            .get_mut(kind.singular)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| anyhow!("{kind} body is not an object"))?;
        inner.extend(extra);
    }

    let record = api.create(kind, &body).await?;
    Ok(CommandOutput::Record {
        heading: Some(format!("Created a new {kind}:")),
        record,
    })
}
