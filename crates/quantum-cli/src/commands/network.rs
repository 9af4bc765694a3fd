//! Network commands

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use clap::{ArgAction, Args, Subcommand};
use quantum_client::{CreateNetworkRequest, Record, ResourceApi, ResourceKind, NETWORK};
use quantum_core::query::QueryParams;
use serde_json::Value;
use tracing::debug;

use super::create::{self, CreateArgs, CreateCommand};
use super::delete::{self, DeleteArgs, DeleteCommand};
use super::list::{self, ListArgs, ListCommand};
use super::show::{self, ShowArgs, ShowCommand};
use super::update::{self, UpdateArgs, UpdateCommand};
use super::{CommandOutput, Formatter};

/// Filter added by `net-external-list`.
pub const EXTERNAL_FILTER: &str = "--router:external=True";

/// Network subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum NetworkCommand {
    /// List networks that belong to a given tenant
    #[command(name = "net-list", alias = "network-list")]
    List(ListNetwork),

    /// List external networks that belong to a given tenant
    #[command(name = "net-external-list", alias = "network-list-external")]
    ExternalList(ListExternalNetwork),

    /// Show information of a given network
    #[command(name = "net-show", alias = "network-show")]
    Show(ShowNetwork),

    /// Create a network for a given tenant
    #[command(name = "net-create", alias = "network-create")]
    Create(CreateNetwork),

    /// Delete a given network
    #[command(name = "net-delete", alias = "network-delete")]
    Delete(DeleteNetwork),

    /// Update network's information
    #[command(name = "net-update", alias = "network-update")]
    Update(UpdateNetwork),
}

impl NetworkCommand {
    pub async fn run(self, api: &dyn ResourceApi) -> Result<CommandOutput> {
        match self {
            Self::List(mut cmd) => list::run(&mut cmd, api).await,
            Self::ExternalList(mut cmd) => list::run(&mut cmd, api).await,
            Self::Show(cmd) => show::run(&cmd, api).await,
            Self::Create(cmd) => create::run(&cmd, api).await,
            Self::Delete(cmd) => delete::run(&cmd, api).await,
            Self::Update(cmd) => update::run(&cmd, api).await,
        }
    }
}

/// One `"<id> <cidr>"` line per subnet.
///
/// Anything unexpected in the record yields an empty cell rather than an
/// error; a subnet without a cidr renders as `"<id> "`.
pub fn format_subnets(network: &Record) -> String {
    let Some(subnets) = network.get("subnets").and_then(Value::as_array) else {
        return String::new();
    };
    let mut lines = Vec::with_capacity(subnets.len());
    for subnet in subnets {
        let Some(id) = subnet.get("id").and_then(Value::as_str) else {
            return String::new();
        };
        let cidr = match subnet.get("cidr") {
            None => "",
            Some(Value::String(cidr)) => cidr.as_str(),
            Some(_) => return String::new(),
        };
        lines.push(format!("{id} {cidr}"));
    }
    lines.join("\n")
}

/// Replace the subnet ids of each network with `{id, cidr}` objects.
///
/// Ids unknown to the subnet listing become `{"id": <id>}`. Networks
/// without a `subnets` list are left alone.
pub async fn join_subnets(api: &dyn ResourceApi, data: &mut [Record]) -> Result<()> {
    let query = QueryParams::new().with("fields", "id").with("fields", "cidr");
    let subnets: HashMap<String, Record> = api
        .list_subnets(&query)
        .await?
        .into_iter()
        .filter_map(|subnet| {
            let id = subnet.get("id")?.as_str()?.to_string();
            Some((id, subnet))
        })
        .collect();
    debug!(subnets = subnets.len(), "joining subnets into network list");

    for network in data.iter_mut() {
        let Some(Value::Array(ids)) = network.get_mut("subnets") else {
            continue;
        };
        for entry in ids.iter_mut() {
            let Value::String(id) = entry else {
                continue;
            };
            let joined = match subnets.get(id.as_str()) {
                Some(subnet) => subnet.clone(),
                None => {
                    let mut placeholder = Record::new();
                    placeholder.insert("id".to_string(), Value::String(id.clone()));
                    placeholder
                }
            };
            *entry = Value::Object(joined);
        }
    }
    Ok(())
}

/// `net-list`
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ListNetwork {
    #[command(flatten)]
    pub args: ListArgs,
}

#[async_trait]
impl ListCommand for ListNetwork {
    fn resource(&self) -> ResourceKind {
        NETWORK
    }

    fn args(&self) -> &ListArgs {
        &self.args
    }

    fn args_mut(&mut self) -> &mut ListArgs {
        &mut self.args
    }

    fn list_columns(&self) -> &'static [&'static str] {
        &["id", "name", "subnets"]
    }

    fn formatter(&self, column: &str) -> Option<Formatter> {
        match column {
            "subnets" => Some(format_subnets),
            _ => None,
        }
    }

    async fn extend_list(&self, api: &dyn ResourceApi, data: &mut [Record]) -> Result<()> {
        join_subnets(api, data).await
    }
}

/// `net-external-list`: a network listing restricted to external networks.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ListExternalNetwork {
    #[command(flatten)]
    pub network: ListNetwork,
}

#[async_trait]
impl ListCommand for ListExternalNetwork {
    fn resource(&self) -> ResourceKind {
        self.network.resource()
    }

    fn args(&self) -> &ListArgs {
        self.network.args()
    }

    fn args_mut(&mut self) -> &mut ListArgs {
        self.network.args_mut()
    }

    fn list_columns(&self) -> &'static [&'static str] {
        self.network.list_columns()
    }

    fn formatter(&self, column: &str) -> Option<Formatter> {
        self.network.formatter(column)
    }

    async fn retrieve_list(&mut self, api: &dyn ResourceApi) -> Result<Vec<Record>> {
        let specs = &mut self.args_mut().values_specs;
        if !specs.iter().any(|s| s == EXTERNAL_FILTER) {
            specs.push(EXTERNAL_FILTER.to_string());
        }
        list::retrieve(self.resource(), api, self.args()).await
    }

    async fn extend_list(&self, api: &dyn ResourceApi, data: &mut [Record]) -> Result<()> {
        self.network.extend_list(api, data).await
    }
}

/// `net-show`
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ShowNetwork {
    #[command(flatten)]
    pub args: ShowArgs,
}

impl ShowCommand for ShowNetwork {
    fn resource(&self) -> ResourceKind {
        NETWORK
    }

    fn args(&self) -> &ShowArgs {
        &self.args
    }
}

/// `net-create`
#[derive(Args, Debug, Clone, PartialEq)]
pub struct CreateNetwork {
    /// Set Admin State Up to false
    #[arg(
        long = "admin-state-down",
        alias = "admin_state_down",
        action = ArgAction::SetFalse
    )]
    pub admin_state_up: bool,

    /// Set the network as shared
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub shared: Option<bool>,

    /// Name of network to create
    #[arg(value_name = "NAME")]
    pub name: String,

    #[command(flatten)]
    pub common: CreateArgs,
}

impl CreateCommand for CreateNetwork {
    fn resource(&self) -> ResourceKind {
        NETWORK
    }

    fn common(&self) -> &CreateArgs {
        &self.common
    }

    fn args2body(&self) -> Result<Value> {
        let request = CreateNetworkRequest {
            name: self.name.clone(),
            admin_state_up: self.admin_state_up,
            tenant_id: self.common.tenant_id.clone().filter(|t| !t.is_empty()),
            shared: self.shared,
        };
        Ok(request.into_body()?)
    }
}

/// `net-delete`
#[derive(Args, Debug, Clone, PartialEq)]
pub struct DeleteNetwork {
    #[command(flatten)]
    pub args: DeleteArgs,
}

impl DeleteCommand for DeleteNetwork {
    fn resource(&self) -> ResourceKind {
        NETWORK
    }

    fn args(&self) -> &DeleteArgs {
        &self.args
    }
}

/// `net-update`
#[derive(Args, Debug, Clone, PartialEq)]
pub struct UpdateNetwork {
    #[command(flatten)]
    pub args: UpdateArgs,
}

impl UpdateCommand for UpdateNetwork {
    fn resource(&self) -> ResourceKind {
        NETWORK
    }

    fn args(&self) -> &UpdateArgs {
        &self.args
    }
}
