//! Wire models for networks and subnets.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A decoded JSON object as returned by the API.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Names of an API resource.
///
/// The singular name keys single-object bodies (`{"network": {...}}`); the
/// plural names both the collection path and the list body key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceKind {
    /// Singular resource name.
    pub singular: &'static str,
    /// Collection name.
    pub plural: &'static str,
}

impl ResourceKind {
    /// Body key of the pagination links for this collection.
    #[must_use]
    pub fn links_key(&self) -> String {
        format!("{}_links", self.plural)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.singular)
    }
}

/// The network resource.
pub const NETWORK: ResourceKind = ResourceKind {
    singular: "network",
    plural: "networks",
};

/// The subnet resource.
pub const SUBNET: ResourceKind = ResourceKind {
    singular: "subnet",
    plural: "subnets",
};

/// Network representation returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Network {
    /// Network identifier.
    pub id: String,
    /// Network name.
    #[serde(default)]
    pub name: String,
    /// Administrative state.
    #[serde(default = "default_admin_state_up")]
    pub admin_state_up: bool,
    /// Whether the network is shared across tenants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared: Option<bool>,
    /// Owning tenant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    /// Operational status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Identifiers of the subnets on this network.
    #[serde(default)]
    pub subnets: Vec<String>,
    /// Whether the network is externally routable.
    #[serde(
        rename = "router:external",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub router_external: Option<bool>,
}

const fn default_admin_state_up() -> bool {
    true
}

/// Subnet representation returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subnet {
    /// Subnet identifier.
    pub id: String,
    /// Address range in CIDR notation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    /// Subnet name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Network the subnet belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
    /// IP version (4 or 6).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_version: Option<u8>,
    /// Default gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_ip: Option<String>,
    /// Owning tenant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

/// Request payload to create a network.
///
/// `tenant_id` and `shared` are omitted when unset so the server applies
/// its own defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateNetworkRequest {
    /// Network name.
    pub name: String,
    /// Administrative state.
    pub admin_state_up: bool,
    /// Owning tenant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    /// Shared flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared: Option<bool>,
}

impl CreateNetworkRequest {
    /// Wrap the payload under the `network` key.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized.
    pub fn into_body(self) -> crate::Result<serde_json::Value> {
        let inner = serde_json::to_value(self)?;
        Ok(serde_json::json!({ NETWORK.singular: inner }))
    }
}
