//! Asynchronous Quantum API client implementation.

use crate::models::{Record, ResourceKind, NETWORK, SUBNET};
use crate::Result;
use async_trait::async_trait;
use quantum_core::client::{HttpSettings, RetryPolicy};
use quantum_core::config::{QuantumClientConfig, DEFAULT_API_VERSION};
use quantum_core::query::QueryParams;
use quantum_core::Error;
use reqwest::{Client, Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, info};
use url::Url;

const USER_AGENT: &str = concat!("quantum-client/", env!("CARGO_PKG_VERSION"));

/// Resource operations of the networking API.
///
/// The five generic verbs address any [`ResourceKind`]; the named
/// operations are shorthands for the network and subnet resources.
#[async_trait]
pub trait ResourceApi: Send + Sync {
    /// List a collection, following pagination links.
    async fn list(&self, kind: ResourceKind, query: &QueryParams) -> Result<Vec<Record>>;

    /// Fetch a single resource.
    async fn show(&self, kind: ResourceKind, id: &str, query: &QueryParams) -> Result<Record>;

    /// Create a resource from a `{<singular>: {...}}` body.
    async fn create(&self, kind: ResourceKind, body: &Value) -> Result<Record>;

    /// Update a resource from a `{<singular>: {...}}` body.
    async fn update(&self, kind: ResourceKind, id: &str, body: &Value) -> Result<Record>;

    /// Delete a resource.
    async fn delete(&self, kind: ResourceKind, id: &str) -> Result<()>;

    /// Resolve a name or identifier to an identifier.
    ///
    /// An exact identifier match wins; otherwise the name must match
    /// exactly one resource.
    async fn find_resource_id(&self, kind: ResourceKind, name_or_id: &str) -> Result<String> {
        let by_id = QueryParams::new()
            .with("id", name_or_id)
            .with("fields", "id");
        if let Some(id) = self.list(kind, &by_id).await?.first().and_then(record_id) {
            return Ok(id);
        }

        debug!(resource = %kind, name = name_or_id, "no id match, resolving by name");
        let by_name = QueryParams::new()
            .with("name", name_or_id)
            .with("fields", "id");
        let matches = self.list(kind, &by_name).await?;
        match matches.as_slice() {
            [] => Err(Error::NotFound(format!(
                "Unable to find {kind} with name '{name_or_id}'"
            ))),
            [only] => record_id(only).ok_or_else(|| {
                Error::ParseError(format!("{kind} '{name_or_id}' has no id"))
            }),
            _ => Err(Error::NotUnique(format!(
                "Multiple {kind} matches found for name '{name_or_id}', use an ID to be more specific."
            ))),
        }
    }

    /// List networks.
    async fn list_networks(&self, query: &QueryParams) -> Result<Vec<Record>> {
        self.list(NETWORK, query).await
    }

    /// List subnets.
    async fn list_subnets(&self, query: &QueryParams) -> Result<Vec<Record>> {
        self.list(SUBNET, query).await
    }

    /// Fetch a network.
    async fn show_network(&self, id: &str, query: &QueryParams) -> Result<Record> {
        self.show(NETWORK, id, query).await
    }

    /// Create a network.
    async fn create_network(&self, body: &Value) -> Result<Record> {
        self.create(NETWORK, body).await
    }

    /// Update a network.
    async fn update_network(&self, id: &str, body: &Value) -> Result<Record> {
        self.update(NETWORK, id, body).await
    }

    /// Delete a network.
    async fn delete_network(&self, id: &str) -> Result<()> {
        self.delete(NETWORK, id).await
    }
}

fn record_id(record: &Record) -> Option<String> {
    record.get("id").and_then(Value::as_str).map(str::to_string)
}

/// Builder for [`QuantumClient`].
#[derive(Debug, Clone)]
pub struct QuantumClientBuilder {
    endpoint_url: Url,
    api_version: String,
    settings: HttpSettings,
    token: Option<SecretString>,
}

impl QuantumClientBuilder {
    /// Create a new builder from the service endpoint URL.
    pub fn new(endpoint_url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(endpoint_url.as_ref()).map_err(|err| {
            Error::ConfigError(format!(
                "Invalid endpoint URL `{}`: {err}",
                endpoint_url.as_ref()
            ))
        })?;

        Ok(Self {
            endpoint_url: url,
            api_version: DEFAULT_API_VERSION.to_string(),
            settings: HttpSettings::new(),
            token: None,
        })
    }

    /// Create a builder from a validated configuration.
    pub fn from_config(config: &QuantumClientConfig) -> Result<Self> {
        config.check()?;
        let mut builder = Self::new(&config.endpoint_url)?
            .with_api_version(config.api_version.clone())
            .with_http_settings(config.http_settings());
        builder.token = config.token.clone();
        Ok(builder)
    }

    /// Override the API version used as the path prefix.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.settings.retry = retry;
        self
    }

    /// Override the transport settings, retry policy included.
    #[must_use]
    pub fn with_http_settings(mut self, settings: HttpSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Configure the `X-Auth-Token` header.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Skip TLS certificate verification.
    #[must_use]
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.settings.accept_invalid_certs = accept;
        self
    }

    /// Build the client instance.
    pub fn build(self) -> Result<QuantumClient> {
        let http = self.settings.build_http_client(USER_AGENT)?;

        Ok(QuantumClient {
            http,
            endpoint_url: self.endpoint_url,
            version_segment: format!("v{}", self.api_version),
            retry_policy: self.settings.retry,
            token: self.token,
        })
    }
}

/// Asynchronous client for the Quantum networking API.
#[derive(Clone)]
pub struct QuantumClient {
    http: Client,
    endpoint_url: Url,
    version_segment: String,
    retry_policy: RetryPolicy,
    token: Option<SecretString>,
}

impl QuantumClient {
    /// Construct directly from an endpoint URL.
    pub fn new(endpoint_url: impl AsRef<str>) -> Result<Self> {
        QuantumClientBuilder::new(endpoint_url)?.build()
    }

    /// Construct from a validated configuration.
    pub fn from_config(config: &QuantumClientConfig) -> Result<Self> {
        QuantumClientBuilder::from_config(config)?.build()
    }

    /// Access the endpoint URL.
    #[must_use]
    pub fn endpoint_url(&self) -> &Url {
        &self.endpoint_url
    }

    fn build_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.endpoint_url.clone();
        url.set_query(None);
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                Error::InvalidEndpoint(format!(
                    "Endpoint `{}` cannot be a base URL",
                    self.endpoint_url
                ))
            })?;
            path.pop_if_empty().push(&self.version_segment);
            path.extend(segments);
        }
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        query: Option<&QueryParams>,
        body: Option<&Value>,
    ) -> Result<Value> {
        let mut attempt = 0;
        // Only reads are repeated; a retried POST could create twice.
        let max_retries = if method == Method::GET && self.retry_policy.enabled() {
            self.retry_policy.max_retries
        } else {
            0
        };

        loop {
            let mut request = self.http.request(method.clone(), url.clone());
            if let Some(query) = query {
                request = request.query(query.as_pairs());
            }
            if let Some(token) = &self.token {
                request = request.header("X-Auth-Token", token.expose_secret());
            }
            request = request.header("Accept", "application/json");
            if let Some(payload) = body {
                request = request.json(payload);
            }

            info!(%method, path = url.path(), attempt, "Quantum request");

            let error = match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    let bytes = response.bytes().await.map_err(|err| {
                        Error::HttpError(format!("Failed to read response body: {err}"))
                    })?;

                    if status.is_success() {
                        return deserialize_body(url.path(), status, &bytes);
                    }
                    Error::from_status(status, server_message(&bytes))
                }
                Err(err) => Error::from(err),
            };

            if !error.is_transient() || attempt >= max_retries {
                return Err(error);
            }

            attempt += 1;
            let delay = self.retry_policy.backoff(attempt);
            debug!(error = %error, ?delay, "Retrying Quantum request");
            if !delay.is_zero() {
                sleep(delay).await;
            }
        }
    }
}

#[async_trait]
impl ResourceApi for QuantumClient {
    async fn list(&self, kind: ResourceKind, query: &QueryParams) -> Result<Vec<Record>> {
        let mut url = self.build_url(&[kind.plural])?;
        let mut body = self.send(Method::GET, url.clone(), Some(query), None).await?;
        let mut records = Vec::new();

        loop {
            let mut object = into_object(body, kind.plural)?;
            records.extend(take_collection(&mut object, kind.plural)?);

            let Some(next) = next_link(&object, &kind.links_key()) else {
                break;
            };
            let next = Url::parse(&next)?;
            if next == url {
                break;
            }
            debug!(resource = %kind, next = %next, "following pagination link");
            url = next;
            body = self.send(Method::GET, url.clone(), None, None).await?;
        }

        Ok(records)
    }

    async fn show(&self, kind: ResourceKind, id: &str, query: &QueryParams) -> Result<Record> {
        let url = self.build_url(&[kind.plural, id])?;
        let body = self.send(Method::GET, url, Some(query), None).await?;
        take_single(body, kind)
    }

    async fn create(&self, kind: ResourceKind, body: &Value) -> Result<Record> {
        let url = self.build_url(&[kind.plural])?;
        let body = self.send(Method::POST, url, None, Some(body)).await?;
        take_single(body, kind)
    }

    async fn update(&self, kind: ResourceKind, id: &str, body: &Value) -> Result<Record> {
        let url = self.build_url(&[kind.plural, id])?;
        match self.send(Method::PUT, url, None, Some(body)).await? {
            Value::Null => Ok(Record::new()),
            body => take_single(body, kind),
        }
    }

    async fn delete(&self, kind: ResourceKind, id: &str) -> Result<()> {
        let url = self.build_url(&[kind.plural, id])?;
        self.send(Method::DELETE, url, None, None).await.map(|_| ())
    }
}

fn deserialize_body(path: &str, status: StatusCode, bytes: &[u8]) -> Result<Value> {
    if status == StatusCode::NO_CONTENT || bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes)
        .map_err(|err| Error::ParseError(format!("Invalid JSON from `{path}`: {err}")))
}

/// Extract the server's error message from a failed response body.
fn server_message(bytes: &[u8]) -> String {
    if let Ok(Value::Object(object)) = serde_json::from_slice::<Value>(bytes) {
        for key in ["QuantumError", "NeutronError"] {
            match object.get(key) {
                Some(Value::String(message)) => return message.clone(),
                Some(Value::Object(detail)) => {
                    if let Some(Value::String(message)) = detail.get("message") {
                        return message.clone();
                    }
                }
                _ => {}
            }
        }
    }
    String::from_utf8_lossy(bytes).trim().to_string()
}

fn into_object(body: Value, expected: &str) -> Result<Record> {
    match body {
        Value::Object(object) => Ok(object),
        other => Err(Error::ParseError(format!(
            "Expected an object holding `{expected}`, got {other}"
        ))),
    }
}

fn take_collection(object: &mut Record, key: &str) -> Result<Vec<Record>> {
    let Some(Value::Array(items)) = object.remove(key) else {
        return Err(Error::ParseError(format!("Response has no `{key}` list")));
    };
    items
        .into_iter()
        .map(|item| into_object(item, key))
        .collect()
}

fn take_single(body: Value, kind: ResourceKind) -> Result<Record> {
    let mut object = into_object(body, kind.singular)?;
    match object.remove(kind.singular) {
        Some(Value::Object(record)) => Ok(record),
        _ => Err(Error::ParseError(format!(
            "Response has no `{}` object",
            kind.singular
        ))),
    }
}

fn next_link(object: &Record, links_key: &str) -> Option<String> {
    object
        .get(links_key)?
        .as_array()?
        .iter()
        .find(|link| link.get("rel").and_then(Value::as_str) == Some("next"))?
        .get("href")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> QuantumClient {
        QuantumClient::new(server.uri()).unwrap()
    }

    #[tokio::test]
    async fn list_networks_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2.0/networks"))
            .and(header("X-Auth-Token", "tok"))
            .and(query_param("name", "net1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "networks": [
                    {"id": "n1", "name": "net1", "subnets": ["s1"]}
                ]
            })))
            .mount(&server)
            .await;

        let client = QuantumClientBuilder::new(server.uri())
            .unwrap()
            .with_token("tok")
            .build()
            .unwrap();
        let networks = client
            .list_networks(&QueryParams::new().with("name", "net1"))
            .await
            .unwrap();
        assert_eq!(networks.len(), 1);
        assert_eq!(networks[0]["name"], json!("net1"));
    }

    #[tokio::test]
    async fn list_follows_next_links() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2.0/networks"))
            .and(query_param("marker", "n1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "networks": [{"id": "n2"}],
                "networks_links": [{"rel": "previous", "href": "ignored"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2.0/networks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "networks": [{"id": "n1"}],
                "networks_links": [
                    {"rel": "next", "href": format!("{}/v2.0/networks?limit=1&marker=n1", server.uri())}
                ]
            })))
            .mount(&server)
            .await;

        let networks = client(&server)
            .list_networks(&QueryParams::new().with("limit", 1))
            .await
            .unwrap();
        let ids: Vec<_> = networks.iter().map(|n| n["id"].clone()).collect();
        assert_eq!(ids, vec![json!("n1"), json!("n2")]);
    }

    #[tokio::test]
    async fn list_subnets_sends_repeated_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2.0/subnets"))
            .and(query_param("fields", "id"))
            .and(query_param("fields", "cidr"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "subnets": [{"id": "s1", "cidr": "10.0.0.0/24"}]
            })))
            .mount(&server)
            .await;

        let mut query = QueryParams::new();
        query.push_all("fields", ["id", "cidr"]);
        let subnets = client(&server).list_subnets(&query).await.unwrap();
        assert_eq!(subnets[0]["cidr"], json!("10.0.0.0/24"));
    }

    #[tokio::test]
    async fn list_without_collection_key_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2.0/networks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"other": []})))
            .mount(&server)
            .await;

        let err = client(&server)
            .list_networks(&QueryParams::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }

    #[tokio::test]
    async fn show_network_not_found_uses_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2.0/networks/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "QuantumError": "Network missing could not be found"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .show_network("missing", &QueryParams::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::NotFound("Network missing could not be found".to_string())
        );
    }

    #[tokio::test]
    async fn create_network_posts_body() {
        let server = MockServer::start().await;
        let body = json!({"network": {"name": "net1", "admin_state_up": true}});
        Mock::given(method("POST"))
            .and(path("/v2.0/networks"))
            .and(body_json(body.clone()))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "network": {"id": "n1", "name": "net1", "admin_state_up": true}
            })))
            .mount(&server)
            .await;

        let network = client(&server).create_network(&body).await.unwrap();
        assert_eq!(network["id"], json!("n1"));
    }

    #[tokio::test]
    async fn create_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2.0/networks"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = QuantumClientBuilder::new(server.uri())
            .unwrap()
            .with_retry_policy(
                RetryPolicy::none()
                    .with_max_retries(2)
                    .with_delays(Duration::from_millis(1), Duration::from_millis(1)),
            )
            .build()
            .unwrap();
        let err = client
            .create_network(&json!({"network": {"name": "x"}}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn get_is_retried_on_transient_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2.0/networks/n1"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2.0/networks/n1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"network": {"id": "n1"}})),
            )
            .mount(&server)
            .await;

        let client = QuantumClientBuilder::new(server.uri())
            .unwrap()
            .with_retry_policy(
                RetryPolicy::none()
                    .with_max_retries(1)
                    .with_delays(Duration::from_millis(1), Duration::from_millis(1)),
            )
            .build()
            .unwrap();
        let network = client
            .show_network("n1", &QueryParams::new())
            .await
            .unwrap();
        assert_eq!(network["id"], json!("n1"));
    }

    #[tokio::test]
    async fn update_and_delete_network() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v2.0/networks/n1"))
            .and(body_json(json!({"network": {"name": "renamed"}})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"network": {"id": "n1", "name": "renamed"}})),
            )
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v2.0/networks/n1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = client(&server);
        let updated = client
            .update_network("n1", &json!({"network": {"name": "renamed"}}))
            .await
            .unwrap();
        assert_eq!(updated["name"], json!("renamed"));
        client.delete_network("n1").await.unwrap();
    }

    #[tokio::test]
    async fn find_resource_id_by_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2.0/networks"))
            .and(query_param("id", "net1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"networks": []})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2.0/networks"))
            .and(query_param("name", "net1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"networks": [{"id": "n1"}]})),
            )
            .mount(&server)
            .await;

        let id = client(&server)
            .find_resource_id(NETWORK, "net1")
            .await
            .unwrap();
        assert_eq!(id, "n1");
    }

    #[tokio::test]
    async fn find_resource_id_ambiguous_and_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2.0/networks"))
            .and(query_param("id", "dup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"networks": []})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2.0/networks"))
            .and(query_param("name", "dup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "networks": [{"id": "n1"}, {"id": "n2"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2.0/networks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"networks": []})))
            .mount(&server)
            .await;

        let client = client(&server);
        let err = client.find_resource_id(NETWORK, "dup").await.unwrap_err();
        assert!(matches!(err, Error::NotUnique(_)));

        let err = client.find_resource_id(NETWORK, "ghost").await.unwrap_err();
        assert_eq!(
            err,
            Error::NotFound("Unable to find network with name 'ghost'".to_string())
        );
    }

    #[test]
    fn server_message_variants() {
        assert_eq!(server_message(br#"{"QuantumError": "boom"}"#), "boom");
        assert_eq!(
            server_message(br#"{"NeutronError": {"message": "nested"}}"#),
            "nested"
        );
        assert_eq!(server_message(b"plain text\n"), "plain text");
    }

    #[test]
    fn build_url_keeps_endpoint_path() {
        let client = QuantumClient::new("http://controller:9696/networking/").unwrap();
        let url = client.build_url(&["networks", "a b"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://controller:9696/networking/v2.0/networks/a%20b"
        );
    }
}
