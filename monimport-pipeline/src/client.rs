//! XML-RPC implementation of the remote entity source.
//!
//! Talks to the configuration service's web-service endpoint over HTTP POST.

use crate::error::{ImportError, ImportResult};
use crate::source::{RemoteFile, RemoteSource, SessionToken};
use crate::xmlrpc::{decode_body, decode_response, encode_call};
use async_trait::async_trait;
use monimport_types::{EntityKind, EntityRecord, Tag};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};

/// Encoding directive sent with every scoped call: ask for ISO-8859-1 payloads.
pub const ENCODING_DIRECTIVE: (&str, &str) = ("iso8859", "1");

/// Login procedure.
pub const LOGIN_METHOD: &str = "glpi.doLogin";
/// Child tag listing procedure.
pub const CHILD_TAGS_METHOD: &str = "monitoring.shinkenTags";
/// Configuration file listing procedure.
pub const CONFIG_FILES_METHOD: &str = "monitoring.shinkenGetConffiles";

/// XML-RPC endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XmlRpcConfig {
    /// Endpoint URL.
    pub uri: String,
    /// Per-request timeout (seconds).
    pub timeout_secs: u64,
}

impl Default for XmlRpcConfig {
    fn default() -> Self {
        Self {
            uri: "http://localhost/glpi/plugins/webservices/xmlrpc.php".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Remote source backed by an XML-RPC web service.
pub struct XmlRpcSource {
    config: XmlRpcConfig,
    client: Client,
}

impl XmlRpcSource {
    /// Creates a client for the configured endpoint.
    pub fn new(config: XmlRpcConfig) -> ImportResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ImportError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Returns the endpoint URL.
    pub fn uri(&self) -> &str {
        &self.config.uri
    }

    /// Performs one call with a single struct argument.
    pub async fn call(&self, method: &str, args: Value) -> ImportResult<Value> {
        let body = encode_call(method, &[args]);
        debug!("XML-RPC call {} ({} bytes)", method, body.len());

        let response = self
            .client
            .post(&self.config.uri)
            .header(CONTENT_TYPE, "text/xml")
            .body(body)
            .send()
            .await
            .map_err(|e| ImportError::Network(format!("{method} failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            return Err(ImportError::Network(format!(
                "{method} failed with {status}: {error}"
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImportError::Network(format!("read {method} body failed: {e}")))?;

        decode_response(&decode_body(&bytes)?)
    }

    fn scoped_args(session: &SessionToken, tag: &Tag) -> Value {
        let (directive, flag) = ENCODING_DIRECTIVE;
        let mut args = json!({ "session": session.as_str() });
        args[directive] = json!(flag);
        args["tag"] = json!(tag.as_str());
        args
    }
}

/// Reads a response that should be a list.
///
/// PHP services may send a keyed array (a struct); its member values are
/// taken in order, so an empty struct is an empty list.
fn into_list(value: Value, method: &str) -> ImportResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(members) => Ok(members.into_iter().map(|(_, v)| v).collect()),
        other => Err(ImportError::Protocol(format!(
            "{method} returned a non-list value: {other}"
        ))),
    }
}

#[async_trait]
impl RemoteSource for XmlRpcSource {
    fn source_name(&self) -> &'static str {
        "XML-RPC"
    }

    async fn login(&self, login_name: &str, login_password: &str) -> ImportResult<SessionToken> {
        info!("Connecting to {}", self.config.uri);
        let args = json!({ "login_name": login_name, "login_password": login_password });
        let response = self.call(LOGIN_METHOD, args).await.map_err(|e| match e {
            ImportError::Fault { code, message } => {
                ImportError::Auth(format!("login refused ({code}): {message}"))
            }
            other => other,
        })?;

        match response.get("session") {
            Some(Value::String(token)) if !token.is_empty() => Ok(SessionToken::new(token.clone())),
            Some(Value::Number(n)) => Ok(SessionToken::new(n.to_string())),
            _ => Err(ImportError::Auth("no session in login response".to_string())),
        }
    }

    async fn child_tags(&self, session: &SessionToken, tag: &Tag) -> ImportResult<Vec<Tag>> {
        let response = self
            .call(CHILD_TAGS_METHOD, Self::scoped_args(session, tag))
            .await?;

        Ok(into_list(response, CHILD_TAGS_METHOD)?
            .into_iter()
            .map(|child| match child {
                Value::String(s) => Tag::from(s),
                other => Tag::new(other.to_string()),
            })
            .collect())
    }

    async fn list_entities(
        &self,
        session: &SessionToken,
        kind: EntityKind,
        tag: &Tag,
    ) -> ImportResult<Vec<EntityRecord>> {
        let method = kind.remote_method();
        let response = self.call(method, Self::scoped_args(session, tag)).await?;

        into_list(response, method)?
            .into_iter()
            .map(|item| EntityRecord::try_from(item).map_err(ImportError::from))
            .collect()
    }

    async fn config_files(
        &self,
        session: &SessionToken,
        tag: &Tag,
    ) -> ImportResult<Vec<RemoteFile>> {
        let mut args = Self::scoped_args(session, tag);
        args["file"] = json!("all");
        let response = self.call(CONFIG_FILES_METHOD, args).await?;

        match response {
            Value::Object(files) => Ok(files
                .into_iter()
                .map(|(name, content)| RemoteFile { name, content })
                .collect()),
            Value::Array(items) if items.is_empty() => Ok(Vec::new()),
            other => Err(ImportError::Protocol(format!(
                "{CONFIG_FILES_METHOD} returned a non-struct value: {other}"
            ))),
        }
    }
}
