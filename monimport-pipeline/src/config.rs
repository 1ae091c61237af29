//! Import configuration.
//!
//! Loaded from TOML; every field has a default so a partial file works.
//!
//! ```toml
//! uri = "https://glpi.example.org/plugins/webservices/xmlrpc.php"
//! login_name = "shinken"
//! login_password = "secret"
//! tags = "siteA, siteB"
//! mode = "files"
//! target_directory = "/etc/shinken/glpi"
//!
//! [strip]
//! hosts = ["_ITEMSID"]
//! ```

use crate::client::XmlRpcConfig;
use crate::error::{ImportError, ImportResult};
use crate::policy::AttributeFilter;
use crate::sink::FileEncoding;
use monimport_types::Tag;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Where the import result goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Return the merged bundle to the caller.
    #[default]
    Bundle,
    /// Write the remote configuration files to the target directory.
    Files,
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundle => f.write_str("bundle"),
            Self::Files => f.write_str("files"),
        }
    }
}

impl FromStr for OutputMode {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "bundle" => Ok(Self::Bundle),
            "files" => Ok(Self::Files),
            other => Err(ImportError::Config(format!("unknown output mode: {other}"))),
        }
    }
}

/// Configuration for one import run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// XML-RPC endpoint URL.
    pub uri: String,
    /// Login name.
    pub login_name: String,
    /// Login password.
    pub login_password: String,
    /// Legacy single tag, used only when `tags` yields nothing.
    pub tag: String,
    /// Comma-separated root tags.
    pub tags: String,
    /// Output mode.
    pub mode: OutputMode,
    /// Directory receiving files in file mode.
    pub target_directory: PathBuf,
    /// Encoding of files written in file mode.
    pub encoding: FileEncoding,
    /// Per-request timeout (seconds).
    pub timeout_secs: u64,
    /// Fields stripped from records before deduplication.
    pub strip: AttributeFilter,
}

impl Default for ImportConfig {
    fn default() -> Self {
        let endpoint = XmlRpcConfig::default();
        Self {
            uri: endpoint.uri,
            login_name: "shinken".to_string(),
            login_password: "shinken".to_string(),
            tag: String::new(),
            tags: String::new(),
            mode: OutputMode::default(),
            target_directory: PathBuf::from("/tmp/monimport"),
            encoding: FileEncoding::default(),
            timeout_secs: endpoint.timeout_secs,
            strip: AttributeFilter::default(),
        }
    }
}

impl ImportConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(toml_str: &str) -> ImportResult<Self> {
        toml::from_str(toml_str).map_err(|e| ImportError::Config(e.to_string()))
    }

    /// Reads and parses a TOML file.
    pub fn load(path: &Path) -> ImportResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ImportError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    /// Root tags: `tags` when it yields any, else the legacy `tag`.
    #[must_use]
    pub fn root_tags(&self) -> Vec<Tag> {
        Tag::roots(&self.tags, &self.tag)
    }

    /// Endpoint settings for the XML-RPC client.
    #[must_use]
    pub fn endpoint(&self) -> XmlRpcConfig {
        XmlRpcConfig {
            uri: self.uri.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}
