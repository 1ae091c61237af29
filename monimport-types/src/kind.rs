//! The closed set of entity kinds served by the remote source.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A category of monitoring configuration record.
///
/// Variants are declared in fetch order, so the derived `Ord` matches
/// [`EntityKind::FETCH_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "commands")]
    Commands,
    #[serde(rename = "hosts")]
    Hosts,
    #[serde(rename = "hostgroups")]
    HostGroups,
    #[serde(rename = "servicestemplates")]
    ServiceTemplates,
    #[serde(rename = "services")]
    Services,
    #[serde(rename = "contacts")]
    Contacts,
    #[serde(rename = "timeperiods")]
    TimePeriods,
    #[serde(rename = "hostdependencies")]
    HostDependencies,
    #[serde(rename = "servicedependencies")]
    ServiceDependencies,
}

impl EntityKind {
    /// Every kind, in the order they are fetched for a tag.
    pub const FETCH_ORDER: [EntityKind; 9] = [
        EntityKind::Commands,
        EntityKind::Hosts,
        EntityKind::HostGroups,
        EntityKind::ServiceTemplates,
        EntityKind::Services,
        EntityKind::Contacts,
        EntityKind::TimePeriods,
        EntityKind::HostDependencies,
        EntityKind::ServiceDependencies,
    ];

    /// Key used for this kind in the configuration bundle.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Commands => "commands",
            Self::Hosts => "hosts",
            Self::HostGroups => "hostgroups",
            Self::ServiceTemplates => "servicestemplates",
            Self::Services => "services",
            Self::Contacts => "contacts",
            Self::TimePeriods => "timeperiods",
            Self::HostDependencies => "hostdependencies",
            Self::ServiceDependencies => "servicedependencies",
        }
    }

    /// Remote procedure listing records of this kind for a tag.
    #[must_use]
    pub const fn remote_method(self) -> &'static str {
        match self {
            Self::Commands => "monitoring.shinkenCommands",
            Self::Hosts => "monitoring.shinkenHosts",
            Self::HostGroups => "monitoring.shinkenHostgroups",
            Self::ServiceTemplates => "monitoring.shinkenTemplates",
            Self::Services => "monitoring.shinkenServices",
            Self::Contacts => "monitoring.shinkenContacts",
            Self::TimePeriods => "monitoring.shinkenTimeperiods",
            Self::HostDependencies => "monitoring.shinkenHostDependencies",
            Self::ServiceDependencies => "monitoring.shinkenServiceDependencies",
        }
    }

    /// Field naming a record of this kind in log output.
    ///
    /// Purely cosmetic: deduplication compares whole records.
    #[must_use]
    pub const fn name_field(self) -> &'static str {
        match self {
            Self::Commands => "command_name",
            Self::Hosts => "host_name",
            Self::HostGroups => "hostgroup_name",
            Self::ServiceTemplates => "name",
            Self::Services => "service_description",
            Self::Contacts => "contact_name",
            Self::TimePeriods => "timeperiod_name",
            Self::HostDependencies => "dependent_host_name",
            Self::ServiceDependencies => "dependent_service_description",
        }
    }

    /// Whether this kind survives the template merge as its own bundle key.
    #[must_use]
    pub const fn in_bundle(self) -> bool {
        !matches!(self, Self::ServiceTemplates)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::FETCH_ORDER
            .into_iter()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| Error::UnknownKind(s.to_string()))
    }
}
