//! Remote entity source abstraction.
//!
//! Defines the narrow contract the pipeline needs from the remote
//! configuration service, so the resolver, fetcher and sink can work with
//! the XML-RPC client or an in-memory stand-in.

use crate::error::ImportResult;
use async_trait::async_trait;
use monimport_types::{EntityKind, EntityRecord, Tag};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Session token returned by the remote login call.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens end up in logs; only show a prefix.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown: String = self.0.chars().take(6).collect();
        write!(f, "SessionToken({shown}…)")
    }
}

/// A configuration file served by the remote source for a tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteFile {
    /// File name as given by the remote side.
    pub name: String,
    /// Raw content value; text is expected, anything else fails to encode.
    pub content: Value,
}

impl RemoteFile {
    /// Creates a text file.
    #[must_use]
    pub fn text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Value::String(content.into()),
        }
    }
}

/// The remote configuration service.
///
/// Every call except `login` is scoped by a session and a tag. Calls are
/// independent; errors are returned to the caller untouched.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Returns a short name for the source, used in logs.
    fn source_name(&self) -> &'static str;

    /// Authenticates and returns a session token.
    async fn login(&self, login_name: &str, login_password: &str) -> ImportResult<SessionToken>;

    /// Lists the direct child tags of a tag (empty for a leaf).
    async fn child_tags(&self, session: &SessionToken, tag: &Tag) -> ImportResult<Vec<Tag>>;

    /// Lists the records of one kind visible under a tag.
    async fn list_entities(
        &self,
        session: &SessionToken,
        kind: EntityKind,
        tag: &Tag,
    ) -> ImportResult<Vec<EntityRecord>>;

    /// Lists every configuration file published for a tag.
    async fn config_files(&self, session: &SessionToken, tag: &Tag)
    -> ImportResult<Vec<RemoteFile>>;
}

/// An in-memory source for testing.
pub mod mock {
    use super::*;
    use crate::error::ImportError;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    /// A call observed by [`MockSource`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum MockCall {
        Login(String),
        ChildTags(Tag),
        ListEntities(EntityKind, Tag),
        ConfigFiles(Tag),
    }

    /// Scripted remote source that records every call it receives.
    #[derive(Debug, Default)]
    pub struct MockSource {
        session: Option<String>,
        children: HashMap<Tag, Vec<Tag>>,
        entities: HashMap<(Tag, EntityKind), Vec<EntityRecord>>,
        files: HashMap<Tag, Vec<RemoteFile>>,
        failing: HashSet<(Tag, EntityKind)>,
        calls: Mutex<Vec<MockCall>>,
    }

    impl MockSource {
        /// A source whose login succeeds with the given token.
        pub fn new(session: impl Into<String>) -> Self {
            Self {
                session: Some(session.into()),
                ..Default::default()
            }
        }

        /// A source whose login always fails.
        pub fn rejecting_login() -> Self {
            Self::default()
        }

        /// Declares the children of a tag.
        pub fn with_children(mut self, tag: &str, children: &[&str]) -> Self {
            self.children
                .insert(Tag::from(tag), children.iter().copied().map(Tag::from).collect());
            self
        }

        /// Declares the records of a kind under a tag.
        pub fn with_entities(mut self, tag: &str, kind: EntityKind, records: Vec<EntityRecord>) -> Self {
            self.entities.insert((Tag::from(tag), kind), records);
            self
        }

        /// Makes listing a kind under a tag fail.
        pub fn with_failure(mut self, tag: &str, kind: EntityKind) -> Self {
            self.failing.insert((Tag::from(tag), kind));
            self
        }

        /// Declares the configuration files of a tag.
        pub fn with_files(mut self, tag: &str, files: Vec<RemoteFile>) -> Self {
            self.files.insert(Tag::from(tag), files);
            self
        }

        /// Every call received so far, in order.
        pub fn calls(&self) -> Vec<MockCall> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }

        /// Number of entity listing calls received so far.
        pub fn entity_calls(&self) -> usize {
            self.calls()
                .iter()
                .filter(|c| matches!(c, MockCall::ListEntities(..)))
                .count()
        }

        fn record(&self, call: MockCall) {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(call);
            }
        }

        fn check_session(&self, session: &SessionToken) -> ImportResult<()> {
            match &self.session {
                Some(expected) if expected == session.as_str() => Ok(()),
                _ => Err(ImportError::NotAuthenticated),
            }
        }
    }

    #[async_trait]
    impl RemoteSource for MockSource {
        fn source_name(&self) -> &'static str {
            "Mock"
        }

        async fn login(&self, login_name: &str, _login_password: &str) -> ImportResult<SessionToken> {
            self.record(MockCall::Login(login_name.to_string()));
            self.session
                .clone()
                .map(SessionToken::new)
                .ok_or_else(|| ImportError::Auth("login rejected".to_string()))
        }

        async fn child_tags(&self, session: &SessionToken, tag: &Tag) -> ImportResult<Vec<Tag>> {
            self.record(MockCall::ChildTags(tag.clone()));
            self.check_session(session)?;
            Ok(self.children.get(tag).cloned().unwrap_or_default())
        }

        async fn list_entities(
            &self,
            session: &SessionToken,
            kind: EntityKind,
            tag: &Tag,
        ) -> ImportResult<Vec<EntityRecord>> {
            self.record(MockCall::ListEntities(kind, tag.clone()));
            self.check_session(session)?;
            if self.failing.contains(&(tag.clone(), kind)) {
                return Err(ImportError::Fault {
                    code: 500,
                    message: format!("{} unavailable for {tag}", kind.remote_method()),
                });
            }
            Ok(self
                .entities
                .get(&(tag.clone(), kind))
                .cloned()
                .unwrap_or_default())
        }

        async fn config_files(
            &self,
            session: &SessionToken,
            tag: &Tag,
        ) -> ImportResult<Vec<RemoteFile>> {
            self.record(MockCall::ConfigFiles(tag.clone()));
            self.check_session(session)?;
            Ok(self.files.get(tag).cloned().unwrap_or_default())
        }
    }
}
