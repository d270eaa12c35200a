//! The queued mutation record and its parts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::PAYLOAD_SCHEMA_VERSION;

/// Store-assigned key of a queued mutation. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MutationId(pub i64);

impl fmt::Display for MutationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// HTTP verbs the API client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Reads are never queued.
    pub fn is_mutating(self) -> bool {
        MutationMethod::from_http(self).is_some()
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of queued write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MutationMethod {
    Create,
    Update,
    Delete,
    Patch,
}

impl MutationMethod {
    /// POST -> Create, PUT -> Update, DELETE -> Delete, PATCH -> Patch, GET -> None.
    pub fn from_http(method: HttpMethod) -> Option<Self> {
        match method {
            HttpMethod::Post => Some(MutationMethod::Create),
            HttpMethod::Put => Some(MutationMethod::Update),
            HttpMethod::Delete => Some(MutationMethod::Delete),
            HttpMethod::Patch => Some(MutationMethod::Patch),
            HttpMethod::Get => None,
        }
    }

    pub fn to_http(self) -> HttpMethod {
        match self {
            MutationMethod::Create => HttpMethod::Post,
            MutationMethod::Update => HttpMethod::Put,
            MutationMethod::Delete => HttpMethod::Delete,
            MutationMethod::Patch => HttpMethod::Patch,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MutationMethod::Create => "CREATE",
            MutationMethod::Update => "UPDATE",
            MutationMethod::Delete => "DELETE",
            MutationMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for MutationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MutationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(MutationMethod::Create),
            "UPDATE" => Ok(MutationMethod::Update),
            "DELETE" => Ok(MutationMethod::Delete),
            "PATCH" => Ok(MutationMethod::Patch),
            other => Err(format!("unknown mutation method: {other}")),
        }
    }
}

/// Credentials captured when the user took the action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub bearer_token: Option<String>,
}

impl AuthContext {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            bearer_token: Some(token.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

/// Opaque request body. Only the replay boundary decodes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub schema_version: u32,
    pub bytes: Vec<u8>,
}

impl Payload {
    pub fn empty() -> Self {
        Self {
            schema_version: PAYLOAD_SCHEMA_VERSION,
            bytes: Vec::new(),
        }
    }

    pub fn from_json(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(Self {
            schema_version: PAYLOAD_SCHEMA_VERSION,
            bytes: serde_json::to_vec(value)?,
        })
    }

    /// Decode the body. An empty blob decodes to `null`.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        if self.bytes.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_slice(&self.bytes)
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Default for Payload {
    fn default() -> Self {
        Self::empty()
    }
}

/// Input to `DurableQueue::append`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMutation {
    pub method: MutationMethod,
    /// Resource path relative to the API base, e.g. `/patients/1`.
    pub target: String,
    pub payload: Payload,
    pub auth: AuthContext,
    /// Filled with the current time by the store when absent.
    pub enqueued_at: Option<DateTime<Utc>>,
}

impl NewMutation {
    pub fn new(method: MutationMethod, target: impl Into<String>, payload: Payload) -> Self {
        Self {
            method,
            target: target.into(),
            payload,
            auth: AuthContext::default(),
            enqueued_at: None,
        }
    }

    pub fn with_auth(mut self, auth: AuthContext) -> Self {
        self.auth = auth;
        self
    }

    pub fn at(mut self, enqueued_at: DateTime<Utc>) -> Self {
        self.enqueued_at = Some(enqueued_at);
        self
    }
}

/// A mutation persisted in the durable queue.
///
/// Only `attempts` ever changes after the record is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationRecord {
    pub id: MutationId,
    pub method: MutationMethod,
    pub target: String,
    pub payload: Payload,
    pub auth: AuthContext,
    pub enqueued_at: DateTime<Utc>,
    pub attempts: u32,
}
