//! Client record data model.
//!
//! A client ties a messaging group and its reporter to credentials issued by
//! the external billing system. Records are flat; there are no relations.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;
use uuid::Uuid;
use zeroize::Zeroize;

mod listing;
mod validation;

pub use listing::{ClientListQuery, ClientSortField, ListClientsOptions};
pub use validation::{ClientInput, ClientValidationErrors, FieldError};

/// Errors raised when constructing client value objects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientValueError {
    /// The identifier was not a UUID.
    #[error("client id must be a valid UUID")]
    InvalidId,
    /// The phone number did not match the expected national format.
    #[error("reporter phone must match the format +972 followed by 8-9 digits")]
    InvalidPhone,
    /// The password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Stable client identifier assigned by the store on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(Uuid);

impl ClientId {
    /// Parse a client identifier.
    ///
    /// Surrounding whitespace is not trimmed; such input is malformed.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ClientValueError> {
        let id = id.as_ref();
        if id.trim() != id {
            return Err(ClientValueError::InvalidId);
        }
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| ClientValueError::InvalidId)
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ClientId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<ClientId> for String {
    fn from(value: ClientId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for ClientId {
    type Error = ClientValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static PHONE_RE: OnceLock<Regex> = OnceLock::new();

fn phone_regex() -> &'static Regex {
    PHONE_RE.get_or_init(|| {
        Regex::new(r"^\+972\d{8,9}$")
            .unwrap_or_else(|error| panic!("phone regex failed to compile: {error}"))
    })
}

/// Reporter phone number in `+972` international format.
///
/// # Examples
/// ```
/// use client_registry::domain::ReporterPhone;
///
/// assert!(ReporterPhone::new("+972501234567").is_ok());
/// assert!(ReporterPhone::new("0501234567").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReporterPhone(String);

impl ReporterPhone {
    /// Validate and wrap a phone number.
    pub fn new(phone: impl Into<String>) -> Result<Self, ClientValueError> {
        let phone = phone.into();
        if phone_regex().is_match(&phone) {
            Ok(Self(phone))
        } else {
            Err(ClientValueError::InvalidPhone)
        }
    }
}

impl AsRef<str> for ReporterPhone {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<ReporterPhone> for String {
    fn from(value: ReporterPhone) -> Self {
        value.0
    }
}

impl TryFrom<String> for ReporterPhone {
    type Error = ClientValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Password issued by the billing system for a client.
///
/// The buffer is wiped on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientPassword(String);

impl ClientPassword {
    /// Wrap a non-empty password.
    pub fn new(password: impl Into<String>) -> Result<Self, ClientValueError> {
        let password = password.into();
        if password.is_empty() {
            return Err(ClientValueError::EmptyPassword);
        }
        Ok(Self(password))
    }

    /// Borrow the cleartext value.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for ClientPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientPassword(<redacted>)")
    }
}

impl Drop for ClientPassword {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl Serialize for ClientPassword {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.expose())
    }
}

impl<'de> Deserialize<'de> for ClientPassword {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Persisted client record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Store-assigned identifier.
    #[schema(value_type = String, format = Uuid)]
    pub id: ClientId,
    /// Messaging group this client reports for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_group_name: Option<String>,
    /// Billing identifier.
    pub bid: i64,
    /// Billing user identifier.
    pub uid: i64,
    /// Message-centre group identifier.
    #[serde(rename = "mtcGroupID")]
    pub mtc_group_id: i64,
    /// Display name of the reporter.
    pub reporter_name: String,
    /// Reporter phone number.
    #[schema(value_type = String, example = "+972501234567")]
    pub reporter_phone: ReporterPhone,
    /// Company identifier in the billing system.
    pub comp_id: String,
    /// Billing system login name.
    pub user_name: String,
    /// Billing system password.
    #[schema(value_type = String)]
    pub password: ClientPassword,
    /// Application identifier presented to the billing system.
    pub app_guid: String,
    /// Creation time; never changes.
    pub created_at: DateTime<Utc>,
    /// Time of the last mutation.
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Materialise a stored record from validated input.
    pub fn from_new(id: ClientId, new: NewClient, now: DateTime<Utc>) -> Self {
        Self {
            id,
            whatsapp_group_name: new.whatsapp_group_name,
            bid: new.bid,
            uid: new.uid,
            mtc_group_id: new.mtc_group_id,
            reporter_name: new.reporter_name,
            reporter_phone: new.reporter_phone,
            comp_id: new.comp_id,
            user_name: new.user_name,
            password: new.password,
            app_guid: new.app_guid,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a patch into this record and refresh `updated_at`.
    ///
    /// `updated_at` never moves before `created_at`.
    pub fn apply(&mut self, patch: &ClientPatch, now: DateTime<Utc>) {
        if let Some(value) = &patch.whatsapp_group_name {
            self.whatsapp_group_name = Some(value.clone());
        }
        if let Some(value) = patch.bid {
            self.bid = value;
        }
        if let Some(value) = patch.uid {
            self.uid = value;
        }
        if let Some(value) = patch.mtc_group_id {
            self.mtc_group_id = value;
        }
        if let Some(value) = &patch.reporter_name {
            self.reporter_name = value.clone();
        }
        if let Some(value) = &patch.reporter_phone {
            self.reporter_phone = value.clone();
        }
        if let Some(value) = &patch.comp_id {
            self.comp_id = value.clone();
        }
        if let Some(value) = &patch.user_name {
            self.user_name = value.clone();
        }
        if let Some(value) = &patch.password {
            self.password = value.clone();
        }
        if let Some(value) = &patch.app_guid {
            self.app_guid = value.clone();
        }
        self.updated_at = now.max(self.created_at);
    }
}

/// Fully validated candidate for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClient {
    pub whatsapp_group_name: Option<String>,
    pub bid: i64,
    pub uid: i64,
    pub mtc_group_id: i64,
    pub reporter_name: String,
    pub reporter_phone: ReporterPhone,
    pub comp_id: String,
    pub user_name: String,
    pub password: ClientPassword,
    pub app_guid: String,
}

/// Validated partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientPatch {
    pub whatsapp_group_name: Option<String>,
    pub bid: Option<i64>,
    pub uid: Option<i64>,
    pub mtc_group_id: Option<i64>,
    pub reporter_name: Option<String>,
    pub reporter_phone: Option<ReporterPhone>,
    pub comp_id: Option<String>,
    pub user_name: Option<String>,
    pub password: Option<ClientPassword>,
    pub app_guid: Option<String>,
}

impl ClientPatch {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
