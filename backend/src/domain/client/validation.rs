//! Schema validation for raw client payloads.
//!
//! Payloads arrive as untyped JSON objects so every field problem can be
//! reported at once instead of failing on the first bad key.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ClientPassword, ClientPatch, NewClient, ReporterPhone};

const WHATSAPP_GROUP_NAME: &str = "whatsappGroupName";
const BID: &str = "bid";
const UID: &str = "uid";
const MTC_GROUP_ID: &str = "mtcGroupID";
const REPORTER_NAME: &str = "reporterName";
const REPORTER_PHONE: &str = "reporterPhone";
const COMP_ID: &str = "compId";
const USER_NAME: &str = "userName";
const PASSWORD: &str = "password";
const APP_GUID: &str = "appGuid";

const KNOWN_FIELDS: [&str; 10] = [
    WHATSAPP_GROUP_NAME,
    BID,
    UID,
    MTC_GROUP_ID,
    REPORTER_NAME,
    REPORTER_PHONE,
    COMP_ID,
    USER_NAME,
    PASSWORD,
    APP_GUID,
];

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Payload key the failure refers to.
    pub field: String,
    /// Human-readable description, quoted in the style `"bid" is required`.
    pub message: String,
}

impl FieldError {
    /// Build an error for `field` with a message suffix.
    pub fn new(field: &str, problem: impl fmt::Display) -> Self {
        Self {
            field: field.to_owned(),
            message: format!("\"{field}\" {problem}"),
        }
    }
}

/// Every field-level failure found in one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientValidationErrors(Vec<FieldError>);

impl ClientValidationErrors {
    /// Wrap collected field errors.
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }

    /// Individual field failures in payload order.
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }
}

impl fmt::Display for ClientValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join(". "))
    }
}

impl std::error::Error for ClientValidationErrors {}

/// Raw client payload as submitted by a caller.
///
/// # Examples
/// ```
/// use client_registry::domain::ClientInput;
/// use serde_json::json;
///
/// let input: ClientInput = serde_json::from_value(json!({ "bid": "five" })).unwrap();
/// let errors = input.validate_patch().unwrap_err();
/// assert_eq!(errors.to_string(), "\"bid\" must be an integer");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientInput(Map<String, Value>);

impl ClientInput {
    /// Wrap an existing JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Add or replace a single field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Validate against the full schema: every required field present.
    pub fn validate_new(&self) -> Result<NewClient, ClientValidationErrors> {
        let patch = self.parse(true)?;
        NewClient::try_from(patch)
    }

    /// Validate only the fields that are present.
    pub fn validate_patch(&self) -> Result<ClientPatch, ClientValidationErrors> {
        self.parse(false)
    }

    fn parse(&self, require_all: bool) -> Result<ClientPatch, ClientValidationErrors> {
        let mut reader = FieldReader {
            fields: &self.0,
            require_all,
            errors: Vec::new(),
        };

        let patch = ClientPatch {
            whatsapp_group_name: reader.text(WHATSAPP_GROUP_NAME, false),
            bid: reader.integer(BID),
            uid: reader.integer(UID),
            mtc_group_id: reader.integer(MTC_GROUP_ID),
            reporter_name: reader.text(REPORTER_NAME, true),
            reporter_phone: reader.phone(REPORTER_PHONE),
            comp_id: reader.text(COMP_ID, true),
            user_name: reader.text(USER_NAME, true),
            password: reader.password(PASSWORD),
            app_guid: reader.text(APP_GUID, true),
        };

        for key in self.0.keys() {
            if !KNOWN_FIELDS.contains(&key.as_str()) {
                reader.errors.push(FieldError::new(key, "is not allowed"));
            }
        }

        if reader.errors.is_empty() {
            Ok(patch)
        } else {
            Err(ClientValidationErrors(reader.errors))
        }
    }
}

impl From<Map<String, Value>> for ClientInput {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
    require_all: bool,
    errors: Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    fn present(&mut self, field: &str, required: bool) -> Option<&'a Value> {
        let fields: &'a Map<String, Value> = self.fields;
        let value = fields.get(field);
        if value.is_none() && required && self.require_all {
            self.errors.push(FieldError::new(field, "is required"));
        }
        value
    }

    fn integer(&mut self, field: &str) -> Option<i64> {
        let value = self.present(field, true)?;
        match value.as_i64() {
            Some(number) => Some(number),
            None => {
                self.errors.push(FieldError::new(field, "must be an integer"));
                None
            }
        }
    }

    fn text(&mut self, field: &str, required: bool) -> Option<String> {
        let value = self.present(field, required)?;
        match value {
            Value::String(text) if text.is_empty() => {
                self.errors
                    .push(FieldError::new(field, "is not allowed to be empty"));
                None
            }
            Value::String(text) => Some(text.clone()),
            _ => {
                self.errors.push(FieldError::new(field, "must be a string"));
                None
            }
        }
    }

    fn phone(&mut self, field: &str) -> Option<ReporterPhone> {
        let text = self.text(field, true)?;
        match ReporterPhone::new(text) {
            Ok(phone) => Some(phone),
            Err(_) => {
                self.errors.push(FieldError::new(
                    field,
                    "must match the format +972 followed by 8-9 digits",
                ));
                None
            }
        }
    }

    fn password(&mut self, field: &str) -> Option<ClientPassword> {
        let text = self.text(field, true)?;
        ClientPassword::new(text).ok()
    }
}

impl TryFrom<ClientPatch> for NewClient {
    type Error = ClientValidationErrors;

    fn try_from(patch: ClientPatch) -> Result<Self, Self::Error> {
        let mut missing = Vec::new();
        let mut require = |present: bool, field: &str| {
            if !present {
                missing.push(FieldError::new(field, "is required"));
            }
        };
        require(patch.bid.is_some(), BID);
        require(patch.uid.is_some(), UID);
        require(patch.mtc_group_id.is_some(), MTC_GROUP_ID);
        require(patch.reporter_name.is_some(), REPORTER_NAME);
        require(patch.reporter_phone.is_some(), REPORTER_PHONE);
        require(patch.comp_id.is_some(), COMP_ID);
        require(patch.user_name.is_some(), USER_NAME);
        require(patch.password.is_some(), PASSWORD);
        require(patch.app_guid.is_some(), APP_GUID);

        let ClientPatch {
            whatsapp_group_name,
            bid,
            uid,
            mtc_group_id,
            reporter_name,
            reporter_phone,
            comp_id,
            user_name,
            password,
            app_guid,
        } = patch;

        match (
            bid,
            uid,
            mtc_group_id,
            reporter_name,
            reporter_phone,
            comp_id,
            user_name,
            password,
            app_guid,
        ) {
            (
                Some(bid),
                Some(uid),
                Some(mtc_group_id),
                Some(reporter_name),
                Some(reporter_phone),
                Some(comp_id),
                Some(user_name),
                Some(password),
                Some(app_guid),
            ) => Ok(NewClient {
                whatsapp_group_name,
                bid,
                uid,
                mtc_group_id,
                reporter_name,
                reporter_phone,
                comp_id,
                user_name,
                password,
                app_guid,
            }),
            _ => Err(ClientValidationErrors(missing)),
        }
    }
}
