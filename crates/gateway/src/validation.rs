//! Payloads accepted by the gateway and the checks they must pass before
//! anything reaches the server.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::GatewayError;

pub trait Validate {
    fn validate(&self) -> Result<(), GatewayError>;
}

fn not_blank(field: &str, value: Option<&str>) -> Result<(), GatewayError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(GatewayError::validation(format!("{field} must not be blank"))),
    }
}

/// `local@domain`, no whitespace, domain not starting or ending with a dot.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

fn email_ok(email: &str) -> Result<(), GatewayError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(GatewayError::validation(format!("{email} is not a valid email")))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserCreate {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Validate for UserCreate {
    fn validate(&self) -> Result<(), GatewayError> {
        not_blank("name", self.name.as_deref())?;
        not_blank("email", self.email.as_deref())?;
        email_ok(self.email.as_deref().unwrap_or_default())
    }
}

/// Partial update: only the fields present are checked and forwarded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Validate for UserUpdate {
    fn validate(&self) -> Result<(), GatewayError> {
        if let Some(name) = &self.name {
            not_blank("name", Some(name))?;
        }
        if let Some(email) = &self.email {
            email_ok(email)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCreate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<i64>,
}

impl Validate for ItemCreate {
    fn validate(&self) -> Result<(), GatewayError> {
        not_blank("name", self.name.as_deref())?;
        not_blank("description", self.description.as_deref())?;
        if self.available.is_none() {
            return Err(GatewayError::validation("available must be set"));
        }
        Ok(())
    }
}

/// Partial item update. The server enforces ownership.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

impl Validate for ItemUpdate {
    fn validate(&self) -> Result<(), GatewayError> {
        if let Some(name) = &self.name {
            not_blank("name", Some(name))?;
        }
        if let Some(description) = &self.description {
            not_blank("description", Some(description))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentCreate {
    pub text: Option<String>,
}

impl Validate for CommentCreate {
    fn validate(&self) -> Result<(), GatewayError> {
        not_blank("text", self.text.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestCreate {
    pub description: Option<String>,
}

impl Validate for RequestCreate {
    fn validate(&self) -> Result<(), GatewayError> {
        not_blank("description", self.description.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreate {
    pub item_id: Option<i64>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl BookingCreate {
    /// Period checks against `now`. Ordering of start and end is left to the
    /// server.
    pub fn validate_at(&self, now: NaiveDateTime) -> Result<(), GatewayError> {
        if self.item_id.is_none() {
            return Err(GatewayError::validation("itemId must be set"));
        }
        let start = self.start.ok_or_else(|| GatewayError::validation("start must be set"))?;
        let end = self.end.ok_or_else(|| GatewayError::validation("end must be set"))?;
        if start < now {
            return Err(GatewayError::validation("start must not be in the past"));
        }
        if end <= now {
            return Err(GatewayError::validation("end must be in the future"));
        }
        Ok(())
    }
}

impl Validate for BookingCreate {
    fn validate(&self) -> Result<(), GatewayError> {
        self.validate_at(chrono::Local::now().naive_local())
    }
}

/// `approved` must be literally `true` or `false`.
pub fn parse_approved(raw: Option<&str>) -> Result<bool, GatewayError> {
    match raw.map(str::trim) {
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(other) => Err(GatewayError::validation(format!("approved must be true or false, got {other}"))),
        None => Err(GatewayError::validation("approved must be set")),
    }
}
