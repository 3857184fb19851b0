//! Normalization of the JSON bodies returned by the planning API
//!
//! Every body carries a status (either a human-readable `message` or a `success` flag) and a payload whose field name
//! depends on the endpoint. Success is decided by this status, never by the HTTP status code.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{PlannerError, PlannerResult};

/// How an endpoint reports success
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expect {
    /// The `message` field must be exactly this string
    Status(&'static str),
    /// The `success` field must be `true`
    SuccessFlag,
    /// Anything that does not say `"success": false`
    Accepted,
}

/// A response body whose status has been checked
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    body: Value,
}

impl Envelope {
    /// Check the status of `body`.
    ///
    /// On failure, the error carries the server's `message` if there is one, or `fallback` otherwise.
    pub fn check(body: Value, expect: Expect, fallback: &str) -> PlannerResult<Self> {
        let accepted = match expect {
            Expect::Status(status) => message_of(&body) == Some(status),
            Expect::SuccessFlag => body.get("success").and_then(Value::as_bool) == Some(true),
            Expect::Accepted => body.get("success").and_then(Value::as_bool) != Some(false),
        };

        if accepted {
            Ok(Self { body })
        } else {
            let message = match expect {
                // For status-string endpoints, the message *is* the status, and it is not the expected one
                Expect::Status(_) => fallback.to_string(),
                _ => message_of(&body).unwrap_or(fallback).to_string(),
            };
            Err(PlannerError::Server { message })
        }
    }

    /// The server's message, if any
    pub fn message(&self) -> Option<&str> {
        message_of(&self.body)
    }

    /// Decode the payload stored in `field`
    pub fn payload<T: DeserializeOwned>(&self, field: &str) -> PlannerResult<T> {
        let value = self.body.get(field).cloned().unwrap_or(Value::Null);
        Ok(serde_json::from_value(value)?)
    }

    /// Decode the payload stored in `field`, or `T::default()` when it is missing or null
    pub fn payload_or_default<T: DeserializeOwned + Default>(&self, field: &str) -> PlannerResult<T> {
        match self.body.get(field) {
            None | Some(Value::Null) => Ok(T::default()),
            Some(value) => Ok(serde_json::from_value(value.clone())?),
        }
    }

    pub fn into_body(self) -> Value {
        self.body
    }
}

fn message_of(body: &Value) -> Option<&str> {
    body.get("message").and_then(Value::as_str)
}

/// Parse a raw response body. Bodies that are not JSON become [`PlannerError::Decode`].
pub fn parse_body(text: &str) -> PlannerResult<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(text)?)
}
