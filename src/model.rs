//! The Account entity and its validating decode from client JSON.

use crate::error::AppError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One account record. `id` and `date_joined` are assigned by the store on
/// creation and never change afterwards; `date_joined` serializes as an ISO
/// date string (`YYYY-MM-DD`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone_number: Option<String>,
    pub date_joined: NaiveDate,
}

/// The client-settable subset of an account: everything except `id` and
/// `date_joined`. Used for both create and update payloads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountData {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone_number: Option<String>,
}

impl AccountData {
    /// Decode and validate a client payload. `name`, `email`, and `address`
    /// must be present as strings; `phone_number` may be a string, null, or
    /// absent. Unknown keys (including `id` and `date_joined`) are ignored.
    ///
    /// On failure the error message lists every failing field, not just the
    /// first one.
    pub fn from_value(body: &Value) -> Result<Self, AppError> {
        let obj = body
            .as_object()
            .ok_or_else(|| AppError::BadRequest("body must be a JSON object".into()))?;

        let mut problems = Vec::new();
        let name = required_string(obj, "name", &mut problems);
        let email = required_string(obj, "email", &mut problems);
        let address = required_string(obj, "address", &mut problems);
        let phone_number = optional_string(obj, "phone_number", &mut problems);

        if problems.is_empty() {
            if let (Some(name), Some(email), Some(address)) = (name, email, address) {
                return Ok(Self {
                    name,
                    email,
                    address,
                    phone_number,
                });
            }
        }
        Err(AppError::Validation(format!(
            "invalid account payload: {}",
            problems.join("; ")
        )))
    }
}

fn required_string(
    obj: &Map<String, Value>,
    key: &str,
    problems: &mut Vec<String>,
) -> Option<String> {
    match obj.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Null) | None => {
            problems.push(format!("{key} is required"));
            None
        }
        Some(_) => {
            problems.push(format!("{key} must be a string"));
            None
        }
    }
}

fn optional_string(
    obj: &Map<String, Value>,
    key: &str,
    problems: &mut Vec<String>,
) -> Option<String> {
    match obj.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Null) | None => None,
        Some(_) => {
            problems.push(format!("{key} must be a string"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "name": "John Doe",
            "email": "john@example.com",
            "address": "1 Main St",
            "phone_number": "555 1234"
        })
    }

    #[test]
    fn decodes_valid_payload() {
        let data = AccountData::from_value(&sample()).unwrap();
        assert_eq!(data.name, "John Doe");
        assert_eq!(data.email, "john@example.com");
        assert_eq!(data.address, "1 Main St");
        assert_eq!(data.phone_number.as_deref(), Some("555 1234"));
    }

    #[test]
    fn phone_number_is_optional() {
        let mut body = sample();
        body.as_object_mut().unwrap().remove("phone_number");
        let data = AccountData::from_value(&body).unwrap();
        assert_eq!(data.phone_number, None);

        let body = json!({
            "name": "n", "email": "e", "address": "a", "phone_number": null
        });
        let data = AccountData::from_value(&body).unwrap();
        assert_eq!(data.phone_number, None);
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let err = AccountData::from_value(&json!({"name": "only a name"})).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("email is required"), "{message}");
        assert!(message.contains("address is required"), "{message}");
        assert!(!message.contains("name"), "{message}");
    }

    #[test]
    fn wrong_types_are_rejected() {
        let body = json!({
            "name": 42,
            "email": "e@example.com",
            "address": ["not", "a", "string"],
            "phone_number": 5551234
        });
        let err = AccountData::from_value(&body).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("name must be a string"), "{message}");
        assert!(message.contains("address must be a string"), "{message}");
        assert!(message.contains("phone_number must be a string"), "{message}");
    }

    #[test]
    fn null_required_field_counts_as_missing() {
        let mut body = sample();
        body.as_object_mut()
            .unwrap()
            .insert("email".into(), Value::Null);
        let err = AccountData::from_value(&body).unwrap_err();
        assert!(err.to_string().contains("email is required"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut body = sample();
        let obj = body.as_object_mut().unwrap();
        obj.insert("id".into(), json!(999));
        obj.insert("date_joined".into(), json!("1999-01-01"));
        obj.insert("favorite_color".into(), json!("green"));
        assert!(AccountData::from_value(&body).is_ok());
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = AccountData::from_value(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn account_round_trips_through_json() {
        let account = Account {
            id: 7,
            name: "Jane".into(),
            email: "jane@example.com".into(),
            address: "2 Side St".into(),
            phone_number: None,
            date_joined: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        };
        let encoded = serde_json::to_value(&account).unwrap();
        assert_eq!(encoded["date_joined"], "2024-03-09");
        let decoded: Account = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, account);
    }
}
