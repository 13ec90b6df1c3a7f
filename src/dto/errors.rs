//! Wire shapes of error responses.

use chrono::{DateTime, Utc};
use heck::ToLowerCamelCase;
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

/// A single field that failed validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldMessage {
    pub field_name: String,
    pub message: String,
}

impl FieldMessage {
    pub fn new(field_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            message: message.into(),
        }
    }
}

/// Body returned with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub path: String,
    /// Present only for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldMessage>>,
}

/// Flattens `validator` output into one message per failed rule, keyed by the
/// JSON field name and sorted for stable responses.
pub fn field_messages(errors: &ValidationErrors) -> Vec<FieldMessage> {
    let mut messages: Vec<FieldMessage> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            let field_name = field.to_string().to_lower_camel_case();
            field_errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                FieldMessage::new(field_name.clone(), message)
            })
        })
        .collect();

    messages.sort_by(|a, b| a.field_name.cmp(&b.field_name));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn reports_json_field_names() {
        let mut errors = ValidationErrors::new();
        errors.add("birth_date", ValidationError::new("past_or_present"));
        errors.add("name", ValidationError::new("required"));

        let names: Vec<_> = field_messages(&errors)
            .into_iter()
            .map(|m| m.field_name)
            .collect();
        assert_eq!(names, vec!["birthDate", "name"]);
    }

    #[test]
    fn flattens_validation_errors_with_messages() {
        let mut errors = ValidationErrors::new();
        let mut blank = ValidationError::new("blank");
        blank.message = Some("Campo requerido".into());
        errors.add("name", blank);
        errors.add("birth_date", ValidationError::new("future_date"));

        let messages = field_messages(&errors);
        assert_eq!(
            messages,
            vec![
                FieldMessage::new("birthDate", "future_date"),
                FieldMessage::new("name", "Campo requerido"),
            ]
        );
    }

    #[test]
    fn error_body_omits_empty_field_list() {
        let body = ErrorBody {
            timestamp: Utc::now(),
            status: 404,
            error: "Recurso não encontrado".to_string(),
            path: "/clients/9".to_string(),
            errors: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("errors").is_none());
        assert_eq!(json["status"], 404);
        assert_eq!(json["path"], "/clients/9");
    }
}
