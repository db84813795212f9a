use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("malformed response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {message}")]
    Config { message: String },

    #[error("form has {} invalid field(s)", .0.len())]
    InvalidForm(Vec<FieldError>),

    #[error("a prediction is already in progress")]
    SubmissionInFlight,
}

/// Validity message attached to a single form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ClientError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_form_reports_field_count() {
        let error = ClientError::InvalidForm(vec![
            FieldError::new("edad_ingreso", "fuera de rango"),
            FieldError::new("estrato", "requerido"),
        ]);
        assert_eq!(error.to_string(), "form has 2 invalid field(s)");
    }

    #[test]
    fn status_error_includes_detail() {
        let error = ClientError::Status {
            status: 500,
            detail: "Modelo no disponible".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "service returned HTTP 500: Modelo no disponible"
        );
    }
}
