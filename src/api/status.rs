use derive_more::Display;
use itertools::Itertools;
use reqwest::StatusCode;
use serde::Deserialize;

/// Non-successful response from the backend.
#[derive(Clone, Debug, Eq, PartialEq, Display, derive_more::Error)]
#[display("{detail} ({status})")]
pub struct StatusError {
    pub status: StatusCode,
    pub detail: String,
}

impl StatusError {
    /// Read the detail from the `{"detail": …}` body, falling back to the bare status.
    #[must_use]
    pub fn new(status: StatusCode, body: &str) -> Self {
        let detail = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.detail.into_message())
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        Self { status, detail }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Detail,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),

    /// Request validation errors, one per offending field.
    Validation(Vec<ValidationIssue>),
}

impl Detail {
    fn into_message(self) -> Option<String> {
        let message = match self {
            Self::Message(message) => message,
            Self::Validation(issues) => issues.iter().map(ValidationIssue::to_string).join("; "),
        };
        if message.trim().is_empty() { None } else { Some(message) }
    }
}

#[derive(Deserialize)]
struct ValidationIssue {
    #[serde(default)]
    loc: Vec<serde_json::Value>,

    msg: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.loc.last().and_then(serde_json::Value::as_str) {
            Some(field) => write!(f, "{field}: {}", self.msg),
            None => write!(f, "{}", self.msg),
        }
    }
}
