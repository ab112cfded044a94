use crate::error::SessionError;
use crate::reject::{is_backend_unavailable, reject_summary};
use serde::Serialize;

/// The fixed startup-error taxonomy surfaced to the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCategory {
    BackendUnavailable,
    Timeout,
    Connection,
    Authorization,
    Profile,
    Unknown,
}

/// Hint about which startup step produced the error, for messages that
/// carry no marker of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorContext {
    Actor,
    Profile,
}

/// A classified startup error: a category plus its fixed, human-readable
/// title/description pair and the normalized message as technical detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedError {
    pub category: ErrorCategory,
    pub title: &'static str,
    pub description: &'static str,
    pub technical_details: Option<String>,
}

/// Classifies a startup error for UI handling. First match wins; any error
/// shape (including a missing error) lands in a category. Never panics.
pub fn classify_startup_error(
    error: Option<&SessionError>,
    context: Option<ErrorContext>,
) -> ClassifiedError {
    let Some(error) = error else {
        return ClassifiedError {
            category: ErrorCategory::Unknown,
            title: "Unknown Error",
            description: "An unexpected error occurred during startup.",
            technical_details: None,
        };
    };

    let message = error.to_string();
    let lower = message.to_lowercase();

    // Transient backend outages outrank everything: they are the one case
    // the session retries on its own.
    if is_backend_unavailable(error) {
        return ClassifiedError {
            category: ErrorCategory::BackendUnavailable,
            title: "Backend Unavailable",
            description:
                "The backend service is stopped or not reachable right now. It usually comes back within moments; retrying is safe.",
            technical_details: Some(reject_summary(error)),
        };
    }

    if lower.contains("timeout") {
        return ClassifiedError {
            category: ErrorCategory::Timeout,
            title: "Connection Timeout",
            description:
                "The application took too long to connect. This may be due to network issues or high server load.",
            technical_details: Some(message),
        };
    }

    if lower.contains("network")
        || lower.contains("connection")
        || lower.contains("request")
        || lower.contains("client")
        || lower.contains("dns")
    {
        return ClassifiedError {
            category: ErrorCategory::Connection,
            title: "Connection Failed",
            description:
                "Unable to connect to the backend service. Please check your internet connection and try again.",
            technical_details: Some(message),
        };
    }

    if lower.contains("unauthorized")
        || lower.contains("permission")
        || lower.contains("access denied")
        || lower.contains("authentication")
        || lower.contains("forbidden")
    {
        return ClassifiedError {
            category: ErrorCategory::Authorization,
            title: "Authorization Error",
            description:
                "There was a problem verifying your identity. Please try logging in again.",
            technical_details: Some(message),
        };
    }

    if lower.contains("profile") || context == Some(ErrorContext::Profile) {
        return ClassifiedError {
            category: ErrorCategory::Profile,
            title: "Profile Load Failed",
            description:
                "Unable to load your user profile. Your data is safe, but we need to retry the connection.",
            technical_details: Some(message),
        };
    }

    ClassifiedError {
        category: ErrorCategory::Unknown,
        title: "Startup Error",
        description:
            "An unexpected error occurred while starting the application. Please try again.",
        technical_details: Some(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_client::ClientError;
    use std::time::Duration;

    #[test]
    fn missing_error_is_unknown() {
        let classified = classify_startup_error(None, None);
        assert_eq!(classified.category, ErrorCategory::Unknown);
        assert!(classified.technical_details.is_none());
    }

    #[test]
    fn stopped_backend_outranks_every_other_marker() {
        // The message also contains "timeout" and "connection"; the
        // structured code must win.
        let error = SessionError::Client(ClientError::Rejected {
            code: 5,
            message: "connection timeout while service is stopped".to_string(),
        });
        let classified = classify_startup_error(Some(&error), None);
        assert_eq!(classified.category, ErrorCategory::BackendUnavailable);
        assert!(classified
            .technical_details
            .unwrap()
            .contains("needs to be restarted"));
    }

    #[test]
    fn timeout_marker_classifies_as_timeout() {
        let error = SessionError::InitTimeout(Duration::from_secs(10));
        let classified = classify_startup_error(Some(&error), None);
        assert_eq!(classified.category, ErrorCategory::Timeout);
        assert_eq!(classified.title, "Connection Timeout");
    }

    #[test]
    fn startup_deadline_classifies_as_timeout() {
        let classified = classify_startup_error(Some(&SessionError::StartupTimeout), None);
        assert_eq!(classified.category, ErrorCategory::Timeout);
    }

    #[test]
    fn request_failures_classify_as_connection() {
        let error = SessionError::TaskFailed("request channel closed".to_string());
        let classified = classify_startup_error(Some(&error), None);
        assert_eq!(classified.category, ErrorCategory::Connection);
    }

    #[test]
    fn authorization_markers_classify_as_authorization() {
        let error = SessionError::Client(ClientError::Rejected {
            code: 4,
            message: "access denied for anonymous caller".to_string(),
        });
        let classified = classify_startup_error(Some(&error), None);
        assert_eq!(classified.category, ErrorCategory::Authorization);
    }

    #[test]
    fn profile_context_hint_classifies_markerless_errors() {
        let error = SessionError::Client(ClientError::Deserialization(
            "unexpected token at byte 0".to_string(),
        ));
        let hinted = classify_startup_error(Some(&error), Some(ErrorContext::Profile));
        assert_eq!(hinted.category, ErrorCategory::Profile);
    }

    #[test]
    fn markerless_errors_fall_through_to_unknown() {
        let error = SessionError::Client(ClientError::Deserialization(
            "unexpected token at byte 0".to_string(),
        ));
        let classified = classify_startup_error(Some(&error), Some(ErrorContext::Actor));
        assert_eq!(classified.category, ErrorCategory::Unknown);
        assert_eq!(classified.title, "Startup Error");
    }
}
