use crate::error::SessionError;

/// Extracts a reject code from free-form text of the shape
/// "... reject code 5 ..." or "... (reject code 5): ...".
fn parse_reject_code(message: &str) -> Option<i32> {
    let lower = message.to_lowercase();
    let start = lower.find("reject code")? + "reject code".len();
    let rest = lower[start..].trim_start_matches([' ', ':']);
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Renders a user-safe summary of a backend rejection for technical-details
/// display. Falls back to the plain message when the error carries no
/// rejection semantics. Total over any session error.
pub fn reject_summary(error: &SessionError) -> String {
    let message = error.to_string();
    let lower = message.to_lowercase();

    let code = error
        .reject_code()
        .or_else(|| parse_reject_code(&message));

    let is_stopped =
        lower.contains("service is stopped") || lower.contains("lifecycle manager");
    let is_not_found = lower.contains("service") && lower.contains("not found");
    let is_trapped = lower.contains("service trapped") || lower.contains("rejected the request");

    if code == Some(5) || is_stopped {
        return format!(
            "Backend service is stopped (reject code {}). The service needs to be restarted.",
            code.unwrap_or(5)
        );
    }
    if code == Some(3) || is_not_found {
        return format!(
            "Backend service not found (reject code {}). The service may not be deployed.",
            code.unwrap_or(3)
        );
    }
    if code == Some(4) || is_trapped {
        return format!(
            "Backend service rejected the request (reject code {}): {}",
            code.unwrap_or(4),
            message
        );
    }
    if let Some(code) = code {
        return format!("Reject code {}: {}", code, message);
    }

    message
}

/// Decides whether a failure means the backend is transiently unreachable
/// (stopped or not deployed) as opposed to a permanent or auth failure.
/// Absence of any recognized marker is `false`; never panics.
pub fn is_backend_unavailable(error: &SessionError) -> bool {
    if matches!(error.reject_code(), Some(5) | Some(3)) {
        return true;
    }

    let lower = reject_summary(error).to_lowercase();
    lower.contains("service is stopped")
        || lower.contains("reject code 5")
        || lower.contains("lifecycle manager")
        || (lower.contains("service") && lower.contains("not found"))
        || lower.contains("reject code 3")
}
