use crate::error::ClientError;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

/// The caller's identity, resolved by the external login provider and
/// injected into client construction. Absent token means anonymous access.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    token: Option<String>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self { token: None }
    }

    pub fn authenticated(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Adds the bearer header for authenticated contexts.
    pub(crate) fn apply(&self, headers: &mut HeaderMap) -> Result<(), ClientError> {
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ClientError::InvalidData(format!("Invalid auth token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_context_adds_no_header() {
        let mut headers = HeaderMap::new();
        AuthContext::anonymous().apply(&mut headers).unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn authenticated_context_sets_bearer_header() {
        let mut headers = HeaderMap::new();
        AuthContext::authenticated("abc123").apply(&mut headers).unwrap();
        assert_eq!(
            headers.get(AUTHORIZATION).unwrap().to_str().unwrap(),
            "Bearer abc123"
        );
    }

    #[test]
    fn control_characters_in_token_are_rejected() {
        let mut headers = HeaderMap::new();
        let result = AuthContext::authenticated("bad\ntoken").apply(&mut headers);
        assert!(result.is_err());
    }
}
