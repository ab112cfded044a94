use crate::responses::{RejectResponse, TradeDto};
use async_trait::async_trait;
use configuration::BackendSettings;
use core_types::{Settings, Trade, UserProfile};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

pub mod auth;
pub mod error;
pub mod responses;

// --- Public API ---
pub use auth::AuthContext;
pub use error::ClientError;

/// The generic, abstract interface to the remote journal backend.
/// This trait is the contract the session layer programs against, allowing
/// the underlying implementation (HTTP or test stub) to be swapped out.
#[async_trait]
pub trait JournalBackend: Send + Sync {
    /// Cheap liveness probe; also used as the construction handshake.
    async fn health_check(&self) -> Result<bool, ClientError>;

    /// Fetches the caller's profile; `None` until first-run setup is done.
    async fn get_caller_user_profile(&self) -> Result<Option<UserProfile>, ClientError>;

    /// Saves the caller's profile. The caller must invalidate any cached
    /// profile on success.
    async fn save_caller_user_profile(&self, profile: &UserProfile) -> Result<(), ClientError>;

    /// Fetches every trade in the caller's journal.
    async fn get_all_trades(&self) -> Result<Vec<Trade>, ClientError>;

    /// Fetches a single trade by id.
    async fn get_trade(&self, trade_id: Uuid) -> Result<Trade, ClientError>;

    /// Fetches the trades for one currency pair.
    async fn get_trades_by_pair(&self, pair: &str) -> Result<Vec<Trade>, ClientError>;

    /// Saves (replaces whole) a trade. Invalidate cached trades on success.
    async fn save_trade(&self, trade: &Trade) -> Result<(), ClientError>;

    /// Deletes a trade by id. Invalidate cached trades on success.
    async fn delete_trade(&self, trade_id: Uuid) -> Result<(), ClientError>;

    /// Fetches the caller's journal settings.
    async fn get_settings(&self) -> Result<Option<Settings>, ClientError>;

    /// Saves the caller's journal settings. Invalidate cached settings on
    /// success.
    async fn save_settings(&self, settings: &Settings) -> Result<(), ClientError>;

    /// Wipes the caller's journal. Invalidates everything.
    async fn start_fresh(&self) -> Result<(), ClientError>;

    /// One-time secret-gated bootstrap of the backend's access control.
    /// Privileged and best-effort; failure must not block normal use.
    async fn initialize_access_control_with_secret(
        &self,
        secret: &str,
    ) -> Result<(), ClientError>;
}

/// Constructs a fresh client for the given identity. The session layer owns
/// an implementation of this seam so every retry epoch gets a brand-new
/// client and tests can script construction failures.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    async fn create(&self, auth: &AuthContext) -> Result<Arc<dyn JournalBackend>, ClientError>;
}

/// A concrete `JournalBackend` over the backend's HTTP surface.
#[derive(Clone)]
pub struct HttpBackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackendClient {
    /// Builds the HTTP client and performs the health-check handshake, so a
    /// stopped or unreachable backend fails construction rather than the
    /// first real call.
    pub async fn connect(
        settings: &BackendSettings,
        auth: &AuthContext,
    ) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        auth.apply(&mut headers)?;

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.request_timeout())
            .build()?;

        let connected = Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_string(),
        };
        connected.health_check().await?;
        Ok(connected)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "POST");
        let response = self.client.post(&url).json(body).send().await?;
        Self::decode(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "DELETE");
        let response = self.client.delete(&url).send().await?;
        Self::decode::<serde_json::Value>(response).await?;
        Ok(())
    }

    /// Decodes a success body, or maps an error body onto the structured
    /// reject shape. Unstructured error bodies still become `Rejected` so
    /// the caller always has a message to classify.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            // Mutations answer with an empty body; read it as JSON null.
            let body = if text.trim().is_empty() { "null" } else { &text };
            return serde_json::from_str::<T>(body)
                .map_err(|e| ClientError::Deserialization(e.to_string()));
        }

        match serde_json::from_str::<RejectResponse>(&text) {
            Ok(reject) => Err(ClientError::Rejected {
                code: reject.code,
                message: reject.message,
            }),
            Err(_) => Err(ClientError::Rejected {
                code: reject_code_for_status(status),
                message: format!("HTTP {}: {}", status.as_u16(), text),
            }),
        }
    }
}

/// Fallback mapping from a bare HTTP status onto the backend's reject-code
/// vocabulary, so unavailability detection still works when a proxy strips
/// the structured body.
fn reject_code_for_status(status: StatusCode) -> i32 {
    match status {
        StatusCode::NOT_FOUND => 3,
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY | StatusCode::GATEWAY_TIMEOUT => {
            5
        }
        _ => 0,
    }
}

#[async_trait]
impl JournalBackend for HttpBackendClient {
    async fn health_check(&self) -> Result<bool, ClientError> {
        self.get_json("/api/health").await
    }

    async fn get_caller_user_profile(&self) -> Result<Option<UserProfile>, ClientError> {
        self.get_json("/api/profile").await
    }

    async fn save_caller_user_profile(&self, profile: &UserProfile) -> Result<(), ClientError> {
        self.post_json::<_, serde_json::Value>("/api/profile", profile)
            .await?;
        Ok(())
    }

    async fn get_all_trades(&self) -> Result<Vec<Trade>, ClientError> {
        let dtos: Vec<TradeDto> = self.get_json("/api/trades").await?;
        Ok(dtos.into_iter().map(TradeDto::into_domain).collect())
    }

    async fn get_trade(&self, trade_id: Uuid) -> Result<Trade, ClientError> {
        let dto: TradeDto = self.get_json(&format!("/api/trades/{}", trade_id)).await?;
        Ok(dto.into_domain())
    }

    async fn get_trades_by_pair(&self, pair: &str) -> Result<Vec<Trade>, ClientError> {
        let dtos: Vec<TradeDto> = self
            .get_json(&format!("/api/trades/by-pair/{}", pair))
            .await?;
        Ok(dtos.into_iter().map(TradeDto::into_domain).collect())
    }

    async fn save_trade(&self, trade: &Trade) -> Result<(), ClientError> {
        let dto = TradeDto::from_domain(trade)?;
        self.post_json::<_, serde_json::Value>("/api/trades", &dto)
            .await?;
        Ok(())
    }

    async fn delete_trade(&self, trade_id: Uuid) -> Result<(), ClientError> {
        self.delete(&format!("/api/trades/{}", trade_id)).await
    }

    async fn get_settings(&self) -> Result<Option<Settings>, ClientError> {
        self.get_json("/api/settings").await
    }

    async fn save_settings(&self, settings: &Settings) -> Result<(), ClientError> {
        self.post_json::<_, serde_json::Value>("/api/settings", settings)
            .await?;
        Ok(())
    }

    async fn start_fresh(&self) -> Result<(), ClientError> {
        self.post_json::<_, serde_json::Value>("/api/start-fresh", &serde_json::json!({}))
            .await?;
        Ok(())
    }

    async fn initialize_access_control_with_secret(
        &self,
        secret: &str,
    ) -> Result<(), ClientError> {
        self.post_json::<_, serde_json::Value>(
            "/api/admin/init-access-control",
            &serde_json::json!({ "secret": secret }),
        )
        .await?;
        Ok(())
    }
}

/// The production `ClientFactory`: one fresh `HttpBackendClient` per call.
pub struct HttpClientFactory {
    settings: BackendSettings,
}

impl HttpClientFactory {
    pub fn new(settings: BackendSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl ClientFactory for HttpClientFactory {
    async fn create(&self, auth: &AuthContext) -> Result<Arc<dyn JournalBackend>, ClientError> {
        let client = HttpBackendClient::connect(&self.settings, auth).await?;
        Ok(Arc::new(client))
    }
}
