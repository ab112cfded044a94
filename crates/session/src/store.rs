use crate::actor::ActorSession;
use crate::error::SessionError;
use backend_client::JournalBackend;
use core_types::{Settings, Trade, UserProfile};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// A cached read tagged with the session epoch it was fetched under. A
/// value from a previous epoch is stale by definition and never served.
struct Cached<T> {
    epoch: u64,
    value: Option<T>,
}

impl<T> Cached<T> {
    fn empty() -> Self {
        Self {
            epoch: 0,
            value: None,
        }
    }

    fn get(&self, epoch: u64) -> Option<&T> {
        if self.epoch == epoch {
            self.value.as_ref()
        } else {
            None
        }
    }

    fn put(&mut self, epoch: u64, value: T) {
        self.epoch = epoch;
        self.value = Some(value);
    }

    fn invalidate(&mut self) {
        self.value = None;
    }
}

/// Epoch-keyed cached reads over the current client handle, with mutations
/// that invalidate the relevant cache on success.
///
/// Every operation reads the *current* handle at call time; a handle is
/// never cached across a retry boundary, so a reset session transparently
/// refetches everything against the new client.
pub struct JournalStore {
    session: Arc<ActorSession>,
    profile: Mutex<Cached<Option<UserProfile>>>,
    trades: Mutex<Cached<Vec<Trade>>>,
    settings: Mutex<Cached<Option<Settings>>>,
}

impl JournalStore {
    pub fn new(session: Arc<ActorSession>) -> Self {
        Self {
            session,
            profile: Mutex::new(Cached::empty()),
            trades: Mutex::new(Cached::empty()),
            settings: Mutex::new(Cached::empty()),
        }
    }

    fn current_client(&self) -> Result<(u64, Arc<dyn JournalBackend>), SessionError> {
        let snapshot = self.session.snapshot();
        match snapshot.client() {
            Some(client) => Ok((snapshot.epoch, client)),
            None => Err(SessionError::ClientUnavailable),
        }
    }

    pub async fn profile(&self) -> Result<Option<UserProfile>, SessionError> {
        let (epoch, client) = self.current_client()?;
        {
            let cache = self.profile.lock().unwrap();
            if let Some(profile) = cache.get(epoch) {
                return Ok(profile.clone());
            }
        }

        let fresh = client.get_caller_user_profile().await?;
        self.profile.lock().unwrap().put(epoch, fresh.clone());
        Ok(fresh)
    }

    pub async fn save_profile(&self, profile: &UserProfile) -> Result<(), SessionError> {
        let (_, client) = self.current_client()?;
        client.save_caller_user_profile(profile).await?;
        self.profile.lock().unwrap().invalidate();
        Ok(())
    }

    pub async fn trades(&self) -> Result<Vec<Trade>, SessionError> {
        let (epoch, client) = self.current_client()?;
        {
            let cache = self.trades.lock().unwrap();
            if let Some(trades) = cache.get(epoch) {
                return Ok(trades.clone());
            }
        }

        let fresh = client.get_all_trades().await?;
        self.trades.lock().unwrap().put(epoch, fresh.clone());
        Ok(fresh)
    }

    pub async fn save_trade(&self, trade: &Trade) -> Result<(), SessionError> {
        trade.validate()?;
        let (_, client) = self.current_client()?;
        client.save_trade(trade).await?;
        self.trades.lock().unwrap().invalidate();
        Ok(())
    }

    pub async fn delete_trade(&self, trade_id: Uuid) -> Result<(), SessionError> {
        let (_, client) = self.current_client()?;
        client.delete_trade(trade_id).await?;
        self.trades.lock().unwrap().invalidate();
        Ok(())
    }

    pub async fn settings(&self) -> Result<Option<Settings>, SessionError> {
        let (epoch, client) = self.current_client()?;
        {
            let cache = self.settings.lock().unwrap();
            if let Some(settings) = cache.get(epoch) {
                return Ok(settings.clone());
            }
        }

        let fresh = client.get_settings().await?;
        self.settings.lock().unwrap().put(epoch, fresh.clone());
        Ok(fresh)
    }

    pub async fn save_settings(&self, settings: &Settings) -> Result<(), SessionError> {
        let (_, client) = self.current_client()?;
        client.save_settings(settings).await?;
        self.settings.lock().unwrap().invalidate();
        Ok(())
    }

    /// Wipes the journal and every cache with it.
    pub async fn start_fresh(&self) -> Result<(), SessionError> {
        let (_, client) = self.current_client()?;
        client.start_fresh().await?;
        self.profile.lock().unwrap().invalidate();
        self.trades.lock().unwrap().invalidate();
        self.settings.lock().unwrap().invalidate();
        Ok(())
    }
}
