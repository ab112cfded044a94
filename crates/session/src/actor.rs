use crate::error::SessionError;
use crate::reject::is_backend_unavailable;
use backend_client::{AuthContext, ClientFactory, JournalBackend};
use configuration::StartupSettings;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::sleep;

/// Where the current construction epoch stands.
#[derive(Clone)]
pub enum SessionPhase {
    /// A client is being constructed (or re-constructed after a reset);
    /// internal auto-retries also report this phase.
    Connecting,
    /// The active client handle. Consumers must re-read it at call time,
    /// never cache it across a retry boundary.
    Ready(Arc<dyn JournalBackend>),
    /// Construction failed terminally for this epoch; only `reset` leaves
    /// this phase.
    Failed(Arc<SessionError>),
}

impl std::fmt::Debug for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Connecting => write!(f, "Connecting"),
            SessionPhase::Ready(_) => write!(f, "Ready"),
            SessionPhase::Failed(error) => write!(f, "Failed({})", error),
        }
    }
}

/// Observable session state. `epoch` increments on every manual reset and
/// tags every async attempt, so results arriving from a previous epoch are
/// recognizably stale and discarded.
#[derive(Clone, Debug)]
pub struct SessionSnapshot {
    pub epoch: u64,
    pub phase: SessionPhase,
    /// Non-fatal outcome of the privileged bootstrap call, if it misfired.
    pub admin_init_warning: Option<String>,
}

impl SessionSnapshot {
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SessionPhase::Connecting)
    }

    pub fn client(&self) -> Option<Arc<dyn JournalBackend>> {
        match &self.phase {
            SessionPhase::Ready(client) => Some(Arc::clone(client)),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<Arc<SessionError>> {
        match &self.phase {
            SessionPhase::Failed(error) => Some(Arc::clone(error)),
            _ => None,
        }
    }
}

/// Owns the remote client handle and its construction lifecycle.
///
/// Construction is raced against a hard timeout; a build that loses the
/// race keeps running detached and its eventual result is discarded by the
/// epoch check. Transient backend outages are retried internally with
/// linear backoff before an error ever surfaces.
pub struct ActorSession {
    factory: Arc<dyn ClientFactory>,
    auth: AuthContext,
    admin_secret: Option<String>,
    timings: StartupSettings,
    changed: watch::Sender<SessionSnapshot>,
}

impl ActorSession {
    pub fn new(
        factory: Arc<dyn ClientFactory>,
        auth: AuthContext,
        admin_secret: Option<String>,
        timings: StartupSettings,
    ) -> Self {
        let (changed, _) = watch::channel(SessionSnapshot {
            epoch: 0,
            phase: SessionPhase::Connecting,
            admin_init_warning: None,
        });
        Self {
            factory,
            auth,
            admin_secret,
            timings,
            changed,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.changed.borrow().clone()
    }

    pub fn client(&self) -> Option<Arc<dyn JournalBackend>> {
        self.snapshot().client()
    }

    pub fn current_epoch(&self) -> u64 {
        self.changed.borrow().epoch
    }

    /// The session-changed signal. Fires whenever the phase, epoch, or
    /// warning changes; dependent caches refetch against the new client on
    /// every `Ready` transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.changed.subscribe()
    }

    /// Bumps the epoch, clears error and warning state, and resets the
    /// auto-retry budget, forcing a brand-new construction cycle on the
    /// next `connect`. Any in-flight attempt from the previous epoch is
    /// orphaned: its result will fail the epoch check.
    pub fn reset(&self) {
        self.changed.send_modify(|snapshot| {
            snapshot.epoch += 1;
            snapshot.phase = SessionPhase::Connecting;
            snapshot.admin_init_warning = None;
        });
        tracing::info!(epoch = self.current_epoch(), "session reset");
    }

    /// Manual recovery without a reload: a reset followed by a fresh
    /// construction cycle.
    pub async fn retry(&self) -> SessionSnapshot {
        self.reset();
        self.connect().await
    }

    /// Drives one construction cycle for the current epoch and returns the
    /// resulting snapshot. Safe to call on an already-ready session: a
    /// ready or failed epoch is left untouched.
    pub async fn connect(&self) -> SessionSnapshot {
        let snapshot = self.snapshot();
        if !snapshot.is_loading() {
            return snapshot;
        }
        self.run_connect(snapshot.epoch).await;
        self.snapshot()
    }

    async fn run_connect(&self, epoch: u64) {
        let mut attempt: u32 = 0;
        loop {
            // A reset while we were backing off makes this cycle stale.
            if self.current_epoch() != epoch {
                return;
            }

            match self.build_once().await {
                Ok((client, warning)) => {
                    if self.install(epoch, SessionPhase::Ready(client), warning) {
                        tracing::info!(epoch, "backend client ready");
                    }
                    return;
                }
                Err(error)
                    if is_backend_unavailable(&error)
                        && attempt < self.timings.max_auto_retries =>
                {
                    attempt += 1;
                    let delay = self.timings.auto_retry_delay(attempt);
                    tracing::warn!(
                        epoch,
                        attempt,
                        ?delay,
                        error = %error,
                        "backend unavailable; scheduling automatic re-construction"
                    );
                    sleep(delay).await;
                }
                Err(error) => {
                    tracing::error!(epoch, error = %error, "client construction failed");
                    self.install(epoch, SessionPhase::Failed(Arc::new(error)), None);
                    return;
                }
            }
        }
    }

    /// One construction attempt, raced against the actor timeout. The build
    /// runs on its own task so a timeout does not cancel it; the loser's
    /// late result simply never reaches `install`.
    async fn build_once(
        &self,
    ) -> Result<(Arc<dyn JournalBackend>, Option<String>), SessionError> {
        let factory = Arc::clone(&self.factory);
        let auth = self.auth.clone();
        let secret = if auth.is_authenticated() {
            self.admin_secret.clone()
        } else {
            None
        };
        let admin_timeout = self.timings.admin_init_timeout();

        let build = tokio::spawn(async move {
            let client = factory.create(&auth).await?;

            // Best-effort privileged bootstrap with its own short timeout;
            // it must never block normal users. The call itself runs on a
            // task, so losing the race leaves it running and only its
            // outcome is ignored.
            let mut warning = None;
            if let Some(secret) = secret {
                let init_client = Arc::clone(&client);
                let init = tokio::spawn(async move {
                    init_client
                        .initialize_access_control_with_secret(&secret)
                        .await
                });
                match tokio::time::timeout(admin_timeout, init).await {
                    Ok(Ok(Ok(()))) => {}
                    Ok(Ok(Err(error))) => {
                        tracing::warn!(error = %error, "privileged initialization failed");
                        warning = Some(format!("Privileged initialization failed: {}", error));
                    }
                    Ok(Err(join_error)) => {
                        tracing::warn!(error = %join_error, "privileged initialization task failed");
                        warning =
                            Some(format!("Privileged initialization failed: {}", join_error));
                    }
                    Err(_) => {
                        tracing::warn!("privileged initialization timed out");
                        warning = Some(format!(
                            "Privileged initialization timed out after {:?}",
                            admin_timeout
                        ));
                    }
                }
            }

            Ok::<_, SessionError>((client, warning))
        });

        tokio::select! {
            result = build => match result {
                Ok(outcome) => outcome,
                Err(join_error) => Err(SessionError::TaskFailed(join_error.to_string())),
            },
            _ = sleep(self.timings.actor_timeout()) => {
                Err(SessionError::InitTimeout(self.timings.actor_timeout()))
            }
        }
    }

    /// Publishes a construction outcome unless the epoch moved on, in which
    /// case the stale result is dropped on the floor.
    fn install(&self, epoch: u64, phase: SessionPhase, warning: Option<String>) -> bool {
        let installed = self.changed.send_if_modified(|snapshot| {
            if snapshot.epoch != epoch {
                return false;
            }
            snapshot.phase = phase;
            snapshot.admin_init_warning = warning;
            true
        });
        if !installed {
            tracing::debug!(epoch, "discarding stale construction result");
        }
        installed
    }
}
