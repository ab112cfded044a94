use crate::actor::{ActorSession, SessionSnapshot};
use crate::error::SessionError;
use backend_client::JournalBackend;
use configuration::StartupSettings;
use core_types::UserProfile;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::time::{sleep, Duration, Instant};

/// The single forward-moving startup status the UI renders against.
/// Exactly one value holds at any observation point; the three error
/// states and `Timeout` are only left through an explicit retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StartupStatus {
    Loading,
    Ready,
    SetupNeeded,
    ConnectionError,
    ProfileError,
    Timeout,
}

/// One observation of the gate: the status plus the error it carries.
#[derive(Debug, Clone)]
pub struct GateSnapshot {
    pub status: StartupStatus,
    pub error: Option<Arc<SessionError>>,
}

/// The first profile fetch, tagged with the session epoch it ran against.
enum ProfileFetch {
    /// Not started; the fetch is gated on a client handle existing.
    Idle,
    InFlight,
    Ready(Option<UserProfile>),
    Failed(Arc<SessionError>),
}

struct GateInner {
    attempt_started: Instant,
    observed_epoch: u64,
    profile_epoch: u64,
    profile: ProfileFetch,
}

/// Sequences client readiness and the first profile fetch into a single
/// status, applying the overall startup deadline on top of the session's
/// per-step timeouts. Owns only orchestration state; the session and the
/// profile query remain independently-retryable dependencies.
pub struct StartupGate {
    session: Arc<ActorSession>,
    timings: StartupSettings,
    inner: Arc<Mutex<GateInner>>,
}

impl StartupGate {
    pub fn new(session: Arc<ActorSession>, timings: StartupSettings) -> Self {
        let epoch = session.current_epoch();
        Self {
            session,
            timings,
            inner: Arc::new(Mutex::new(GateInner {
                attempt_started: Instant::now(),
                observed_epoch: epoch,
                profile_epoch: epoch,
                profile: ProfileFetch::Idle,
            })),
        }
    }

    /// Kicks off the initial construction cycle in the background and
    /// stamps the attempt clock.
    pub fn start(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.attempt_started = Instant::now();
        }
        let session = Arc::clone(&self.session);
        tokio::spawn(async move {
            session.connect().await;
        });
    }

    /// Re-evaluates the status. Starts the profile fetch as soon as (and
    /// only once) a client handle exists, and resets the attempt clock
    /// whenever the client identity changes so a stale clock can never
    /// cause a spurious timeout after a fresh start.
    pub async fn poll(&self) -> GateSnapshot {
        let session = self.session.snapshot();

        {
            let mut inner = self.inner.lock().unwrap();
            if inner.observed_epoch != session.epoch {
                inner.observed_epoch = session.epoch;
                inner.profile_epoch = session.epoch;
                inner.profile = ProfileFetch::Idle;
                inner.attempt_started = Instant::now();
            }
        }

        if let Some(client) = session.client() {
            self.ensure_profile_fetch(session.epoch, client);
        }

        self.evaluate(&session)
    }

    /// Loops until the status leaves `Loading`.
    pub async fn wait_until_settled(&self) -> GateSnapshot {
        loop {
            let snapshot = self.poll().await;
            if snapshot.status != StartupStatus::Loading {
                return snapshot;
            }
            sleep(Duration::from_millis(50)).await;
        }
    }

    /// The composite retry behind every error screen: resets the attempt
    /// clock, recreates the session client, waits briefly for it to
    /// settle, then refetches the profile. Idempotent and safe to call
    /// repeatedly.
    pub async fn retry(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.attempt_started = Instant::now();
        }
        self.session.reset();

        let session = Arc::clone(&self.session);
        tokio::spawn(async move {
            session.connect().await;
        });

        sleep(self.timings.retry_settle()).await;
        self.poll().await;
    }

    /// Invalidates and refetches the profile after a successful save, so
    /// `SetupNeeded` moves to `Ready` without a manual retry.
    pub async fn notify_profile_saved(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.profile = ProfileFetch::Idle;
        }
        self.poll().await;
    }

    fn ensure_profile_fetch(&self, epoch: u64, client: Arc<dyn JournalBackend>) {
        {
            let mut inner = self.inner.lock().unwrap();
            if !matches!(inner.profile, ProfileFetch::Idle) || inner.profile_epoch != epoch {
                return;
            }
            inner.profile = ProfileFetch::InFlight;
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let result = client.get_caller_user_profile().await;
            let mut inner = inner.lock().unwrap();
            // A result from a previous epoch is stale; drop it.
            if inner.profile_epoch != epoch {
                tracing::debug!(epoch, "discarding stale profile fetch result");
                return;
            }
            inner.profile = match result {
                Ok(profile) => ProfileFetch::Ready(profile),
                Err(error) => {
                    tracing::warn!(error = %error, "profile fetch failed");
                    ProfileFetch::Failed(Arc::new(SessionError::from(error)))
                }
            };
        });
    }

    /// The transition rules, in priority order.
    fn evaluate(&self, session: &SessionSnapshot) -> GateSnapshot {
        let inner = self.inner.lock().unwrap();

        let actor_pending = session.is_loading();
        let profile_pending = match inner.profile {
            ProfileFetch::InFlight => true,
            // An unstarted fetch counts as pending only while a client is
            // still possible; a failed session owns the error instead.
            ProfileFetch::Idle => actor_pending || session.client().is_some(),
            _ => false,
        };

        // 1. Overall deadline, independent of per-step timeouts. A
        //    succession of fast per-step failures still lands here.
        if (actor_pending || profile_pending)
            && inner.attempt_started.elapsed() >= self.timings.overall_deadline()
        {
            return GateSnapshot {
                status: StartupStatus::Timeout,
                error: Some(Arc::new(SessionError::StartupTimeout)),
            };
        }

        // 2. Session construction failed.
        if let Some(error) = session.error() {
            return GateSnapshot {
                status: StartupStatus::ConnectionError,
                error: Some(error),
            };
        }

        // 3. Profile fetch failed.
        if let ProfileFetch::Failed(error) = &inner.profile {
            return GateSnapshot {
                status: StartupStatus::ProfileError,
                error: Some(Arc::clone(error)),
            };
        }

        // 4. Both dependencies settled.
        if session.client().is_some() {
            if let ProfileFetch::Ready(profile) = &inner.profile {
                return GateSnapshot {
                    status: if profile.is_none() {
                        StartupStatus::SetupNeeded
                    } else {
                        StartupStatus::Ready
                    },
                    error: None,
                };
            }
        }

        // 5. Still working.
        GateSnapshot {
            status: StartupStatus::Loading,
            error: None,
        }
    }
}
