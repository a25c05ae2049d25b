use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use chronicle_events::{EventBus, EventKind, EventPayload};
use chronicle_types::ProviderFile;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::Provider;
use crate::state::{AcquisitionState, LifecycleState, LifecycleStore};

/// Polling behavior for `AwaitingCompletion`.
///
/// There is deliberately no attempt limit: providers may take days to
/// prepare an export, and the engine is resumable rather than held in a
/// bounded loop.
#[derive(Clone, Copy, Debug)]
pub struct PollConfig {
    /// Interval between completion checks.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
        }
    }
}

/// Result of a completed engine run.
#[derive(Debug)]
pub enum AcquisitionOutcome {
    /// Acquisition finished; these files go to the staging pipeline.
    Complete(Vec<ProviderFile>),
    /// The user abandoned the run; the lifecycle is back at idle and
    /// nothing was written anywhere.
    Cancelled,
}

/// Cancellation handle for an in-flight acquisition.
///
/// Cloneable so the caller can keep one while the engine runs. Cancelling
/// takes effect at the next step boundary or poll wakeup.
#[derive(Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// Drives one provider through the acquisition state machine.
///
/// `Idle → VerifyingAuth → Dispatching → AwaitingCompletion → Parsing →
/// Done`, with `Failed` reachable from any state. Every transition is
/// persisted before the next step runs, so a restart resumes where the
/// previous process left off instead of filing a duplicate export request.
pub struct AcquisitionEngine<P, L> {
    provider: P,
    states: Arc<L>,
    bus: Arc<EventBus>,
    config: PollConfig,
    cancel: CancelHandle,
}

impl<P: Provider, L: LifecycleStore> AcquisitionEngine<P, L> {
    pub fn new(provider: P, states: Arc<L>, bus: Arc<EventBus>, config: PollConfig) -> Self {
        Self {
            provider,
            states,
            bus,
            config,
            cancel: CancelHandle::new(),
        }
    }

    /// Handle for cancelling this engine's run.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Run the acquisition to completion, cancellation, or failure.
    ///
    /// If a persisted record shows the provider already `AwaitingCompletion`,
    /// verification and dispatch are skipped and the run resumes at polling.
    pub async fn run(&self) -> ProviderResult<AcquisitionOutcome> {
        match self.run_inner().await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                // AuthRequired included: the user has to act either way.
                self.transition(LifecycleState::Failed, Some(e.to_string()))?;
                Err(e)
            }
        }
    }

    async fn run_inner(&self) -> ProviderResult<AcquisitionOutcome> {
        let key = self.provider.key().to_string();
        let resuming = matches!(
            self.states.load(&key)?,
            Some(AcquisitionState {
                state: LifecycleState::AwaitingCompletion,
                ..
            })
        );

        if resuming {
            info!(provider = key, "resuming acquisition at polling");
        } else {
            self.transition(LifecycleState::VerifyingAuth, None)?;
            self.provider.verify().await?;
            if self.cancel.is_cancelled() {
                return self.cancelled();
            }

            self.transition(LifecycleState::Dispatching, None)?;
            self.provider.dispatch().await?;
            self.transition(LifecycleState::AwaitingCompletion, None)?;
        }

        loop {
            if self.cancel.is_cancelled() {
                return self.cancelled();
            }
            if self.provider.poll_completion().await? {
                break;
            }
            debug!(provider = key, interval = ?self.config.interval, "export not ready");
            tokio::select! {
                _ = tokio::time::sleep(self.config.interval) => {}
                _ = self.cancel.wait() => return self.cancelled(),
            }
        }

        self.transition(LifecycleState::Parsing, None)?;
        let files = self.provider.parse().await?;
        self.transition(LifecycleState::Done, None)?;

        info!(provider = key, files = files.len(), "acquisition complete");
        Ok(AcquisitionOutcome::Complete(files))
    }

    fn cancelled(&self) -> ProviderResult<AcquisitionOutcome> {
        warn!(provider = self.provider.key(), "acquisition cancelled");
        self.transition(LifecycleState::Idle, None)?;
        Ok(AcquisitionOutcome::Cancelled)
    }

    /// Persist a state transition and notify subscribers.
    fn transition(&self, state: LifecycleState, last_error: Option<String>) -> ProviderResult<()> {
        let key = self.provider.key();
        let previous = self.states.load(key)?;
        let dispatched_at = match state {
            LifecycleState::AwaitingCompletion => Some(Utc::now()),
            LifecycleState::Idle => None,
            _ => previous.and_then(|s| s.dispatched_at),
        };
        let record = AcquisitionState {
            provider: key.to_string(),
            state,
            dispatched_at,
            last_error,
            updated_at: Utc::now(),
        };
        self.states.save(&record)?;

        debug!(provider = key, state = %state, "lifecycle transition");
        self.bus.emit(
            EventKind::AcquisitionStateChanged,
            EventPayload::Lifecycle {
                provider: key.to_string(),
                state: state.to_string(),
            },
        );
        Ok(())
    }
}
