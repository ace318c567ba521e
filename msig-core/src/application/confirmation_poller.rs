use crate::domain::AggregateSignatureState;
use crate::foundation::{SigningError, WalletScopedHash};
use crate::infrastructure::collection::SignatureCollectionService;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

pub struct ConfirmationPoller {
    service: Arc<dyn SignatureCollectionService>,
}

impl ConfirmationPoller {
    pub fn new(service: Arc<dyn SignatureCollectionService>) -> Self {
        Self { service }
    }

    /// Polls until the record for `hash` is CONFIRMED or `timeout` elapses. At least one poll is
    /// made, and one more at the deadline. A timeout past the clock's range never expires.
    /// Service errors end polling immediately.
    pub async fn await_confirmation(
        &self,
        hash: &WalletScopedHash,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<AggregateSignatureState, SigningError> {
        let started = Instant::now();
        // None: timeout too large to represent, poll until confirmed.
        let deadline = started.checked_add(timeout);
        let interval = poll_interval.max(MIN_POLL_INTERVAL);
        let mut last_pending: Option<AggregateSignatureState> = None;
        let mut polls = 0u32;

        loop {
            polls = polls.saturating_add(1);
            match self.service.get_message(hash).await? {
                Some(state) => {
                    check_state(hash, &state)?;
                    if state.is_confirmed() {
                        info!(
                            "confirmation observed wallet_scoped_hash={} submitted={} required={} polls={} elapsed_ms={}",
                            hash,
                            state.confirmations_submitted,
                            state.confirmations_required,
                            polls,
                            started.elapsed().as_millis()
                        );
                        return Ok(state);
                    }
                    debug!(
                        "confirmation pending wallet_scoped_hash={} submitted={} required={} polls={}",
                        hash, state.confirmations_submitted, state.confirmations_required, polls
                    );
                    last_pending = Some(state);
                }
                None => debug!("message record not yet visible wallet_scoped_hash={} polls={}", hash, polls),
            }

            let Some(deadline) = deadline else {
                sleep(interval).await;
                continue;
            };
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            sleep(interval.min(remaining)).await;
        }

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match last_pending {
            Some(state) => {
                warn!(
                    "confirmation timed out wallet_scoped_hash={} submitted={} required={} polls={} elapsed_ms={}",
                    hash, state.confirmations_submitted, state.confirmations_required, polls, elapsed_ms
                );
                Err(SigningError::Timeout {
                    hash: hash.to_string(),
                    elapsed_ms,
                    submitted: state.confirmations_submitted,
                    required: state.confirmations_required,
                })
            }
            None => {
                warn!("message record never observed wallet_scoped_hash={} polls={} elapsed_ms={}", hash, polls, elapsed_ms);
                Err(SigningError::NotFound { hash: hash.to_string() })
            }
        }
    }
}

fn check_state(hash: &WalletScopedHash, state: &AggregateSignatureState) -> Result<(), SigningError> {
    if !state.hash.ct_eq(hash) {
        return Err(SigningError::invalid_response(hash, format!("record is for a different hash {}", state.hash)));
    }
    state.validate().map_err(|reason| SigningError::invalid_response(hash, reason))
}
