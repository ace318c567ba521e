use crate::domain::{AggregateSignatureState, MessagePhase};
use crate::foundation::{ContentHash, WalletScopedHash};
use crate::infrastructure::transport::SigningAck;
use log::{debug, info, trace, warn};
use std::sync::Arc;

/// Hooks fired as a message moves through the signing workflow.
pub trait LifecycleObserver: Send + Sync {
    fn on_phase_changed(&self, _hash: Option<&WalletScopedHash>, _from: MessagePhase, _to: MessagePhase) {}
    fn on_signature_requested(&self, _ack: &SigningAck) {}
    fn on_confirmed(&self, _state: &AggregateSignatureState) {}
    fn on_verified(&self, _hash: &ContentHash, _verified: bool) {}
    fn on_failed(&self, _phase: MessagePhase, _reason: &str) {}
}

pub struct NoopObserver;

impl LifecycleObserver for NoopObserver {}

pub struct CompositeObserver {
    observers: Vec<Arc<dyn LifecycleObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self { observers: Vec::new() }
    }

    pub fn add_observer(&mut self, observer: Arc<dyn LifecycleObserver>) {
        self.observers.push(observer);
    }
}

impl Default for CompositeObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleObserver for CompositeObserver {
    fn on_phase_changed(&self, hash: Option<&WalletScopedHash>, from: MessagePhase, to: MessagePhase) {
        trace!("on_phase_changed dispatch observer_count={}", self.observers.len());
        for observer in &self.observers {
            observer.on_phase_changed(hash, from, to);
        }
    }

    fn on_signature_requested(&self, ack: &SigningAck) {
        for observer in &self.observers {
            observer.on_signature_requested(ack);
        }
    }

    fn on_confirmed(&self, state: &AggregateSignatureState) {
        for observer in &self.observers {
            observer.on_confirmed(state);
        }
    }

    fn on_verified(&self, hash: &ContentHash, verified: bool) {
        for observer in &self.observers {
            observer.on_verified(hash, verified);
        }
    }

    fn on_failed(&self, phase: MessagePhase, reason: &str) {
        for observer in &self.observers {
            observer.on_failed(phase, reason);
        }
    }
}

/// Writes each lifecycle step to the log.
pub struct LoggingObserver;

impl LifecycleObserver for LoggingObserver {
    fn on_phase_changed(&self, hash: Option<&WalletScopedHash>, from: MessagePhase, to: MessagePhase) {
        debug!("message phase changed wallet_scoped_hash={} from={:?} to={:?}", display_hash(hash), from, to);
    }

    fn on_signature_requested(&self, ack: &SigningAck) {
        info!("signature requested wallet_scoped_hash={} owner={} submitted_at={}", ack.wallet_scoped_hash, ack.owner, ack.submitted_at);
    }

    fn on_confirmed(&self, state: &AggregateSignatureState) {
        info!(
            "message confirmed wallet_scoped_hash={} submitted={} required={}",
            state.hash, state.confirmations_submitted, state.confirmations_required
        );
    }

    fn on_verified(&self, hash: &ContentHash, verified: bool) {
        info!("signature verification content_hash={} verified={}", hash, verified);
    }

    fn on_failed(&self, phase: MessagePhase, reason: &str) {
        warn!("message workflow failed phase={:?} reason={}", phase, reason);
    }
}

fn display_hash(hash: Option<&WalletScopedHash>) -> String {
    hash.map(ToString::to_string).unwrap_or_else(|| "-".to_string())
}
