use crate::application::confirmation_poller::ConfirmationPoller;
use crate::application::hash_deriver::HashDeriver;
use crate::application::lifecycle::{LifecycleObserver, NoopObserver};
use crate::application::signing_initiator::SigningInitiator;
use crate::application::verifier::SignatureVerifier;
use crate::domain::{AggregateSignatureState, MessagePhase, RawMessage, VerificationOutcome};
use crate::foundation::{Address, ContentHash, SigningError, WalletScopedHash};
use crate::infrastructure::collection::SignatureCollectionService;
use crate::infrastructure::config::PollingConfig;
use crate::infrastructure::rpc::WalletContract;
use crate::infrastructure::transport::{SigningAck, SigningTransport};
use log::debug;
use std::sync::Arc;

/// One message's progress through the signing workflow.
#[derive(Clone, Debug)]
pub struct MessageSession {
    pub phase: MessagePhase,
    pub message: RawMessage,
    pub content_hash: Option<ContentHash>,
    pub wallet_scoped_hash: Option<WalletScopedHash>,
    pub ack: Option<SigningAck>,
    pub state: Option<AggregateSignatureState>,
    pub outcome: Option<VerificationOutcome>,
}

impl MessageSession {
    fn new(message: RawMessage) -> Self {
        Self {
            phase: MessagePhase::Drafted,
            message,
            content_hash: None,
            wallet_scoped_hash: None,
            ack: None,
            state: None,
            outcome: None,
        }
    }
}

/// Result of a complete sign-and-verify run.
#[derive(Clone, Debug)]
pub struct SignedMessage {
    pub message: RawMessage,
    pub content_hash: ContentHash,
    pub wallet_scoped_hash: WalletScopedHash,
    pub state: AggregateSignatureState,
    pub verified: bool,
}

pub struct MessageSigningCoordinator {
    wallet: Address,
    deriver: HashDeriver,
    initiator: SigningInitiator,
    poller: ConfirmationPoller,
    verifier: SignatureVerifier,
    polling: PollingConfig,
    lifecycle: Arc<dyn LifecycleObserver>,
}

impl MessageSigningCoordinator {
    pub fn new(
        wallet: Address,
        contract: Arc<dyn WalletContract>,
        service: Arc<dyn SignatureCollectionService>,
        transport: Arc<dyn SigningTransport>,
        polling: PollingConfig,
    ) -> Self {
        Self {
            wallet,
            deriver: HashDeriver::new(contract.clone()),
            initiator: SigningInitiator::new(transport),
            poller: ConfirmationPoller::new(service),
            verifier: SignatureVerifier::new(contract),
            polling,
            lifecycle: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.lifecycle = observer;
        self
    }

    /// Replaces the signing initiator, e.g. one bound to a different owner transport.
    pub fn with_initiator(mut self, initiator: SigningInitiator) -> Self {
        self.initiator = initiator;
        self
    }

    pub fn wallet(&self) -> &Address {
        &self.wallet
    }

    pub fn draft(&self, message: RawMessage) -> MessageSession {
        MessageSession::new(message)
    }

    pub async fn derive_hashes(&self, session: &mut MessageSession) -> Result<(), SigningError> {
        ensure_transition(session.phase, MessagePhase::HashDerived)?;
        let result = async {
            let content_hash = self.deriver.content_hash(&session.message)?;
            let scoped = self.deriver.wallet_scoped_hash(&self.wallet, &content_hash).await?;
            Ok::<_, SigningError>((content_hash, scoped))
        }
        .await;
        let (content_hash, scoped) = self.observe_failure(session, result)?;
        session.content_hash = Some(content_hash);
        session.wallet_scoped_hash = Some(scoped);
        self.advance(session, MessagePhase::HashDerived)
    }

    pub async fn request_signature(&self, session: &mut MessageSession) -> Result<SigningAck, SigningError> {
        ensure_transition(session.phase, MessagePhase::SigningRequested)?;
        let scoped = required(session.wallet_scoped_hash, session.phase, MessagePhase::SigningRequested)?;
        let result = self.initiator.request_signature(&self.wallet, &session.message).await.and_then(|ack| {
            if !ack.wallet_scoped_hash.ct_eq(&scoped) {
                return Err(SigningError::transport_error(
                    "request_signature",
                    format!("owner signed {} but the wallet derives {}", ack.wallet_scoped_hash, scoped),
                ));
            }
            Ok(ack)
        });
        let ack = self.observe_failure(session, result)?;
        self.lifecycle.on_signature_requested(&ack);
        session.ack = Some(ack.clone());
        self.advance(session, MessagePhase::SigningRequested)?;
        Ok(ack)
    }

    pub async fn await_confirmation(&self, session: &mut MessageSession) -> Result<AggregateSignatureState, SigningError> {
        if session.phase != MessagePhase::Pending {
            ensure_transition(session.phase, MessagePhase::Pending)?;
            self.advance(session, MessagePhase::Pending)?;
        }
        let scoped = required(session.wallet_scoped_hash, session.phase, MessagePhase::Confirmed)?;
        let result = self.poller.await_confirmation(&scoped, self.polling.interval(), self.polling.timeout()).await;
        let state = self.observe_failure(session, result)?;
        self.lifecycle.on_confirmed(&state);
        session.state = Some(state.clone());
        self.advance(session, MessagePhase::Confirmed)?;
        Ok(state)
    }

    pub async fn verify(&self, session: &mut MessageSession) -> Result<bool, SigningError> {
        if session.phase != MessagePhase::Confirmed {
            return Err(SigningError::invalid_transition(session.phase, MessagePhase::Verified));
        }
        let content_hash = required(session.content_hash, session.phase, MessagePhase::Verified)?;
        let signature = session
            .state
            .as_ref()
            .and_then(|state| state.final_signature.clone())
            .ok_or_else(|| SigningError::invalid_transition(session.phase, MessagePhase::Verified))?;

        let result = self.verifier.outcome(&self.wallet, &content_hash, signature.as_bytes()).await;
        let outcome = self.observe_failure(session, result)?;
        self.lifecycle.on_verified(&content_hash, outcome.is_verified());
        session.outcome = Some(outcome);
        let target = if outcome.is_verified() { MessagePhase::Verified } else { MessagePhase::VerificationFailed };
        self.advance(session, target)?;
        Ok(outcome.is_verified())
    }

    /// Runs the whole workflow for `message`.
    pub async fn sign_and_verify(&self, message: RawMessage) -> Result<SignedMessage, SigningError> {
        let mut session = self.draft(message);
        self.derive_hashes(&mut session).await?;
        self.request_signature(&mut session).await?;
        let state = self.await_confirmation(&mut session).await?;
        let verified = self.verify(&mut session).await?;

        let content_hash = required(session.content_hash, session.phase, session.phase)?;
        let wallet_scoped_hash = required(session.wallet_scoped_hash, session.phase, session.phase)?;
        Ok(SignedMessage { message: session.message, content_hash, wallet_scoped_hash, state, verified })
    }

    fn advance(&self, session: &mut MessageSession, target: MessagePhase) -> Result<(), SigningError> {
        ensure_transition(session.phase, target)?;
        debug!("message phase transition from={:?} to={:?}", session.phase, target);
        self.lifecycle.on_phase_changed(session.wallet_scoped_hash.as_ref(), session.phase, target);
        session.phase = target;
        Ok(())
    }

    fn observe_failure<T>(&self, session: &MessageSession, result: Result<T, SigningError>) -> Result<T, SigningError> {
        if let Err(err) = &result {
            self.lifecycle.on_failed(session.phase, &err.to_string());
        }
        result
    }
}

fn ensure_transition(from: MessagePhase, to: MessagePhase) -> Result<(), SigningError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(SigningError::invalid_transition(from, to))
    }
}

fn required<T>(value: Option<T>, from: MessagePhase, to: MessagePhase) -> Result<T, SigningError> {
    value.ok_or_else(|| SigningError::invalid_transition(from, to))
}
