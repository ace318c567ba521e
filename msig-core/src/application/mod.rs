//! Application layer: orchestration across domain logic and infrastructure I/O.

pub mod confirmation_poller;
pub mod coordinator;
pub mod hash_deriver;
pub mod lifecycle;
pub mod signing_initiator;
pub mod verifier;

pub use confirmation_poller::ConfirmationPoller;
pub use coordinator::{MessageSession, MessageSigningCoordinator, SignedMessage};
pub use hash_deriver::HashDeriver;
pub use lifecycle::{CompositeObserver, LifecycleObserver, LoggingObserver, NoopObserver};
pub use signing_initiator::SigningInitiator;
pub use verifier::SignatureVerifier;
