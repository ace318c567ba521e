//! Domain layer: message model, hashing and confirmation rules. No I/O.

pub mod confirmation;
pub mod hashes;
pub mod lifecycle;
pub mod message;
pub mod verification;

pub use confirmation::{aggregate_signature, AggregateSignatureState, ConfirmationStatus, SignatureRecord};
pub use hashes::{content_hash, safe_domain_separator, safe_message_hash};
pub use lifecycle::MessagePhase;
pub use message::RawMessage;
pub use verification::{is_valid_magic, recover_owners, split_signatures, VerificationOutcome};
