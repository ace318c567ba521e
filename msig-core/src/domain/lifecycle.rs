use serde::{Deserialize, Serialize};

/// Per-message workflow phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum MessagePhase {
    #[default]
    Drafted = 0,
    HashDerived = 1,
    SigningRequested = 2,
    Pending = 3,
    Confirmed = 4,
    Verified = 5,
    VerificationFailed = 6,
}

impl MessagePhase {
    pub fn can_transition_to(self, target: MessagePhase) -> bool {
        use MessagePhase::*;
        matches!(
            (self, target),
            (Drafted, HashDerived)
                | (HashDerived, SigningRequested)
                | (SigningRequested, Pending)
                | (SigningRequested, Confirmed)
                | (Pending, Confirmed)
                | (Confirmed, Verified)
                | (Confirmed, VerificationFailed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, MessagePhase::Verified | MessagePhase::VerificationFailed)
    }
}
