//! Signature collection progress for one wallet-scoped hash.

use crate::domain::RawMessage;
use crate::foundation::{Address, SignatureBytes, WalletScopedHash};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfirmationStatus {
    Pending,
    Confirmed,
}

/// One owner's partial signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRecord {
    pub owner: Address,
    pub signature: SignatureBytes,
    /// Milliseconds since epoch; `0` when the service did not report it.
    #[serde(default)]
    pub submitted_at: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSignatureState {
    pub hash: WalletScopedHash,
    pub status: ConfirmationStatus,
    pub message: RawMessage,
    pub confirmations_submitted: u32,
    pub confirmations_required: u32,
    #[serde(default)]
    pub confirmations: Vec<SignatureRecord>,
    #[serde(default)]
    pub final_signature: Option<SignatureBytes>,
}

impl AggregateSignatureState {
    pub fn pending(hash: WalletScopedHash, message: RawMessage, required: u32) -> Self {
        Self {
            hash,
            status: ConfirmationStatus::Pending,
            message,
            confirmations_submitted: 0,
            confirmations_required: required,
            confirmations: Vec::new(),
            final_signature: None,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == ConfirmationStatus::Confirmed
    }

    pub fn threshold_met(&self) -> bool {
        self.confirmations_required > 0 && self.confirmations_submitted >= self.confirmations_required
    }

    pub fn distinct_owner_count(&self) -> usize {
        self.confirmations.iter().map(|record| record.owner).collect::<HashSet<_>>().len()
    }

    pub fn has_owner(&self, owner: &Address) -> bool {
        self.confirmations.iter().any(|record| &record.owner == owner)
    }

    /// Records an owner's signature. Duplicate owners and records arriving after confirmation
    /// are ignored. Returns true if the record was accepted.
    pub fn add_confirmation(&mut self, record: SignatureRecord) -> bool {
        if self.is_confirmed() || self.has_owner(&record.owner) {
            return false;
        }
        self.confirmations.push(record);
        self.confirmations_submitted = u32::try_from(self.distinct_owner_count()).unwrap_or(u32::MAX);
        if self.threshold_met() {
            self.status = ConfirmationStatus::Confirmed;
            self.final_signature = Some(aggregate_signature(&self.confirmations));
        }
        true
    }

    /// Checks the state invariants a CONFIRMED record must satisfy before it is trusted.
    pub fn validate(&self) -> Result<(), String> {
        if self.confirmations_required == 0 {
            return Err("confirmationsRequired must be > 0".to_string());
        }
        let distinct = self.distinct_owner_count();
        if distinct != self.confirmations.len() {
            return Err(format!("duplicate owner in confirmations (entries={} distinct={})", self.confirmations.len(), distinct));
        }
        if self.confirmations_submitted as usize != distinct {
            return Err(format!(
                "confirmationsSubmitted={} does not match confirmations listed={}",
                self.confirmations_submitted, distinct
            ));
        }
        match self.status {
            ConfirmationStatus::Confirmed => {
                if !self.threshold_met() {
                    return Err(format!(
                        "status CONFIRMED with submitted={} below required={}",
                        self.confirmations_submitted, self.confirmations_required
                    ));
                }
                if self.final_signature.as_ref().map_or(true, SignatureBytes::is_empty) {
                    return Err("status CONFIRMED without final signature".to_string());
                }
            }
            ConfirmationStatus::Pending => {
                if self.final_signature.is_some() {
                    return Err("final signature present while PENDING".to_string());
                }
            }
        }
        Ok(())
    }
}

/// Concatenates owner signatures in ascending owner-address order, the layout multi-owner
/// wallets expect when checking N signatures.
pub fn aggregate_signature(confirmations: &[SignatureRecord]) -> SignatureBytes {
    let mut sorted: Vec<&SignatureRecord> = confirmations.iter().collect();
    sorted.sort_by_key(|record| record.owner);
    let mut out = Vec::with_capacity(sorted.iter().map(|record| record.signature.len()).sum());
    for record in sorted {
        out.extend_from_slice(record.signature.as_bytes());
    }
    SignatureBytes::new(out)
}
