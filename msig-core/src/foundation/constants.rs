//! System-wide constants for off-chain message signing.

/// EIP-1271 `isValidSignature(bytes32,bytes)` return value for a valid signature.
pub const EIP1271_MAGIC_VALUE: [u8; 4] = [0x16, 0x26, 0xba, 0x7e];

/// Return value used by the in-process wallet contract for an invalid signature.
pub const EIP1271_INVALID_VALUE: [u8; 4] = [0xff, 0xff, 0xff, 0xff];

/// `keccak256("EIP712Domain(uint256 chainId,address verifyingContract)")` preimage.
pub const SAFE_DOMAIN_SEPARATOR_TYPE: &str = "EIP712Domain(uint256 chainId,address verifyingContract)";

/// `keccak256("SafeMessage(bytes message)")` preimage.
pub const SAFE_MSG_TYPE: &str = "SafeMessage(bytes message)";

/// Length of a single owner ECDSA signature (`r || s || v`).
pub const ECDSA_SIGNATURE_LEN: usize = 65;

/// Default delay between confirmation polls.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;

/// Default deadline for confirmation polling (2 minutes).
pub const DEFAULT_POLL_TIMEOUT_MS: u64 = 120_000;

/// Default timeout for a single collection service HTTP request.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;

/// Upper bound for the configured poll deadline (1 hour).
pub const MAX_POLL_TIMEOUT_MS: u64 = 60 * 60 * 1_000;

/// Overrides wall-clock time in tests (milliseconds since epoch).
pub const TEST_NOW_MILLIS_ENV_VAR: &str = "MSIG_TEST_NOW_MILLIS";
