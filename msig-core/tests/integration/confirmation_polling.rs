use crate::fixtures::{next_u64, record_for};
use msig_core::application::ConfirmationPoller;
use msig_core::domain::{AggregateSignatureState, ConfirmationStatus, RawMessage};
use msig_core::foundation::{ErrorCode, SignatureBytes, SigningError, WalletScopedHash};
use msig_core::infrastructure::collection::MemoryCollectionService;
use std::sync::Arc;
use std::time::Duration;

const INTERVAL: Duration = Duration::from_millis(10);
const TIMEOUT: Duration = Duration::from_millis(100);

fn poller(service: &MemoryCollectionService) -> ConfirmationPoller {
    ConfirmationPoller::new(Arc::new(service.clone()))
}

#[tokio::test(start_paused = true)]
async fn test_poll_when_hash_unknown_then_not_found_after_deadline() {
    let service = MemoryCollectionService::new();
    let err = poller(&service).await_confirmation(&WalletScopedHash::new([9; 32]), INTERVAL, TIMEOUT).await.unwrap_err();
    assert!(matches!(err, SigningError::NotFound { .. }), "{err}");
    assert!(service.reads() >= 2);
}

#[tokio::test]
async fn test_poll_when_zero_timeout_then_polls_exactly_once() {
    let service = MemoryCollectionService::new();
    let err = poller(&service).await_confirmation(&WalletScopedHash::new([9; 32]), INTERVAL, Duration::ZERO).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(service.reads(), 1);
}

#[tokio::test]
async fn test_poll_when_service_down_then_error_surfaces_without_retry() {
    let service = MemoryCollectionService::new();
    service.set_unavailable(Some(503));
    let err = poller(&service).await_confirmation(&WalletScopedHash::new([9; 32]), INTERVAL, TIMEOUT).await.unwrap_err();
    assert!(matches!(err, SigningError::ServiceError { status: Some(503), .. }), "{err}");
    assert_eq!(service.reads(), 1);
}

#[tokio::test]
async fn test_poll_when_confirmed_below_threshold_then_invalid_response() {
    let service = MemoryCollectionService::new();
    let hash = WalletScopedHash::new([4; 32]);
    let mut rng = 1u64;
    let mut state = AggregateSignatureState::pending(hash, RawMessage::text("m"), 2);
    state.add_confirmation(record_for(1, &mut rng));
    state.status = ConfirmationStatus::Confirmed;
    state.final_signature = Some(SignatureBytes::new(vec![1; 65]));
    service.insert_state(state);

    let err = poller(&service).await_confirmation(&hash, INTERVAL, TIMEOUT).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidServiceResponse, "{err}");
}

#[tokio::test(start_paused = true)]
async fn test_poll_when_generated_states_then_confirmed_only_with_threshold() {
    for seed in 0u64..60 {
        let mut rng = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
        let service = MemoryCollectionService::new();
        let hash = WalletScopedHash::new([seed as u8; 32]);
        let required = (next_u64(&mut rng) % 4 + 1) as u32;
        let mut state = AggregateSignatureState::pending(hash, RawMessage::text("m"), required);
        for _ in 0..(next_u64(&mut rng) % 6) {
            state.add_confirmation(record_for((next_u64(&mut rng) % 5 + 1) as u8, &mut rng));
        }
        service.insert_state(state);

        match poller(&service).await_confirmation(&hash, INTERVAL, TIMEOUT).await {
            Ok(confirmed) => {
                assert!(confirmed.is_confirmed(), "seed={seed}");
                assert!(confirmed.confirmations_submitted >= confirmed.confirmations_required, "seed={seed}");
            }
            Err(SigningError::Timeout { submitted, required: reported, .. }) => {
                assert!(submitted < reported, "seed={seed}");
                assert_eq!(reported, required);
            }
            Err(other) => panic!("seed={seed}: unexpected error {other}"),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_poll_when_two_callers_wait_on_same_hash_then_both_confirmed() {
    let service = MemoryCollectionService::new();
    let hash = WalletScopedHash::new([8; 32]);
    let mut rng = 3u64;
    let mut state = AggregateSignatureState::pending(hash, RawMessage::text("m"), 2);
    state.add_confirmation(record_for(1, &mut rng));
    service.insert_state(state.clone());

    let first = poller(&service);
    let second = poller(&service);
    let writer = service.clone();
    let confirm = async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        state.add_confirmation(record_for(2, &mut rng));
        writer.insert_state(state);
    };

    let (a, b, ()) = tokio::join!(
        first.await_confirmation(&hash, INTERVAL, Duration::from_secs(1)),
        second.await_confirmation(&hash, INTERVAL, Duration::from_secs(1)),
        confirm
    );
    let a = a.expect("first confirmed");
    let b = b.expect("second confirmed");
    assert_eq!(a.final_signature, b.final_signature);
}

#[tokio::test(start_paused = true)]
async fn test_poll_when_timeout_unbounded_then_waits_until_confirmed() {
    let service = MemoryCollectionService::new();
    let hash = WalletScopedHash::new([6; 32]);
    let mut rng = 5u64;
    let mut state = AggregateSignatureState::pending(hash, RawMessage::text("m"), 2);
    state.add_confirmation(record_for(1, &mut rng));
    service.insert_state(state.clone());

    let writer = service.clone();
    let confirm = async move {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        state.add_confirmation(record_for(2, &mut rng));
        writer.insert_state(state);
    };

    let poller = poller(&service);
    let (confirmed, ()) = tokio::join!(poller.await_confirmation(&hash, Duration::from_secs(60), Duration::MAX), confirm);
    let confirmed = confirmed.expect("confirmed");
    assert!(confirmed.is_confirmed());
    assert!(service.reads() >= 60);
}
