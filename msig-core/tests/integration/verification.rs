use crate::fixtures::{fast_polling, TestWalletBuilder, HELLO_WORLD};
use alloy::signers::SignerSync;
use msig_core::application::SignatureVerifier;
use msig_core::domain::{content_hash, safe_message_hash, RawMessage};
use msig_core::foundation::{Address, ContentHash, ErrorCode, ECDSA_SIGNATURE_LEN};
use std::sync::Arc;

#[tokio::test]
async fn test_verify_when_content_hash_then_true_and_swapped_hash_then_false() {
    let wallet = TestWalletBuilder::default().owners(2).threshold(2).build();
    let message = RawMessage::text(HELLO_WORLD);
    let hash = content_hash(&message).expect("hash");
    let scoped = safe_message_hash(wallet.chain_id, &wallet.address, &hash);

    let mut signers = wallet.signers.clone();
    signers.sort_by_key(|signer| signer.address());
    let mut aggregate = Vec::new();
    for signer in &signers {
        aggregate.extend_from_slice(&signer.sign_hash_sync(&scoped.to_b256()).expect("sign").as_bytes());
    }

    let verifier = SignatureVerifier::new(wallet.contract.clone());
    assert!(verifier.verify(&wallet.address, &hash, &aggregate).await.expect("verify"));

    let swapped = ContentHash::new(*scoped.as_hash());
    assert!(!verifier.verify(&wallet.address, &swapped, &aggregate).await.expect("verify"));

    let other = content_hash(&RawMessage::text("Hello World?")).expect("hash");
    assert!(!verifier.verify(&wallet.address, &other, &aggregate).await.expect("verify"));
}

#[tokio::test]
async fn test_verify_when_owner_order_or_length_wrong_then_false() {
    let wallet = TestWalletBuilder::default().owners(2).threshold(2).build();
    let hash = content_hash(&RawMessage::text(HELLO_WORLD)).expect("hash");
    let scoped = safe_message_hash(wallet.chain_id, &wallet.address, &hash);

    let mut signers = wallet.signers.clone();
    signers.sort_by_key(|signer| std::cmp::Reverse(signer.address()));
    let mut descending = Vec::new();
    for signer in &signers {
        descending.extend_from_slice(&signer.sign_hash_sync(&scoped.to_b256()).expect("sign").as_bytes());
    }

    let verifier = SignatureVerifier::new(wallet.contract.clone());
    assert!(!verifier.verify(&wallet.address, &hash, &descending).await.expect("verify"));
    assert!(!verifier.verify(&wallet.address, &hash, &descending[..ECDSA_SIGNATURE_LEN]).await.expect("verify"));
    assert!(!verifier.verify(&wallet.address, &hash, &[]).await.expect("verify"));
}

#[tokio::test]
async fn test_verify_when_signed_flow_completes_then_final_signature_verifies() {
    let wallet = TestWalletBuilder::default().owners(1).threshold(1).build();
    let signed = wallet.coordinator(0, fast_polling()).sign_and_verify(RawMessage::text(HELLO_WORLD)).await.expect("signed");
    let signature = signed.state.final_signature.expect("final signature");

    let verifier = SignatureVerifier::new(wallet.contract.clone());
    assert!(verifier.verify(&wallet.address, &signed.content_hash, signature.as_bytes()).await.expect("verify"));
    let swapped = ContentHash::new(*signed.wallet_scoped_hash.as_hash());
    assert!(!verifier.verify(&wallet.address, &swapped, signature.as_bytes()).await.expect("verify"));
}

#[tokio::test]
async fn test_verify_when_wallet_unknown_then_contract_call_failed() {
    let wallet = TestWalletBuilder::default().build();
    let verifier = SignatureVerifier::new(Arc::clone(&wallet.contract) as Arc<dyn msig_core::infrastructure::rpc::WalletContract>);
    let err = verifier.verify(&Address::with_last_byte(0xee), &ContentHash::new([1; 32]), &[0u8; 65]).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ContractCallFailed);
}
