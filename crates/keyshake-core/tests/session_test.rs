//! Handshake session conformance tests.
//!
//! Exercises the public API the surrounding transport uses: create a session,
//! exchange encoded public keys, derive entropy.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use keyshake_core::{
    compute_shared_entropy, create_session, get_local_public_key, ErrorKind, HardwarePolicy,
    KeyPairProvider, Session, SessionConfig, ENTROPY_LEN,
};
use keyshake_crypto::codec::decode_public_key;
use keyshake_crypto::keypair::SoftwareKeyPair;
use keyshake_crypto::{derive_entropy, DerivationScratch};
use keyshake_platform::mock::{MockBehavior, MockKeyStore};
use p256::elliptic_curve::sec1::ToEncodedPoint;

fn session(label: &str) -> Session {
    create_session(label).expect("session creation should not fail without hardware")
}

// ============================================================================
// Agreement
// ============================================================================

#[test]
fn test_agreement_symmetry() {
    let mut alice = session("alice");
    let mut bob = session("bob");

    let alice_key = get_local_public_key(&alice);
    let bob_key = get_local_public_key(&bob);

    let alice_entropy = compute_shared_entropy(&mut alice, &bob_key).unwrap();
    let bob_entropy = compute_shared_entropy(&mut bob, &alice_key).unwrap();

    assert_eq!(*alice_entropy, *bob_entropy, "Both sides must derive identical entropy");
}

#[test]
fn test_determinism_for_fixed_keys() {
    let mut alice = session("alice");
    let bob = session("bob");
    let bob_key = get_local_public_key(&bob);

    let first = compute_shared_entropy(&mut alice, &bob_key).unwrap();
    let second = compute_shared_entropy(&mut alice, &bob_key).unwrap();

    assert_eq!(*first, *second, "No randomness is injected at derivation");
}

#[test]
fn test_output_length() {
    for _ in 0..8 {
        let mut alice = session("alice");
        let bob = session("bob");

        let entropy = compute_shared_entropy(&mut alice, &get_local_public_key(&bob)).unwrap();
        assert_eq!(entropy.len(), ENTROPY_LEN);
        assert_eq!(entropy.len(), 32);
    }
}

#[test]
fn test_distinct_peers_give_distinct_entropy() {
    let mut alice = session("alice");
    let bob = session("bob");
    let carol = session("carol");

    let with_bob = compute_shared_entropy(&mut alice, &get_local_public_key(&bob)).unwrap();
    let with_carol = compute_shared_entropy(&mut alice, &get_local_public_key(&carol)).unwrap();

    assert_ne!(*with_bob, *with_carol);
}

// ============================================================================
// Encoding
// ============================================================================

#[test]
fn test_local_key_is_der_spki() {
    let alice = session("alice");
    let der = BASE64.decode(get_local_public_key(&alice)).unwrap();

    // SEQUENCE { SEQUENCE { id-ecPublicKey, prime256v1 }, BIT STRING { 0x04 ... } }
    let expected_prefix =
        hex::decode("3059301306072a8648ce3d020106082a8648ce3d03010703420004").unwrap();
    assert_eq!(der.len(), 91);
    assert_eq!(&der[..expected_prefix.len()], expected_prefix.as_slice());
}

#[test]
fn test_round_trip_agrees_with_third_party() {
    let keypair = SoftwareKeyPair::generate().unwrap();
    let encoded = keyshake_crypto::encode_public_key(keypair.public_key()).unwrap();
    let decoded = decode_public_key(&encoded).unwrap();

    let third = SoftwareKeyPair::generate().unwrap();
    let mut scratch = DerivationScratch::new();

    let via_decoded = derive_entropy(&mut scratch, |out| {
        third.agree(decoded.as_public_key(), out)
    })
    .unwrap();
    let via_original = derive_entropy(&mut scratch, |out| {
        third.agree(keypair.public_key(), out)
    })
    .unwrap();

    assert_eq!(*via_decoded, *via_original);
}

#[test]
fn test_local_key_is_stable() {
    let alice = session("alice");
    assert_eq!(get_local_public_key(&alice), get_local_public_key(&alice));
}

// ============================================================================
// Malformed input
// ============================================================================

#[test]
fn test_reject_non_base64() {
    let mut alice = session("alice");

    let err = compute_shared_entropy(&mut alice, "not-base64!!").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedEncoding);
    assert!(err.kind().is_remote_input());
}

#[test]
fn test_reject_random_bytes() {
    let mut alice = session("alice");
    let mut random = [0u8; 32];
    rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut random);

    let err = compute_shared_entropy(&mut alice, &BASE64.encode(random)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidKey);
}

#[test]
fn test_reject_raw_sec1_point() {
    // An uncompressed point without the SPKI wrapper is not accepted.
    let mut alice = session("alice");
    let bob = SoftwareKeyPair::generate().unwrap();
    let sec1 = bob.public_key().to_encoded_point(false);

    let err = compute_shared_entropy(&mut alice, &BASE64.encode(sec1.as_bytes())).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidKey);
}

// ============================================================================
// Zeroization
// ============================================================================

#[test]
fn test_scratch_wiped_after_success() {
    let mut alice = session("alice");
    let bob = session("bob");

    let entropy = compute_shared_entropy(&mut alice, &get_local_public_key(&bob)).unwrap();
    assert_ne!(*entropy, [0u8; 32]);
    assert!(alice.scratch_is_wiped(), "No secret bytes may remain after success");
}

#[test]
fn test_scratch_wiped_after_failure() {
    let store = MockKeyStore::new(MockBehavior::FailsOnAgree);
    let provider = KeyPairProvider::new(Box::new(store));
    let mut alice = Session::with_provider("alice", &provider).unwrap();
    let bob = session("bob");

    let err = compute_shared_entropy(&mut alice, &get_local_public_key(&bob)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ComputationFailed);
    assert!(alice.scratch_is_wiped(), "No secret bytes may remain after failure");
}

// ============================================================================
// Preconditions and initialization
// ============================================================================

#[test]
fn test_derive_without_remote_key() {
    let mut alice = session("alice");

    let err = alice.derive_entropy().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RemoteKeyNotSet);
}

#[test]
fn test_hardware_failure_is_initialization_error() {
    let store = MockKeyStore::new(MockBehavior::FailsOnGenerate);
    let provider = KeyPairProvider::new(Box::new(store));

    let err = Session::with_provider("alice", &provider).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Initialization);
    assert!(!err.kind().is_remote_input());
}

#[test]
fn test_hardware_unavailable_falls_back_to_software() {
    let store = MockKeyStore::new(MockBehavior::Unavailable);
    let provider = KeyPairProvider::new(Box::new(store));

    let alice = Session::with_provider("alice", &provider).unwrap();
    assert!(!alice.is_hardware_backed());
}

#[test]
fn test_hardware_vanishing_after_availability_check_is_initialization_error() {
    let store = MockKeyStore::new(MockBehavior::VanishesOnGenerate);
    let provider = KeyPairProvider::new(Box::new(store.clone()));

    let err = Session::with_provider("alice", &provider).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Initialization);
    assert_eq!(store.generate_attempts(), 1, "Hardware creation must have been attempted");
}

#[test]
fn test_software_only_config() {
    let alice = Session::with_config(
        "alice",
        SessionConfig {
            hardware_policy: HardwarePolicy::SoftwareOnly,
        },
    )
    .unwrap();

    assert!(!alice.is_hardware_backed());
    assert_eq!(alice.label(), "alice");
}

#[test]
fn test_into_buffer_matches_returned_entropy() {
    let mut alice = session("alice");
    let mut bob = session("bob");
    let alice_key = get_local_public_key(&alice);
    let bob_key = get_local_public_key(&bob);

    let mut out = [0u8; ENTROPY_LEN];
    alice.compute_shared_entropy_into(&bob_key, &mut out).unwrap();
    let expected = compute_shared_entropy(&mut bob, &alice_key).unwrap();

    assert_eq!(out, *expected);
}
