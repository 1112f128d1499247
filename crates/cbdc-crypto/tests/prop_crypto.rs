// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PROPERTY-BASED TESTS — cbdc-crypto
//
// Verifies keyed-MAC and content-hash invariants:
// - MAC round-trips with the same secret and field set
// - MAC fails under field tamper or wrong secret
// - content_hash is deterministic and sensitive to input
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use cbdc_crypto::{compute_keyed_mac, content_hash, verify_keyed_mac, Secret};
use proptest::prelude::*;

proptest! {
    /// PROPERTY: sign then verify always succeeds with the same secret and fields
    #[test]
    fn prop_mac_roundtrip(
        secret in proptest::collection::vec(any::<u8>(), 1..=64),
        sender in "[a-z]{1,12}",
        recipient in "[a-z]{1,12}",
        amount in 0u64..1_000_000,
    ) {
        let key = Secret::new(secret);
        let amount_bytes = amount.to_string();
        let fields: Vec<&[u8]> = vec![sender.as_bytes(), recipient.as_bytes(), amount_bytes.as_bytes()];
        let tag = compute_keyed_mac(&key, &fields);
        prop_assert!(verify_keyed_mac(&key, &fields, &tag));
    }

    /// PROPERTY: verification fails with the wrong secret
    #[test]
    fn prop_mac_wrong_secret_fails(
        secret_a in proptest::collection::vec(any::<u8>(), 1..=32),
        secret_b in proptest::collection::vec(any::<u8>(), 1..=32),
        sender in "[a-z]{1,12}",
    ) {
        prop_assume!(secret_a != secret_b);
        let key_a = Secret::new(secret_a);
        let key_b = Secret::new(secret_b);
        let fields: Vec<&[u8]> = vec![sender.as_bytes()];
        let tag = compute_keyed_mac(&key_a, &fields);
        prop_assert!(!verify_keyed_mac(&key_b, &fields, &tag));
    }

    /// PROPERTY: tampering any field invalidates the tag
    #[test]
    fn prop_mac_tamper_fails(
        secret in proptest::collection::vec(any::<u8>(), 1..=32),
        amount in 1u64..1_000_000,
    ) {
        let key = Secret::new(secret);
        let amount_bytes = amount.to_string();
        let fields: Vec<&[u8]> = vec![b"alice", b"bob", amount_bytes.as_bytes()];
        let tag = compute_keyed_mac(&key, &fields);

        let tampered_amount = (amount + 1).to_string();
        let tampered: Vec<&[u8]> = vec![b"alice", b"bob", tampered_amount.as_bytes()];
        prop_assert!(!verify_keyed_mac(&key, &tampered, &tag));
    }

    /// PROPERTY: content_hash is deterministic
    #[test]
    fn prop_content_hash_deterministic(bytes in proptest::collection::vec(any::<u8>(), 0..=512)) {
        let a = content_hash(&bytes);
        let b = content_hash(&bytes);
        prop_assert_eq!(a.clone(), b);
        prop_assert_eq!(a.len(), 64);
    }

    /// PROPERTY: distinct inputs (overwhelmingly) hash differently
    #[test]
    fn prop_content_hash_sensitive(
        bytes in proptest::collection::vec(any::<u8>(), 1..=256),
        extra in any::<u8>(),
    ) {
        let mut tampered = bytes.clone();
        tampered.push(extra);
        prop_assert_ne!(content_hash(&bytes), content_hash(&tampered));
    }
}
