use cbdc_authority::{OwnerCategory, SettlementAuthority};
use cbdc_core::SystemConfig;
use cbdc_crypto::Secret;
use proptest::prelude::*;

fn seeded_authority(reserve: u64) -> (SettlementAuthority, String, String, String) {
    let mut authority = SettlementAuthority::new(SystemConfig::default(), Secret::from_str("prop-secret")).unwrap();
    let alice = authority.register_owner(OwnerCategory::Individual).unwrap();
    let bob = authority.register_owner(OwnerCategory::Individual).unwrap();
    let intermediary = authority.register_intermediary("I1", "R1", 0).unwrap();
    authority.fund_non_digital_reserve(&intermediary, reserve).unwrap();
    let request = authority.request_emission(&intermediary, reserve, "seed", 0).unwrap();
    authority.decide_emission(&request, true, 0).unwrap();
    authority.process_pending(0).unwrap();
    authority.exchange(&alice, &intermediary, reserve).unwrap();
    authority.process_pending(1).unwrap();
    (authority, alice, bob, intermediary)
}

proptest! {
    /// (W1): a sequence of online transfers never drives either owner's
    /// online balance negative, regardless of amounts attempted.
    #[test]
    fn online_transfers_never_go_negative(amounts in prop::collection::vec(1u64..500, 1..20)) {
        let (mut authority, alice, bob, _intermediary) = seeded_authority(1_000);
        let mut now = 2;
        for amount in amounts {
            let _ = authority.submit_online_transfer(&alice, &bob, amount);
            now += 1;
            authority.process_pending(now).unwrap();
        }
        let alice_balance = authority.owner(&alice).unwrap();
        let bob_balance = authority.owner(&bob).unwrap();
        prop_assert!(alice_balance.online_digital <= 1_000);
        prop_assert!(bob_balance.online_digital <= 1_000);
    }

    /// Total committed ledger height never exceeds the number of
    /// process_pending calls that found a non-empty queue.
    #[test]
    fn ledger_height_is_monotonic(amounts in prop::collection::vec(1u64..50, 0..10)) {
        let (mut authority, alice, bob, _intermediary) = seeded_authority(10_000);
        let mut previous_height = authority.ledger_info().height;
        let mut now = 2;
        for amount in amounts {
            authority.submit_online_transfer(&alice, &bob, amount).ok();
            now += 1;
            authority.process_pending(now).unwrap();
            let height = authority.ledger_info().height;
            prop_assert!(height >= previous_height);
            previous_height = height;
        }
    }
}
