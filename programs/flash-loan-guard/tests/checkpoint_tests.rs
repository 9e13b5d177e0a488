mod common;

use common::*;
use flash_loan_guard::{events::FlashGuardEvent, FlashGuardError, FlashLoanEngine};
use solana_program::pubkey::Pubkey;

#[test]
fn test_deposit_sequence_balance_change_limit() {
    let mut engine = FlashLoanEngine::default();
    let asset = Pubkey::new_unique();
    let provider = ctx(Pubkey::new_unique());
    engine.deposit(&provider, &asset, 1000).unwrap();

    // The validator sees the balance before each deposit is applied
    let mut alice = next_window(&ctx(Pubkey::new_unique()));
    assert_eq!(engine.deposit(&alice, &asset, 400), Ok(1400));
    assert_eq!(engine.checkpoint(&alice.caller).balance, 1000);

    alice = next_window(&alice);
    assert_eq!(engine.deposit(&alice, &asset, 800), Ok(2200));
    assert_eq!(engine.checkpoint(&alice.caller).balance, 1400);

    alice = next_window(&alice);
    assert_eq!(
        engine.deposit(&alice, &asset, 1),
        Err(FlashGuardError::ExcessiveBalanceChange)
    );
    assert_eq!(engine.available(&asset), 2200);
    assert_eq!(engine.checkpoint(&alice.caller).balance, 1400);
}

#[test]
fn test_balance_moved_by_another_account_is_judged_against_checkpoint() {
    let mut engine = FlashLoanEngine::default();
    let asset = Pubkey::new_unique();
    let provider = ctx(Pubkey::new_unique());
    engine.deposit(&provider, &asset, 1000).unwrap();

    let mut alice = next_window(&ctx(Pubkey::new_unique()));
    let mut bob = next_window(&ctx(Pubkey::new_unique()));

    engine.deposit(&alice, &asset, 100).unwrap();
    assert_eq!(engine.checkpoint(&alice.caller).balance, 1000);
    assert_eq!(engine.deposit(&bob, &asset, 300), Ok(1400));

    // 1000 -> 1400 is +40%
    alice = next_window(&alice);
    assert_eq!(engine.deposit(&alice, &asset, 1), Ok(1401));
    assert_eq!(engine.checkpoint(&alice.caller).balance, 1400);

    bob = next_window(&bob);
    assert_eq!(engine.deposit(&bob, &asset, 799), Ok(2200));

    // 1400 -> 2200 is +57%
    alice = next_window(&alice);
    assert_eq!(
        engine.withdraw(&alice, &asset, 1),
        Err(FlashGuardError::ExcessiveBalanceChange)
    );
    assert_eq!(engine.available(&asset), 2200);
    assert_eq!(engine.checkpoint(&alice.caller).balance, 1400);
    assert_eq!(engine.last_guarded_slot(&alice.caller), alice.slot - 10);
}

#[test]
fn test_large_decrease_is_a_clean_validation_failure() {
    let mut engine = FlashLoanEngine::default();
    let asset = Pubkey::new_unique();
    engine.deposit(&ctx(Pubkey::new_unique()), &asset, 1000).unwrap();

    let alice = next_window(&ctx(Pubkey::new_unique()));
    engine.deposit(&alice, &asset, 100).unwrap();

    let bob = next_window(&ctx(Pubkey::new_unique()));
    engine.withdraw(&bob, &asset, 700).unwrap();
    assert_eq!(engine.available(&asset), 400);

    let alice = next_window(&alice);
    assert_eq!(
        engine.withdraw(&alice, &asset, 1),
        Err(FlashGuardError::ExcessiveBalanceChange)
    );
}

#[test]
fn test_same_slot_calls_hit_cooldown() {
    let mut engine = FlashLoanEngine::default();
    let asset = Pubkey::new_unique();
    let alice = ctx(Pubkey::new_unique());

    engine.deposit(&alice, &asset, 1000).unwrap();
    assert_eq!(
        engine.deposit(&alice, &asset, 1),
        Err(FlashGuardError::CooldownActive)
    );
    assert_eq!(
        engine.withdraw(&alice, &asset, 1),
        Err(FlashGuardError::CooldownActive)
    );
    assert_eq!(engine.available(&asset), 1000);
}

#[test]
fn test_interval_and_slot_delta() {
    let mut engine = FlashLoanEngine::default();
    let asset = Pubkey::new_unique();
    let alice = ctx(Pubkey::new_unique());
    engine.deposit(&alice, &asset, 1000).unwrap();

    let mut soon = alice;
    soon.slot += 20;
    soon.unix_timestamp += 60;
    assert_eq!(
        engine.deposit(&soon, &asset, 1),
        Err(FlashGuardError::IntervalTooShort)
    );

    let mut close = alice;
    close.slot += 5;
    close.unix_timestamp += 3600;
    assert_eq!(
        engine.deposit(&close, &asset, 1),
        Err(FlashGuardError::HeightTooShort)
    );

    assert!(engine.deposit(&next_window(&alice), &asset, 1).is_ok());
}

#[test]
fn test_deposit_then_loan_shares_cooldown() {
    let (mut engine, asset) = seeded_engine(1000);
    let alice = ctx(Pubkey::new_unique());

    engine.deposit(&alice, &asset, 10).unwrap();
    let result = engine.execute_flash_loan(&alice, &mut Repayer::exact(), &asset, 500, &[]);
    assert_eq!(result, Err(FlashGuardError::CooldownActive));
}

#[test]
fn test_checkpoint_is_shared_across_assets() {
    let mut engine = FlashLoanEngine::default();
    let provider = ctx(Pubkey::new_unique());
    let small = Pubkey::new_unique();
    let large = Pubkey::new_unique();
    engine.deposit(&provider, &small, 1000).unwrap();
    engine.deposit(&next_window(&provider), &large, 5000).unwrap();

    let alice = next_window(&next_window(&ctx(Pubkey::new_unique())));
    engine.deposit(&alice, &small, 1).unwrap();

    // The checkpoint recorded the small asset's balance; the large asset's
    // balance is compared against it
    let result = engine.execute_flash_loan(&next_window(&alice), &mut Repayer::exact(), &large, 100, &[]);
    assert_eq!(result, Err(FlashGuardError::ExcessiveBalanceChange));
}

#[test]
fn test_failed_withdraw_precheck_leaves_checkpoint_untouched() {
    let (mut engine, asset) = seeded_engine(1000);
    let alice = ctx(Pubkey::new_unique());

    assert_eq!(
        engine.withdraw(&alice, &asset, 1001),
        Err(FlashGuardError::InsufficientLiquidity)
    );
    assert_eq!(engine.last_guarded_slot(&alice.caller), 0);
    assert_eq!(engine.withdraw(&alice, &asset, 400), Ok(600));
    assert_eq!(engine.last_guarded_slot(&alice.caller), START_SLOT);
}

#[test]
fn test_zero_amounts_rejected() {
    let (mut engine, asset) = seeded_engine(1000);
    let alice = ctx(Pubkey::new_unique());

    assert_eq!(engine.deposit(&alice, &asset, 0), Err(FlashGuardError::InvalidAmount));
    assert_eq!(engine.withdraw(&alice, &asset, 0), Err(FlashGuardError::InvalidAmount));
    assert_eq!(engine.repay(&alice, &asset, 0), Err(FlashGuardError::InvalidAmount));
    assert_eq!(engine.last_guarded_slot(&alice.caller), 0);
}

#[test]
fn test_checkpoint_slots_never_decrease() {
    let (mut engine, asset) = seeded_engine(1000);
    let mut alice = ctx(Pubkey::new_unique());
    let mut last_slot = 0;

    for round in 0..6 {
        let result = if round % 2 == 0 {
            engine.deposit(&alice, &asset, 100).map(|_| ())
        } else {
            engine.withdraw(&alice, &asset, 100).map(|_| ())
        };
        result.unwrap();

        // A stale clock reading is refused, not recorded
        let mut stale = alice;
        stale.slot -= 1;
        assert!(engine.deposit(&stale, &asset, 1).is_err());

        let checkpoint = engine.checkpoint(&alice.caller);
        assert!(checkpoint.slot >= last_slot);
        assert_eq!(engine.last_guarded_slot(&alice.caller), checkpoint.slot);
        last_slot = checkpoint.slot;
        alice = next_window(&alice);
    }
}

#[test]
fn test_deposit_and_withdraw_events() {
    let mut engine = FlashLoanEngine::default();
    let asset = Pubkey::new_unique();
    let alice = ctx(Pubkey::new_unique());

    engine.deposit(&alice, &asset, 500).unwrap();
    engine.withdraw(&next_window(&alice), &asset, 200).unwrap();
    assert_eq!(engine.withdraw(&alice, &asset, 1), Err(FlashGuardError::CooldownActive));

    let events = engine.drain_events();
    assert_eq!(events.len(), 2);
    match (&events[0], &events[1]) {
        (FlashGuardEvent::Deposited(d), FlashGuardEvent::Withdrawn(w)) => {
            assert_eq!((d.amount, d.new_balance), (500, 500));
            assert_eq!((w.amount, w.new_balance), (200, 300));
        }
        other => panic!("unexpected events {:?}", other),
    }
    assert!(engine.events().is_empty());
    assert_eq!(engine.stats().deposits, 1);
    assert_eq!(engine.stats().withdrawals, 1);
}
