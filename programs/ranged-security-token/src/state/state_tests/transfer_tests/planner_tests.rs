//! Planner behaviour: stored-order selection, prefix minimality, the three
//! skip filters (time lock, custodian scope, policy hook), and the
//! non-mutating pre-check.

use super::super::helpers::{
    assert_ledger_error, assert_tiling, custodian_x, investor_a, investor_b, TestBench, NOW,
};
use crate::components::policy::{
    HookArgs, CHECK_TRANSFER_RANGE_SELECTOR, CHECK_TRANSFER_SELECTOR,
    TRANSFER_TOKEN_RANGE_SELECTOR,
};
use crate::error::LedgerError;
use crate::state::range::RangeTag;

const TAG_NONE: RangeTag = RangeTag::NONE;
const TAG_BEEF: RangeTag = RangeTag::from_u16(0xBEEF);

#[test]
fn planner_spends_ranges_in_stored_order() {
    let mut bench = TestBench::with_default_members();
    bench.mint(investor_a(), 50, 0, TAG_NONE).expect("mint");
    bench.mint(investor_a(), 50, 0, TAG_BEEF).expect("mint");

    bench
        .transfer(investor_a(), investor_b(), 30)
        .expect("transfer");

    // The older range (insertion order, not the newer one) is consumed.
    assert_eq!(bench.ledger.ranges_of(&investor_b()), vec![(1, 31)]);
    assert_eq!(
        bench.ledger.ranges_of(&investor_a()),
        vec![(31, 51), (51, 101)]
    );
    assert_tiling(&bench.ledger);
}

#[test]
fn planner_skips_locked_ranges_and_takes_the_next() {
    let mut bench = TestBench::with_default_members();
    let unlock = (NOW + 500) as u32;
    bench
        .mint(investor_a(), 50, unlock, TAG_NONE)
        .expect("mint");
    bench.mint(investor_a(), 50, 0, TAG_BEEF).expect("mint");

    bench
        .transfer(investor_a(), investor_b(), 30)
        .expect("transfer");

    // The locked range is untouched; the transfer came from the second one.
    assert_eq!(bench.ledger.ranges_of(&investor_b()), vec![(51, 81)]);
    assert_eq!(
        bench.ledger.range_at(1).expect("locked range").time,
        unlock,
        "an unexpired lock is not cleared by planning"
    );
    assert_tiling(&bench.ledger);
}

#[test]
fn planner_fails_when_only_locked_value_remains() {
    let mut bench = TestBench::with_default_members();
    let unlock = (NOW + 500) as u32;
    bench
        .mint(investor_a(), 50, unlock, TAG_NONE)
        .expect("mint");
    bench.mint(investor_a(), 20, 0, TAG_BEEF).expect("mint");

    // Balance covers the value but transferable value does not.
    assert_ledger_error(
        bench.transfer(investor_a(), investor_b(), 40),
        LedgerError::InsufficientTransferable,
    );
}

#[test]
fn lock_expiry_boundary_is_inclusive() {
    let mut bench = TestBench::with_default_members();
    let unlock = (NOW + 500) as u32;
    bench
        .mint(investor_a(), 50, unlock, TAG_NONE)
        .expect("mint");

    assert_ledger_error(
        bench.transfer(investor_a(), investor_b(), 10),
        LedgerError::InsufficientTransferable,
    );

    bench.now = i64::from(unlock);
    bench
        .transfer(investor_a(), investor_b(), 10)
        .expect("transferable the instant the lock expires");
    assert_eq!(
        bench.ledger.range_at(11).expect("residual").time,
        0,
        "observation zeroes the expired lock"
    );
    assert_tiling(&bench.ledger);
}

#[test]
fn planner_ignores_custodied_ranges_for_plain_transfers() {
    let mut bench = TestBench::with_default_members();
    bench.mint(investor_a(), 100, 0, TAG_NONE).expect("mint");
    bench
        .transfer(investor_a(), custodian_x(), 60)
        .expect("deposit under custodian");

    // Balance still shows 100, but only 40 are free of the custodian.
    assert_eq!(bench.ledger.balance_of(&investor_a()), 100);
    assert_ledger_error(
        bench.transfer(investor_a(), investor_b(), 50),
        LedgerError::InsufficientTransferable,
    );
    bench
        .transfer(investor_a(), investor_b(), 40)
        .expect("free value moves");
    assert_tiling(&bench.ledger);
}

#[test]
fn tag_scoped_hook_filters_candidates() {
    let mut bench = TestBench::with_default_members();
    bench.mint(investor_a(), 50, 0, TAG_BEEF).expect("mint");
    bench.mint(investor_a(), 50, 0, TAG_NONE).expect("mint");
    bench.hooks.deny_tags.push(TAG_BEEF);

    bench
        .transfer(investor_a(), investor_b(), 40)
        .expect("covered by the untagged range");
    assert_eq!(bench.ledger.ranges_of(&investor_b()), vec![(51, 91)]);

    assert_ledger_error(
        bench.transfer(investor_a(), investor_b(), 20),
        LedgerError::InsufficientTransferable,
    );
}

#[test]
fn planner_hook_receives_the_candidate_tag() {
    let mut bench = TestBench::with_default_members();
    bench.mint(investor_a(), 50, 0, TAG_BEEF).expect("mint");
    bench
        .transfer(investor_a(), investor_b(), 10)
        .expect("transfer");

    let saw_candidate = bench.hooks.calls.iter().any(|call| {
        matches!(
            call,
            HookArgs::CheckTransferRange { tag, start: 1, .. } if *tag == TAG_BEEF
        )
    });
    assert!(saw_candidate, "planner must scope the hook by range tag");
}

#[test]
fn untagged_pre_check_veto_aborts() {
    let mut bench = TestBench::with_default_members();
    bench.mint(investor_a(), 100, 0, TAG_NONE).expect("mint");
    bench.hooks.deny_selectors.push(CHECK_TRANSFER_SELECTOR);

    assert_ledger_error(
        bench.transfer(investor_a(), investor_b(), 10),
        LedgerError::PolicyRejected,
    );
    assert_eq!(bench.ledger.balance_of(&investor_b()), 0);
}

#[test]
fn post_commit_notification_veto_aborts() {
    let mut bench = TestBench::with_default_members();
    bench.mint(investor_a(), 100, 0, TAG_NONE).expect("mint");
    bench
        .hooks
        .deny_selectors
        .push(TRANSFER_TOKEN_RANGE_SELECTOR);

    assert_ledger_error(
        bench.transfer(investor_a(), investor_b(), 10),
        LedgerError::PolicyRejected,
    );
}

#[test]
fn pre_check_mirrors_the_planner_without_mutating() {
    let mut bench = TestBench::with_default_members();
    let unlock = (NOW + 500) as u32;
    bench
        .mint(investor_a(), 50, unlock, TAG_NONE)
        .expect("mint");

    assert_ledger_error(
        bench.can_transfer(investor_a(), investor_a(), investor_b(), 10),
        LedgerError::InsufficientTransferable,
    );

    // At expiry the pre-check approves but must leave the lock in place;
    // only the commit path clears it.
    bench.now = i64::from(unlock);
    bench
        .can_transfer(investor_a(), investor_a(), investor_b(), 10)
        .expect("transferable");
    assert_eq!(
        bench.ledger.range_at(1).expect("range").time,
        unlock,
        "read-only check must not expire the lock"
    );

    assert_ledger_error(
        bench.can_transfer(investor_a(), investor_a(), investor_b(), 100),
        LedgerError::InsufficientBalance,
    );
    assert_ledger_error(
        bench.can_transfer(investor_a(), investor_a(), investor_a(), 10),
        LedgerError::SelfTransfer,
    );
}

#[test]
fn planner_selection_is_a_minimal_prefix() {
    let mut bench = TestBench::with_default_members();
    bench.mint(investor_a(), 30, 0, TAG_NONE).expect("mint");
    bench.mint(investor_a(), 30, 0, TAG_BEEF).expect("mint");
    bench
        .mint(investor_a(), 30, 0, RangeTag::from_u16(0xC0DE))
        .expect("mint");

    // 50 needs the first two candidates and must not touch the third.
    bench
        .transfer(investor_a(), investor_b(), 50)
        .expect("transfer");

    let range_checks = bench
        .hooks
        .calls
        .iter()
        .filter(|call| call.selector() == CHECK_TRANSFER_RANGE_SELECTOR)
        .count();
    assert_eq!(range_checks, 2, "third candidate is never consulted");
    assert_eq!(
        bench.ledger.ranges_of(&investor_a()),
        vec![(51, 61), (61, 91)]
    );
    assert_tiling(&bench.ledger);
}
