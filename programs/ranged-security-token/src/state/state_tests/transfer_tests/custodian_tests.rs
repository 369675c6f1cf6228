//! Custody flows: deposit under a custodian, release back to the owner,
//! beneficiary moves inside a custodian, and the guard rails around explicit
//! range transfers and burns touching custodied ranges.
//!
//! The accounting model under test: custodied ranges keep the beneficiary as
//! `owner` with the custodian recorded on the range, `balances` keep counting
//! them for the beneficiary, and the custodial table tracks how much of each
//! holder sits under which custodian.

use super::super::helpers::{
    assert_ledger_error, assert_tiling, custodian_x, deterministic_pubkey, investor_a,
    investor_b, TestBench,
};
use crate::error::LedgerError;
use crate::state::range::RangeTag;
use crate::utils::events::LedgerEvent;
use anchor_lang::prelude::Pubkey;

const TAG_NONE: RangeTag = RangeTag::NONE;

fn custodian_y() -> Pubkey {
    deterministic_pubkey(21)
}

#[test]
fn deposit_marks_ranges_and_credits_the_custodian() {
    let mut bench = TestBench::with_default_members();
    bench.mint(investor_a(), 100, 0, TAG_NONE).expect("mint");

    bench
        .transfer(investor_a(), custodian_x(), 40)
        .expect("deposit");

    // Ownership stays with the beneficiary; the custody column moves.
    assert_eq!(bench.ledger.balance_of(&investor_a()), 100);
    assert_eq!(bench.ledger.balance_of(&custodian_x()), 0);
    assert_eq!(
        bench
            .ledger
            .custodial_balance_of(&investor_a(), &custodian_x()),
        40
    );
    let custodied = bench.ledger.range_at(1).expect("custodied range");
    assert_eq!(custodied.owner, investor_a());
    assert_eq!(custodied.custodian, custodian_x());

    // Callback observed the credited balance; events name the external
    // parties.
    assert_eq!(
        bench.custodians.received,
        vec![(custodian_x(), investor_a(), 40)]
    );
    assert_eq!(
        bench.events[0],
        LedgerEvent::Transfer {
            from: investor_a(),
            to: custodian_x(),
            value: 40,
        }
    );
    assert_tiling(&bench.ledger);
}

#[test]
fn custodian_release_returns_ranges_to_the_owner() {
    let mut bench = TestBench::with_default_members();
    bench.mint(investor_a(), 100, 0, TAG_NONE).expect("mint");
    bench
        .transfer(investor_a(), custodian_x(), 40)
        .expect("deposit");

    bench
        .transfer(custodian_x(), investor_a(), 40)
        .expect("release");

    assert_eq!(
        bench
            .ledger
            .custodial_balance_of(&investor_a(), &custodian_x()),
        0
    );
    assert_eq!(bench.ledger.balance_of(&investor_a()), 100);
    // Fully released and re-merged: one uncustodied range again.
    assert_eq!(bench.ledger.ranges.len(), 1);
    assert_eq!(
        bench.ledger.range_at(1).expect("range").custodian,
        Pubkey::default()
    );
    assert_eq!(
        bench.events[0],
        LedgerEvent::Transfer {
            from: custodian_x(),
            to: investor_a(),
            value: 40,
        }
    );
    assert_tiling(&bench.ledger);
}

#[test]
fn release_requires_custodial_balance() {
    let mut bench = TestBench::with_default_members();
    bench.mint(investor_b(), 50, 0, TAG_NONE).expect("mint");

    assert_ledger_error(
        bench.transfer(custodian_x(), investor_b(), 10),
        LedgerError::InsufficientCustodialBalance,
    );
}

#[test]
fn custodian_internal_move_shifts_beneficiaries() {
    let mut bench = TestBench::with_default_members();
    bench.mint(investor_a(), 100, 0, TAG_NONE).expect("mint");
    bench
        .transfer(investor_a(), custodian_x(), 40)
        .expect("deposit");

    bench
        .transfer_custodian(custodian_x(), investor_a(), investor_b(), 25)
        .expect("internal move");

    assert_eq!(bench.ledger.balance_of(&investor_a()), 75);
    assert_eq!(bench.ledger.balance_of(&investor_b()), 25);
    assert_eq!(
        bench
            .ledger
            .custodial_balance_of(&investor_a(), &custodian_x()),
        15
    );
    assert_eq!(
        bench
            .ledger
            .custodial_balance_of(&investor_b(), &custodian_x()),
        25
    );
    // The moved interval still sits under the custodian.
    let moved = bench.ledger.range_at(1).expect("moved range");
    assert_eq!(moved.owner, investor_b());
    assert_eq!(moved.custodian, custodian_x());
    assert_tiling(&bench.ledger);

    // The new beneficiary can be released like any other.
    bench
        .transfer(custodian_x(), investor_b(), 25)
        .expect("release to the new beneficiary");
    assert_eq!(
        bench.ledger.range_at(1).expect("range").custodian,
        Pubkey::default()
    );
    assert_tiling(&bench.ledger);
}

#[test]
fn custodian_internal_move_validation() {
    let mut bench = TestBench::with_default_members();
    bench.mint(investor_a(), 100, 0, TAG_NONE).expect("mint");
    bench
        .transfer(investor_a(), custodian_x(), 40)
        .expect("deposit");

    assert_ledger_error(
        bench.transfer_custodian(custodian_x(), investor_a(), investor_a(), 10),
        LedgerError::SelfTransfer,
    );
    assert_ledger_error(
        bench.transfer_custodian(custodian_x(), investor_a(), investor_b(), 60),
        LedgerError::InsufficientCustodialBalance,
    );
    // A different custodian holds nothing for A.
    bench.register(custodian_y(), 0);
    assert_ledger_error(
        bench.transfer_custodian(custodian_y(), investor_a(), investor_b(), 10),
        LedgerError::InsufficientCustodialBalance,
    );
}

#[test]
fn custodian_to_custodian_value_transfer_is_refused() {
    // A custodian sender spends the recipient's holdings under it; another
    // custodian holds nothing under the sender, so the routing itself fails.
    let mut bench = TestBench::with_default_members();
    bench.register(custodian_y(), 0);
    bench.mint(investor_a(), 100, 0, TAG_NONE).expect("mint");
    bench
        .transfer(investor_a(), custodian_x(), 40)
        .expect("deposit");

    assert_ledger_error(
        bench.transfer(custodian_x(), custodian_y(), 10),
        LedgerError::InsufficientCustodialBalance,
    );
}

#[test]
fn rejecting_custodian_aborts_the_deposit() {
    let mut bench = TestBench::with_default_members();
    bench.mint(investor_a(), 100, 0, TAG_NONE).expect("mint");
    bench.custodians.accept = false;

    assert_ledger_error(
        bench.transfer(investor_a(), custodian_x(), 40),
        LedgerError::CustodianRejected,
    );
}

#[test]
fn explicit_range_transfers_exclude_custodians() {
    let mut bench = TestBench::with_default_members();
    bench.mint(investor_a(), 100, 0, TAG_NONE).expect("mint");
    bench
        .transfer(investor_a(), custodian_x(), 40)
        .expect("deposit");

    // Custodian as sender, custodian as recipient, and a custodied source
    // range are all refused.
    assert_ledger_error(
        bench.transfer_range(custodian_x(), investor_b(), 50, 60),
        LedgerError::CustodianSendDisallowed,
    );
    assert_ledger_error(
        bench.transfer_range(investor_a(), custodian_x(), 50, 60),
        LedgerError::CustodianSendDisallowed,
    );
    assert_ledger_error(
        bench.transfer_range(investor_a(), investor_b(), 5, 15),
        LedgerError::RangeCustodied,
    );
    assert_tiling(&bench.ledger);
}

#[test]
fn burn_refuses_custodied_ranges() {
    let mut bench = TestBench::with_default_members();
    bench.mint(investor_a(), 100, 0, TAG_NONE).expect("mint");
    bench
        .transfer(investor_a(), custodian_x(), 40)
        .expect("deposit");

    assert_ledger_error(bench.burn(1, 21), LedgerError::RangeCustodied);
    bench.burn(41, 61).expect("free ranges still burn");
    assert_tiling(&bench.ledger);
}

#[test]
fn partial_release_splits_the_custodied_range() {
    let mut bench = TestBench::with_default_members();
    bench.mint(investor_a(), 100, 0, TAG_NONE).expect("mint");
    bench
        .transfer(investor_a(), custodian_x(), 40)
        .expect("deposit");

    bench
        .transfer(custodian_x(), investor_a(), 15)
        .expect("partial release");

    assert_eq!(
        bench
            .ledger
            .custodial_balance_of(&investor_a(), &custodian_x()),
        25
    );
    // [1, 16) released, [16, 41) still custodied, [41, 101) never custodied.
    let released = bench.ledger.range_at(1).expect("released");
    assert_eq!(released.custodian, Pubkey::default());
    let held = bench.ledger.range_at(16).expect("held");
    assert_eq!(held.custodian, custodian_x());
    assert_eq!(bench.ledger.balance_of(&investor_a()), 100);
    assert_tiling(&bench.ledger);
}
