use anchor_lang::prelude::*;

use crate::state::range::RangeTag;

/// Fungible-style total emitted once per transfer, mint (from = default), or
/// burn (to = default).
#[event]
pub struct Transfer {
    pub from: Pubkey,
    pub to: Pubkey,
    pub value: u64,
}

/// Per-range delta emitted for every committed sub-range.
#[event]
pub struct TransferRange {
    pub from: Pubkey,
    pub to: Pubkey,
    pub start: u64,
    pub stop: u64,
    pub amount: u64,
}

/// Emitted when a range's classification changes, on mint and modify.
#[event]
pub struct RangeSet {
    pub tag: RangeTag,
    pub start: u64,
    pub stop: u64,
    pub time: u32,
}

/// Engine-side event record.
///
/// The engine appends these to a caller-supplied buffer instead of emitting
/// directly; instruction handlers translate the buffer through `emit!` after
/// the engine call returns. Tests assert on the buffer, so the observable
/// event sequence is covered without a log transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerEvent {
    Transfer {
        from: Pubkey,
        to: Pubkey,
        value: u64,
    },
    TransferRange {
        from: Pubkey,
        to: Pubkey,
        start: u64,
        stop: u64,
        amount: u64,
    },
    RangeSet {
        tag: RangeTag,
        start: u64,
        stop: u64,
        time: u32,
    },
}

pub fn emit_ledger_events(events: &[LedgerEvent]) {
    for event in events {
        match *event {
            LedgerEvent::Transfer { from, to, value } => emit!(Transfer { from, to, value }),
            LedgerEvent::TransferRange {
                from,
                to,
                start,
                stop,
                amount,
            } => emit!(TransferRange {
                from,
                to,
                start,
                stop,
                amount,
            }),
            LedgerEvent::RangeSet {
                tag,
                start,
                stop,
                time,
            } => emit!(RangeSet {
                tag,
                start,
                stop,
                time,
            }),
        }
    }
}
