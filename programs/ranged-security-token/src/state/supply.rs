use anchor_lang::prelude::*;

use crate::components::LedgerEnv;
use crate::error::LedgerError;
use crate::state::access::IssuerRights;
use crate::state::ledger::TokenLedger;
use crate::state::range::{RangeTag, TokenRange};
use crate::utils::constants::{MAX_UPPER_BOUND, MAX_VALUE};
use crate::utils::events::LedgerEvent;

impl TokenLedger {
    /// Issues `value` new tokens to `owner` at the right edge of the index
    /// space.
    ///
    /// The new interval is `[upper_bound + 1, upper_bound + 1 + value)`. When
    /// the current last range already carries `(owner, time, tag)` with no
    /// custodian it is extended in place instead of creating an adjacent
    /// duplicate, keeping the store canonical. The oracle is consulted for
    /// the issuer -> owner movement before any state is written; its metadata
    /// is not otherwise used here.
    pub fn mint(
        &mut self,
        env: &mut LedgerEnv,
        caller: &Pubkey,
        owner: Pubkey,
        value: u64,
        time: u32,
        tag: RangeTag,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<()> {
        self.check_authority(caller, IssuerRights::MINT)?;
        require!(value > 0, LedgerError::ZeroValue);
        require!(value <= MAX_VALUE, LedgerError::ValueTooLarge);
        require!(
            self.upper_bound + value <= MAX_UPPER_BOUND,
            LedgerError::UpperBoundExceeded
        );
        require!(
            time == 0 || i64::from(time) > env.now,
            LedgerError::PastTimeLock
        );

        let issuer = self.issuer;
        let recipient_was_zero = self.balance_of(&owner) == 0;
        env.oracle
            .transfer_tokens(caller, &issuer, &owner, [false, recipient_was_zero, false, false])?;

        let start = self.upper_bound + 1;
        let stop = start + value;

        // The last index of the previous right-edge range is always marked,
        // so a single cell read finds the merge candidate.
        let left = if self.upper_bound > 0 {
            self.grid.get(self.upper_bound)
        } else {
            0
        };
        if left != 0 && self.compare_ranges(left, owner, time, tag, Pubkey::default(), env.now) {
            self.resize_range(left, stop);
        } else {
            self.set_range(
                start,
                TokenRange {
                    owner,
                    stop,
                    time,
                    tag,
                    custodian: Pubkey::default(),
                },
            );
            self.holder_mut(owner).replace_range_pointer(0, start);
        }

        self.holder_mut(owner).balance += value;
        self.total_supply += value;
        self.upper_bound = stop - 1;

        events.push(LedgerEvent::RangeSet {
            tag,
            start,
            stop,
            time,
        });
        events.push(LedgerEvent::Transfer {
            from: Pubkey::default(),
            to: owner,
            value,
        });
        events.push(LedgerEvent::TransferRange {
            from: Pubkey::default(),
            to: owner,
            start,
            stop,
            amount: value,
        });
        Ok(())
    }

    /// Retires the interval `[start, stop)`, which must sit inside a single
    /// live, uncustodied range.
    ///
    /// The slot stays in the store with `owner` zeroed so the index space
    /// keeps tiling; `upper_bound` never decreases, even when the burned
    /// interval is the right edge.
    pub fn burn(
        &mut self,
        caller: &Pubkey,
        start: u64,
        stop: u64,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<()> {
        self.check_authority(caller, IssuerRights::BURN)?;
        require!(
            start >= 1 && start < stop && stop <= self.upper_bound + 1,
            LedgerError::InvalidIndex
        );
        let pointer = self.get_pointer(stop - 1)?;
        require!(pointer <= start, LedgerError::SpansMultipleRanges);
        let range = *self
            .ranges
            .get(&pointer)
            .ok_or(LedgerError::InvalidIndex)?;
        require!(!range.is_burned(), LedgerError::InvalidIndex);
        require!(!range.is_custodied(), LedgerError::RangeCustodied);

        if range.stop > stop {
            self.split_range(stop)?;
        }
        if pointer < start {
            self.split_range(start)?;
        }

        let owner = range.owner;
        let value = stop - start;
        self.holder_mut(owner).replace_range_pointer(start, 0);
        self.holder_mut(owner).balance -= value;
        self.total_supply -= value;
        self.total_burned += value;
        if let Some(slot) = self.ranges.get_mut(&start) {
            slot.owner = Pubkey::default();
        }

        events.push(LedgerEvent::Transfer {
            from: owner,
            to: Pubkey::default(),
            value,
        });
        events.push(LedgerEvent::TransferRange {
            from: owner,
            to: Pubkey::default(),
            start,
            stop,
            amount: value,
        });
        Ok(())
    }

    /// Rewrites `(time, tag)` on the range starting at `pointer`, then
    /// repairs canonical form against both neighbors.
    pub fn modify_range(
        &mut self,
        caller: &Pubkey,
        pointer: u64,
        time: u32,
        tag: RangeTag,
        now: i64,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<()> {
        self.check_authority(caller, IssuerRights::MODIFY)?;
        require!(time == 0 || i64::from(time) > now, LedgerError::PastTimeLock);
        let stop = {
            let range = self
                .ranges
                .get_mut(&pointer)
                .ok_or(LedgerError::InvalidIndex)?;
            require!(range.owner != Pubkey::default(), LedgerError::InvalidIndex);
            range.time = time;
            range.tag = tag;
            range.stop
        };

        events.push(LedgerEvent::RangeSet {
            tag,
            start: pointer,
            stop,
            time,
        });

        let merged = self.try_merge_left(pointer, now);
        self.try_merge_right(merged, now);
        Ok(())
    }

    /// Applies `(time, tag)` to every index in `[start, stop)`, splitting at
    /// the boundaries when they fall mid-range and sweeping left to right so
    /// that no two adjacent same-owner ranges are left sharing metadata,
    /// including across the outer boundaries.
    pub fn modify_ranges(
        &mut self,
        caller: &Pubkey,
        start: u64,
        stop: u64,
        time: u32,
        tag: RangeTag,
        now: i64,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<()> {
        self.check_authority(caller, IssuerRights::MODIFY)?;
        require!(
            start >= 1 && start < stop && stop <= self.upper_bound + 1,
            LedgerError::InvalidIndex
        );
        require!(time == 0 || i64::from(time) > now, LedgerError::PastTimeLock);

        self.split_range(start)?;
        if stop <= self.upper_bound {
            self.split_range(stop)?;
        }

        events.push(LedgerEvent::RangeSet {
            tag,
            start,
            stop,
            time,
        });

        // Each pass consumes one range or folds it into its left neighbor,
        // so the sweep terminates at `stop`.
        let mut pointer = start;
        while pointer < stop {
            let range_stop = {
                let range = self
                    .ranges
                    .get_mut(&pointer)
                    .ok_or(LedgerError::InvalidIndex)?;
                range.time = time;
                range.tag = tag;
                range.stop
            };
            self.try_merge_left(pointer, now);
            pointer = range_stop;
        }

        // Right boundary: the swept span may now match the range at `stop`.
        if stop <= self.upper_bound {
            let left = self.get_pointer(stop - 1)?;
            self.try_merge_right(left, now);
        }
        Ok(())
    }

    /// Folds the range at `pointer` into its left neighbor when metadata
    /// matches; returns the surviving start pointer. Burned slots never
    /// merge.
    pub(crate) fn try_merge_left(&mut self, pointer: u64, now: i64) -> u64 {
        let Some(range) = self.ranges.get(&pointer).copied() else {
            return pointer;
        };
        if range.is_burned() {
            return pointer;
        }
        let prev = if pointer > 1 { self.grid.get(pointer - 1) } else { 0 };
        if prev != 0
            && self.compare_ranges(prev, range.owner, range.time, range.tag, range.custodian, now)
        {
            self.merge_adjacent(prev, pointer);
            return prev;
        }
        pointer
    }

    /// Folds the right neighbor into the range at `pointer` when metadata
    /// matches.
    pub(crate) fn try_merge_right(&mut self, pointer: u64, now: i64) {
        let Some(range) = self.ranges.get(&pointer).copied() else {
            return;
        };
        if range.is_burned() {
            return;
        }
        let right = range.stop;
        if right <= self.upper_bound
            && self.compare_ranges(right, range.owner, range.time, range.tag, range.custodian, now)
        {
            self.merge_adjacent(pointer, right);
        }
    }
}
