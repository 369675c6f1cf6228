use anchor_lang::prelude::*;

use crate::components::{ComplianceOracle, HookArgs, LedgerEnv, PolicyHooks, TransferAuthorization};
use crate::error::LedgerError;
use crate::state::ledger::TokenLedger;
use crate::state::range::TokenRange;
use crate::utils::constants::{MAX_VALUE, RECEIVER, SENDER};
use crate::utils::events::LedgerEvent;

/// Resolved roles of one transfer commit.
///
/// The event parties always name the external sender and recipient, while the
/// owner transition describes what happens to the ranges themselves. The two
/// differ for custody movements, where a deposit keeps `owner_from ==
/// owner_to` (the beneficiary) and only the `custodian` field changes.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TransferParties {
    pub event_from: Pubkey,
    pub event_to: Pubkey,
    pub owner_from: Pubkey,
    pub owner_to: Pubkey,
    pub custodian: Pubkey,
}

impl TokenLedger {
    /// Selects a prefix of `candidates` whose combined length covers `value`.
    ///
    /// Candidates are visited in stored order (the owner's historical
    /// insertion order), so plain transfers spend the oldest ranges first. A
    /// candidate is skipped when its time lock is still active (expired locks
    /// are zeroed on observation), when its custodian does not match the
    /// planning context, or when the tag-scoped `CheckTransferRange` hook
    /// declines it. Selection stops at the first candidate that satisfies the
    /// remaining value, so no selected prefix can be shortened.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn find_transferable(
        &mut self,
        hooks: &mut dyn PolicyHooks,
        from: Pubkey,
        to: Pubkey,
        cust: Pubkey,
        value: u64,
        candidates: &[u64],
        now: i64,
    ) -> Result<Vec<u64>> {
        let mut selected = Vec::new();
        let mut remaining = value;
        for &pointer in candidates {
            if pointer == 0 {
                continue;
            }
            if !self.check_time(pointer, now) {
                continue;
            }
            let Some(range) = self.ranges.get(&pointer).copied() else {
                continue;
            };
            if range.custodian != cust {
                continue;
            }
            let allowed = hooks.invoke(&HookArgs::CheckTransferRange {
                tag: range.tag,
                from,
                to,
                start: pointer,
                stop: range.stop,
            })?;
            if !allowed {
                continue;
            }
            selected.push(pointer);
            let available = range.stop - pointer;
            if available >= remaining {
                return Ok(selected);
            }
            remaining -= available;
        }
        Err(LedgerError::InsufficientTransferable.into())
    }

    /// Commits ownership change for one sub-interval `[start, stop)` of the
    /// range starting at `pointer`.
    ///
    /// Four alignments are distinguished: the interval covers the range
    /// exactly, is left-aligned, right-aligned, or strictly interior. The
    /// moved interval takes `owner_to` and the target custodian with its time
    /// lock reset and its tag inherited; residual pieces keep the source
    /// range's metadata. Exact and aligned cases join the moved interval with
    /// a matching neighbor instead of leaving adjacent twins, rewriting the
    /// grid markers and both balance-ranges indexes for whichever shape
    /// results.
    pub(crate) fn transfer_single_range(
        &mut self,
        pointer: u64,
        parties: &TransferParties,
        start: u64,
        stop: u64,
        now: i64,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<()> {
        let range = *self
            .ranges
            .get(&pointer)
            .ok_or(LedgerError::InvalidIndex)?;
        require!(range.owner == parties.owner_from, LedgerError::NotOwner);
        require!(
            pointer <= start && start < stop && stop <= range.stop,
            LedgerError::InvalidIndex
        );

        let from = parties.owner_from;
        let to = parties.owner_to;
        let custodian = parties.custodian;
        let tag = range.tag;
        let range_stop = range.stop;
        let amount = stop - start;
        let prev = if start > 1 { self.grid.get(start - 1) } else { 0 };

        if pointer == start && range_stop == stop {
            // Interval covers the whole range.
            let join_left = prev != 0 && self.compare_ranges(prev, to, 0, tag, custodian, now);
            let join_right =
                stop <= self.upper_bound && self.compare_ranges(stop, to, 0, tag, custodian, now);
            match (join_left, join_right) {
                (false, false) => {
                    if let Some(slot) = self.ranges.get_mut(&pointer) {
                        slot.owner = to;
                        slot.custodian = custodian;
                        slot.time = 0;
                    }
                    if from != to {
                        self.holder_mut(from).replace_range_pointer(start, 0);
                        self.holder_mut(to).replace_range_pointer(0, start);
                    }
                }
                (true, false) => {
                    self.remove_range(pointer);
                    self.resize_range(prev, stop);
                    self.holder_mut(from).replace_range_pointer(start, 0);
                }
                (false, true) => {
                    let neighbor_stop = self
                        .ranges
                        .get(&stop)
                        .map(|neighbor| neighbor.stop)
                        .ok_or(LedgerError::InvalidIndex)?;
                    self.remove_range(stop);
                    self.remove_range(pointer);
                    self.set_range(
                        pointer,
                        TokenRange {
                            owner: to,
                            stop: neighbor_stop,
                            time: 0,
                            tag,
                            custodian,
                        },
                    );
                    if from != to {
                        self.holder_mut(from).replace_range_pointer(start, 0);
                        self.holder_mut(to).replace_range_pointer(stop, start);
                    } else {
                        self.holder_mut(to).replace_range_pointer(stop, 0);
                    }
                }
                (true, true) => {
                    let neighbor_stop = self
                        .ranges
                        .get(&stop)
                        .map(|neighbor| neighbor.stop)
                        .ok_or(LedgerError::InvalidIndex)?;
                    self.remove_range(stop);
                    self.remove_range(pointer);
                    self.resize_range(prev, neighbor_stop);
                    self.holder_mut(from).replace_range_pointer(start, 0);
                    self.holder_mut(to).replace_range_pointer(stop, 0);
                }
            }
        } else if pointer == start {
            // Left-aligned: carve the head off, keep the tail with the source.
            let join_left = prev != 0 && self.compare_ranges(prev, to, 0, tag, custodian, now);
            self.remove_range(pointer);
            self.set_range(
                stop,
                TokenRange {
                    owner: from,
                    stop: range_stop,
                    time: range.time,
                    tag,
                    custodian: range.custodian,
                },
            );
            self.holder_mut(from).replace_range_pointer(start, stop);
            if join_left {
                self.resize_range(prev, stop);
            } else {
                self.set_range(
                    start,
                    TokenRange {
                        owner: to,
                        stop,
                        time: 0,
                        tag,
                        custodian,
                    },
                );
                self.holder_mut(to).replace_range_pointer(0, start);
            }
        } else if range_stop == stop {
            // Right-aligned: shrink the source, place the tail with the target.
            let join_right =
                stop <= self.upper_bound && self.compare_ranges(stop, to, 0, tag, custodian, now);
            self.resize_range(pointer, start);
            if join_right {
                let neighbor_stop = self
                    .ranges
                    .get(&stop)
                    .map(|neighbor| neighbor.stop)
                    .ok_or(LedgerError::InvalidIndex)?;
                self.remove_range(stop);
                self.set_range(
                    start,
                    TokenRange {
                        owner: to,
                        stop: neighbor_stop,
                        time: 0,
                        tag,
                        custodian,
                    },
                );
                self.holder_mut(to).replace_range_pointer(stop, start);
            } else {
                self.set_range(
                    start,
                    TokenRange {
                        owner: to,
                        stop,
                        time: 0,
                        tag,
                        custodian,
                    },
                );
                self.holder_mut(to).replace_range_pointer(0, start);
            }
        } else {
            // Strictly interior: both residuals stay with the source, so no
            // neighbor can match the moved interval.
            self.resize_range(pointer, start);
            self.set_range(
                start,
                TokenRange {
                    owner: to,
                    stop,
                    time: 0,
                    tag,
                    custodian,
                },
            );
            self.set_range(
                stop,
                TokenRange {
                    owner: from,
                    stop: range_stop,
                    time: range.time,
                    tag,
                    custodian: range.custodian,
                },
            );
            self.holder_mut(to).replace_range_pointer(0, start);
            self.holder_mut(from).replace_range_pointer(0, stop);
        }

        events.push(LedgerEvent::TransferRange {
            from: parties.event_from,
            to: parties.event_to,
            start,
            stop,
            amount,
        });
        Ok(())
    }

    /// Commits a planned selection: one `Transfer` event, then per-range
    /// commits in selection order, each followed by the tag-scoped
    /// `TransferTokenRange` notification. The selection is a planner
    /// contract; exhausting it with value remaining is an invariant failure.
    pub(crate) fn transfer_multiple_ranges(
        &mut self,
        hooks: &mut dyn PolicyHooks,
        parties: &TransferParties,
        selected: &[u64],
        value: u64,
        now: i64,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<()> {
        events.push(LedgerEvent::Transfer {
            from: parties.event_from,
            to: parties.event_to,
            value,
        });
        let mut remaining = value;
        for &pointer in selected {
            let range = *self
                .ranges
                .get(&pointer)
                .ok_or(LedgerError::InsufficientTransferable)?;
            let stop = range.stop.min(pointer + remaining);
            let tag = range.tag;
            self.transfer_single_range(pointer, parties, pointer, stop, now, events)?;
            remaining -= stop - pointer;
            let accepted = hooks.invoke(&HookArgs::TransferTokenRange {
                tag,
                from: parties.event_from,
                to: parties.event_to,
                start: pointer,
                stop,
                amount: stop - pointer,
            })?;
            require!(accepted, LedgerError::PolicyRejected);
            if remaining == 0 {
                return Ok(());
            }
        }
        Err(LedgerError::InsufficientTransferable.into())
    }

    /// Whole-value transfer from the caller.
    pub fn transfer(
        &mut self,
        env: &mut LedgerEnv,
        caller: &Pubkey,
        to: Pubkey,
        value: u64,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<()> {
        self.transfer_value(env, caller, *caller, to, value, events)
    }

    /// Whole-value transfer on behalf of `from`. The oracle is consulted
    /// with the caller as authority and the allowance is debited from
    /// `allowances[from][caller]` when the caller is neither the sender nor
    /// the issuer.
    pub fn transfer_from(
        &mut self,
        env: &mut LedgerEnv,
        caller: &Pubkey,
        from: Pubkey,
        to: Pubkey,
        value: u64,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<()> {
        self.transfer_value(env, caller, from, to, value, events)
    }

    fn transfer_value(
        &mut self,
        env: &mut LedgerEnv,
        caller: &Pubkey,
        from: Pubkey,
        to: Pubkey,
        value: u64,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<()> {
        require!(value > 0, LedgerError::ZeroValue);
        require!(value <= MAX_VALUE, LedgerError::ValueTooLarge);

        let zero_flags = [
            self.balance_of(&from) == value,
            self.balance_of(&to) == 0,
            self.custodial_balance_of(&to, &from) == value,
            self.custodial_balance_of(&from, &to) == 0,
        ];
        let auth = env.oracle.transfer_tokens(caller, &from, &to, zero_flags)?;
        let from = auth.parties[SENDER];
        let to = auth.parties[RECEIVER];
        require!(from != to, LedgerError::SelfTransfer);

        if *caller != from && *caller != self.issuer {
            self.spend_allowance(&from, caller, value)?;
        }

        let allowed = env.hooks.invoke(&HookArgs::CheckTransfer {
            auth: *caller,
            from,
            to,
            value,
        })?;
        require!(allowed, LedgerError::PolicyRejected);

        let sender_is_custodian = auth.ratings[SENDER] == 0 && from != self.issuer;
        let receiver_is_custodian = auth.ratings[RECEIVER] == 0 && to != self.issuer;

        // A custodian sender spends the recipient's ranges held under it;
        // everyone else spends their own uncustodied ranges.
        let (index_owner, cust_context) = if sender_is_custodian {
            require!(
                self.custodial_balance_of(&to, &from) >= value,
                LedgerError::InsufficientCustodialBalance
            );
            (to, from)
        } else {
            require!(
                self.balance_of(&from) >= value,
                LedgerError::InsufficientBalance
            );
            (from, Pubkey::default())
        };

        let candidates: Vec<u64> = self
            .holders
            .get(&index_owner)
            .map(|holder| holder.ranges.clone())
            .unwrap_or_default();
        let selected =
            self.find_transferable(env.hooks, from, to, cust_context, value, &candidates, env.now)?;

        let parties = if sender_is_custodian {
            // Release: the recipient's custodied ranges shed the custodian.
            self.debit_custodial(&to, &from, value)?;
            TransferParties {
                event_from: from,
                event_to: to,
                owner_from: to,
                owner_to: to,
                custodian: Pubkey::default(),
            }
        } else if receiver_is_custodian {
            // Deposit: ranges stay with the sender under the new custodian.
            // The custodial credit lands before the callback so the custodian
            // observes the post-condition.
            self.credit_custodial(from, to, value);
            let accepted = env.custodians.receive_transfer(&to, &from, value)?;
            require!(accepted, LedgerError::CustodianRejected);
            TransferParties {
                event_from: from,
                event_to: to,
                owner_from: from,
                owner_to: from,
                custodian: to,
            }
        } else {
            self.holder_mut(from).balance -= value;
            self.holder_mut(to).balance += value;
            TransferParties {
                event_from: from,
                event_to: to,
                owner_from: from,
                owner_to: to,
                custodian: Pubkey::default(),
            }
        };

        self.transfer_multiple_ranges(env.hooks, &parties, &selected, value, env.now, events)
    }

    /// Transfers the explicit interval `[start, stop)`, which must sit
    /// inside a single range the caller owns, free of custody and time
    /// locks. Custodian accounts cannot take part on either side.
    pub fn transfer_range(
        &mut self,
        env: &mut LedgerEnv,
        caller: &Pubkey,
        to: Pubkey,
        start: u64,
        stop: u64,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<()> {
        require!(
            start >= 1 && start < stop && stop <= self.upper_bound + 1,
            LedgerError::InvalidIndex
        );
        let value = stop - start;

        let zero_flags = [
            self.balance_of(caller) == value,
            self.balance_of(&to) == 0,
            self.custodial_balance_of(&to, caller) == value,
            self.custodial_balance_of(caller, &to) == 0,
        ];
        let auth = env.oracle.transfer_tokens(caller, caller, &to, zero_flags)?;
        let from = auth.parties[SENDER];
        let to = auth.parties[RECEIVER];
        require!(from != to, LedgerError::SelfTransfer);
        require!(
            auth.ratings[SENDER] != 0 || from == self.issuer,
            LedgerError::CustodianSendDisallowed
        );
        require!(
            auth.ratings[RECEIVER] != 0 || to == self.issuer,
            LedgerError::CustodianSendDisallowed
        );

        let pointer = self.get_pointer(stop - 1)?;
        require!(pointer <= start, LedgerError::SpansMultipleRanges);
        let range = *self
            .ranges
            .get(&pointer)
            .ok_or(LedgerError::InvalidIndex)?;
        require!(range.owner == from, LedgerError::NotOwner);
        require!(!range.is_custodied(), LedgerError::RangeCustodied);
        require!(self.check_time(pointer, env.now), LedgerError::TimeLocked);

        let allowed = env.hooks.invoke(&HookArgs::CheckRangeTransfer {
            tag: range.tag,
            from,
            to,
            start,
            stop,
        })?;
        require!(allowed, LedgerError::PolicyRejected);

        self.holder_mut(from).balance -= value;
        self.holder_mut(to).balance += value;

        events.push(LedgerEvent::Transfer { from, to, value });
        let parties = TransferParties {
            event_from: from,
            event_to: to,
            owner_from: from,
            owner_to: to,
            custodian: Pubkey::default(),
        };
        self.transfer_single_range(pointer, &parties, start, stop, env.now, events)
    }

    /// Moves beneficial ownership between two investors inside the calling
    /// custodian: ranges keep their custodian, owner and both balance tables
    /// shift from one beneficiary to the other.
    pub fn transfer_custodian(
        &mut self,
        env: &mut LedgerEnv,
        caller: &Pubkey,
        from: Pubkey,
        to: Pubkey,
        value: u64,
        events: &mut Vec<LedgerEvent>,
    ) -> Result<()> {
        require!(value > 0, LedgerError::ZeroValue);
        require!(value <= MAX_VALUE, LedgerError::ValueTooLarge);

        let zero_flags = [
            self.custodial_balance_of(&from, caller) == value,
            self.custodial_balance_of(&to, caller) == 0,
            false,
            false,
        ];
        let auth = env.oracle.transfer_tokens(caller, &from, &to, zero_flags)?;
        let from = auth.parties[SENDER];
        let to = auth.parties[RECEIVER];
        require!(from != to, LedgerError::SelfTransfer);
        require!(
            self.custodial_balance_of(&from, caller) >= value,
            LedgerError::InsufficientCustodialBalance
        );

        let allowed = env.hooks.invoke(&HookArgs::TransferCustodian {
            custodian: *caller,
            from,
            to,
            value,
        })?;
        require!(allowed, LedgerError::PolicyRejected);

        let candidates: Vec<u64> = self
            .holders
            .get(&from)
            .map(|holder| holder.ranges.clone())
            .unwrap_or_default();
        let selected =
            self.find_transferable(env.hooks, from, to, *caller, value, &candidates, env.now)?;

        self.debit_custodial(&from, caller, value)?;
        self.credit_custodial(to, *caller, value);
        self.holder_mut(from).balance -= value;
        self.holder_mut(to).balance += value;

        let parties = TransferParties {
            event_from: from,
            event_to: to,
            owner_from: from,
            owner_to: to,
            custodian: *caller,
        };
        self.transfer_multiple_ranges(env.hooks, &parties, &selected, value, env.now, events)
    }

    /// Read-only transferability check.
    ///
    /// Mirrors the `transfer` path (oracle query, custodian routing,
    /// balance checks, planner filters) without mutating anything: expired
    /// time locks count as transferable but are not zeroed, which is why the
    /// commit path cannot share this code.
    pub fn can_transfer(
        &self,
        oracle: &dyn ComplianceOracle,
        hooks: &mut dyn PolicyHooks,
        caller: &Pubkey,
        from: Pubkey,
        to: Pubkey,
        value: u64,
        now: i64,
    ) -> Result<()> {
        require!(value > 0, LedgerError::ZeroValue);
        require!(value <= MAX_VALUE, LedgerError::ValueTooLarge);

        let sender_will_be_zero = self.balance_of(&from) == value;
        let auth: TransferAuthorization =
            oracle.check_transfer(caller, &from, &to, sender_will_be_zero)?;
        let from = auth.parties[SENDER];
        let to = auth.parties[RECEIVER];
        require!(from != to, LedgerError::SelfTransfer);

        if *caller != from && *caller != self.issuer {
            require!(
                self.allowance_of(&from, caller) >= value,
                LedgerError::InsufficientAllowance
            );
        }

        let sender_is_custodian = auth.ratings[SENDER] == 0 && from != self.issuer;
        let (index_owner, cust_context) = if sender_is_custodian {
            require!(
                self.custodial_balance_of(&to, &from) >= value,
                LedgerError::InsufficientCustodialBalance
            );
            (to, from)
        } else {
            require!(
                self.balance_of(&from) >= value,
                LedgerError::InsufficientBalance
            );
            (from, Pubkey::default())
        };

        let Some(holder) = self.holders.get(&index_owner) else {
            return Err(LedgerError::InsufficientTransferable.into());
        };
        let mut remaining = value;
        for pointer in holder.pointers() {
            let Some(range) = self.ranges.get(&pointer) else {
                continue;
            };
            if range.time != 0 && i64::from(range.time) > now {
                continue;
            }
            if range.custodian != cust_context {
                continue;
            }
            let allowed = hooks.invoke(&HookArgs::CheckTransferRange {
                tag: range.tag,
                from,
                to,
                start: pointer,
                stop: range.stop,
            })?;
            if !allowed {
                continue;
            }
            let available = range.stop - pointer;
            if available >= remaining {
                return Ok(());
            }
            remaining -= available;
        }
        Err(LedgerError::InsufficientTransferable.into())
    }
}
