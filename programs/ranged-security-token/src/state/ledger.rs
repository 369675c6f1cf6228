use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::error::LedgerError;
use crate::state::access::IssuerRights;
use crate::state::grid::PointerGrid;
use crate::state::range::{HolderBalance, RangeTag, TokenRange};

/// Root ledger state for one ranged security token.
///
/// # State model
///
/// Every token has a distinct 48-bit ordinal index, but ownership is stored
/// as compressed ranges: `ranges` maps a range's start pointer to its
/// descriptor, `grid` locates the range enclosing any index in O(log16 N)
/// probes, and each holder keeps a vector of its range starts next to an
/// integer balance. The structures are coupled by three invariants the
/// mutation paths below maintain together:
///
/// - the live ranges tile `[1, upper_bound + 1)` without gaps or overlaps;
/// - every holder's `balance` equals the summed length of its ranges;
/// - no two adjacent live ranges agree on `(owner, time, tag, custodian)`
///   after a modify pass; transfer commits join matching neighbors as they
///   land.
///
/// Unlike the fixed-capacity zero-copy accounts used for bounded state, the
/// range set grows without bound, so the account is Borsh-serialized with
/// ordered maps and grown through an explicit realloc instruction.
#[account]
#[derive(Default, Debug)]
pub struct TokenLedger {
    /// Token-issuing entity. Ranges held by the issuer live at this address;
    /// the compliance oracle translates the issuer's logical id to it.
    pub issuer: Pubkey,

    /// Administrative authority; holds every issuer right implicitly.
    pub authority: Pubkey,

    /// Display metadata. `symbol` is canonicalized at initialization and
    /// bound to the ledger PDA through `token_seed`.
    pub name: String,
    pub symbol: String,

    /// keccak hash of the canonical symbol; part of the ledger PDA seeds.
    pub token_seed: [u8; 32],

    /// Sum of all live balances. `total_supply + total_burned` equals
    /// `upper_bound` at all times.
    pub total_supply: u64,
    pub total_burned: u64,

    /// Highest allocated index. Monotone: burning leaves owner-zero holes
    /// rather than shrinking the index space.
    pub upper_bound: u64,

    /// Range store keyed by start pointer.
    pub ranges: BTreeMap<u64, TokenRange>,

    /// Sparse skip grid resolving index -> enclosing range start.
    pub grid: PointerGrid,

    /// Per-holder balance and balance-ranges index.
    pub holders: BTreeMap<Pubkey, HolderBalance>,

    /// owner -> spender -> remaining allowance.
    pub allowances: BTreeMap<Pubkey, BTreeMap<Pubkey, u64>>,

    /// beneficiary -> custodian -> value held under that custodian.
    pub custodial: BTreeMap<Pubkey, BTreeMap<Pubkey, u64>>,

    /// Operator rights beyond the authority.
    pub operators: BTreeMap<Pubkey, IssuerRights>,

    /// PDA bump, cached for address validation.
    pub bump: u8,
}

impl TokenLedger {
    /// Authority gate for issuer-side operations. The authority passes every
    /// check; operators pass when their rights cover `required`.
    pub fn check_authority(&self, caller: &Pubkey, required: IssuerRights) -> Result<()> {
        if *caller == self.authority {
            return Ok(());
        }
        match self.operators.get(caller) {
            Some(rights) if rights.has(required) => Ok(()),
            _ => Err(LedgerError::PermissionDenied.into()),
        }
    }

    #[inline(always)]
    pub fn require_index(&self, index: u64) -> Result<()> {
        require!(
            index >= 1 && index <= self.upper_bound,
            LedgerError::InvalidIndex
        );
        Ok(())
    }

    /// Start pointer of the range enclosing `index`.
    pub fn get_pointer(&self, index: u64) -> Result<u64> {
        self.require_index(index)?;
        Ok(self.grid.locate(index))
    }

    #[inline(always)]
    pub fn range_at(&self, pointer: u64) -> Option<&TokenRange> {
        self.ranges.get(&pointer)
    }

    /// Enclosing range of `index` as `(start, descriptor)`.
    pub fn range_of_index(&self, index: u64) -> Result<(u64, &TokenRange)> {
        let pointer = self.get_pointer(index)?;
        let range = self
            .ranges
            .get(&pointer)
            .ok_or(LedgerError::InvalidIndex)?;
        Ok((pointer, range))
    }

    /// Upserts a range descriptor and rewrites its grid markers.
    pub(crate) fn set_range(&mut self, pointer: u64, range: TokenRange) {
        let stop = range.stop;
        self.ranges.insert(pointer, range);
        self.grid.set_range_pointers(pointer, stop, pointer);
    }

    /// Removes a range and clears its grid markers.
    pub(crate) fn remove_range(&mut self, pointer: u64) {
        if let Some(range) = self.ranges.remove(&pointer) {
            self.grid.set_range_pointers(pointer, range.stop, 0);
        }
    }

    /// Moves a range's stop, clearing the old marker set before writing the
    /// new one (the stop-side markers depend on the span).
    pub(crate) fn resize_range(&mut self, pointer: u64, new_stop: u64) {
        let Some(old_stop) = self.ranges.get(&pointer).map(|range| range.stop) else {
            return;
        };
        self.grid.set_range_pointers(pointer, old_stop, 0);
        if let Some(range) = self.ranges.get_mut(&pointer) {
            range.stop = new_stop;
        }
        self.grid.set_range_pointers(pointer, new_stop, pointer);
    }

    /// Lazily expires a past time lock, then reports transferability.
    /// `false` means the range is still locked; `time == now` counts as
    /// expired.
    pub(crate) fn check_time(&mut self, pointer: u64, now: i64) -> bool {
        let Some(range) = self.ranges.get_mut(&pointer) else {
            return false;
        };
        if range.time == 0 {
            return true;
        }
        if i64::from(range.time) <= now {
            range.time = 0;
            return true;
        }
        false
    }

    /// True iff a range lives at `pointer` and matches the given metadata
    /// tuple. Observing the range lazily expires a past time lock first, so
    /// a `time == 0` probe matches ranges whose lock just ran out.
    pub(crate) fn compare_ranges(
        &mut self,
        pointer: u64,
        owner: Pubkey,
        time: u32,
        tag: RangeTag,
        custodian: Pubkey,
        now: i64,
    ) -> bool {
        if pointer == 0 {
            return false;
        }
        let Some(range) = self.ranges.get_mut(&pointer) else {
            return false;
        };
        if range.time != 0 && i64::from(range.time) <= now {
            range.time = 0;
        }
        range.owner == owner
            && range.time == time
            && range.tag == tag
            && range.custodian == custodian
    }

    /// Splits the enclosing range at `split`, creating `[split, old_stop)`
    /// with inherited metadata. No-op when `split` already starts a range.
    pub(crate) fn split_range(&mut self, split: u64) -> Result<()> {
        if self.ranges.contains_key(&split) {
            return Ok(());
        }
        let pointer = self.get_pointer(split)?;
        let template = *self
            .ranges
            .get(&pointer)
            .ok_or(LedgerError::InvalidIndex)?;

        self.resize_range(pointer, split);
        self.set_range(split, template);
        if !template.is_burned() {
            self.holder_mut(template.owner).replace_range_pointer(0, split);
        }
        Ok(())
    }

    /// Absorbs the range starting at `right` into its left neighbor.
    /// Callers must have established adjacency and metadata equality.
    pub(crate) fn merge_adjacent(&mut self, left: u64, right: u64) {
        let Some(absorbed) = self.ranges.remove(&right) else {
            return;
        };
        self.grid.set_range_pointers(right, absorbed.stop, 0);
        self.resize_range(left, absorbed.stop);
        if !absorbed.is_burned() {
            self.holder_mut(absorbed.owner).replace_range_pointer(right, 0);
        }
    }

    // --- balances, allowances, custodial holdings ---------------------------

    pub fn balance_of(&self, addr: &Pubkey) -> u64 {
        self.holders.get(addr).map(|h| h.balance).unwrap_or(0)
    }

    pub(crate) fn holder_mut(&mut self, addr: Pubkey) -> &mut HolderBalance {
        self.holders.entry(addr).or_default()
    }

    /// Compacted `(start, stop)` pairs of `addr`'s ranges in stored order.
    pub fn ranges_of(&self, addr: &Pubkey) -> Vec<(u64, u64)> {
        let Some(holder) = self.holders.get(addr) else {
            return Vec::new();
        };
        holder
            .pointers()
            .filter_map(|pointer| {
                self.ranges
                    .get(&pointer)
                    .map(|range| (pointer, range.stop))
            })
            .collect()
    }

    pub fn allowance_of(&self, owner: &Pubkey, spender: &Pubkey) -> u64 {
        self.allowances
            .get(owner)
            .and_then(|per_spender| per_spender.get(spender))
            .copied()
            .unwrap_or(0)
    }

    pub fn approve(&mut self, owner: Pubkey, spender: Pubkey, value: u64) {
        self.allowances.entry(owner).or_default().insert(spender, value);
    }

    pub(crate) fn spend_allowance(
        &mut self,
        owner: &Pubkey,
        spender: &Pubkey,
        value: u64,
    ) -> Result<()> {
        let remaining = self
            .allowances
            .get_mut(owner)
            .and_then(|per_spender| per_spender.get_mut(spender))
            .ok_or(LedgerError::InsufficientAllowance)?;
        require!(*remaining >= value, LedgerError::InsufficientAllowance);
        *remaining -= value;
        Ok(())
    }

    pub fn custodial_balance_of(&self, owner: &Pubkey, custodian: &Pubkey) -> u64 {
        self.custodial
            .get(owner)
            .and_then(|per_custodian| per_custodian.get(custodian))
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn credit_custodial(&mut self, owner: Pubkey, custodian: Pubkey, value: u64) {
        *self
            .custodial
            .entry(owner)
            .or_default()
            .entry(custodian)
            .or_default() += value;
    }

    pub(crate) fn debit_custodial(
        &mut self,
        owner: &Pubkey,
        custodian: &Pubkey,
        value: u64,
    ) -> Result<()> {
        let held = self
            .custodial
            .get_mut(owner)
            .and_then(|per_custodian| per_custodian.get_mut(custodian))
            .ok_or(LedgerError::InsufficientCustodialBalance)?;
        require!(*held >= value, LedgerError::InsufficientCustodialBalance);
        *held -= value;
        Ok(())
    }
}
