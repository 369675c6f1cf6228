use std::collections::BTreeMap;

use anchor_lang::error::Error;
use anchor_lang::prelude::{Pubkey, Result};

use crate::components::{
    ComplianceOracle, CustodianReceiver, HookArgs, LedgerEnv, PolicyHooks, TransferAuthorization,
};
use crate::error::LedgerError;
use crate::state::ledger::TokenLedger;
use crate::state::range::{RangeTag, TokenRange};
use crate::utils::constants::{RECEIVER, SENDER};
use crate::utils::events::LedgerEvent;

// Shared fixtures for the ledger suites. Everything is deterministic: keys
// are derived from small seeds, the clock is pinned, and the collaborators
// are scripted, so failing sequences shrink to reproducible minimal cases.

/// Pinned host clock for every test that does not advance time explicitly.
pub(crate) const NOW: i64 = 1_000;

/// Generates a deterministic, non-default pubkey from a small seed.
pub(crate) fn deterministic_pubkey(seed: u8) -> Pubkey {
    let mut bytes = [0u8; 32];
    for (idx, byte) in bytes.iter_mut().enumerate() {
        *byte = seed
            .wrapping_add((idx as u8).wrapping_mul(37))
            .wrapping_add(1);
    }
    Pubkey::new_from_array(bytes)
}

pub(crate) fn authority() -> Pubkey {
    deterministic_pubkey(1)
}

pub(crate) fn issuer() -> Pubkey {
    deterministic_pubkey(2)
}

pub(crate) fn investor_a() -> Pubkey {
    deterministic_pubkey(10)
}

pub(crate) fn investor_b() -> Pubkey {
    deterministic_pubkey(11)
}

pub(crate) fn investor_c() -> Pubkey {
    deterministic_pubkey(12)
}

pub(crate) fn custodian_x() -> Pubkey {
    deterministic_pubkey(20)
}

/// In-memory compliance oracle: a member table keyed by address with a
/// rating each (0 = custodian). Unknown parties are rejected, the issuer
/// address always resolves, and ids are the raw address bytes so tests can
/// predict them.
pub(crate) struct MockOracle {
    pub issuer: Pubkey,
    pub members: BTreeMap<Pubkey, u8>,
}

impl MockOracle {
    pub(crate) fn new(issuer: Pubkey) -> Self {
        Self {
            issuer,
            members: BTreeMap::new(),
        }
    }

    fn resolve(&self, addr: &Pubkey) -> Result<(Pubkey, u8)> {
        if *addr == self.issuer {
            return Ok((self.issuer, 0));
        }
        match self.members.get(addr) {
            Some(rating) => Ok((*addr, *rating)),
            None => Err(LedgerError::ComplianceRejected.into()),
        }
    }

    fn authorize(&self, auth: &Pubkey, from: &Pubkey, to: &Pubkey) -> Result<TransferAuthorization> {
        let mut parties = [Pubkey::default(); 2];
        let mut ids = [[0u8; 32]; 2];
        let mut ratings = [0u8; 2];
        let (from_addr, from_rating) = self.resolve(from)?;
        let (to_addr, to_rating) = self.resolve(to)?;
        parties[SENDER] = from_addr;
        parties[RECEIVER] = to_addr;
        ids[SENDER] = from_addr.to_bytes();
        ids[RECEIVER] = to_addr.to_bytes();
        ratings[SENDER] = from_rating;
        ratings[RECEIVER] = to_rating;
        Ok(TransferAuthorization {
            auth_id: auth.to_bytes(),
            parties,
            ids,
            ratings,
            countries: [840, 840],
        })
    }
}

impl ComplianceOracle for MockOracle {
    fn check_transfer(
        &self,
        auth: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        _sender_will_be_zero: bool,
    ) -> Result<TransferAuthorization> {
        self.authorize(auth, from, to)
    }

    fn transfer_tokens(
        &mut self,
        auth: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        _zero_flags: [bool; 4],
    ) -> Result<TransferAuthorization> {
        self.authorize(auth, from, to)
    }
}

/// Policy registry that records every invocation and denies by selector or
/// by tag scope.
#[derive(Default)]
pub(crate) struct ScriptedPolicy {
    pub deny_selectors: Vec<[u8; 4]>,
    pub deny_tags: Vec<RangeTag>,
    pub calls: Vec<HookArgs>,
}

impl PolicyHooks for ScriptedPolicy {
    fn invoke(&mut self, args: &HookArgs) -> Result<bool> {
        self.calls.push(*args);
        if self.deny_selectors.contains(&args.selector()) {
            return Ok(false);
        }
        if let Some(tag) = args.tag_scope() {
            if self.deny_tags.contains(&tag) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Custodian callback surface that records deliveries and can be flipped to
/// refuse them.
pub(crate) struct RecordingCustodian {
    pub accept: bool,
    pub received: Vec<(Pubkey, Pubkey, u64)>,
}

impl Default for RecordingCustodian {
    fn default() -> Self {
        Self {
            accept: true,
            received: Vec::new(),
        }
    }
}

impl CustodianReceiver for RecordingCustodian {
    fn receive_transfer(
        &mut self,
        custodian: &Pubkey,
        beneficiary: &Pubkey,
        value: u64,
    ) -> Result<bool> {
        self.received.push((*custodian, *beneficiary, value));
        Ok(self.accept)
    }
}

/// Engine harness: a ledger wired to scripted collaborators and a pinned
/// clock. Each operation clears the event buffer first, so assertions always
/// see exactly the events of the last call.
pub(crate) struct TestBench {
    pub ledger: TokenLedger,
    pub oracle: MockOracle,
    pub hooks: ScriptedPolicy,
    pub custodians: RecordingCustodian,
    pub now: i64,
    pub events: Vec<LedgerEvent>,
}

impl TestBench {
    pub(crate) fn new() -> Self {
        let mut ledger = TokenLedger::default();
        ledger.issuer = issuer();
        ledger.authority = authority();
        Self {
            ledger,
            oracle: MockOracle::new(issuer()),
            hooks: ScriptedPolicy::default(),
            custodians: RecordingCustodian::default(),
            now: NOW,
            events: Vec::new(),
        }
    }

    /// Standard cast: A, B, C as investors, X as custodian.
    pub(crate) fn with_default_members() -> Self {
        let mut bench = Self::new();
        bench.register(investor_a(), 1);
        bench.register(investor_b(), 1);
        bench.register(investor_c(), 2);
        bench.register(custodian_x(), 0);
        bench
    }

    pub(crate) fn register(&mut self, addr: Pubkey, rating: u8) {
        self.oracle.members.insert(addr, rating);
    }

    pub(crate) fn mint(&mut self, owner: Pubkey, value: u64, time: u32, tag: RangeTag) -> Result<()> {
        self.mint_as(authority(), owner, value, time, tag)
    }

    pub(crate) fn mint_as(
        &mut self,
        caller: Pubkey,
        owner: Pubkey,
        value: u64,
        time: u32,
        tag: RangeTag,
    ) -> Result<()> {
        self.events.clear();
        let mut env = LedgerEnv {
            oracle: &mut self.oracle,
            hooks: &mut self.hooks,
            custodians: &mut self.custodians,
            now: self.now,
        };
        self.ledger
            .mint(&mut env, &caller, owner, value, time, tag, &mut self.events)
    }

    pub(crate) fn burn(&mut self, start: u64, stop: u64) -> Result<()> {
        self.burn_as(authority(), start, stop)
    }

    pub(crate) fn burn_as(&mut self, caller: Pubkey, start: u64, stop: u64) -> Result<()> {
        self.events.clear();
        self.ledger.burn(&caller, start, stop, &mut self.events)
    }

    pub(crate) fn modify_range(&mut self, pointer: u64, time: u32, tag: RangeTag) -> Result<()> {
        self.events.clear();
        let caller = authority();
        self.ledger
            .modify_range(&caller, pointer, time, tag, self.now, &mut self.events)
    }

    pub(crate) fn modify_ranges(
        &mut self,
        start: u64,
        stop: u64,
        time: u32,
        tag: RangeTag,
    ) -> Result<()> {
        self.events.clear();
        let caller = authority();
        self.ledger
            .modify_ranges(&caller, start, stop, time, tag, self.now, &mut self.events)
    }

    pub(crate) fn transfer(&mut self, caller: Pubkey, to: Pubkey, value: u64) -> Result<()> {
        self.events.clear();
        let mut env = LedgerEnv {
            oracle: &mut self.oracle,
            hooks: &mut self.hooks,
            custodians: &mut self.custodians,
            now: self.now,
        };
        self.ledger
            .transfer(&mut env, &caller, to, value, &mut self.events)
    }

    pub(crate) fn transfer_from(
        &mut self,
        caller: Pubkey,
        from: Pubkey,
        to: Pubkey,
        value: u64,
    ) -> Result<()> {
        self.events.clear();
        let mut env = LedgerEnv {
            oracle: &mut self.oracle,
            hooks: &mut self.hooks,
            custodians: &mut self.custodians,
            now: self.now,
        };
        self.ledger
            .transfer_from(&mut env, &caller, from, to, value, &mut self.events)
    }

    pub(crate) fn transfer_range(
        &mut self,
        caller: Pubkey,
        to: Pubkey,
        start: u64,
        stop: u64,
    ) -> Result<()> {
        self.events.clear();
        let mut env = LedgerEnv {
            oracle: &mut self.oracle,
            hooks: &mut self.hooks,
            custodians: &mut self.custodians,
            now: self.now,
        };
        self.ledger
            .transfer_range(&mut env, &caller, to, start, stop, &mut self.events)
    }

    pub(crate) fn transfer_custodian(
        &mut self,
        caller: Pubkey,
        from: Pubkey,
        to: Pubkey,
        value: u64,
    ) -> Result<()> {
        self.events.clear();
        let mut env = LedgerEnv {
            oracle: &mut self.oracle,
            hooks: &mut self.hooks,
            custodians: &mut self.custodians,
            now: self.now,
        };
        self.ledger
            .transfer_custodian(&mut env, &caller, from, to, value, &mut self.events)
    }

    pub(crate) fn can_transfer(&mut self, caller: Pubkey, from: Pubkey, to: Pubkey, value: u64) -> Result<()> {
        self.ledger.can_transfer(
            &self.oracle,
            &mut self.hooks,
            &caller,
            from,
            to,
            value,
            self.now,
        )
    }
}

pub(crate) fn assert_ledger_error<T: std::fmt::Debug>(result: Result<T>, expected: LedgerError) {
    let err = result.expect_err("expected error result");
    let expected_error: Error = expected.into();
    let actual_code = error_code_number(&err).expect("expected anchor error code");
    let expected_code = error_code_number(&expected_error).expect("expected anchor error code");
    assert_eq!(actual_code, expected_code, "unexpected error variant");
}

fn error_code_number(err: &Error) -> Option<u32> {
    match err {
        Error::AnchorError(anchor_err) => Some(anchor_err.error_code_number),
        Error::ProgramError(_) => None,
    }
}

/// Full structural audit: contiguous tiling, grid resolution for every
/// index, balance identity per holder, supply counters, and balance-ranges
/// index consistency. Every mutation test funnels through this.
pub(crate) fn assert_tiling(ledger: &TokenLedger) {
    if ledger.upper_bound == 0 {
        assert!(ledger.ranges.is_empty(), "ranges before the first mint");
        return;
    }

    let mut expected_start = 1u64;
    for (&start, range) in ledger.ranges.iter() {
        assert_eq!(start, expected_start, "gap or overlap at {start}");
        assert!(range.stop > start, "empty range at {start}");
        expected_start = range.stop;
    }
    assert_eq!(
        expected_start,
        ledger.upper_bound + 1,
        "ranges must cover the allocated space"
    );

    for index in 1..=ledger.upper_bound {
        let pointer = ledger.grid.locate(index);
        let range = ledger
            .ranges
            .get(&pointer)
            .expect("locate must return a live start pointer");
        assert!(
            pointer <= index && index < range.stop,
            "index {index} resolved to [{pointer}, {})",
            range.stop
        );
    }

    let mut live_total = 0u64;
    let mut burned_total = 0u64;
    let mut per_owner: BTreeMap<Pubkey, u64> = BTreeMap::new();
    let mut owner_starts: BTreeMap<Pubkey, Vec<u64>> = BTreeMap::new();
    for (&start, range) in ledger.ranges.iter() {
        let len = range.stop - start;
        if range.is_burned() {
            burned_total += len;
        } else {
            live_total += len;
            *per_owner.entry(range.owner).or_default() += len;
            owner_starts.entry(range.owner).or_default().push(start);
        }
    }
    assert_eq!(ledger.total_supply, live_total, "total_supply identity");
    assert_eq!(ledger.total_burned, burned_total, "total_burned identity");
    assert_eq!(
        ledger.total_supply + ledger.total_burned,
        ledger.upper_bound,
        "supply counters must cover the index space"
    );

    for (addr, holder) in ledger.holders.iter() {
        let mut listed: Vec<u64> = holder.pointers().collect();
        listed.sort_unstable();
        let mut expected = owner_starts.remove(addr).unwrap_or_default();
        expected.sort_unstable();
        assert_eq!(listed, expected, "balance-ranges index for {addr}");
        assert_eq!(
            holder.balance,
            per_owner.get(addr).copied().unwrap_or(0),
            "balance identity for {addr}"
        );
    }
    assert!(
        owner_starts.is_empty(),
        "owners missing holder entries: {owner_starts:?}"
    );
}

/// No two adjacent live ranges may share the full metadata tuple.
pub(crate) fn assert_canonical(ledger: &TokenLedger) {
    let mut prev: Option<&TokenRange> = None;
    for (&start, range) in ledger.ranges.iter() {
        if let Some(previous) = prev {
            if !previous.is_burned() && !range.is_burned() {
                let twins = previous.owner == range.owner
                    && previous.time == range.time
                    && previous.tag == range.tag
                    && previous.custodian == range.custodian;
                assert!(!twins, "adjacent twin ranges at {start}");
            }
        }
        prev = Some(range);
    }
}
