use anchor_lang::prelude::*;

use crate::state::range::RangeTag;

/// Wire selectors of the policy hook surface. Retained so an on-chain hook
/// transport can route by selector; in-process implementations dispatch on
/// the `HookArgs` variant directly.
pub const CHECK_TRANSFER_SELECTOR: [u8; 4] = [0x70, 0xaa, 0xf9, 0x28];
pub const CHECK_TRANSFER_RANGE_SELECTOR: [u8; 4] = [0x5a, 0x5a, 0x8a, 0xd8];
pub const CHECK_RANGE_TRANSFER_SELECTOR: [u8; 4] = [0x2d, 0x79, 0xc6, 0xd7];
pub const TRANSFER_TOKEN_RANGE_SELECTOR: [u8; 4] = [0xea, 0xd5, 0x29, 0xf5];
pub const TRANSFER_CUSTODIAN_SELECTOR: [u8; 4] = [0x8b, 0x5f, 0x12, 0x40];

/// One tagged variant per hook, with named fields instead of an opaque
/// selector-prefixed byte blob.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookArgs {
    /// Untagged pre-check before planning a value transfer.
    CheckTransfer {
        auth: Pubkey,
        from: Pubkey,
        to: Pubkey,
        value: u64,
    },
    /// Tag-scoped per-candidate filter inside the planner. A `false` return
    /// skips the candidate rather than aborting.
    CheckTransferRange {
        tag: RangeTag,
        from: Pubkey,
        to: Pubkey,
        start: u64,
        stop: u64,
    },
    /// Tag-scoped check guarding an explicit index-range transfer.
    CheckRangeTransfer {
        tag: RangeTag,
        from: Pubkey,
        to: Pubkey,
        start: u64,
        stop: u64,
    },
    /// Tag-scoped notification after each committed sub-range.
    TransferTokenRange {
        tag: RangeTag,
        from: Pubkey,
        to: Pubkey,
        start: u64,
        stop: u64,
        amount: u64,
    },
    /// Custodian-internal beneficiary move.
    TransferCustodian {
        custodian: Pubkey,
        from: Pubkey,
        to: Pubkey,
        value: u64,
    },
}

impl HookArgs {
    pub const fn selector(&self) -> [u8; 4] {
        match self {
            HookArgs::CheckTransfer { .. } => CHECK_TRANSFER_SELECTOR,
            HookArgs::CheckTransferRange { .. } => CHECK_TRANSFER_RANGE_SELECTOR,
            HookArgs::CheckRangeTransfer { .. } => CHECK_RANGE_TRANSFER_SELECTOR,
            HookArgs::TransferTokenRange { .. } => TRANSFER_TOKEN_RANGE_SELECTOR,
            HookArgs::TransferCustodian { .. } => TRANSFER_CUSTODIAN_SELECTOR,
        }
    }

    /// Tag scope of the hook, when it has one.
    pub const fn tag_scope(&self) -> Option<RangeTag> {
        match self {
            HookArgs::CheckTransferRange { tag, .. }
            | HookArgs::CheckRangeTransfer { tag, .. }
            | HookArgs::TransferTokenRange { tag, .. } => Some(*tag),
            _ => None,
        }
    }
}

/// Policy module registry. Implementations answer each invocation with
/// allow/deny; outside the planner a `false` from a required hook aborts the
/// operation with `PolicyRejected`.
pub trait PolicyHooks {
    fn invoke(&mut self, args: &HookArgs) -> Result<bool>;
}

/// Registry with no attached policy modules; every hook allows.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPolicy;

impl PolicyHooks for NoPolicy {
    fn invoke(&mut self, _args: &HookArgs) -> Result<bool> {
        Ok(true)
    }
}
