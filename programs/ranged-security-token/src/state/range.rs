use anchor_lang::prelude::*;

/// 2-byte opaque range classifier. Policy hooks are scoped by tag, so the
/// wrapper keeps raw bytes and numeric forms interchangeable without leaking
/// byte-order decisions into callers.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct RangeTag(pub [u8; 2]);

impl RangeTag {
    pub const NONE: Self = Self([0; 2]);

    #[inline(always)]
    pub const fn new(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }

    #[inline(always)]
    pub const fn from_u16(raw: u16) -> Self {
        Self(raw.to_be_bytes())
    }

    #[inline(always)]
    pub const fn as_u16(self) -> u16 {
        u16::from_be_bytes(self.0)
    }

    #[inline(always)]
    pub const fn as_bytes(self) -> [u8; 2] {
        self.0
    }
}

/// Range descriptor, keyed in the store by its start pointer.
///
/// `owner == Pubkey::default()` marks a burned slot: the range keeps tiling
/// the index space but carries no balance. `custodian` is the default key for
/// uncustodied ranges. `time == 0` means unrestricted; a nonzero value in the
/// past is lazily zeroed the first time a time check observes it.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenRange {
    pub owner: Pubkey,
    pub stop: u64,
    pub time: u32,
    pub tag: RangeTag,
    pub custodian: Pubkey,
}

impl TokenRange {
    #[inline(always)]
    pub fn is_burned(&self) -> bool {
        self.owner == Pubkey::default()
    }

    #[inline(always)]
    pub fn is_custodied(&self) -> bool {
        self.custodian != Pubkey::default()
    }
}

/// Per-account balance plus the balance-ranges index: the start pointers of
/// the account's live ranges in historical insertion order. In-place removal
/// leaves a zero tombstone so sibling entries keep their positions; readers
/// must skip zeros.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default)]
pub struct HolderBalance {
    pub balance: u64,
    pub ranges: Vec<u64>,
}

impl HolderBalance {
    /// Overwrites the first entry equal to `old` with `new`; appends `new`
    /// when no such entry exists and `new` is nonzero. `(old, 0)` removes,
    /// `(0, new)` appends (reusing the first tombstone if one exists),
    /// `(old, new)` substitutes in place.
    pub fn replace_range_pointer(&mut self, old: u64, new: u64) {
        if let Some(slot) = self.ranges.iter_mut().find(|entry| **entry == old) {
            *slot = new;
        } else if new != 0 {
            self.ranges.push(new);
        }
    }

    /// Live pointers in stored order, tombstones skipped.
    pub fn pointers(&self) -> impl Iterator<Item = u64> + '_ {
        self.ranges.iter().copied().filter(|pointer| *pointer != 0)
    }
}
