use anchor_lang::prelude::*;

/// Compact bitfield of issuer-side rights.
///
/// Issuer-side operations gate on a boolean predicate per caller; keeping it
/// as one `u64` per operator means a single bitwise test answers "may this
/// caller mint / burn / retag". The transparent wrapper stays binary-stable
/// in account data while giving the rights a typed API.
#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Default,
)]
#[repr(transparent)]
pub struct IssuerRights(u64);

impl IssuerRights {
    /// Issue new token ranges at the right edge of the index space.
    pub const MINT: Self = Self(0b0000_0001);

    /// Retire token ranges, leaving owner-zero holes.
    pub const BURN: Self = Self(0b0000_0010);

    /// Rewrite time locks and tags on existing ranges.
    pub const MODIFY: Self = Self(0b0000_0100);

    /// Manage investor registry records.
    pub const MANAGE_MEMBERS: Self = Self(0b0000_1000);

    /// Grow the ledger account allocation.
    pub const RESIZE: Self = Self(0b0001_0000);

    /// Full operational control.
    pub const ADMIN_ALL: Self = Self(
        Self::MINT.0 | Self::BURN.0 | Self::MODIFY.0 | Self::MANAGE_MEMBERS.0 | Self::RESIZE.0,
    );

    /// Bitmask of all currently assigned right positions. Reads written by a
    /// newer program version are truncated to this mask.
    pub const VALID_MASK: u64 =
        Self::MINT.0 | Self::BURN.0 | Self::MODIFY.0 | Self::MANAGE_MEMBERS.0 | Self::RESIZE.0;

    #[inline(always)]
    pub const fn new() -> Self {
        Self(0)
    }

    #[inline(always)]
    pub fn has(self, rights: Self) -> bool {
        (self.0 & rights.0) != 0
    }

    #[inline(always)]
    pub fn has_all(self, rights: Self) -> bool {
        (self.0 & rights.0) == rights.0
    }

    #[inline(always)]
    pub fn grant(&mut self, rights: Self) {
        self.0 |= rights.0;
    }

    #[inline(always)]
    pub fn revoke(&mut self, rights: Self) {
        self.0 &= !rights.0;
    }

    #[inline(always)]
    pub fn is_admin(self) -> bool {
        self.has_all(Self::ADMIN_ALL)
    }

    #[inline(always)]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Reconstructs rights from raw bits, dropping unknown positions so data
    /// written by future versions never grants rights this version cannot
    /// name.
    #[inline(always)]
    pub const fn from_u64_truncate(value: u64) -> Self {
        Self(value & Self::VALID_MASK)
    }
}
