use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::components::{ComplianceOracle, TransferAuthorization};
use crate::error::RegistryError;

/// One registered investor. A rating of 0 marks a custodian account; any
/// other rating is an ordinary investor tier. `restricted` members stay on
/// the books but fail every transfer check.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct MemberRecord {
    pub id: [u8; 32],
    pub rating: u8,
    pub country: u16,
    pub restricted: bool,
}

/// Minimal on-ledger compliance oracle.
///
/// The ledger engine only sees the `ComplianceOracle` trait; this account is
/// the program's concrete implementation. It resolves both transfer parties
/// to `(address, record)` pairs, normalizing any address registered under the
/// issuer's logical id to the issuer address, and rejects unknown or
/// restricted members.
#[account]
#[derive(Default, Debug)]
pub struct InvestorRegistry {
    /// Ledger this registry serves.
    pub ledger: Pubkey,
    /// Issuer address; also the resolution target of the issuer id.
    pub issuer: Pubkey,
    /// Logical id of the issuing entity.
    pub issuer_id: [u8; 32],
    pub members: BTreeMap<Pubkey, MemberRecord>,
    pub bump: u8,
}

impl InvestorRegistry {
    fn issuer_record(&self) -> MemberRecord {
        MemberRecord {
            id: self.issuer_id,
            rating: 0,
            country: 0,
            restricted: false,
        }
    }

    fn resolve(&self, addr: &Pubkey) -> Result<(Pubkey, MemberRecord)> {
        if *addr == self.issuer {
            return Ok((self.issuer, self.issuer_record()));
        }
        let record = self
            .members
            .get(addr)
            .ok_or(RegistryError::UnknownMember)?;
        require!(!record.restricted, RegistryError::MemberRestricted);
        if record.id == self.issuer_id {
            return Ok((self.issuer, self.issuer_record()));
        }
        Ok((*addr, *record))
    }

    fn authorize(
        &self,
        auth: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
    ) -> Result<TransferAuthorization> {
        let (from_addr, from_record) = self.resolve(from)?;
        let (to_addr, to_record) = self.resolve(to)?;
        let auth_id = if *auth == self.issuer {
            self.issuer_id
        } else {
            self.members
                .get(auth)
                .map(|record| record.id)
                .unwrap_or(from_record.id)
        };
        Ok(TransferAuthorization {
            auth_id,
            parties: [from_addr, to_addr],
            ids: [from_record.id, to_record.id],
            ratings: [from_record.rating, to_record.rating],
            countries: [from_record.country, to_record.country],
        })
    }

    /// Upserts a member record. The issuer id is reserved for the issuing
    /// entity's own address resolution and cannot be assigned.
    pub fn set_member(&mut self, member: Pubkey, record: MemberRecord) -> Result<()> {
        require!(record.id != [0u8; 32], RegistryError::InvalidMemberId);
        require!(record.id != self.issuer_id, RegistryError::ReservedMemberId);
        self.members.insert(member, record);
        Ok(())
    }
}

impl ComplianceOracle for InvestorRegistry {
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
