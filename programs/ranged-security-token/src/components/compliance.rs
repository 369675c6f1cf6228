use anchor_lang::prelude::*;

/// Identity and permission metadata returned by the compliance oracle for one
/// prospective transfer. Index 0 is the sender side, index 1 the recipient
/// side (`SENDER` / `RECEIVER` in `utils::constants`).
///
/// The oracle is the identity authority: `parties` carries the normalized
/// addresses (an address registered under the issuer's logical id resolves to
/// the issuer address), and a rating of 0 marks a custodian account.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransferAuthorization {
    pub auth_id: [u8; 32],
    pub parties: [Pubkey; 2],
    pub ids: [[u8; 32]; 2],
    pub ratings: [u8; 2],
    pub countries: [u16; 2],
}

/// External compliance oracle consulted by every transfer entry point.
///
/// `check_transfer` is a pure query; `transfer_tokens` is the stateful
/// commit-intent form, with four post-condition hints: sender balance will be
/// zero, recipient balance was zero, sender custodial balance will be zero,
/// recipient custodial balance was zero. Either call may reject by returning
/// an error, which aborts the ledger operation.
pub trait ComplianceOracle {
    fn check_transfer(
        &self,
        auth: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        sender_will_be_zero: bool,
    ) -> Result<TransferAuthorization>;

    fn transfer_tokens(
        &mut self,
        auth: &Pubkey,
        from: &Pubkey,
        to: &Pubkey,
        zero_flags: [bool; 4],
    ) -> Result<TransferAuthorization>;
}
