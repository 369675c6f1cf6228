use anchor_lang::prelude::*;

#[error_code]
pub enum LedgerError {
    #[msg("Index is zero or beyond the allocated upper bound")]
    InvalidIndex,
    #[msg("Value does not fit in 48 bits")]
    ValueTooLarge,
    #[msg("Value must be greater than zero")]
    ZeroValue,
    #[msg("Sender and recipient resolve to the same account")]
    SelfTransfer,
    #[msg("Sender balance is insufficient")]
    InsufficientBalance,
    #[msg("Custodial balance is insufficient")]
    InsufficientCustodialBalance,
    #[msg("Caller allowance is insufficient")]
    InsufficientAllowance,
    #[msg("Time, custodian, or policy constraints leave too little transferable value")]
    InsufficientTransferable,
    #[msg("Range is locked until a future time")]
    TimeLocked,
    #[msg("Custodian accounts cannot send explicit index ranges")]
    CustodianSendDisallowed,
    #[msg("Caller does not own the enclosing range")]
    NotOwner,
    #[msg("A policy hook rejected the operation")]
    PolicyRejected,
    #[msg("The compliance oracle rejected the transfer")]
    ComplianceRejected,
    #[msg("Mint would overflow the 48-bit index space")]
    UpperBoundExceeded,
    #[msg("Caller lacks the required issuer right")]
    PermissionDenied,
    #[msg("Interval crosses a range boundary")]
    SpansMultipleRanges,
    #[msg("Range is held under a custodian")]
    RangeCustodied,
    #[msg("Time lock must be zero or in the future")]
    PastTimeLock,
    #[msg("Custodian refused the incoming transfer")]
    CustodianRejected,
    #[msg("New account size is below the serialized ledger size")]
    InvalidSpace,
}

#[error_code]
pub enum RegistryError {
    #[msg("Account is not a registered member")]
    UnknownMember,
    #[msg("Member is restricted from transfers")]
    MemberRestricted,
    #[msg("Member id cannot be all zeroes")]
    InvalidMemberId,
    #[msg("Member id collides with the issuer id")]
    ReservedMemberId,
    #[msg("Symbol must be non-empty and <= 16 characters")]
    InvalidSymbol,
    #[msg("Name must be non-empty and <= 64 characters")]
    InvalidName,
    #[msg("Issuer cannot be the default key")]
    InvalidIssuer,
    #[msg("Token seed does not match the canonical symbol hash")]
    InvalidTokenSeed,
}
