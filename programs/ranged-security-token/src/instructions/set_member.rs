use crate::state::access::IssuerRights;
use crate::state::ledger::TokenLedger;
use crate::state::registry::{InvestorRegistry, MemberRecord};
use crate::utils::constants::{LEDGER_SEED, REGISTRY_SEED};
use anchor_lang::prelude::*;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy)]
pub struct MemberConfig {
    pub id: [u8; 32],
    /// 0 marks a custodian account.
    pub rating: u8,
    pub country: u16,
    pub restricted: bool,
}

#[derive(Accounts)]
pub struct SetMember<'info> {
    #[account(seeds = [LEDGER_SEED, &ledger.token_seed], bump = ledger.bump)]
    pub ledger: Account<'info, TokenLedger>,

    #[account(
        mut,
        seeds = [REGISTRY_SEED, ledger.key().as_ref()],
        bump = registry.bump,
    )]
    pub registry: Account<'info, InvestorRegistry>,

    pub caller: Signer<'info>,
}

pub fn set_member(ctx: Context<SetMember>, member: Pubkey, config: MemberConfig) -> Result<()> {
    ctx.accounts
        .ledger
        .check_authority(&ctx.accounts.caller.key(), IssuerRights::MANAGE_MEMBERS)?;
    ctx.accounts.registry.set_member(
        member,
        MemberRecord {
            id: config.id,
            rating: config.rating,
            country: config.country,
            restricted: config.restricted,
        },
    )
}
