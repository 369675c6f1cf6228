use crate::components::{AcceptingCustodian, LedgerEnv, NoPolicy};
use crate::state::ledger::TokenLedger;
use crate::state::range::RangeTag;
use crate::state::registry::InvestorRegistry;
use crate::utils::constants::{LEDGER_SEED, REGISTRY_SEED};
use crate::utils::events::emit_ledger_events;
use anchor_lang::prelude::*;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy)]
pub struct MintArgs {
    pub owner: Pubkey,
    pub value: u64,
    /// Unix time before which the minted range stays locked; 0 for none.
    pub time: u32,
    pub tag: [u8; 2],
}

#[derive(Accounts)]
pub struct MintTokens<'info> {
    #[account(mut, seeds = [LEDGER_SEED, &ledger.token_seed], bump = ledger.bump)]
    pub ledger: Account<'info, TokenLedger>,

    #[account(
        mut,
        seeds = [REGISTRY_SEED, ledger.key().as_ref()],
        bump = registry.bump,
    )]
    pub registry: Account<'info, InvestorRegistry>,

    pub caller: Signer<'info>,
}

pub fn mint(ctx: Context<MintTokens>, args: MintArgs) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let caller = ctx.accounts.caller.key();
    let mut hooks = NoPolicy;
    let mut custodians = AcceptingCustodian;
    let mut env = LedgerEnv {
        oracle: &mut *ctx.accounts.registry,
        hooks: &mut hooks,
        custodians: &mut custodians,
        now,
    };
    let mut events = Vec::new();
    ctx.accounts.ledger.mint(
        &mut env,
        &caller,
        args.owner,
        args.value,
        args.time,
        RangeTag::new(args.tag),
        &mut events,
    )?;
    emit_ledger_events(&events);
    Ok(())
}
