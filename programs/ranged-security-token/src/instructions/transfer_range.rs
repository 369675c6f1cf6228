use crate::components::{AcceptingCustodian, LedgerEnv, NoPolicy};
use crate::state::ledger::TokenLedger;
use crate::state::registry::InvestorRegistry;
use crate::utils::constants::{LEDGER_SEED, REGISTRY_SEED};
use crate::utils::events::emit_ledger_events;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct TransferRange<'info> {
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

pub fn transfer_range(
    ctx: Context<TransferRange>,
    to: Pubkey,
    start: u64,
    stop: u64,
) -> Result<()> {
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
    ctx.accounts
        .ledger
        .transfer_range(&mut env, &caller, to, start, stop, &mut events)?;
    emit_ledger_events(&events);
    Ok(())
}
