use crate::state::ledger::TokenLedger;
use crate::utils::constants::LEDGER_SEED;
use crate::utils::events::emit_ledger_events;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct BurnTokens<'info> {
    #[account(mut, seeds = [LEDGER_SEED, &ledger.token_seed], bump = ledger.bump)]
    pub ledger: Account<'info, TokenLedger>,

    pub caller: Signer<'info>,
}

pub fn burn(ctx: Context<BurnTokens>, start: u64, stop: u64) -> Result<()> {
    let caller = ctx.accounts.caller.key();
    let mut events = Vec::new();
    ctx.accounts.ledger.burn(&caller, start, stop, &mut events)?;
    emit_ledger_events(&events);
    Ok(())
}
