use crate::state::ledger::TokenLedger;
use crate::utils::constants::LEDGER_SEED;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct Approve<'info> {
    #[account(mut, seeds = [LEDGER_SEED, &ledger.token_seed], bump = ledger.bump)]
    pub ledger: Account<'info, TokenLedger>,

    pub caller: Signer<'info>,
}

/// Sets (not adjusts) the caller's allowance for `spender`, the table
/// `transfer_from` debits when the spender is neither sender nor issuer.
pub fn approve(ctx: Context<Approve>, spender: Pubkey, value: u64) -> Result<()> {
    let caller = ctx.accounts.caller.key();
    ctx.accounts.ledger.approve(caller, spender, value);
    Ok(())
}
