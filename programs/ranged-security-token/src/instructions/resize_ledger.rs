use crate::error::LedgerError;
use crate::state::access::IssuerRights;
use crate::state::ledger::TokenLedger;
use crate::utils::constants::LEDGER_SEED;
use anchor_lang::prelude::*;

/// Grows the ledger account. The range set expands with mint and split
/// activity and Borsh accounts cannot outgrow their allocation, so operators
/// resize ahead of demand; shrinking below the serialized size is rejected.
#[derive(Accounts)]
#[instruction(new_size: u32)]
pub struct ResizeLedger<'info> {
    #[account(
        mut,
        seeds = [LEDGER_SEED, &ledger.token_seed],
        bump = ledger.bump,
        realloc = new_size as usize,
        realloc::payer = caller,
        realloc::zero = false,
    )]
    pub ledger: Account<'info, TokenLedger>,

    #[account(mut)]
    pub caller: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn resize_ledger(ctx: Context<ResizeLedger>, new_size: u32) -> Result<()> {
    let caller = ctx.accounts.caller.key();
    ctx.accounts
        .ledger
        .check_authority(&caller, IssuerRights::RESIZE)?;
    let serialized = ctx.accounts.ledger.try_to_vec()?;
    require!(
        (new_size as usize) >= 8 + serialized.len(),
        LedgerError::InvalidSpace
    );
    Ok(())
}
