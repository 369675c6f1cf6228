use crate::state::ledger::TokenLedger;
use crate::state::range::RangeTag;
use crate::utils::constants::LEDGER_SEED;
use crate::utils::events::emit_ledger_events;
use anchor_lang::prelude::*;

#[derive(Accounts)]
pub struct ModifyRange<'info> {
    #[account(mut, seeds = [LEDGER_SEED, &ledger.token_seed], bump = ledger.bump)]
    pub ledger: Account<'info, TokenLedger>,

    pub caller: Signer<'info>,
}

pub fn modify_range(
    ctx: Context<ModifyRange>,
    pointer: u64,
    time: u32,
    tag: [u8; 2],
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let caller = ctx.accounts.caller.key();
    let mut events = Vec::new();
    ctx.accounts.ledger.modify_range(
        &caller,
        pointer,
        time,
        RangeTag::new(tag),
        now,
        &mut events,
    )?;
    emit_ledger_events(&events);
    Ok(())
}
