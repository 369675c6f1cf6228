#![allow(unexpected_cfgs)]
use anchor_lang::prelude::*;

pub mod components;
pub mod error;
pub mod instructions;
pub mod state;
pub mod utils;

use instructions::*;

declare_id!("4CVNsAY1CA9nRLdg7TokBJAcUvPR2eTbidLu3nMewPad");

#[program]
pub mod ranged_security_token {
    use super::*;

    pub fn initialize_ledger(ctx: Context<InitializeLedger>, config: LedgerConfig) -> Result<()> {
        instructions::initialize_ledger::initialize_ledger(ctx, config)
    }

    pub fn set_member(ctx: Context<SetMember>, member: Pubkey, config: MemberConfig) -> Result<()> {
        instructions::set_member::set_member(ctx, member, config)
    }

    pub fn mint(ctx: Context<MintTokens>, args: MintArgs) -> Result<()> {
        instructions::mint::mint(ctx, args)
    }

    pub fn burn(ctx: Context<BurnTokens>, start: u64, stop: u64) -> Result<()> {
        instructions::burn::burn(ctx, start, stop)
    }

    pub fn modify_range(
        ctx: Context<ModifyRange>,
        pointer: u64,
        time: u32,
        tag: [u8; 2],
    ) -> Result<()> {
        instructions::modify_range::modify_range(ctx, pointer, time, tag)
    }

    pub fn modify_ranges(
        ctx: Context<ModifyRanges>,
        start: u64,
        stop: u64,
        time: u32,
        tag: [u8; 2],
    ) -> Result<()> {
        instructions::modify_ranges::modify_ranges(ctx, start, stop, time, tag)
    }

    pub fn approve(ctx: Context<Approve>, spender: Pubkey, value: u64) -> Result<()> {
        instructions::approve::approve(ctx, spender, value)
    }

    pub fn transfer(ctx: Context<TransferTokens>, to: Pubkey, value: u64) -> Result<()> {
        instructions::transfer::transfer(ctx, to, value)
    }

    pub fn transfer_from(
        ctx: Context<TransferTokensFrom>,
        from: Pubkey,
        to: Pubkey,
        value: u64,
    ) -> Result<()> {
        instructions::transfer_from::transfer_from(ctx, from, to, value)
    }

    pub fn transfer_range(
        ctx: Context<TransferRange>,
        to: Pubkey,
        start: u64,
        stop: u64,
    ) -> Result<()> {
        instructions::transfer_range::transfer_range(ctx, to, start, stop)
    }

    pub fn transfer_custodian(
        ctx: Context<TransferCustodianInternal>,
        from: Pubkey,
        to: Pubkey,
        value: u64,
    ) -> Result<()> {
        instructions::transfer_custodian::transfer_custodian(ctx, from, to, value)
    }

    pub fn resize_ledger(ctx: Context<ResizeLedger>, new_size: u32) -> Result<()> {
        instructions::resize_ledger::resize_ledger(ctx, new_size)
    }
}
