use crate::error::RegistryError;
use crate::state::access::IssuerRights;
use crate::state::ledger::TokenLedger;
use crate::state::registry::InvestorRegistry;
use crate::utils::constants::{INITIAL_LEDGER_SPACE, LEDGER_SEED, REGISTRY_SEED, REGISTRY_SPACE};
use anchor_lang::prelude::*;
use anchor_lang::solana_program::keccak;

/// One-time ledger bootstrap: creates the ledger and its investor registry,
/// binds the ledger PDA to the canonical token symbol, and seeds the operator
/// set. All parameter validation happens before the first account write so a
/// rejected configuration leaves nothing behind.
#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct LedgerConfig {
    /// Display name, metadata only.
    pub name: String,

    /// Token symbol; canonicalized (trim + lowercase) before use so
    /// "ACME-A", "acme-a" and " acme-a " resolve to the same ledger.
    pub symbol: String,

    /// keccak hash of the canonical symbol. Validated here and kept in the
    /// ledger as part of its PDA seeds.
    pub token_seed: [u8; 32],

    /// Address holding issuer-owned ranges. The registry resolves the
    /// issuer's logical id to this address on every transfer.
    pub issuer: Pubkey,

    /// Logical id of the issuing entity, reserved in the registry.
    pub issuer_id: [u8; 32],

    /// Initial operator set beyond the authority.
    pub operators: Vec<OperatorConfig>,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct OperatorConfig {
    pub addr: Pubkey,
    /// Raw rights bits; unknown positions are truncated on load.
    pub rights: u64,
}

#[derive(Accounts)]
#[instruction(config: LedgerConfig)]
pub struct InitializeLedger<'info> {
    #[account(
        init,
        payer = authority,
        space = INITIAL_LEDGER_SPACE,
        seeds = [LEDGER_SEED, &config.token_seed],
        bump,
    )]
    pub ledger: Account<'info, TokenLedger>,

    /// Registry derived from the ledger so the pair cannot be mismatched.
    #[account(
        init,
        payer = authority,
        space = REGISTRY_SPACE,
        seeds = [REGISTRY_SEED, ledger.key().as_ref()],
        bump,
    )]
    pub registry: Account<'info, InvestorRegistry>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[inline(always)]
fn canonicalize_symbol(symbol: &str) -> String {
    symbol.trim().to_ascii_lowercase()
}

#[inline(always)]
fn validate_symbol(canonical_symbol: &str) -> Result<()> {
    require!(
        !canonical_symbol.is_empty() && canonical_symbol.len() <= 16,
        RegistryError::InvalidSymbol
    );
    Ok(())
}

/// The seed must be the keccak hash of the canonical symbol, which keeps
/// ledger addresses deterministic per symbol and blocks look-alike ledgers
/// differing only in case or padding.
#[inline(always)]
fn validate_token_seed(canonical_symbol: &str, token_seed: &[u8; 32]) -> Result<()> {
    let expected_hash = keccak::hashv(&[canonical_symbol.as_bytes()]).0;
    require!(expected_hash == *token_seed, RegistryError::InvalidTokenSeed);
    Ok(())
}

pub fn initialize_ledger(ctx: Context<InitializeLedger>, config: LedgerConfig) -> Result<()> {
    let canonical_symbol = canonicalize_symbol(&config.symbol);
    validate_symbol(&canonical_symbol)?;
    validate_token_seed(&canonical_symbol, &config.token_seed)?;
    require!(
        !config.name.is_empty() && config.name.len() <= 64,
        RegistryError::InvalidName
    );
    require!(
        config.issuer != Pubkey::default(),
        RegistryError::InvalidIssuer
    );
    require!(config.issuer_id != [0u8; 32], RegistryError::InvalidMemberId);

    let ledger_key = ctx.accounts.ledger.key();

    let ledger = &mut ctx.accounts.ledger;
    ledger.issuer = config.issuer;
    ledger.authority = ctx.accounts.authority.key();
    ledger.name = config.name;
    ledger.symbol = canonical_symbol;
    ledger.token_seed = config.token_seed;
    ledger.bump = ctx.bumps.ledger;
    for operator in &config.operators {
        ledger
            .operators
            .insert(operator.addr, IssuerRights::from_u64_truncate(operator.rights));
    }

    let registry = &mut ctx.accounts.registry;
    registry.ledger = ledger_key;
    registry.issuer = config.issuer;
    registry.issuer_id = config.issuer_id;
    registry.bump = ctx.bumps.registry;

    Ok(())
}
