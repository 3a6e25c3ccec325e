// =============================================================================
// Initialize Config Instruction
// =============================================================================
// One-time bootstrap of the program:
// - PoolConfig: the signer becomes owner, management fee starts at 0
// - TokenRegistry: empty global list of mints with depositors
//
// Pools themselves are not created here; the first deposit for a mint
// creates its pool and vault.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::state::{PoolConfig, TokenRegistry};

/// Accounts required for the initialize_config instruction
#[derive(Accounts)]
pub struct InitializeConfig<'info> {
    /// Becomes the config owner and pays for both accounts
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        init,
        payer = owner,
        space = 8 + PoolConfig::INIT_SPACE,
        seeds = [CONFIG_SEED],
        bump
    )]
    pub config: Account<'info, PoolConfig>,

    #[account(
        init,
        payer = owner,
        space = TokenRegistry::space_for(0),
        seeds = [TOKEN_REGISTRY_SEED],
        bump
    )]
    pub token_registry: Box<Account<'info, TokenRegistry>>,

    pub system_program: Program<'info, System>,
}

pub fn handler_initialize_config(ctx: Context<InitializeConfig>) -> Result<()> {
    let config = &mut ctx.accounts.config;
    config.owner = ctx.accounts.owner.key();
    config.management_fee_percentage = 0;
    config.bump = ctx.bumps.config;

    let registry = &mut ctx.accounts.token_registry;
    registry.bump = ctx.bumps.token_registry;

    msg!("Flash pool config initialized");
    msg!("Owner: {}", config.owner);

    Ok(())
}
