// =============================================================================
// Admin Instructions
// =============================================================================
// Functions only the config owner can call:
// - set_management_fee: share of the LP fee diverted to the management pot
// - withdraw_management_fees: drain one pool's management pot
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::FlashPoolError;
use crate::events::{ManagementFeeChanged, ManagementFeeWithdrawn};
use crate::state::{LiquidityPool, PoolConfig};

// =============================================================================
// Set Management Fee
// =============================================================================

#[derive(Accounts)]
pub struct SetManagementFee<'info> {
    /// The config owner must sign
    #[account(
        constraint = owner.key() == config.owner @ FlashPoolError::OwnerOnly
    )]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, PoolConfig>,
}

/// # Arguments
/// * `percentage` - Share of the LP fee, 1/10000 units, at most MAX_MANAGEMENT_FEE_PERCENTAGE
pub fn handler_set_management_fee(ctx: Context<SetManagementFee>, percentage: u16) -> Result<()> {
    let config = &mut ctx.accounts.config;
    let old_percentage = config.management_fee_percentage;

    config.set_management_fee(percentage)?;

    msg!("Management fee: {} -> {}", old_percentage, percentage);

    emit!(ManagementFeeChanged {
        old_percentage,
        new_percentage: percentage,
    });

    Ok(())
}

// =============================================================================
// Withdraw Management Fees
// =============================================================================

#[derive(Accounts)]
pub struct WithdrawManagementFees<'info> {
    #[account(
        constraint = owner.key() == config.owner @ FlashPoolError::OwnerOnly
    )]
    pub owner: Signer<'info>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, PoolConfig>,

    #[account(
        mut,
        seeds = [POOL_SEED, pool.mint.as_ref()],
        bump = pool.bump
    )]
    pub pool: Box<Account<'info, LiquidityPool>>,

    #[account(
        mut,
        seeds = [VAULT_SEED, pool.key().as_ref()],
        bump = pool.vault_bump
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    /// Destination for the management pot
    #[account(
        mut,
        constraint = owner_token_account.mint == pool.mint @ FlashPoolError::MintMismatch
    )]
    pub owner_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler_withdraw_management_fees(ctx: Context<WithdrawManagementFees>) -> Result<()> {
    let pool_key = ctx.accounts.pool.key();
    let mint_key = ctx.accounts.pool.mint;

    let amount = ctx.accounts.pool.take_management_fees()?;

    let pool_seeds = &[POOL_SEED, mint_key.as_ref(), &[ctx.accounts.pool.bump]];
    let signer_seeds = &[&pool_seeds[..]];

    let transfer_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.vault.to_account_info(),
            to: ctx.accounts.owner_token_account.to_account_info(),
            authority: ctx.accounts.pool.to_account_info(),
        },
        signer_seeds,
    );
    token::transfer(transfer_ctx, amount)?;

    msg!("Withdrew {} management fees of {}", amount, mint_key);

    emit!(ManagementFeeWithdrawn {
        pool: pool_key,
        mint: mint_key,
        amount,
    });

    Ok(())
}
