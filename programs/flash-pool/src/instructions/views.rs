// =============================================================================
// View Instructions
// =============================================================================
// Read-only instructions answering through Anchor return data. Every other
// query is a field or accessor on the deserialized account.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::FlashPoolError;
use crate::ledger::{withdrawable_amount, WithdrawableAmount};
use crate::state::{LiquidityPool, Position};

#[derive(Accounts)]
pub struct GetWithdrawableAmount<'info> {
    #[account(
        seeds = [POOL_SEED, pool.mint.as_ref()],
        bump = pool.bump
    )]
    pub pool: Box<Account<'info, LiquidityPool>>,

    /// Absent for a wallet that holds no position
    pub position: Option<Account<'info, Position>>,
}

pub fn handler_get_withdrawable_amount(ctx: Context<GetWithdrawableAmount>) -> Result<WithdrawableAmount> {
    let Some(position) = &ctx.accounts.position else {
        return Ok(WithdrawableAmount::default());
    };
    require_keys_eq!(position.pool, ctx.accounts.pool.key(), FlashPoolError::InvalidPoolAccount);

    withdrawable_amount(&ctx.accounts.pool, position)
}

#[derive(Accounts)]
pub struct GetEffectiveLpFee<'info> {
    #[account(
        seeds = [POOL_SEED, pool.mint.as_ref()],
        bump = pool.bump
    )]
    pub pool: Box<Account<'info, LiquidityPool>>,
}

pub fn handler_get_effective_lp_fee(ctx: Context<GetEffectiveLpFee>) -> Result<u16> {
    Ok(ctx.accounts.pool.effective_lp_fee_bps())
}
