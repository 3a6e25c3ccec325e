// =============================================================================
// Execute LP Fee Change Instruction
// =============================================================================
// Activates a matured proposal. Support is checked again against the tally
// of the fee in force right now; if the lead is gone the instruction fails
// and the proposal stays for a later retry.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::events::FeeChangeExecuted;
use crate::governance::{execute_fee_change, tally_of_fee_in_force};
use crate::state::{FeeCandidate, LiquidityPool};

#[derive(Accounts)]
#[instruction(fee_bps: u16)]
pub struct ExecuteLpFeeChange<'info> {
    #[account(mut)]
    pub executor: Signer<'info>,

    #[account(
        mut,
        seeds = [POOL_SEED, pool.mint.as_ref()],
        bump = pool.bump
    )]
    pub pool: Box<Account<'info, LiquidityPool>>,

    /// Created empty if missing, so an unknown fee reports NoProposalExists
    #[account(
        init_if_needed,
        payer = executor,
        space = 8 + FeeCandidate::INIT_SPACE,
        seeds = [FEE_CANDIDATE_SEED, pool.key().as_ref(), &fee_bps.to_le_bytes()],
        bump
    )]
    pub candidate: Account<'info, FeeCandidate>,

    /// CHECK: Address pinned by seeds; read through FeeCandidate::read_tally
    #[account(
        seeds = [FEE_CANDIDATE_SEED, pool.key().as_ref(), &pool.effective_lp_fee_bps().to_le_bytes()],
        bump
    )]
    pub current_candidate: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler_execute_lp_fee_change(ctx: Context<ExecuteLpFeeChange>, fee_bps: u16) -> Result<()> {
    let pool_key = ctx.accounts.pool.key();

    if !ctx.accounts.candidate.is_initialized() {
        ctx.accounts
            .candidate
            .initialize(pool_key, fee_bps, ctx.bumps.candidate);
    }

    let current_tally = tally_of_fee_in_force(
        &ctx.accounts.pool,
        &ctx.accounts.candidate,
        &ctx.accounts.current_candidate.to_account_info(),
    )?;
    let slot = Clock::get()?.slot;

    let accounts = &mut *ctx.accounts;
    let old_fee_bps = execute_fee_change(
        &mut accounts.pool,
        &pool_key,
        &mut accounts.candidate,
        fee_bps,
        current_tally,
        slot,
    )?;

    msg!("LP fee changed: {} bps -> {} bps", old_fee_bps, fee_bps);

    emit!(FeeChangeExecuted {
        pool: pool_key,
        old_fee_bps,
        new_fee_bps: fee_bps,
    });

    Ok(())
}
