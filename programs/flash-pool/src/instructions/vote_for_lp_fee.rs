// =============================================================================
// Vote For LP Fee Instruction
// =============================================================================
// Points all of the caller's shares in a pool at one LP fee candidate.
//
// The candidate account for `fee_bps` is created on its first vote. When the
// caller already votes for a different fee, that candidate must be passed as
// `previous_candidate` so the shares can be taken off its tally.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::FlashPoolError;
use crate::events::VoteCast;
use crate::governance::{cast_vote, VoteOutcome};
use crate::state::{FeeCandidate, LiquidityPool, Position};

#[derive(Accounts)]
#[instruction(fee_bps: u16)]
pub struct VoteForLpFee<'info> {
    #[account(mut)]
    pub voter: Signer<'info>,

    #[account(
        seeds = [POOL_SEED, pool.mint.as_ref()],
        bump = pool.bump
    )]
    pub pool: Box<Account<'info, LiquidityPool>>,

    #[account(
        mut,
        seeds = [POSITION_SEED, pool.key().as_ref(), voter.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == voter.key() @ FlashPoolError::Unauthorized
    )]
    pub position: Box<Account<'info, Position>>,

    /// Candidate of the position's current vote, when switching fees
    #[account(mut)]
    pub previous_candidate: Option<Account<'info, FeeCandidate>>,

    #[account(
        init_if_needed,
        payer = voter,
        space = 8 + FeeCandidate::INIT_SPACE,
        seeds = [FEE_CANDIDATE_SEED, pool.key().as_ref(), &fee_bps.to_le_bytes()],
        bump
    )]
    pub candidate: Account<'info, FeeCandidate>,

    pub system_program: Program<'info, System>,
}

pub fn handler_vote_for_lp_fee(ctx: Context<VoteForLpFee>, fee_bps: u16) -> Result<()> {
    let pool_key = ctx.accounts.pool.key();

    if !ctx.accounts.candidate.is_initialized() {
        ctx.accounts
            .candidate
            .initialize(pool_key, fee_bps, ctx.bumps.candidate);
    }

    let accounts = &mut *ctx.accounts;
    let outcome = cast_vote(
        &mut accounts.position,
        accounts.previous_candidate.as_deref_mut(),
        &mut accounts.candidate,
        fee_bps,
    )?;

    match outcome {
        VoteOutcome::Unchanged => msg!("Already voting for {} bps", fee_bps),
        VoteOutcome::Moved { previous: Some(previous), weight } => {
            msg!("Moved {} shares from {} bps to {} bps", weight, previous, fee_bps)
        }
        VoteOutcome::Moved { previous: None, weight } => {
            msg!("Cast {} shares for {} bps", weight, fee_bps)
        }
    }

    emit!(VoteCast {
        pool: pool_key,
        voter: accounts.voter.key(),
        fee_bps,
        weight: accounts.position.shares,
    });

    msg!("Tally for {} bps: {}", fee_bps, accounts.candidate.vote_tally);

    Ok(())
}
