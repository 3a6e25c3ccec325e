// =============================================================================
// Propose LP Fee Change Instruction
// =============================================================================
// Opens a proposal to move a pool to `fee_bps`. The candidate's tally must
// strictly exceed the tally of the pool's effective fee. The proposal can be
// executed from `slot + PROPOSAL_DELAY_SLOTS + 1`; proposing again restarts
// the delay.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::events::FeeChangeProposed;
use crate::governance::{propose_fee_change, tally_of_fee_in_force};
use crate::state::{FeeCandidate, LiquidityPool};

#[derive(Accounts)]
#[instruction(fee_bps: u16)]
pub struct ProposeLpFeeChange<'info> {
    #[account(mut)]
    pub proposer: Signer<'info>,

    #[account(
        seeds = [POOL_SEED, pool.mint.as_ref()],
        bump = pool.bump
    )]
    pub pool: Box<Account<'info, LiquidityPool>>,

    /// Candidate being proposed. Created empty if nobody voted for it yet,
    /// in which case the proposal fails for lack of support.
    #[account(
        init_if_needed,
        payer = proposer,
        space = 8 + FeeCandidate::INIT_SPACE,
        seeds = [FEE_CANDIDATE_SEED, pool.key().as_ref(), &fee_bps.to_le_bytes()],
        bump
    )]
    pub candidate: Account<'info, FeeCandidate>,

    /// Candidate of the pool's effective fee; may not exist (zero votes)
    /// CHECK: Address pinned by seeds; read through FeeCandidate::read_tally
    #[account(
        seeds = [FEE_CANDIDATE_SEED, pool.key().as_ref(), &pool.effective_lp_fee_bps().to_le_bytes()],
        bump
    )]
    pub current_candidate: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler_propose_lp_fee_change(ctx: Context<ProposeLpFeeChange>, fee_bps: u16) -> Result<()> {
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

    let activation_slot = propose_fee_change(
        &ctx.accounts.pool,
        &pool_key,
        &mut ctx.accounts.candidate,
        fee_bps,
        current_tally,
        slot,
    )?;

    msg!(
        "Proposed LP fee {} bps (tally {} vs {}), executable from slot {}",
        fee_bps,
        ctx.accounts.candidate.vote_tally,
        current_tally,
        activation_slot
    );

    emit!(FeeChangeProposed {
        pool: pool_key,
        fee_bps,
        activation_slot,
    });

    Ok(())
}
