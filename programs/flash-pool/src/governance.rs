// =============================================================================
// LP Fee Governance
// =============================================================================
// Depositors steer each pool's LP fee with their shares:
//
//   vote     -> moves the voter's shares onto one FeeCandidate tally
//   propose  -> a candidate strictly out-voting the current fee gets an
//               activation slot PROPOSAL_DELAY_SLOTS + 1 slots out
//   execute  -> after the delay, and only if the lead still holds, the
//               candidate becomes the pool's fee
//
// A failed re-validation leaves the proposal in place so it can be retried
// once support returns.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::FlashPoolError;
use crate::ledger::validate_token;
use crate::state::{FeeCandidate, LiquidityPool, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The position already voted for this fee; tallies untouched
    Unchanged,
    /// Shares moved onto the candidate, from `previous` if there was one
    Moved { previous: Option<u16>, weight: u64 },
}

fn check_candidate(candidate: &FeeCandidate, pool: &Pubkey, fee_bps: u16) -> Result<()> {
    require!(
        candidate.pool == *pool && candidate.fee_bps == fee_bps,
        FlashPoolError::CandidateMismatch
    );
    Ok(())
}

/// Point all of `position`'s shares at `fee_bps`.
///
/// `previous` must be the candidate of the position's current selection when
/// it differs from `fee_bps`; it is ignored otherwise.
pub fn cast_vote(
    position: &mut Position,
    previous: Option<&mut FeeCandidate>,
    next: &mut FeeCandidate,
    fee_bps: u16,
) -> Result<VoteOutcome> {
    require!(fee_bps <= MAX_LP_FEE_BPS, FlashPoolError::FeeAmountTooHigh);
    require!(position.has_shares(), FlashPoolError::NoSharesToVote);
    check_candidate(next, &position.pool, fee_bps)?;

    let weight = position.shares;
    let selected = position.selected_fee_vote;

    match selected {
        Some(current) if current == fee_bps => return Ok(VoteOutcome::Unchanged),
        Some(current) => {
            let previous = previous.ok_or(FlashPoolError::CandidateMismatch)?;
            check_candidate(previous, &position.pool, current)?;
            previous.remove_votes(weight)?;
        }
        None => {}
    }

    next.add_votes(weight)?;
    position.selected_fee_vote = Some(fee_bps);

    Ok(VoteOutcome::Moved { previous: selected, weight })
}

/// Tally of the fee in force for `pool`.
///
/// `current` is the candidate account of that fee. When `candidate` is for
/// the same fee it is the same account, possibly created by this very
/// instruction and not yet written back, so its in-memory tally is used.
pub fn tally_of_fee_in_force(
    pool: &LiquidityPool,
    candidate: &FeeCandidate,
    current: &AccountInfo,
) -> Result<u64> {
    if candidate.fee_bps == pool.effective_lp_fee_bps() {
        return Ok(candidate.vote_tally);
    }
    FeeCandidate::read_tally(current)
}

/// Open (or restart) a proposal for `candidate`. Returns the activation slot.
///
/// `current_tally` is the tally of the pool's effective fee.
pub fn propose_fee_change(
    pool: &LiquidityPool,
    pool_key: &Pubkey,
    candidate: &mut FeeCandidate,
    fee_bps: u16,
    current_tally: u64,
    slot: u64,
) -> Result<u64> {
    validate_token(&pool.mint)?;
    require!(fee_bps <= MAX_LP_FEE_BPS, FlashPoolError::FeeTooHigh);
    require!(fee_bps != pool.effective_lp_fee_bps(), FlashPoolError::FeeAlreadySet);
    check_candidate(candidate, pool_key, fee_bps)?;
    require!(
        candidate.vote_tally > current_tally,
        FlashPoolError::InsufficientSupport
    );

    let activation_slot = slot
        .checked_add(PROPOSAL_DELAY_SLOTS)
        .and_then(|s| s.checked_add(1))
        .ok_or(FlashPoolError::MathOverflow)?;

    candidate.proposed_activation_slot = Some(activation_slot);
    Ok(activation_slot)
}

/// Activate a matured proposal whose candidate still strictly leads.
/// Returns the fee that was replaced.
pub fn execute_fee_change(
    pool: &mut LiquidityPool,
    pool_key: &Pubkey,
    candidate: &mut FeeCandidate,
    fee_bps: u16,
    current_tally: u64,
    slot: u64,
) -> Result<u16> {
    check_candidate(candidate, pool_key, fee_bps)?;

    let activation_slot = candidate
        .proposed_activation_slot
        .ok_or(FlashPoolError::NoProposalExists)?;
    require!(slot >= activation_slot, FlashPoolError::ProposalDelayNotMet);
    require!(candidate.vote_tally > current_tally, FlashPoolError::SupportLost);

    let old_fee_bps = pool.effective_lp_fee_bps();
    pool.active_lp_fee_bps = Some(fee_bps);
    candidate.proposed_activation_slot = None;

    Ok(old_fee_bps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_key() -> Pubkey {
        Pubkey::new_from_array([5; 32])
    }

    fn pool() -> LiquidityPool {
        let mut pool = LiquidityPool::default();
        pool.initialize(Pubkey::new_from_array([1; 32]), Pubkey::new_from_array([2; 32]), 255, 255);
        pool
    }

    fn position(shares: u64) -> Position {
        let mut position = Position::default();
        position.initialize(pool_key(), Pubkey::new_from_array([3; 32]), 255);
        position.shares = shares;
        position
    }

    fn candidate(fee_bps: u16) -> FeeCandidate {
        let mut candidate = FeeCandidate::default();
        candidate.initialize(pool_key(), fee_bps, 255);
        candidate
    }

    #[test]
    fn test_vote_moves_weight() {
        let mut voter = position(700);
        let mut fifty = candidate(50);
        let mut twenty_five = candidate(25);

        let outcome = cast_vote(&mut voter, None, &mut fifty, 50).unwrap();
        assert_eq!(outcome, VoteOutcome::Moved { previous: None, weight: 700 });
        assert_eq!(fifty.vote_tally, 700);

        cast_vote(&mut voter, Some(&mut fifty), &mut twenty_five, 25).unwrap();
        assert_eq!(fifty.vote_tally, 0);
        assert_eq!(twenty_five.vote_tally, 700);
        assert_eq!(voter.selected_fee_vote, Some(25));
    }

    #[test]
    fn test_revote_same_fee_is_noop() {
        let mut voter = position(700);
        let mut fifty = candidate(50);
        cast_vote(&mut voter, None, &mut fifty, 50).unwrap();
        assert_eq!(cast_vote(&mut voter, None, &mut fifty, 50).unwrap(), VoteOutcome::Unchanged);
        assert_eq!(fifty.vote_tally, 700);
    }

    #[test]
    fn test_vote_guards() {
        let mut voter = position(700);
        let mut too_high = candidate(MAX_LP_FEE_BPS + 1);
        assert_eq!(
            cast_vote(&mut voter, None, &mut too_high, MAX_LP_FEE_BPS + 1).unwrap_err(),
            FlashPoolError::FeeAmountTooHigh.into()
        );

        let mut empty = position(0);
        let mut fifty = candidate(50);
        assert_eq!(
            cast_vote(&mut empty, None, &mut fifty, 50).unwrap_err(),
            FlashPoolError::NoSharesToVote.into()
        );

        let mut wrong = candidate(40);
        assert_eq!(
            cast_vote(&mut voter, None, &mut wrong, 50).unwrap_err(),
            FlashPoolError::CandidateMismatch.into()
        );
    }

    #[test]
    fn test_zero_fee_is_a_valid_vote() {
        let mut voter = position(10);
        let mut zero = candidate(0);
        cast_vote(&mut voter, None, &mut zero, 0).unwrap();
        assert_eq!(voter.selected_fee_vote, Some(0));
        assert_eq!(zero.vote_tally, 10);
    }

    #[test]
    fn test_propose_requires_strict_lead() {
        let pool = pool();
        let mut fifty = candidate(50);
        fifty.vote_tally = 500;

        assert_eq!(
            propose_fee_change(&pool, &pool_key(), &mut fifty, 50, 500, 100).unwrap_err(),
            FlashPoolError::InsufficientSupport.into()
        );
        let activation = propose_fee_change(&pool, &pool_key(), &mut fifty, 50, 499, 100).unwrap();
        assert_eq!(activation, 100 + PROPOSAL_DELAY_SLOTS + 1);
        assert_eq!(fifty.proposed_activation_slot, Some(activation));
    }

    #[test]
    fn test_propose_guards() {
        let pool = pool();
        let mut current = candidate(DEFAULT_LP_FEE_BPS);
        current.vote_tally = 1;
        assert_eq!(
            propose_fee_change(&pool, &pool_key(), &mut current, DEFAULT_LP_FEE_BPS, 0, 1).unwrap_err(),
            FlashPoolError::FeeAlreadySet.into()
        );

        let mut high = candidate(MAX_LP_FEE_BPS + 1);
        high.vote_tally = 1;
        assert_eq!(
            propose_fee_change(&pool, &pool_key(), &mut high, MAX_LP_FEE_BPS + 1, 0, 1).unwrap_err(),
            FlashPoolError::FeeTooHigh.into()
        );

        let unset = LiquidityPool::default();
        let mut fifty = candidate(50);
        assert_eq!(
            propose_fee_change(&unset, &pool_key(), &mut fifty, 50, 0, 1).unwrap_err(),
            FlashPoolError::InvalidToken.into()
        );
    }

    #[test]
    fn test_reproposal_restarts_delay() {
        let pool = pool();
        let mut fifty = candidate(50);
        fifty.vote_tally = 10;
        propose_fee_change(&pool, &pool_key(), &mut fifty, 50, 0, 100).unwrap();
        propose_fee_change(&pool, &pool_key(), &mut fifty, 50, 0, 105).unwrap();
        assert_eq!(fifty.proposed_activation_slot, Some(105 + PROPOSAL_DELAY_SLOTS + 1));
    }

    #[test]
    fn test_execute_after_delay() {
        let mut pool = pool();
        let mut fifty = candidate(50);
        fifty.vote_tally = 10;

        assert_eq!(
            execute_fee_change(&mut pool, &pool_key(), &mut fifty, 50, 0, 1).unwrap_err(),
            FlashPoolError::NoProposalExists.into()
        );

        let activation = propose_fee_change(&pool, &pool_key(), &mut fifty, 50, 0, 100).unwrap();
        assert_eq!(
            execute_fee_change(&mut pool, &pool_key(), &mut fifty, 50, 0, activation - 1).unwrap_err(),
            FlashPoolError::ProposalDelayNotMet.into()
        );

        let old = execute_fee_change(&mut pool, &pool_key(), &mut fifty, 50, 0, activation).unwrap();
        assert_eq!(old, DEFAULT_LP_FEE_BPS);
        assert_eq!(pool.effective_lp_fee_bps(), 50);
        assert!(!fifty.has_proposal());
    }

    /// Candidate account created in the current instruction: right size, no
    /// discriminator yet.
    fn fresh_candidate_data() -> Vec<u8> {
        vec![0u8; 8 + FeeCandidate::INIT_SPACE]
    }

    #[test]
    fn test_current_fee_candidate_created_in_same_instruction() {
        let mut pool = pool();
        let mut current = candidate(DEFAULT_LP_FEE_BPS);

        let key = Pubkey::new_from_array([6; 32]);
        let owner = crate::ID;
        let mut lamports = 1u64;
        let mut data = fresh_candidate_data();
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &owner, false, 0);
        assert!(FeeCandidate::read_tally(&info).is_err());

        let tally = tally_of_fee_in_force(&pool, &current, &info).unwrap();
        assert_eq!(tally, 0);
        assert_eq!(
            propose_fee_change(&pool, &pool_key(), &mut current, DEFAULT_LP_FEE_BPS, tally, 1).unwrap_err(),
            FlashPoolError::FeeAlreadySet.into()
        );
        assert_eq!(
            execute_fee_change(&mut pool, &pool_key(), &mut current, DEFAULT_LP_FEE_BPS, tally, 1).unwrap_err(),
            FlashPoolError::NoProposalExists.into()
        );
    }

    #[test]
    fn test_tally_of_fee_in_force_reads_other_candidate() {
        let pool = pool();
        let mut current = candidate(DEFAULT_LP_FEE_BPS);
        current.vote_tally = 321;
        let mut data = Vec::new();
        current.try_serialize(&mut data).unwrap();

        let key = Pubkey::new_from_array([6; 32]);
        let owner = crate::ID;
        let mut lamports = 1u64;
        let info = AccountInfo::new(&key, false, false, &mut lamports, &mut data, &owner, false, 0);

        let fifty = candidate(50);
        assert_eq!(tally_of_fee_in_force(&pool, &fifty, &info).unwrap(), 321);
    }

    #[test]
    fn test_lost_support_keeps_proposal() {
        let mut pool = pool();
        let mut fifty = candidate(50);
        fifty.vote_tally = 10;
        let activation = propose_fee_change(&pool, &pool_key(), &mut fifty, 50, 5, 100).unwrap();

        assert_eq!(
            execute_fee_change(&mut pool, &pool_key(), &mut fifty, 50, 10, activation).unwrap_err(),
            FlashPoolError::SupportLost.into()
        );
        assert_eq!(fifty.proposed_activation_slot, Some(activation));
        assert_eq!(pool.active_lp_fee_bps, None);

        // support comes back, the same proposal goes through
        execute_fee_change(&mut pool, &pool_key(), &mut fifty, 50, 9, activation + 50).unwrap();
        assert_eq!(pool.active_lp_fee_bps, Some(50));
    }
}
