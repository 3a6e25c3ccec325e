// =============================================================================
// FeeCandidate State Account
// =============================================================================
// One account per (pool, LP fee value) that anyone has voted for or
// proposed. It carries the share-weighted tally for that fee and, while a
// change to it is pending, the slot from which it may be executed.
//
// A candidate that was never created has an implicit tally of zero; see
// `FeeCandidate::read_tally`.
// =============================================================================

use anchor_lang::prelude::*;

use crate::error::FlashPoolError;

/// Vote tally and pending proposal for one LP fee value of one pool.
///
/// PDA derived from ["fee_candidate", pool_pubkey, fee_bps.to_le_bytes()].
#[account]
#[derive(Default, InitSpace)]
pub struct FeeCandidate {
    /// The pool whose LP fee this candidate would set
    pub pool: Pubkey,

    /// Candidate LP fee in basis points
    pub fee_bps: u16,

    /// Sum of shares of all positions whose selection is this fee
    pub vote_tally: u64,

    /// First slot at which a proposal for this fee may execute.
    /// None when no proposal is pending.
    pub proposed_activation_slot: Option<u64>,

    /// Bump seed for this PDA
    pub bump: u8,
}

impl FeeCandidate {
    pub fn is_initialized(&self) -> bool {
        self.pool != Pubkey::default()
    }

    pub fn initialize(&mut self, pool: Pubkey, fee_bps: u16, bump: u8) {
        self.pool = pool;
        self.fee_bps = fee_bps;
        self.vote_tally = 0;
        self.proposed_activation_slot = None;
        self.bump = bump;
    }

    pub fn add_votes(&mut self, shares: u64) -> Result<()> {
        self.vote_tally = self
            .vote_tally
            .checked_add(shares)
            .ok_or(FlashPoolError::MathOverflow)?;
        Ok(())
    }

    pub fn remove_votes(&mut self, shares: u64) -> Result<()> {
        self.vote_tally = self
            .vote_tally
            .checked_sub(shares)
            .ok_or(FlashPoolError::MathUnderflow)?;
        Ok(())
    }

    pub fn has_proposal(&self) -> bool {
        self.proposed_activation_slot.is_some()
    }

    /// Tally stored in a candidate account that may not exist yet.
    ///
    /// The account must already have been checked against the candidate
    /// PDA; an empty (never created) account counts as zero votes.
    pub fn read_tally(info: &AccountInfo) -> Result<u64> {
        if info.data_is_empty() {
            return Ok(0);
        }
        let data = info.try_borrow_data()?;
        let candidate = FeeCandidate::try_deserialize(&mut &data[..])?;
        Ok(candidate.vote_tally)
    }
}
