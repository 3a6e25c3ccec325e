// =============================================================================
// Position State Account
// =============================================================================
// A depositor's claim on one pool. Shares are tracked here rather than in an
// SPL share mint so that every share movement can update the holder's vote
// weight in the same instruction.
// =============================================================================

use anchor_lang::prelude::*;

use crate::error::FlashPoolError;

/// One user's position in one pool.
///
/// PDA derived from ["position", pool_pubkey, owner_pubkey].
#[account]
#[derive(Default, InitSpace)]
pub struct Position {
    /// The pool this position belongs to
    pub pool: Pubkey,

    /// Wallet that deposited and may withdraw
    pub owner: Pubkey,

    /// Claim units on the pool's liquidity
    pub shares: u64,

    /// Net deposits (after entry fee) since the position was opened.
    /// Unaffected by fee accrual; withdraw_fees redeems only value above it.
    pub deposited_principal: u64,

    /// LP fee candidate this position's shares currently vote for
    pub selected_fee_vote: Option<u16>,

    /// Bump seed for this Position PDA
    pub bump: u8,
}

impl Position {
    pub fn is_initialized(&self) -> bool {
        self.owner != Pubkey::default()
    }

    pub fn initialize(&mut self, pool: Pubkey, owner: Pubkey, bump: u8) {
        self.pool = pool;
        self.owner = owner;
        self.shares = 0;
        self.deposited_principal = 0;
        self.selected_fee_vote = None;
        self.bump = bump;
    }

    pub fn has_shares(&self) -> bool {
        self.shares > 0
    }

    /// Add freshly minted shares and the net principal behind them
    pub fn record_deposit(&mut self, net_deposit: u64, shares: u64) -> Result<()> {
        self.shares = self
            .shares
            .checked_add(shares)
            .ok_or(FlashPoolError::MathOverflow)?;

        self.deposited_principal = self
            .deposited_principal
            .checked_add(net_deposit)
            .ok_or(FlashPoolError::MathOverflow)?;

        Ok(())
    }

    /// Burn shares without touching principal (fee-only redemption)
    pub fn burn_shares(&mut self, shares: u64) -> Result<()> {
        self.shares = self
            .shares
            .checked_sub(shares)
            .ok_or(FlashPoolError::MathUnderflow)?;
        Ok(())
    }

    /// Reset to an empty position; the vote selection goes with the shares
    pub fn clear(&mut self) {
        self.shares = 0;
        self.deposited_principal = 0;
        self.selected_fee_vote = None;
    }
}
