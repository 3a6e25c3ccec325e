// =============================================================================
// Liquidity Ledger
// =============================================================================
// State transitions behind deposit, withdraw and withdraw_fees, kept apart
// from the instruction handlers so they can run (and be tested) without a
// runtime. Handlers validate accounts, call into here, then move tokens.
//
// Every transition that changes a position's shares applies the same delta
// to the tally of the fee candidate the position votes for, and keeps the
// registries in step with zero <-> positive share transitions.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::FlashPoolError;
use crate::state::{FeeCandidate, LiquidityPool, Position, Redemption, TokenRegistry, UserTokenRegistry};

/// Mutable view of every account a ledger transition touches
pub struct LedgerAccounts<'a> {
    pub pool: &'a mut LiquidityPool,
    pub position: &'a mut Position,
    /// Candidate matching `position.selected_fee_vote`, if the position votes
    pub selected_candidate: Option<&'a mut FeeCandidate>,
    pub token_registry: &'a mut TokenRegistry,
    pub user_registry: &'a mut UserTokenRegistry,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepositOutcome {
    pub gross_amount: u64,
    pub net_deposit: u64,
    pub shares_minted: u64,
    /// The position went from zero to positive shares
    pub opened_position: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RedemptionOutcome {
    pub redemption: Redemption,
    /// The position went from positive to zero shares
    pub closed_position: bool,
}

/// Return value of the get_withdrawable_amount view
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WithdrawableAmount {
    pub net_amount: u64,
    pub gross_amount: u64,
    pub principal: u64,
    pub fees: u64,
    pub exit_fee: u64,
}

/// A mint of Pubkey::default() stands for "no token"
pub fn validate_token(mint: &Pubkey) -> Result<()> {
    require!(*mint != Pubkey::default(), FlashPoolError::InvalidToken);
    Ok(())
}

impl<'a> LedgerAccounts<'a> {
    /// Mint shares for a deposit of `amount` (gross, entry fee included)
    pub fn deposit(&mut self, amount: u64) -> Result<DepositOutcome> {
        validate_token(&self.pool.mint)?;
        require!(amount >= MINIMUM_DEPOSIT, FlashPoolError::DepositTooSmall);
        self.check_selected_candidate()?;

        let net_deposit = amount
            .checked_sub(ENTRY_EXIT_FEE)
            .ok_or(FlashPoolError::MathUnderflow)?;
        let shares_minted = self.pool.calculate_shares_to_mint(net_deposit)?;

        self.pool.record_deposit(amount, shares_minted)?;

        let opened_position = !self.position.has_shares();
        self.position.record_deposit(net_deposit, shares_minted)?;

        if let Some(candidate) = self.selected_candidate.as_deref_mut() {
            candidate.add_votes(shares_minted)?;
        }

        if opened_position {
            self.open_membership()?;
        }

        Ok(DepositOutcome {
            gross_amount: amount,
            net_deposit,
            shares_minted,
            opened_position,
        })
    }

    /// Redeem the whole position
    pub fn withdraw(&mut self) -> Result<RedemptionOutcome> {
        let shares = self.position.shares;
        require!(shares > 0, FlashPoolError::NothingToWithdraw);
        self.check_selected_candidate()?;

        let redemption = self
            .pool
            .price_redemption(shares)?
            .ok_or(FlashPoolError::WithdrawalTooSmall)?;

        self.pool.record_redemption(&redemption)?;

        if let Some(candidate) = self.selected_candidate.as_deref_mut() {
            candidate.remove_votes(shares)?;
        }

        self.position.clear();
        self.close_membership()?;

        Ok(RedemptionOutcome {
            redemption,
            closed_position: true,
        })
    }

    /// Redeem only the shares worth more than the recorded principal
    pub fn withdraw_fees(&mut self) -> Result<RedemptionOutcome> {
        let shares = self.position.shares;
        require!(shares > 0, FlashPoolError::NothingToWithdraw);
        self.check_selected_candidate()?;

        let shares_for_principal = self
            .pool
            .calculate_shares_for_amount(self.position.deposited_principal)?;

        let fee_shares = shares.saturating_sub(shares_for_principal);
        require!(fee_shares > 0, FlashPoolError::NothingToWithdraw);

        let redemption = self
            .pool
            .price_redemption(fee_shares)?
            .ok_or(FlashPoolError::FeesTooSmall)?;

        self.pool.record_redemption(&redemption)?;
        self.position.burn_shares(fee_shares)?;

        if let Some(candidate) = self.selected_candidate.as_deref_mut() {
            candidate.remove_votes(fee_shares)?;
        }

        let closed_position = !self.position.has_shares();
        if closed_position {
            self.position.clear();
            self.close_membership()?;
        }

        Ok(RedemptionOutcome {
            redemption,
            closed_position,
        })
    }

    /// The candidate passed in must be the one the position votes for.
    /// A candidate passed for a position without a vote is ignored.
    fn check_selected_candidate(&mut self) -> Result<()> {
        match self.position.selected_fee_vote {
            Some(fee_bps) => {
                let candidate = self
                    .selected_candidate
                    .as_deref()
                    .ok_or(FlashPoolError::CandidateMismatch)?;
                require!(
                    candidate.fee_bps == fee_bps && candidate.pool == self.position.pool,
                    FlashPoolError::CandidateMismatch
                );
            }
            None => self.selected_candidate = None,
        }
        Ok(())
    }

    fn open_membership(&mut self) -> Result<()> {
        self.pool.depositor_count = self
            .pool
            .depositor_count
            .checked_add(1)
            .ok_or(FlashPoolError::MathOverflow)?;

        self.user_registry.register(self.pool.mint);
        if self.pool.depositor_count == 1 {
            self.token_registry.register(self.pool.mint);
        }
        Ok(())
    }

    fn close_membership(&mut self) -> Result<()> {
        self.pool.depositor_count = self
            .pool
            .depositor_count
            .checked_sub(1)
            .ok_or(FlashPoolError::MathUnderflow)?;

        self.user_registry.unregister(&self.pool.mint);
        if self.pool.depositor_count == 0 {
            self.token_registry.unregister(&self.pool.mint);
        }
        Ok(())
    }
}

/// What `position` could withdraw right now
pub fn withdrawable_amount(pool: &LiquidityPool, position: &Position) -> Result<WithdrawableAmount> {
    if !position.has_shares() {
        return Ok(WithdrawableAmount::default());
    }

    let gross_amount = pool.calculate_share_value(position.shares)?;
    let principal = position.deposited_principal;

    Ok(WithdrawableAmount {
        net_amount: gross_amount.saturating_sub(ENTRY_EXIT_FEE),
        gross_amount,
        principal,
        fees: gross_amount.saturating_sub(principal),
        exit_fee: ENTRY_EXIT_FEE,
    })
}
