// =============================================================================
// LiquidityPool State Account
// =============================================================================
// One LiquidityPool per SPL mint. It is the ground truth for share
// accounting: how many shares exist, how much token value backs them, how
// much of the vault belongs to the management pot, and which LP fee governs
// flash loans against it.
//
// The pool is created lazily by the first deposit for a mint. At creation it
// mints VIRTUAL_SHARES backed by VIRTUAL_SHARES of virtual liquidity; those
// shares belong to no position and can never be redeemed.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::FlashPoolError;
use crate::fee_math::FeeQuote;

/// Per-token pool state.
///
/// PDA derived from ["pool", mint_pubkey].
#[account]
#[derive(Default, InitSpace)]
pub struct LiquidityPool {
    // =========================================================================
    // Identification
    // =========================================================================

    /// The SPL mint this pool lends
    pub mint: Pubkey,

    /// The PDA-owned token account holding liquidity and the management pot
    pub vault: Pubkey,

    // =========================================================================
    // Share Accounting (token base units)
    // =========================================================================

    /// All outstanding shares, including the VIRTUAL_SHARES baseline
    pub total_shares: u64,

    /// Token value backing total_shares (starts at VIRTUAL_SHARES)
    pub total_liquidity: u64,

    /// Management fees owed to the config owner; held in the vault but not
    /// part of total_liquidity
    pub collected_management_fees: u64,

    /// Number of positions holding a positive share balance.
    /// Drives membership in the global token registry.
    pub depositor_count: u32,

    // =========================================================================
    // Governance
    // =========================================================================

    /// LP fee set by governance. None means DEFAULT_LP_FEE_BPS applies;
    /// Some(0) is a real zero-fee setting.
    pub active_lp_fee_bps: Option<u16>,

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Completed flash loans against this pool (single and batched)
    pub total_flash_loans: u64,

    /// Cumulative LP fees added to total_liquidity
    pub total_lp_fees_earned: u64,

    // =========================================================================
    // PDA Bumps
    // =========================================================================

    pub bump: u8,
    pub vault_bump: u8,
}

/// Result of pricing a redemption of `shares` at the current share price.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Redemption {
    pub shares: u64,
    /// Token value of the shares before the exit fee
    pub gross_amount: u64,
    /// What the holder receives (gross - ENTRY_EXIT_FEE)
    pub net_amount: u64,
}

impl LiquidityPool {
    /// Whether the account has been through `initialize` yet.
    /// init_if_needed leaves a zeroed account on first deposit.
    pub fn is_initialized(&self) -> bool {
        self.mint != Pubkey::default()
    }

    /// Set up a freshly created pool with its virtual baseline.
    pub fn initialize(&mut self, mint: Pubkey, vault: Pubkey, bump: u8, vault_bump: u8) {
        self.mint = mint;
        self.vault = vault;
        self.total_shares = VIRTUAL_SHARES;
        self.total_liquidity = VIRTUAL_SHARES;
        self.collected_management_fees = 0;
        self.depositor_count = 0;
        self.active_lp_fee_bps = None;
        self.total_flash_loans = 0;
        self.total_lp_fees_earned = 0;
        self.bump = bump;
        self.vault_bump = vault_bump;
    }

    /// LP fee applied to flash loans right now
    pub fn effective_lp_fee_bps(&self) -> u16 {
        self.active_lp_fee_bps.unwrap_or(DEFAULT_LP_FEE_BPS)
    }

    /// Shares held by real depositors
    pub fn depositor_shares(&self) -> u64 {
        self.total_shares.saturating_sub(VIRTUAL_SHARES)
    }

    /// Calculate how many shares a net deposit mints at the current price
    ///
    /// Formula: shares = net_deposit * total_shares / total_liquidity,
    /// floored at MIN_SHARES_MINTED so a dust deposit is never swallowed.
    pub fn calculate_shares_to_mint(&self, net_deposit: u64) -> Result<u64> {
        let shares = mul_div(net_deposit, self.total_shares, self.total_liquidity)?;
        Ok(shares.max(MIN_SHARES_MINTED))
    }

    /// Token value of `shares` at the current price (before exit fee)
    ///
    /// Formula: amount = shares * total_liquidity / total_shares
    pub fn calculate_share_value(&self, shares: u64) -> Result<u64> {
        mul_div(shares, self.total_liquidity, self.total_shares)
    }

    /// Shares that represent exactly `amount` tokens at the current price
    pub fn calculate_shares_for_amount(&self, amount: u64) -> Result<u64> {
        mul_div(amount, self.total_shares, self.total_liquidity)
    }

    /// Price a redemption of `shares`. The exit fee is deducted from the
    /// gross value; a non-positive result is reported as None.
    pub fn price_redemption(&self, shares: u64) -> Result<Option<Redemption>> {
        let gross_amount = self.calculate_share_value(shares)?;
        if gross_amount <= ENTRY_EXIT_FEE {
            return Ok(None);
        }
        Ok(Some(Redemption {
            shares,
            gross_amount,
            net_amount: gross_amount - ENTRY_EXIT_FEE,
        }))
    }

    /// Record a deposit of `gross_amount` that minted `shares`.
    /// The whole gross amount backs the pool; the entry fee is socialized.
    pub fn record_deposit(&mut self, gross_amount: u64, shares: u64) -> Result<()> {
        self.total_liquidity = self
            .total_liquidity
            .checked_add(gross_amount)
            .ok_or(FlashPoolError::MathOverflow)?;

        self.total_shares = self
            .total_shares
            .checked_add(shares)
            .ok_or(FlashPoolError::MathOverflow)?;

        Ok(())
    }

    /// Record a redemption. Only the gross value leaves total_liquidity;
    /// the exit fee stays behind in the vault.
    pub fn record_redemption(&mut self, redemption: &Redemption) -> Result<()> {
        self.total_shares = self
            .total_shares
            .checked_sub(redemption.shares)
            .ok_or(FlashPoolError::MathUnderflow)?;

        self.total_liquidity = self
            .total_liquidity
            .checked_sub(redemption.gross_amount)
            .ok_or(FlashPoolError::MathUnderflow)?;

        Ok(())
    }

    /// Post the fees of a repaid flash loan
    pub fn record_flash_loan(&mut self, quote: &FeeQuote) -> Result<()> {
        self.total_liquidity = self
            .total_liquidity
            .checked_add(quote.lp_fee)
            .ok_or(FlashPoolError::MathOverflow)?;

        self.collected_management_fees = self
            .collected_management_fees
            .checked_add(quote.management_fee)
            .ok_or(FlashPoolError::MathOverflow)?;

        self.total_lp_fees_earned = self
            .total_lp_fees_earned
            .checked_add(quote.lp_fee)
            .ok_or(FlashPoolError::MathOverflow)?;

        self.total_flash_loans = self
            .total_flash_loans
            .checked_add(1)
            .ok_or(FlashPoolError::MathOverflow)?;

        Ok(())
    }

    /// Ensure a loan of `amount` fits in the pool
    pub fn check_liquidity(&self, amount: u64) -> Result<()> {
        require!(amount <= self.total_liquidity, FlashPoolError::NotEnoughLiquidity);
        Ok(())
    }

    /// Take the whole management pot, returning the amount owed
    pub fn take_management_fees(&mut self) -> Result<u64> {
        let amount = self.collected_management_fees;
        require!(amount > 0, FlashPoolError::NothingToWithdraw);
        self.collected_management_fees = 0;
        Ok(amount)
    }
}

/// a * b / c in u128 with checked math, result narrowed back to u64
fn mul_div(a: u64, b: u64, c: u64) -> Result<u64> {
    let value = (a as u128)
        .checked_mul(b as u128)
        .ok_or(FlashPoolError::MathOverflow)?
        .checked_div(c as u128)
        .ok_or(FlashPoolError::DivisionByZero)?;

    u64::try_from(value).map_err(|_| error!(FlashPoolError::MathOverflow))
}
