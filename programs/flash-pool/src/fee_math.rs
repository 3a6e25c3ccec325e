use anchor_lang::prelude::*;

use crate::{constants::*, error::FlashPoolError};

/// Fee split for one flash-loaned amount, shared by `flash_loan` and
/// `flash_loan_multiple`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeQuote {
    /// Stays in the pool and raises the share price.
    pub lp_fee: u64,
    /// Credited to the pool's management pot (owner-withdrawable).
    pub management_fee: u64,
    /// What the borrower must return on top of principal.
    pub total_fee: u64,
}

/// Compute the LP fee, the management fee and their sum.
///
/// * `amount`                    – principal being borrowed
/// * `lp_fee_bps`                – effective LP fee rate of the pool
/// * `management_fee_percentage` – management share of the LP fee, 1/10000 units
///
/// The management fee is `amount * bps * pct / 10_000²` in a single
/// multiply-then-divide, not a percentage of the rounded LP fee.
/// Tiny loans may quote a zero fee.
pub fn quote_flash_loan_fee(
    amount: u64,
    lp_fee_bps: u16,
    management_fee_percentage: u16,
) -> Result<FeeQuote> {
    let amount = amount as u128;
    let bps = lp_fee_bps as u128;

    let lp_fee = amount
        .checked_mul(bps)
        .ok_or(FlashPoolError::MathOverflow)?
        / BPS_DENOMINATOR;

    let management_fee = amount
        .checked_mul(bps)
        .ok_or(FlashPoolError::MathOverflow)?
        .checked_mul(management_fee_percentage as u128)
        .ok_or(FlashPoolError::MathOverflow)?
        / (BPS_DENOMINATOR * BPS_DENOMINATOR);

    let total_fee = lp_fee
        .checked_add(management_fee)
        .ok_or(FlashPoolError::MathOverflow)?;

    Ok(FeeQuote {
        lp_fee: u64::try_from(lp_fee).map_err(|_| FlashPoolError::MathOverflow)?,
        management_fee: u64::try_from(management_fee).map_err(|_| FlashPoolError::MathOverflow)?,
        total_fee: u64::try_from(total_fee).map_err(|_| FlashPoolError::MathOverflow)?,
    })
}
