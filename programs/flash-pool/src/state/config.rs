// =============================================================================
// PoolConfig State Account
// =============================================================================
// Program-wide settings, one PDA per deployment:
// - owner: the only signer allowed to change the management fee and drain
//   management pots
// - management_fee_percentage: share of each LP fee charged on top of it
//   for the management pot, in 1/10000 units
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::MAX_MANAGEMENT_FEE_PERCENTAGE;
use crate::error::FlashPoolError;

/// Program-wide configuration and the single owner gate.
/// PDA: ["config"]
#[account]
#[derive(Default, InitSpace)]
pub struct PoolConfig {
    /// May change the management fee and withdraw management pots
    pub owner: Pubkey,

    /// Share of the LP fee diverted to the management pot, 1/10000 units
    pub management_fee_percentage: u16,

    /// PDA bump seed
    pub bump: u8,
}

impl PoolConfig {
    pub fn set_management_fee(&mut self, percentage: u16) -> Result<()> {
        require!(
            percentage <= MAX_MANAGEMENT_FEE_PERCENTAGE,
            FlashPoolError::FeeOutOfRange
        );
        self.management_fee_percentage = percentage;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_management_fee_bounds() {
        let mut config = PoolConfig::default();
        config.set_management_fee(MAX_MANAGEMENT_FEE_PERCENTAGE).unwrap();
        assert_eq!(config.management_fee_percentage, MAX_MANAGEMENT_FEE_PERCENTAGE);

        assert_eq!(
            config.set_management_fee(MAX_MANAGEMENT_FEE_PERCENTAGE + 1).unwrap_err(),
            FlashPoolError::FeeOutOfRange.into()
        );
        assert_eq!(config.management_fee_percentage, MAX_MANAGEMENT_FEE_PERCENTAGE);
    }
}
