// =============================================================================
// Events
// =============================================================================
// Emitted with `emit!` at the end of each successful instruction.
// =============================================================================

use anchor_lang::prelude::*;

#[event]
pub struct Deposited {
    pub pool: Pubkey,
    pub mint: Pubkey,
    pub depositor: Pubkey,
    pub amount: u64,
    pub shares_minted: u64,
}

#[event]
pub struct Withdrawn {
    pub pool: Pubkey,
    pub mint: Pubkey,
    pub depositor: Pubkey,
    pub amount: u64,
    pub shares_burned: u64,
}

#[event]
pub struct FeesWithdrawn {
    pub pool: Pubkey,
    pub mint: Pubkey,
    pub depositor: Pubkey,
    pub amount: u64,
    pub shares_burned: u64,
}

#[event]
pub struct FlashLoanCompleted {
    pub pool: Pubkey,
    pub mint: Pubkey,
    pub receiver: Pubkey,
    pub amount: u64,
    pub lp_fee: u64,
    pub management_fee: u64,
}

#[event]
pub struct MultiFlashLoanCompleted {
    pub receiver: Pubkey,
    pub mints: Vec<Pubkey>,
    pub amounts: Vec<u64>,
    pub total_fees: Vec<u64>,
}

#[event]
pub struct ManagementFeeChanged {
    pub old_percentage: u16,
    pub new_percentage: u16,
}

#[event]
pub struct ManagementFeeWithdrawn {
    pub pool: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
}

#[event]
pub struct VoteCast {
    pub pool: Pubkey,
    pub voter: Pubkey,
    pub fee_bps: u16,
    pub weight: u64,
}

#[event]
pub struct FeeChangeProposed {
    pub pool: Pubkey,
    pub fee_bps: u16,
    pub activation_slot: u64,
}

#[event]
pub struct FeeChangeExecuted {
    pub pool: Pubkey,
    pub old_fee_bps: u16,
    pub new_fee_bps: u16,
}
