// =============================================================================
// Flash Pool - Multi-Token Flash Loan Liquidity Pool
// =============================================================================
//
// Depositors pool SPL tokens per mint and receive shares; borrowers take
// same-transaction flash loans against that liquidity and repay principal
// plus a fee:
// - LP fee (default 1 bps) stays in the pool and raises the share price
// - Management fee (a share of the LP fee) accrues to the config owner
// - Depositors vote on each pool's LP fee with their shares
//
// This is the main entry point for the Flash Pool Anchor program.
// =============================================================================

pub mod constants;
pub mod error;
pub mod events;
pub mod fee_math;
pub mod governance;
pub mod instructions;
pub mod ledger;
pub mod receiver;
pub mod state;

use anchor_lang::prelude::*;

pub use constants::*;
pub use error::*;
pub use events::*;
pub use instructions::*;
pub use ledger::WithdrawableAmount;
pub use state::*;

declare_id!("FPoo1Ln7ds9xKZ3gQhCwWJ8vT4eYbR2mNaUc6pHs5Ek");

/// The Flash Pool program module
#[program]
pub mod flash_pool {
    use super::*;

    // =========================================================================
    // Setup
    // =========================================================================

    /// Create the program config (signer becomes owner) and the global
    /// token registry. Can only be called once.
    pub fn initialize_config(ctx: Context<InitializeConfig>) -> Result<()> {
        instructions::initialize_config::handler_initialize_config(ctx)
    }

    // =========================================================================
    // Liquidity
    // =========================================================================

    /// Deposit tokens and receive shares
    ///
    /// # Arguments
    /// * `amount` - Gross amount, at least MINIMUM_DEPOSIT; ENTRY_EXIT_FEE is
    ///   kept by the pool
    ///
    /// Creates the pool and vault on the first deposit for a mint.
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit::handler_deposit(ctx, amount)
    }

    /// Redeem the caller's whole position, minus ENTRY_EXIT_FEE
    pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
        instructions::withdraw::handler_withdraw(ctx)
    }

    /// Redeem only the value accrued above the caller's principal
    pub fn withdraw_fees(ctx: Context<WithdrawFees>) -> Result<()> {
        instructions::withdraw_fees::handler_withdraw_fees(ctx)
    }

    // =========================================================================
    // Flash Loans
    // =========================================================================

    /// Lend `amount` to a receiver program for one execute_operation CPI
    ///
    /// # Arguments
    /// * `amount` - Principal, at most the pool's total liquidity
    /// * `data` - Passed through to the receiver
    ///
    /// # Fees
    /// * `amount * lp_fee_bps / 10000` to the pool
    /// * `amount * lp_fee_bps * management_pct / 10000²` to the management pot
    pub fn flash_loan<'info>(
        ctx: Context<'_, '_, '_, 'info, FlashLoan<'info>>,
        amount: u64,
        data: Vec<u8>,
    ) -> Result<()> {
        instructions::flash_loan::handler_flash_loan(ctx, amount, data)
    }

    /// Lend several tokens through one execute_operation_batch CPI
    ///
    /// Pool, vault and receiver token account of every mint are passed as
    /// remaining accounts, three per mint in the order of `tokens`.
    pub fn flash_loan_multiple<'info>(
        ctx: Context<'_, '_, 'info, 'info, FlashLoanMultiple<'info>>,
        tokens: Vec<Pubkey>,
        amounts: Vec<u64>,
        data: Vec<u8>,
    ) -> Result<()> {
        instructions::flash_loan_multiple::handler_flash_loan_multiple(ctx, tokens, amounts, data)
    }

    // =========================================================================
    // LP Fee Governance
    // =========================================================================

    /// Vote for an LP fee with all of the caller's shares in a pool
    ///
    /// # Arguments
    /// * `fee_bps` - Candidate fee, at most MAX_LP_FEE_BPS (0 is allowed)
    pub fn vote_for_lp_fee(ctx: Context<VoteForLpFee>, fee_bps: u16) -> Result<()> {
        instructions::vote_for_lp_fee::handler_vote_for_lp_fee(ctx, fee_bps)
    }

    /// Propose switching a pool to `fee_bps`; needs a strictly larger tally
    /// than the fee in force
    pub fn propose_lp_fee_change(ctx: Context<ProposeLpFeeChange>, fee_bps: u16) -> Result<()> {
        instructions::propose_lp_fee_change::handler_propose_lp_fee_change(ctx, fee_bps)
    }

    /// Execute a proposal after PROPOSAL_DELAY_SLOTS, if it still leads
    pub fn execute_lp_fee_change(ctx: Context<ExecuteLpFeeChange>, fee_bps: u16) -> Result<()> {
        instructions::execute_lp_fee_change::handler_execute_lp_fee_change(ctx, fee_bps)
    }

    // =========================================================================
    // Owner Operations
    // =========================================================================

    /// Set the management share of the LP fee (owner only)
    ///
    /// # Arguments
    /// * `percentage` - 1/10000 units, at most MAX_MANAGEMENT_FEE_PERCENTAGE
    pub fn set_management_fee(ctx: Context<SetManagementFee>, percentage: u16) -> Result<()> {
        instructions::admin::handler_set_management_fee(ctx, percentage)
    }

    /// Transfer a pool's management pot to the owner (owner only)
    pub fn withdraw_management_fees(ctx: Context<WithdrawManagementFees>) -> Result<()> {
        instructions::admin::handler_withdraw_management_fees(ctx)
    }

    // =========================================================================
    // Views
    // =========================================================================

    pub fn get_withdrawable_amount(ctx: Context<GetWithdrawableAmount>) -> Result<WithdrawableAmount> {
        instructions::views::handler_get_withdrawable_amount(ctx)
    }

    pub fn get_effective_lp_fee(ctx: Context<GetEffectiveLpFee>) -> Result<u16> {
        instructions::views::handler_get_effective_lp_fee(ctx)
    }
}
