// =============================================================================
// Instructions Module
// =============================================================================
// Every instruction of the flash pool program, one module each (admin and
// views group a few small ones).
// =============================================================================

// Liquidity
pub mod deposit;
pub mod withdraw;
pub mod withdraw_fees;

// Flash loans
pub mod flash_loan;
pub mod flash_loan_multiple;

// Governance
pub mod execute_lp_fee_change;
pub mod propose_lp_fee_change;
pub mod vote_for_lp_fee;

// Owner
pub mod admin;
pub mod initialize_config;

// Read-only
pub mod views;

// The #[derive(Accounts)] macro generates helper types that need to be at crate root
pub use admin::*;
pub use deposit::*;
pub use execute_lp_fee_change::*;
pub use flash_loan::*;
pub use flash_loan_multiple::*;
pub use initialize_config::*;
pub use propose_lp_fee_change::*;
pub use views::*;
pub use vote_for_lp_fee::*;
pub use withdraw::*;
pub use withdraw_fees::*;
