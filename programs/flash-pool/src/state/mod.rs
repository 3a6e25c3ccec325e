// =============================================================================
// State Module
// =============================================================================
// Account structures of the flash pool program:
// - PoolConfig: owner and management fee (one per program)
// - TokenRegistry / UserTokenRegistry: which mints have depositors
// - LiquidityPool: share accounting for one mint
// - Position: one depositor's shares, principal and vote
// - FeeCandidate: vote tally and pending proposal for one LP fee value
// =============================================================================

pub mod config;
pub mod fee_candidate;
pub mod pool;
pub mod position;
pub mod registry;

pub use config::*;
pub use fee_candidate::*;
pub use pool::*;
pub use position::*;
pub use registry::*;
