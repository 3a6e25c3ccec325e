// =============================================================================
// Flash Pool Error Codes
// =============================================================================
// Every failure aborts the whole instruction; the runtime discards all
// account writes, so no handler performs compensating rollback.
//
// Variants are grouped by taxonomy. `FlashPoolError::kind` exposes the group
// to clients that want to react to a class of failure instead of a code.
// =============================================================================

use anchor_lang::prelude::*;

/// All errors the flash pool program can return.
///
/// Anchor assigns numeric codes from 6000 in declaration order.
#[error_code]
pub enum FlashPoolError {
    // =========================================================================
    // Validation Errors
    // =========================================================================

    /// The token mint is the default (null) pubkey
    #[msg("Invalid token")]
    InvalidToken,

    /// Deposit is below MINIMUM_DEPOSIT
    #[msg("Deposit too small")]
    DepositTooSmall,

    /// flash_loan_multiple received more than MAX_BATCH_TOKENS tokens
    #[msg("Too many tokens")]
    TooManyTokens,

    /// tokens and amounts differ in length, or remaining accounts don't match
    #[msg("Arrays length mismatch")]
    ArrayLengthMismatch,

    /// The same token appears twice in a batch
    #[msg("Duplicate token")]
    DuplicateToken,

    /// Vote target is above MAX_LP_FEE_BPS
    #[msg("Fee amount too high")]
    FeeAmountTooHigh,

    /// Proposal target is above MAX_LP_FEE_BPS
    #[msg("Fee too high")]
    FeeTooHigh,

    /// Management fee percentage is above MAX_MANAGEMENT_FEE_PERCENTAGE
    #[msg("Fee out of range")]
    FeeOutOfRange,

    /// The receiver failed the interface probe or blew the probe budget
    #[msg("Invalid receiver interface")]
    InvalidReceiverInterface,

    /// An account passed for a pool, vault or candidate is not the expected PDA
    #[msg("Account does not match the expected pool PDA")]
    InvalidPoolAccount,

    /// The fee candidate account does not belong to the position's selection
    #[msg("Fee candidate account does not match the vote selection")]
    CandidateMismatch,

    /// Token account mint doesn't match the pool mint
    #[msg("Token account mint does not match pool")]
    MintMismatch,

    // =========================================================================
    // Insufficient Funds Errors
    // =========================================================================

    /// Loan amount exceeds the pool's total liquidity
    #[msg("Not enough liquidity")]
    NotEnoughLiquidity,

    /// Vault balance after the callback is below balance_before + fee
    #[msg("Flash loan not repaid")]
    FlashLoanNotRepaid,

    // =========================================================================
    // State Errors
    // =========================================================================

    /// Position holds no redeemable shares
    #[msg("Nothing to withdraw")]
    NothingToWithdraw,

    /// Full withdrawal would not cover the exit fee
    #[msg("Withdrawal too small after fee")]
    WithdrawalTooSmall,

    /// Fee-only withdrawal would not cover the exit fee
    #[msg("Fees too small after exit fee")]
    FeesTooSmall,

    /// Voter holds no shares in this pool
    #[msg("No shares to vote")]
    NoSharesToVote,

    /// Proposal targets the fee that is already effective
    #[msg("Fee already set")]
    FeeAlreadySet,

    /// Proposed fee does not strictly lead the current fee's tally
    #[msg("Insufficient support for fee change")]
    InsufficientSupport,

    /// execute called for a candidate without a pending proposal
    #[msg("No proposal exists")]
    NoProposalExists,

    /// execute called before the activation slot
    #[msg("Proposal delay not met")]
    ProposalDelayNotMet,

    /// Re-validation at execution time failed; the proposal stays pending
    #[msg("Proposal no longer has sufficient support")]
    SupportLost,

    // =========================================================================
    // Access Errors
    // =========================================================================

    /// Caller is not the config owner
    #[msg("Only owner can perform this action")]
    OwnerOnly,

    /// Signer does not own the position or registry it passed
    #[msg("Unauthorized - signer does not have permission")]
    Unauthorized,

    // =========================================================================
    // Math Errors
    // =========================================================================

    #[msg("Math overflow - calculation exceeded maximum value")]
    MathOverflow,

    #[msg("Math underflow - result would be negative")]
    MathUnderflow,

    #[msg("Division by zero")]
    DivisionByZero,
}

/// Coarse failure classes, mirroring how clients are expected to react.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input; retrying with the same arguments will fail again
    Validation,
    /// Liquidity or repayment shortfall
    InsufficientFunds,
    /// Operation not valid in the current pool/position/proposal state
    State,
    /// Caller lacks the required privilege
    Access,
    /// Arithmetic guard tripped
    Arithmetic,
}

impl FlashPoolError {
    pub fn kind(&self) -> ErrorKind {
        use FlashPoolError::*;
        match self {
            InvalidToken | DepositTooSmall | TooManyTokens | ArrayLengthMismatch
            | DuplicateToken | FeeAmountTooHigh | FeeTooHigh | FeeOutOfRange
            | InvalidReceiverInterface | InvalidPoolAccount | CandidateMismatch
            | MintMismatch => ErrorKind::Validation,
            NotEnoughLiquidity | FlashLoanNotRepaid => ErrorKind::InsufficientFunds,
            NothingToWithdraw | WithdrawalTooSmall | FeesTooSmall | NoSharesToVote
            | FeeAlreadySet | InsufficientSupport | NoProposalExists | ProposalDelayNotMet
            | SupportLost => ErrorKind::State,
            OwnerOnly | Unauthorized => ErrorKind::Access,
            MathOverflow | MathUnderflow | DivisionByZero => ErrorKind::Arithmetic,
        }
    }
}
