// =============================================================================
// Flash Pool Protocol Constants
// =============================================================================
// Every magic number of the pool lives here: share accounting parameters,
// fee limits, governance timing and PDA seeds. Amounts are in token base
// units unless noted otherwise.
// =============================================================================

// =============================================================================
// SHARE ACCOUNTING
// =============================================================================

/// Share baseline minted once per pool, owned by no position.
/// The pool also starts with the same amount of virtual liquidity, so the
/// first real deposit mints shares 1:1 and a first depositor cannot inflate
/// the share price against the next one.
pub const VIRTUAL_SHARES: u64 = 1_000;

/// Fixed entry/exit fee in token base units (NOT a percentage).
/// Charged on deposit and again on every redemption, independent of decimals.
pub const ENTRY_EXIT_FEE: u64 = 100;

/// Smallest accepted deposit. Must stay above ENTRY_EXIT_FEE so that the net
/// deposit is always positive.
pub const MINIMUM_DEPOSIT: u64 = 1_000;

/// Floor on minted shares, so dust deposits into a diluted pool are never lost
pub const MIN_SHARES_MINTED: u64 = 1;

// =============================================================================
// FEE CONFIGURATION (in basis points - 1 BPS = 0.01%)
// =============================================================================

/// LP fee charged on flash loans when governance has not set one (0.01%)
pub const DEFAULT_LP_FEE_BPS: u16 = 1;

/// Highest LP fee a vote or proposal may target (1%)
pub const MAX_LP_FEE_BPS: u16 = 100;

/// Management fee is expressed as a fraction of the LP fee, in 1/10000 units.
/// 10000 = the management pot receives an amount equal to the LP fee.
pub const MAX_MANAGEMENT_FEE_PERCENTAGE: u16 = 10_000;

/// Denominator for basis point math (u128 to avoid up-cast noise)
pub const BPS_DENOMINATOR: u128 = 10_000;

// =============================================================================
// GOVERNANCE
// =============================================================================

/// Slots that must pass between proposing and executing an LP fee change.
/// Activation slot = proposal slot + PROPOSAL_DELAY_SLOTS + 1.
pub const PROPOSAL_DELAY_SLOTS: u64 = 10;

// =============================================================================
// FLASH LOANS
// =============================================================================

/// Maximum number of tokens in one flash_loan_multiple call
pub const MAX_BATCH_TOKENS: usize = 20;

/// Accounts supplied per token in flash_loan_multiple: pool, vault, receiver token account
pub const ACCOUNTS_PER_BATCH_TOKEN: usize = 3;

/// Compute units a receiver may spend answering one interface probe
pub const RECEIVER_PROBE_COMPUTE_BUDGET: u64 = 30_000;

// =============================================================================
// PDA SEEDS
// =============================================================================

/// Seed for the global config PDA
/// Full seed: ["config"]
pub const CONFIG_SEED: &[u8] = b"config";

/// Seed for the global token registry PDA
/// Full seed: ["token_registry"]
pub const TOKEN_REGISTRY_SEED: &[u8] = b"token_registry";

/// Seed for the LiquidityPool PDA
/// Full seed: ["pool", mint_pubkey]
pub const POOL_SEED: &[u8] = b"pool";

/// Seed for the vault token account PDA
/// Full seed: ["vault", pool_pubkey]
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed for a depositor's Position PDA
/// Full seed: ["position", pool_pubkey, owner_pubkey]
pub const POSITION_SEED: &[u8] = b"position";

/// Seed for a user's deposited-token registry PDA
/// Full seed: ["user_tokens", owner_pubkey]
pub const USER_TOKENS_SEED: &[u8] = b"user_tokens";

/// Seed for a fee candidate PDA (vote tally + pending proposal)
/// Full seed: ["fee_candidate", pool_pubkey, fee_bps.to_le_bytes()]
pub const FEE_CANDIDATE_SEED: &[u8] = b"fee_candidate";
