// =============================================================================
// Deposit Instruction
// =============================================================================
// Deposits tokens into a mint's pool and credits shares to the depositor's
// position.
//
// Flow:
// 1. Pool, vault, position and user registry are created on first use
// 2. The ledger charges the fixed entry fee and prices the net deposit
// 3. Minted shares are added to the tally of the position's fee vote
// 4. Registry accounts grow if the mint did not fit (depositor pays rent)
// 5. Tokens move from the depositor to the vault
//
// Share calculation:
// - First deposit: 1:1 for the net amount (both totals equal VIRTUAL_SHARES)
// - Later deposits: shares = net * total_shares / total_liquidity, min 1
// =============================================================================

use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::FlashPoolError;
use crate::events::Deposited;
use crate::ledger::{validate_token, LedgerAccounts};
use crate::state::{FeeCandidate, LiquidityPool, Position, TokenRegistry, UserTokenRegistry};

/// Accounts required for the deposit instruction
#[derive(Accounts)]
pub struct Deposit<'info> {
    // =========================================================================
    // Signers
    // =========================================================================

    /// The user depositing tokens; pays for any account created on the way
    #[account(mut)]
    pub depositor: Signer<'info>,

    // =========================================================================
    // Pool Accounts
    // =========================================================================

    /// The pool for `mint`, created by the first deposit
    #[account(
        init_if_needed,
        payer = depositor,
        space = 8 + LiquidityPool::INIT_SPACE,
        seeds = [POOL_SEED, mint.key().as_ref()],
        bump
    )]
    pub pool: Box<Account<'info, LiquidityPool>>,

    /// Pool's vault (destination for deposited tokens)
    #[account(
        init_if_needed,
        payer = depositor,
        token::mint = mint,
        token::authority = pool,
        seeds = [VAULT_SEED, pool.key().as_ref()],
        bump
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    /// The depositor's position in this pool
    #[account(
        init_if_needed,
        payer = depositor,
        space = 8 + Position::INIT_SPACE,
        seeds = [POSITION_SEED, pool.key().as_ref(), depositor.key().as_ref()],
        bump
    )]
    pub position: Box<Account<'info, Position>>,

    /// Candidate the position currently votes for.
    /// Required when the position has a vote; checked by the ledger.
    #[account(mut)]
    pub selected_candidate: Option<Account<'info, FeeCandidate>>,

    // =========================================================================
    // Registries
    // =========================================================================

    #[account(
        mut,
        seeds = [TOKEN_REGISTRY_SEED],
        bump = token_registry.bump
    )]
    pub token_registry: Box<Account<'info, TokenRegistry>>,

    /// Created empty; an existing registry keeps whatever size it has grown to
    #[account(
        init_if_needed,
        payer = depositor,
        space = UserTokenRegistry::space_for(0).max(user_registry.data_len()),
        seeds = [USER_TOKENS_SEED, depositor.key().as_ref()],
        bump
    )]
    pub user_registry: Box<Account<'info, UserTokenRegistry>>,

    // =========================================================================
    // Token Accounts
    // =========================================================================

    pub mint: Account<'info, Mint>,

    /// Depositor's token account (source of funds)
    #[account(
        mut,
        constraint = depositor_token_account.mint == mint.key() @ FlashPoolError::MintMismatch,
        constraint = depositor_token_account.owner == depositor.key() @ FlashPoolError::Unauthorized
    )]
    pub depositor_token_account: Account<'info, TokenAccount>,

    // =========================================================================
    // Programs
    // =========================================================================

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

/// Handler for the deposit instruction
///
/// # Arguments
/// * `amount` - Gross amount to deposit, entry fee included (base units)
pub fn handler_deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    let mint_key = ctx.accounts.mint.key();
    validate_token(&mint_key)?;

    let pool_key = ctx.accounts.pool.key();
    let vault_key = ctx.accounts.vault.key();
    let depositor_key = ctx.accounts.depositor.key();

    // =========================================================================
    // First-Use Setup
    // =========================================================================

    if !ctx.accounts.pool.is_initialized() {
        ctx.accounts
            .pool
            .initialize(mint_key, vault_key, ctx.bumps.pool, ctx.bumps.vault);
        msg!("Created pool for mint {}", mint_key);
    }

    if !ctx.accounts.position.is_initialized() {
        ctx.accounts
            .position
            .initialize(pool_key, depositor_key, ctx.bumps.position);
    }

    if ctx.accounts.user_registry.owner == Pubkey::default() {
        ctx.accounts.user_registry.owner = depositor_key;
        ctx.accounts.user_registry.bump = ctx.bumps.user_registry;
    }

    // =========================================================================
    // Ledger Update
    // =========================================================================

    let accounts = &mut *ctx.accounts;
    let outcome = LedgerAccounts {
        pool: &mut accounts.pool,
        position: &mut accounts.position,
        selected_candidate: accounts.selected_candidate.as_deref_mut(),
        token_registry: &mut accounts.token_registry,
        user_registry: &mut accounts.user_registry,
    }
    .deposit(amount)?;

    msg!(
        "Depositing {} tokens ({} net) for {} shares",
        amount,
        outcome.net_deposit,
        outcome.shares_minted
    );

    if outcome.opened_position {
        grow_registry(
            accounts.token_registry.to_account_info(),
            accounts.token_registry.required_space(),
            accounts.depositor.to_account_info(),
            accounts.system_program.to_account_info(),
        )?;
        grow_registry(
            accounts.user_registry.to_account_info(),
            accounts.user_registry.required_space(),
            accounts.depositor.to_account_info(),
            accounts.system_program.to_account_info(),
        )?;
    }

    // =========================================================================
    // Transfer Tokens: Depositor -> Vault
    // =========================================================================

    let transfer_ctx = CpiContext::new(
        accounts.token_program.to_account_info(),
        Transfer {
            from: accounts.depositor_token_account.to_account_info(),
            to: accounts.vault.to_account_info(),
            authority: accounts.depositor.to_account_info(),
        },
    );
    token::transfer(transfer_ctx, amount)?;

    emit!(Deposited {
        pool: pool_key,
        mint: mint_key,
        depositor: depositor_key,
        amount,
        shares_minted: outcome.shares_minted,
    });

    msg!("New pool total shares: {}", accounts.pool.total_shares);
    msg!("New pool total liquidity: {}", accounts.pool.total_liquidity);

    Ok(())
}

/// Resize `registry` to hold `space` bytes if it is smaller, topping up rent
/// exemption from `payer`. Never shrinks.
fn grow_registry<'info>(
    registry: AccountInfo<'info>,
    space: usize,
    payer: AccountInfo<'info>,
    system_program: AccountInfo<'info>,
) -> Result<()> {
    let current = registry.data_len();
    if space <= current {
        return Ok(());
    }

    let rent_due = Rent::get()?
        .minimum_balance(space)
        .saturating_sub(registry.lamports());
    if rent_due > 0 {
        system_program::transfer(
            CpiContext::new(
                system_program,
                system_program::Transfer {
                    from: payer,
                    to: registry.clone(),
                },
            ),
            rent_due,
        )?;
    }

    registry.resize(space)?;
    msg!("Registry {} grown from {} to {} bytes", registry.key, current, space);
    Ok(())
}
