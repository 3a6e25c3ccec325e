// =============================================================================
// Withdraw Instruction
// =============================================================================
// Redeems a whole position. Partial principal withdrawals do not exist;
// withdraw_fees redeems only the value above principal.
//
// Withdrawal calculation:
//   gross = shares * total_liquidity / total_shares
//   net   = gross - ENTRY_EXIT_FEE
//
// Only `gross` leaves total_liquidity. The exit fee stays in the vault, so
// the remaining holders' shares gain value. The position account is closed
// and its rent returned to the withdrawer.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::FlashPoolError;
use crate::events::Withdrawn;
use crate::ledger::LedgerAccounts;
use crate::state::{FeeCandidate, LiquidityPool, Position, TokenRegistry, UserTokenRegistry};

/// Accounts required for the withdraw instruction
#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(mut)]
    pub withdrawer: Signer<'info>,

    #[account(
        mut,
        seeds = [POOL_SEED, pool.mint.as_ref()],
        bump = pool.bump
    )]
    pub pool: Box<Account<'info, LiquidityPool>>,

    /// Pool's vault (source of withdrawn tokens)
    #[account(
        mut,
        seeds = [VAULT_SEED, pool.key().as_ref()],
        bump = pool.vault_bump
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    /// Closed on success; rent goes back to the withdrawer
    #[account(
        mut,
        close = withdrawer,
        seeds = [POSITION_SEED, pool.key().as_ref(), withdrawer.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == withdrawer.key() @ FlashPoolError::Unauthorized
    )]
    pub position: Box<Account<'info, Position>>,

    /// Candidate the position currently votes for, if any
    #[account(mut)]
    pub selected_candidate: Option<Account<'info, FeeCandidate>>,

    #[account(
        mut,
        seeds = [TOKEN_REGISTRY_SEED],
        bump = token_registry.bump
    )]
    pub token_registry: Box<Account<'info, TokenRegistry>>,

    #[account(
        mut,
        seeds = [USER_TOKENS_SEED, withdrawer.key().as_ref()],
        bump = user_registry.bump
    )]
    pub user_registry: Box<Account<'info, UserTokenRegistry>>,

    /// Withdrawer's token account (destination)
    #[account(
        mut,
        constraint = withdrawer_token_account.mint == pool.mint @ FlashPoolError::MintMismatch
    )]
    pub withdrawer_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

/// Handler for the withdraw instruction
pub fn handler_withdraw(ctx: Context<Withdraw>) -> Result<()> {
    let pool_key = ctx.accounts.pool.key();
    let mint_key = ctx.accounts.pool.mint;
    let withdrawer_key = ctx.accounts.withdrawer.key();

    let accounts = &mut *ctx.accounts;
    let outcome = LedgerAccounts {
        pool: &mut accounts.pool,
        position: &mut accounts.position,
        selected_candidate: accounts.selected_candidate.as_deref_mut(),
        token_registry: &mut accounts.token_registry,
        user_registry: &mut accounts.user_registry,
    }
    .withdraw()?;

    let redemption = outcome.redemption;
    msg!(
        "Withdrawing {} shares: gross {}, net {}",
        redemption.shares,
        redemption.gross_amount,
        redemption.net_amount
    );

    // =========================================================================
    // Transfer Tokens: Vault -> Withdrawer (pool PDA signs)
    // =========================================================================

    let pool_seeds = &[POOL_SEED, mint_key.as_ref(), &[accounts.pool.bump]];
    let signer_seeds = &[&pool_seeds[..]];

    let transfer_ctx = CpiContext::new_with_signer(
        accounts.token_program.to_account_info(),
        Transfer {
            from: accounts.vault.to_account_info(),
            to: accounts.withdrawer_token_account.to_account_info(),
            authority: accounts.pool.to_account_info(),
        },
        signer_seeds,
    );
    token::transfer(transfer_ctx, redemption.net_amount)?;

    emit!(Withdrawn {
        pool: pool_key,
        mint: mint_key,
        depositor: withdrawer_key,
        amount: redemption.net_amount,
        shares_burned: redemption.shares,
    });

    msg!("Position closed");

    Ok(())
}
