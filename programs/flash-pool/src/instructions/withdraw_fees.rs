// =============================================================================
// Withdraw Fees Instruction
// =============================================================================
// Redeems only the part of a position worth more than its recorded
// principal:
//
//   shares_for_principal = principal * total_shares / total_liquidity
//   fee_shares           = shares - shares_for_principal
//
// fee_shares are priced like any redemption (exit fee included) and burned;
// principal is untouched.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::FlashPoolError;
use crate::events::FeesWithdrawn;
use crate::ledger::LedgerAccounts;
use crate::state::{FeeCandidate, LiquidityPool, Position, TokenRegistry, UserTokenRegistry};

#[derive(Accounts)]
pub struct WithdrawFees<'info> {
    #[account(mut)]
    pub withdrawer: Signer<'info>,

    #[account(
        mut,
        seeds = [POOL_SEED, pool.mint.as_ref()],
        bump = pool.bump
    )]
    pub pool: Box<Account<'info, LiquidityPool>>,

    #[account(
        mut,
        seeds = [VAULT_SEED, pool.key().as_ref()],
        bump = pool.vault_bump
    )]
    pub vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [POSITION_SEED, pool.key().as_ref(), withdrawer.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == withdrawer.key() @ FlashPoolError::Unauthorized
    )]
    pub position: Box<Account<'info, Position>>,

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

    #[account(
        mut,
        constraint = withdrawer_token_account.mint == pool.mint @ FlashPoolError::MintMismatch
    )]
    pub withdrawer_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler_withdraw_fees(ctx: Context<WithdrawFees>) -> Result<()> {
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
    .withdraw_fees()?;

    let redemption = outcome.redemption;
    msg!(
        "Withdrawing fees: {} shares, gross {}, net {}",
        redemption.shares,
        redemption.gross_amount,
        redemption.net_amount
    );

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

    if outcome.closed_position {
        accounts
            .position
            .close(accounts.withdrawer.to_account_info())?;
        msg!("Position emptied and closed");
    }

    emit!(FeesWithdrawn {
        pool: pool_key,
        mint: mint_key,
        depositor: withdrawer_key,
        amount: redemption.net_amount,
        shares_burned: redemption.shares,
    });

    Ok(())
}
