// =============================================================================
// Flash Loan Instruction
// =============================================================================
// Lends `amount` of one pool's tokens to a receiver program for the duration
// of a single CPI.
//
// Flow:
// 1. Check the pool can cover the amount
// 2. Probe the receiver for the receiver interface (metered)
// 3. Record the vault balance, send `amount` to the receiver token account
// 4. CPI execute_operation(token, amount, fee, data)
// 5. Reload the vault: it must hold at least balance_before + total_fee
// 6. Post lp_fee to total_liquidity and management_fee to the pot
//
// Any failure reverts the transfer along with everything else.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::FlashPoolError;
use crate::events::FlashLoanCompleted;
use crate::fee_math::quote_flash_loan_fee;
use crate::ledger::validate_token;
use crate::receiver::{self, ExecuteOperationArgs, LoanLeg};
use crate::state::{LiquidityPool, PoolConfig};

/// Accounts required for the flash_loan instruction.
///
/// Extra accounts the receiver needs are passed as remaining accounts and
/// forwarded to execute_operation after the pool, vault and receiver token
/// account.
#[derive(Accounts)]
pub struct FlashLoan<'info> {
    /// Whoever initiates the loan; the receiver program does the repaying
    pub initiator: Signer<'info>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, PoolConfig>,

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

    /// Where the principal is sent
    #[account(
        mut,
        constraint = receiver_token_account.mint == pool.mint @ FlashPoolError::MintMismatch
    )]
    pub receiver_token_account: Box<Account<'info, TokenAccount>>,

    /// CHECK: Probed for the receiver interface before any funds move
    pub receiver_program: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

/// Handler for the flash_loan instruction
///
/// # Arguments
/// * `amount` - Principal to lend (base units)
/// * `data` - Opaque bytes handed to the receiver
pub fn handler_flash_loan<'info>(
    ctx: Context<'_, '_, '_, 'info, FlashLoan<'info>>,
    amount: u64,
    data: Vec<u8>,
) -> Result<()> {
    let mint_key = ctx.accounts.pool.mint;
    validate_token(&mint_key)?;
    ctx.accounts.pool.check_liquidity(amount)?;

    receiver::require_receiver_interface(&ctx.accounts.receiver_program.to_account_info())?;

    let quote = quote_flash_loan_fee(
        amount,
        ctx.accounts.pool.effective_lp_fee_bps(),
        ctx.accounts.config.management_fee_percentage,
    )?;

    msg!(
        "Flash loan of {} {}: lp fee {}, management fee {}",
        amount,
        mint_key,
        quote.lp_fee,
        quote.management_fee
    );

    // =========================================================================
    // Lend: Vault -> Receiver
    // =========================================================================

    let balance_before = ctx.accounts.vault.amount;

    let pool_seeds = &[POOL_SEED, mint_key.as_ref(), &[ctx.accounts.pool.bump]];
    let signer_seeds = &[&pool_seeds[..]];

    let transfer_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.vault.to_account_info(),
            to: ctx.accounts.receiver_token_account.to_account_info(),
            authority: ctx.accounts.pool.to_account_info(),
        },
        signer_seeds,
    );
    token::transfer(transfer_ctx, amount)?;

    // =========================================================================
    // Receiver Callback
    // =========================================================================

    let pool_info = ctx.accounts.pool.to_account_info();
    let vault_info = ctx.accounts.vault.to_account_info();
    let receiver_token_info = ctx.accounts.receiver_token_account.to_account_info();

    receiver::execute_operation(
        &ctx.accounts.receiver_program.to_account_info(),
        LoanLeg {
            pool: &pool_info,
            vault: &vault_info,
            receiver_token_account: &receiver_token_info,
        },
        ctx.remaining_accounts,
        &ExecuteOperationArgs {
            token: mint_key,
            amount,
            fee: quote.total_fee,
            data,
        },
    )?;

    // =========================================================================
    // Repayment Check
    // =========================================================================

    ctx.accounts.vault.reload()?;
    let required = balance_before
        .checked_add(quote.total_fee)
        .ok_or(FlashPoolError::MathOverflow)?;
    require!(
        ctx.accounts.vault.amount >= required,
        FlashPoolError::FlashLoanNotRepaid
    );

    let pool = &mut ctx.accounts.pool;
    pool.record_flash_loan(&quote)?;

    emit!(FlashLoanCompleted {
        pool: pool.key(),
        mint: mint_key,
        receiver: ctx.accounts.receiver_program.key(),
        amount,
        lp_fee: quote.lp_fee,
        management_fee: quote.management_fee,
    });

    msg!("Flash loan repaid; total liquidity now {}", pool.total_liquidity);

    Ok(())
}
