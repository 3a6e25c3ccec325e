// =============================================================================
// Flash Loan Multiple Instruction
// =============================================================================
// Lends several tokens at once through a single execute_operation_batch
// callback.
//
// Per lent token the caller passes three remaining accounts, in the order
// of `tokens`:
//   0. `[writable]` pool     (["pool", mint])
//   1. `[writable]` vault    (["vault", pool])
//   2. `[writable]` receiver token account for that mint
// Any further remaining accounts are forwarded to the receiver untouched.
//
// Every token must be repaid with its fee; one shortfall reverts the whole
// batch.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::constants::*;
use crate::error::FlashPoolError;
use crate::events::MultiFlashLoanCompleted;
use crate::fee_math::{quote_flash_loan_fee, FeeQuote};
use crate::ledger::validate_token;
use crate::receiver::{self, ExecuteOperationBatchArgs, LoanLeg};
use crate::state::{LiquidityPool, PoolConfig};

#[derive(Accounts)]
pub struct FlashLoanMultiple<'info> {
    pub initiator: Signer<'info>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = config.bump
    )]
    pub config: Account<'info, PoolConfig>,

    /// CHECK: Probed for the receiver interface before any funds move
    pub receiver_program: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

/// Shape checks on the requested batch
pub fn validate_batch(tokens: &[Pubkey], amounts: &[u64]) -> Result<()> {
    require!(tokens.len() <= MAX_BATCH_TOKENS, FlashPoolError::TooManyTokens);
    require!(tokens.len() == amounts.len(), FlashPoolError::ArrayLengthMismatch);

    for (i, token) in tokens.iter().enumerate() {
        validate_token(token)?;
        require!(!tokens[..i].contains(token), FlashPoolError::DuplicateToken);
    }
    Ok(())
}

/// One token of the batch, loaded from remaining accounts
struct BatchLeg<'info> {
    pool: Account<'info, LiquidityPool>,
    vault: Account<'info, TokenAccount>,
    receiver_token_account: &'info AccountInfo<'info>,
    quote: FeeQuote,
    balance_before: u64,
}

fn load_leg<'info>(
    accounts: &'info [AccountInfo<'info>],
    token: &Pubkey,
    amount: u64,
    management_fee_percentage: u16,
) -> Result<BatchLeg<'info>> {
    let pool = Account::<LiquidityPool>::try_from(&accounts[0])?;
    require_keys_eq!(pool.mint, *token, FlashPoolError::InvalidPoolAccount);

    let vault = Account::<TokenAccount>::try_from(&accounts[1])?;
    require_keys_eq!(vault.key(), pool.vault, FlashPoolError::InvalidPoolAccount);

    let receiver_token_account = &accounts[2];
    let receiver_mint = Account::<TokenAccount>::try_from(receiver_token_account)?.mint;
    require_keys_eq!(receiver_mint, *token, FlashPoolError::MintMismatch);

    pool.check_liquidity(amount)?;
    let quote = quote_flash_loan_fee(amount, pool.effective_lp_fee_bps(), management_fee_percentage)?;
    let balance_before = vault.amount;

    Ok(BatchLeg {
        pool,
        vault,
        receiver_token_account,
        quote,
        balance_before,
    })
}

/// Handler for the flash_loan_multiple instruction
///
/// # Arguments
/// * `tokens` - Mints to borrow, at most MAX_BATCH_TOKENS, no duplicates
/// * `amounts` - Principal per mint, same length as `tokens`
/// * `data` - Opaque bytes handed to the receiver
pub fn handler_flash_loan_multiple<'info>(
    ctx: Context<'_, '_, 'info, 'info, FlashLoanMultiple<'info>>,
    tokens: Vec<Pubkey>,
    amounts: Vec<u64>,
    data: Vec<u8>,
) -> Result<()> {
    validate_batch(&tokens, &amounts)?;

    let leg_account_count = tokens.len() * ACCOUNTS_PER_BATCH_TOKEN;
    require!(
        ctx.remaining_accounts.len() >= leg_account_count,
        FlashPoolError::InvalidPoolAccount
    );
    let (leg_accounts, extra_accounts) = ctx.remaining_accounts.split_at(leg_account_count);

    receiver::require_receiver_interface(&ctx.accounts.receiver_program.to_account_info())?;

    msg!("Batch flash loan of {} tokens", tokens.len());

    // =========================================================================
    // Load Pools and Lend
    // =========================================================================

    let management_fee_percentage = ctx.accounts.config.management_fee_percentage;
    let mut legs = Vec::with_capacity(tokens.len());

    for (i, accounts) in leg_accounts.chunks(ACCOUNTS_PER_BATCH_TOKEN).enumerate() {
        let leg = load_leg(accounts, &tokens[i], amounts[i], management_fee_percentage)?;

        let pool_seeds = &[POOL_SEED, tokens[i].as_ref(), &[leg.pool.bump]];
        let signer_seeds = &[&pool_seeds[..]];

        let transfer_ctx = CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: leg.vault.to_account_info(),
                to: leg.receiver_token_account.clone(),
                authority: leg.pool.to_account_info(),
            },
            signer_seeds,
        );
        token::transfer(transfer_ctx, amounts[i])?;

        msg!("Lent {} of {} (fee {})", amounts[i], tokens[i], leg.quote.total_fee);
        legs.push(leg);
    }

    // =========================================================================
    // Receiver Callback
    // =========================================================================

    let pool_infos: Vec<AccountInfo<'info>> = legs.iter().map(|l| l.pool.to_account_info()).collect();
    let vault_infos: Vec<AccountInfo<'info>> = legs.iter().map(|l| l.vault.to_account_info()).collect();
    let callback_legs: Vec<LoanLeg<'_, 'info>> = legs
        .iter()
        .enumerate()
        .map(|(i, leg)| LoanLeg {
            pool: &pool_infos[i],
            vault: &vault_infos[i],
            receiver_token_account: leg.receiver_token_account,
        })
        .collect();

    let fees: Vec<u64> = legs.iter().map(|l| l.quote.total_fee).collect();

    receiver::execute_operation_batch(
        &ctx.accounts.receiver_program.to_account_info(),
        &callback_legs,
        extra_accounts,
        &ExecuteOperationBatchArgs {
            tokens: tokens.clone(),
            amounts: amounts.clone(),
            fees: fees.clone(),
            data,
        },
    )?;

    // =========================================================================
    // Repayment Check and Fee Posting
    // =========================================================================

    for leg in legs.iter_mut() {
        leg.vault.reload()?;
        let required = leg
            .balance_before
            .checked_add(leg.quote.total_fee)
            .ok_or(FlashPoolError::MathOverflow)?;
        require!(leg.vault.amount >= required, FlashPoolError::FlashLoanNotRepaid);

        leg.pool.record_flash_loan(&leg.quote)?;
        leg.pool.exit(&crate::ID)?;
    }

    emit!(MultiFlashLoanCompleted {
        receiver: ctx.accounts.receiver_program.key(),
        mints: tokens,
        amounts,
        total_fees: fees,
    });

    msg!("Batch flash loan repaid");

    Ok(())
}
