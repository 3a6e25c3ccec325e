//! Share accounting properties across deposit / flash loan / withdraw
//! sequences with several depositors in one pool.

use anchor_lang::prelude::Pubkey;

use flash_pool::constants::*;
use flash_pool::error::FlashPoolError;
use flash_pool::fee_math::quote_flash_loan_fee;
use flash_pool::ledger::{withdrawable_amount, LedgerAccounts};
use flash_pool::state::{LiquidityPool, Position, TokenRegistry, UserTokenRegistry};

const POOL_KEY: [u8; 32] = [50; 32];

struct Depositor {
    position: Position,
    registry: UserTokenRegistry,
}

struct Market {
    pool: LiquidityPool,
    registry: TokenRegistry,
    depositors: Vec<Depositor>,
}

impl Market {
    fn new(depositors: u8) -> Self {
        let mut pool = LiquidityPool::default();
        pool.initialize(
            Pubkey::new_from_array([1; 32]),
            Pubkey::new_from_array([2; 32]),
            255,
            255,
        );
        let depositors = (0..depositors)
            .map(|i| {
                let owner = Pubkey::new_from_array([100 + i; 32]);
                let mut position = Position::default();
                position.initialize(Pubkey::new_from_array(POOL_KEY), owner, 255);
                Depositor {
                    position,
                    registry: UserTokenRegistry { owner, ..Default::default() },
                }
            })
            .collect();
        Self { pool, registry: TokenRegistry::default(), depositors }
    }

    fn ledger(&mut self, who: usize) -> LedgerAccounts<'_> {
        let depositor = &mut self.depositors[who];
        LedgerAccounts {
            pool: &mut self.pool,
            position: &mut depositor.position,
            selected_candidate: None,
            token_registry: &mut self.registry,
            user_registry: &mut depositor.registry,
        }
    }

    fn flash_loan(&mut self, amount: u64, management_fee_percentage: u16) {
        let quote =
            quote_flash_loan_fee(amount, self.pool.effective_lp_fee_bps(), management_fee_percentage)
                .unwrap();
        self.pool.check_liquidity(amount).unwrap();
        self.pool.record_flash_loan(&quote).unwrap();
    }

    fn depositor_share_sum(&self) -> u64 {
        self.depositors.iter().map(|d| d.position.shares).sum()
    }

    /// (total_liquidity, total_shares) for price comparisons
    fn price(&self) -> (u128, u128) {
        (self.pool.total_liquidity as u128, self.pool.total_shares as u128)
    }
}

fn price_not_lower(before: (u128, u128), after: (u128, u128)) -> bool {
    // after.L / after.S >= before.L / before.S
    after.0 * before.1 >= before.0 * after.1
}

#[test]
fn total_shares_match_positions_after_mixed_activity() {
    let mut market = Market::new(3);

    market.ledger(0).deposit(5_000_000_000).unwrap();
    market.ledger(1).deposit(1_234_567).unwrap();
    market.flash_loan(4_000_000_000, 2_500);
    market.ledger(2).deposit(77_777_777).unwrap();
    market.ledger(1).withdraw().unwrap();
    market.flash_loan(1_000_000_000, 0);
    market.ledger(0).withdraw_fees().unwrap();
    market.ledger(1).deposit(9_999).unwrap();

    assert_eq!(market.pool.total_shares, VIRTUAL_SHARES + market.depositor_share_sum());
    assert_eq!(market.pool.depositor_shares(), market.depositor_share_sum());
    assert_eq!(market.pool.depositor_count, 3);
}

#[test]
fn share_price_never_drops() {
    let mut market = Market::new(2);
    let mut last = market.price();

    let mut step = |market: &mut Market, label: &str| {
        let now = market.price();
        assert!(price_not_lower(last, now), "price dropped after {label}");
        last = now;
    };

    market.ledger(0).deposit(10_000_000_000).unwrap();
    step(&mut market, "first deposit");
    market.ledger(1).deposit(3_000_000).unwrap();
    step(&mut market, "second deposit");
    market.flash_loan(8_000_000_000, 5_000);
    step(&mut market, "flash loan");
    market.ledger(1).withdraw().unwrap();
    step(&mut market, "withdraw");
    market.ledger(0).withdraw_fees().unwrap();
    step(&mut market, "fee withdrawal");
}

#[test]
fn deposit_then_withdraw_returns_amount_minus_both_fees() {
    let mut market = Market::new(2);
    market.ledger(0).deposit(1_000_000_000_000).unwrap();

    let amount = 1_000_000_000u64;
    market.ledger(1).deposit(amount).unwrap();
    let outcome = market.ledger(1).withdraw().unwrap();

    let net = outcome.redemption.net_amount;
    // rounding dust stays with the pool
    assert!(net <= amount - 2 * ENTRY_EXIT_FEE);
    assert!(net >= amount - 2 * ENTRY_EXIT_FEE - 2);
}

#[test]
fn loan_at_default_fee_grows_liquidity_only() {
    let mut market = Market::new(1);
    market.ledger(0).deposit(100_000_000_000).unwrap();

    let before = market.pool.total_liquidity;
    let loan = 10_000_000_000u64;
    market.flash_loan(loan, 0);

    assert_eq!(market.pool.total_liquidity, before + loan / 10_000);
    assert_eq!(market.pool.collected_management_fees, 0);
    assert_eq!(market.pool.total_flash_loans, 1);
}

#[test]
fn fee_accrual_shows_up_in_withdrawable_amount() {
    let mut market = Market::new(1);
    market.ledger(0).deposit(100_000_000_000).unwrap();
    let before = withdrawable_amount(&market.pool, &market.depositors[0].position).unwrap();

    market.flash_loan(50_000_000_000, 0);
    let after = withdrawable_amount(&market.pool, &market.depositors[0].position).unwrap();

    assert!(after.gross_amount > before.gross_amount);
    assert!(after.fees > before.fees);
    assert_eq!(after.principal, before.principal);
}

#[test]
fn loan_larger_than_pool_is_refused() {
    let mut market = Market::new(1);
    market.ledger(0).deposit(5_000).unwrap();
    assert_eq!(
        market.pool.check_liquidity(market.pool.total_liquidity + 1).unwrap_err(),
        FlashPoolError::NotEnoughLiquidity.into()
    );
}

#[test]
fn minimum_deposit_into_expensive_pool_still_mints() {
    let mut market = Market::new(2);
    market.ledger(0).deposit(1_000_000).unwrap();
    // a huge fee inflow makes one share worth far more than the minimum deposit
    market.pool.total_liquidity += 1_000_000_000_000_000;

    let outcome = market.ledger(1).deposit(MINIMUM_DEPOSIT).unwrap();
    assert_eq!(outcome.shares_minted, 1);
    assert_eq!(market.depositors[1].position.shares, 1);
}

#[test]
fn registries_follow_depositors() {
    let mut market = Market::new(2);
    let mint = market.pool.mint;

    market.ledger(0).deposit(10_000).unwrap();
    market.ledger(1).deposit(10_000).unwrap();
    assert_eq!(market.registry.deposited_tokens(), &[mint]);
    assert_eq!(market.depositors[1].registry.deposited_tokens(), &[mint]);

    market.ledger(0).withdraw().unwrap();
    market.ledger(1).withdraw().unwrap();
    assert!(market.registry.deposited_tokens().is_empty());
    assert_eq!(market.pool.total_shares, VIRTUAL_SHARES);

    // a returning depositor registers again
    market.ledger(0).deposit(10_000).unwrap();
    assert_eq!(market.registry.deposited_tokens(), &[mint]);
}

#[test]
fn registries_grow_past_any_token_count() {
    let owner = Pubkey::new_from_array([7; 32]);
    let mut registry = TokenRegistry::default();
    let mut user_registry = UserTokenRegistry { owner, ..Default::default() };

    for n in 1..=100u8 {
        let mut pool = LiquidityPool::default();
        pool.initialize(Pubkey::new_from_array([n; 32]), Pubkey::new_from_array([200; 32]), 255, 255);
        let mut position = Position::default();
        position.initialize(Pubkey::new_from_array([n + 100; 32]), owner, 255);

        let outcome = LedgerAccounts {
            pool: &mut pool,
            position: &mut position,
            selected_candidate: None,
            token_registry: &mut registry,
            user_registry: &mut user_registry,
        }
        .deposit(MINIMUM_DEPOSIT)
        .unwrap();
        assert!(outcome.opened_position);
    }

    assert_eq!(registry.deposited_tokens().len(), 100);
    assert_eq!(user_registry.deposited_tokens().len(), 100);
    assert_eq!(registry.required_space(), TokenRegistry::space_for(100));
    assert_eq!(user_registry.required_space(), UserTokenRegistry::space_for(100));
}
