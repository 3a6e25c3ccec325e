// =============================================================================
// Token Registries
// =============================================================================
// Two registries answer "which tokens have depositors":
// - TokenRegistry: one global account, every mint with a live depositor
// - UserTokenRegistry: one account per wallet, every mint it holds shares in
//
// Both wrap a TokenSet: an insertion-ordered set with swap-and-pop removal.
// Order is stable under insertion and only the removed slot is refilled
// (by the former last element).
//
// The sets are unbounded. Registry accounts start sized for an empty set and
// grow by one slot whenever a deposit adds a mint that does not fit; they
// never shrink.
// =============================================================================

use anchor_lang::prelude::*;

/// Ordered set of mints with swap-and-pop removal
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenSet {
    tokens: Vec<Pubkey>,
}

impl TokenSet {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &Pubkey) -> bool {
        self.tokens.contains(token)
    }

    pub fn as_slice(&self) -> &[Pubkey] {
        &self.tokens
    }

    /// Append `token` unless present. Returns true when it was added.
    pub fn insert(&mut self, token: Pubkey) -> bool {
        if self.contains(&token) {
            return false;
        }
        self.tokens.push(token);
        true
    }

    /// Remove `token` by moving the last element into its slot.
    /// Returns true when it was present.
    pub fn remove(&mut self, token: &Pubkey) -> bool {
        match self.tokens.iter().position(|t| t == token) {
            Some(index) => {
                self.tokens.swap_remove(index);
                true
            }
            None => false,
        }
    }
}

/// Serialized size of a TokenSet holding `len` mints
pub const fn token_set_space(len: usize) -> usize {
    4 + 32 * len
}

/// Global registry of mints that currently have at least one depositor.
///
/// PDA derived from ["token_registry"].
#[account]
#[derive(Default)]
pub struct TokenRegistry {
    pub tokens: TokenSet,
    pub bump: u8,
}

impl TokenRegistry {
    /// Account size needed to hold `len` mints
    pub const fn space_for(len: usize) -> usize {
        8 + // discriminator
        token_set_space(len) +
        1 // bump
    }

    /// Account size needed for the current contents
    pub fn required_space(&self) -> usize {
        Self::space_for(self.tokens.len())
    }

    pub fn register(&mut self, mint: Pubkey) -> bool {
        self.tokens.insert(mint)
    }

    pub fn unregister(&mut self, mint: &Pubkey) -> bool {
        self.tokens.remove(mint)
    }

    /// getDepositedTokens
    pub fn deposited_tokens(&self) -> &[Pubkey] {
        self.tokens.as_slice()
    }
}

/// Per-wallet registry of mints the wallet holds shares in.
///
/// PDA derived from ["user_tokens", owner_pubkey].
#[account]
#[derive(Default)]
pub struct UserTokenRegistry {
    pub owner: Pubkey,
    pub tokens: TokenSet,
    pub bump: u8,
}

impl UserTokenRegistry {
    /// Account size needed to hold `len` mints
    pub const fn space_for(len: usize) -> usize {
        8 + // discriminator
        32 + // owner
        token_set_space(len) +
        1 // bump
    }

    /// Account size needed for the current contents
    pub fn required_space(&self) -> usize {
        Self::space_for(self.tokens.len())
    }

    pub fn register(&mut self, mint: Pubkey) -> bool {
        self.tokens.insert(mint)
    }

    pub fn unregister(&mut self, mint: &Pubkey) -> bool {
        self.tokens.remove(mint)
    }

    /// getUserDepositedTokens
    pub fn deposited_tokens(&self) -> &[Pubkey] {
        self.tokens.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mint(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut set = TokenSet::default();
        assert!(set.insert(mint(1)));
        assert!(!set.insert(mint(1)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_swap_and_pop_order() {
        let mut set = TokenSet::default();
        for n in 1..=4 {
            set.insert(mint(n));
        }
        assert!(set.remove(&mint(2)));
        assert_eq!(set.as_slice(), &[mint(1), mint(4), mint(3)]);
        assert!(!set.remove(&mint(2)));
        assert!(set.remove(&mint(3)));
        assert_eq!(set.as_slice(), &[mint(1), mint(4)]);
    }

    #[test]
    fn test_no_fixed_capacity() {
        let mut registry = TokenRegistry::default();
        for n in 0..=200u8 {
            assert!(registry.register(mint(n)));
        }
        assert_eq!(registry.deposited_tokens().len(), 201);
    }

    #[test]
    fn test_required_space_matches_serialized_data() {
        let mut registry = TokenRegistry::default();
        let mut data = Vec::new();
        registry.try_serialize(&mut data).unwrap();
        assert_eq!(data.len(), TokenRegistry::space_for(0));

        for n in 1..=70u8 {
            registry.register(mint(n));
        }
        let mut data = Vec::new();
        registry.try_serialize(&mut data).unwrap();
        assert_eq!(data.len(), registry.required_space());

        let mut user = UserTokenRegistry { owner: mint(99), ..Default::default() };
        for n in 1..=40u8 {
            user.register(mint(n));
        }
        let mut data = Vec::new();
        user.try_serialize(&mut data).unwrap();
        assert_eq!(data.len(), user.required_space());
    }
}
