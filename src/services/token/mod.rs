use std::{borrow::Borrow, collections::BTreeSet, fmt};

use crate::utils::security::mask_token;

pub mod generator;

pub use generator::{RandomTokens, TokenGenerator};

/// Single-use credential printed as a QR code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(String);

impl Token {
    pub const LENGTH: usize = 10;

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Token {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Two tokens issued together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair(pub Token, pub Token);

impl TokenPair {
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        [&self.0, &self.1].into_iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseOutcome {
    Success,
    AlreadyUsed,
    NotActive,
}

/// In-memory ledger of issued tokens.
///
/// A token is unknown until issued, then active, then used. `active` and `used`
/// never share a member; `used` only shrinks on [`TokenStore::reset`].
#[derive(Debug)]
pub struct TokenStore<G = RandomTokens> {
    generator: G,
    active: BTreeSet<Token>,
    used: BTreeSet<Token>,
}

impl TokenStore<RandomTokens> {
    pub fn new() -> Self {
        Self::with_generator(RandomTokens::from_os_rng())
    }
}

impl Default for TokenStore<RandomTokens> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: TokenGenerator> TokenStore<G> {
    pub fn with_generator(generator: G) -> Self {
        Self {
            generator,
            active: BTreeSet::new(),
            used: BTreeSet::new(),
        }
    }

    /// Generates two tokens and marks both active.
    pub fn issue_pair(&mut self) -> TokenPair {
        let first = self.generator.generate();
        let mut second = self.generator.generate();
        while second == first {
            second = self.generator.generate();
        }

        self.active.insert(first.clone());
        self.active.insert(second.clone());
        tracing::debug!(
            first = %mask_token(first.as_str()),
            second = %mask_token(second.as_str()),
            "Issued token pair"
        );

        TokenPair(first, second)
    }

    /// Moves `candidate` from active to used if it is active.
    pub fn use_token(&mut self, candidate: &str) -> UseOutcome {
        if self.used.contains(candidate) {
            return UseOutcome::AlreadyUsed;
        }

        match self.active.take(candidate) {
            Some(token) => {
                self.used.insert(token);
                UseOutcome::Success
            }
            None => UseOutcome::NotActive,
        }
    }

    pub fn reset(&mut self) {
        self.active.clear();
        self.used.clear();
    }

    pub fn is_active(&self, candidate: &str) -> bool {
        self.active.contains(candidate)
    }

    pub fn is_used(&self, candidate: &str) -> bool {
        self.used.contains(candidate)
    }

    pub fn active(&self) -> impl Iterator<Item = &Token> {
        self.active.iter()
    }

    pub fn used(&self) -> impl Iterator<Item = &Token> {
        self.used.iter()
    }
}
