use rand::{Rng, SeedableRng, distr::Alphanumeric, rngs::StdRng};

use crate::services::token::Token;

/// Source of fresh token strings.
pub trait TokenGenerator {
    fn generate(&mut self) -> Token;
}

/// Uniform sampling over the 62-character alphanumeric alphabet.
#[derive(Debug)]
pub struct RandomTokens<R = StdRng> {
    rng: R,
}

impl RandomTokens<StdRng> {
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl<R: Rng> RandomTokens<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> TokenGenerator for RandomTokens<R> {
    fn generate(&mut self) -> Token {
        let value: String = (&mut self.rng)
            .sample_iter(&Alphanumeric)
            .take(Token::LENGTH)
            .map(char::from)
            .collect();
        Token(value)
    }
}
