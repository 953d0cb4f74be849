//! On-chain token amounts.
//!
//! Amounts are stored as `u128` and serialized as decimal strings so they
//! survive JSON transport without precision loss. All arithmetic is checked.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TipError;

/// An on-chain token amount in base units.
///
/// ERC1155 amounts are whole token counts; ERC20 amounts are scaled by the
/// token's decimals before submission (see [`TokenAmount::scaled`]).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenAmount(u128);

impl TokenAmount {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Create an amount from raw base units.
    #[must_use]
    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Return the raw base-unit value.
    #[must_use]
    pub const fn raw(self) -> u128 {
        self.0
    }

    /// Decode a 32-byte big-endian ABI word.
    ///
    /// # Errors
    ///
    /// Returns `TipError::AmountOverflow` if any of the high 16 bytes is
    /// set; values beyond `u128::MAX` are rejected rather than truncated.
    pub fn from_be_word(word: &[u8; 32]) -> Result<Self, TipError> {
        if word[..16].iter().any(|b| *b != 0) {
            return Err(TipError::AmountOverflow(
                "uint256 value exceeds 128 bits".into(),
            ));
        }
        let mut low = [0u8; 16];
        low.copy_from_slice(&word[16..]);
        Ok(Self(u128::from_be_bytes(low)))
    }

    /// Scale by `10^decimals` (ERC20 base-unit conversion).
    ///
    /// # Errors
    ///
    /// Returns `TipError::AmountOverflow` if the scaled value does not fit
    /// in 128 bits.
    pub fn scaled(self, decimals: u32) -> Result<Self, TipError> {
        let factor = 10u128
            .checked_pow(decimals)
            .ok_or_else(|| TipError::AmountOverflow(format!("10^{decimals} overflows")))?;
        let scaled = self.0.checked_mul(factor).ok_or_else(|| {
            TipError::AmountOverflow(format!("{} * 10^{decimals} overflows", self.0))
        })?;
        Ok(Self(scaled))
    }

    /// Checked addition.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }
}

impl From<u64> for TokenAmount {
    fn from(value: u64) -> Self {
        Self(u128::from(value))
    }
}

impl FromStr for TokenAmount {
    type Err = TipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u128>()
            .map(Self)
            .map_err(|_| TipError::InvalidAmount(format!("not a decimal amount: {s}")))
    }
}

impl fmt::Debug for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenAmount({})", self.0)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TokenAmount {
    type Error = TipError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TokenAmount> for String {
    fn from(amount: TokenAmount) -> Self {
        amount.0.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_decimal_string() {
        let amount = TokenAmount::new(12_345_678_901_234_567_890);
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"12345678901234567890\"");
        let parsed: TokenAmount = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, amount);
    }

    #[test]
    fn scales_by_erc20_decimals() {
        let amount = TokenAmount::new(2);
        assert_eq!(
            amount.scaled(18).unwrap(),
            TokenAmount::new(2_000_000_000_000_000_000)
        );
        // Zero decimals is the identity.
        assert_eq!(amount.scaled(0).unwrap(), amount);
    }

    #[test]
    fn scaling_overflow_is_an_error() {
        let amount = TokenAmount::new(u128::MAX / 2);
        assert!(amount.scaled(18).is_err());
    }

    #[test]
    fn be_word_roundtrip() {
        let mut word = [0u8; 32];
        word[16..].copy_from_slice(&42u128.to_be_bytes());
        assert_eq!(
            TokenAmount::from_be_word(&word).unwrap(),
            TokenAmount::new(42)
        );
    }

    #[test]
    fn be_word_rejects_high_bits() {
        let mut word = [0u8; 32];
        word[0] = 1;
        assert!(TokenAmount::from_be_word(&word).is_err());
    }

    #[test]
    fn parse_rejects_negative_and_garbage() {
        assert!("-1".parse::<TokenAmount>().is_err());
        assert!("abc".parse::<TokenAmount>().is_err());
    }
}
