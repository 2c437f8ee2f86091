//! ISBN normalisation
//!
//! Turns user input ("978-2013944762", "2-01-394476-5 broché", ...) into a
//! validated 13-digit ISBN. Pure; no I/O.

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Separator characters removed from the ISBN token
const SEPARATORS: [char; 4] = ['-', ':', '.', ';'];

/// Why a raw string was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IsbnError {
    #[error("ISBN too short: {0} characters after cleaning")]
    TooShort(usize),

    #[error("ISBN contains non-digit characters: {0}")]
    NonDigit(String),

    #[error("ISBN must have 10 or 13 digits, got {0}")]
    BadLength(usize),

    #[error("ISBN-13 must start with 978 or 979: {0}")]
    BadPrefix(String),

    #[error("ISBN check digit mismatch: {0}")]
    Checksum(String),
}

/// Validated 13-digit ISBN
///
/// Always starts with a 978/979 prefix, so the numeric value is exactly
/// 13 digits wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Isbn13(u64);

impl Isbn13 {
    /// Normalise raw input, see [`normalize`]
    pub fn parse(raw: &str) -> Result<Self, IsbnError> {
        normalize(raw)
    }

    /// Numeric value (`9782013944762`)
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The 13 digits as a string
    pub fn digits(&self) -> String {
        format!("{:013}", self.0)
    }

    /// EAN prefix ("978" or "979")
    pub fn prefix(&self) -> u16 {
        (self.0 / 10_000_000_000) as u16
    }

    /// Digits after the EAN prefix (registration group onwards, check digit excluded)
    pub fn body(&self) -> String {
        self.digits()[3..12].to_string()
    }
}

impl fmt::Display for Isbn13 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:013}", self.0)
    }
}

impl Serialize for Isbn13 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

/// Normalise a raw ISBN string to [`Isbn13`]
///
/// 1. Trim, keep the token before the first space.
/// 2. Drop `- : . ;`.
/// 3. Reject tokens shorter than 10 characters or with any non-digit.
/// 4. ISBN-10 → `978` prefix + recomputed check digit; ISBN-13 must carry a
///    valid check digit.
pub fn normalize(raw: &str) -> Result<Isbn13, IsbnError> {
    let token = raw.trim().split(' ').next().unwrap_or_default();
    let cleaned: String = token.chars().filter(|c| !SEPARATORS.contains(c)).collect();

    if cleaned.chars().count() < 10 {
        return Err(IsbnError::TooShort(cleaned.chars().count()));
    }

    if !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Err(IsbnError::NonDigit(cleaned));
    }
    let digits: Vec<u8> = cleaned.bytes().map(|b| b - b'0').collect();

    match digits.len() {
        10 => {
            let mut thirteen = vec![9, 7, 8];
            thirteen.extend_from_slice(&digits[..9]);
            let check = isbn13_check_digit(&thirteen);
            thirteen.push(check);
            Ok(Isbn13(to_number(&thirteen)))
        }
        13 => {
            if !matches!(&digits[..3], [9, 7, 8] | [9, 7, 9]) {
                return Err(IsbnError::BadPrefix(cleaned));
            }
            if isbn13_check_digit(&digits[..12]) != digits[12] {
                return Err(IsbnError::Checksum(cleaned));
            }
            Ok(Isbn13(to_number(&digits)))
        }
        n => Err(IsbnError::BadLength(n)),
    }
}

/// EAN-13 check digit over the first 12 digits (weights 1,3,1,3,...)
fn isbn13_check_digit(first_twelve: &[u8]) -> u8 {
    let sum: u32 = first_twelve
        .iter()
        .enumerate()
        .map(|(i, &d)| if i % 2 == 0 { d as u32 } else { d as u32 * 3 })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

fn to_number(digits: &[u8]) -> u64 {
    digits.iter().fold(0u64, |acc, &d| acc * 10 + d as u64)
}
