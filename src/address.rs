use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Lowest and highest 7-bit addresses not reserved by the I2C specification.
pub const MIN_ADDRESS: u16 = 0x03;
pub const MAX_ADDRESS: u16 = 0x77;

/// Factory default address of HYT221/HYT271 sensors.
pub const DEFAULT_ADDRESS: SlaveAddress = SlaveAddress(0x28);

/// A validated 7-bit I2C slave address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlaveAddress(u16);

impl SlaveAddress {
    pub fn new(addr: i64) -> Result<Self> {
        if addr < i64::from(MIN_ADDRESS) || addr > i64::from(MAX_ADDRESS) {
            return Err(Error::AddressOutOfRange(addr));
        }
        // range check above guarantees the value fits
        Ok(Self(addr as u16))
    }

    #[inline]
    pub fn get(self) -> u16 {
        self.0
    }
}

impl Default for SlaveAddress {
    fn default() -> Self {
        DEFAULT_ADDRESS
    }
}

impl fmt::Display for SlaveAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

impl FromStr for SlaveAddress {
    type Err = Error;

    /// Accepts the same notation as C's `strtol` with base 0: decimal, `0x` hexadecimal or
    /// `0`-prefixed octal, with optional leading whitespace and sign.
    fn from_str(s: &str) -> Result<Self> {
        match parse_integer(s) {
            Some(n) => Self::new(n),
            None => Err(Error::BadAddress(s.into())),
        }
    }
}

fn is_c_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}

/// Returns `None` unless the whole string is a single integer. Values too large for `i64`
/// saturate, like `strtol` does.
fn parse_integer(s: &str) -> Option<i64> {
    let s = s.trim_start_matches(is_c_space);
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let hex = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_hexdigit()));
    let (radix, digits) = match hex {
        Some(rest) => (16, rest),
        // a lone "0x" leaves the 'x' unparsed, which then fails the digit check
        None if s.starts_with('0') => (8, s),
        None => (10, s),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    let magnitude = digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .try_fold(0i64, |acc, d| {
            acc.checked_mul(i64::from(radix))?.checked_add(i64::from(d))
        });
    Some(match (magnitude, negative) {
        (Some(m), false) => m,
        (Some(m), true) => -m,
        (None, false) => i64::MAX,
        (None, true) => i64::MIN,
    })
}
