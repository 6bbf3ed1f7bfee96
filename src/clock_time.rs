//! `HHMMSSss` clock-time codec.
//!
//! Tick sources label events with an 8-digit same-day clock reading: two
//! digits each of hours, minutes, seconds and hundredths. Indicators work on
//! the decoded integer, hundredths of a second since midnight:
//!
//! ```text
//! num = HH * 360000 + MM * 6000 + SS * 100 + ss
//! ```
//!
//! There is no date or timezone; the value is an ordinal within one session.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize, Serializer};

use crate::Error;

/// Hundredths of a second in one second.
pub const SECOND: u32 = 100;
/// Hundredths of a second in one minute.
pub const MINUTE: u32 = 60 * SECOND;
/// Hundredths of a second in one hour.
pub const HOUR: u32 = 60 * MINUTE;
/// Hundredths of a second in one day. Exclusive upper bound of the scheme.
pub const DAY: u32 = 24 * HOUR;

const WIDTH: usize = 8;

/// Decodes clock-time text into hundredths of a second since midnight.
///
/// Text shorter than 8 digits is left-padded with zeros, so `"8450000"`
/// reads as `08:45:00.00`.
///
/// # Errors
///
/// [`Error::InvalidFormat`] if the text is empty, longer than 8 characters,
/// contains a non-digit, or has an hour, minute or second group out of range.
///
/// # Example
///
/// ```
/// use tick_ta::clock_time;
///
/// assert_eq!(clock_time::decode("08450000"), Ok(3_150_000));
/// assert_eq!(clock_time::decode("8450000"), Ok(3_150_000));
/// assert!(clock_time::decode("0845x000").is_err());
/// ```
pub fn decode(text: &str) -> Result<u32, Error> {
    let invalid = || Error::InvalidFormat(text.to_owned());

    let bytes = text.as_bytes();
    if bytes.is_empty() || bytes.len() > WIDTH || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }

    let mut digits = [0u32; WIDTH];
    for (slot, byte) in digits[WIDTH - bytes.len()..].iter_mut().zip(bytes) {
        *slot = u32::from(byte - b'0');
    }

    let group = |i: usize| digits[i] * 10 + digits[i + 1];
    let (hh, mm, ss, cs) = (group(0), group(2), group(4), group(6));

    if hh >= 24 || mm >= 60 || ss >= 60 {
        return Err(invalid());
    }

    Ok(hh * HOUR + mm * MINUTE + ss * SECOND + cs)
}

/// Encodes hundredths of a second since midnight as 8-digit `HHMMSSss` text.
///
/// # Errors
///
/// [`Error::InvalidFormat`] if `num` is not below [`DAY`].
///
/// # Example
///
/// ```
/// use tick_ta::clock_time;
///
/// assert_eq!(clock_time::encode(3_150_000).unwrap(), "08450000");
/// assert!(clock_time::encode(clock_time::DAY).is_err());
/// ```
pub fn encode(num: u32) -> Result<String, Error> {
    ClockTime::from_hundredths(num).map(|time| time.to_string())
}

/// A decoded clock time: hundredths of a second since midnight.
///
/// Always below [`DAY`]. Parses from and displays as `HHMMSSss` text, and
/// (de)serializes as that text.
///
/// # Example
///
/// ```
/// use tick_ta::ClockTime;
///
/// let time: ClockTime = "09013050".parse().unwrap();
/// assert_eq!(time.hundredths(), 9 * 360_000 + 6_000 + 30 * 100 + 50);
/// assert_eq!(time.to_string(), "09013050");
/// ```
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default, Debug, Deserialize)]
#[serde(try_from = "String")]
pub struct ClockTime(u32);

impl ClockTime {
    /// Midnight, `00000000`.
    pub const MIDNIGHT: Self = Self(0);

    /// Wraps a raw timestamp.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidFormat`] if `hundredths` is not below [`DAY`].
    pub fn from_hundredths(hundredths: u32) -> Result<Self, Error> {
        if hundredths < DAY {
            Ok(Self(hundredths))
        } else {
            Err(Error::InvalidFormat(hundredths.to_string()))
        }
    }

    /// Callers guarantee `hundredths < DAY`.
    #[inline]
    pub(crate) fn from_hundredths_unchecked(hundredths: u32) -> Self {
        debug_assert!(hundredths < DAY, "clock time out of range: {hundredths}");
        Self(hundredths)
    }

    /// Hundredths of a second since midnight.
    #[inline]
    #[must_use]
    pub fn hundredths(self) -> u32 {
        self.0
    }
}

impl FromStr for ClockTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s).map(Self)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hh = self.0 / HOUR;
        let mm = self.0 % HOUR / MINUTE;
        let ss = self.0 % MINUTE / SECOND;
        let cs = self.0 % SECOND;
        write!(f, "{hh:02}{mm:02}{ss:02}{cs:02}")
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
