//! Replayable seeds for the choosers' random generators.

use std::{fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for a chooser's random generator.
///
/// 128 bits, written as 32 hex digits (big-endian). The same seed, well and
/// queue always lead to the same choices, which makes games replayable.
///
/// # Example
///
/// ```
/// use bastet_chooser::seed::ChooserSeed;
/// use rand::Rng as _;
///
/// let seed: ChooserSeed = rand::rng().random();
/// let parsed: ChooserSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChooserSeed([u8; 16]);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseSeedError {
    #[display("invalid hex: expected 32 characters, got {len}")]
    Length { len: usize },
    #[display("invalid hex: {input}")]
    Digits { input: String },
}

impl ChooserSeed {
    #[must_use]
    pub const fn from_u128(n: u128) -> Self {
        Self(n.to_be_bytes())
    }

    #[must_use]
    pub const fn to_u128(self) -> u128 {
        u128::from_be_bytes(self.0)
    }

    pub(crate) fn into_rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl fmt::Display for ChooserSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.to_u128())
    }
}

impl FromStr for ChooserSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseSeedError::Length { len: s.len() });
        }
        // from_str_radix accepts a leading '+', which is not a hex digit
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseSeedError::Digits {
                input: s.to_owned(),
            });
        }
        u128::from_str_radix(s, 16)
            .map(Self::from_u128)
            .map_err(|_| ParseSeedError::Digits {
                input: s.to_owned(),
            })
    }
}

impl Serialize for ChooserSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChooserSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows `rng.random::<ChooserSeed>()`.
impl Distribution<ChooserSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ChooserSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        ChooserSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use rand::RngCore as _;

    use super::*;

    #[test]
    fn test_roundtrip_random_seed() {
        let seed: ChooserSeed = rand::rng().random();
        let serialized = serde_json::to_string(&seed).unwrap();
        let deserialized: ChooserSeed = serde_json::from_str(&serialized).unwrap();
        assert_eq!(seed, deserialized);
    }

    #[test]
    fn test_known_value_sequential_bytes() {
        let seed = ChooserSeed([
            0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
            0x32, 0x10,
        ]);
        let serialized = serde_json::to_string(&seed).unwrap();
        assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");
        assert_eq!(seed.to_u128(), 0x0123_4567_89ab_cdef_fedc_ba98_7654_3210);
    }

    #[test]
    fn test_parse_accepts_uppercase() {
        let seed: ChooserSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
        assert_eq!(seed.to_string(), "0123456789abcdeffedcba9876543210");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "0123".parse::<ChooserSeed>(),
            Err(ParseSeedError::Length { len: 4 })
        );
        assert!(matches!(
            "ghijklmnopqrstuvwxyzghijklmnopqr".parse::<ChooserSeed>(),
            Err(ParseSeedError::Digits { .. })
        ));
        assert!(matches!(
            "+123456789abcdef0123456789abcdef".parse::<ChooserSeed>(),
            Err(ParseSeedError::Digits { .. })
        ));

        let err = serde_json::from_str::<ChooserSeed>("\"\"").unwrap_err();
        assert!(err.to_string().contains("invalid hex"));
    }

    #[test]
    fn test_same_seed_same_stream() {
        let seed = ChooserSeed::from_u128(0x1234_5678_9abc_def0_1122_3344_5566_7788);
        let mut a = seed.into_rng();
        let mut b = seed.into_rng();
        for _ in 0..20 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }
}
