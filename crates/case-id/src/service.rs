//! Case id and notification id implementations.

use crate::{CaseIdError, CaseIdResult, CASE_ID_PREFIX, CASE_ID_RANDOM_LEN};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::{fmt, str::FromStr};

const CASE_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Identifier of an emergency case.
///
/// Generated ids always have the canonical `ER-XXXXXXXXX` form (see
/// [`CaseId::is_canonical`]). Ids supplied by a caller through [`CaseId::parse`] only
/// need to be non-blank and are kept byte-for-byte, so that records imported from other
/// systems keep their original reference.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaseId(String);

impl CaseId {
    /// Generates a new canonical case id using the thread-local RNG.
    ///
    /// Collisions are possible in principle (36^9 combinations); the case store
    /// re-draws when a generated id is already taken.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Generates a new canonical case id from the given RNG.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let random: String = (0..CASE_ID_RANDOM_LEN)
            .map(|_| CASE_ID_ALPHABET[rng.gen_range(0..CASE_ID_ALPHABET.len())] as char)
            .collect();
        Self(format!("{CASE_ID_PREFIX}-{random}"))
    }

    /// Accepts a caller-supplied case id.
    ///
    /// # Errors
    ///
    /// Returns [`CaseIdError::InvalidInput`] if `input` is empty or whitespace only.
    pub fn parse(input: &str) -> CaseIdResult<Self> {
        if input.trim().is_empty() {
            return Err(CaseIdError::InvalidInput(
                "case id cannot be blank".into(),
            ));
        }
        Ok(Self(input.to_owned()))
    }

    /// Returns true if `input` has the generated form `ER-` + 9 of `[A-Z0-9]`.
    pub fn is_canonical(input: &str) -> bool {
        let Some(random) = input
            .strip_prefix(CASE_ID_PREFIX)
            .and_then(|rest| rest.strip_prefix('-'))
        else {
            return false;
        };

        random.len() == CASE_ID_RANDOM_LEN
            && random
                .bytes()
                .all(|b| matches!(b, b'A'..=b'Z' | b'0'..=b'9'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the fragment shown after `#` in operator messages.
    ///
    /// This is the second `-`-separated segment of the id. Ids without a hyphen are
    /// shown whole.
    pub fn display_suffix(&self) -> &str {
        self.0.split('-').nth(1).unwrap_or(&self.0)
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CaseId {
    type Err = CaseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CaseId::parse(s)
    }
}

impl AsRef<str> for CaseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for CaseId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for CaseId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CaseId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CaseId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        CaseId::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Identifier of a notification: a millisecond timestamp made strictly increasing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct NotificationId(u64);

impl NotificationId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NotificationId {
    type Err = CaseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Self).map_err(|e| {
            CaseIdError::InvalidInput(format!("invalid notification id '{s}': {e}"))
        })
    }
}

/// Hands out [`NotificationId`]s derived from the wall clock.
///
/// Two notifications emitted in the same millisecond still get distinct ids: when the
/// clock has not moved past the previous id, the previous id plus one is used instead.
#[derive(Clone, Debug, Default)]
pub struct NotificationIdGenerator {
    last: Option<NotificationId>,
}

impl NotificationIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next id as if the current time were `now`.
    pub fn next_id_at(&mut self, now: DateTime<Utc>) -> NotificationId {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);

        let id = match self.last {
            Some(prev) if millis <= prev.0 => NotificationId(prev.0.saturating_add(1)),
            _ => NotificationId(millis),
        };

        self.last = Some(id);
        id
    }

    /// The most recently issued id, if any.
    pub fn last(&self) -> Option<NotificationId> {
        self.last
    }
}
