//! Content identifiers and their base/update/DLC relationship.
//!
//! A catalog identifier encodes its role positionally: base titles end in
//! `000`, updates end in `800`, and everything else is add-on content whose
//! parent id is found by stepping the fourth-from-last character back by one
//! within its character class. No catalog lookup is involved.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shortest identifier the role rules can be applied to.
pub const MIN_TITLE_ID_LEN: usize = 4;

const BASE_SUFFIX: &str = "000";
const UPDATE_SUFFIX: &str = "800";

/// Errors produced while validating an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TitleIdError {
    /// The identifier is too short or contains characters outside `0-9a-zA-Z`.
    #[error("Malformed identifier '{id}': {reason}")]
    Malformed {
        /// The rejected input.
        id: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

impl TitleIdError {
    fn malformed(id: &str, reason: &'static str) -> Self {
        Self::Malformed {
            id: id.to_string(),
            reason,
        }
    }
}

/// Role of a catalog entry relative to its parent title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleRole {
    /// A base game.
    Base,
    /// A patch for a base game.
    Update,
    /// Downloadable add-on content.
    Dlc,
}

impl TitleRole {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Update => "update",
            Self::Dlc => "dlc",
        }
    }

    /// Parse from the string produced by [`as_str`](Self::as_str).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "base" => Some(Self::Base),
            "update" => Some(Self::Update),
            "dlc" => Some(Self::Dlc),
            _ => None,
        }
    }
}

impl fmt::Display for TitleRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Base => "Base",
            Self::Update => "Update",
            Self::Dlc => "DLC",
        })
    }
}

/// A validated content identifier.
///
/// Holds at least [`MIN_TITLE_ID_LEN`] ASCII alphanumeric characters, so the
/// role and base-id derivations below can never index out of range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TitleId(String);

impl TitleId {
    /// Validate and wrap an identifier.
    pub fn parse(id: &str) -> Result<Self, TitleIdError> {
        check(id)?;
        Ok(Self(id.to_string()))
    }

    /// The identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Role encoded by the identifier's suffix.
    #[must_use]
    pub fn role(&self) -> TitleRole {
        role_of(&self.0)
    }

    /// Identifier of the base title this entry belongs to.
    #[must_use]
    pub fn base(&self) -> Self {
        Self(derive_base(&self.0))
    }

    /// Whether both identifiers resolve to the same base title.
    #[must_use]
    pub fn is_related_to(&self, other: &Self) -> bool {
        self.base() == other.base()
    }
}

impl fmt::Display for TitleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl FromStr for TitleId {
    type Err = TitleIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TitleId {
    type Error = TitleIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        check(&value)?;
        Ok(Self(value))
    }
}

impl From<TitleId> for String {
    fn from(id: TitleId) -> Self {
        id.0
    }
}

impl AsRef<str> for TitleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Classify an identifier as base, update or DLC.
///
/// Any input of four or more characters maps to exactly one role; shorter
/// input is reported as [`TitleIdError::Malformed`].
pub fn classify(id: &str) -> Result<TitleRole, TitleIdError> {
    check_len(id)?;
    Ok(role_of(id))
}

/// Compute the identifier of the base title `id` belongs to.
///
/// Like [`classify`], only the length is checked; a pivot outside
/// `0-9a-zA-Z` is carried over unchanged.
pub fn base_title_id(id: &str) -> Result<String, TitleIdError> {
    check_len(id)?;
    Ok(derive_base(id))
}

fn check_len(id: &str) -> Result<(), TitleIdError> {
    if id.chars().count() < MIN_TITLE_ID_LEN {
        return Err(TitleIdError::malformed(id, "shorter than 4 characters"));
    }
    Ok(())
}

fn check(id: &str) -> Result<(), TitleIdError> {
    check_len(id)?;
    if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(TitleIdError::malformed(id, "expected only 0-9, a-z, A-Z"));
    }
    Ok(())
}

fn role_of(id: &str) -> TitleRole {
    if id.ends_with(BASE_SUFFIX) {
        TitleRole::Base
    } else if id.ends_with(UPDATE_SUFFIX) {
        TitleRole::Update
    } else {
        TitleRole::Dlc
    }
}

/// Caller guarantees at least four characters.
fn derive_base(id: &str) -> String {
    match role_of(id) {
        TitleRole::Base => id.to_string(),
        TitleRole::Update => {
            let mut out: String = id.chars().take(id.chars().count() - 3).collect();
            out.push_str(BASE_SUFFIX);
            out
        }
        TitleRole::Dlc => {
            let chars: Vec<char> = id.chars().collect();
            let pivot = chars.len() - 4;
            let mut out: String = chars[..pivot].iter().collect();
            out.push(step_back(chars[pivot]));
            out.push_str(BASE_SUFFIX);
            out
        }
    }
}

/// One step back within the character's class. `0`, `a`, `A` and anything
/// outside the three classes have no predecessor and are kept as-is.
const fn step_back(c: char) -> char {
    match c {
        '1'..='9' | 'b'..='z' | 'B'..='Z' => (c as u8 - 1) as char,
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> TitleId {
        TitleId::parse(s).unwrap()
    }

    #[test]
    fn test_base_ids_are_their_own_base() {
        for raw in ["01001E500F7FC000", "0100ABCDEF012000", "a000"] {
            assert_eq!(classify(raw).unwrap(), TitleRole::Base);
            assert_eq!(base_title_id(raw).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn test_update_maps_to_base() {
        assert_eq!(classify("01001E500F7FC800").unwrap(), TitleRole::Update);
        assert_eq!(
            base_title_id("01001E500F7FC800").unwrap().as_str(),
            "01001E500F7FC000"
        );
    }

    #[test]
    fn test_dlc_with_zero_pivot_keeps_digit() {
        assert_eq!(classify("01001E500F7FC001").unwrap(), TitleRole::Dlc);
        assert_eq!(
            base_title_id("01001E500F7FC001").unwrap().as_str(),
            "01001E500F7FC000"
        );
    }

    #[test]
    fn test_dlc_decrements_digit() {
        assert_eq!(
            base_title_id("01001E500F7F2001").unwrap().as_str(),
            "01001E500F7F1000"
        );
        assert_eq!(base_title_id("ABC9123").unwrap().as_str(), "ABC8000");
    }

    #[test]
    fn test_dlc_decrements_letters() {
        assert_eq!(
            base_title_id("01001E500F7Fb001").unwrap().as_str(),
            "01001E500F7Fa000"
        );
        assert_eq!(base_title_id("xxxxz123").unwrap().as_str(), "xxxxy000");
        assert_eq!(base_title_id("xxxxB123").unwrap().as_str(), "xxxxA000");
        assert_eq!(base_title_id("xxxxZ00F").unwrap().as_str(), "xxxxY000");
    }

    #[test]
    fn test_dlc_without_predecessor_is_unchanged() {
        assert_eq!(base_title_id("xxxxa123").unwrap().as_str(), "xxxxa000");
        assert_eq!(base_title_id("xxxxA123").unwrap().as_str(), "xxxxA000");
        assert_eq!(base_title_id("xxxx0123").unwrap().as_str(), "xxxx0000");
    }

    #[test]
    fn test_short_input_is_reported_not_panicking() {
        for raw in ["", "0", "00", "800"] {
            assert!(matches!(
                classify(raw),
                Err(TitleIdError::Malformed { .. })
            ));
            assert!(base_title_id(raw).is_err());
        }
    }

    #[test]
    fn test_classify_is_total_over_long_strings() {
        // classify does not restrict the alphabet, only the length
        for raw in ["----", "1800", "x000", "zzzz", "01001E500F7FC-01"] {
            assert!(classify(raw).is_ok());
            assert!(base_title_id(raw).is_ok());
        }
        assert!(TitleId::parse("01001E500F7FC-01").is_err());
    }

    #[test]
    fn test_dlc_with_symbol_pivot_keeps_it() {
        assert_eq!(classify("xxxx-123").unwrap(), TitleRole::Dlc);
        assert_eq!(base_title_id("xxxx-123").unwrap(), "xxxx-000");
        assert_eq!(base_title_id("----").unwrap(), "-000");
        assert_eq!(base_title_id("0100AAAAAAAA\u{e9}001").unwrap(), "0100AAAAAAAA\u{e9}000");
    }

    #[test]
    fn test_related_titles_share_base() {
        let base = id("01001E500F7FC000");
        let update = id("01001E500F7FC800");
        let dlc = id("01001E500F7FD001");
        let other = id("0100AAAAAAAAA000");

        assert!(update.is_related_to(&base));
        assert!(dlc.is_related_to(&base));
        assert!(!other.is_related_to(&base));
    }

    #[test]
    fn test_serde_rejects_malformed() {
        let ok: TitleId = serde_json::from_str("\"01001E500F7FC000\"").unwrap();
        assert_eq!(ok.role(), TitleRole::Base);
        assert!(serde_json::from_str::<TitleId>("\"abc\"").is_err());
    }

    #[test]
    fn test_role_round_trip_names() {
        for role in [TitleRole::Base, TitleRole::Update, TitleRole::Dlc] {
            assert_eq!(TitleRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(TitleRole::Dlc.to_string(), "DLC");
    }
}
