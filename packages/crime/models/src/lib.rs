#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Crime category taxonomy and severity scoring.
//!
//! The map frontend colors and filters incidents by a small, closed set of
//! categories. Every upstream crime type is normalized into exactly one
//! [`CrimeCategory`], and each category carries a fixed display severity.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Severity assigned to anything that does not name a known category.
pub const DEFAULT_SEVERITY: u8 = 3;

/// Normalized crime classification used for map coloring and filtering.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CrimeCategory {
    /// Sexual offenses, stalking, and gender/orientation-motivated incidents
    HateCrime,
    /// Theft, burglary, and motor vehicle theft
    Theft,
    /// Battery and aggravated battery
    Battery,
    /// Assault and aggravated assault
    Assault,
    /// Robbery and armed robbery
    Robbery,
}

impl CrimeCategory {
    /// Returns the display severity for this category, from 3 (theft) to
    /// 10 (hate crime).
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::HateCrime => 10,
            Self::Robbery => 8,
            Self::Assault => 7,
            Self::Battery => 5,
            Self::Theft => DEFAULT_SEVERITY,
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::HateCrime,
            Self::Theft,
            Self::Battery,
            Self::Assault,
            Self::Robbery,
        ]
    }
}

/// Looks up the severity for a category given by name (e.g. `"ROBBERY"`).
///
/// Names outside the enumeration score [`DEFAULT_SEVERITY`].
#[must_use]
pub fn severity_for_name(name: &str) -> u8 {
    name.parse::<CrimeCategory>().map_or(DEFAULT_SEVERITY, CrimeCategory::severity)
}
