//! Crime type mapping.
//!
//! Maps the upstream `primary_type` and `description` strings to a
//! [`CrimeCategory`]. Classification is an ordered table of rules;
//! the first rule that matches decides the category, and anything no rule
//! matches is counted as [`DEFAULT_CATEGORY`].

use saferoute_crime_models::CrimeCategory;

/// Category assigned when no rule matches.
pub const DEFAULT_CATEGORY: CrimeCategory = CrimeCategory::Theft;

/// How a rule inspects an incident. All comparisons are made against the
/// uppercased inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// The primary type equals one of these strings.
    TypeIs(&'static [&'static str]),
    /// The primary type contains this token.
    TypeContains(&'static str),
    /// The description contains any of these phrases.
    DescriptionContains(&'static [&'static str]),
}

impl Matcher {
    fn matches(self, primary_type: &str, description: &str) -> bool {
        match self {
            Self::TypeIs(types) => types.contains(&primary_type),
            Self::TypeContains(token) => primary_type.contains(token),
            Self::DescriptionContains(phrases) => phrases.iter().any(|p| description.contains(p)),
        }
    }
}

/// One entry in [`CLASSIFICATION_RULES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationRule {
    /// Short identifier, used in logs and tests.
    pub name: &'static str,
    pub matcher: Matcher,
    pub category: CrimeCategory,
}

const fn rule(name: &'static str, matcher: Matcher, category: CrimeCategory) -> ClassificationRule {
    ClassificationRule {
        name,
        matcher,
        category,
    }
}

/// Classification rules in priority order.
pub const CLASSIFICATION_RULES: &[ClassificationRule] = &[
    // ── Hate-crime signals ──────────────────────────────────────────
    rule(
        "sexual-offense-type",
        Matcher::TypeIs(&[
            "SEX OFFENSE",
            "CRIM SEXUAL ASSAULT",
            "STALKING",
            "CRIMINAL SEXUAL ASSAULT",
        ]),
        CrimeCategory::HateCrime,
    ),
    rule(
        "identity-motivated-description",
        Matcher::DescriptionContains(&["GENDER IDENTITY", "SEXUAL ORIENTATION"]),
        CrimeCategory::HateCrime,
    ),
    // ── Exact types ─────────────────────────────────────────────────
    rule(
        "theft-type",
        Matcher::TypeIs(&["THEFT", "BURGLARY", "MOTOR VEHICLE THEFT"]),
        CrimeCategory::Theft,
    ),
    rule(
        "battery-type",
        Matcher::TypeIs(&["BATTERY", "AGGRAVATED BATTERY"]),
        CrimeCategory::Battery,
    ),
    rule(
        "assault-type",
        Matcher::TypeIs(&["ASSAULT", "AGGRAVATED ASSAULT"]),
        CrimeCategory::Assault,
    ),
    rule(
        "robbery-type",
        Matcher::TypeIs(&["ROBBERY", "ARMED ROBBERY"]),
        CrimeCategory::Robbery,
    ),
    // ── Partial matches ─────────────────────────────────────────────
    rule(
        "theft-substring",
        Matcher::TypeContains("THEFT"),
        CrimeCategory::Theft,
    ),
    rule(
        "battery-substring",
        Matcher::TypeContains("BATTERY"),
        CrimeCategory::Battery,
    ),
    rule(
        "assault-substring",
        Matcher::TypeContains("ASSAULT"),
        CrimeCategory::Assault,
    ),
    rule(
        "robbery-substring",
        Matcher::TypeContains("ROBBERY"),
        CrimeCategory::Robbery,
    ),
];

/// Classifies an incident and reports which rule fired.
///
/// The rule is `None` when the incident fell through to
/// [`DEFAULT_CATEGORY`].
#[must_use]
pub fn classify_with_rule(
    primary_type: &str,
    description: &str,
) -> (CrimeCategory, Option<&'static ClassificationRule>) {
    let primary_type = primary_type.to_uppercase();
    let description = description.to_uppercase();

    CLASSIFICATION_RULES
        .iter()
        .find(|r| r.matcher.matches(&primary_type, &description))
        .map_or((DEFAULT_CATEGORY, None), |r| (r.category, Some(r)))
}

/// Maps an upstream primary type and description to a category.
///
/// Case-insensitive and total: every input, including empty strings,
/// yields a category.
#[must_use]
pub fn map_crime_type(primary_type: &str, description: &str) -> CrimeCategory {
    classify_with_rule(primary_type, description).0
}
