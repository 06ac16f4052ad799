use super::domain::ActiveStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Substrings that place a status in the active family under the substring rule.
pub const ACTIVE_FAMILY_TERMS: [&str; 4] = ["active", "partially", "zero", "filled"];

const STATUS_ALIASES: &[(&str, &str)] = &[
    ("partiallyfilled", "partially filled"),
    ("partially-filled", "partially filled"),
    ("zerofilled", "zero filled"),
    ("zero-filled", "zero filled"),
];

/// How status text is matched against the active family.
///
/// `Substring` accepts any status containing one of [`ACTIVE_FAMILY_TERMS`],
/// which means "Inactive" and "Filled" are accepted too. `Alias` only accepts
/// statuses whose canonical form is exactly one of the [`ActiveStatus`] labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusMatchRule {
    #[default]
    Substring,
    Alias,
}

impl StatusMatchRule {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Substring => "substring",
            Self::Alias => "alias",
        }
    }
}

impl fmt::Display for StatusMatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StatusMatchRule {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "substring" | "contains" => Ok(Self::Substring),
            "alias" | "exact" => Ok(Self::Alias),
            other => Err(format!(
                "unknown status match rule '{other}' (expected substring or alias)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusClassifier {
    rule: StatusMatchRule,
}

impl StatusClassifier {
    pub const fn new(rule: StatusMatchRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> StatusMatchRule {
        self.rule
    }

    pub fn is_active_family(&self, status: &str) -> bool {
        match self.rule {
            StatusMatchRule::Substring => is_active_family(status),
            StatusMatchRule::Alias => ActiveStatus::from_label(&canonicalize(status)).is_some(),
        }
    }
}

/// Case-insensitive substring membership in the active family.
pub fn is_active_family(status: &str) -> bool {
    let lowered = status.to_lowercase();
    ACTIVE_FAMILY_TERMS
        .iter()
        .any(|term| lowered.contains(term))
}

/// Display form of a status: trimmed, aliases collapsed, Title Case.
pub fn canonicalize(status: &str) -> String {
    let lowered = status.trim().to_lowercase();
    let collapsed = STATUS_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or(lowered);
    title_case(&collapsed)
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
pub fn title_case(value: &str) -> String {
    let mut titled = String::with_capacity(value.len());
    let mut previous_alphabetic = false;

    for ch in value.chars() {
        if ch.is_alphabetic() {
            if previous_alphabetic {
                titled.extend(ch.to_lowercase());
            } else {
                titled.extend(ch.to_uppercase());
            }
            previous_alphabetic = true;
        } else {
            titled.push(ch);
            previous_alphabetic = false;
        }
    }

    titled
}
