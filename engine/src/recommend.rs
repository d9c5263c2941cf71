//! Recommendations and audit details.
//!
//! Recommendations come from an ordered list of independent rules. Every rule
//! whose predicate holds contributes its messages, in rule order; when no rule
//! fires a single "appears legitimate" message is returned.

use crate::assessment::{RiskFactors, RiskLevel};
use crate::factors::FactorScore;

/// Recommendation emitted when no rule fires.
pub const LEGITIMATE_LOGIN: &str = "Login appears legitimate; no action required";

/// A predicate over factors and level with the messages it contributes.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationRule {
    /// Short identifier, used in logs.
    pub name: &'static str,
    /// When the rule fires.
    pub applies: fn(&RiskFactors, RiskLevel) -> bool,
    /// Messages appended when it fires.
    pub messages: &'static [&'static str],
}

/// The rule list, evaluated top to bottom.
pub const RULES: &[RecommendationRule] = &[
    RecommendationRule {
        name: "elevated_risk",
        applies: |_, level| level.is_elevated(),
        messages: &["Block login and require additional identity verification"],
    },
    RecommendationRule {
        name: "impossible_travel",
        applies: |factors, _| factors.impossible_travel > 50,
        messages: &[
            "Alert security team: impossible travel detected",
            "Require multi-factor authentication",
        ],
    },
    RecommendationRule {
        name: "brute_force",
        applies: |factors, _| factors.brute_force > 50,
        messages: &[
            "Temporarily lock the account",
            "Alert the user about a possible brute force attack",
        ],
    },
    RecommendationRule {
        name: "new_location",
        applies: |factors, _| factors.location_change > 30,
        messages: &["Notify the user of a login from a new location"],
    },
    RecommendationRule {
        name: "unusual_time",
        applies: |factors, _| factors.unusual_time > 30,
        messages: &["Consider additional verification for a login at an unusual time"],
    },
    RecommendationRule {
        name: "medium_risk",
        applies: |_, level| level == RiskLevel::Medium,
        messages: &["Monitor the account for additional suspicious activity"],
    },
];

/// Recommendations for a scored attempt.
#[must_use]
pub fn recommendations(factors: &RiskFactors, level: RiskLevel) -> Vec<String> {
    let fired: Vec<String> = RULES
        .iter()
        .filter(|rule| (rule.applies)(factors, level))
        .inspect(|rule| tracing::trace!(rule = rule.name, "Recommendation rule fired"))
        .flat_map(|rule| rule.messages.iter().map(|m| (*m).to_string()))
        .collect();

    if fired.is_empty() {
        vec![LEGITIMATE_LOGIN.to_string()]
    } else {
        fired
    }
}

/// Evidence strings for every nonzero factor, in factor order.
#[must_use]
pub fn details(scores: &[&FactorScore]) -> Vec<String> {
    scores
        .iter()
        .filter(|score| score.score > 0)
        .filter_map(|score| score.evidence.as_ref())
        .map(ToString::to_string)
        .collect()
}
