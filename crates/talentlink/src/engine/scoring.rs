//! Pure compatibility scoring. Nothing in this module touches storage, so
//! every function can be exercised directly against fixed inputs.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Outcome of comparing a candidate's skill set against a required set.
///
/// `matched` and `missing` carry the normalized (lowercased, trimmed) skill
/// names in sorted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub percentage: u8,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

fn normalize(skills: &[String]) -> BTreeSet<String> {
    skills
        .iter()
        .map(|skill| skill.trim().to_lowercase())
        .filter(|skill| !skill.is_empty())
        .collect()
}

/// Percentage of the required skills the candidate holds.
///
/// An empty requirement always passes at 100; an empty candidate set against
/// a non-empty requirement scores 0 with every requirement reported missing.
pub fn skill_match(candidate_skills: &[String], required_skills: &[String]) -> SkillMatch {
    let required = normalize(required_skills);
    if required.is_empty() {
        return SkillMatch {
            percentage: 100,
            matched: Vec::new(),
            missing: Vec::new(),
        };
    }

    let held = normalize(candidate_skills);
    if held.is_empty() {
        return SkillMatch {
            percentage: 0,
            matched: Vec::new(),
            missing: required.into_iter().collect(),
        };
    }

    let matched: Vec<String> = required.intersection(&held).cloned().collect();
    let missing: Vec<String> = required.difference(&held).cloned().collect();
    let percentage = (100.0 * matched.len() as f64 / required.len() as f64).round() as u8;

    SkillMatch {
        percentage,
        matched,
        missing,
    }
}

/// Experience fit inside a `[min, max]` window.
///
/// Overqualification caps at 85; each missing year below the window costs 20
/// points, floored at 0. A `[0, 0]` window means no requirement.
pub fn experience_match(years: u8, min: u8, max: u8) -> u8 {
    if min == 0 && max == 0 {
        return 100;
    }
    if years >= min && years <= max {
        return 100;
    }
    if years > max {
        return 85;
    }

    let deficit = i32::from(min) - i32::from(years);
    (100 - 20 * deficit).max(0) as u8
}

/// Weighted blend of skill and experience percentages (70/30).
pub fn overall_score(skill_pct: u8, experience_pct: u8) -> u8 {
    (0.7 * f64::from(skill_pct) + 0.3 * f64::from(experience_pct)).round() as u8
}
