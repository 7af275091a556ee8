//! Skill Matcher — pure, case-insensitive overlap between required and candidate skills.
//!
//! Algorithm:
//! 1. Lower-case and trim both lists, collapse duplicates into sets.
//! 2. matched = required ∩ candidate
//! 3. score = 0 if the required set is empty, else |matched| / |required| × 100

use std::collections::BTreeSet;

use crate::skills::models::{MatchResult, SkillList};

fn normalized_set(skills: &SkillList) -> BTreeSet<String> {
    skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Scores `candidate` against `required`. Total and deterministic.
pub fn match_skills(required: &SkillList, candidate: &SkillList) -> MatchResult {
    let required_set = normalized_set(required);

    // Guard before dividing: nothing required means nothing to match.
    if required_set.is_empty() {
        return MatchResult {
            required_skills: required.clone(),
            candidate_skills: candidate.clone(),
            matched_skills: BTreeSet::new(),
            match_score: 0.0,
        };
    }

    let candidate_set = normalized_set(candidate);
    let matched_skills: BTreeSet<String> = required_set
        .intersection(&candidate_set)
        .cloned()
        .collect();

    let match_score = 100.0 * matched_skills.len() as f64 / required_set.len() as f64;

    MatchResult {
        required_skills: required.clone(),
        candidate_skills: candidate.clone(),
        matched_skills,
        match_score,
    }
}
