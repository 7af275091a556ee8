use std::collections::BTreeSet;

use serde::Serialize;

/// Upper bound on skills kept from a single extraction.
pub const MAX_SKILLS: usize = 5;

/// Which side of the match a document sits on. Selects the prompt wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillRole {
    /// Skills a job description asks for.
    Required,
    /// Skills a resume offers.
    Candidate,
}

impl SkillRole {
    /// Noun phrase naming the document in the prompt.
    pub fn document_noun(self) -> &'static str {
        match self {
            SkillRole::Required => "job description",
            SkillRole::Candidate => "candidate skillset",
        }
    }
}

/// Ordered skills from one document: at most `MAX_SKILLS`, each trimmed and non-empty.
/// Original casing is kept; comparisons happen case-insensitively in the matcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkillList(Vec<String>);

impl SkillList {
    /// Trims each skill, drops blanks, and keeps the first `MAX_SKILLS` in order.
    /// Duplicates are kept.
    pub fn new<I, S>(skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        SkillList(
            skills
                .into_iter()
                .filter_map(|s| {
                    let trimmed = s.as_ref().trim();
                    (!trimmed.is_empty()).then(|| trimmed.to_string())
                })
                .take(MAX_SKILLS)
                .collect(),
        )
    }

    /// Parses a comma-separated completion such as `"Python, SQL, Docker"`.
    pub fn from_completion(text: &str) -> Self {
        Self::new(text.split(','))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Outcome of matching a required skill list against a candidate's.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub required_skills: SkillList,
    pub candidate_skills: SkillList,
    /// Lower-cased skills present on both sides, sorted.
    pub matched_skills: BTreeSet<String>,
    /// Percentage of distinct required skills the candidate covers, 0–100.
    pub match_score: f64,
}
