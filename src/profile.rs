//! Per-search user profile snapshot.
//!
//! The profile is a value object assembled once per request. Loosely typed
//! inputs (the web layer historically stored `injuries` and
//! `equipment_access` as JSON-encoded string blobs) are parsed and normalized
//! here, at the construction boundary. The filter pipeline still matches
//! case-insensitively on its own, since the fields are public and a profile
//! may be built without these constructors.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::{Intensity, Level};

/// Fitness goal hint used when synthesizing recommendation queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    WeightLoss,
    MuscleGain,
    GeneralFitness,
}

/// Physical, equipment and injury profile of the user running a search.
///
/// Token sets are lower-cased and trimmed at construction. The engine holds
/// no reference to the profile beyond the call it was passed to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub gym_access: bool,
    /// Owned-equipment tokens, only meaningful when `gym_access` is false.
    #[serde(default, deserialize_with = "deserialize_token_set")]
    pub equipment_access: BTreeSet<String>,
    /// Injury tokens, e.g. "knee" or "lower back".
    #[serde(default, deserialize_with = "deserialize_token_set")]
    pub injuries: BTreeSet<String>,
    #[serde(default)]
    pub training_level: Option<Level>,
    #[serde(default)]
    pub preferred_intensity: Option<Intensity>,
    #[serde(default)]
    pub goals: Vec<FitnessGoal>,
}

impl UserProfile {
    /// Create an empty profile with the given gym access.
    pub fn new(gym_access: bool) -> Self {
        Self {
            gym_access,
            ..Self::default()
        }
    }

    /// Set owned-equipment tokens. Tokens are trimmed and lower-cased.
    pub fn with_equipment<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.equipment_access = normalize_tokens(tokens);
        self
    }

    /// Set injury tokens. Tokens are trimmed and lower-cased.
    pub fn with_injuries<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.injuries = normalize_tokens(tokens);
        self
    }

    /// Set the training level.
    pub fn with_training_level(mut self, level: Level) -> Self {
        self.training_level = Some(level);
        self
    }

    /// Set the preferred intensity.
    pub fn with_preferred_intensity(mut self, intensity: Intensity) -> Self {
        self.preferred_intensity = Some(intensity);
        self
    }

    /// Append a fitness goal hint.
    pub fn with_goal(mut self, goal: FitnessGoal) -> Self {
        self.goals.push(goal);
        self
    }
}

fn normalize_tokens<I, S>(tokens: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|token| token.as_ref().trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Accepts either a JSON array of strings or a legacy JSON-encoded string
/// blob (`"[\"knee\"]"`), normalizing tokens either way.
fn deserialize_token_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TokenBlob {
        List(Vec<String>),
        Raw(String),
    }

    let tokens = match Option::<TokenBlob>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(TokenBlob::List(tokens)) => tokens,
        Some(TokenBlob::Raw(blob)) => {
            let blob = blob.trim();
            if blob.is_empty() {
                Vec::new()
            } else {
                serde_json::from_str::<Vec<String>>(blob).map_err(serde::de::Error::custom)?
            }
        }
    };
    Ok(normalize_tokens(tokens))
}
