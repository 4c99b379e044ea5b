//! Post-retrieval safety filtering.
//!
//! This is the invariant-bearing core of the engine. Filters only ever
//! remove candidates and no similarity score can override a rejection. There
//! is exactly one pipeline implementation; every public operation of the
//! engine goes through [`SafetyFilterPipeline::apply`].
//!
//! The filters are independent and commutative; the fixed order below exists
//! only so cheap checks short-circuit first.

use std::sync::Arc;

use log::debug;

use crate::catalog::{Equipment, ExerciseMetadata, Intensity, Level};
use crate::profile::UserProfile;

/// A candidate with resolved metadata, flowing through filtering and
/// ranking.
#[derive(Debug, Clone)]
pub struct ScoredExercise {
    pub exercise_id: u64,
    pub score: f32,
    pub metadata: Arc<ExerciseMetadata>,
}

/// Optional exact/substring filters taken from the search request.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitFilters<'a> {
    pub level: Option<Level>,
    pub intensity: Option<Intensity>,
    pub target_muscle: Option<&'a str>,
}

/// The deterministic filter sequence: equipment, injury, explicit filters.
pub struct SafetyFilterPipeline;

impl SafetyFilterPipeline {
    /// Apply all filters, returning the surviving candidates in unspecified
    /// order.
    pub fn apply(
        candidates: Vec<ScoredExercise>,
        profile: &UserProfile,
        explicit: &ExplicitFilters<'_>,
    ) -> Vec<ScoredExercise> {
        let fetched = candidates.len();
        let mut equipment_rejected = 0usize;
        let mut injury_rejected = 0usize;
        let mut explicit_rejected = 0usize;

        let surviving: Vec<ScoredExercise> = candidates
            .into_iter()
            .filter(|candidate| {
                if !Self::equipment_feasible(profile, &candidate.metadata) {
                    equipment_rejected += 1;
                    return false;
                }
                if !Self::injury_safe(profile, &candidate.metadata) {
                    injury_rejected += 1;
                    return false;
                }
                if !Self::matches_explicit(explicit, &candidate.metadata) {
                    explicit_rejected += 1;
                    return false;
                }
                true
            })
            .collect();

        debug!(
            "safety filter: {fetched} candidates, rejected {equipment_rejected} equipment / \
             {injury_rejected} injury / {explicit_rejected} explicit, {} surviving",
            surviving.len()
        );
        surviving
    }

    /// A candidate is feasible when the user has gym access, when the
    /// exercise is a home exercise, or when some owned-equipment token
    /// appears in the exercise's equipment description.
    fn equipment_feasible(profile: &UserProfile, metadata: &ExerciseMetadata) -> bool {
        if profile.gym_access {
            return true;
        }
        if metadata.equipment == Equipment::Home {
            return true;
        }
        if profile.equipment_access.is_empty() {
            return false;
        }
        // Constructors lower-case profile tokens, but the fields are public,
        // so re-case here rather than trust the boundary.
        let needed = metadata.equipment_needed.to_lowercase();
        profile
            .equipment_access
            .iter()
            .any(|token| needed.contains(token.to_lowercase().as_str()))
    }

    /// Strict, bidirectional, case-insensitive contraindication check.
    ///
    /// The match is bidirectional because vocabularies on either side may be
    /// more or less specific ("knee pain" vs. catalog tag "knee"). This is
    /// deliberately coarse and can over-reject; see DESIGN.md before
    /// replacing it with a tokenized match.
    fn injury_safe(profile: &UserProfile, metadata: &ExerciseMetadata) -> bool {
        if profile.injuries.is_empty() {
            return true;
        }
        for tag in &metadata.injury_tags {
            let tag = tag.trim().to_lowercase();
            if tag.is_empty() {
                continue;
            }
            for injury in &profile.injuries {
                let injury = injury.to_lowercase();
                if tag.contains(injury.as_str()) || injury.contains(tag.as_str()) {
                    return false;
                }
            }
        }
        true
    }

    /// Each explicit filter applies only when present on the request. The
    /// muscle match checks both language fields since users type either
    /// script.
    fn matches_explicit(explicit: &ExplicitFilters<'_>, metadata: &ExerciseMetadata) -> bool {
        if let Some(level) = explicit.level
            && metadata.level != level
        {
            return false;
        }
        if let Some(intensity) = explicit.intensity
            && metadata.intensity != intensity
        {
            return false;
        }
        if let Some(muscle) = explicit.target_muscle {
            let needle = muscle.trim().to_lowercase();
            if !needle.is_empty()
                && !metadata.muscle.to_lowercase().contains(&needle)
                && !metadata.muscle_fa.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Equipment, Intensity, Level};

    fn metadata(id: u64) -> ExerciseMetadata {
        ExerciseMetadata {
            exercise_id: id,
            name_fa: "پرس سینه".to_string(),
            name_en: "Bench Press".to_string(),
            muscle: "chest".to_string(),
            muscle_fa: "سینه".to_string(),
            level: Level::Intermediate,
            equipment: Equipment::Machine,
            equipment_needed: "Barbell, flat bench".to_string(),
            equipment_needed_fa: "هالتر و نیمکت".to_string(),
            injury_tags: vec!["shoulder".to_string(), "Lower_Back".to_string()],
            category: "bodybuilding_machine".to_string(),
            intensity: Intensity::Heavy,
            gender_suitability: "all".to_string(),
        }
    }

    fn scored(id: u64, meta: ExerciseMetadata) -> ScoredExercise {
        ScoredExercise {
            exercise_id: id,
            score: 0.9,
            metadata: Arc::new(meta),
        }
    }

    #[test]
    fn gym_access_passes_any_equipment() {
        let profile = UserProfile::new(true);
        let out = SafetyFilterPipeline::apply(
            vec![scored(1, metadata(1))],
            &profile,
            &ExplicitFilters::default(),
        );
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn home_exercise_passes_without_gym() {
        let profile = UserProfile::new(false);
        let mut meta = metadata(1);
        meta.equipment = Equipment::Home;
        let out =
            SafetyFilterPipeline::apply(vec![scored(1, meta)], &profile, &ExplicitFilters::default());
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn owned_equipment_token_matches_substring() {
        let profile = UserProfile::new(false).with_equipment(["barbell"]);
        let out = SafetyFilterPipeline::apply(
            vec![scored(1, metadata(1))],
            &profile,
            &ExplicitFilters::default(),
        );
        assert_eq!(out.len(), 1, "lower-cased token must match 'Barbell, flat bench'");
    }

    #[test]
    fn no_gym_no_equipment_rejects_machine_exercise() {
        let profile = UserProfile::new(false);
        let out = SafetyFilterPipeline::apply(
            vec![scored(1, metadata(1))],
            &profile,
            &ExplicitFilters::default(),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn injury_match_rejects_in_both_directions() {
        // user token contains the catalog tag
        let profile = UserProfile::new(true).with_injuries(["shoulder impingement"]);
        let out = SafetyFilterPipeline::apply(
            vec![scored(1, metadata(1))],
            &profile,
            &ExplicitFilters::default(),
        );
        assert!(out.is_empty());

        // catalog tag contains the user token
        let profile = UserProfile::new(true).with_injuries(["back"]);
        let out = SafetyFilterPipeline::apply(
            vec![scored(1, metadata(1))],
            &profile,
            &ExplicitFilters::default(),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn unnormalized_injury_tokens_still_reject() {
        // Struct-literal profiles bypass the lower-casing constructors; the
        // filter must not depend on that normalization.
        let profile = UserProfile {
            gym_access: true,
            injuries: std::collections::BTreeSet::from(["SHOULDER".to_string()]),
            ..UserProfile::default()
        };
        let out = SafetyFilterPipeline::apply(
            vec![scored(1, metadata(1))],
            &profile,
            &ExplicitFilters::default(),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn unnormalized_equipment_tokens_still_match() {
        let profile = UserProfile {
            gym_access: false,
            equipment_access: std::collections::BTreeSet::from(["BARBELL".to_string()]),
            ..UserProfile::default()
        };
        let out = SafetyFilterPipeline::apply(
            vec![scored(1, metadata(1))],
            &profile,
            &ExplicitFilters::default(),
        );
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn injury_match_is_case_insensitive() {
        let profile = UserProfile::new(true).with_injuries(["LOWER_BACK"]);
        let out = SafetyFilterPipeline::apply(
            vec![scored(1, metadata(1))],
            &profile,
            &ExplicitFilters::default(),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn unrelated_injury_passes() {
        let profile = UserProfile::new(true).with_injuries(["knee"]);
        let out = SafetyFilterPipeline::apply(
            vec![scored(1, metadata(1))],
            &profile,
            &ExplicitFilters::default(),
        );
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn explicit_level_and_intensity_are_exact() {
        let profile = UserProfile::new(true);
        let explicit = ExplicitFilters {
            level: Some(Level::Beginner),
            ..ExplicitFilters::default()
        };
        let out = SafetyFilterPipeline::apply(vec![scored(1, metadata(1))], &profile, &explicit);
        assert!(out.is_empty());

        let explicit = ExplicitFilters {
            level: Some(Level::Intermediate),
            intensity: Some(Intensity::Heavy),
            ..ExplicitFilters::default()
        };
        let out = SafetyFilterPipeline::apply(vec![scored(1, metadata(1))], &profile, &explicit);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn target_muscle_matches_either_language() {
        let profile = UserProfile::new(true);
        for needle in ["Chest", "سینه"] {
            let explicit = ExplicitFilters {
                target_muscle: Some(needle),
                ..ExplicitFilters::default()
            };
            let out =
                SafetyFilterPipeline::apply(vec![scored(1, metadata(1))], &profile, &explicit);
            assert_eq!(out.len(), 1, "muscle needle {needle:?} should match");
        }

        let explicit = ExplicitFilters {
            target_muscle: Some("legs"),
            ..ExplicitFilters::default()
        };
        let out = SafetyFilterPipeline::apply(vec![scored(1, metadata(1))], &profile, &explicit);
        assert!(out.is_empty());
    }
}
