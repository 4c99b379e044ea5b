//! Ranking and truncation of filtered candidates.

use std::cmp::Ordering as CmpOrdering;

use crate::search::filter::ScoredExercise;

/// Sort by score descending, ties by `exercise_id` ascending for
/// reproducibility, then truncate to `max_results`. Returning fewer than
/// `max_results` survivors is a valid outcome, not an error.
pub fn rank_and_truncate(
    mut candidates: Vec<ScoredExercise>,
    max_results: usize,
) -> Vec<ScoredExercise> {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(CmpOrdering::Equal)
            .then_with(|| a.exercise_id.cmp(&b.exercise_id))
    });
    candidates.truncate(max_results);
    candidates
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::{Equipment, ExerciseMetadata, Intensity, Level};

    fn scored(id: u64, score: f32) -> ScoredExercise {
        ScoredExercise {
            exercise_id: id,
            score,
            metadata: Arc::new(ExerciseMetadata {
                exercise_id: id,
                name_fa: String::new(),
                name_en: String::new(),
                muscle: String::new(),
                muscle_fa: String::new(),
                level: Level::Beginner,
                equipment: Equipment::Home,
                equipment_needed: String::new(),
                equipment_needed_fa: String::new(),
                injury_tags: Vec::new(),
                category: String::new(),
                intensity: Intensity::Light,
                gender_suitability: String::new(),
            }),
        }
    }

    #[test]
    fn sorts_descending_by_score() {
        let ranked = rank_and_truncate(vec![scored(1, 0.2), scored(2, 0.9), scored(3, 0.5)], 10);
        let ids: Vec<u64> = ranked.iter().map(|r| r.exercise_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn ties_break_by_id_ascending() {
        let ranked = rank_and_truncate(vec![scored(9, 0.5), scored(2, 0.5), scored(5, 0.5)], 10);
        let ids: Vec<u64> = ranked.iter().map(|r| r.exercise_id).collect();
        assert_eq!(ids, vec![2, 5, 9]);
    }

    #[test]
    fn truncates_to_max_results() {
        let ranked = rank_and_truncate(vec![scored(1, 0.1), scored(2, 0.2), scored(3, 0.3)], 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].exercise_id, 3);
    }

    #[test]
    fn fewer_survivors_than_max_is_fine() {
        let ranked = rank_and_truncate(vec![scored(1, 0.1)], 20);
        assert_eq!(ranked.len(), 1);
    }
}
