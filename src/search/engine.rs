//! The search engine: embed, retrieve, filter, rank.
//!
//! A `SearchEngine` is constructed with its two capability dependencies
//! (embedding provider and vector index) injected; it holds no mutable state
//! across calls and is safely callable from any number of tasks
//! concurrently. The two remote calls are the only suspension points; on a
//! configured timeout each fails with its `Unavailable` error and the search
//! aborts without a partial result.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::catalog::{Equipment, ExerciseCorpus, ExerciseMetadata};
use crate::embedding::Embedder;
use crate::error::{Result, TamrinError};
use crate::index::{Candidate, CoarseFilter, VectorIndex};
use crate::profile::{FitnessGoal, UserProfile};
use crate::search::filter::{ExplicitFilters, SafetyFilterPipeline, ScoredExercise};
use crate::search::rank::rank_and_truncate;
use crate::search::request::{Language, RecommendOptions, SearchRequest};

fn default_max_results() -> usize {
    20
}

fn default_list_max_results() -> usize {
    50
}

fn default_overfetch_factor() -> f32 {
    3.0
}

fn default_min_top_k() -> usize {
    30
}

/// Engine tuning knobs.
///
/// `overfetch_factor` scales the caller's `max_results` into the `top_k`
/// requested from the index; the safety filter can reject a large fraction
/// of candidates, so under-fetching silently starves the result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_max_results")]
    pub default_max_results: usize,
    #[serde(default = "default_list_max_results")]
    pub list_max_results: usize,
    #[serde(default = "default_overfetch_factor")]
    pub overfetch_factor: f32,
    #[serde(default = "default_min_top_k")]
    pub min_top_k: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_max_results: default_max_results(),
            list_max_results: default_list_max_results(),
            overfetch_factor: default_overfetch_factor(),
            min_top_k: default_min_top_k(),
        }
    }
}

/// One ranked search hit. A value object with no further lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub exercise_id: u64,
    pub name_fa: String,
    pub name_en: String,
    /// Provider-native similarity; ordinal, higher is more similar.
    pub score: f32,
    /// The full metadata the result was filtered on.
    pub metadata: ExerciseMetadata,
}

impl SearchResult {
    fn from_scored(scored: ScoredExercise) -> Self {
        let metadata = scored.metadata.as_ref().clone();
        Self {
            exercise_id: scored.exercise_id,
            name_fa: metadata.name_fa.clone(),
            name_en: metadata.name_en.clone(),
            score: scored.score,
            metadata,
        }
    }
}

/// Builder for [`SearchEngine`].
pub struct SearchEngineBuilder {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    corpus: Option<Arc<ExerciseCorpus>>,
    config: EngineConfig,
}

impl SearchEngineBuilder {
    /// Attach a corpus view used to backfill metadata for candidates the
    /// index returned without it.
    pub fn corpus(mut self, corpus: Arc<ExerciseCorpus>) -> Self {
        self.corpus = Some(corpus);
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> SearchEngine {
        SearchEngine {
            embedder: self.embedder,
            index: self.index,
            corpus: self.corpus,
            config: self.config,
        }
    }
}

/// Orchestrates embedding, retrieval, safety filtering and ranking.
pub struct SearchEngine {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    corpus: Option<Arc<ExerciseCorpus>>,
    config: EngineConfig,
}

impl SearchEngine {
    /// Create an engine with default configuration and no corpus view.
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self::builder(embedder, index).build()
    }

    /// Start building an engine.
    pub fn builder(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> SearchEngineBuilder {
        SearchEngineBuilder {
            embedder,
            index,
            corpus: None,
            config: EngineConfig::default(),
        }
    }

    /// Free-text search: embed, retrieve, filter, rank.
    ///
    /// Fails with [`TamrinError::InvalidQuery`] on empty text or
    /// `max_results < 1`, and with the corresponding `Unavailable` error when
    /// either upstream capability fails. Errors are not retried here; retry
    /// policy belongs to the caller. An empty list is a successful outcome.
    pub async fn search(
        &self,
        request: &SearchRequest,
        profile: &UserProfile,
    ) -> Result<Vec<SearchResult>> {
        if request.text.trim().is_empty() {
            return Err(TamrinError::invalid_query("query text must not be empty"));
        }
        self.execute(request, profile).await
    }

    /// Profile-only recommendation. Synthesizes a language-appropriate query
    /// from the profile's goals and training level and applies the profile's
    /// level and preferred intensity as explicit filters.
    pub async fn recommend(
        &self,
        profile: &UserProfile,
        options: &RecommendOptions,
    ) -> Result<Vec<SearchResult>> {
        let request = SearchRequest {
            text: recommendation_query(profile, options.language),
            level: profile.training_level,
            intensity: profile.preferred_intensity,
            target_muscle: None,
            max_results: options.max_results.unwrap_or(self.config.default_max_results),
            language: options.language,
            timeout: options.timeout,
        };
        debug!("recommend synthesized query: {}", request.text);
        self.execute(&request, profile).await
    }

    /// Enumerate safe, feasible exercises for a profile using a broad
    /// generic query and a larger default result cap.
    pub async fn list_safe_exercises(
        &self,
        profile: &UserProfile,
        options: &RecommendOptions,
    ) -> Result<Vec<SearchResult>> {
        let request = SearchRequest {
            text: broad_query(options.language).to_string(),
            level: None,
            intensity: None,
            target_muscle: None,
            max_results: options.max_results.unwrap_or(self.config.list_max_results),
            language: options.language,
            timeout: options.timeout,
        };
        self.execute(&request, profile).await
    }

    async fn execute(
        &self,
        request: &SearchRequest,
        profile: &UserProfile,
    ) -> Result<Vec<SearchResult>> {
        if request.max_results < 1 {
            return Err(TamrinError::invalid_query("max_results must be at least 1"));
        }

        let vector = self.embed_text(&request.text, request.timeout).await?;
        let top_k = self.top_k(request.max_results);
        let coarse = self.coarse_filter(request, profile);
        let candidates = self
            .query_index(&vector, coarse.as_ref(), top_k, request.timeout)
            .await?;
        debug!(
            "retrieved {} candidates (top_k={}, coarse filter: {})",
            candidates.len(),
            top_k,
            coarse.is_some()
        );

        let resolved = self.resolve_metadata(candidates);
        let explicit = ExplicitFilters {
            level: request.level,
            intensity: request.intensity,
            target_muscle: request.target_muscle.as_deref(),
        };
        let surviving = SafetyFilterPipeline::apply(resolved, profile, &explicit);
        let ranked = rank_and_truncate(surviving, request.max_results);
        Ok(ranked.into_iter().map(SearchResult::from_scored).collect())
    }

    async fn embed_text(&self, text: &str, timeout: Option<Duration>) -> Result<Vec<f32>> {
        let vector = match timeout {
            Some(limit) => tokio::time::timeout(limit, self.embedder.embed(text))
                .await
                .map_err(|_| {
                    TamrinError::embedding_unavailable(format!(
                        "embedding timed out after {limit:?}"
                    ))
                })??,
            None => self.embedder.embed(text).await?,
        };

        let expected = self.embedder.dimension();
        if vector.len() != expected {
            return Err(TamrinError::embedding_unavailable(format!(
                "embedding provider returned dimension {}, declared {expected}",
                vector.len()
            )));
        }
        if vector.iter().any(|v| !v.is_finite()) {
            return Err(TamrinError::embedding_unavailable(
                "embedding provider returned non-finite values",
            ));
        }
        Ok(vector)
    }

    async fn query_index(
        &self,
        vector: &[f32],
        filter: Option<&CoarseFilter>,
        top_k: usize,
        timeout: Option<Duration>,
    ) -> Result<Vec<Candidate>> {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, self.index.query(vector, filter, top_k))
                .await
                .map_err(|_| {
                    TamrinError::index_unavailable(format!(
                        "vector index query timed out after {limit:?}"
                    ))
                })?,
            None => self.index.query(vector, filter, top_k).await,
        }
    }

    /// Over-fetch from the index so local filtering does not starve the
    /// result set.
    fn top_k(&self, max_results: usize) -> usize {
        let scaled = (max_results as f32 * self.config.overfetch_factor).ceil() as usize;
        scaled.max(self.config.min_top_k).max(max_results)
    }

    /// Only predicates the local pipeline re-checks verbatim go into the
    /// coarse filter. Restricting to home equipment is safe solely when the
    /// user has neither gym access nor owned equipment, where the local
    /// equipment filter admits nothing else either.
    fn coarse_filter(&self, request: &SearchRequest, profile: &UserProfile) -> Option<CoarseFilter> {
        let mut filter = CoarseFilter {
            equipment: None,
            level: request.level,
            intensity: request.intensity,
        };
        if !profile.gym_access && profile.equipment_access.is_empty() {
            filter.equipment = Some(Equipment::Home);
        }
        if filter.is_empty() { None } else { Some(filter) }
    }

    /// Attach metadata to candidates. Index metadata is authoritative; the
    /// corpus view only backfills candidates retrieved without a payload. A
    /// candidate with no metadata from either source cannot be proven safe
    /// and is dropped.
    fn resolve_metadata(&self, candidates: Vec<Candidate>) -> Vec<ScoredExercise> {
        candidates
            .into_iter()
            .filter_map(|candidate| {
                let metadata = match candidate.metadata {
                    Some(metadata) => Arc::new(metadata),
                    None => match self
                        .corpus
                        .as_ref()
                        .and_then(|corpus| corpus.get(candidate.exercise_id))
                    {
                        Some(metadata) => metadata,
                        None => {
                            warn!(
                                "dropping candidate {} with no metadata from index or corpus",
                                candidate.exercise_id
                            );
                            return None;
                        }
                    },
                };
                Some(ScoredExercise {
                    exercise_id: candidate.exercise_id,
                    score: candidate.score,
                    metadata,
                })
            })
            .collect()
    }
}

/// Canned recommendation phrasing. First matching goal in the fixed
/// priority order wins: weight loss, then muscle gain, then generic.
fn recommendation_query(profile: &UserProfile, language: Language) -> String {
    let goal_phrase = if profile.goals.contains(&FitnessGoal::WeightLoss) {
        match language {
            Language::Fa => "تمرینات هوازی برای کاهش وزن",
            Language::En => "cardio exercises for weight loss",
        }
    } else if profile.goals.contains(&FitnessGoal::MuscleGain) {
        match language {
            Language::Fa => "تمرینات قدرتی عضله سازی",
            Language::En => "strength training muscle building exercises",
        }
    } else {
        broad_query(language)
    };

    match (language, profile.training_level) {
        (_, None) => goal_phrase.to_string(),
        (Language::Fa, Some(level)) => {
            let level_fa = match level {
                crate::catalog::Level::Beginner => "مبتدی",
                crate::catalog::Level::Intermediate => "متوسط",
                crate::catalog::Level::Advanced => "پیشرفته",
            };
            format!("{goal_phrase} سطح {level_fa}")
        }
        (Language::En, Some(level)) => {
            let level_en = match level {
                crate::catalog::Level::Beginner => "for beginners",
                crate::catalog::Level::Intermediate => "intermediate level",
                crate::catalog::Level::Advanced => "advanced level",
            };
            format!("{goal_phrase} {level_en}")
        }
    }
}

fn broad_query(language: Language) -> &'static str {
    match language {
        Language::Fa => "تمرینات ورزشی تناسب اندام بدنسازی",
        Language::En => "fitness exercises workout training",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Level;

    #[test]
    fn weight_loss_takes_precedence_over_muscle_gain() {
        let profile = UserProfile::new(true)
            .with_goal(FitnessGoal::MuscleGain)
            .with_goal(FitnessGoal::WeightLoss);
        let query = recommendation_query(&profile, Language::En);
        assert!(query.contains("weight loss"), "got: {query}");
    }

    #[test]
    fn muscle_gain_beats_generic() {
        let profile = UserProfile::new(true)
            .with_goal(FitnessGoal::GeneralFitness)
            .with_goal(FitnessGoal::MuscleGain);
        let query = recommendation_query(&profile, Language::En);
        assert!(query.contains("muscle building"), "got: {query}");
    }

    #[test]
    fn no_goals_falls_back_to_broad_query() {
        let profile = UserProfile::new(true);
        assert_eq!(
            recommendation_query(&profile, Language::En),
            "fitness exercises workout training"
        );
        assert_eq!(
            recommendation_query(&profile, Language::Fa),
            "تمرینات ورزشی تناسب اندام بدنسازی"
        );
    }

    #[test]
    fn training_level_is_appended() {
        let profile = UserProfile::new(true).with_training_level(Level::Beginner);
        let query = recommendation_query(&profile, Language::En);
        assert!(query.ends_with("for beginners"), "got: {query}");
        let query_fa = recommendation_query(&profile, Language::Fa);
        assert!(query_fa.contains("مبتدی"), "got: {query_fa}");
    }

    #[test]
    fn top_k_overfetches_with_floor() {
        let embedder = Arc::new(crate::embedding::HashingEmbedder::new(8));
        let index = Arc::new(crate::index::InMemoryVectorIndex::new(8));
        let engine = SearchEngine::new(embedder, index);
        // floor of min_top_k
        assert_eq!(engine.top_k(5), 30);
        // 3x scaling beyond the floor
        assert_eq!(engine.top_k(20), 60);
    }

    #[test]
    fn coarse_filter_restricts_to_home_only_without_any_equipment() {
        let embedder = Arc::new(crate::embedding::HashingEmbedder::new(8));
        let index = Arc::new(crate::index::InMemoryVectorIndex::new(8));
        let engine = SearchEngine::new(embedder, index);
        let request = SearchRequest::new("leg day");

        let no_equipment = UserProfile::new(false);
        let filter = engine.coarse_filter(&request, &no_equipment).unwrap();
        assert_eq!(filter.equipment, Some(Equipment::Home));

        // Owned equipment can make non-home exercises feasible, so the
        // coarse filter must not exclude them.
        let with_equipment = UserProfile::new(false).with_equipment(["dumbbell"]);
        assert!(engine.coarse_filter(&request, &with_equipment).is_none());

        let gym = UserProfile::new(true);
        assert!(engine.coarse_filter(&request, &gym).is_none());
    }
}
