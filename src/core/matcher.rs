use crate::config::ConfigError;
use crate::core::{
    filters::hard_filter,
    ranker::rank,
    scoring::{score_mentor, DEFAULT_ENGAGEMENT_SATURATION},
};
use crate::models::{MatchIntakeData, MatchResult, MentorProfile, WeightConfig, WEIGHT_SUM_TOLERANCE};
use std::sync::{Arc, RwLock};

/// Result of one matching request
#[derive(Debug)]
pub struct MatchOutcome {
    pub matches: Vec<MatchResult>,
    pub total_candidates: usize,
}

/// Matching pipeline orchestrator
///
/// # Pipeline stages
/// 1. Hard filter (exclusions, inactive, availability, topic/story overlap)
/// 2. Five-dimension compatibility scoring
/// 3. Deterministic ranking with match reasons
///
/// Construction validates the weight configuration; the engine refuses to
/// start with weights that are negative or don't sum to 1.0.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: WeightConfig,
    engagement_saturation: f64,
}

impl Matcher {
    pub fn new(weights: WeightConfig, engagement_saturation: f64) -> Result<Self, ConfigError> {
        if let Some((dimension, value)) = weights.negative_dimension() {
            return Err(ConfigError::NegativeWeight { dimension, value });
        }
        let sum = weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum { sum });
        }
        if engagement_saturation < 1.0 {
            return Err(ConfigError::EngagementSaturation {
                value: engagement_saturation,
            });
        }

        Ok(Self {
            weights,
            engagement_saturation,
        })
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: WeightConfig::default(),
            engagement_saturation: DEFAULT_ENGAGEMENT_SATURATION,
        }
    }

    pub fn weights(&self) -> &WeightConfig {
        &self.weights
    }

    /// Run the full pipeline for one intake over one mentor pool
    ///
    /// Pure computation over the snapshot handed in; an empty result list
    /// means no mentor survived the hard filter, which is a valid outcome.
    pub fn find_matches(
        &self,
        intake: &MatchIntakeData,
        pool: Vec<MentorProfile>,
        limit: usize,
    ) -> MatchOutcome {
        let total_candidates = pool.len();

        let scored: Vec<_> = hard_filter(pool, intake)
            .into_iter()
            .map(|profile| {
                let score = score_mentor(&profile, intake, &self.weights, self.engagement_saturation);
                (profile, score)
            })
            .collect();

        let mut matches = rank(scored, &self.weights);
        matches.truncate(limit);

        MatchOutcome {
            matches,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Process-wide matcher slot
///
/// Scoring configuration is swapped only as a whole: a reload validates the
/// replacement and then swaps one reference, so an in-flight request never
/// observes a partial weight update. Invalid replacements leave the current
/// configuration serving.
pub struct MatcherHandle {
    inner: RwLock<Arc<Matcher>>,
}

impl MatcherHandle {
    pub fn new(matcher: Matcher) -> Self {
        Self {
            inner: RwLock::new(Arc::new(matcher)),
        }
    }

    pub fn current(&self) -> Arc<Matcher> {
        match self.inner.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn reload(
        &self,
        weights: WeightConfig,
        engagement_saturation: f64,
    ) -> Result<(), ConfigError> {
        let next = Arc::new(Matcher::new(weights, engagement_saturation)?);
        match self.inner.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CommunicationStyle, Stage, TimeSlot, Topic};
    use std::collections::BTreeSet;

    fn mentor(id: &str, specialties: &[Topic], stage: Stage, chais: u32) -> MentorProfile {
        MentorProfile {
            id: id.to_string(),
            name: format!("Mentor {}", id),
            title: "Advisor".to_string(),
            photo: None,
            linkedin: None,
            story: String::new(),
            specialties: specialties.iter().copied().collect(),
            stage_focus: [stage].into_iter().collect(),
            communication_style: CommunicationStyle::Direct,
            availability: ["monday-evening".parse::<TimeSlot>().unwrap()]
                .into_iter()
                .collect(),
            story_tags: BTreeSet::new(),
            chais_shared: chais,
            is_active: true,
            last_active_at: None,
        }
    }

    fn intake() -> MatchIntakeData {
        MatchIntakeData {
            goals: [Topic::CareerTransition].into_iter().collect(),
            career_stage: Stage::EarlyCareer,
            preferred_style: CommunicationStyle::Direct,
            availability_window: BTreeSet::new(),
            story_tags: ["immigrant".to_string()].into_iter().collect(),
            excluded_mentor_ids: BTreeSet::new(),
        }
    }

    #[test]
    fn test_new_rejects_bad_weight_sum() {
        let weights = WeightConfig {
            expertise: 0.5,
            stage: 0.5,
            engagement: 0.5,
            style: 0.0,
            story: 0.0,
        };
        assert!(matches!(
            Matcher::new(weights, 25.0),
            Err(ConfigError::WeightSum { .. })
        ));
    }

    #[test]
    fn test_new_rejects_negative_weight() {
        let weights = WeightConfig {
            expertise: -0.2,
            stage: 0.4,
            engagement: 0.4,
            style: 0.2,
            story: 0.2,
        };
        assert!(matches!(
            Matcher::new(weights, 25.0),
            Err(ConfigError::NegativeWeight { dimension: "expertise", .. })
        ));
    }

    #[test]
    fn test_new_rejects_bad_saturation() {
        assert!(matches!(
            Matcher::new(WeightConfig::default(), 0.0),
            Err(ConfigError::EngagementSaturation { .. })
        ));
    }

    #[test]
    fn test_new_accepts_within_tolerance() {
        let weights = WeightConfig {
            expertise: 0.3,
            stage: 0.2,
            engagement: 0.15,
            style: 0.1,
            story: 0.25 + 5e-7,
        };
        assert!(Matcher::new(weights, 25.0).is_ok());
    }

    #[test]
    fn test_find_matches_filters_scores_and_ranks() {
        let matcher = Matcher::with_default_weights();
        let intake = intake();

        let pool = vec![
            mentor("weak", &[Topic::CareerTransition], Stage::Executive, 2),
            mentor("strong", &[Topic::CareerTransition], Stage::EarlyCareer, 40),
            mentor("irrelevant", &[Topic::Fundraising], Stage::EarlyCareer, 40),
        ];

        let outcome = matcher.find_matches(&intake, pool, 10);

        assert_eq!(outcome.total_candidates, 3);
        // "irrelevant" shares no topic and no story tag
        assert_eq!(outcome.matches.len(), 2);
        assert_eq!(outcome.matches[0].mentor_id, "strong");
        assert!(outcome.matches[0].total_score > outcome.matches[1].total_score);
    }

    #[test]
    fn test_find_matches_respects_limit() {
        let matcher = Matcher::with_default_weights();
        let pool: Vec<MentorProfile> = (0..20)
            .map(|i| {
                mentor(
                    &format!("m{:02}", i),
                    &[Topic::CareerTransition],
                    Stage::EarlyCareer,
                    i,
                )
            })
            .collect();

        let outcome = matcher.find_matches(&intake(), pool, 5);
        assert_eq!(outcome.matches.len(), 5);
        assert_eq!(outcome.total_candidates, 20);
    }

    #[test]
    fn test_find_matches_empty_pool_is_not_an_error() {
        let matcher = Matcher::with_default_weights();
        let outcome = matcher.find_matches(&intake(), Vec::new(), 10);
        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.total_candidates, 0);
    }

    #[test]
    fn test_reload_swaps_whole_configuration() {
        let handle = MatcherHandle::new(Matcher::with_default_weights());
        let before = handle.current();

        let replacement = WeightConfig {
            expertise: 0.5,
            stage: 0.1,
            engagement: 0.1,
            style: 0.1,
            story: 0.2,
        };
        handle.reload(replacement, 30.0).unwrap();

        // The old reference is untouched; new requests see the replacement
        assert_eq!(before.weights(), &WeightConfig::default());
        assert_eq!(handle.current().weights(), &replacement);
    }

    #[test]
    fn test_reload_rejects_invalid_and_keeps_current() {
        let handle = MatcherHandle::new(Matcher::with_default_weights());

        let bad = WeightConfig {
            expertise: 0.9,
            stage: 0.9,
            engagement: 0.0,
            style: 0.0,
            story: 0.0,
        };
        assert!(handle.reload(bad, 25.0).is_err());
        assert_eq!(handle.current().weights(), &WeightConfig::default());
    }

    #[test]
    fn test_excluded_mentor_never_returned() {
        let matcher = Matcher::with_default_weights();
        let mut intake = intake();
        intake.excluded_mentor_ids.insert("strong".to_string());

        let pool = vec![
            mentor("strong", &[Topic::CareerTransition], Stage::EarlyCareer, 40),
            mentor("other", &[Topic::CareerTransition], Stage::EarlyCareer, 10),
        ];

        let outcome = matcher.find_matches(&intake, pool, 10);
        assert!(outcome.matches.iter().all(|m| m.mentor_id != "strong"));
    }
}
