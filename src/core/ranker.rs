use crate::models::{MatchResult, MentorProfile, ScoreBreakdown, WeightConfig};
use std::cmp::Ordering;

/// Two scores within this distance are treated as tied
pub const SCORE_EPSILON: f64 = 1e-6;

/// Minimum `weight x score` contribution for a dimension to be named as a
/// match reason
const REASON_THRESHOLD: f64 = 0.05;

const MAX_REASONS: usize = 3;

/// Tie-break priority when totals are equal within epsilon
const TIE_BREAK_ORDER: [Dimension; 5] = [
    Dimension::Expertise,
    Dimension::Story,
    Dimension::Stage,
    Dimension::Engagement,
    Dimension::Style,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dimension {
    Expertise,
    Stage,
    Engagement,
    Style,
    Story,
}

impl Dimension {
    fn value(&self, score: &ScoreBreakdown) -> f64 {
        match self {
            Dimension::Expertise => score.expertise,
            Dimension::Stage => score.stage,
            Dimension::Engagement => score.engagement,
            Dimension::Style => score.style,
            Dimension::Story => score.story,
        }
    }

    fn weight(&self, weights: &WeightConfig) -> f64 {
        match self {
            Dimension::Expertise => weights.expertise,
            Dimension::Stage => weights.stage,
            Dimension::Engagement => weights.engagement,
            Dimension::Style => weights.style,
            Dimension::Story => weights.story,
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            Dimension::Expertise => "Deep experience in your goal areas",
            Dimension::Stage => "Shares your career stage",
            Dimension::Engagement => "Seasoned mentor with many chais shared",
            Dimension::Style => "Matches your preferred communication style",
            Dimension::Story => "Similar background story",
        }
    }
}

/// Order scored mentors into the final result list
///
/// Primary order is total descending. Totals within `SCORE_EPSILON` fall
/// through the sub-score cascade expertise > story > stage > engagement >
/// style, then mentor id ascending, so identical inputs always produce an
/// identical ordering.
pub fn rank(scored: Vec<(MentorProfile, ScoreBreakdown)>, weights: &WeightConfig) -> Vec<MatchResult> {
    let mut scored = scored;
    scored.sort_by(compare_scored);

    scored
        .into_iter()
        .map(|(profile, score)| {
            let match_reasons = match_reasons(&score, weights);
            MatchResult {
                mentor_id: profile.id,
                name: profile.name,
                title: profile.title,
                photo: profile.photo,
                linkedin: profile.linkedin,
                story: profile.story,
                specialties: profile.specialties,
                chais_shared: profile.chais_shared,
                total_score: score.total,
                expertise_score: score.expertise,
                stage_score: score.stage,
                engagement_score: score.engagement,
                style_score: score.style,
                story_score: score.story,
                match_reasons,
            }
        })
        .collect()
}

fn compare_scored(a: &(MentorProfile, ScoreBreakdown), b: &(MentorProfile, ScoreBreakdown)) -> Ordering {
    // Descending on total
    let ordering = cmp_descending(a.1.total, b.1.total);
    if ordering != Ordering::Equal {
        return ordering;
    }

    for dimension in TIE_BREAK_ORDER {
        let ordering = cmp_descending(dimension.value(&a.1), dimension.value(&b.1));
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    // Stable, reproducible last resort
    a.0.id.cmp(&b.0.id)
}

#[inline]
fn cmp_descending(a: f64, b: f64) -> Ordering {
    if (a - b).abs() < SCORE_EPSILON {
        return Ordering::Equal;
    }
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Pick at most three reason lines from the highest-contributing dimensions
fn match_reasons(score: &ScoreBreakdown, weights: &WeightConfig) -> Vec<String> {
    let mut contributions: Vec<(Dimension, f64)> = TIE_BREAK_ORDER
        .iter()
        .map(|dimension| (*dimension, dimension.weight(weights) * dimension.value(score)))
        .collect();

    // Stable sort keeps the tie-break priority for equal contributions
    contributions.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let reasons: Vec<String> = contributions
        .into_iter()
        .filter(|(_, contribution)| *contribution > REASON_THRESHOLD)
        .take(MAX_REASONS)
        .map(|(dimension, _)| dimension.reason().to_string())
        .collect();

    if reasons.is_empty() {
        vec!["Broad experience match".to_string()]
    } else {
        reasons
    }
}
