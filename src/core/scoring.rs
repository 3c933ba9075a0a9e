use crate::core::taxonomy::stages_adjacent;
use crate::models::{CommunicationStyle, MatchIntakeData, MentorProfile, ScoreBreakdown, Stage, WeightConfig};

/// Chais shared at which a mentor counts as fully proven
pub const DEFAULT_ENGAGEMENT_SATURATION: f64 = 25.0;

/// Score one mentor against one intake
///
/// Pure function; missing or empty mentor attributes score as the neutral
/// or empty value for their dimension, never as an error. Every sub-score
/// and the weighted total land in [0, 1] as long as the weights are
/// normalized.
pub fn score_mentor(
    profile: &MentorProfile,
    intake: &MatchIntakeData,
    weights: &WeightConfig,
    engagement_saturation: f64,
) -> ScoreBreakdown {
    let expertise = expertise_score(profile, intake);
    let stage = stage_score(profile, intake.career_stage);
    let engagement = engagement_score(profile.chais_shared, engagement_saturation);
    let style = style_score(profile.communication_style, intake.preferred_style);
    let story = story_score(profile, intake);

    let total = (expertise * weights.expertise
        + stage * weights.stage
        + engagement * weights.engagement
        + style * weights.style
        + story * weights.story)
        .clamp(0.0, 1.0);

    ScoreBreakdown {
        expertise,
        stage,
        engagement,
        style,
        story,
        total,
    }
}

/// Shared specialty topics over requested goals; 0.5 neutral when the
/// mentee expressed no topic preference
#[inline]
fn expertise_score(profile: &MentorProfile, intake: &MatchIntakeData) -> f64 {
    if intake.goals.is_empty() {
        return 0.5;
    }
    let shared = profile.specialties.intersection(&intake.goals).count();
    shared as f64 / intake.goals.len() as f64
}

/// 1.0 for a focused stage, 0.5 for an adjacent one, 0.5 neutral when the
/// mentee didn't specify a stage
#[inline]
fn stage_score(profile: &MentorProfile, mentee_stage: Stage) -> f64 {
    if mentee_stage == Stage::Unspecified {
        return 0.5;
    }
    if profile.stage_focus.contains(&mentee_stage) {
        return 1.0;
    }
    if profile
        .stage_focus
        .iter()
        .any(|focus| stages_adjacent(*focus, mentee_stage))
    {
        return 0.5;
    }
    0.0
}

/// Saturating transform of completed-session count
///
/// Monotonic in chais_shared and capped at 1.0 so session count alone
/// cannot dominate the total.
#[inline]
fn engagement_score(chais_shared: u32, saturation: f64) -> f64 {
    if saturation <= 0.0 {
        return 1.0;
    }
    (chais_shared as f64 / saturation).min(1.0)
}

#[inline]
fn style_score(mentor_style: CommunicationStyle, preferred: CommunicationStyle) -> f64 {
    if preferred == CommunicationStyle::Unspecified {
        return 0.5;
    }
    if mentor_style == preferred {
        1.0
    } else {
        0.0
    }
}

/// Shared lived-experience tags over the mentee's tag count
///
/// The "sonder" signal: rewards common background even with zero topic
/// overlap. 0.0 when the mentee surfaced no tags.
#[inline]
fn story_score(profile: &MentorProfile, intake: &MatchIntakeData) -> f64 {
    let shared = profile.story_tags.intersection(&intake.story_tags).count();
    shared as f64 / intake.story_tags.len().max(1) as f64
}
