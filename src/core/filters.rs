use crate::models::{MatchIntakeData, MentorProfile};

/// Check whether a mentor can serve the mentee at all
///
/// Rules run in fixed order and short-circuit for this mentor only:
/// 1. mentor is on the mentee's exclusion list
/// 2. mentor is inactive
/// 3. mentee gave an availability window and the mentor shares no slot
/// 4. mentee gave goals and the mentor shares neither a specialty topic
///    nor a lived-experience tag
#[inline]
pub fn is_eligible(profile: &MentorProfile, intake: &MatchIntakeData) -> bool {
    if intake.excluded_mentor_ids.contains(&profile.id) {
        return false;
    }

    if !profile.is_active {
        return false;
    }

    if !intake.availability_window.is_empty()
        && profile.availability.is_disjoint(&intake.availability_window)
    {
        return false;
    }

    if !intake.goals.is_empty()
        && profile.specialties.is_disjoint(&intake.goals)
        && profile.story_tags.is_disjoint(&intake.story_tags)
    {
        return false;
    }

    true
}

/// Reduce the pool to mentors eligible at all, preserving input order
///
/// An empty result is a valid outcome, not an error; the caller decides
/// whether to ask the mentee to relax constraints.
pub fn hard_filter(pool: Vec<MentorProfile>, intake: &MatchIntakeData) -> Vec<MentorProfile> {
    pool.into_iter()
        .filter(|profile| is_eligible(profile, intake))
        .collect()
}
