// Unit tests for Sonder Match

use sonder_match::core::{
    filters::{hard_filter, is_eligible},
    intake::{normalize, RawIntake},
    scoring::{score_mentor, DEFAULT_ENGAGEMENT_SATURATION},
    taxonomy::{extract_story_tags, normalize_tag, resolve_topic, stages_adjacent},
};
use sonder_match::models::{
    CommunicationStyle, MatchIntakeData, MentorProfile, Stage, TimeSlot, Topic, WeightConfig,
};
use std::collections::BTreeSet;

fn test_mentor(id: &str) -> MentorProfile {
    MentorProfile {
        id: id.to_string(),
        name: format!("Mentor {}", id),
        title: "Advisor".to_string(),
        photo: None,
        linkedin: None,
        story: String::new(),
        specialties: [Topic::CareerTransition].into_iter().collect(),
        stage_focus: [Stage::EarlyCareer].into_iter().collect(),
        communication_style: CommunicationStyle::Direct,
        availability: ["monday-evening".parse::<TimeSlot>().unwrap()]
            .into_iter()
            .collect(),
        story_tags: BTreeSet::new(),
        chais_shared: 10,
        is_active: true,
        last_active_at: None,
    }
}

fn test_intake() -> MatchIntakeData {
    MatchIntakeData {
        goals: [Topic::CareerTransition].into_iter().collect(),
        career_stage: Stage::EarlyCareer,
        preferred_style: CommunicationStyle::Direct,
        availability_window: BTreeSet::new(),
        story_tags: BTreeSet::new(),
        excluded_mentor_ids: BTreeSet::new(),
    }
}

#[test]
fn test_normalize_tag_slugs() {
    assert_eq!(normalize_tag("Career  Transition!"), "career-transition");
    assert_eq!(normalize_tag("work_life_balance"), "work-life-balance");
    assert_eq!(normalize_tag(""), "");
}

#[test]
fn test_resolve_topic_aliases() {
    assert_eq!(resolve_topic("startup"), Some(Topic::Entrepreneurship));
    assert_eq!(resolve_topic("Career Pivot"), Some(Topic::CareerTransition));
    assert_eq!(resolve_topic("no-such-topic"), None);
}

#[test]
fn test_stage_adjacency_chain() {
    assert!(stages_adjacent(Stage::Student, Stage::EarlyCareer));
    assert!(stages_adjacent(Stage::Senior, Stage::Executive));
    assert!(!stages_adjacent(Stage::Student, Stage::Executive));
    assert!(!stages_adjacent(Stage::Unspecified, Stage::Student));
}

#[test]
fn test_story_tag_extraction() {
    let tags = extract_story_tags("A self taught engineer and single parent.");
    assert!(tags.contains("self-taught"));
    assert!(tags.contains("single-parent"));
}

#[test]
fn test_normalize_reports_every_issue() {
    let raw = RawIntake {
        goals: vec![],
        availability: vec!["bad-slot".into()],
        ..RawIntake::default()
    };

    let err = normalize(&raw).unwrap_err();
    let fields: Vec<&str> = err.issues.iter().map(|i| i.field).collect();
    assert!(fields.contains(&"goals"));
    assert!(fields.contains(&"availability"));
}

#[test]
fn test_normalize_keeps_unknown_goals_as_tags() {
    let raw = RawIntake {
        goals: vec!["leadership".into(), "beekeeping".into()],
        ..RawIntake::default()
    };

    let intake = normalize(&raw).unwrap();
    assert!(intake.goals.contains(&Topic::Leadership));
    assert!(intake.story_tags.contains("beekeeping"));
}

#[test]
fn test_filter_excluded_and_inactive() {
    let mut intake = test_intake();
    intake.excluded_mentor_ids.insert("banned".to_string());

    let mut inactive = test_mentor("sleepy");
    inactive.is_active = false;

    let pool = vec![test_mentor("banned"), inactive, test_mentor("ok")];
    let filtered = hard_filter(pool, &intake);

    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, "ok");
}

#[test]
fn test_filter_availability_window() {
    let mut intake = test_intake();
    intake
        .availability_window
        .insert("sunday-morning".parse::<TimeSlot>().unwrap());

    // Mentor only has monday-evening
    assert!(!is_eligible(&test_mentor("m"), &intake));

    intake
        .availability_window
        .insert("monday-evening".parse::<TimeSlot>().unwrap());
    assert!(is_eligible(&test_mentor("m"), &intake));
}

#[test]
fn test_filter_story_overlap_rescues_topic_mismatch() {
    let mut profile = test_mentor("m");
    profile.specialties = [Topic::Fundraising].into_iter().collect();
    profile.story_tags.insert("veteran".to_string());

    let mut intake = test_intake();
    assert!(!is_eligible(&profile, &intake));

    intake.story_tags.insert("veteran".to_string());
    assert!(is_eligible(&profile, &intake));
}

#[test]
fn test_scores_stay_in_unit_interval() {
    let weights = WeightConfig::default();
    let intake = test_intake();

    for chais in [0u32, 7, 25, 400] {
        let mut profile = test_mentor("m");
        profile.chais_shared = chais;
        let score = score_mentor(&profile, &intake, &weights, DEFAULT_ENGAGEMENT_SATURATION);

        for value in [
            score.expertise,
            score.stage,
            score.engagement,
            score.style,
            score.story,
            score.total,
        ] {
            assert!((0.0..=1.0).contains(&value));
        }
    }
}

#[test]
fn test_engagement_never_decreases_with_more_chais() {
    let weights = WeightConfig::default();
    let intake = test_intake();

    let mut previous = -1.0;
    for chais in 0..60u32 {
        let mut profile = test_mentor("m");
        profile.chais_shared = chais;
        let score = score_mentor(&profile, &intake, &weights, DEFAULT_ENGAGEMENT_SATURATION);
        assert!(score.engagement >= previous);
        previous = score.engagement;
    }
}

#[test]
fn test_neutral_defaults_for_empty_preferences() {
    let weights = WeightConfig::default();
    let mut intake = test_intake();
    intake.goals.clear();
    intake.preferred_style = CommunicationStyle::Unspecified;

    let score = score_mentor(&test_mentor("m"), &intake, &weights, DEFAULT_ENGAGEMENT_SATURATION);
    assert_eq!(score.expertise, 0.5);
    assert_eq!(score.style, 0.5);
}
