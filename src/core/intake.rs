use crate::core::taxonomy::{extract_story_tags, normalize_tag, resolve_stage, resolve_style, resolve_topic};
use crate::models::{CommunicationStyle, MatchIntakeData, Stage, TimeSlot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Raw mentee questionnaire answers as submitted by the intake UI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawIntake {
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(rename = "careerStage", default)]
    pub career_stage: Option<String>,
    #[serde(rename = "preferredStyle", default)]
    pub preferred_style: Option<String>,
    #[serde(default)]
    pub availability: Vec<String>,
    #[serde(default)]
    pub story: Option<String>,
    #[serde(rename = "excludedMentorIds", default)]
    pub excluded_mentor_ids: Vec<String>,
}

/// A single offending intake field
#[derive(Debug, Clone, Serialize)]
pub struct FieldIssue {
    pub field: &'static str,
    pub message: String,
}

impl FieldIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Intake rejected; carries every offending field so the caller can render
/// all issues at once
#[derive(Debug, Clone, Error)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let summary = self
            .issues
            .iter()
            .map(|issue| format!("{}: {}", issue.field, issue.message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "intake validation failed: {}", summary)
    }
}

/// Canonicalize raw answers into `MatchIntakeData`, or fail with the full
/// list of field issues
///
/// Rules:
/// - at least one goal is required; goals outside the topic taxonomy are
///   kept as free story tags, not rejected
/// - an unknown or absent career stage becomes `Unspecified`, same for the
///   preferred style
/// - an empty availability list is allowed (any time), but malformed slot
///   strings are rejected
/// - excluded mentor ids default to the empty set
pub fn normalize(raw: &RawIntake) -> Result<MatchIntakeData, ValidationError> {
    let mut issues = Vec::new();

    let mut goals = BTreeSet::new();
    let mut story_tags = BTreeSet::new();

    if raw.goals.iter().all(|g| g.trim().is_empty()) {
        issues.push(FieldIssue::new("goals", "at least one goal is required"));
    }
    for goal in &raw.goals {
        if goal.trim().is_empty() {
            continue;
        }
        match resolve_topic(goal) {
            Some(topic) => {
                goals.insert(topic);
            }
            None => {
                // Outside the taxonomy: keep as a best-effort free tag
                let tag = normalize_tag(goal);
                if !tag.is_empty() {
                    story_tags.insert(tag);
                }
            }
        }
    }

    let career_stage = match raw.career_stage.as_deref().map(str::trim) {
        None | Some("") => Stage::Unspecified,
        Some(value) => resolve_stage(value).unwrap_or(Stage::Unspecified),
    };

    let preferred_style = match raw.preferred_style.as_deref().map(str::trim) {
        None | Some("") => CommunicationStyle::Unspecified,
        Some(value) => resolve_style(value).unwrap_or(CommunicationStyle::Unspecified),
    };

    let mut availability_window = BTreeSet::new();
    for slot in &raw.availability {
        if slot.trim().is_empty() {
            continue;
        }
        match slot.parse::<TimeSlot>() {
            Ok(parsed) => {
                availability_window.insert(parsed);
            }
            Err(err) => issues.push(FieldIssue::new("availability", err.to_string())),
        }
    }

    if let Some(story) = raw.story.as_deref() {
        story_tags.extend(extract_story_tags(story));
    }

    let excluded_mentor_ids: BTreeSet<String> = raw
        .excluded_mentor_ids
        .iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();

    if !issues.is_empty() {
        return Err(ValidationError { issues });
    }

    Ok(MatchIntakeData {
        goals,
        career_stage,
        preferred_style,
        availability_window,
        story_tags,
        excluded_mentor_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Topic;

    fn raw_with_goals(goals: &[&str]) -> RawIntake {
        RawIntake {
            goals: goals.iter().map(|g| g.to_string()).collect(),
            ..RawIntake::default()
        }
    }

    #[test]
    fn test_normalize_minimal() {
        let raw = raw_with_goals(&["career transition"]);
        let intake = normalize(&raw).unwrap();

        assert!(intake.goals.contains(&Topic::CareerTransition));
        assert_eq!(intake.career_stage, Stage::Unspecified);
        assert_eq!(intake.preferred_style, CommunicationStyle::Unspecified);
        assert!(intake.availability_window.is_empty());
        assert!(intake.excluded_mentor_ids.is_empty());
    }

    #[test]
    fn test_normalize_full() {
        let raw = RawIntake {
            goals: vec!["leadership".into(), "quantum knitting".into()],
            career_stage: Some("Early Career".into()),
            preferred_style: Some("direct".into()),
            availability: vec!["mon-evening".into(), "Saturday Morning".into()],
            story: Some("First generation college grad, self taught engineer.".into()),
            excluded_mentor_ids: vec!["mentor_9".into(), "  ".into()],
        };

        let intake = normalize(&raw).unwrap();

        assert_eq!(intake.goals.len(), 1);
        assert!(intake.goals.contains(&Topic::Leadership));
        // Unknown goal kept as a free tag alongside extracted story themes
        assert!(intake.story_tags.contains("quantum-knitting"));
        assert!(intake.story_tags.contains("first-generation"));
        assert!(intake.story_tags.contains("self-taught"));
        assert_eq!(intake.career_stage, Stage::EarlyCareer);
        assert_eq!(intake.preferred_style, CommunicationStyle::Direct);
        assert_eq!(intake.availability_window.len(), 2);
        assert_eq!(intake.excluded_mentor_ids.len(), 1);
        assert!(intake.excluded_mentor_ids.contains("mentor_9"));
    }

    #[test]
    fn test_normalize_requires_goals() {
        let err = normalize(&RawIntake::default()).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].field, "goals");
    }

    #[test]
    fn test_normalize_collects_all_issues() {
        let raw = RawIntake {
            goals: vec![],
            availability: vec!["someday-noon".into(), "mon-midnight".into()],
            ..RawIntake::default()
        };

        let err = normalize(&raw).unwrap_err();

        // One issue for the missing goals, one per malformed slot
        assert_eq!(err.issues.len(), 3);
        assert!(err.issues.iter().any(|i| i.field == "goals"));
        assert_eq!(err.issues.iter().filter(|i| i.field == "availability").count(), 2);
    }

    #[test]
    fn test_unknown_stage_defaults_to_unspecified() {
        let mut raw = raw_with_goals(&["networking"]);
        raw.career_stage = Some("galactic overlord".into());
        let intake = normalize(&raw).unwrap();
        assert_eq!(intake.career_stage, Stage::Unspecified);
    }

    #[test]
    fn test_all_unknown_goals_still_valid() {
        // Free-text-only goals pass validation; they land in story tags and
        // the scorer treats the empty goal set as "no topic preference"
        let raw = raw_with_goals(&["interpretive dance"]);
        let intake = normalize(&raw).unwrap();
        assert!(intake.goals.is_empty());
        assert!(intake.story_tags.contains("interpretive-dance"));
    }
}
