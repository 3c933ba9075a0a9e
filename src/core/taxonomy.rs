use crate::models::{CommunicationStyle, Stage, Topic};
use std::collections::BTreeSet;

/// Lived-experience themes recognized in story text
///
/// Matched against slug-normalized text on both sides: mentor stories at
/// index build, mentee narrative answers at intake normalization. Terms are
/// slugs themselves so multi-word themes match across whitespace and
/// punctuation.
pub const STORY_TAG_LEXICON: &[&str] = &[
    "immigrant",
    "first-generation",
    "career-change",
    "single-parent",
    "veteran",
    "self-taught",
    "refugee",
    "caregiver",
    "rural",
    "bootstrapped",
    "dropout",
    "late-bloomer",
];

/// Normalize free text into a lowercase hyphen-separated slug
///
/// Runs of non-alphanumeric characters collapse into single hyphens;
/// leading and trailing hyphens are trimmed.
pub fn normalize_tag(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut prev_dash = true;
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            prev_dash = false;
        } else if !prev_dash {
            slug.push('-');
            prev_dash = true;
        }
    }
    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Resolve a free-text topic string against the closed taxonomy
///
/// Accepts common aliases. Returns None for anything outside the taxonomy;
/// callers keep those as free tags rather than rejecting them.
pub fn resolve_topic(raw: &str) -> Option<Topic> {
    match normalize_tag(raw).as_str() {
        "career-transition" | "career-pivot" | "career-switch" => Some(Topic::CareerTransition),
        "leadership" | "leading-teams" => Some(Topic::Leadership),
        "entrepreneurship" | "startup" | "founding" => Some(Topic::Entrepreneurship),
        "technical-growth" | "engineering-growth" | "tech-skills" => Some(Topic::TechnicalGrowth),
        "job-search" | "job-hunting" | "interviewing" => Some(Topic::JobSearch),
        "public-speaking" | "presenting" => Some(Topic::PublicSpeaking),
        "networking" => Some(Topic::Networking),
        "management" | "people-management" => Some(Topic::Management),
        "work-life-balance" | "burnout" => Some(Topic::WorkLifeBalance),
        "fundraising" | "raising-capital" => Some(Topic::Fundraising),
        _ => None,
    }
}

pub fn resolve_stage(raw: &str) -> Option<Stage> {
    match normalize_tag(raw).as_str() {
        "student" => Some(Stage::Student),
        "early-career" | "early" => Some(Stage::EarlyCareer),
        "mid-career" | "mid" => Some(Stage::MidCareer),
        "senior" | "senior-career" => Some(Stage::Senior),
        "executive" | "exec" => Some(Stage::Executive),
        _ => None,
    }
}

pub fn resolve_style(raw: &str) -> Option<CommunicationStyle> {
    match normalize_tag(raw).as_str() {
        "direct" => Some(CommunicationStyle::Direct),
        "supportive" => Some(CommunicationStyle::Supportive),
        "analytical" => Some(CommunicationStyle::Analytical),
        "exploratory" => Some(CommunicationStyle::Exploratory),
        _ => None,
    }
}

/// Position on the career ladder; Unspecified has no position
fn chain_position(stage: Stage) -> Option<u8> {
    match stage {
        Stage::Student => Some(0),
        Stage::EarlyCareer => Some(1),
        Stage::MidCareer => Some(2),
        Stage::Senior => Some(3),
        Stage::Executive => Some(4),
        Stage::Unspecified => None,
    }
}

/// Whether two stages sit next to each other on the career ladder
#[inline]
pub fn stages_adjacent(a: Stage, b: Stage) -> bool {
    match (chain_position(a), chain_position(b)) {
        (Some(x), Some(y)) => x.abs_diff(y) == 1,
        _ => false,
    }
}

/// Extract recognized lived-experience tags from free text
pub fn extract_story_tags(text: &str) -> BTreeSet<String> {
    let normalized = normalize_tag(text);
    let mut tags = BTreeSet::new();
    if normalized.is_empty() {
        return tags;
    }
    for term in STORY_TAG_LEXICON {
        if contains_term(&normalized, term) {
            tags.insert((*term).to_string());
        }
    }
    tags
}

/// Substring search with token boundaries in a hyphen-separated slug
fn contains_term(haystack: &str, term: &str) -> bool {
    haystack.match_indices(term).any(|(start, _)| {
        let end = start + term.len();
        let left_ok = start == 0 || haystack.as_bytes()[start - 1] == b'-';
        let right_ok = end == haystack.len() || haystack.as_bytes()[end] == b'-';
        left_ok && right_ok
    })
}
