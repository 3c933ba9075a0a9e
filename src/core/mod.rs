// Core algorithm exports
pub mod filters;
pub mod intake;
pub mod matcher;
pub mod ranker;
pub mod scoring;
pub mod taxonomy;

pub use filters::{hard_filter, is_eligible};
pub use intake::{normalize, FieldIssue, RawIntake, ValidationError};
pub use matcher::{MatchOutcome, Matcher, MatcherHandle};
pub use ranker::rank;
pub use scoring::{score_mentor, DEFAULT_ENGAGEMENT_SATURATION};
pub use taxonomy::{extract_story_tags, normalize_tag, resolve_stage, resolve_style, resolve_topic, stages_adjacent};
