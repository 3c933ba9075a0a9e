// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CommunicationStyle, DayPart, MatchIntakeData, MatchResult, MentorProfile, ScoreBreakdown, Stage,
    TimeSlot, TimeSlotParseError, Topic, Weekday, WeightConfig, WEIGHT_SUM_TOLERANCE,
};
pub use requests::FindMatchesRequest;
pub use responses::{ErrorResponse, FindMatchesResponse, HealthResponse, RefreshResponse, ValidationErrorResponse};
