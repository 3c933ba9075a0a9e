use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Mentorship topic taxonomy
///
/// Closed vocabulary; goal strings that don't resolve to one of these are
/// kept as free story tags instead of being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    CareerTransition,
    Leadership,
    Entrepreneurship,
    TechnicalGrowth,
    JobSearch,
    PublicSpeaking,
    Networking,
    Management,
    WorkLifeBalance,
    Fundraising,
}

/// Career stage of a mentee, or the stages a mentor focuses on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Student,
    EarlyCareer,
    MidCareer,
    Senior,
    Executive,
    Unspecified,
}

/// Preferred mentoring conversation style
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommunicationStyle {
    Direct,
    Supportive,
    Analytical,
    Exploratory,
    Unspecified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayPart {
    Morning,
    Afternoon,
    Evening,
}

impl DayPart {
    fn as_str(&self) -> &'static str {
        match self {
            DayPart::Morning => "morning",
            DayPart::Afternoon => "afternoon",
            DayPart::Evening => "evening",
        }
    }
}

/// A weekly availability slot, e.g. "tuesday-evening"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot {
    pub day: Weekday,
    pub part: DayPart,
}

#[derive(Debug, Clone, Error)]
#[error("unrecognized time slot {0:?}, expected \"<weekday>-<morning|afternoon|evening>\"")]
pub struct TimeSlotParseError(pub String);

impl FromStr for TimeSlot {
    type Err = TimeSlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let slug = crate::core::taxonomy::normalize_tag(s);
        let (day_str, part_str) = slug
            .rsplit_once('-')
            .ok_or_else(|| TimeSlotParseError(s.to_string()))?;

        let day = match day_str {
            "monday" | "mon" => Weekday::Monday,
            "tuesday" | "tue" | "tues" => Weekday::Tuesday,
            "wednesday" | "wed" => Weekday::Wednesday,
            "thursday" | "thu" | "thurs" => Weekday::Thursday,
            "friday" | "fri" => Weekday::Friday,
            "saturday" | "sat" => Weekday::Saturday,
            "sunday" | "sun" => Weekday::Sunday,
            _ => return Err(TimeSlotParseError(s.to_string())),
        };

        let part = match part_str {
            "morning" => DayPart::Morning,
            "afternoon" => DayPart::Afternoon,
            "evening" => DayPart::Evening,
            _ => return Err(TimeSlotParseError(s.to_string())),
        };

        Ok(TimeSlot { day, part })
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.day.as_str(), self.part.as_str())
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = TimeSlotParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.to_string()
    }
}

/// Mentor profile snapshot used for matching
///
/// Owned by the mentor index; built from the hosted profile store during
/// refresh with specialties resolved through the topic taxonomy and story
/// tags precomputed from the mentor's story text. Match requests only read
/// these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub story: String,
    #[serde(default)]
    pub specialties: BTreeSet<Topic>,
    #[serde(rename = "stageFocus", default)]
    pub stage_focus: BTreeSet<Stage>,
    #[serde(rename = "communicationStyle", default = "default_style")]
    pub communication_style: CommunicationStyle,
    #[serde(default)]
    pub availability: BTreeSet<TimeSlot>,
    #[serde(rename = "storyTags", default)]
    pub story_tags: BTreeSet<String>,
    #[serde(rename = "chaisShared", default)]
    pub chais_shared: u32,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
    #[serde(rename = "lastActiveAt", default)]
    pub last_active_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn default_true() -> bool {
    true
}

fn default_style() -> CommunicationStyle {
    CommunicationStyle::Unspecified
}

/// Canonicalized mentee intake, one per matching request
///
/// Produced by `core::intake::normalize` and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchIntakeData {
    pub goals: BTreeSet<Topic>,
    #[serde(rename = "careerStage")]
    pub career_stage: Stage,
    #[serde(rename = "preferredStyle")]
    pub preferred_style: CommunicationStyle,
    #[serde(rename = "availabilityWindow")]
    pub availability_window: BTreeSet<TimeSlot>,
    #[serde(rename = "storyTags")]
    pub story_tags: BTreeSet<String>,
    #[serde(rename = "excludedMentorIds")]
    pub excluded_mentor_ids: BTreeSet<String>,
}

/// Per-mentor scorer output; every field is in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub expertise: f64,
    pub stage: f64,
    pub engagement: f64,
    pub style: f64,
    pub story: f64,
    pub total: f64,
}

/// Ranked match returned to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "mentorId")]
    pub mentor_id: String,
    pub name: String,
    pub title: String,
    pub photo: Option<String>,
    pub linkedin: Option<String>,
    pub story: String,
    pub specialties: BTreeSet<Topic>,
    #[serde(rename = "chaisShared")]
    pub chais_shared: u32,
    #[serde(rename = "totalScore")]
    pub total_score: f64,
    #[serde(rename = "expertiseScore")]
    pub expertise_score: f64,
    #[serde(rename = "stageScore")]
    pub stage_score: f64,
    #[serde(rename = "engagementScore")]
    pub engagement_score: f64,
    #[serde(rename = "styleScore")]
    pub style_score: f64,
    #[serde(rename = "storyScore")]
    pub story_score: f64,
    #[serde(rename = "matchReasons")]
    pub match_reasons: Vec<String>,
}

/// Scoring weights for the five compatibility dimensions
///
/// Must be non-negative and sum to 1.0 within `WEIGHT_SUM_TOLERANCE`;
/// `Matcher::new` rejects anything else. Swapped only as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    pub expertise: f64,
    pub stage: f64,
    pub engagement: f64,
    pub style: f64,
    pub story: f64,
}

/// Tolerance applied when checking that weights sum to 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

impl WeightConfig {
    pub fn sum(&self) -> f64 {
        self.expertise + self.stage + self.engagement + self.style + self.story
    }

    /// Name and value of the first negative weight, if any
    pub fn negative_dimension(&self) -> Option<(&'static str, f64)> {
        [
            ("expertise", self.expertise),
            ("stage", self.stage),
            ("engagement", self.engagement),
            ("style", self.style),
            ("story", self.story),
        ]
        .into_iter()
        .find(|(_, w)| *w < 0.0)
    }

    pub fn is_normalized(&self) -> bool {
        self.negative_dimension().is_none() && (self.sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            expertise: 0.30,
            story: 0.25,
            stage: 0.20,
            engagement: 0.15,
            style: 0.10,
        }
    }
}
