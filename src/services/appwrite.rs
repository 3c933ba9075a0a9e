use crate::core::taxonomy::{extract_story_tags, normalize_tag, resolve_stage, resolve_style, resolve_topic};
use crate::models::{CommunicationStyle, MentorProfile, TimeSlot};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::time::Duration;
use thiserror::Error;

/// Documents fetched per page when listing mentor profiles
const PAGE_SIZE: usize = 100;

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Appwrite API client
///
/// Handles all communication with the platform's hosted Appwrite database,
/// which owns mentor profile CRUD and the approval workflow. This service
/// only reads: it lists approved mentor documents to feed index refreshes.
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub mentor_profiles: String,
}

/// Raw mentor document as stored by the profile CRUD
///
/// Everything beyond id and name is loosely typed free text maintained by
/// moderators; `into_profile` resolves it through the taxonomy.
#[derive(Debug, Clone, Deserialize)]
pub struct MentorDocument {
    #[serde(rename = "$id", alias = "id")]
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
    pub specialties: Vec<String>,
    #[serde(rename = "stageFocus", default)]
    pub stage_focus: Vec<String>,
    #[serde(rename = "communicationStyle", default)]
    pub communication_style: Option<String>,
    #[serde(default)]
    pub availability: Vec<String>,
    #[serde(rename = "storyTags", default)]
    pub story_tags: Vec<String>,
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

impl MentorDocument {
    /// Resolve the loose document into a matching-ready profile
    ///
    /// Lenient by design: specialty strings outside the taxonomy become
    /// free story tags, unknown stages and malformed availability slots are
    /// dropped with a log line, and story tags are the union of the
    /// moderator-set tags and themes extracted from the story text.
    pub fn into_profile(self) -> MentorProfile {
        let mut specialties = BTreeSet::new();
        let mut story_tags: BTreeSet<String> = extract_story_tags(&self.story);

        for raw in &self.specialties {
            match resolve_topic(raw) {
                Some(topic) => {
                    specialties.insert(topic);
                }
                None => {
                    let tag = normalize_tag(raw);
                    if !tag.is_empty() {
                        story_tags.insert(tag);
                    }
                }
            }
        }

        for raw in &self.story_tags {
            let tag = normalize_tag(raw);
            if !tag.is_empty() {
                story_tags.insert(tag);
            }
        }

        let stage_focus = self
            .stage_focus
            .iter()
            .filter_map(|raw| {
                let stage = resolve_stage(raw);
                if stage.is_none() {
                    tracing::debug!("Dropping unknown stage {:?} on mentor {}", raw, self.id);
                }
                stage
            })
            .collect();

        let communication_style = self
            .communication_style
            .as_deref()
            .and_then(resolve_style)
            .unwrap_or(CommunicationStyle::Unspecified);

        let availability = self
            .availability
            .iter()
            .filter_map(|raw| match raw.parse::<TimeSlot>() {
                Ok(slot) => Some(slot),
                Err(err) => {
                    tracing::warn!("Dropping availability slot on mentor {}: {}", self.id, err);
                    None
                }
            })
            .collect();

        MentorProfile {
            id: self.id,
            name: self.name,
            title: self.title,
            photo: self.photo,
            linkedin: self.linkedin,
            story: self.story,
            specialties,
            stage_focus,
            communication_style,
            availability,
            story_tags,
            chais_shared: self.chais_shared,
            is_active: self.is_active,
            last_active_at: self.last_active_at,
        }
    }
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
    ) -> Result<Self, AppwriteError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
        })
    }

    /// List all approved mentor documents, following pagination cursors
    pub async fn list_mentor_profiles(&self) -> Result<Vec<MentorDocument>, AppwriteError> {
        let url = format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            self.collections.mentor_profiles
        );

        let mut documents = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut queries = vec![
                "equal(\"isApproved\", true)".to_string(),
                format!("limit({})", PAGE_SIZE),
            ];
            if let Some(last_id) = &cursor {
                queries.push(format!("cursorAfter(\"{}\")", last_id));
            }

            let queries_json = serde_json::to_string(&queries)
                .map_err(|e| AppwriteError::InvalidResponse(e.to_string()))?;
            let full_url = format!("{}?query={}", url, urlencoding::encode(&queries_json));

            tracing::debug!("Listing mentor profiles from: {}", full_url);

            let response = self
                .client
                .get(&full_url)
                .header("X-Appwrite-Key", &self.api_key)
                .header("X-Appwrite-Project", &self.project_id)
                .send()
                .await?;

            if response.status() == reqwest::StatusCode::UNAUTHORIZED {
                return Err(AppwriteError::Unauthorized);
            }
            if !response.status().is_success() {
                return Err(AppwriteError::ApiError(format!(
                    "Failed to list mentor profiles: {}",
                    response.status()
                )));
            }

            let json: Value = response.json().await?;

            let page = json
                .get("documents")
                .and_then(|d| d.as_array())
                .ok_or_else(|| AppwriteError::InvalidResponse("Missing documents array".into()))?;

            let parsed: Vec<MentorDocument> = page
                .iter()
                .filter_map(|doc| {
                    let data = doc.get("data").unwrap_or(doc);
                    match serde_json::from_value(data.clone()) {
                        Ok(document) => Some(document),
                        Err(e) => {
                            tracing::warn!("Skipping unparseable mentor document: {}", e);
                            None
                        }
                    }
                })
                .collect();

            let page_len = page.len();
            cursor = parsed.last().map(|d: &MentorDocument| d.id.clone());
            documents.extend(parsed);

            if page_len < PAGE_SIZE || cursor.is_none() {
                break;
            }
        }

        tracing::debug!("Listed {} mentor documents", documents.len());

        Ok(documents)
    }
}
