//! Track metadata validation.
//!
//! Upload metadata arrives as loose text fields. [`TrackFields`] collects
//! them as-is and [`TrackFields::validate`] turns them into a
//! [`TrackMetadata`] or a single validation error naming what is wrong.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::CoreError;
use crate::types::Timestamp;

/// One `{role, name}` credit on a track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
    pub role: String,
    pub name: String,
}

/// Raw upload fields keyed by their wire names.
#[derive(Debug, Clone, Default)]
pub struct TrackFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub artist: Option<String>,
    pub artist_avatar: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub duration: Option<String>,
    pub release_date: Option<String>,
    pub copyright: Option<String>,
    pub collaborators: Option<String>,
    pub track_number: Option<String>,
    pub total_tracks: Option<String>,
    pub cover: Option<String>,
    pub producer: Option<String>,
    pub composer: Option<String>,
    pub category: Option<String>,
}

/// Validated track metadata, everything but the audio URL.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackMetadata {
    pub title: String,
    pub description: Option<String>,
    pub artist: String,
    pub artist_avatar: String,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub duration: f64,
    pub release_date: Timestamp,
    pub copyright: Option<String>,
    pub collaborators: Vec<Collaborator>,
    pub track_number: Option<i32>,
    pub total_tracks: Option<i32>,
    pub cover: Option<String>,
    pub producer: Option<String>,
    pub composer: Option<String>,
    pub category: Category,
}

impl TrackFields {
    /// Store a text field by its wire name. Returns `false` for names that
    /// are not track metadata so the caller can ignore them.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "title" => &mut self.title,
            "description" => &mut self.description,
            "artist" => &mut self.artist,
            "artistAvatar" => &mut self.artist_avatar,
            "album" => &mut self.album,
            "genre" => &mut self.genre,
            "duration" => &mut self.duration,
            "releaseDate" => &mut self.release_date,
            "copyright" => &mut self.copyright,
            "collaborators" => &mut self.collaborators,
            "trackNumber" => &mut self.track_number,
            "totalTracks" => &mut self.total_tracks,
            "cover" => &mut self.cover,
            "producer" => &mut self.producer,
            "composer" => &mut self.composer,
            "category" => &mut self.category,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    /// Names of required fields that are absent or blank, in wire form.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("artist", &self.artist),
            ("artistAvatar", &self.artist_avatar),
            ("duration", &self.duration),
        ]
        .into_iter()
        .filter(|(_, v)| non_blank(v.as_deref()).is_none())
        .map(|(name, _)| name)
        .collect()
    }

    /// Validate and convert. Blank optional fields count as absent.
    pub fn validate(self) -> Result<TrackMetadata, CoreError> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(CoreError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let duration = parse_duration(self.duration.as_deref().unwrap_or_default())?;
        let release_date = match non_blank(self.release_date.as_deref()) {
            Some(raw) => parse_release_date(raw)?,
            None => Utc::now(),
        };
        let collaborators = match non_blank(self.collaborators.as_deref()) {
            Some(raw) => parse_collaborators(raw)?,
            None => Vec::new(),
        };
        let category = match non_blank(self.category.as_deref()) {
            Some(raw) => raw.parse()?,
            None => Category::default(),
        };
        let track_number = parse_optional_count("trackNumber", self.track_number.as_deref())?;
        let total_tracks = parse_optional_count("totalTracks", self.total_tracks.as_deref())?;

        Ok(TrackMetadata {
            title: required(self.title),
            description: optional(self.description),
            artist: required(self.artist),
            artist_avatar: required(self.artist_avatar),
            album: optional(self.album),
            genre: optional(self.genre),
            duration,
            release_date,
            copyright: optional(self.copyright),
            collaborators,
            track_number,
            total_tracks,
            cover: optional(self.cover),
            producer: optional(self.producer),
            composer: optional(self.composer),
            category,
        })
    }
}

/// Parse a release date given either as RFC 3339 or as a plain `YYYY-MM-DD`
/// (taken as midnight UTC).
pub fn parse_release_date(raw: &str) -> Result<Timestamp, CoreError> {
    let raw = raw.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid releaseDate '{raw}'. Expected RFC 3339 or YYYY-MM-DD"
            ))
        })
}

fn parse_duration(raw: &str) -> Result<f64, CoreError> {
    match raw.trim().parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs > 0.0 => Ok(secs),
        _ => Err(CoreError::Validation(format!(
            "Invalid duration '{raw}'. Must be a positive number of seconds"
        ))),
    }
}

fn parse_collaborators(raw: &str) -> Result<Vec<Collaborator>, CoreError> {
    serde_json::from_str(raw).map_err(|e| {
        CoreError::Validation(format!(
            "Invalid collaborators: expected a JSON array of {{role, name}} ({e})"
        ))
    })
}

fn parse_optional_count(field: &str, raw: Option<&str>) -> Result<Option<i32>, CoreError> {
    let Some(raw) = non_blank(raw) else {
        return Ok(None);
    };
    match raw.parse::<i32>() {
        Ok(n) if n >= 1 => Ok(Some(n)),
        _ => Err(CoreError::Validation(format!(
            "Invalid {field} '{raw}'. Must be a positive integer"
        ))),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn required(value: Option<String>) -> String {
    optional(value).unwrap_or_default()
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
