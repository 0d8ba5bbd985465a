//! Album validation and ownership rules.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::types::DbId;

/// Return the trimmed value of a required text field, or a validation error
/// naming it.
pub fn require_text(field: &str, value: Option<&str>) -> Result<String, CoreError> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| CoreError::Validation(format!("{field} is required")))
}

/// A track list must be non-empty.
pub fn validate_track_ids(track_ids: &[DbId]) -> Result<(), CoreError> {
    if track_ids.is_empty() {
        return Err(CoreError::Validation(
            "trackIds must contain at least one track id".into(),
        ));
    }
    Ok(())
}

/// Ids from `requested` that are absent from `found`, in request order.
pub fn missing_track_ids(requested: &[DbId], found: &[DbId]) -> Vec<DbId> {
    let found: HashSet<DbId> = found.iter().copied().collect();
    requested
        .iter()
        .copied()
        .filter(|id| !found.contains(id))
        .collect()
}

/// Every requested id must resolve, and the distinct resolved count must
/// equal the requested count. An unknown id is reported first; failing that,
/// the first repeated id.
pub fn ensure_tracks_resolved(requested: &[DbId], found: &[DbId]) -> Result<(), CoreError> {
    if let Some(&id) = missing_track_ids(requested, found).first() {
        return Err(CoreError::NotFound { entity: "Track", id });
    }
    let mut seen = HashSet::with_capacity(requested.len());
    match requested.iter().copied().find(|id| !seen.insert(*id)) {
        Some(id) => Err(CoreError::NotFound { entity: "Track", id }),
        None => Ok(()),
    }
}

/// Only the artist recorded on the album may change or delete it. Exact,
/// case-sensitive comparison.
pub fn ensure_owner(album_artist: &str, caller: &str) -> Result<(), CoreError> {
    if album_artist == caller {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the album's artist may modify it".into(),
        ))
    }
}
