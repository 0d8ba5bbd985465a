//! Multipart parsing and storage steps for `POST /upload`.
//!
//! The upload is two writes against two systems: the audio blob first, then
//! the track row. There is no transaction spanning them. If the second write
//! fails the blob is either left in place or, with
//! `COMPENSATE_ORPHANED_BLOBS=true`, deleted again.

use axum::extract::Multipart;
use soundshelf_core::error::CoreError;
use soundshelf_core::track::{TrackFields, TrackMetadata};
use soundshelf_db::models::track::{CreateTrack, Track};
use soundshelf_storage::StoredObject;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Multipart field names accepted for the audio payload.
pub const AUDIO_FIELD_NAMES: &[&str] = &["audio", "file"];

/// Content type recorded when the client does not send one.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// The binary part of an upload.
#[derive(Debug)]
pub struct AudioPayload {
    pub file_name: Option<String>,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Everything read from the multipart body, not yet validated.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: TrackFields,
    pub audio: Option<AudioPayload>,
}

impl UploadForm {
    /// Drain the multipart stream. Unknown text fields are ignored; a second
    /// audio part is rejected.
    pub async fn read(multipart: &mut Multipart) -> AppResult<Self> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();

            if AUDIO_FIELD_NAMES.contains(&name.as_str()) {
                if form.audio.is_some() {
                    return Err(AppError::Core(CoreError::Validation(
                        "Only one audio file may be uploaded".into(),
                    )));
                }
                let file_name = field.file_name().map(str::to_string);
                let content_type = field
                    .content_type()
                    .unwrap_or(FALLBACK_CONTENT_TYPE)
                    .to_string();
                let data = field.bytes().await?;
                if !data.is_empty() {
                    form.audio = Some(AudioPayload {
                        file_name,
                        content_type,
                        data: data.to_vec(),
                    });
                }
                continue;
            }

            let value = field.text().await?;
            form.fields.set(&name, value);
        }

        Ok(form)
    }

    /// Validate the metadata and require the audio part. Nothing has been
    /// stored yet when this fails.
    pub fn into_parts(self) -> AppResult<(TrackMetadata, AudioPayload)> {
        let metadata = self.fields.validate()?;
        let audio = self.audio.ok_or_else(|| {
            AppError::Core(CoreError::Validation("No audio file uploaded".into()))
        })?;
        Ok((metadata, audio))
    }
}

/// Insert the track row for an already-stored blob, running the
/// compensation step if the insert fails.
pub async fn persist_track(
    state: &AppState,
    metadata: TrackMetadata,
    stored: &StoredObject,
) -> AppResult<Track> {
    let input = CreateTrack {
        metadata,
        url: stored.url.clone(),
    };

    match state.store.create_track(&input).await {
        Ok(track) => Ok(track),
        Err(err) => {
            if state.config.compensate_orphaned_blobs {
                discard_blob(state, stored).await;
            } else {
                tracing::warn!(
                    key = %stored.key,
                    error = %err,
                    "Track insert failed, stored audio is orphaned"
                );
            }
            Err(err.into())
        }
    }
}

async fn discard_blob(state: &AppState, stored: &StoredObject) {
    match state.objects.delete_object(&stored.key).await {
        Ok(()) => tracing::info!(key = %stored.key, "Deleted audio after failed track insert"),
        Err(e) => tracing::error!(
            key = %stored.key,
            error = %e,
            "Failed to delete audio after failed track insert"
        ),
    }
}
