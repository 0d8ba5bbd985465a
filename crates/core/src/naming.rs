//! Object key convention for uploaded audio.
//!
//! Convention: `audios/{title_slug}_{unix_millis}{.ext}`
//!
//! - `title_slug` = lowercase ASCII alphanumerics of the title, other runs
//!   collapsed to `-`; `"untitled"` if nothing survives
//! - `unix_millis` = upload time in milliseconds
//! - `.ext` = lowercase extension of the client file name, when it has one
//!
//! Two uploads with the same title in the same millisecond get the same key.

/// Key prefix for every audio object.
pub const AUDIO_KEY_PREFIX: &str = "audios";

/// Build the storage key for an uploaded audio file.
///
/// # Examples
///
/// ```
/// use soundshelf_core::naming::audio_object_key;
///
/// assert_eq!(
///     audio_object_key("My Song!", Some("take1.MP3"), 1_700_000_000_000),
///     "audios/my-song_1700000000000.mp3"
/// );
/// assert_eq!(audio_object_key("???", None, 5), "audios/untitled_5");
/// ```
pub fn audio_object_key(title: &str, file_name: Option<&str>, unix_millis: i64) -> String {
    let mut key = format!("{AUDIO_KEY_PREFIX}/{}_{unix_millis}", slugify(title));
    if let Some(ext) = file_name.and_then(extension) {
        key.push('.');
        key.push_str(&ext);
    }
    key
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug
    }
}

fn extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
