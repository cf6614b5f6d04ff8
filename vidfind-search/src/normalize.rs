//! Conversion of raw upstream records into [`NormalizedVideo`].
//!
//! Each output field is extracted independently; a field the record does
//! not provide in the expected shape becomes an empty string without
//! affecting the others.

use serde_json::Value;

use crate::payload::{get_first_of_list, get_map_field, string_at};
use crate::types::NormalizedVideo;

/// Normalise one upstream record.
///
/// Returns `None` only when the record itself is null; any other record is
/// emitted, with missing or wrongly-typed fields as `""`.
pub fn normalize(record: &Value) -> Option<NormalizedVideo> {
    if record.is_null() {
        return None;
    }
    let record = Some(record);

    let first_thumbnail = get_first_of_list(get_map_field(record, "thumbnails"));
    let first_snippet = get_first_of_list(get_map_field(record, "descriptionSnippet"));

    Some(NormalizedVideo {
        id: string_at(record, &["id"]),
        title: string_at(record, &["title"]),
        channel_title: string_at(record, &["channel", "name"]),
        thumbnail: string_at(first_thumbnail, &["url"]),
        description: string_at(first_snippet, &["text"]),
        ..NormalizedVideo::empty()
    })
}

/// Normalise up to `limit` records in order, skipping null records.
///
/// The limit applies to upstream records, so skipped nulls still count
/// towards it.
pub fn normalize_batch(records: &[Value], limit: usize) -> Vec<NormalizedVideo> {
    let videos: Vec<NormalizedVideo> = records.iter().take(limit).filter_map(normalize).collect();
    let skipped = records.len().min(limit) - videos.len();
    if skipped > 0 {
        tracing::debug!(skipped, "null upstream records skipped");
    }
    videos
}
