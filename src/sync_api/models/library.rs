use chrono::{DateTime, Utc};
use poem_openapi::Object;

use super::MergeStatusDto;
use crate::{
    domain::{
        mapping::{require_datetime, require_key_part},
        models::{EntryKey, IncomingEntry, LibraryEntry},
    },
    sync::{MergeOutcome, ReconcileSummary},
};

/// A library entry as submitted by a client.
#[derive(Debug, Clone, Default, Object)]
#[oai(rename_all = "camelCase")]
pub struct LibraryItemDto {
    #[oai(rename = "mangaId")]
    pub item_id: Option<String>,
    #[oai(rename = "pluginId")]
    pub source_id: Option<String>,
    /// Epoch milliseconds or RFC 3339 string
    pub datetime: Option<serde_json::Value>,
    pub updates: Option<i64>,
    pub latest_chapter: Option<String>,
}

impl IncomingEntry for LibraryItemDto {
    type Entry = LibraryEntry;

    fn into_entry(self) -> Result<LibraryEntry, String> {
        let item_id = require_key_part("mangaId", self.item_id)?;
        let source_id = require_key_part("pluginId", self.source_id)?;
        let datetime = require_datetime(self.datetime.as_ref())?;
        let updates = self
            .updates
            .ok_or_else(|| "missing required field updates".to_string())?;
        Ok(LibraryEntry {
            key: EntryKey::new(item_id, source_id),
            datetime,
            updates,
            latest_chapter: self.latest_chapter,
        })
    }
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct LibraryEntryDto {
    #[oai(rename = "mangaId")]
    pub item_id: String,
    #[oai(rename = "pluginId")]
    pub source_id: String,
    pub datetime: DateTime<Utc>,
    pub updates: i64,
    pub latest_chapter: Option<String>,
}

impl From<LibraryEntry> for LibraryEntryDto {
    fn from(e: LibraryEntry) -> Self {
        LibraryEntryDto {
            item_id: e.key.item_id,
            source_id: e.key.source_id,
            datetime: e.datetime,
            updates: e.updates,
            latest_chapter: e.latest_chapter,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct LibraryOutcomeDto {
    pub status: MergeStatusDto,
    #[oai(flatten)]
    pub entry: LibraryEntryDto,
}

impl From<MergeOutcome<LibraryEntry>> for LibraryOutcomeDto {
    fn from(outcome: MergeOutcome<LibraryEntry>) -> Self {
        LibraryOutcomeDto {
            status: MergeStatusDto::from(&outcome),
            entry: outcome.into_entry().into(),
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct LibraryMergeDto {
    pub message: String,
    pub saveds: Vec<LibraryOutcomeDto>,
}

#[derive(Debug, Clone, Object)]
pub struct LibraryReplaceDto {
    pub message: String,
    pub saveds: Vec<LibraryEntryDto>,
}

#[derive(Debug, Clone, Object)]
pub struct ReconcileDto {
    pub created: u64,
    pub deleted: u64,
}

impl From<ReconcileSummary> for ReconcileDto {
    fn from(s: ReconcileSummary) -> Self {
        ReconcileDto {
            created: s.created,
            deleted: s.deleted,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct FingerprintDto {
    /// Lowercase hex SHA-256 of the sorted key set
    pub hash: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn rfc3339_datetime_and_optional_chapter() {
        let entry = LibraryItemDto {
            item_id: Some("one-piece".into()),
            source_id: Some("mangadex".into()),
            datetime: Some(json!("2024-05-01T12:00:00Z")),
            updates: Some(2),
            latest_chapter: None,
        }
        .into_entry()
        .unwrap();
        assert_eq!(entry.updates, 2);
        assert!(entry.latest_chapter.is_none());
        assert_eq!(entry.datetime.to_rfc3339(), "2024-05-01T12:00:00+00:00");
    }

    #[test]
    fn updates_and_keys_are_required() {
        let base = LibraryItemDto {
            item_id: Some("1".into()),
            source_id: Some("a".into()),
            datetime: Some(json!(1)),
            updates: Some(0),
            latest_chapter: None,
        };
        assert!(
            LibraryItemDto { updates: None, ..base.clone() }
                .into_entry()
                .unwrap_err()
                .contains("updates")
        );
        assert!(
            LibraryItemDto { source_id: None, ..base }
                .into_entry()
                .unwrap_err()
                .contains("pluginId")
        );
    }
}
