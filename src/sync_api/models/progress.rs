use chrono::{DateTime, Utc};
use poem_openapi::Object;

use super::MergeStatusDto;
use crate::{
    domain::{
        mapping::{require_datetime, require_key_part},
        models::{EntryKey, IncomingEntry, ProgressRecord},
    },
    sync::MergeOutcome,
};

/// A progress record as submitted by a client. Fields are checked by the sync core.
#[derive(Debug, Clone, Default, Object)]
#[oai(rename_all = "camelCase")]
pub struct ProgressItemDto {
    #[oai(rename = "mangaId")]
    pub item_id: Option<String>,
    #[oai(rename = "pluginId")]
    pub source_id: Option<String>,
    /// Epoch milliseconds or RFC 3339 string
    pub datetime: Option<serde_json::Value>,
    pub chapter_id: Option<String>,
    pub chapter_title: Option<String>,
    pub page: Option<i64>,
}

impl IncomingEntry for ProgressItemDto {
    type Entry = ProgressRecord;

    fn into_entry(self) -> Result<ProgressRecord, String> {
        let item_id = require_key_part("mangaId", self.item_id)?;
        let source_id = require_key_part("pluginId", self.source_id)?;
        let datetime = require_datetime(self.datetime.as_ref())?;
        let page = self
            .page
            .ok_or_else(|| "missing required field page".to_string())?;
        Ok(ProgressRecord {
            key: EntryKey::new(item_id, source_id),
            datetime,
            chapter_id: self.chapter_id,
            chapter_title: self.chapter_title,
            page,
        })
    }
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct ProgressRecordDto {
    #[oai(rename = "mangaId")]
    pub item_id: String,
    #[oai(rename = "pluginId")]
    pub source_id: String,
    pub datetime: DateTime<Utc>,
    pub chapter_id: Option<String>,
    pub chapter_title: Option<String>,
    pub page: i64,
}

impl From<ProgressRecord> for ProgressRecordDto {
    fn from(r: ProgressRecord) -> Self {
        ProgressRecordDto {
            item_id: r.key.item_id,
            source_id: r.key.source_id,
            datetime: r.datetime,
            chapter_id: r.chapter_id,
            chapter_title: r.chapter_title,
            page: r.page,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct ProgressOutcomeDto {
    pub status: MergeStatusDto,
    #[oai(flatten)]
    pub record: ProgressRecordDto,
}

impl From<MergeOutcome<ProgressRecord>> for ProgressOutcomeDto {
    fn from(outcome: MergeOutcome<ProgressRecord>) -> Self {
        ProgressOutcomeDto {
            status: MergeStatusDto::from(&outcome),
            record: outcome.into_entry().into(),
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct ProgressMergeDto {
    pub message: String,
    pub records: Vec<ProgressOutcomeDto>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn item() -> ProgressItemDto {
        ProgressItemDto {
            item_id: Some("7".into()),
            source_id: Some("2".into()),
            datetime: Some(json!(100)),
            chapter_id: None,
            chapter_title: Some("Prologue".into()),
            page: Some(3),
        }
    }

    #[test]
    fn complete_item_converts() {
        let record = item().into_entry().unwrap();
        assert_eq!(record.key, EntryKey::new("7", "2"));
        assert_eq!(record.datetime.timestamp_millis(), 100);
        assert_eq!(record.chapter_title.as_deref(), Some("Prologue"));
        assert_eq!(record.page, 3);
    }

    #[test]
    fn page_is_required() {
        let err = ProgressItemDto { page: None, ..item() }.into_entry().unwrap_err();
        assert!(err.contains("page"));
    }

    #[test]
    fn datetime_must_parse() {
        let err = ProgressItemDto {
            datetime: Some(json!("not a date")),
            ..item()
        }
        .into_entry()
        .unwrap_err();
        assert_eq!(err, "invalid datetime format");
    }
}
