use entities::progress_record::{self, ActiveModel};
use sea_orm::ActiveValue::Set;
use uuid::Uuid;

use crate::domain::models::{EntryKey, ProgressRecord};

impl From<progress_record::Model> for ProgressRecord {
    fn from(m: progress_record::Model) -> Self {
        ProgressRecord {
            key: EntryKey::new(m.item_id, m.source_id),
            datetime: m.datetime,
            chapter_id: m.chapter_id,
            chapter_title: m.chapter_title,
            page: m.page,
        }
    }
}

fn active_model(user_id: Uuid, record: &ProgressRecord) -> ActiveModel {
    ActiveModel {
        user_id: Set(user_id),
        item_id: Set(record.key.item_id.clone()),
        source_id: Set(record.key.source_id.clone()),
        ..changes(record)
    }
}

fn changes(record: &ProgressRecord) -> ActiveModel {
    ActiveModel {
        datetime: Set(record.datetime),
        chapter_id: Set(record.chapter_id.clone()),
        chapter_title: Set(record.chapter_title.clone()),
        page: Set(record.page),
        ..Default::default()
    }
}

sql_entry_store!(ProgressRecord, progress_record, "progress record", "progress records");
