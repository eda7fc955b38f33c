use entities::library_entry::{self, ActiveModel};
use sea_orm::ActiveValue::Set;
use uuid::Uuid;

use crate::domain::models::{EntryKey, LibraryEntry};

impl From<library_entry::Model> for LibraryEntry {
    fn from(m: library_entry::Model) -> Self {
        LibraryEntry {
            key: EntryKey::new(m.item_id, m.source_id),
            datetime: m.datetime,
            updates: m.updates,
            latest_chapter: m.latest_chapter,
        }
    }
}

fn active_model(user_id: Uuid, entry: &LibraryEntry) -> ActiveModel {
    ActiveModel {
        user_id: Set(user_id),
        item_id: Set(entry.key.item_id.clone()),
        source_id: Set(entry.key.source_id.clone()),
        ..changes(entry)
    }
}

fn changes(entry: &LibraryEntry) -> ActiveModel {
    ActiveModel {
        datetime: Set(entry.datetime),
        updates: Set(entry.updates),
        latest_chapter: Set(entry.latest_chapter.clone()),
        ..Default::default()
    }
}

sql_entry_store!(LibraryEntry, library_entry, "library entry", "library entries");
