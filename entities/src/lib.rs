pub mod library_entry;
pub mod progress_record;

pub mod prelude {
    pub use super::library_entry::Entity as LibraryEntry;
    pub use super::progress_record::Entity as ProgressRecord;
}
