// sea-orm backed store. One table per entry kind, see the `entities` crate.

/// Implements `EntryStore` and `EntryTx` for one entry kind over its sea-orm entity.
///
/// The invoking module provides `From<Model>` for the entry, `active_model` (a full
/// row) and `changes` (the mutable columns written by an update). Both tables share
/// the `user_id`, `item_id`, `source_id` and `datetime` columns.
macro_rules! sql_entry_store {
    ($entry:ty, $table:ident, $one:literal, $many:literal) => {
        const _: () = {
            use std::collections::{BTreeSet, HashSet};

            use anyhow::Context;
            use entities::$table::{Column, Entity};
            use sea_orm::{
                ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
                QuerySelect,
            };
            use uuid::Uuid;

            use $crate::{
                domain::models::EntryKey,
                storage::{
                    EntryStore, EntryTx, ScanQuery,
                    sql::{INSERT_CHUNK, KEY_CHUNK, SqlStore, SqlTx},
                },
            };

            fn key_condition(key: &EntryKey) -> Condition {
                Condition::all()
                    .add(Column::ItemId.eq(key.item_id.as_str()))
                    .add(Column::SourceId.eq(key.source_id.as_str()))
            }

            async fn load_keys<C: ConnectionTrait>(
                conn: &C,
                user_id: Uuid,
            ) -> anyhow::Result<Vec<EntryKey>> {
                let rows: Vec<(String, String)> = Entity::find()
                    .select_only()
                    .column(Column::ItemId)
                    .column(Column::SourceId)
                    .filter(Column::UserId.eq(user_id))
                    .order_by_asc(Column::ItemId)
                    .order_by_asc(Column::SourceId)
                    .into_tuple()
                    .all(conn)
                    .await
                    .context(concat!("failed to list ", $one, " keys"))?;
                Ok(rows
                    .into_iter()
                    .map(|(item_id, source_id)| EntryKey::new(item_id, source_id))
                    .collect())
            }

            #[async_trait::async_trait]
            impl EntryStore<$entry> for SqlStore {
                type Tx = SqlTx;

                async fn begin(&self) -> anyhow::Result<SqlTx> {
                    self.begin_tx().await
                }

                async fn scan(
                    &self,
                    user_id: Uuid,
                    query: &ScanQuery,
                ) -> anyhow::Result<Vec<$entry>> {
                    let mut select = Entity::find().filter(Column::UserId.eq(user_id));
                    if let Some(since) = query.since {
                        select = select.filter(Column::Datetime.gte(since));
                    }
                    let rows = select
                        .order_by_desc(Column::Datetime)
                        .order_by_asc(Column::ItemId)
                        .order_by_asc(Column::SourceId)
                        .offset(query.offset)
                        .limit(query.limit)
                        .all(&*self.db)
                        .await
                        .context(concat!("failed to scan ", $many))?;
                    Ok(rows.into_iter().map(<$entry>::from).collect())
                }

                async fn keys(&self, user_id: Uuid) -> anyhow::Result<Vec<EntryKey>> {
                    load_keys(&*self.db, user_id).await
                }
            }

            #[async_trait::async_trait]
            impl EntryTx<$entry> for SqlTx {
                async fn get(
                    &self,
                    user_id: Uuid,
                    key: &EntryKey,
                ) -> anyhow::Result<Option<$entry>> {
                    let row =
                        Entity::find_by_id((user_id, key.item_id.clone(), key.source_id.clone()))
                            .one(&self.txn)
                            .await
                            .context(concat!("failed to load ", $one))?;
                    Ok(row.map(<$entry>::from))
                }

                async fn get_many(
                    &self,
                    user_id: Uuid,
                    keys: &[EntryKey],
                ) -> anyhow::Result<Vec<$entry>> {
                    if keys.is_empty() {
                        return Ok(Vec::new());
                    }
                    let wanted: HashSet<&EntryKey> = keys.iter().collect();
                    let item_ids: Vec<&str> = keys
                        .iter()
                        .map(|k| k.item_id.as_str())
                        .collect::<BTreeSet<_>>()
                        .into_iter()
                        .collect();

                    let mut found = Vec::with_capacity(keys.len());
                    for chunk in item_ids.chunks(KEY_CHUNK) {
                        let rows = Entity::find()
                            .filter(Column::UserId.eq(user_id))
                            .filter(Column::ItemId.is_in(chunk.iter().copied()))
                            .all(&self.txn)
                            .await
                            .context(concat!("failed to bulk load ", $many))?;
                        found.extend(
                            rows.into_iter()
                                .map(<$entry>::from)
                                .filter(|e| wanted.contains(&e.key)),
                        );
                    }
                    Ok(found)
                }

                async fn keys(&self, user_id: Uuid) -> anyhow::Result<Vec<EntryKey>> {
                    load_keys(&self.txn, user_id).await
                }

                async fn insert(&self, user_id: Uuid, entries: &[$entry]) -> anyhow::Result<()> {
                    for chunk in entries.chunks(INSERT_CHUNK) {
                        Entity::insert_many(chunk.iter().map(|e| active_model(user_id, e)))
                            .exec_without_returning(&self.txn)
                            .await
                            .context(concat!("failed to insert ", $many))?;
                    }
                    Ok(())
                }

                async fn update(&self, user_id: Uuid, entry: &$entry) -> anyhow::Result<()> {
                    let res = Entity::update_many()
                        .set(changes(entry))
                        .filter(Column::UserId.eq(user_id))
                        .filter(key_condition(&entry.key))
                        .exec(&self.txn)
                        .await
                        .context(concat!("failed to update ", $one))?;
                    if res.rows_affected == 0 {
                        anyhow::bail!(
                            concat!($one, " {}/{} vanished before update"),
                            entry.key.item_id,
                            entry.key.source_id
                        );
                    }
                    Ok(())
                }

                async fn delete(&self, user_id: Uuid, keys: &[EntryKey]) -> anyhow::Result<u64> {
                    let mut deleted = 0;
                    for chunk in keys.chunks(KEY_CHUNK) {
                        let any_key = chunk
                            .iter()
                            .fold(Condition::any(), |cond, key| cond.add(key_condition(key)));
                        let res = Entity::delete_many()
                            .filter(Column::UserId.eq(user_id))
                            .filter(any_key)
                            .exec(&self.txn)
                            .await
                            .context(concat!("failed to delete ", $many))?;
                        deleted += res.rows_affected;
                    }
                    Ok(deleted)
                }

                async fn delete_all(&self, user_id: Uuid) -> anyhow::Result<u64> {
                    let res = Entity::delete_many()
                        .filter(Column::UserId.eq(user_id))
                        .exec(&self.txn)
                        .await
                        .context(concat!("failed to clear ", $many))?;
                    Ok(res.rows_affected)
                }

                async fn commit(self) -> anyhow::Result<()> {
                    self.finish().await
                }
            }
        };
    };
}

mod library;
mod progress;

use std::sync::Arc;

use anyhow::Context;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

/// Keys per `IN (...)` / `OR` lookup, keeps statements under SQLite's limits.
const KEY_CHUNK: usize = 200;
/// Rows per multi-row INSERT.
const INSERT_CHUNK: usize = 100;

#[derive(Clone, Debug)]
pub struct SqlStore {
    db: Arc<DatabaseConnection>,
}

impl SqlStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Cheap round trip used by the health endpoint.
    pub async fn ping(&self) -> anyhow::Result<()> {
        self.db.ping().await.context("database ping failed")
    }

    async fn begin_tx(&self) -> anyhow::Result<SqlTx> {
        let txn = self
            .db
            .begin()
            .await
            .context("failed to open transaction")?;
        Ok(SqlTx { txn })
    }
}

/// Database transaction handed out as the unit of work. Rolls back on drop.
pub struct SqlTx {
    txn: DatabaseTransaction,
}

impl SqlTx {
    async fn finish(self) -> anyhow::Result<()> {
        self.txn
            .commit()
            .await
            .context("failed to commit transaction")
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use migration::MigratorTrait;
    use sea_orm::Database;
    use tempfile::TempDir;

    use super::SqlStore;

    /// Fresh migrated SQLite database in a temp dir. Keep the dir alive for the test.
    pub(crate) async fn temp_store() -> (TempDir, SqlStore) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("sync.sqlite").display()
        );
        let db = Database::connect(&url).await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        (dir, SqlStore::new(Arc::new(db)))
    }
}
