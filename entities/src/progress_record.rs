use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Last-read position of one user for one item from one source.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "progress_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub item_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub source_id: String,
    pub datetime: DateTimeUtc,
    pub chapter_id: Option<String>,
    pub chapter_title: Option<String>,
    pub page: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
