use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_name = "first_name")]
    pub first_name: String,
    #[sea_orm(column_name = "last_name")]
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    // No foreign keys back these refs; the synchronizer owns consistency.
    #[sea_orm(column_name = "item_refs")]
    pub item_refs: Vec<Uuid>,
    #[sea_orm(column_name = "excursion_refs")]
    pub excursion_refs: Vec<Uuid>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
