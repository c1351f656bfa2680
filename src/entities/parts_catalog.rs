use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parts_catalog")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub catalog_id: i64,
    #[sea_orm(unique)]
    pub catalog_number: String,
    pub official_name: Option<String>,
    pub common_name: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub is_unique: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::warehouse_inventory::Entity")]
    Inventory,
}

impl Related<super::warehouse_inventory::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inventory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
