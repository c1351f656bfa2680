use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Spare-part storage owned by a single mechanic rather than a club.
/// Created lazily the first time a free mechanic receives parts.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "personal_warehouses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub warehouse_id: i64,
    pub mechanic_profile_id: i64,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::mechanic_profile::Entity",
        from = "Column::MechanicProfileId",
        to = "super::mechanic_profile::Column::ProfileId"
    )]
    MechanicProfile,
}

impl Related<super::mechanic_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MechanicProfile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
