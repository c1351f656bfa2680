use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bowling_clubs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub club_id: i64,
    pub owner_id: Option<i64>,
    pub name: String,
    pub address: Option<String>,
    pub lanes_count: i32,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub verification_date: Option<NaiveDate>,
    pub created_at: NaiveDate,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::owner_profile::Entity",
        from = "Column::OwnerId",
        to = "super::owner_profile::Column::OwnerId"
    )]
    Owner,
    #[sea_orm(has_many = "super::club_staff::Entity")]
    Staff,
    #[sea_orm(has_many = "super::maintenance_request::Entity")]
    MaintenanceRequests,
    #[sea_orm(has_many = "super::work_log::Entity")]
    WorkLogs,
}

impl Related<super::owner_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::club_staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Staff.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
