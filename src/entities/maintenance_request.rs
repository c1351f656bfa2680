use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "maintenance_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub request_id: i64,
    pub club_id: Option<i64>,
    pub lane_number: Option<i32>,
    pub mechanic_id: i64,
    pub request_date: DateTime<Utc>,
    pub completion_date: Option<DateTime<Utc>>,
    pub status: String,
    pub manager_notes: Option<String>,
    pub manager_decision_date: Option<DateTime<Utc>>,
    pub request_reason: String,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bowling_club::Entity",
        from = "Column::ClubId",
        to = "super::bowling_club::Column::ClubId"
    )]
    Club,
    #[sea_orm(
        belongs_to = "super::mechanic_profile::Entity",
        from = "Column::MechanicId",
        to = "super::mechanic_profile::Column::ProfileId"
    )]
    Mechanic,
    #[sea_orm(has_many = "super::request_part::Entity")]
    Parts,
    #[sea_orm(has_many = "super::purchase_order::Entity")]
    PurchaseOrders,
}

impl Related<super::bowling_club::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Club.def()
    }
}

impl Related<super::mechanic_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mechanic.def()
    }
}

impl Related<super::request_part::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Parts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
