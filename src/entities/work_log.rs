use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub log_id: i64,
    pub maintenance_request_id: Option<i64>,
    pub club_id: Option<i64>,
    pub lane_number: Option<i32>,
    pub mechanic_id: Option<i64>,
    pub status: String,
    pub work_type: String,
    pub problem_description: Option<String>,
    pub work_performed: Option<String>,
    pub solution_description: Option<String>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub labor_cost: Option<f64>,
    pub total_parts_cost: Option<f64>,
    pub total_cost: Option<f64>,
    /// 1 is critical, 5 is lowest.
    pub priority: i32,
    pub quality_rating: Option<i32>,
    pub created_date: DateTime<Utc>,
    pub started_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
    pub created_by: Option<i64>,
    pub modified_by: Option<i64>,
    pub modified_date: Option<DateTime<Utc>>,
    pub is_manual_edit: bool,
    pub manual_edit_reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::maintenance_request::Entity",
        from = "Column::MaintenanceRequestId",
        to = "super::maintenance_request::Column::RequestId"
    )]
    MaintenanceRequest,
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
    #[sea_orm(has_many = "super::work_log_status_history::Entity")]
    StatusHistory,
}

impl Related<super::maintenance_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaintenanceRequest.def()
    }
}

impl Related<super::bowling_club::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Club.def()
    }
}

impl Related<super::work_log_status_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StatusHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
