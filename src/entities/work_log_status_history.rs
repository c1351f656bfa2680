use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_log_status_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub history_id: i64,
    pub work_log_id: i64,
    pub previous_status: Option<String>,
    pub new_status: String,
    pub changed_by: Option<i64>,
    pub changed_date: DateTime<Utc>,
    pub reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::work_log::Entity",
        from = "Column::WorkLogId",
        to = "super::work_log::Column::LogId"
    )]
    WorkLog,
}

impl Related<super::work_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
