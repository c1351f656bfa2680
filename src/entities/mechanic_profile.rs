use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mechanic_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub profile_id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub birth_date: Option<NaiveDate>,
    pub total_experience_years: Option<i32>,
    pub bowling_experience_years: Option<i32>,
    pub skills: Option<String>,
    pub is_data_verified: bool,
    pub verification_date: Option<NaiveDate>,
    pub rating: Option<f64>,
    pub created_at: NaiveDate,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::UserId"
    )]
    User,
    #[sea_orm(has_many = "super::personal_warehouse::Entity")]
    PersonalWarehouses,
    #[sea_orm(has_many = "super::maintenance_request::Entity")]
    MaintenanceRequests,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::personal_warehouse::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PersonalWarehouses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
