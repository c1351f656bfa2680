use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub user_id: i64,
    /// Login identifier, normalized to `+7XXXXXXXXXX`.
    #[sea_orm(unique)]
    pub phone: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub account_type: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub registration_date: NaiveDate,
    pub last_modified: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::mechanic_profile::Entity")]
    MechanicProfile,
    #[sea_orm(has_one = "super::owner_profile::Entity")]
    OwnerProfile,
    #[sea_orm(has_one = "super::manager_profile::Entity")]
    ManagerProfile,
    #[sea_orm(has_many = "super::club_staff::Entity")]
    ClubStaff,
    #[sea_orm(has_many = "super::refresh_token::Entity")]
    RefreshTokens,
}

impl Related<super::mechanic_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MechanicProfile.def()
    }
}

impl Related<super::owner_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OwnerProfile.def()
    }
}

impl Related<super::manager_profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ManagerProfile.def()
    }
}

impl Related<super::club_staff::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClubStaff.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
