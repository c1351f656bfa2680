use chrono::DateTime;
use chrono::Utc;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "manager_profiles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub manager_id: i64,
    pub user_id: i64,
    pub club_id: Option<i64>,
    pub full_name: String,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub is_data_verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::UserId"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::bowling_club::Entity",
        from = "Column::ClubId",
        to = "super::bowling_club::Column::ClubId"
    )]
    Club,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::bowling_club::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Club.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
