use crate::db::DbPool;
use crate::entities::enums::Role;
use crate::entities::{bowling_club, club_staff, manager_profile, owner_profile, user};
use crate::errors::ServiceError;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct CreateClubInput {
    pub owner_id: Option<i64>,
    pub name: String,
    pub address: Option<String>,
    pub lanes_count: i32,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateClubInput {
    pub name: Option<String>,
    pub address: Option<String>,
    pub lanes_count: Option<i32>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub is_active: Option<bool>,
}

/// Club directory and staff management.
#[derive(Clone)]
pub struct ClubService {
    db_pool: Arc<DbPool>,
}

impl ClubService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_club(
        &self,
        input: CreateClubInput,
    ) -> Result<bowling_club::Model, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Club name is required".to_string(),
            ));
        }
        if input.lanes_count < 0 {
            return Err(ServiceError::ValidationError(
                "Lanes count cannot be negative".to_string(),
            ));
        }

        let club = bowling_club::ActiveModel {
            owner_id: Set(input.owner_id),
            name: Set(input.name.trim().to_string()),
            address: Set(input.address),
            lanes_count: Set(input.lanes_count),
            contact_phone: Set(input.contact_phone),
            contact_email: Set(input.contact_email),
            is_active: Set(true),
            is_verified: Set(false),
            created_at: Set(Utc::now().date_naive()),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;
        info!(club_id = club.club_id, "club created");
        Ok(club)
    }

    #[instrument(skip(self))]
    pub async fn get_club(&self, club_id: i64) -> Result<bowling_club::Model, ServiceError> {
        bowling_club::Entity::find_by_id(club_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Club {} not found", club_id)))
    }

    #[instrument(skip(self, input))]
    pub async fn update_club(
        &self,
        club_id: i64,
        input: UpdateClubInput,
    ) -> Result<bowling_club::Model, ServiceError> {
        let club = self.get_club(club_id).await?;
        let mut active: bowling_club::ActiveModel = club.into();
        if let Some(name) = input.name {
            if name.trim().is_empty() {
                return Err(ServiceError::ValidationError(
                    "Club name cannot be empty".to_string(),
                ));
            }
            active.name = Set(name.trim().to_string());
        }
        if let Some(address) = input.address {
            active.address = Set(Some(address));
        }
        if let Some(lanes) = input.lanes_count {
            if lanes < 0 {
                return Err(ServiceError::ValidationError(
                    "Lanes count cannot be negative".to_string(),
                ));
            }
            active.lanes_count = Set(lanes);
        }
        if let Some(phone) = input.contact_phone {
            active.contact_phone = Set(Some(phone));
        }
        if let Some(email) = input.contact_email {
            active.contact_email = Set(Some(email));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        Ok(active.update(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn list_clubs(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<bowling_club::Model>, u64), ServiceError> {
        let paginator = bowling_club::Entity::find()
            .order_by_asc(bowling_club::Column::ClubId)
            .paginate(&*self.db_pool, per_page.max(1));
        let total = paginator.num_items().await?;
        let clubs = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((clubs, total))
    }

    /// Active verified clubs, for the public directory.
    #[instrument(skip(self))]
    pub async fn public_clubs(&self) -> Result<Vec<bowling_club::Model>, ServiceError> {
        let clubs = bowling_club::Entity::find()
            .filter(bowling_club::Column::IsActive.eq(true))
            .filter(bowling_club::Column::IsVerified.eq(true))
            .order_by_asc(bowling_club::Column::Name)
            .all(&*self.db_pool)
            .await?;
        Ok(clubs)
    }

    #[instrument(skip(self))]
    pub async fn staff_of(&self, club_id: i64) -> Result<Vec<club_staff::Model>, ServiceError> {
        // Club must exist even when it has no staff yet.
        self.get_club(club_id).await?;
        let staff = club_staff::Entity::find()
            .filter(club_staff::Column::ClubId.eq(club_id))
            .filter(club_staff::Column::IsActive.eq(true))
            .order_by_asc(club_staff::Column::AssignedAt)
            .all(&*self.db_pool)
            .await?;
        Ok(staff)
    }

    /// Assigns a user to a club. Re-assigning a previously deactivated
    /// member reactivates the existing record.
    #[instrument(skip(self))]
    pub async fn assign_staff(
        &self,
        club_id: i64,
        user_id: i64,
        role: &str,
        assigned_by: Option<i64>,
    ) -> Result<club_staff::Model, ServiceError> {
        self.get_club(club_id).await?;
        let account = user::Entity::find_by_id(user_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))?;
        if !account.is_active {
            return Err(ServiceError::InvalidOperation(
                "Inactive users cannot join club staff".to_string(),
            ));
        }
        let role = Role::from_str(role)
            .map_err(|_| ServiceError::ValidationError(format!("Unsupported role: {}", role)))?;

        let existing = club_staff::Entity::find()
            .filter(club_staff::Column::ClubId.eq(club_id))
            .filter(club_staff::Column::UserId.eq(user_id))
            .one(&*self.db_pool)
            .await?;

        let record = match existing {
            Some(record) if record.is_active => {
                return Err(ServiceError::Conflict(
                    "User is already an active staff member of this club".to_string(),
                ));
            }
            Some(record) => {
                let mut active: club_staff::ActiveModel = record.into();
                active.is_active = Set(true);
                active.role = Set(role.to_string());
                active.assigned_at = Set(Utc::now());
                active.assigned_by = Set(assigned_by);
                active.update(&*self.db_pool).await?
            }
            None => {
                club_staff::ActiveModel {
                    club_id: Set(club_id),
                    user_id: Set(user_id),
                    role: Set(role.to_string()),
                    is_active: Set(true),
                    assigned_at: Set(Utc::now()),
                    assigned_by: Set(assigned_by),
                    ..Default::default()
                }
                .insert(&*self.db_pool)
                .await?
            }
        };
        info!(club_id, user_id, "staff member assigned");
        Ok(record)
    }

    /// Soft-deactivates a staff membership.
    #[instrument(skip(self))]
    pub async fn remove_staff(&self, club_id: i64, user_id: i64) -> Result<(), ServiceError> {
        let record = club_staff::Entity::find()
            .filter(club_staff::Column::ClubId.eq(club_id))
            .filter(club_staff::Column::UserId.eq(user_id))
            .filter(club_staff::Column::IsActive.eq(true))
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "User {} is not an active staff member of club {}",
                    user_id, club_id
                ))
            })?;
        let mut active: club_staff::ActiveModel = record.into();
        active.is_active = Set(false);
        active.update(&*self.db_pool).await?;
        Ok(())
    }

    /// Whether the user may act within the club: a global admin, the owner,
    /// the club's manager or an active staff member.
    pub async fn user_has_club_access(&self, user_id: i64, club_id: i64) -> Result<bool, ServiceError> {
        let Some(account) = user::Entity::find_by_id(user_id).one(&*self.db_pool).await? else {
            return Ok(false);
        };
        if Role::from_str(&account.role) == Ok(Role::Admin) {
            return Ok(true);
        }

        let staff = club_staff::Entity::find()
            .filter(club_staff::Column::ClubId.eq(club_id))
            .filter(club_staff::Column::UserId.eq(user_id))
            .filter(club_staff::Column::IsActive.eq(true))
            .one(&*self.db_pool)
            .await?;
        if staff.is_some() {
            return Ok(true);
        }

        if let Some(owner) = owner_profile::Entity::find()
            .filter(owner_profile::Column::UserId.eq(user_id))
            .one(&*self.db_pool)
            .await?
        {
            let owned = bowling_club::Entity::find()
                .filter(bowling_club::Column::ClubId.eq(club_id))
                .filter(bowling_club::Column::OwnerId.eq(owner.owner_id))
                .one(&*self.db_pool)
                .await?;
            if owned.is_some() {
                return Ok(true);
            }
        }

        if let Some(manager) = manager_profile::Entity::find()
            .filter(manager_profile::Column::UserId.eq(user_id))
            .one(&*self.db_pool)
            .await?
        {
            if manager.club_id == Some(club_id) {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// User ids to notify about events in a club: the owner plus managers.
    pub async fn club_team_user_ids(&self, club_id: i64) -> Result<Vec<i64>, ServiceError> {
        let mut ids = Vec::new();
        if let Some(club) = bowling_club::Entity::find_by_id(club_id)
            .one(&*self.db_pool)
            .await?
        {
            if let Some(owner_id) = club.owner_id {
                if let Some(owner) = owner_profile::Entity::find_by_id(owner_id)
                    .one(&*self.db_pool)
                    .await?
                {
                    ids.push(owner.user_id);
                }
            }
        }
        let managers = manager_profile::Entity::find()
            .filter(manager_profile::Column::ClubId.eq(club_id))
            .all(&*self.db_pool)
            .await?;
        for manager in managers {
            if !ids.contains(&manager.user_id) {
                ids.push(manager.user_id);
            }
        }
        Ok(ids)
    }
}
