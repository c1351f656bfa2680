use crate::auth::{AuthService, TokenPair};
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::entities::enums::{AccountType, Role};
use crate::entities::{bowling_club, manager_profile, mechanic_profile, owner_profile, user};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

const MIN_PASSWORD_LEN: usize = 8;

/// Registration payload after DTO validation.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub phone: String,
    pub email: Option<String>,
    pub password: String,
    pub role: String,
    pub account_type: String,
    pub mechanic: Option<MechanicProfileInput>,
    pub owner: Option<OwnerProfileInput>,
    pub manager: Option<ManagerProfileInput>,
    pub club: Option<ClubInput>,
}

#[derive(Debug, Clone)]
pub struct MechanicProfileInput {
    pub full_name: String,
    pub total_experience_years: Option<i32>,
    pub bowling_experience_years: Option<i32>,
    pub skills: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OwnerProfileInput {
    pub inn: Option<String>,
    pub legal_name: Option<String>,
    pub contact_person: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ManagerProfileInput {
    pub full_name: String,
    pub club_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct ClubInput {
    pub name: String,
    pub address: Option<String>,
    pub lanes_count: i32,
}

/// Profile-aware view of a user account.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserInfo {
    pub user_id: i64,
    pub phone: String,
    pub email: Option<String>,
    pub role: String,
    pub account_type: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub full_name: Option<String>,
    pub mechanic_profile_id: Option<i64>,
    pub owner_profile_id: Option<i64>,
    pub manager_profile_id: Option<i64>,
}

/// Account management: registration, login, password changes and the admin
/// user directory.
#[derive(Clone)]
pub struct AccountService {
    db_pool: Arc<DbPool>,
    auth: Arc<AuthService>,
    event_sender: EventSender,
}

impl AccountService {
    pub fn new(db_pool: Arc<DbPool>, auth: Arc<AuthService>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            auth,
            event_sender,
        }
    }

    /// Normalizes Russian phone numbers to `+7XXXXXXXXXX`.
    pub fn normalize_phone(raw: &str) -> Option<String> {
        let mut digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() == 11 && digits.starts_with('8') {
            digits.replace_range(..1, "7");
        }
        if digits.len() == 10 {
            digits.insert(0, '7');
        }
        if digits.len() != 11 || !digits.starts_with('7') {
            return None;
        }
        Some(format!("+{}", digits))
    }

    fn validate_role_combination(role: Role, account_type: AccountType) -> Result<(), ServiceError> {
        let ok = match role {
            Role::Admin => account_type == AccountType::MainAdmin,
            Role::ClubOwner => {
                matches!(account_type, AccountType::ClubOwner | AccountType::ClubManager)
            }
            Role::Mechanic | Role::HeadMechanic => matches!(
                account_type,
                AccountType::Individual
                    | AccountType::FreeMechanicBasic
                    | AccountType::FreeMechanicPremium
            ),
        };
        if ok {
            Ok(())
        } else {
            Err(ServiceError::ValidationError(format!(
                "Role {} cannot be combined with account type {}",
                role, account_type
            )))
        }
    }

    #[instrument(skip(self, input), fields(phone = %input.phone))]
    pub async fn register(&self, input: RegisterInput) -> Result<user::Model, ServiceError> {
        let phone = Self::normalize_phone(&input.phone).ok_or_else(|| {
            ServiceError::ValidationError("Phone number is not a valid Russian number".to_string())
        })?;
        if input.password.len() < MIN_PASSWORD_LEN {
            return Err(ServiceError::ValidationError(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        let role = Role::from_str(&input.role)
            .map_err(|_| ServiceError::ValidationError(format!("Unsupported role: {}", input.role)))?;
        let account_type = AccountType::from_str(&input.account_type).map_err(|_| {
            ServiceError::ValidationError(format!(
                "Unsupported account type: {}",
                input.account_type
            ))
        })?;
        Self::validate_role_combination(role, account_type)?;

        match role {
            Role::Mechanic | Role::HeadMechanic if input.mechanic.is_none() => {
                return Err(ServiceError::ValidationError(
                    "Mechanic profile data is required".to_string(),
                ));
            }
            Role::ClubOwner if account_type == AccountType::ClubOwner && input.owner.is_none() => {
                return Err(ServiceError::ValidationError(
                    "Owner profile data is required".to_string(),
                ));
            }
            Role::ClubOwner if account_type == AccountType::ClubManager && input.manager.is_none() => {
                return Err(ServiceError::ValidationError(
                    "Manager profile data is required".to_string(),
                ));
            }
            _ => {}
        }

        let duplicate = user::Entity::find()
            .filter(user::Column::Phone.eq(phone.clone()))
            .one(&*self.db_pool)
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "User with phone {} already exists",
                phone
            )));
        }

        let password_hash = self
            .auth
            .hash_password(&input.password)
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;

        let account = user::ActiveModel {
            phone: Set(phone.clone()),
            email: Set(input.email.clone()),
            password_hash: Set(password_hash),
            role: Set(role.to_string()),
            account_type: Set(account_type.to_string()),
            is_active: Set(true),
            is_verified: Set(false),
            registration_date: Set(Utc::now().date_naive()),
            last_modified: Set(None),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;

        match role {
            Role::Mechanic | Role::HeadMechanic => {
                let Some(data) = input.mechanic else {
                    return Err(ServiceError::ValidationError(
                        "Mechanic profile data is required".to_string(),
                    ));
                };
                mechanic_profile::ActiveModel {
                    user_id: Set(account.user_id),
                    full_name: Set(data.full_name),
                    total_experience_years: Set(data.total_experience_years),
                    bowling_experience_years: Set(data.bowling_experience_years),
                    skills: Set(data.skills),
                    is_data_verified: Set(false),
                    created_at: Set(Utc::now().date_naive()),
                    ..Default::default()
                }
                .insert(&*self.db_pool)
                .await?;
            }
            Role::ClubOwner if account_type == AccountType::ClubOwner => {
                let Some(data) = input.owner else {
                    return Err(ServiceError::ValidationError(
                        "Owner profile data is required".to_string(),
                    ));
                };
                let owner = owner_profile::ActiveModel {
                    user_id: Set(account.user_id),
                    inn: Set(data.inn),
                    legal_name: Set(data.legal_name),
                    contact_person: Set(data.contact_person),
                    is_data_verified: Set(false),
                    created_at: Set(Utc::now().date_naive()),
                    ..Default::default()
                }
                .insert(&*self.db_pool)
                .await?;

                if let Some(club) = input.club {
                    bowling_club::ActiveModel {
                        owner_id: Set(Some(owner.owner_id)),
                        name: Set(club.name),
                        address: Set(club.address),
                        lanes_count: Set(club.lanes_count),
                        is_active: Set(true),
                        is_verified: Set(false),
                        created_at: Set(Utc::now().date_naive()),
                        ..Default::default()
                    }
                    .insert(&*self.db_pool)
                    .await?;
                }
            }
            Role::ClubOwner => {
                let Some(data) = input.manager else {
                    return Err(ServiceError::ValidationError(
                        "Manager profile data is required".to_string(),
                    ));
                };
                manager_profile::ActiveModel {
                    user_id: Set(account.user_id),
                    club_id: Set(data.club_id),
                    full_name: Set(data.full_name),
                    is_data_verified: Set(false),
                    created_at: Set(Utc::now()),
                    ..Default::default()
                }
                .insert(&*self.db_pool)
                .await?;
            }
            Role::Admin => {}
        }

        self.event_sender
            .send(Event::UserRegistered(account.user_id))
            .await;
        info!(user_id = account.user_id, "user registered");
        Ok(account)
    }

    /// Verifies credentials and issues a token pair.
    pub async fn login(&self, phone: &str, password: &str) -> Result<(user::Model, TokenPair), ServiceError> {
        let normalized = Self::normalize_phone(phone)
            .unwrap_or_else(|| phone.trim().to_string());
        let account = self
            .auth
            .authenticate(&normalized, password)
            .await
            .map_err(|e| ServiceError::AuthError(e.to_string()))?;
        let pair = self
            .auth
            .generate_token(&account)
            .await
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;
        Ok((account, pair))
    }

    pub async fn change_password(
        &self,
        user_id: i64,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), ServiceError> {
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(ServiceError::ValidationError(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        let account = user::Entity::find_by_id(user_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))?;

        self.auth
            .verify_password(old_password, &account.password_hash)
            .map_err(|_| ServiceError::AuthError("Old password does not match".to_string()))?;

        let new_hash = self
            .auth
            .hash_password(new_password)
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;
        let mut active: user::ActiveModel = account.into();
        active.password_hash = Set(new_hash);
        active.last_modified = Set(Some(Utc::now()));
        active.update(&*self.db_pool).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn user_info(&self, user_id: i64) -> Result<UserInfo, ServiceError> {
        let account = user::Entity::find_by_id(user_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))?;

        let mechanic = mechanic_profile::Entity::find()
            .filter(mechanic_profile::Column::UserId.eq(user_id))
            .one(&*self.db_pool)
            .await?;
        let owner = owner_profile::Entity::find()
            .filter(owner_profile::Column::UserId.eq(user_id))
            .one(&*self.db_pool)
            .await?;
        let manager = manager_profile::Entity::find()
            .filter(manager_profile::Column::UserId.eq(user_id))
            .one(&*self.db_pool)
            .await?;

        let full_name = mechanic
            .as_ref()
            .map(|m| m.full_name.clone())
            .or_else(|| manager.as_ref().map(|m| m.full_name.clone()))
            .or_else(|| owner.as_ref().and_then(|o| o.contact_person.clone()));

        Ok(UserInfo {
            user_id: account.user_id,
            phone: account.phone,
            email: account.email,
            role: account.role,
            account_type: account.account_type,
            is_active: account.is_active,
            is_verified: account.is_verified,
            full_name,
            mechanic_profile_id: mechanic.map(|m| m.profile_id),
            owner_profile_id: owner.map(|o| o.owner_id),
            manager_profile_id: manager.map(|m| m.manager_id),
        })
    }

    /// Admin directory of users with optional role/active filters.
    #[instrument(skip(self))]
    pub async fn list_users(
        &self,
        role: Option<String>,
        is_active: Option<bool>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<user::Model>, u64), ServiceError> {
        let mut finder = user::Entity::find();
        if let Some(role) = role {
            finder = finder.filter(user::Column::Role.eq(role));
        }
        if let Some(active) = is_active {
            finder = finder.filter(user::Column::IsActive.eq(active));
        }
        let paginator = finder
            .order_by_asc(user::Column::UserId)
            .paginate(&*self.db_pool, per_page.max(1));
        let total = paginator.num_items().await?;
        let users = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((users, total))
    }

    pub async fn set_active(&self, user_id: i64, active: bool) -> Result<user::Model, ServiceError> {
        let account = user::Entity::find_by_id(user_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))?;
        let mut model: user::ActiveModel = account.into();
        model.is_active = Set(active);
        model.last_modified = Set(Some(Utc::now()));
        Ok(model.update(&*self.db_pool).await?)
    }

    /// Marks the account and its role profile as verified.
    pub async fn verify_user(&self, user_id: i64) -> Result<user::Model, ServiceError> {
        let account = user::Entity::find_by_id(user_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))?;

        if let Some(mechanic) = mechanic_profile::Entity::find()
            .filter(mechanic_profile::Column::UserId.eq(user_id))
            .one(&*self.db_pool)
            .await?
        {
            let mut active: mechanic_profile::ActiveModel = mechanic.into();
            active.is_data_verified = Set(true);
            active.verification_date = Set(Some(Utc::now().date_naive()));
            active.update(&*self.db_pool).await?;
        }
        if let Some(owner) = owner_profile::Entity::find()
            .filter(owner_profile::Column::UserId.eq(user_id))
            .one(&*self.db_pool)
            .await?
        {
            let mut active: owner_profile::ActiveModel = owner.into();
            active.is_data_verified = Set(true);
            active.verification_date = Set(Some(Utc::now().date_naive()));
            active.update(&*self.db_pool).await?;
        }
        if let Some(manager) = manager_profile::Entity::find()
            .filter(manager_profile::Column::UserId.eq(user_id))
            .one(&*self.db_pool)
            .await?
        {
            let mut active: manager_profile::ActiveModel = manager.into();
            active.is_data_verified = Set(true);
            active.update(&*self.db_pool).await?;
        }

        let mut model: user::ActiveModel = account.into();
        model.is_verified = Set(true);
        model.last_modified = Set(Some(Utc::now()));
        Ok(model.update(&*self.db_pool).await?)
    }

    /// Seeds the administrator account configured for this deployment.
    /// Runs once at startup and is a no-op when the account exists.
    pub async fn ensure_seed_admin(&self, cfg: &AppConfig) -> Result<(), ServiceError> {
        let (Some(phone), Some(password)) = (&cfg.seed_admin_phone, &cfg.seed_admin_password)
        else {
            return Ok(());
        };
        let normalized = Self::normalize_phone(phone).ok_or_else(|| {
            ServiceError::ValidationError("seed_admin_phone is not a valid phone".to_string())
        })?;
        let existing = user::Entity::find()
            .filter(user::Column::Phone.eq(normalized.clone()))
            .one(&*self.db_pool)
            .await?;
        if existing.is_some() {
            return Ok(());
        }
        self.register(RegisterInput {
            phone: normalized,
            email: None,
            password: password.clone(),
            role: Role::Admin.to_string(),
            account_type: AccountType::MainAdmin.to_string(),
            mechanic: None,
            owner: None,
            manager: None,
            club: None,
        })
        .await?;
        info!("seed administrator account created");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_normalization_handles_common_forms() {
        assert_eq!(
            AccountService::normalize_phone("8 (999) 123-45-67").as_deref(),
            Some("+79991234567")
        );
        assert_eq!(
            AccountService::normalize_phone("9991234567").as_deref(),
            Some("+79991234567")
        );
        assert_eq!(
            AccountService::normalize_phone("+7 999 123 45 67").as_deref(),
            Some("+79991234567")
        );
        assert_eq!(AccountService::normalize_phone("12345"), None);
        assert_eq!(AccountService::normalize_phone("+1 555 0100 200"), None);
    }

    #[test]
    fn role_account_type_matrix() {
        let check = AccountService::validate_role_combination;
        assert!(check(Role::Admin, AccountType::MainAdmin).is_ok());
        assert!(check(Role::Admin, AccountType::Individual).is_err());
        assert!(check(Role::ClubOwner, AccountType::ClubOwner).is_ok());
        assert!(check(Role::ClubOwner, AccountType::ClubManager).is_ok());
        assert!(check(Role::Mechanic, AccountType::FreeMechanicBasic).is_ok());
        assert!(check(Role::HeadMechanic, AccountType::MainAdmin).is_err());
    }
}
