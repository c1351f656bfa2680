use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::entities::enums::Role;
use crate::entities::{bowling_club, maintenance_request, mechanic_profile, work_log};
use crate::errors::ServiceError;
use crate::services::inventory::{InventoryService, StockItem};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SearchResponse {
    pub query: String,
    pub parts: Vec<StockItem>,
    pub requests: Vec<RequestHit>,
    pub work_logs: Vec<WorkLogHit>,
    pub clubs: Vec<ClubHit>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequestHit {
    pub request_id: i64,
    pub club_id: Option<i64>,
    pub status: String,
    pub reason: String,
    pub request_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WorkLogHit {
    pub log_id: i64,
    pub club_id: Option<i64>,
    pub status: String,
    pub work_type: String,
    pub problem_description: Option<String>,
    pub created_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClubHit {
    pub club_id: i64,
    pub name: String,
    pub address: Option<String>,
    pub is_active: bool,
}

/// One query fanned out over parts, requests, work logs and clubs, scoped
/// by what the caller is allowed to see.
#[derive(Clone)]
pub struct SearchService {
    db_pool: Arc<DbPool>,
    inventory: Arc<InventoryService>,
}

impl SearchService {
    pub fn new(db_pool: Arc<DbPool>, inventory: Arc<InventoryService>) -> Self {
        Self { db_pool, inventory }
    }

    #[instrument(skip(self, auth_user), fields(user_id = auth_user.user_id))]
    pub async fn search(
        &self,
        query: &str,
        limit: u64,
        auth_user: &AuthUser,
    ) -> Result<SearchResponse, ServiceError> {
        let query = query.trim().to_string();
        if query.is_empty() {
            return Err(ServiceError::ValidationError(
                "Search query cannot be empty".to_string(),
            ));
        }
        let limit = limit.clamp(1, 50);
        let is_admin = auth_user.is_admin();

        // Visibility scope: mechanics see their own records, owners and
        // managers their clubs', admins everything.
        let mechanic_profile_id = match mechanic_profile::Entity::find()
            .filter(mechanic_profile::Column::UserId.eq(auth_user.user_id))
            .one(&*self.db_pool)
            .await?
        {
            Some(profile) => Some(profile.profile_id),
            None => None,
        };
        let accessible_clubs: Vec<i64> = if is_admin {
            Vec::new()
        } else {
            self.inventory
                .accessible_warehouses(auth_user.user_id)
                .await?
                .into_iter()
                .filter(|w| w.kind == crate::services::inventory::WarehouseKind::Club)
                .map(|w| w.warehouse_id)
                .collect()
        };

        let parts = self.search_parts(&query, limit, is_admin, &accessible_clubs).await?;
        let requests = self
            .search_requests(&query, limit, is_admin, mechanic_profile_id, &accessible_clubs)
            .await?;
        let work_logs = self
            .search_work_logs(&query, limit, is_admin, mechanic_profile_id, &accessible_clubs)
            .await?;
        let clubs = self.search_clubs(&query, limit, is_admin, &accessible_clubs).await?;

        Ok(SearchResponse {
            query,
            parts,
            requests,
            work_logs,
            clubs,
        })
    }

    async fn search_parts(
        &self,
        query: &str,
        limit: u64,
        is_admin: bool,
        accessible_clubs: &[i64],
    ) -> Result<Vec<StockItem>, ServiceError> {
        let mut items = self.inventory.search(None, Some(query), None).await?;
        if !is_admin {
            items.retain(|item| accessible_clubs.contains(&item.warehouse_id));
        }
        items.truncate(limit as usize);
        Ok(items)
    }

    async fn search_requests(
        &self,
        query: &str,
        limit: u64,
        is_admin: bool,
        mechanic_profile_id: Option<i64>,
        accessible_clubs: &[i64],
    ) -> Result<Vec<RequestHit>, ServiceError> {
        let pattern = format!("%{}%", query);
        let mut finder = maintenance_request::Entity::find().filter(
            Condition::any()
                .add(maintenance_request::Column::RequestReason.like(pattern.clone()))
                .add(maintenance_request::Column::ManagerNotes.like(pattern)),
        );
        if !is_admin {
            let mut scope = Condition::any();
            if let Some(profile_id) = mechanic_profile_id {
                scope = scope.add(maintenance_request::Column::MechanicId.eq(profile_id));
            }
            if !accessible_clubs.is_empty() {
                scope =
                    scope.add(maintenance_request::Column::ClubId.is_in(accessible_clubs.to_vec()));
            }
            finder = finder.filter(scope);
        }
        let requests = finder
            .order_by_desc(maintenance_request::Column::RequestDate)
            .limit(limit)
            .all(&*self.db_pool)
            .await?;
        Ok(requests
            .into_iter()
            .map(|r| RequestHit {
                request_id: r.request_id,
                club_id: r.club_id,
                status: r.status,
                reason: r.request_reason,
                request_date: r.request_date,
            })
            .collect())
    }

    async fn search_work_logs(
        &self,
        query: &str,
        limit: u64,
        is_admin: bool,
        mechanic_profile_id: Option<i64>,
        accessible_clubs: &[i64],
    ) -> Result<Vec<WorkLogHit>, ServiceError> {
        let pattern = format!("%{}%", query);
        let mut finder = work_log::Entity::find().filter(
            Condition::any()
                .add(work_log::Column::ProblemDescription.like(pattern.clone()))
                .add(work_log::Column::WorkPerformed.like(pattern.clone()))
                .add(work_log::Column::SolutionDescription.like(pattern)),
        );
        if !is_admin {
            let mut scope = Condition::any();
            if let Some(profile_id) = mechanic_profile_id {
                scope = scope.add(work_log::Column::MechanicId.eq(profile_id));
            }
            if !accessible_clubs.is_empty() {
                scope = scope.add(work_log::Column::ClubId.is_in(accessible_clubs.to_vec()));
            }
            finder = finder.filter(scope);
        }
        let logs = finder
            .order_by_desc(work_log::Column::CreatedDate)
            .limit(limit)
            .all(&*self.db_pool)
            .await?;
        Ok(logs
            .into_iter()
            .map(|l| WorkLogHit {
                log_id: l.log_id,
                club_id: l.club_id,
                status: l.status,
                work_type: l.work_type,
                problem_description: l.problem_description,
                created_date: l.created_date,
            })
            .collect())
    }

    async fn search_clubs(
        &self,
        query: &str,
        limit: u64,
        is_admin: bool,
        accessible_clubs: &[i64],
    ) -> Result<Vec<ClubHit>, ServiceError> {
        let pattern = format!("%{}%", query);
        let mut finder = bowling_club::Entity::find().filter(
            Condition::any()
                .add(bowling_club::Column::Name.like(pattern.clone()))
                .add(bowling_club::Column::Address.like(pattern)),
        );
        if !is_admin {
            // Non-admins search their clubs plus the public directory.
            finder = finder.filter(
                Condition::any()
                    .add(bowling_club::Column::ClubId.is_in(accessible_clubs.to_vec()))
                    .add(
                        Condition::all()
                            .add(bowling_club::Column::IsActive.eq(true))
                            .add(bowling_club::Column::IsVerified.eq(true)),
                    ),
            );
        }
        let clubs = finder
            .order_by_asc(bowling_club::Column::Name)
            .limit(limit)
            .all(&*self.db_pool)
            .await?;
        Ok(clubs
            .into_iter()
            .map(|c| ClubHit {
                club_id: c.club_id,
                name: c.name,
                address: c.address,
                is_active: c.is_active,
            })
            .collect())
    }
}
