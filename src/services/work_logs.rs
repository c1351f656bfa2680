use crate::db::DbPool;
use crate::entities::enums::{WorkLogStatus, WorkType};
use crate::entities::{
    maintenance_request, mechanic_profile, work_log, work_log_status_history,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::notifications::{NotificationKind, NotificationService};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument};

/// Work logs below or at this priority are treated as high priority.
const HIGH_PRIORITY_THRESHOLD: i32 = 2;
const DEFAULT_PRIORITY: i32 = 3;

#[derive(Debug, Clone)]
pub struct CreateWorkLogInput {
    pub club_id: Option<i64>,
    pub lane_number: Option<i32>,
    pub mechanic_id: Option<i64>,
    pub work_type: String,
    pub problem_description: Option<String>,
    pub estimated_hours: Option<f64>,
    pub priority: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct WorkLogSearch {
    pub club_id: Option<i64>,
    pub lane_number: Option<i32>,
    pub mechanic_id: Option<i64>,
    pub status: Option<String>,
    pub work_type: Option<String>,
    pub keyword: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub active_only: bool,
    pub page: u64,
    pub per_page: u64,
}

/// Work log lifecycle with a status-history audit trail.
#[derive(Clone)]
pub struct WorkLogService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    notifications: NotificationService,
}

impl WorkLogService {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: EventSender,
        notifications: NotificationService,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            notifications,
        }
    }

    /// Opens a work log for an existing maintenance request, copying its
    /// club, lane and mechanic.
    #[instrument(skip(self))]
    pub async fn create_from_request(
        &self,
        request_id: i64,
        created_by: i64,
    ) -> Result<work_log::Model, ServiceError> {
        let request = maintenance_request::Entity::find_by_id(request_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Maintenance request not found".to_string()))?;

        let log = work_log::ActiveModel {
            maintenance_request_id: Set(Some(request.request_id)),
            club_id: Set(request.club_id),
            lane_number: Set(request.lane_number),
            mechanic_id: Set(Some(request.mechanic_id)),
            status: Set(WorkLogStatus::Created.to_string()),
            work_type: Set(WorkType::CorrectiveMaintenance.to_string()),
            problem_description: Set(Some(format!(
                "Maintenance request: {}",
                request.request_reason
            ))),
            priority: Set(DEFAULT_PRIORITY),
            created_date: Set(Utc::now()),
            created_by: Set(Some(created_by)),
            is_manual_edit: Set(false),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;

        self.append_history(
            &log,
            None,
            WorkLogStatus::Created,
            Some(created_by),
            Some("Created from maintenance request".to_string()),
        )
        .await?;
        self.event_sender.send(Event::WorkLogCreated(log.log_id)).await;
        self.notify_created(&log).await?;
        info!(log_id = log.log_id, request_id, "work log created from request");
        Ok(log)
    }

    #[instrument(skip(self, input))]
    pub async fn create_manual(
        &self,
        input: CreateWorkLogInput,
        created_by: i64,
    ) -> Result<work_log::Model, ServiceError> {
        let work_type = WorkType::from_str(&input.work_type).map_err(|_| {
            ServiceError::ValidationError(format!("Unknown work type: {}", input.work_type))
        })?;
        if let Some(priority) = input.priority {
            if !(1..=5).contains(&priority) {
                return Err(ServiceError::ValidationError(
                    "Priority must be between 1 and 5".to_string(),
                ));
            }
        }

        let log = work_log::ActiveModel {
            club_id: Set(input.club_id),
            lane_number: Set(input.lane_number),
            mechanic_id: Set(input.mechanic_id),
            status: Set(WorkLogStatus::Created.to_string()),
            work_type: Set(work_type.to_string()),
            problem_description: Set(input.problem_description),
            estimated_hours: Set(input.estimated_hours),
            priority: Set(input.priority.unwrap_or(DEFAULT_PRIORITY)),
            created_date: Set(Utc::now()),
            created_by: Set(Some(created_by)),
            is_manual_edit: Set(false),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;

        self.append_history(
            &log,
            None,
            WorkLogStatus::Created,
            Some(created_by),
            Some("Manual work log entry".to_string()),
        )
        .await?;
        self.event_sender.send(Event::WorkLogCreated(log.log_id)).await;
        self.notify_created(&log).await?;
        Ok(log)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, log_id: i64) -> Result<work_log::Model, ServiceError> {
        work_log::Entity::find_by_id(log_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Work log {} not found", log_id)))
    }

    /// Moves a work log to a new status, stamping the lifecycle dates.
    #[instrument(skip(self, reason))]
    pub async fn update_status(
        &self,
        log_id: i64,
        new_status: &str,
        reason: Option<String>,
        modified_by: i64,
    ) -> Result<work_log::Model, ServiceError> {
        let status = WorkLogStatus::from_str(new_status).map_err(|_| {
            ServiceError::ValidationError(format!("Unknown work log status: {}", new_status))
        })?;
        let log = self.get(log_id).await?;
        let previous = WorkLogStatus::from_str(&log.status).ok();

        let started = log.started_date;
        let completed = log.completed_date;
        let mut model: work_log::ActiveModel = log.into();
        model.status = Set(status.to_string());
        model.modified_by = Set(Some(modified_by));
        model.modified_date = Set(Some(Utc::now()));
        match status {
            WorkLogStatus::InProgress => {
                if started.is_none() {
                    model.started_date = Set(Some(Utc::now()));
                }
            }
            WorkLogStatus::Completed => {
                model.completed_date = Set(Some(Utc::now()));
            }
            WorkLogStatus::Closed => {
                if completed.is_none() {
                    model.completed_date = Set(Some(Utc::now()));
                }
            }
            _ => {}
        }
        let updated = model.update(&*self.db_pool).await?;

        self.append_history(&updated, previous, status, Some(modified_by), reason)
            .await?;
        self.event_sender
            .send(Event::WorkLogStatusChanged {
                log_id,
                old_status: previous.map(|s| s.to_string()),
                new_status: status.to_string(),
            })
            .await;
        if let Some(user_id) = self.mechanic_user_id(&updated).await? {
            self.notifications
                .push(
                    user_id,
                    NotificationKind::WorkLogStatusChanged,
                    format!("Work log #{} moved to {}", log_id, status),
                )
                .await;
        }
        info!(log_id, status = %status, "work log status updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn assign_mechanic(
        &self,
        log_id: i64,
        mechanic_id: i64,
        assigned_by: i64,
    ) -> Result<work_log::Model, ServiceError> {
        let log = self.get(log_id).await?;
        let mechanic = mechanic_profile::Entity::find_by_id(mechanic_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Mechanic not found".to_string()))?;

        let previous = WorkLogStatus::from_str(&log.status).ok();
        let mut model: work_log::ActiveModel = log.into();
        model.mechanic_id = Set(Some(mechanic.profile_id));
        model.status = Set(WorkLogStatus::Assigned.to_string());
        model.modified_by = Set(Some(assigned_by));
        model.modified_date = Set(Some(Utc::now()));
        let updated = model.update(&*self.db_pool).await?;

        self.append_history(
            &updated,
            previous,
            WorkLogStatus::Assigned,
            Some(assigned_by),
            Some(format!("Assigned to {}", mechanic.full_name)),
        )
        .await?;
        self.event_sender
            .send(Event::WorkLogAssigned {
                log_id,
                mechanic_id: mechanic.profile_id,
            })
            .await;
        self.notifications
            .push(
                mechanic.user_id,
                NotificationKind::WorkLogAssigned,
                format!("Work log #{} was assigned to you", log_id),
            )
            .await;
        Ok(updated)
    }

    /// Records the outcome of the work and recomputes the total cost.
    #[instrument(skip(self, work_performed, solution_description))]
    pub async fn update_details(
        &self,
        log_id: i64,
        work_performed: Option<String>,
        solution_description: Option<String>,
        actual_hours: Option<f64>,
        labor_cost: Option<f64>,
        parts_cost: Option<f64>,
        quality_rating: Option<i32>,
        modified_by: i64,
    ) -> Result<work_log::Model, ServiceError> {
        if let Some(rating) = quality_rating {
            if !(1..=10).contains(&rating) {
                return Err(ServiceError::ValidationError(
                    "Quality rating must be between 1 and 10".to_string(),
                ));
            }
        }
        let log = self.get(log_id).await?;
        let labor = labor_cost.or(log.labor_cost).unwrap_or(0.0);
        let parts = parts_cost.or(log.total_parts_cost).unwrap_or(0.0);

        let mut model: work_log::ActiveModel = log.into();
        if work_performed.is_some() {
            model.work_performed = Set(work_performed);
        }
        if solution_description.is_some() {
            model.solution_description = Set(solution_description);
        }
        if actual_hours.is_some() {
            model.actual_hours = Set(actual_hours);
        }
        if labor_cost.is_some() {
            model.labor_cost = Set(labor_cost);
        }
        if parts_cost.is_some() {
            model.total_parts_cost = Set(parts_cost);
        }
        if quality_rating.is_some() {
            model.quality_rating = Set(quality_rating);
        }
        model.total_cost = Set(Some(labor + parts));
        model.modified_by = Set(Some(modified_by));
        model.modified_date = Set(Some(Utc::now()));
        Ok(model.update(&*self.db_pool).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, log_id: i64) -> Result<(), ServiceError> {
        let log = self.get(log_id).await?;
        work_log_status_history::Entity::delete_many()
            .filter(work_log_status_history::Column::WorkLogId.eq(log_id))
            .exec(&*self.db_pool)
            .await?;
        work_log::Entity::delete_by_id(log.log_id)
            .exec(&*self.db_pool)
            .await?;
        Ok(())
    }

    /// Filtered, paginated search. Keyword matches any description field.
    #[instrument(skip(self, search))]
    pub async fn search(
        &self,
        search: WorkLogSearch,
    ) -> Result<(Vec<work_log::Model>, u64), ServiceError> {
        let mut finder = work_log::Entity::find();
        if let Some(club_id) = search.club_id {
            finder = finder.filter(work_log::Column::ClubId.eq(club_id));
        }
        if let Some(lane) = search.lane_number {
            finder = finder.filter(work_log::Column::LaneNumber.eq(lane));
        }
        if let Some(mechanic_id) = search.mechanic_id {
            finder = finder.filter(work_log::Column::MechanicId.eq(mechanic_id));
        }
        if let Some(status) = &search.status {
            let status = WorkLogStatus::from_str(status).map_err(|_| {
                ServiceError::ValidationError(format!("Unknown work log status: {}", status))
            })?;
            finder = finder.filter(work_log::Column::Status.eq(status.to_string()));
        }
        if let Some(work_type) = &search.work_type {
            let work_type = WorkType::from_str(work_type).map_err(|_| {
                ServiceError::ValidationError(format!("Unknown work type: {}", work_type))
            })?;
            finder = finder.filter(work_log::Column::WorkType.eq(work_type.to_string()));
        }
        if let Some(start) = search.start_date {
            finder = finder.filter(work_log::Column::CreatedDate.gte(start));
        }
        if let Some(end) = search.end_date {
            finder = finder.filter(work_log::Column::CreatedDate.lte(end));
        }
        if search.active_only {
            let active: Vec<String> = [
                WorkLogStatus::Created,
                WorkLogStatus::Assigned,
                WorkLogStatus::InProgress,
            ]
            .iter()
            .map(|s| s.to_string())
            .collect();
            finder = finder.filter(work_log::Column::Status.is_in(active));
        }
        if let Some(keyword) = &search.keyword {
            let pattern = format!("%{}%", keyword.trim());
            finder = finder.filter(
                sea_orm::Condition::any()
                    .add(work_log::Column::ProblemDescription.like(pattern.clone()))
                    .add(work_log::Column::WorkPerformed.like(pattern.clone()))
                    .add(work_log::Column::SolutionDescription.like(pattern)),
            );
        }

        let paginator = finder
            .order_by_desc(work_log::Column::CreatedDate)
            .paginate(&*self.db_pool, search.per_page.max(1));
        let total = paginator.num_items().await?;
        let logs = paginator.fetch_page(search.page.saturating_sub(1)).await?;
        Ok((logs, total))
    }

    #[instrument(skip(self))]
    pub async fn active_logs(&self) -> Result<Vec<work_log::Model>, ServiceError> {
        let active: Vec<String> = [
            WorkLogStatus::Created,
            WorkLogStatus::Assigned,
            WorkLogStatus::InProgress,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let logs = work_log::Entity::find()
            .filter(work_log::Column::Status.is_in(active))
            .order_by_desc(work_log::Column::CreatedDate)
            .all(&*self.db_pool)
            .await?;
        Ok(logs)
    }

    #[instrument(skip(self))]
    pub async fn high_priority_logs(&self) -> Result<Vec<work_log::Model>, ServiceError> {
        let logs = work_log::Entity::find()
            .filter(work_log::Column::Priority.lte(HIGH_PRIORITY_THRESHOLD))
            .order_by_asc(work_log::Column::Priority)
            .order_by_desc(work_log::Column::CreatedDate)
            .all(&*self.db_pool)
            .await?;
        Ok(logs)
    }

    #[instrument(skip(self))]
    pub async fn logs_by_mechanic(&self, mechanic_id: i64) -> Result<Vec<work_log::Model>, ServiceError> {
        let logs = work_log::Entity::find()
            .filter(work_log::Column::MechanicId.eq(mechanic_id))
            .order_by_desc(work_log::Column::CreatedDate)
            .all(&*self.db_pool)
            .await?;
        Ok(logs)
    }

    #[instrument(skip(self))]
    pub async fn completed_logs(&self) -> Result<Vec<work_log::Model>, ServiceError> {
        let logs = work_log::Entity::find()
            .filter(work_log::Column::CompletedDate.is_not_null())
            .order_by_desc(work_log::Column::CompletedDate)
            .all(&*self.db_pool)
            .await?;
        Ok(logs)
    }

    #[instrument(skip(self))]
    pub async fn pending_logs(&self) -> Result<Vec<work_log::Model>, ServiceError> {
        let logs = work_log::Entity::find()
            .filter(work_log::Column::CompletedDate.is_null())
            .order_by_desc(work_log::Column::CreatedDate)
            .all(&*self.db_pool)
            .await?;
        Ok(logs)
    }

    #[instrument(skip(self))]
    pub async fn history_of(
        &self,
        log_id: i64,
    ) -> Result<Vec<work_log_status_history::Model>, ServiceError> {
        let history = work_log_status_history::Entity::find()
            .filter(work_log_status_history::Column::WorkLogId.eq(log_id))
            .order_by_asc(work_log_status_history::Column::HistoryId)
            .all(&*self.db_pool)
            .await?;
        Ok(history)
    }

    async fn append_history(
        &self,
        log: &work_log::Model,
        previous: Option<WorkLogStatus>,
        new_status: WorkLogStatus,
        changed_by: Option<i64>,
        reason: Option<String>,
    ) -> Result<(), ServiceError> {
        work_log_status_history::ActiveModel {
            work_log_id: Set(log.log_id),
            previous_status: Set(previous.map(|s| s.to_string())),
            new_status: Set(new_status.to_string()),
            changed_by: Set(changed_by),
            changed_date: Set(Utc::now()),
            reason: Set(reason),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;
        Ok(())
    }

    async fn notify_created(&self, log: &work_log::Model) -> Result<(), ServiceError> {
        if let Some(user_id) = self.mechanic_user_id(log).await? {
            self.notifications
                .push(
                    user_id,
                    NotificationKind::WorkLogCreated,
                    format!("Work log #{} was opened", log.log_id),
                )
                .await;
        }
        Ok(())
    }

    async fn mechanic_user_id(&self, log: &work_log::Model) -> Result<Option<i64>, ServiceError> {
        let Some(mechanic_id) = log.mechanic_id else {
            return Ok(None);
        };
        let mechanic = mechanic_profile::Entity::find_by_id(mechanic_id)
            .one(&*self.db_pool)
            .await?;
        Ok(mechanic.map(|m| m.user_id))
    }
}
