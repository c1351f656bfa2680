use crate::db::DbPool;
use crate::entities::enums::{AccountType, MaintenanceRequestStatus, PartStatus, PurchaseOrderStatus};
use crate::entities::{
    maintenance_request, mechanic_profile, parts_catalog, request_part, supplier, user,
    warehouse_inventory,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::clubs::ClubService;
use crate::services::inventory::InventoryService;
use crate::services::notifications::{NotificationKind, NotificationService};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

// Inputs

#[derive(Debug, Clone)]
pub struct CreateRequestInput {
    pub mechanic_id: i64,
    pub club_id: i64,
    pub lane_number: Option<i32>,
    pub reason: String,
    pub parts: Vec<RequestedPartInput>,
}

#[derive(Debug, Clone)]
pub struct RequestedPartInput {
    pub part_name: Option<String>,
    pub catalog_number: Option<String>,
    pub quantity: i32,
    pub catalog_id: Option<i64>,
    pub inventory_id: Option<i64>,
    pub warehouse_id: Option<i64>,
    pub location: Option<String>,
    pub help_requested: bool,
}

#[derive(Debug, Clone)]
pub struct PartAvailabilityUpdate {
    pub part_id: i64,
    pub available: bool,
}

#[derive(Debug, Clone)]
pub struct StockIssueDecision {
    pub part_id: i64,
    pub approved_quantity: i32,
    pub manager_comment: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OrderPartItem {
    pub part_id: i64,
    pub supplier_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpDecision {
    Approved,
    Declined,
    Reassigned,
}

// Views

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequestView {
    pub request_id: i64,
    pub club_id: Option<i64>,
    pub club_name: Option<String>,
    pub lane_number: Option<i32>,
    pub mechanic_id: i64,
    pub mechanic_name: Option<String>,
    pub request_date: DateTime<Utc>,
    pub completion_date: Option<DateTime<Utc>>,
    pub status: String,
    pub manager_notes: Option<String>,
    pub manager_decision_date: Option<DateTime<Utc>>,
    pub reason: String,
    pub parts: Vec<RequestPartView>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RequestPartView {
    pub part_id: i64,
    pub catalog_number: String,
    pub part_name: String,
    pub quantity: i32,
    pub status: Option<String>,
    pub catalog_id: Option<i64>,
    pub inventory_id: Option<i64>,
    pub warehouse_id: Option<i64>,
    pub inventory_location: Option<String>,
    pub available: Option<bool>,
    pub accepted_quantity: Option<i32>,
    pub acceptance_comment: Option<String>,
    pub rejection_reason: Option<String>,
    pub supplier_id: Option<i64>,
    pub purchase_order_id: Option<i64>,
    pub order_date: Option<DateTime<Utc>>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub issue_date: Option<DateTime<Utc>>,
    pub help_requested: bool,
}

/// The maintenance-request workflow: creation, manager decisions, ordering,
/// delivery and installation tracking, and the help flow.
#[derive(Clone)]
pub struct MaintenanceService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    notifications: NotificationService,
    inventory: Arc<InventoryService>,
    clubs: Arc<ClubService>,
}

impl MaintenanceService {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: EventSender,
        notifications: NotificationService,
        inventory: Arc<InventoryService>,
        clubs: Arc<ClubService>,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            notifications,
            inventory,
            clubs,
        }
    }

    fn normalize(value: &Option<String>) -> Option<String> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn validate_parts(parts: &[RequestedPartInput]) -> Result<(), ServiceError> {
        if parts.is_empty() {
            return Err(ServiceError::ValidationError(
                "At least one part must be provided".to_string(),
            ));
        }
        for part in parts {
            let name = Self::normalize(&part.part_name);
            let number = Self::normalize(&part.catalog_number);
            if name.is_none() {
                return Err(ServiceError::ValidationError(
                    "Part name is required".to_string(),
                ));
            }
            if number.is_none() {
                return Err(ServiceError::ValidationError(format!(
                    "Catalog number is required for part '{}'",
                    name.unwrap_or_default()
                )));
            }
            if part.quantity <= 0 {
                return Err(ServiceError::ValidationError(format!(
                    "Quantity for part '{}' must be greater than zero",
                    name.unwrap_or_default()
                )));
            }
        }
        Ok(())
    }

    async fn mechanic_account_type(
        &self,
        mechanic: &mechanic_profile::Model,
    ) -> Result<AccountType, ServiceError> {
        let account = user::Entity::find_by_id(mechanic.user_id)
            .one(&*self.db_pool)
            .await?;
        Ok(account
            .and_then(|a| AccountType::from_str(&a.account_type).ok())
            .unwrap_or(AccountType::Individual))
    }

    #[instrument(skip(self, input), fields(mechanic_id = input.mechanic_id, club_id = input.club_id))]
    pub async fn create_request(
        &self,
        input: CreateRequestInput,
    ) -> Result<RequestView, ServiceError> {
        let mechanic = mechanic_profile::Entity::find_by_id(input.mechanic_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Mechanic not found".to_string()))?;

        let club = self.clubs.get_club(input.club_id).await?;

        let account_type = self.mechanic_account_type(&mechanic).await?;
        let works_in_club = self
            .clubs
            .user_has_club_access(mechanic.user_id, club.club_id)
            .await?;

        if account_type.is_free_mechanic() && !works_in_club {
            return Err(ServiceError::Forbidden(
                "Free mechanic has no granted access to the specified club".to_string(),
            ));
        }
        if account_type == AccountType::FreeMechanicBasic {
            return Err(ServiceError::InvalidOperation(
                "Basic free mechanics cannot create maintenance requests without an upgrade"
                    .to_string(),
            ));
        }
        if account_type == AccountType::Individual && !works_in_club {
            return Err(ServiceError::Forbidden(
                "Mechanic is not assigned to the specified club".to_string(),
            ));
        }

        Self::validate_parts(&input.parts)?;

        let reason = Self::normalize(&Some(input.reason)).ok_or_else(|| {
            ServiceError::ValidationError("Purchase or issue reason is required".to_string())
        })?;
        if let Some(lane) = input.lane_number {
            if lane <= 0 {
                return Err(ServiceError::ValidationError(
                    "Lane number must be greater than zero when provided".to_string(),
                ));
            }
        }

        let request = maintenance_request::ActiveModel {
            club_id: Set(Some(club.club_id)),
            lane_number: Set(input.lane_number),
            mechanic_id: Set(mechanic.profile_id),
            request_date: Set(Utc::now()),
            status: Set(MaintenanceRequestStatus::UnderReview.to_string()),
            request_reason: Set(reason),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;

        for part_input in &input.parts {
            self.insert_part(&request, &mechanic, account_type, part_input)
                .await?;
        }

        self.event_sender
            .send(Event::MaintenanceRequestCreated(request.request_id))
            .await;
        self.notify_club_team(
            &request,
            NotificationKind::RequestCreated,
            format!(
                "New maintenance request #{} for club {} (lane {})",
                request.request_id,
                club.name,
                request
                    .lane_number
                    .map(|l| l.to_string())
                    .unwrap_or_else(|| "-".to_string())
            ),
        )
        .await?;

        self.request_view(request.request_id).await
    }

    /// Builds and stores one part row, probing warehouses for availability.
    async fn insert_part(
        &self,
        request: &maintenance_request::Model,
        mechanic: &mechanic_profile::Model,
        account_type: AccountType,
        input: &RequestedPartInput,
    ) -> Result<request_part::Model, ServiceError> {
        let catalog_number = Self::normalize(&input.catalog_number).unwrap_or_default();
        let part_name = Self::normalize(&input.part_name)
            .or_else(|| Some(catalog_number.clone()))
            .unwrap_or_else(|| "Unknown part".to_string());

        // Resolve the catalog id by number when the client did not send one.
        let catalog_id = match input.catalog_id {
            Some(id) => Some(id),
            None => parts_catalog::Entity::find()
                .filter(parts_catalog::Column::CatalogNumber.eq(catalog_number.clone()))
                .one(&*self.db_pool)
                .await?
                .map(|c| c.catalog_id),
        };

        let mut part = request_part::ActiveModel {
            request_id: Set(request.request_id),
            catalog_number: Set(catalog_number),
            part_name: Set(part_name),
            quantity: Set(input.quantity),
            status: Set(Some(PartStatus::ApprovalPending.to_string())),
            catalog_id: Set(catalog_id),
            inventory_id: Set(input.inventory_id),
            warehouse_id: Set(input.warehouse_id),
            inventory_location: Set(Self::normalize(&input.location)),
            help_requested: Set(input.help_requested),
            ..Default::default()
        };

        if let Some(catalog_id) = catalog_id {
            let mut candidates: Vec<i64> = Vec::new();
            if account_type.is_free_mechanic() {
                candidates
                    .extend(self.inventory.personal_warehouse_ids(mechanic.profile_id).await?);
            } else {
                if let Some(club_id) = request.club_id {
                    candidates.push(club_id);
                }
                candidates
                    .extend(self.inventory.personal_warehouse_ids(mechanic.profile_id).await?);
            }

            let mut found = false;
            for warehouse_id in candidates {
                let Some(row) = self.inventory.find_stock(warehouse_id, catalog_id).await? else {
                    continue;
                };
                if row.available() >= input.quantity {
                    part.is_available = Set(Some(true));
                    part.warehouse_id = Set(Some(warehouse_id));
                    part.inventory_id = Set(Some(row.inventory_id));
                    part.inventory_location = Set(row
                        .location_reference
                        .clone()
                        .or_else(|| row.location_label()));
                    part.status = Set(Some(PartStatus::ApprovedForIssue.to_string()));
                    found = true;
                    break;
                }
            }
            if !found {
                part.is_available = Set(Some(false));
            }
        } else {
            part.is_available = Set(Some(false));
        }

        Ok(part.insert(&*self.db_pool).await?)
    }

    // Reads

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<RequestView>, ServiceError> {
        let requests = maintenance_request::Entity::find()
            .order_by_desc(maintenance_request::Column::RequestDate)
            .all(&*self.db_pool)
            .await?;
        self.to_views(requests).await
    }

    #[instrument(skip(self))]
    pub async fn list_by_status(&self, status: &str) -> Result<Vec<RequestView>, ServiceError> {
        let status = MaintenanceRequestStatus::from_str(status)
            .map_err(|_| ServiceError::ValidationError(format!("Unknown status: {}", status)))?;
        let requests = maintenance_request::Entity::find()
            .filter(maintenance_request::Column::Status.eq(status.to_string()))
            .order_by_desc(maintenance_request::Column::RequestDate)
            .all(&*self.db_pool)
            .await?;
        self.to_views(requests).await
    }

    #[instrument(skip(self))]
    pub async fn list_by_mechanic(&self, mechanic_id: i64) -> Result<Vec<RequestView>, ServiceError> {
        let requests = maintenance_request::Entity::find()
            .filter(maintenance_request::Column::MechanicId.eq(mechanic_id))
            .order_by_desc(maintenance_request::Column::RequestDate)
            .all(&*self.db_pool)
            .await?;
        self.to_views(requests).await
    }

    /// Requests of one club. When `requested_by` is given the user must have
    /// access to the club.
    #[instrument(skip(self))]
    pub async fn list_by_club(
        &self,
        club_id: i64,
        requested_by: Option<i64>,
    ) -> Result<Vec<RequestView>, ServiceError> {
        self.clubs.get_club(club_id).await?;
        if let Some(user_id) = requested_by {
            if !self.clubs.user_has_club_access(user_id, club_id).await? {
                return Err(ServiceError::Forbidden(
                    "You do not have access to this club".to_string(),
                ));
            }
        }
        let requests = maintenance_request::Entity::find()
            .filter(maintenance_request::Column::ClubId.eq(club_id))
            .order_by_desc(maintenance_request::Column::RequestDate)
            .all(&*self.db_pool)
            .await?;
        self.to_views(requests).await
    }

    #[instrument(skip(self))]
    pub async fn request_view(&self, request_id: i64) -> Result<RequestView, ServiceError> {
        let request = self.find_request(request_id).await?;
        let parts = self.parts_of(request_id).await?;
        self.build_view(request, parts).await
    }

    // Manager decisions

    #[instrument(skip(self, manager_notes, availability))]
    pub async fn approve_request(
        &self,
        request_id: i64,
        manager_notes: Option<String>,
        availability: Vec<PartAvailabilityUpdate>,
    ) -> Result<RequestView, ServiceError> {
        let request = self.find_request(request_id).await?;
        let old_status = request.status.clone();

        let mut active: maintenance_request::ActiveModel = request.into();
        active.status = Set(MaintenanceRequestStatus::Approved.to_string());
        active.manager_notes = Set(manager_notes);
        active.manager_decision_date = Set(Some(Utc::now()));
        let request = active.update(&*self.db_pool).await?;

        let overrides: BTreeMap<i64, bool> = availability
            .into_iter()
            .map(|u| (u.part_id, u.available))
            .collect();
        for part in self.parts_of(request_id).await? {
            let mut model: request_part::ActiveModel = part.clone().into();
            model.status = Set(None);
            if let Some(available) = overrides.get(&part.part_id) {
                model.is_available = Set(Some(*available));
            }
            model.update(&*self.db_pool).await?;
        }

        self.announce_status_change(&request, &old_status).await?;
        self.request_view(request_id).await
    }

    /// Per-part stock issue decisions. Approved quantities are written off
    /// immediately; the request status reflects the mix of outcomes.
    #[instrument(skip(self, manager_notes, decisions))]
    pub async fn issue_from_stock(
        &self,
        request_id: i64,
        manager_notes: Option<String>,
        decisions: Vec<StockIssueDecision>,
    ) -> Result<RequestView, ServiceError> {
        if decisions.is_empty() {
            return Err(ServiceError::ValidationError(
                "No per-part decisions provided".to_string(),
            ));
        }
        let request = self.find_request(request_id).await?;
        let old_status = request.status.clone();
        let parts = self.parts_of(request_id).await?;
        let parts_by_id: BTreeMap<i64, request_part::Model> =
            parts.into_iter().map(|p| (p.part_id, p)).collect();

        let mut any_approved = false;
        let mut any_partial = false;
        let mut any_rejected = false;

        for decision in &decisions {
            let part = parts_by_id.get(&decision.part_id).ok_or_else(|| {
                ServiceError::ValidationError("Part does not belong to the request".to_string())
            })?;

            let requested = part.quantity;
            let approved = decision.approved_quantity;
            if approved < 0 {
                return Err(ServiceError::ValidationError(
                    "Approved quantity cannot be negative".to_string(),
                ));
            }
            if approved > requested {
                return Err(ServiceError::ValidationError(
                    "Approved quantity exceeds the requested quantity".to_string(),
                ));
            }

            let status = if approved == 0 {
                any_rejected = true;
                PartStatus::Rejected
            } else if approved < requested {
                any_partial = true;
                any_approved = true;
                PartStatus::PartiallyAccepted
            } else {
                any_approved = true;
                PartStatus::ApprovedForIssue
            };

            if approved > 0 {
                if let Some(catalog_id) = part.catalog_id {
                    self.inventory
                        .reserve_part(catalog_id, approved, Some(request_id))
                        .await
                        .map_err(|e| match e {
                            ServiceError::InsufficientStock(_) | ServiceError::NotFound(_) => {
                                ServiceError::InvalidOperation(format!(
                                    "Not enough stock to issue part '{}'",
                                    part.part_name
                                ))
                            }
                            other => other,
                        })?;
                } else if let Some(inventory_id) = part.inventory_id {
                    self.inventory.hold_on_row(inventory_id, approved).await?;
                }
            }

            let mut model: request_part::ActiveModel = part.clone().into();
            model.accepted_quantity = Set(Some(approved));
            model.acceptance_comment = Set(decision.manager_comment.clone());
            model.acceptance_date = Set(Some(Utc::now()));
            model.status = Set(Some(status.to_string()));
            if approved > 0 {
                model.issue_date = Set(Some(Utc::now()));
            }
            model.update(&*self.db_pool).await?;
        }

        let new_status = if any_partial || any_rejected {
            MaintenanceRequestStatus::PartiallyApproved
        } else if any_approved {
            MaintenanceRequestStatus::Approved
        } else {
            MaintenanceRequestStatus::UnderReview
        };

        let mut active: maintenance_request::ActiveModel = request.into();
        active.status = Set(new_status.to_string());
        active.manager_notes = Set(manager_notes);
        active.manager_decision_date = Set(Some(Utc::now()));
        let request = active.update(&*self.db_pool).await?;

        self.announce_status_change(&request, &old_status).await?;
        self.request_view(request_id).await
    }

    #[instrument(skip(self, reason))]
    pub async fn reject_request(
        &self,
        request_id: i64,
        reason: String,
    ) -> Result<RequestView, ServiceError> {
        let reason = reason.trim().to_string();
        if reason.is_empty() {
            return Err(ServiceError::ValidationError(
                "A rejection reason must be provided".to_string(),
            ));
        }
        let request = self.find_request(request_id).await?;
        let old_status = request.status.clone();

        let mut active: maintenance_request::ActiveModel = request.into();
        active.status = Set(MaintenanceRequestStatus::Closed.to_string());
        active.manager_notes = Set(Some(reason.clone()));
        active.manager_decision_date = Set(Some(Utc::now()));
        let request = active.update(&*self.db_pool).await?;

        for part in self.parts_of(request_id).await? {
            let mut model: request_part::ActiveModel = part.into();
            model.status = Set(Some(PartStatus::Rejected.to_string()));
            model.rejection_reason = Set(Some(reason.clone()));
            model.update(&*self.db_pool).await?;
        }

        self.announce_status_change(&request, &old_status).await?;
        self.request_view(request_id).await
    }

    /// Adds parts to an open request.
    #[instrument(skip(self, parts))]
    pub async fn add_parts(
        &self,
        request_id: i64,
        parts: Vec<RequestedPartInput>,
    ) -> Result<RequestView, ServiceError> {
        let request = self.find_request(request_id).await?;
        let status = MaintenanceRequestStatus::from_str(&request.status)
            .map_err(|_| ServiceError::InternalError("Request status is not specified".into()))?;
        if status.is_terminal() {
            return Err(ServiceError::InvalidOperation(
                "Parts cannot be added to closed or completed requests".to_string(),
            ));
        }
        Self::validate_parts(&parts)?;

        let wants_stock_issue = parts.iter().any(|p| p.inventory_id.is_some());
        if wants_stock_issue && request.lane_number.is_none() {
            return Err(ServiceError::InvalidOperation(
                "Issuing from stock requires a lane number on the request".to_string(),
            ));
        }

        let mechanic = mechanic_profile::Entity::find_by_id(request.mechanic_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Mechanic not found".to_string()))?;
        let account_type = self.mechanic_account_type(&mechanic).await?;
        for part_input in &parts {
            self.insert_part(&request, &mechanic, account_type, part_input)
                .await?;
        }
        self.request_view(request_id).await
    }

    // Procurement side

    /// Groups the chosen parts by supplier and opens one purchase order per
    /// supplier. Parts move to ORDERED, the request to IN_PROGRESS.
    #[instrument(skip(self, items))]
    pub async fn order_parts(
        &self,
        request_id: i64,
        items: Vec<OrderPartItem>,
    ) -> Result<RequestView, ServiceError> {
        if items.is_empty() {
            return Err(ServiceError::ValidationError(
                "At least one part must be provided to create an order".to_string(),
            ));
        }
        let request = self.find_request(request_id).await?;
        let old_status = request.status.clone();
        let parts = self.parts_of(request_id).await?;
        let parts_by_id: BTreeMap<i64, request_part::Model> =
            parts.into_iter().map(|p| (p.part_id, p)).collect();

        let mut by_supplier: BTreeMap<i64, Vec<request_part::Model>> = BTreeMap::new();
        for item in &items {
            let part = parts_by_id.get(&item.part_id).ok_or_else(|| {
                ServiceError::ValidationError("Part does not belong to the request".to_string())
            })?;
            supplier::Entity::find_by_id(item.supplier_id)
                .one(&*self.db_pool)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Supplier {} not found", item.supplier_id))
                })?;
            by_supplier
                .entry(item.supplier_id)
                .or_default()
                .push(part.clone());
        }

        for (supplier_id, supplier_parts) in by_supplier {
            let order = crate::entities::purchase_order::ActiveModel {
                maintenance_request_id: Set(request_id),
                supplier_id: Set(Some(supplier_id)),
                status: Set(PurchaseOrderStatus::Pending.to_string()),
                order_date: Set(Utc::now()),
                ..Default::default()
            }
            .insert(&*self.db_pool)
            .await?;

            for part in supplier_parts {
                let mut model: request_part::ActiveModel = part.into();
                model.supplier_id = Set(Some(supplier_id));
                model.purchase_order_id = Set(Some(order.order_id));
                model.status = Set(Some(PartStatus::Ordered.to_string()));
                model.order_date = Set(Some(Utc::now()));
                model.update(&*self.db_pool).await?;
            }

            self.event_sender
                .send(Event::PurchaseOrderCreated {
                    order_id: order.order_id,
                    request_id,
                    supplier_id,
                })
                .await;
        }

        let mut active: maintenance_request::ActiveModel = request.into();
        active.status = Set(MaintenanceRequestStatus::InProgress.to_string());
        let request = active.update(&*self.db_pool).await?;
        self.announce_status_change(&request, &old_status).await?;
        self.request_view(request_id).await
    }

    #[instrument(skip(self, part_ids))]
    pub async fn mark_delivered(
        &self,
        request_id: i64,
        part_ids: Vec<i64>,
    ) -> Result<RequestView, ServiceError> {
        let request = self.find_request(request_id).await?;
        let old_status = request.status.clone();
        for part_id in part_ids {
            let part = self.find_part_of_request(request_id, part_id).await?;
            let mut model: request_part::ActiveModel = part.into();
            model.status = Set(Some(PartStatus::Delivered.to_string()));
            model.delivery_date = Set(Some(Utc::now()));
            model.update(&*self.db_pool).await?;
        }
        let mut active: maintenance_request::ActiveModel = request.into();
        active.status = Set(MaintenanceRequestStatus::InProgress.to_string());
        let request = active.update(&*self.db_pool).await?;
        self.announce_status_change(&request, &old_status).await?;
        self.request_view(request_id).await
    }

    /// Marks parts installed, writing catalog-linked ones off stock. The
    /// request is complete afterwards.
    #[instrument(skip(self, part_ids))]
    pub async fn mark_issued(
        &self,
        request_id: i64,
        part_ids: Vec<i64>,
    ) -> Result<RequestView, ServiceError> {
        let request = self.find_request(request_id).await?;
        let old_status = request.status.clone();
        for part_id in part_ids {
            let part = self.find_part_of_request(request_id, part_id).await?;

            let catalog_id = match part.catalog_id {
                Some(id) => Some(id),
                None => parts_catalog::Entity::find()
                    .filter(parts_catalog::Column::CatalogNumber.eq(part.catalog_number.clone()))
                    .one(&*self.db_pool)
                    .await?
                    .map(|c| c.catalog_id),
            };
            if let Some(catalog_id) = catalog_id {
                self.inventory
                    .reserve_part(catalog_id, part.quantity, Some(request_id))
                    .await
                    .map_err(|e| match e {
                        ServiceError::InsufficientStock(_) | ServiceError::NotFound(_) => {
                            ServiceError::InvalidOperation(format!(
                                "Failed to write part '{}' off stock",
                                part.part_name
                            ))
                        }
                        other => other,
                    })?;
            }

            let mut model: request_part::ActiveModel = part.into();
            model.status = Set(Some(PartStatus::Installed.to_string()));
            model.issue_date = Set(Some(Utc::now()));
            model.update(&*self.db_pool).await?;
        }
        let mut active: maintenance_request::ActiveModel = request.into();
        active.status = Set(MaintenanceRequestStatus::Done.to_string());
        let request = active.update(&*self.db_pool).await?;
        self.announce_status_change(&request, &old_status).await?;
        self.request_view(request_id).await
    }

    // Lifecycle

    #[instrument(skip(self))]
    pub async fn complete_request(&self, request_id: i64) -> Result<RequestView, ServiceError> {
        let request = self.find_request(request_id).await?;
        let status = MaintenanceRequestStatus::from_str(&request.status)
            .map_err(|_| ServiceError::InvalidOperation("Request status is not specified".into()))?;
        if status.is_terminal() {
            return Err(ServiceError::InvalidOperation(
                "Request is already completed or closed".to_string(),
            ));
        }
        if !matches!(
            status,
            MaintenanceRequestStatus::Approved
                | MaintenanceRequestStatus::InProgress
                | MaintenanceRequestStatus::PartiallyApproved
        ) {
            return Err(ServiceError::InvalidOperation(
                "Only approved or in-progress requests can be completed".to_string(),
            ));
        }
        let old_status = request.status.clone();
        let mut active: maintenance_request::ActiveModel = request.into();
        active.status = Set(MaintenanceRequestStatus::Done.to_string());
        active.completion_date = Set(Some(Utc::now()));
        let request = active.update(&*self.db_pool).await?;
        self.announce_status_change(&request, &old_status).await?;
        self.request_view(request_id).await
    }

    #[instrument(skip(self))]
    pub async fn close_request(&self, request_id: i64) -> Result<RequestView, ServiceError> {
        let request = self.find_request(request_id).await?;
        let old_status = request.status.clone();
        let mut active: maintenance_request::ActiveModel = request.into();
        active.status = Set(MaintenanceRequestStatus::Closed.to_string());
        active.completion_date = Set(Some(Utc::now()));
        let request = active.update(&*self.db_pool).await?;
        self.announce_status_change(&request, &old_status).await?;
        self.request_view(request_id).await
    }

    #[instrument(skip(self, reason))]
    pub async fn mark_unrepairable(
        &self,
        request_id: i64,
        reason: Option<String>,
    ) -> Result<RequestView, ServiceError> {
        let request = self.find_request(request_id).await?;
        let old_status = request.status.clone();
        let mut active: maintenance_request::ActiveModel = request.into();
        active.status = Set(MaintenanceRequestStatus::Unrepairable.to_string());
        active.manager_notes = Set(reason);
        active.completion_date = Set(Some(Utc::now()));
        let request = active.update(&*self.db_pool).await?;
        self.announce_status_change(&request, &old_status).await?;
        self.request_view(request_id).await
    }

    /// Publishes a NEW request to the open pool.
    #[instrument(skip(self))]
    pub async fn publish_request(&self, request_id: i64) -> Result<RequestView, ServiceError> {
        let request = self.find_request(request_id).await?;
        if MaintenanceRequestStatus::from_str(&request.status)
            != Ok(MaintenanceRequestStatus::New)
        {
            return Err(ServiceError::InvalidOperation(
                "Only NEW requests can be published".to_string(),
            ));
        }
        let old_status = request.status.clone();
        let mut active: maintenance_request::ActiveModel = request.into();
        active.status = Set(MaintenanceRequestStatus::InProgress.to_string());
        active.published_at = Set(Some(Utc::now()));
        let request = active.update(&*self.db_pool).await?;
        self.announce_status_change(&request, &old_status).await?;
        self.request_view(request_id).await
    }

    // Help flow

    #[instrument(skip(self, part_ids, reason))]
    pub async fn request_help(
        &self,
        request_id: i64,
        part_ids: Vec<i64>,
        reason: Option<String>,
    ) -> Result<RequestView, ServiceError> {
        if part_ids.is_empty() {
            return Err(ServiceError::ValidationError(
                "No parts selected for the help request".to_string(),
            ));
        }
        let request = self.find_request(request_id).await?;
        for part_id in &part_ids {
            let part = self.find_part_of_request(request_id, *part_id).await?;
            let mut model: request_part::ActiveModel = part.into();
            model.help_requested = Set(true);
            model.update(&*self.db_pool).await?;
        }

        let request = match Self::normalize(&reason) {
            Some(text) => {
                self.append_manager_note(request, &format!("Help requested: {}", text))
                    .await?
            }
            None => request,
        };

        self.event_sender
            .send(Event::HelpRequested {
                request_id,
                part_ids: part_ids.clone(),
            })
            .await;
        self.notify_club_team(
            &request,
            NotificationKind::HelpRequested,
            format!(
                "Mechanic asked for help on request #{} ({} part(s))",
                request_id,
                part_ids.len()
            ),
        )
        .await?;
        self.request_view(request_id).await
    }

    #[instrument(skip(self, part_ids, comment))]
    pub async fn resolve_help(
        &self,
        request_id: i64,
        part_ids: Vec<i64>,
        decision: HelpDecision,
        comment: Option<String>,
        reassigned_mechanic_id: Option<i64>,
    ) -> Result<RequestView, ServiceError> {
        if part_ids.is_empty() {
            return Err(ServiceError::ValidationError(
                "No parts selected for the help reply".to_string(),
            ));
        }
        let mut request = self.find_request(request_id).await?;
        for part_id in &part_ids {
            let part = self.find_part_of_request(request_id, *part_id).await?;
            let mut model: request_part::ActiveModel = part.into();
            model.help_requested = Set(false);
            model.update(&*self.db_pool).await?;
        }
        if let Some(text) = Self::normalize(&comment) {
            request = self.append_manager_note(request, &text).await?;
        }

        let mechanic_user = self.mechanic_user_id(request.mechanic_id).await?;
        let (kind, label) = match decision {
            HelpDecision::Approved => (NotificationKind::HelpConfirmed, "approved"),
            HelpDecision::Declined => (NotificationKind::HelpDeclined, "declined"),
            HelpDecision::Reassigned => {
                let new_mechanic_id = reassigned_mechanic_id.ok_or_else(|| {
                    ServiceError::ValidationError(
                        "A new mechanic must be specified for reassignment".to_string(),
                    )
                })?;
                let new_mechanic = mechanic_profile::Entity::find_by_id(new_mechanic_id)
                    .one(&*self.db_pool)
                    .await?
                    .ok_or_else(|| {
                        ServiceError::NotFound("Replacement mechanic not found".to_string())
                    })?;
                let mut model: maintenance_request::ActiveModel = request.into();
                model.mechanic_id = Set(new_mechanic.profile_id);
                model.update(&*self.db_pool).await?;
                (NotificationKind::HelpReassigned, "reassigned")
            }
        };

        if let Some(user_id) = mechanic_user {
            self.notifications
                .push(
                    user_id,
                    kind,
                    format!("Help request on request #{} was {}", request_id, label),
                )
                .await;
        }
        self.event_sender
            .send(Event::HelpResolved {
                request_id,
                decision: label.to_string(),
            })
            .await;
        self.request_view(request_id).await
    }

    // Helpers

    async fn find_request(
        &self,
        request_id: i64,
    ) -> Result<maintenance_request::Model, ServiceError> {
        maintenance_request::Entity::find_by_id(request_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Request not found".to_string()))
    }

    async fn parts_of(&self, request_id: i64) -> Result<Vec<request_part::Model>, ServiceError> {
        let parts = request_part::Entity::find()
            .filter(request_part::Column::RequestId.eq(request_id))
            .order_by_asc(request_part::Column::PartId)
            .all(&*self.db_pool)
            .await?;
        Ok(parts)
    }

    async fn find_part_of_request(
        &self,
        request_id: i64,
        part_id: i64,
    ) -> Result<request_part::Model, ServiceError> {
        let part = request_part::Entity::find_by_id(part_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Part not found".to_string()))?;
        if part.request_id != request_id {
            return Err(ServiceError::ValidationError(
                "Part does not belong to the request".to_string(),
            ));
        }
        Ok(part)
    }

    async fn append_manager_note(
        &self,
        request: maintenance_request::Model,
        note: &str,
    ) -> Result<maintenance_request::Model, ServiceError> {
        let combined = match &request.manager_notes {
            Some(existing) if !existing.trim().is_empty() => format!("{}\n{}", existing, note),
            _ => note.to_string(),
        };
        let mut model: maintenance_request::ActiveModel = request.into();
        model.manager_notes = Set(Some(combined));
        Ok(model.update(&*self.db_pool).await?)
    }

    async fn mechanic_user_id(&self, profile_id: i64) -> Result<Option<i64>, ServiceError> {
        let mechanic = mechanic_profile::Entity::find_by_id(profile_id)
            .one(&*self.db_pool)
            .await?;
        Ok(mechanic.map(|m| m.user_id))
    }

    async fn announce_status_change(
        &self,
        request: &maintenance_request::Model,
        old_status: &str,
    ) -> Result<(), ServiceError> {
        if old_status == request.status {
            return Ok(());
        }
        self.event_sender
            .send(Event::MaintenanceRequestStatusChanged {
                request_id: request.request_id,
                old_status: old_status.to_string(),
                new_status: request.status.clone(),
            })
            .await;
        self.notify_club_team(
            request,
            NotificationKind::RequestStatusChanged,
            format!(
                "Maintenance request #{} moved from {} to {}",
                request.request_id, old_status, request.status
            ),
        )
        .await
    }

    async fn notify_club_team(
        &self,
        request: &maintenance_request::Model,
        kind: NotificationKind,
        message: String,
    ) -> Result<(), ServiceError> {
        let Some(club_id) = request.club_id else {
            return Ok(());
        };
        let team = self.clubs.club_team_user_ids(club_id).await?;
        if team.is_empty() {
            info!(
                request_id = request.request_id,
                "no club team members to notify"
            );
            return Ok(());
        }
        self.notifications.push_all(&team, kind, message).await;
        Ok(())
    }

    async fn to_views(
        &self,
        requests: Vec<maintenance_request::Model>,
    ) -> Result<Vec<RequestView>, ServiceError> {
        let mut views = Vec::with_capacity(requests.len());
        for request in requests {
            let parts = self.parts_of(request.request_id).await?;
            views.push(self.build_view(request, parts).await?);
        }
        Ok(views)
    }

    async fn build_view(
        &self,
        request: maintenance_request::Model,
        parts: Vec<request_part::Model>,
    ) -> Result<RequestView, ServiceError> {
        let club_name = match request.club_id {
            Some(club_id) => self.clubs.get_club(club_id).await.ok().map(|c| c.name),
            None => None,
        };
        let mechanic_name = mechanic_profile::Entity::find_by_id(request.mechanic_id)
            .one(&*self.db_pool)
            .await?
            .map(|m| m.full_name);

        let mut part_views = Vec::with_capacity(parts.len());
        for part in parts {
            // Derive availability from the bound stock row when unset.
            let available = match (part.is_available, part.inventory_id) {
                (Some(flag), _) => Some(flag),
                (None, Some(inventory_id)) => warehouse_inventory::Entity::find_by_id(inventory_id)
                    .one(&*self.db_pool)
                    .await?
                    .map(|row| row.available() > 0),
                (None, None) => None,
            };
            part_views.push(RequestPartView {
                part_id: part.part_id,
                catalog_number: part.catalog_number,
                part_name: part.part_name,
                quantity: part.quantity,
                status: part.status,
                catalog_id: part.catalog_id,
                inventory_id: part.inventory_id,
                warehouse_id: part.warehouse_id,
                inventory_location: part.inventory_location,
                available,
                accepted_quantity: part.accepted_quantity,
                acceptance_comment: part.acceptance_comment,
                rejection_reason: part.rejection_reason,
                supplier_id: part.supplier_id,
                purchase_order_id: part.purchase_order_id,
                order_date: part.order_date,
                delivery_date: part.delivery_date,
                issue_date: part.issue_date,
                help_requested: part.help_requested,
            });
        }

        Ok(RequestView {
            request_id: request.request_id,
            club_id: request.club_id,
            club_name,
            lane_number: request.lane_number,
            mechanic_id: request.mechanic_id,
            mechanic_name,
            request_date: request.request_date,
            completion_date: request.completion_date,
            status: request.status,
            manager_notes: request.manager_notes,
            manager_decision_date: request.manager_decision_date,
            reason: request.request_reason,
            parts: part_views,
        })
    }
}
