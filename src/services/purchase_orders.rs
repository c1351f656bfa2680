use crate::db::DbPool;
use crate::entities::enums::{PartStatus, PurchaseOrderStatus};
use crate::entities::{
    bowling_club, maintenance_request, mechanic_profile, purchase_order, request_part, supplier,
    supplier_review,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::inventory::{InventoryService, Placement};
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

#[derive(Debug, Clone, Default)]
pub struct OrderListFilter {
    pub club_id: Option<i64>,
    pub status: Option<String>,
    pub archived: bool,
    pub has_review: Option<bool>,
    pub has_complaint: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct AcceptOrderInput {
    pub supplier: Option<SupplierUpsert>,
    pub parts: Vec<PartAcceptance>,
}

/// Supplier details sent with an acceptance; matched/created by INN.
#[derive(Debug, Clone)]
pub struct SupplierUpsert {
    pub inn: String,
    pub legal_name: Option<String>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub verified: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct PartAcceptance {
    pub part_id: i64,
    pub status: String,
    pub accepted_quantity: Option<i32>,
    pub comment: Option<String>,
    pub storage_location: Option<String>,
    pub shelf_code: Option<String>,
    pub cell_code: Option<String>,
    pub placement_notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ComplaintInput {
    pub title: String,
    pub description: String,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ComplaintStatusUpdate {
    pub status: Option<String>,
    pub resolved: Option<bool>,
    pub resolution_notes: Option<String>,
}

// Views

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderSummary {
    pub order_id: i64,
    pub request_id: i64,
    pub club_id: Option<i64>,
    pub club_name: Option<String>,
    pub supplier_name: Option<String>,
    pub supplier_inn: Option<String>,
    pub status: String,
    pub order_date: DateTime<Utc>,
    pub expected_delivery_date: Option<DateTime<Utc>>,
    pub actual_delivery_date: Option<DateTime<Utc>>,
    pub total_positions: usize,
    pub accepted_positions: usize,
    pub has_review: bool,
    pub has_complaint: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderDetail {
    pub order_id: i64,
    pub request_id: i64,
    pub club_id: Option<i64>,
    pub club_name: Option<String>,
    pub status: String,
    pub order_date: DateTime<Utc>,
    pub expected_delivery_date: Option<DateTime<Utc>>,
    pub actual_delivery_date: Option<DateTime<Utc>>,
    pub supplier_name: Option<String>,
    pub supplier_inn: Option<String>,
    pub supplier_contact: Option<String>,
    pub supplier_email: Option<String>,
    pub supplier_phone: Option<String>,
    pub parts: Vec<OrderPartLine>,
    pub reviews: Vec<ReviewView>,
    pub complaints: Vec<ReviewView>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderPartLine {
    pub part_id: i64,
    pub part_name: String,
    pub catalog_number: String,
    pub ordered_quantity: i32,
    pub accepted_quantity: Option<i32>,
    pub status: Option<String>,
    pub rejection_reason: Option<String>,
    pub acceptance_comment: Option<String>,
    pub warehouse_id: Option<i64>,
    pub inventory_id: Option<i64>,
    pub inventory_location: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewView {
    pub review_id: i64,
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub complaint: bool,
    pub complaint_status: Option<String>,
    pub complaint_resolved: bool,
    pub complaint_title: Option<String>,
    pub resolution_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Purchase orders raised from maintenance requests: listing, acceptance of
/// delivered goods, supplier reviews and complaints.
#[derive(Clone)]
pub struct ProcurementService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    inventory: Arc<InventoryService>,
}

impl ProcurementService {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: EventSender,
        inventory: Arc<InventoryService>,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            inventory,
        }
    }

    #[instrument(skip(self, filter))]
    pub async fn list_orders(
        &self,
        filter: OrderListFilter,
    ) -> Result<Vec<OrderSummary>, ServiceError> {
        let statuses: Vec<String> = match &filter.status {
            Some(raw) => {
                let status = PurchaseOrderStatus::from_str(raw).map_err(|_| {
                    ServiceError::ValidationError(format!("Unknown order status: {}", raw))
                })?;
                vec![status.to_string()]
            }
            None if filter.archived => PurchaseOrderStatus::archived()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            None => PurchaseOrderStatus::active()
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        let orders = purchase_order::Entity::find()
            .filter(purchase_order::Column::Status.is_in(statuses))
            .order_by_desc(purchase_order::Column::OrderDate)
            .all(&*self.db_pool)
            .await?;

        let mut summaries = Vec::new();
        for order in orders {
            let summary = self.build_summary(&order).await?;
            if let Some(club_id) = filter.club_id {
                if summary.club_id != Some(club_id) {
                    continue;
                }
            }
            if let Some(want) = filter.has_review {
                if summary.has_review != want {
                    continue;
                }
            }
            if let Some(want) = filter.has_complaint {
                if summary.has_complaint != want {
                    continue;
                }
            }
            summaries.push(summary);
        }
        Ok(summaries)
    }

    #[instrument(skip(self))]
    pub async fn order_detail(&self, order_id: i64) -> Result<OrderDetail, ServiceError> {
        let order = self.find_order(order_id).await?;
        self.build_detail(order).await
    }

    /// Supplier confirmed the order: PENDING → CONFIRMED.
    #[instrument(skip(self))]
    pub async fn confirm_order(&self, order_id: i64) -> Result<OrderDetail, ServiceError> {
        let order = self.find_order(order_id).await?;
        let status = Self::parse_status(&order.status)?;
        if status != PurchaseOrderStatus::Pending {
            return Err(ServiceError::InvalidOperation(
                "Only pending orders can be confirmed".to_string(),
            ));
        }
        let order = self
            .set_status(order, PurchaseOrderStatus::Confirmed)
            .await?;
        self.build_detail(order).await
    }

    #[instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: i64) -> Result<OrderDetail, ServiceError> {
        let order = self.find_order(order_id).await?;
        let status = Self::parse_status(&order.status)?;
        if status.is_archived() {
            return Err(ServiceError::InvalidOperation(
                "Completed orders cannot be canceled".to_string(),
            ));
        }
        let order = self
            .set_status(order, PurchaseOrderStatus::Canceled)
            .await?;
        self.build_detail(order).await
    }

    /// Goods receipt: applies per-part acceptance decisions, derives the
    /// order status from the mix, and places accepted goods into the right
    /// warehouse.
    #[instrument(skip(self, input))]
    pub async fn accept_order(
        &self,
        order_id: i64,
        input: AcceptOrderInput,
    ) -> Result<OrderDetail, ServiceError> {
        if input.parts.is_empty() {
            return Err(ServiceError::ValidationError(
                "Acceptance payload is empty".to_string(),
            ));
        }
        let order = self.find_order(order_id).await?;

        let resolved_supplier = match &input.supplier {
            Some(upsert) => Some(self.upsert_supplier(upsert, order.supplier_id).await?),
            None => None,
        };
        let supplier_id = resolved_supplier
            .as_ref()
            .map(|s| s.supplier_id)
            .or(order.supplier_id);

        let parts = self.parts_of_order(order_id).await?;
        let acceptance_by_part: BTreeMap<i64, &PartAcceptance> =
            input.parts.iter().map(|p| (p.part_id, p)).collect();

        let acceptance_moment = Utc::now();
        let mut accepted_positions = 0usize;
        let mut rejected_positions = 0usize;
        let mut accepted_parts: Vec<(request_part::Model, &PartAcceptance, i32)> = Vec::new();

        for part in &parts {
            let Some(&acceptance) = acceptance_by_part.get(&part.part_id) else {
                continue;
            };
            let target = PartStatus::from_str(&acceptance.status).map_err(|_| {
                ServiceError::ValidationError(format!(
                    "Unknown part status: {}",
                    acceptance.status
                ))
            })?;
            if !matches!(
                target,
                PartStatus::Accepted | PartStatus::PartiallyAccepted | PartStatus::Rejected
            ) {
                continue;
            }

            let ordered = part.quantity;
            let accepted = acceptance
                .accepted_quantity
                .unwrap_or(ordered)
                .clamp(0, ordered);

            let mut model: request_part::ActiveModel = part.clone().into();
            model.status = Set(Some(target.to_string()));
            model.accepted_quantity = Set(Some(if target == PartStatus::Rejected {
                0
            } else {
                accepted
            }));
            model.acceptance_comment = Set(acceptance.comment.clone());
            model.supplier_id = Set(supplier_id.or(part.supplier_id));
            model.acceptance_date = Set(Some(acceptance_moment));
            if target == PartStatus::Rejected {
                model.rejection_reason = Set(acceptance.comment.clone());
                rejected_positions += 1;
            } else {
                accepted_positions += 1;
            }
            let updated = model.update(&*self.db_pool).await?;
            if target != PartStatus::Rejected && accepted > 0 {
                accepted_parts.push((updated, acceptance, accepted));
            }
        }

        if accepted_positions == 0 && rejected_positions == 0 {
            return Err(ServiceError::ValidationError(
                "Acceptance payload does not match order parts".to_string(),
            ));
        }

        let resulting_status = if rejected_positions > 0 && accepted_positions == 0 {
            PurchaseOrderStatus::Rejected
        } else if accepted_positions > 0 && rejected_positions > 0 {
            PurchaseOrderStatus::PartiallyCompleted
        } else {
            PurchaseOrderStatus::Completed
        };

        let mut model: purchase_order::ActiveModel = order.clone().into();
        model.status = Set(resulting_status.to_string());
        model.actual_delivery_date = Set(Some(acceptance_moment));
        if let Some(supplier_id) = supplier_id {
            model.supplier_id = Set(Some(supplier_id));
        }
        let order = model.update(&*self.db_pool).await?;

        self.place_accepted_parts(&order, accepted_parts).await?;

        self.event_sender
            .send(Event::PurchaseOrderStatusChanged {
                order_id,
                new_status: order.status.clone(),
            })
            .await;
        info!(order_id, status = %order.status, "purchase order accepted");
        self.build_detail(order).await
    }

    /// Stores accepted goods in the club warehouse of the originating
    /// request, or in the mechanic's personal warehouse for club-less
    /// requests, and links each part to its stock row.
    async fn place_accepted_parts(
        &self,
        order: &purchase_order::Model,
        accepted: Vec<(request_part::Model, &PartAcceptance, i32)>,
    ) -> Result<(), ServiceError> {
        if accepted.is_empty() {
            return Ok(());
        }
        let request = maintenance_request::Entity::find_by_id(order.maintenance_request_id)
            .one(&*self.db_pool)
            .await?;

        let target_warehouse = match request.as_ref().and_then(|r| r.club_id) {
            Some(club_id) => Some(club_id),
            None => match request {
                Some(request) => {
                    let mechanic = mechanic_profile::Entity::find_by_id(request.mechanic_id)
                        .one(&*self.db_pool)
                        .await?;
                    match mechanic {
                        Some(mechanic) => {
                            Some(self.inventory.ensure_personal_warehouse(&mechanic).await?)
                        }
                        None => None,
                    }
                }
                None => None,
            },
        };
        let Some(warehouse_id) = target_warehouse else {
            return Ok(());
        };

        for (part, acceptance, quantity) in accepted {
            let Some(catalog_id) = part.catalog_id else {
                continue;
            };
            let stored = self
                .inventory
                .store_stock(
                    warehouse_id,
                    catalog_id,
                    quantity,
                    Placement {
                        storage_location: acceptance.storage_location.clone(),
                        shelf_code: acceptance.shelf_code.clone(),
                        cell_code: acceptance.cell_code.clone(),
                        notes: acceptance.placement_notes.clone(),
                    },
                )
                .await?;

            let mut tokens: Vec<String> = Vec::new();
            if let Some(location) = &acceptance.storage_location {
                tokens.push(location.clone());
            }
            if let Some(shelf) = &stored.shelf_code {
                tokens.push(format!("shelf: {}", shelf));
            }
            if let Some(cell) = &stored.cell_code {
                tokens.push(format!("cell: {}", cell));
            }

            let mut model: request_part::ActiveModel = part.into();
            model.warehouse_id = Set(Some(warehouse_id));
            model.inventory_id = Set(Some(stored.inventory_id));
            model.inventory_location = Set(if tokens.is_empty() {
                None
            } else {
                Some(tokens.join(", "))
            });
            model.is_available = Set(Some(true));
            model.update(&*self.db_pool).await?;
        }
        Ok(())
    }

    // Reviews and complaints

    #[instrument(skip(self, comment))]
    pub async fn leave_review(
        &self,
        order_id: i64,
        rating: i32,
        comment: Option<String>,
        user_id: Option<i64>,
    ) -> Result<OrderDetail, ServiceError> {
        if !(1..=5).contains(&rating) {
            return Err(ServiceError::ValidationError(
                "Rating must be between 1 and 5".to_string(),
            ));
        }
        let order = self.find_order(order_id).await?;
        let club_id = self.club_of_order(&order).await?;

        supplier_review::ActiveModel {
            purchase_order_id: Set(order.order_id),
            supplier_id: Set(order.supplier_id),
            club_id: Set(club_id),
            user_id: Set(user_id),
            rating: Set(Some(rating)),
            comment: Set(comment),
            review_date: Set(Utc::now()),
            is_complaint: Set(false),
            complaint_resolved: Set(false),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;

        if let Some(supplier_id) = order.supplier_id {
            self.recalculate_supplier_rating(supplier_id).await?;
            self.event_sender
                .send(Event::SupplierReviewed {
                    supplier_id,
                    rating: Some(rating),
                    complaint: false,
                })
                .await;
        }
        self.build_detail(order).await
    }

    #[instrument(skip(self, input))]
    pub async fn submit_complaint(
        &self,
        order_id: i64,
        input: ComplaintInput,
        user_id: Option<i64>,
    ) -> Result<OrderDetail, ServiceError> {
        if input.title.trim().is_empty() || input.description.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Complaint title and description are required".to_string(),
            ));
        }
        let order = self.find_order(order_id).await?;
        let club_id = self.club_of_order(&order).await?;

        supplier_review::ActiveModel {
            purchase_order_id: Set(order.order_id),
            supplier_id: Set(order.supplier_id),
            club_id: Set(club_id),
            user_id: Set(user_id),
            comment: Set(Some(input.description)),
            review_date: Set(Utc::now()),
            is_complaint: Set(true),
            complaint_resolved: Set(false),
            complaint_status: Set(input.status.or_else(|| Some("OPEN".to_string()))),
            complaint_title: Set(Some(input.title)),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;

        if let Some(supplier_id) = order.supplier_id {
            self.recalculate_supplier_rating(supplier_id).await?;
            self.event_sender
                .send(Event::SupplierReviewed {
                    supplier_id,
                    rating: None,
                    complaint: true,
                })
                .await;
        }
        self.build_detail(order).await
    }

    #[instrument(skip(self, update))]
    pub async fn update_complaint_status(
        &self,
        order_id: i64,
        review_id: i64,
        update: ComplaintStatusUpdate,
    ) -> Result<OrderDetail, ServiceError> {
        let order = self.find_order(order_id).await?;
        let review = supplier_review::Entity::find_by_id(review_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Complaint review not found".to_string()))?;
        if review.purchase_order_id != order_id {
            return Err(ServiceError::ValidationError(
                "Review does not belong to the order".to_string(),
            ));
        }
        if !review.is_complaint {
            return Err(ServiceError::ValidationError(
                "Selected review is not a complaint".to_string(),
            ));
        }

        let supplier_id = review.supplier_id;
        let mut model: supplier_review::ActiveModel = review.into();
        if let Some(status) = update.status {
            model.complaint_status = Set(Some(status));
        }
        if let Some(resolved) = update.resolved {
            model.complaint_resolved = Set(resolved);
        }
        if let Some(notes) = update.resolution_notes {
            model.resolution_notes = Set(Some(notes));
        }
        model.update(&*self.db_pool).await?;

        if let Some(supplier_id) = supplier_id {
            self.recalculate_supplier_rating(supplier_id).await?;
        }
        self.build_detail(order).await
    }

    /// Supplier rating is the average of non-null review ratings; `None`
    /// when no rated reviews exist.
    async fn recalculate_supplier_rating(&self, supplier_id: i64) -> Result<(), ServiceError> {
        let Some(record) = supplier::Entity::find_by_id(supplier_id)
            .one(&*self.db_pool)
            .await?
        else {
            return Ok(());
        };
        let reviews = supplier_review::Entity::find()
            .filter(supplier_review::Column::SupplierId.eq(supplier_id))
            .all(&*self.db_pool)
            .await?;
        let ratings: Vec<i32> = reviews.iter().filter_map(|r| r.rating).collect();
        let average = if ratings.is_empty() {
            None
        } else {
            Some(ratings.iter().sum::<i32>() as f64 / ratings.len() as f64)
        };

        let mut model: supplier::ActiveModel = record.into();
        model.rating = Set(average);
        model.updated_at = Set(Some(Utc::now()));
        model.update(&*self.db_pool).await?;
        Ok(())
    }

    async fn upsert_supplier(
        &self,
        upsert: &SupplierUpsert,
        _current: Option<i64>,
    ) -> Result<supplier::Model, ServiceError> {
        let inn = upsert.inn.trim().to_string();
        if inn.is_empty() {
            return Err(ServiceError::ValidationError(
                "Supplier INN cannot be empty".to_string(),
            ));
        }
        let existing = supplier::Entity::find()
            .filter(supplier::Column::Inn.eq(inn.clone()))
            .order_by_asc(supplier::Column::SupplierId)
            .one(&*self.db_pool)
            .await?;

        let record = match existing {
            Some(record) => {
                let mut model: supplier::ActiveModel = record.into();
                if let Some(name) = &upsert.legal_name {
                    model.legal_name = Set(Some(name.clone()));
                }
                if let Some(person) = &upsert.contact_person {
                    model.contact_person = Set(Some(person.clone()));
                }
                if let Some(phone) = &upsert.contact_phone {
                    model.contact_phone = Set(Some(phone.clone()));
                }
                if let Some(email) = &upsert.contact_email {
                    model.contact_email = Set(Some(email.clone()));
                }
                if let Some(verified) = upsert.verified {
                    model.is_verified = Set(verified);
                }
                model.updated_at = Set(Some(Utc::now()));
                model.update(&*self.db_pool).await?
            }
            None => {
                supplier::ActiveModel {
                    inn: Set(inn),
                    legal_name: Set(upsert.legal_name.clone()),
                    contact_person: Set(upsert.contact_person.clone()),
                    contact_phone: Set(upsert.contact_phone.clone()),
                    contact_email: Set(upsert.contact_email.clone()),
                    is_verified: Set(upsert.verified.unwrap_or(false)),
                    created_at: Set(Utc::now()),
                    updated_at: Set(Some(Utc::now())),
                    ..Default::default()
                }
                .insert(&*self.db_pool)
                .await?
            }
        };
        Ok(record)
    }

    // Helpers

    fn parse_status(raw: &str) -> Result<PurchaseOrderStatus, ServiceError> {
        PurchaseOrderStatus::from_str(raw)
            .map_err(|_| ServiceError::InternalError(format!("Corrupt order status: {}", raw)))
    }

    async fn set_status(
        &self,
        order: purchase_order::Model,
        status: PurchaseOrderStatus,
    ) -> Result<purchase_order::Model, ServiceError> {
        let order_id = order.order_id;
        let mut model: purchase_order::ActiveModel = order.into();
        model.status = Set(status.to_string());
        let updated = model.update(&*self.db_pool).await?;
        self.event_sender
            .send(Event::PurchaseOrderStatusChanged {
                order_id,
                new_status: updated.status.clone(),
            })
            .await;
        Ok(updated)
    }

    async fn find_order(&self, order_id: i64) -> Result<purchase_order::Model, ServiceError> {
        purchase_order::Entity::find_by_id(order_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Purchase order not found".to_string()))
    }

    async fn parts_of_order(
        &self,
        order_id: i64,
    ) -> Result<Vec<request_part::Model>, ServiceError> {
        let parts = request_part::Entity::find()
            .filter(request_part::Column::PurchaseOrderId.eq(order_id))
            .order_by_asc(request_part::Column::PartId)
            .all(&*self.db_pool)
            .await?;
        Ok(parts)
    }

    async fn club_of_order(
        &self,
        order: &purchase_order::Model,
    ) -> Result<Option<i64>, ServiceError> {
        let request = maintenance_request::Entity::find_by_id(order.maintenance_request_id)
            .one(&*self.db_pool)
            .await?;
        Ok(request.and_then(|r| r.club_id))
    }

    async fn reviews_of_order(
        &self,
        order_id: i64,
    ) -> Result<Vec<supplier_review::Model>, ServiceError> {
        let reviews = supplier_review::Entity::find()
            .filter(supplier_review::Column::PurchaseOrderId.eq(order_id))
            .order_by_asc(supplier_review::Column::ReviewId)
            .all(&*self.db_pool)
            .await?;
        Ok(reviews)
    }

    async fn build_summary(
        &self,
        order: &purchase_order::Model,
    ) -> Result<OrderSummary, ServiceError> {
        let parts = self.parts_of_order(order.order_id).await?;
        let reviews = self.reviews_of_order(order.order_id).await?;
        let supplier = match order.supplier_id {
            Some(id) => supplier::Entity::find_by_id(id).one(&*self.db_pool).await?,
            None => None,
        };
        let club_id = self.club_of_order(order).await?;
        let club_name = match club_id {
            Some(id) => bowling_club::Entity::find_by_id(id)
                .one(&*self.db_pool)
                .await?
                .map(|c| c.name),
            None => None,
        };

        let accepted_positions = parts
            .iter()
            .filter(|p| p.accepted_quantity.unwrap_or(0) > 0)
            .count();
        Ok(OrderSummary {
            order_id: order.order_id,
            request_id: order.maintenance_request_id,
            club_id,
            club_name,
            supplier_name: supplier.as_ref().and_then(|s| s.legal_name.clone()),
            supplier_inn: supplier.as_ref().map(|s| s.inn.clone()),
            status: order.status.clone(),
            order_date: order.order_date,
            expected_delivery_date: order.expected_delivery_date,
            actual_delivery_date: order.actual_delivery_date,
            total_positions: parts.len(),
            accepted_positions,
            has_review: reviews.iter().any(|r| !r.is_complaint),
            has_complaint: reviews.iter().any(|r| r.is_complaint),
        })
    }

    async fn build_detail(&self, order: purchase_order::Model) -> Result<OrderDetail, ServiceError> {
        let parts = self.parts_of_order(order.order_id).await?;
        let reviews = self.reviews_of_order(order.order_id).await?;
        let supplier = match order.supplier_id {
            Some(id) => supplier::Entity::find_by_id(id).one(&*self.db_pool).await?,
            None => None,
        };
        let club_id = self.club_of_order(&order).await?;
        let club_name = match club_id {
            Some(id) => bowling_club::Entity::find_by_id(id)
                .one(&*self.db_pool)
                .await?
                .map(|c| c.name),
            None => None,
        };

        let to_view = |review: &supplier_review::Model| ReviewView {
            review_id: review.review_id,
            rating: review.rating,
            comment: review.comment.clone(),
            complaint: review.is_complaint,
            complaint_status: review.complaint_status.clone(),
            complaint_resolved: review.complaint_resolved,
            complaint_title: review.complaint_title.clone(),
            resolution_notes: review.resolution_notes.clone(),
            created_at: review.review_date,
        };

        Ok(OrderDetail {
            order_id: order.order_id,
            request_id: order.maintenance_request_id,
            club_id,
            club_name,
            status: order.status.clone(),
            order_date: order.order_date,
            expected_delivery_date: order.expected_delivery_date,
            actual_delivery_date: order.actual_delivery_date,
            supplier_name: supplier.as_ref().and_then(|s| s.legal_name.clone()),
            supplier_inn: supplier.as_ref().map(|s| s.inn.clone()),
            supplier_contact: supplier.as_ref().and_then(|s| s.contact_person.clone()),
            supplier_email: supplier.as_ref().and_then(|s| s.contact_email.clone()),
            supplier_phone: supplier.as_ref().and_then(|s| s.contact_phone.clone()),
            parts: parts
                .into_iter()
                .map(|p| OrderPartLine {
                    part_id: p.part_id,
                    part_name: p.part_name,
                    catalog_number: p.catalog_number,
                    ordered_quantity: p.quantity,
                    accepted_quantity: p.accepted_quantity,
                    status: p.status,
                    rejection_reason: p.rejection_reason,
                    acceptance_comment: p.acceptance_comment,
                    warehouse_id: p.warehouse_id,
                    inventory_id: p.inventory_id,
                    inventory_location: p.inventory_location,
                })
                .collect(),
            reviews: reviews
                .iter()
                .filter(|r| !r.is_complaint)
                .map(to_view)
                .collect(),
            complaints: reviews
                .iter()
                .filter(|r| r.is_complaint)
                .map(to_view)
                .collect(),
        })
    }
}
