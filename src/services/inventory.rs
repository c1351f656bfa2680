use crate::db::DbPool;
use crate::entities::{
    bowling_club, club_staff, manager_profile, mechanic_profile, owner_profile, parts_catalog,
    personal_warehouse, user, warehouse_inventory,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::notifications::{NotificationKind, NotificationService};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

/// Available quantity at or below this mark is reported as low stock.
pub const LOW_STOCK_THRESHOLD: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityFilter {
    InStock,
    OutOfStock,
}

/// Stock row joined with its catalog entry.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StockItem {
    pub inventory_id: i64,
    pub warehouse_id: i64,
    pub catalog_id: i64,
    pub catalog_number: Option<String>,
    pub part_name: Option<String>,
    pub quantity: i32,
    pub reserved_quantity: i32,
    pub available: i32,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WarehouseSummary {
    pub warehouse_id: i64,
    pub name: String,
    pub kind: WarehouseKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WarehouseKind {
    Club,
    Personal,
}

/// Placement details recorded when stock is stored or received.
#[derive(Debug, Clone, Default)]
pub struct Placement {
    pub storage_location: Option<String>,
    pub shelf_code: Option<String>,
    pub cell_code: Option<String>,
    pub notes: Option<String>,
}

/// Service for warehouse stock.
#[derive(Clone)]
pub struct InventoryService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    notifications: NotificationService,
}

impl InventoryService {
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

    /// Searches stock, optionally scoped to one warehouse and filtered by a
    /// catalog-number/name substring and availability.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        warehouse_id: Option<i64>,
        query: Option<&str>,
        availability: Option<AvailabilityFilter>,
    ) -> Result<Vec<StockItem>, ServiceError> {
        let mut finder = warehouse_inventory::Entity::find();
        if let Some(warehouse_id) = warehouse_id {
            finder = finder.filter(warehouse_inventory::Column::WarehouseId.eq(warehouse_id));
        }
        let rows = finder
            .order_by_asc(warehouse_inventory::Column::WarehouseId)
            .all(&*self.db_pool)
            .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let catalog_ids: Vec<i64> = rows.iter().map(|r| r.catalog_id).collect();
        let catalog: BTreeMap<i64, parts_catalog::Model> = parts_catalog::Entity::find()
            .filter(parts_catalog::Column::CatalogId.is_in(catalog_ids))
            .all(&*self.db_pool)
            .await?
            .into_iter()
            .map(|c| (c.catalog_id, c))
            .collect();

        let normalized = query.map(|q| q.trim().to_lowercase()).filter(|q| !q.is_empty());

        let items = rows
            .into_iter()
            .filter(|row| match availability {
                Some(AvailabilityFilter::InStock) => row.available() > 0,
                Some(AvailabilityFilter::OutOfStock) => row.available() <= 0,
                None => true,
            })
            .filter_map(|row| {
                let entry = catalog.get(&row.catalog_id);
                if let Some(q) = &normalized {
                    let matches = entry.map_or(false, |c| {
                        c.catalog_number.to_lowercase().contains(q)
                            || c.official_name
                                .as_deref()
                                .map_or(false, |n| n.to_lowercase().contains(q))
                            || c.common_name
                                .as_deref()
                                .map_or(false, |n| n.to_lowercase().contains(q))
                    });
                    if !matches {
                        return None;
                    }
                }
                Some(StockItem {
                    inventory_id: row.inventory_id,
                    warehouse_id: row.warehouse_id,
                    catalog_id: row.catalog_id,
                    catalog_number: entry.map(|c| c.catalog_number.clone()),
                    part_name: entry
                        .and_then(|c| c.common_name.clone().or_else(|| c.official_name.clone())),
                    quantity: row.quantity,
                    reserved_quantity: row.reserved_quantity,
                    available: row.available(),
                    location: row
                        .location_reference
                        .clone()
                        .or_else(|| row.location_label()),
                })
            })
            .collect();
        Ok(items)
    }

    /// Finds the stock row for a (warehouse, catalog item) pair.
    pub async fn find_stock(
        &self,
        warehouse_id: i64,
        catalog_id: i64,
    ) -> Result<Option<warehouse_inventory::Model>, ServiceError> {
        let row = warehouse_inventory::Entity::find()
            .filter(warehouse_inventory::Column::WarehouseId.eq(warehouse_id))
            .filter(warehouse_inventory::Column::CatalogId.eq(catalog_id))
            .one(&*self.db_pool)
            .await?;
        Ok(row)
    }

    /// Adds quantity to a stock row, creating it when missing. Placement
    /// details overwrite previous ones when provided.
    #[instrument(skip(self, placement))]
    pub async fn store_stock(
        &self,
        warehouse_id: i64,
        catalog_id: i64,
        quantity: i32,
        placement: Placement,
    ) -> Result<warehouse_inventory::Model, ServiceError> {
        if quantity <= 0 {
            return Err(ServiceError::ValidationError(
                "Quantity must be greater than zero".to_string(),
            ));
        }

        let stored = match self.find_stock(warehouse_id, catalog_id).await? {
            Some(row) => {
                let mut active: warehouse_inventory::ActiveModel = row.clone().into();
                active.quantity = Set(row.quantity + quantity);
                if row.last_checked.is_none() {
                    active.last_checked = Set(Some(Utc::now().date_naive()));
                }
                if let Some(location) = placement.storage_location {
                    active.location_reference = Set(Some(location));
                }
                if let Some(shelf) = placement.shelf_code {
                    active.shelf_code = Set(Some(shelf));
                }
                if let Some(cell) = placement.cell_code {
                    active.cell_code = Set(Some(cell));
                }
                if let Some(notes) = placement.notes {
                    active.notes = Set(Some(notes));
                }
                active.update(&*self.db_pool).await?
            }
            None => {
                warehouse_inventory::ActiveModel {
                    warehouse_id: Set(warehouse_id),
                    catalog_id: Set(catalog_id),
                    quantity: Set(quantity),
                    reserved_quantity: Set(0),
                    location_reference: Set(placement.storage_location),
                    shelf_code: Set(placement.shelf_code),
                    cell_code: Set(placement.cell_code),
                    notes: Set(placement.notes),
                    last_checked: Set(Some(Utc::now().date_naive())),
                    ..Default::default()
                }
                .insert(&*self.db_pool)
                .await?
            }
        };

        info!(
            warehouse_id,
            catalog_id, quantity, "stock stored into warehouse"
        );
        Ok(stored)
    }

    /// Writes off stock for a catalog item, taking the first row carrying it.
    /// The whole operation fails when not enough is on hand.
    #[instrument(skip(self))]
    pub async fn reserve_part(
        &self,
        catalog_id: i64,
        quantity: i32,
        request_id: Option<i64>,
    ) -> Result<warehouse_inventory::Model, ServiceError> {
        let row = warehouse_inventory::Entity::find()
            .filter(warehouse_inventory::Column::CatalogId.eq(catalog_id))
            .order_by_asc(warehouse_inventory::Column::InventoryId)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("No inventory found for catalog item {}", catalog_id))
            })?;

        if row.quantity < quantity {
            return Err(ServiceError::InsufficientStock(format!(
                "catalog item {} has {} on hand, {} requested",
                catalog_id, row.quantity, quantity
            )));
        }

        let remaining = row.quantity - quantity;
        let warehouse_id = row.warehouse_id;
        let mut active: warehouse_inventory::ActiveModel = row.into();
        active.quantity = Set(remaining);
        let updated = active.update(&*self.db_pool).await?;

        self.event_sender
            .send(Event::InventoryReserved {
                warehouse_id,
                catalog_id,
                quantity,
                request_id,
            })
            .await;
        self.check_low_stock(&updated).await;
        Ok(updated)
    }

    /// Returns previously written-off stock.
    #[instrument(skip(self))]
    pub async fn release_part(
        &self,
        catalog_id: i64,
        quantity: i32,
    ) -> Result<warehouse_inventory::Model, ServiceError> {
        let row = warehouse_inventory::Entity::find()
            .filter(warehouse_inventory::Column::CatalogId.eq(catalog_id))
            .order_by_asc(warehouse_inventory::Column::InventoryId)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("No inventory found for catalog item {}", catalog_id))
            })?;

        let warehouse_id = row.warehouse_id;
        let new_quantity = row.quantity + quantity;
        let mut active: warehouse_inventory::ActiveModel = row.into();
        active.quantity = Set(new_quantity);
        let updated = active.update(&*self.db_pool).await?;

        self.event_sender
            .send(Event::InventoryReleased {
                warehouse_id,
                catalog_id,
                quantity,
            })
            .await;
        Ok(updated)
    }

    /// Moves quantity from on-hand to reserved on a specific stock row.
    /// Used when a request part is bound to a concrete inventory row.
    #[instrument(skip(self))]
    pub async fn hold_on_row(
        &self,
        inventory_id: i64,
        quantity: i32,
    ) -> Result<warehouse_inventory::Model, ServiceError> {
        let row = warehouse_inventory::Entity::find_by_id(inventory_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Inventory row {} not found", inventory_id))
            })?;

        if row.quantity < quantity {
            return Err(ServiceError::InsufficientStock(format!(
                "inventory row {} has {} on hand, {} requested",
                inventory_id, row.quantity, quantity
            )));
        }

        let quantity_left = row.quantity - quantity;
        let reserved = row.reserved_quantity + quantity;
        let mut active: warehouse_inventory::ActiveModel = row.into();
        active.quantity = Set(quantity_left);
        active.reserved_quantity = Set(reserved);
        let updated = active.update(&*self.db_pool).await?;
        self.check_low_stock(&updated).await;
        Ok(updated)
    }

    /// Stock rows whose available quantity is at or below the threshold.
    #[instrument(skip(self))]
    pub async fn low_stock(&self) -> Result<Vec<StockItem>, ServiceError> {
        let items = self.search(None, None, None).await?;
        Ok(items
            .into_iter()
            .filter(|item| item.available <= LOW_STOCK_THRESHOLD)
            .collect())
    }

    /// Emits the low-stock event and notifies the club team when the row
    /// belongs to a club warehouse. Notification is best-effort.
    async fn check_low_stock(&self, row: &warehouse_inventory::Model) {
        if row.available() > LOW_STOCK_THRESHOLD {
            return;
        }
        self.event_sender
            .send(Event::LowStock {
                warehouse_id: row.warehouse_id,
                catalog_id: row.catalog_id,
                available: row.available(),
            })
            .await;

        match self.club_team_of_warehouse(row.warehouse_id).await {
            Ok(recipients) if !recipients.is_empty() => {
                let label = parts_catalog::Entity::find_by_id(row.catalog_id)
                    .one(&*self.db_pool)
                    .await
                    .ok()
                    .flatten()
                    .map(|c| c.catalog_number)
                    .unwrap_or_else(|| format!("catalog item {}", row.catalog_id));
                self.notifications
                    .push_all(
                        &recipients,
                        NotificationKind::LowStock,
                        format!(
                            "Part {} is low on stock: {} left (threshold {})",
                            label,
                            row.available(),
                            LOW_STOCK_THRESHOLD
                        ),
                    )
                    .await;
            }
            Ok(_) => {}
            Err(err) => warn!(
                warehouse_id = row.warehouse_id,
                error = %err,
                "failed to resolve low-stock recipients"
            ),
        }
    }

    /// Owner and managers of the club whose warehouse this is; empty for
    /// personal warehouses.
    async fn club_team_of_warehouse(&self, warehouse_id: i64) -> Result<Vec<i64>, ServiceError> {
        let Some(club) = bowling_club::Entity::find_by_id(warehouse_id)
            .one(&*self.db_pool)
            .await?
        else {
            return Ok(Vec::new());
        };
        let mut ids = Vec::new();
        if let Some(owner_id) = club.owner_id {
            if let Some(owner) = owner_profile::Entity::find_by_id(owner_id)
                .one(&*self.db_pool)
                .await?
            {
                ids.push(owner.user_id);
            }
        }
        let managers = manager_profile::Entity::find()
            .filter(manager_profile::Column::ClubId.eq(club.club_id))
            .all(&*self.db_pool)
            .await?;
        for manager in managers {
            if !ids.contains(&manager.user_id) {
                ids.push(manager.user_id);
            }
        }
        Ok(ids)
    }

    /// Warehouses a user may see: their clubs' warehouses plus personal ones.
    #[instrument(skip(self))]
    pub async fn accessible_warehouses(
        &self,
        user_id: i64,
    ) -> Result<Vec<WarehouseSummary>, ServiceError> {
        let account = user::Entity::find_by_id(user_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))?;

        let mut warehouses: Vec<WarehouseSummary> = Vec::new();
        let mut seen_clubs: Vec<i64> = Vec::new();

        // Owned clubs.
        if let Some(owner) = owner_profile::Entity::find()
            .filter(owner_profile::Column::UserId.eq(account.user_id))
            .one(&*self.db_pool)
            .await?
        {
            let clubs = bowling_club::Entity::find()
                .filter(bowling_club::Column::OwnerId.eq(owner.owner_id))
                .all(&*self.db_pool)
                .await?;
            for club in clubs {
                seen_clubs.push(club.club_id);
                warehouses.push(WarehouseSummary {
                    warehouse_id: club.club_id,
                    name: format!("{} warehouse", club.name),
                    kind: WarehouseKind::Club,
                });
            }
        }

        // Managed club.
        if let Some(manager) = manager_profile::Entity::find()
            .filter(manager_profile::Column::UserId.eq(account.user_id))
            .one(&*self.db_pool)
            .await?
        {
            if let Some(club_id) = manager.club_id {
                if !seen_clubs.contains(&club_id) {
                    if let Some(club) = bowling_club::Entity::find_by_id(club_id)
                        .one(&*self.db_pool)
                        .await?
                    {
                        seen_clubs.push(club.club_id);
                        warehouses.push(WarehouseSummary {
                            warehouse_id: club.club_id,
                            name: format!("{} warehouse", club.name),
                            kind: WarehouseKind::Club,
                        });
                    }
                }
            }
        }

        // Staff memberships.
        let staff_rows = club_staff::Entity::find()
            .filter(club_staff::Column::UserId.eq(account.user_id))
            .filter(club_staff::Column::IsActive.eq(true))
            .all(&*self.db_pool)
            .await?;
        for staff in staff_rows {
            if seen_clubs.contains(&staff.club_id) {
                continue;
            }
            if let Some(club) = bowling_club::Entity::find_by_id(staff.club_id)
                .one(&*self.db_pool)
                .await?
            {
                seen_clubs.push(club.club_id);
                warehouses.push(WarehouseSummary {
                    warehouse_id: club.club_id,
                    name: format!("{} warehouse", club.name),
                    kind: WarehouseKind::Club,
                });
            }
        }

        // Personal warehouses of a mechanic.
        if let Some(mechanic) = mechanic_profile::Entity::find()
            .filter(mechanic_profile::Column::UserId.eq(account.user_id))
            .one(&*self.db_pool)
            .await?
        {
            let personal = personal_warehouse::Entity::find()
                .filter(personal_warehouse::Column::MechanicProfileId.eq(mechanic.profile_id))
                .filter(personal_warehouse::Column::IsActive.eq(true))
                .all(&*self.db_pool)
                .await?;
            for warehouse in personal {
                warehouses.push(WarehouseSummary {
                    warehouse_id: warehouse.warehouse_id,
                    name: warehouse.name,
                    kind: WarehouseKind::Personal,
                });
            }
        }

        Ok(warehouses)
    }

    /// Returns the mechanic's active personal warehouse, creating one when
    /// none exists yet.
    #[instrument(skip(self, mechanic), fields(profile_id = mechanic.profile_id))]
    pub async fn ensure_personal_warehouse(
        &self,
        mechanic: &mechanic_profile::Model,
    ) -> Result<i64, ServiceError> {
        let existing = personal_warehouse::Entity::find()
            .filter(personal_warehouse::Column::MechanicProfileId.eq(mechanic.profile_id))
            .filter(personal_warehouse::Column::IsActive.eq(true))
            .order_by_asc(personal_warehouse::Column::WarehouseId)
            .one(&*self.db_pool)
            .await?;
        if let Some(warehouse) = existing {
            return Ok(warehouse.warehouse_id);
        }

        let created = personal_warehouse::ActiveModel {
            mechanic_profile_id: Set(mechanic.profile_id),
            name: Set(format!("Personal warehouse of {}", mechanic.full_name)),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;
        info!(
            warehouse_id = created.warehouse_id,
            "personal warehouse created"
        );
        Ok(created.warehouse_id)
    }

    /// Active personal warehouse ids of a mechanic profile.
    pub async fn personal_warehouse_ids(&self, profile_id: i64) -> Result<Vec<i64>, ServiceError> {
        let rows = personal_warehouse::Entity::find()
            .filter(personal_warehouse::Column::MechanicProfileId.eq(profile_id))
            .filter(personal_warehouse::Column::IsActive.eq(true))
            .all(&*self.db_pool)
            .await?;
        Ok(rows.into_iter().map(|w| w.warehouse_id).collect())
    }
}
