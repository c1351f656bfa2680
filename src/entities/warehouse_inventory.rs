use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One stock row per (warehouse, catalog item). A club's warehouse id equals
/// the club id; personal warehouses use ids from `personal_warehouses`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "warehouse_inventory")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub inventory_id: i64,
    pub warehouse_id: i64,
    pub catalog_id: i64,
    pub quantity: i32,
    pub reserved_quantity: i32,
    pub location_reference: Option<String>,
    pub cell_code: Option<String>,
    pub shelf_code: Option<String>,
    pub lane_number: Option<i32>,
    pub last_checked: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl Model {
    /// On-hand quantity minus reservations.
    pub fn available(&self) -> i32 {
        self.quantity - self.reserved_quantity
    }

    /// Human-readable placement built from cell/shelf/lane codes.
    pub fn location_label(&self) -> Option<String> {
        let mut chunks = Vec::new();
        if let Some(cell) = &self.cell_code {
            chunks.push(format!("cell {}", cell));
        }
        if let Some(shelf) = &self.shelf_code {
            chunks.push(format!("shelf {}", shelf));
        }
        if let Some(lane) = self.lane_number {
            chunks.push(format!("lane {}", lane));
        }
        if chunks.is_empty() {
            None
        } else {
            Some(chunks.join(", "))
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::parts_catalog::Entity",
        from = "Column::CatalogId",
        to = "super::parts_catalog::Column::CatalogId"
    )]
    Catalog,
}

impl Related<super::parts_catalog::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Catalog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Model {
        Model {
            inventory_id: 1,
            warehouse_id: 10,
            catalog_id: 5,
            quantity: 7,
            reserved_quantity: 3,
            location_reference: None,
            cell_code: Some("B2".into()),
            shelf_code: Some("4".into()),
            lane_number: None,
            last_checked: None,
            notes: None,
        }
    }

    #[test]
    fn available_subtracts_reservations() {
        assert_eq!(row().available(), 4);
    }

    #[test]
    fn location_label_joins_known_codes() {
        assert_eq!(row().location_label().as_deref(), Some("cell B2, shelf 4"));
    }
}
