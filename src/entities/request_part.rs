use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A single part line on a maintenance request. The line tracks its whole
/// lifecycle from approval through ordering, delivery and installation.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "request_parts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub part_id: i64,
    pub request_id: i64,
    pub catalog_number: String,
    pub part_name: String,
    pub quantity: i32,
    pub status: Option<String>,
    pub catalog_id: Option<i64>,
    pub inventory_id: Option<i64>,
    pub warehouse_id: Option<i64>,
    pub inventory_location: Option<String>,
    pub is_available: Option<bool>,
    pub accepted_quantity: Option<i32>,
    pub acceptance_comment: Option<String>,
    pub acceptance_date: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub supplier_id: Option<i64>,
    pub purchase_order_id: Option<i64>,
    pub order_date: Option<DateTime<Utc>>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub issue_date: Option<DateTime<Utc>>,
    pub help_requested: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::maintenance_request::Entity",
        from = "Column::RequestId",
        to = "super::maintenance_request::Column::RequestId"
    )]
    Request,
    #[sea_orm(
        belongs_to = "super::purchase_order::Entity",
        from = "Column::PurchaseOrderId",
        to = "super::purchase_order::Column::OrderId"
    )]
    PurchaseOrder,
}

impl Related<super::maintenance_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Request.def()
    }
}

impl Related<super::purchase_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
