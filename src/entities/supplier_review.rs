use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reviews and complaints share a table; `is_complaint` picks the flavor.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "supplier_reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub review_id: i64,
    pub purchase_order_id: i64,
    pub supplier_id: Option<i64>,
    pub club_id: Option<i64>,
    pub user_id: Option<i64>,
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub review_date: DateTime<Utc>,
    pub is_complaint: bool,
    pub complaint_status: Option<String>,
    pub complaint_resolved: bool,
    pub complaint_title: Option<String>,
    pub resolution_notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::purchase_order::Entity",
        from = "Column::PurchaseOrderId",
        to = "super::purchase_order::Column::OrderId"
    )]
    PurchaseOrder,
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::SupplierId"
    )]
    Supplier,
}

impl Related<super::purchase_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrder.def()
    }
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
