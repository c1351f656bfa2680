use crate::db::DbPool;
use crate::entities::parts_catalog;
use crate::errors::ServiceError;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Input for creating a catalog entry.
#[derive(Debug, Clone)]
pub struct CreateCatalogEntry {
    pub catalog_number: String,
    pub official_name: Option<String>,
    pub common_name: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub is_unique: bool,
}

/// Service for the spare-parts catalog.
#[derive(Clone)]
pub struct CatalogService {
    db_pool: Arc<DbPool>,
}

impl CatalogService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    #[instrument(skip(self, input), fields(catalog_number = %input.catalog_number))]
    pub async fn create_entry(
        &self,
        input: CreateCatalogEntry,
    ) -> Result<parts_catalog::Model, ServiceError> {
        let number = input.catalog_number.trim().to_string();
        if number.is_empty() {
            return Err(ServiceError::ValidationError(
                "Catalog number is required".to_string(),
            ));
        }

        let existing = parts_catalog::Entity::find()
            .filter(parts_catalog::Column::CatalogNumber.eq(number.clone()))
            .one(&*self.db_pool)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Catalog entry {} already exists",
                number
            )));
        }

        let entry = parts_catalog::ActiveModel {
            catalog_number: Set(number.clone()),
            official_name: Set(input.official_name),
            common_name: Set(input.common_name),
            description: Set(input.description),
            unit: Set(input.unit),
            is_unique: Set(input.is_unique),
            ..Default::default()
        }
        .insert(&*self.db_pool)
        .await?;

        info!(catalog_id = entry.catalog_id, "catalog entry created");
        Ok(entry)
    }

    #[instrument(skip(self))]
    pub async fn get_entry(&self, catalog_id: i64) -> Result<parts_catalog::Model, ServiceError> {
        parts_catalog::Entity::find_by_id(catalog_id)
            .one(&*self.db_pool)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Catalog entry {} not found", catalog_id))
            })
    }

    /// Substring search over catalog number and names.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        limit: u64,
    ) -> Result<Vec<parts_catalog::Model>, ServiceError> {
        let pattern = format!("%{}%", query.trim());
        let entries = parts_catalog::Entity::find()
            .filter(
                Condition::any()
                    .add(parts_catalog::Column::CatalogNumber.like(pattern.clone()))
                    .add(parts_catalog::Column::OfficialName.like(pattern.clone()))
                    .add(parts_catalog::Column::CommonName.like(pattern)),
            )
            .order_by_asc(parts_catalog::Column::CatalogNumber)
            .paginate(&*self.db_pool, limit.max(1))
            .fetch_page(0)
            .await?;
        Ok(entries)
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<parts_catalog::Model>, u64), ServiceError> {
        let paginator = parts_catalog::Entity::find()
            .order_by_asc(parts_catalog::Column::CatalogNumber)
            .paginate(&*self.db_pool, per_page.max(1));
        let total = paginator.num_items().await?;
        let entries = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((entries, total))
    }
}
