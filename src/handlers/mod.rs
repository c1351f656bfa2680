pub mod auth;
pub mod catalog;
pub mod clubs;
pub mod common;
pub mod inventory;
pub mod maintenance_requests;
pub mod notifications;
pub mod purchase_orders;
pub mod search;
pub mod users;
pub mod work_logs;

use crate::auth::AuthService;
use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState.
pub use crate::AppState;

/// Services container wired once at startup and shared by HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub auth: Arc<AuthService>,
    pub accounts: Arc<crate::services::accounts::AccountService>,
    pub clubs: Arc<crate::services::clubs::ClubService>,
    pub catalog: Arc<crate::services::catalog::CatalogService>,
    pub inventory: Arc<crate::services::inventory::InventoryService>,
    pub maintenance: Arc<crate::services::maintenance::MaintenanceService>,
    pub procurement: Arc<crate::services::purchase_orders::ProcurementService>,
    pub work_logs: Arc<crate::services::work_logs::WorkLogService>,
    pub notifications: crate::services::notifications::NotificationService,
    pub search: Arc<crate::services::search::SearchService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, auth: Arc<AuthService>) -> Self {
        let notifications = crate::services::notifications::NotificationService::new();

        let inventory = Arc::new(crate::services::inventory::InventoryService::new(
            db_pool.clone(),
            event_sender.clone(),
            notifications.clone(),
        ));
        let clubs = Arc::new(crate::services::clubs::ClubService::new(db_pool.clone()));
        let catalog = Arc::new(crate::services::catalog::CatalogService::new(
            db_pool.clone(),
        ));
        let accounts = Arc::new(crate::services::accounts::AccountService::new(
            db_pool.clone(),
            auth.clone(),
            event_sender.clone(),
        ));
        let maintenance = Arc::new(crate::services::maintenance::MaintenanceService::new(
            db_pool.clone(),
            event_sender.clone(),
            notifications.clone(),
            inventory.clone(),
            clubs.clone(),
        ));
        let procurement = Arc::new(crate::services::purchase_orders::ProcurementService::new(
            db_pool.clone(),
            event_sender.clone(),
            inventory.clone(),
        ));
        let work_logs = Arc::new(crate::services::work_logs::WorkLogService::new(
            db_pool.clone(),
            event_sender.clone(),
            notifications.clone(),
        ));
        let search = Arc::new(crate::services::search::SearchService::new(
            db_pool,
            inventory.clone(),
        ));

        Self {
            auth,
            accounts,
            clubs,
            catalog,
            inventory,
            maintenance,
            procurement,
            work_logs,
            notifications,
            search,
        }
    }
}
