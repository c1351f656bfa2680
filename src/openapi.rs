use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LaneOps API",
        description = "Bowling-club operations backend: maintenance requests, parts inventory, purchase orders, work logs and club staff management",
        license(name = "MIT")
    ),
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::logout,
        handlers::auth::me,
        handlers::auth::change_password,
        handlers::users::list_users,
        handlers::users::activate_user,
        handlers::users::deactivate_user,
        handlers::users::verify_user,
        handlers::clubs::public_clubs,
        handlers::clubs::list_clubs,
        handlers::clubs::get_club,
        handlers::clubs::create_club,
        handlers::clubs::update_club,
        handlers::clubs::club_staff,
        handlers::clubs::assign_staff,
        handlers::clubs::remove_staff,
        handlers::catalog::create_entry,
        handlers::catalog::get_entry,
        handlers::catalog::list_entries,
        handlers::catalog::search_entries,
        handlers::inventory::search_inventory,
        handlers::inventory::store_stock,
        handlers::inventory::reserve_stock,
        handlers::inventory::release_stock,
        handlers::inventory::low_stock,
        handlers::inventory::accessible_warehouses,
        handlers::maintenance_requests::create_request,
        handlers::maintenance_requests::list_requests,
        handlers::maintenance_requests::get_request,
        handlers::maintenance_requests::add_parts,
        handlers::maintenance_requests::approve_request,
        handlers::maintenance_requests::reject_request,
        handlers::maintenance_requests::issue_from_stock,
        handlers::maintenance_requests::order_parts,
        handlers::maintenance_requests::mark_delivered,
        handlers::maintenance_requests::mark_issued,
        handlers::maintenance_requests::complete_request,
        handlers::maintenance_requests::close_request,
        handlers::maintenance_requests::mark_unrepairable,
        handlers::maintenance_requests::publish_request,
        handlers::maintenance_requests::request_help,
        handlers::maintenance_requests::resolve_help,
        handlers::purchase_orders::list_orders,
        handlers::purchase_orders::get_order,
        handlers::purchase_orders::confirm_order,
        handlers::purchase_orders::cancel_order,
        handlers::purchase_orders::accept_order,
        handlers::purchase_orders::leave_review,
        handlers::purchase_orders::submit_complaint,
        handlers::purchase_orders::update_complaint,
        handlers::work_logs::create_work_log,
        handlers::work_logs::create_from_request,
        handlers::work_logs::search_work_logs,
        handlers::work_logs::get_work_log,
        handlers::work_logs::work_log_history,
        handlers::work_logs::update_status,
        handlers::work_logs::assign_mechanic,
        handlers::work_logs::update_details,
        handlers::work_logs::active_work_logs,
        handlers::work_logs::high_priority_work_logs,
        handlers::work_logs::completed_work_logs,
        handlers::work_logs::pending_work_logs,
        handlers::work_logs::work_logs_by_mechanic,
        handlers::work_logs::delete_work_log,
        handlers::notifications::list_notifications,
        handlers::notifications::mark_read,
        handlers::search::global_search,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        handlers::auth::RegisterRequest,
        handlers::auth::MechanicProfileRequest,
        handlers::auth::OwnerProfileRequest,
        handlers::auth::ManagerProfileRequest,
        handlers::auth::ClubRequest,
        handlers::auth::LoginRequest,
        handlers::auth::RefreshTokenRequest,
        handlers::auth::ChangePasswordRequest,
        handlers::clubs::CreateClubRequest,
        handlers::clubs::UpdateClubRequest,
        handlers::clubs::AssignStaffRequest,
        handlers::catalog::CreateCatalogEntryRequest,
        handlers::inventory::StoreStockRequest,
        handlers::inventory::StockMovementRequest,
        handlers::maintenance_requests::CreateRequestRequest,
        handlers::maintenance_requests::RequestedPartRequest,
        handlers::maintenance_requests::AddPartsRequest,
        handlers::maintenance_requests::ApproveRequestRequest,
        handlers::maintenance_requests::PartAvailabilityRequest,
        handlers::maintenance_requests::RejectRequestRequest,
        handlers::maintenance_requests::StockIssueRequest,
        handlers::maintenance_requests::PartDecisionRequest,
        handlers::maintenance_requests::OrderPartsRequest,
        handlers::maintenance_requests::OrderPartItemRequest,
        handlers::maintenance_requests::PartIdsRequest,
        handlers::maintenance_requests::UnrepairableRequest,
        handlers::maintenance_requests::HelpRequestRequest,
        handlers::maintenance_requests::HelpResolveRequest,
        handlers::maintenance_requests::HelpDecisionRequest,
        handlers::purchase_orders::AcceptOrderRequest,
        handlers::purchase_orders::SupplierRequest,
        handlers::purchase_orders::PartAcceptanceRequest,
        handlers::purchase_orders::SupplierReviewRequest,
        handlers::purchase_orders::ComplaintRequest,
        handlers::purchase_orders::ComplaintStatusRequest,
        handlers::work_logs::CreateWorkLogRequest,
        handlers::work_logs::UpdateStatusRequest,
        handlers::work_logs::AssignMechanicRequest,
        handlers::work_logs::UpdateDetailsRequest,
    )),
    tags(
        (name = "auth", description = "Registration, login and tokens"),
        (name = "admin", description = "Administrator user directory"),
        (name = "clubs", description = "Clubs and staff"),
        (name = "catalog", description = "Spare-parts catalog"),
        (name = "inventory", description = "Warehouse stock"),
        (name = "maintenance-requests", description = "Maintenance request workflow"),
        (name = "purchase-orders", description = "Supplier purchase orders"),
        (name = "work-logs", description = "Work logs"),
        (name = "notifications", description = "In-app notifications"),
        (name = "search", description = "Global search")
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at `/docs`, serving the spec at
/// `/api-docs/openapi.json`.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
