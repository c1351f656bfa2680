use crate::entities::enums::Role;

/// Permission names used by route gating.
pub mod consts {
    pub const ADMIN_USERS: &str = "admin:users";

    pub const CLUBS_READ: &str = "clubs:read";
    pub const CLUBS_MANAGE: &str = "clubs:manage";

    pub const CATALOG_READ: &str = "catalog:read";
    pub const CATALOG_MANAGE: &str = "catalog:manage";

    pub const INVENTORY_READ: &str = "inventory:read";
    pub const INVENTORY_ADJUST: &str = "inventory:adjust";

    pub const REQUESTS_READ: &str = "requests:read";
    pub const REQUESTS_CREATE: &str = "requests:create";
    /// Manager-side decisions: approve, reject, issue from stock, help replies.
    pub const REQUESTS_DECIDE: &str = "requests:decide";

    pub const ORDERS_READ: &str = "purchase-orders:read";
    pub const ORDERS_MANAGE: &str = "purchase-orders:manage";

    pub const WORKLOGS_READ: &str = "work-logs:read";
    pub const WORKLOGS_MANAGE: &str = "work-logs:manage";
}

/// Static role → permission map. Admins additionally pass every permission
/// check in the middleware, so their list stays short.
pub fn permissions_for_role(role: Role) -> Vec<String> {
    use consts::*;

    let perms: &[&str] = match role {
        Role::Admin => &[ADMIN_USERS],
        Role::ClubOwner => &[
            CLUBS_READ,
            CLUBS_MANAGE,
            CATALOG_READ,
            INVENTORY_READ,
            INVENTORY_ADJUST,
            REQUESTS_READ,
            REQUESTS_DECIDE,
            ORDERS_READ,
            ORDERS_MANAGE,
            WORKLOGS_READ,
            WORKLOGS_MANAGE,
        ],
        Role::HeadMechanic => &[
            CLUBS_READ,
            CATALOG_READ,
            CATALOG_MANAGE,
            INVENTORY_READ,
            INVENTORY_ADJUST,
            REQUESTS_READ,
            REQUESTS_CREATE,
            REQUESTS_DECIDE,
            ORDERS_READ,
            ORDERS_MANAGE,
            WORKLOGS_READ,
            WORKLOGS_MANAGE,
        ],
        Role::Mechanic => &[
            CLUBS_READ,
            CATALOG_READ,
            INVENTORY_READ,
            REQUESTS_READ,
            REQUESTS_CREATE,
            ORDERS_READ,
            WORKLOGS_READ,
            WORKLOGS_MANAGE,
        ],
    };
    perms.iter().map(|p| p.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mechanics_cannot_decide_requests() {
        let perms = permissions_for_role(Role::Mechanic);
        assert!(perms.contains(&consts::REQUESTS_CREATE.to_string()));
        assert!(!perms.contains(&consts::REQUESTS_DECIDE.to_string()));
    }

    #[test]
    fn owners_manage_orders_and_clubs() {
        let perms = permissions_for_role(Role::ClubOwner);
        assert!(perms.contains(&consts::ORDERS_MANAGE.to_string()));
        assert!(perms.contains(&consts::CLUBS_MANAGE.to_string()));
    }
}
