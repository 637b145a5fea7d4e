use crate::routing::{RouteRecord, RouteSection};

/// Admin Route Table
///
/// Back-office pages rendered inside the admin layout. Access control is
/// not enforced here; the `role` meta label is for consumers that do.
pub fn admin_section() -> RouteSection {
    RouteSection::new(
        "admin",
        vec![RouteRecord::new("/admin", "layout/admin")
            .meta("role", "admin")
            .children([
                // /admin/users
                RouteRecord::new("users", "page/admin/users").named("admin-user"),
                // /admin/products
                RouteRecord::new("products", "page/admin/products").named("admin-product"),
            ])],
    )
}
