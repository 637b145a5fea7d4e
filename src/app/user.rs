use crate::routing::{RouteRecord, RouteSection};

/// User Route Table
///
/// Public pages rendered inside the user layout. The home page uses an
/// empty child path so that `/` resolves to it rather than to the layout.
pub fn user_section() -> RouteSection {
    RouteSection::new(
        "user",
        vec![RouteRecord::new("/", "layout/user")
            .meta("role", "user")
            .children([
                RouteRecord::new("", "page/user/home").named("home"),
                // Absolute child: still rendered inside the user layout.
                RouteRecord::new("/about", "page/user/about").named("about"),
                RouteRecord::new("contact", "page/user/contact").named("contact"),
            ])],
    )
}
