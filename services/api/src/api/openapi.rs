//! OpenAPI schema aggregation for the restaurant API.
use crate::api::{
    addresses, cart, categories, dishes, order_items, orders, reservations, reviews, roles,
    statuses, system, tables,
    types::{ErrorResponse, HealthStatus, SystemInfo},
    users,
};
use crate::auth::session;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "trattoria-api",
        version = "v1",
        description = "Restaurant ordering HTTP API"
    ),
    paths(
        system::system_info,
        system::system_health,
        session::register,
        session::login,
        users::list_users,
        users::get_user,
        users::patch_user,
        roles::list_roles,
        roles::get_role,
        addresses::list_addresses,
        addresses::get_address,
        addresses::create_address,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::patch_category,
        categories::delete_category,
        dishes::list_dishes,
        dishes::get_dish,
        dishes::create_dish,
        dishes::patch_dish,
        dishes::delete_dish,
        reviews::list_reviews,
        reviews::get_review,
        reviews::create_review,
        reviews::delete_review,
        statuses::list_statuses,
        statuses::get_status,
        orders::list_orders,
        orders::get_order,
        orders::create_order,
        orders::patch_order,
        orders::delete_order,
        order_items::list_order_items,
        order_items::get_order_item,
        order_items::create_order_item,
        order_items::patch_order_item,
        order_items::delete_order_item,
        cart::quote_cart,
        tables::list_tables,
        tables::get_table,
        tables::create_table,
        tables::patch_table,
        tables::delete_table,
        reservations::list_reservations,
        reservations::get_reservation,
        reservations::create_reservation
    ),
    components(schemas(SystemInfo, HealthStatus, ErrorResponse)),
    tags(
        (name = "system", description = "Service metadata and health"),
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "User accounts"),
        (name = "roles", description = "Role catalog"),
        (name = "addresses", description = "Delivery addresses"),
        (name = "menu", description = "Categories, dishes, and reviews"),
        (name = "orders", description = "Orders, items, statuses, and cart pricing"),
        (name = "booking", description = "Tables and reservations")
    )
)]
pub struct ApiDoc;
