//! Restaurant domain model.
//!
//! # Purpose
//! Re-exports the account, menu, ordering, and booking records together with
//! their creation payloads and patches. Every record that the rule table talks
//! about implements [`trattoria_authz::Resource`] so handlers can pass it
//! straight to the authorizer.
mod account;
mod booking;
mod menu;
mod ordering;

pub use account::{Address, RoleRecord, User, UserPatch};
pub use booking::{Reservation, ReservationCreate, Table, TablePatch};
pub use menu::{Category, CategoryPatch, Dish, DishPatch, MAX_PRICE_CENTS, Review, ReviewCreate};
pub use ordering::{
    Cart, CartLine, MAX_LINE_QUANTITY, Order, OrderItem, OrderItemCreate, OrderItemPatch,
    OrderPatch, STATUS_CREATED, Status, line_price_cents,
};
