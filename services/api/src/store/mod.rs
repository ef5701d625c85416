//! Persistence boundary for the restaurant API.
//!
//! Handlers only see [`RestaurantStore`]. Create operations take a record
//! whose `id` is ignored and return it with the id the store assigned.
use crate::model::{
    Address, Category, CategoryPatch, Dish, DishPatch, Order, OrderItem, OrderPatch, Reservation,
    Review, RoleRecord, Status, Table, TablePatch, User, UserPatch,
};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait RestaurantStore: Send + Sync {
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn get_user(&self, id: i64) -> StoreResult<User>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn create_user(&self, user: User) -> StoreResult<User>;
    async fn patch_user(&self, id: i64, patch: UserPatch) -> StoreResult<User>;

    async fn list_roles(&self) -> StoreResult<Vec<RoleRecord>>;
    async fn get_role(&self, id: i64) -> StoreResult<RoleRecord>;

    async fn list_addresses(&self, user_id: Option<i64>) -> StoreResult<Vec<Address>>;
    async fn get_address(&self, id: i64) -> StoreResult<Address>;
    async fn create_address(&self, address: Address) -> StoreResult<Address>;

    async fn list_categories(&self) -> StoreResult<Vec<Category>>;
    async fn get_category(&self, id: i64) -> StoreResult<Category>;
    async fn create_category(&self, category: Category) -> StoreResult<Category>;
    async fn patch_category(&self, id: i64, patch: CategoryPatch) -> StoreResult<Category>;
    async fn delete_category(&self, id: i64) -> StoreResult<()>;

    async fn list_dishes(&self, category_id: Option<i64>) -> StoreResult<Vec<Dish>>;
    async fn get_dish(&self, id: i64) -> StoreResult<Dish>;
    async fn create_dish(&self, dish: Dish) -> StoreResult<Dish>;
    async fn patch_dish(&self, id: i64, patch: DishPatch) -> StoreResult<Dish>;
    async fn delete_dish(&self, id: i64) -> StoreResult<()>;

    async fn list_reviews(&self, dish_id: Option<i64>) -> StoreResult<Vec<Review>>;
    async fn get_review(&self, id: i64) -> StoreResult<Review>;
    async fn create_review(&self, review: Review) -> StoreResult<Review>;
    async fn delete_review(&self, id: i64) -> StoreResult<()>;

    async fn list_statuses(&self) -> StoreResult<Vec<Status>>;
    async fn get_status(&self, id: i64) -> StoreResult<Status>;

    async fn list_orders(&self, customer_id: Option<i64>) -> StoreResult<Vec<Order>>;
    async fn get_order(&self, id: i64) -> StoreResult<Order>;
    async fn create_order(&self, order: Order) -> StoreResult<Order>;
    async fn patch_order(&self, id: i64, patch: OrderPatch) -> StoreResult<Order>;
    /// Removes the order and every item in it.
    async fn delete_order(&self, id: i64) -> StoreResult<()>;
    /// Newest order of `customer_id` still in the initial status.
    async fn active_order_for(&self, customer_id: i64) -> StoreResult<Option<i64>>;

    async fn list_order_items(&self, order_id: Option<i64>) -> StoreResult<Vec<OrderItem>>;
    async fn get_order_item(&self, id: i64) -> StoreResult<OrderItem>;
    /// Inserts the item and adds its price to the owning order's total.
    async fn create_order_item(&self, item: OrderItem) -> StoreResult<OrderItem>;
    async fn update_order_item(
        &self,
        id: i64,
        quantity: u32,
        price_cents: i64,
    ) -> StoreResult<OrderItem>;
    async fn delete_order_item(&self, id: i64) -> StoreResult<()>;

    async fn list_tables(&self) -> StoreResult<Vec<Table>>;
    async fn get_table(&self, id: i64) -> StoreResult<Table>;
    async fn create_table(&self, table: Table) -> StoreResult<Table>;
    async fn patch_table(&self, id: i64, patch: TablePatch) -> StoreResult<Table>;
    async fn delete_table(&self, id: i64) -> StoreResult<()>;

    async fn list_reservations(&self, customer_id: Option<i64>) -> StoreResult<Vec<Reservation>>;
    async fn get_reservation(&self, id: i64) -> StoreResult<Reservation>;
    async fn create_reservation(&self, reservation: Reservation) -> StoreResult<Reservation>;

    async fn health_check(&self) -> StoreResult<()>;
    fn backend_name(&self) -> &'static str;
}
