//! In-memory implementation of the restaurant store.
//!
//! # Purpose
//! Implements [`RestaurantStore`] with ordered maps guarded by
//! `tokio::sync::RwLock`. It backs local runs and tests, and any deployment
//! where durability is not required.
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - Writes are serialized per collection. Operations touching orders and
//!   their items take the `orders` lock before the `order_items` lock so the
//!   running total stays equal to the sum of item prices.
//! - Ids are assigned from a per-collection counter starting at 1 and are
//!   never reused.
//!
//! # Reference data
//! Every store starts with the four roles and the order statuses, with
//! `created` at [`STATUS_CREATED`].
use super::{RestaurantStore, StoreError, StoreResult};
use crate::model::{
    Address, Category, CategoryPatch, Dish, DishPatch, Order, OrderItem, OrderPatch, Reservation,
    Review, RoleRecord, STATUS_CREATED, Status, Table, TablePatch, User, UserPatch,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use trattoria_authz::Role;

const STATUS_NAMES: [&str; 5] = ["created", "confirmed", "cooking", "delivered", "cancelled"];

trait Row: Clone {
    const NAME: &'static str;
    fn assign_id(&mut self, id: i64);
}

macro_rules! row {
    ($ty:ty, $name:literal) => {
        impl Row for $ty {
            const NAME: &'static str = $name;

            fn assign_id(&mut self, id: i64) {
                self.id = id;
            }
        }
    };
}

row!(User, "user");
row!(RoleRecord, "role");
row!(Address, "address");
row!(Category, "category");
row!(Dish, "dish");
row!(Review, "review");
row!(Status, "status");
row!(Order, "order");
row!(OrderItem, "order item");
row!(Table, "table");
row!(Reservation, "reservation");

/// Rows of one entity type keyed by id, in insertion order.
#[derive(Debug)]
struct Collection<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T: Row> Collection<T> {
    fn new() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }

    fn insert(&mut self, mut row: T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        row.assign_id(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn get(&self, id: i64) -> StoreResult<T> {
        self.rows
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found::<T>(id))
    }

    fn get_mut(&mut self, id: i64) -> StoreResult<&mut T> {
        self.rows.get_mut(&id).ok_or_else(|| not_found::<T>(id))
    }

    fn remove(&mut self, id: i64) -> StoreResult<T> {
        self.rows.remove(&id).ok_or_else(|| not_found::<T>(id))
    }

    fn list(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows.values().filter(|row| keep(row)).cloned().collect()
    }
}

fn not_found<T: Row>(id: i64) -> StoreError {
    StoreError::NotFound(format!("{} {id}", T::NAME))
}

fn shared<T: Row>(collection: Collection<T>) -> Arc<RwLock<Collection<T>>> {
    Arc::new(RwLock::new(collection))
}

pub struct InMemoryStore {
    users: Arc<RwLock<Collection<User>>>,
    roles: Arc<RwLock<Collection<RoleRecord>>>,
    addresses: Arc<RwLock<Collection<Address>>>,
    categories: Arc<RwLock<Collection<Category>>>,
    dishes: Arc<RwLock<Collection<Dish>>>,
    reviews: Arc<RwLock<Collection<Review>>>,
    statuses: Arc<RwLock<Collection<Status>>>,
    orders: Arc<RwLock<Collection<Order>>>,
    order_items: Arc<RwLock<Collection<OrderItem>>>,
    tables: Arc<RwLock<Collection<Table>>>,
    reservations: Arc<RwLock<Collection<Reservation>>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        let mut roles = Collection::new();
        for role in Role::ALL {
            roles.insert(RoleRecord { id: 0, name: role });
        }
        let mut statuses = Collection::new();
        for name in STATUS_NAMES {
            statuses.insert(Status {
                id: 0,
                name: name.to_string(),
            });
        }
        Self {
            users: shared(Collection::new()),
            roles: shared(roles),
            addresses: shared(Collection::new()),
            categories: shared(Collection::new()),
            dishes: shared(Collection::new()),
            reviews: shared(Collection::new()),
            statuses: shared(statuses),
            orders: shared(Collection::new()),
            order_items: shared(Collection::new()),
            tables: shared(Collection::new()),
            reservations: shared(Collection::new()),
        }
    }
}

fn add_to_total(
    orders: &mut Collection<Order>,
    order_id: Option<i64>,
    delta: i64,
) -> StoreResult<()> {
    if let Some(order_id) = order_id {
        let order = orders.get_mut(order_id)?;
        order.total_cents = order
            .total_cents
            .checked_add(delta)
            .ok_or_else(|| StoreError::Conflict("order total is out of range".into()))?;
    }
    Ok(())
}

#[async_trait]
impl RestaurantStore for InMemoryStore {
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.users.read().await.list(|_| true))
    }

    async fn get_user(&self, id: i64) -> StoreResult<User> {
        self.users.read().await.get(id)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .rows
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create_user(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users
            .rows
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(StoreError::Conflict("email already registered".into()));
        }
        Ok(users.insert(user))
    }

    async fn patch_user(&self, id: i64, patch: UserPatch) -> StoreResult<User> {
        let mut users = self.users.write().await;
        let user = users.get_mut(id)?;
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(phone) = patch.phone {
            user.phone = Some(phone);
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        Ok(user.clone())
    }

    async fn list_roles(&self) -> StoreResult<Vec<RoleRecord>> {
        Ok(self.roles.read().await.list(|_| true))
    }

    async fn get_role(&self, id: i64) -> StoreResult<RoleRecord> {
        self.roles.read().await.get(id)
    }

    async fn list_addresses(&self, user_id: Option<i64>) -> StoreResult<Vec<Address>> {
        Ok(self
            .addresses
            .read()
            .await
            .list(|address| user_id.is_none() || address.user_id == user_id))
    }

    async fn get_address(&self, id: i64) -> StoreResult<Address> {
        self.addresses.read().await.get(id)
    }

    async fn create_address(&self, address: Address) -> StoreResult<Address> {
        Ok(self.addresses.write().await.insert(address))
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.categories.read().await.list(|_| true))
    }

    async fn get_category(&self, id: i64) -> StoreResult<Category> {
        self.categories.read().await.get(id)
    }

    async fn create_category(&self, category: Category) -> StoreResult<Category> {
        let mut categories = self.categories.write().await;
        if categories
            .rows
            .values()
            .any(|existing| existing.name == category.name)
        {
            return Err(StoreError::Conflict("category exists".into()));
        }
        Ok(categories.insert(category))
    }

    async fn patch_category(&self, id: i64, patch: CategoryPatch) -> StoreResult<Category> {
        let mut categories = self.categories.write().await;
        let taken = patch.name.as_ref().is_some_and(|name| {
            categories
                .rows
                .values()
                .any(|existing| existing.id != id && &existing.name == name)
        });
        if taken {
            return Err(StoreError::Conflict("category exists".into()));
        }
        let category = categories.get_mut(id)?;
        if let Some(name) = patch.name {
            category.name = name;
        }
        if let Some(description) = patch.description {
            category.description = Some(description);
        }
        Ok(category.clone())
    }

    async fn delete_category(&self, id: i64) -> StoreResult<()> {
        self.categories.write().await.remove(id)?;
        // Dishes outlive their category.
        for dish in self.dishes.write().await.rows.values_mut() {
            if dish.category_id == Some(id) {
                dish.category_id = None;
            }
        }
        Ok(())
    }

    async fn list_dishes(&self, category_id: Option<i64>) -> StoreResult<Vec<Dish>> {
        Ok(self
            .dishes
            .read()
            .await
            .list(|dish| category_id.is_none() || dish.category_id == category_id))
    }

    async fn get_dish(&self, id: i64) -> StoreResult<Dish> {
        self.dishes.read().await.get(id)
    }

    async fn create_dish(&self, dish: Dish) -> StoreResult<Dish> {
        Ok(self.dishes.write().await.insert(dish))
    }

    async fn patch_dish(&self, id: i64, patch: DishPatch) -> StoreResult<Dish> {
        let mut dishes = self.dishes.write().await;
        let dish = dishes.get_mut(id)?;
        if let Some(name) = patch.name {
            dish.name = name;
        }
        if let Some(description) = patch.description {
            dish.description = Some(description);
        }
        if let Some(price_cents) = patch.price_cents {
            dish.price_cents = price_cents;
        }
        if let Some(category_id) = patch.category_id {
            dish.category_id = Some(category_id);
        }
        if let Some(available) = patch.available {
            dish.available = available;
        }
        Ok(dish.clone())
    }

    async fn delete_dish(&self, id: i64) -> StoreResult<()> {
        if self
            .order_items
            .read()
            .await
            .rows
            .values()
            .any(|item| item.dish_id == id)
        {
            return Err(StoreError::Conflict("dish is referenced by orders".into()));
        }
        self.dishes.write().await.remove(id)?;
        self.reviews
            .write()
            .await
            .rows
            .retain(|_, review| review.dish_id != id);
        Ok(())
    }

    async fn list_reviews(&self, dish_id: Option<i64>) -> StoreResult<Vec<Review>> {
        Ok(self
            .reviews
            .read()
            .await
            .list(|review| dish_id.is_none() || Some(review.dish_id) == dish_id))
    }

    async fn get_review(&self, id: i64) -> StoreResult<Review> {
        self.reviews.read().await.get(id)
    }

    async fn create_review(&self, review: Review) -> StoreResult<Review> {
        Ok(self.reviews.write().await.insert(review))
    }

    async fn delete_review(&self, id: i64) -> StoreResult<()> {
        self.reviews.write().await.remove(id)?;
        Ok(())
    }

    async fn list_statuses(&self) -> StoreResult<Vec<Status>> {
        Ok(self.statuses.read().await.list(|_| true))
    }

    async fn get_status(&self, id: i64) -> StoreResult<Status> {
        self.statuses.read().await.get(id)
    }

    async fn list_orders(&self, customer_id: Option<i64>) -> StoreResult<Vec<Order>> {
        Ok(self
            .orders
            .read()
            .await
            .list(|order| customer_id.is_none() || order.customer_id == customer_id))
    }

    async fn get_order(&self, id: i64) -> StoreResult<Order> {
        self.orders.read().await.get(id)
    }

    async fn create_order(&self, mut order: Order) -> StoreResult<Order> {
        order.total_cents = 0;
        Ok(self.orders.write().await.insert(order))
    }

    async fn patch_order(&self, id: i64, patch: OrderPatch) -> StoreResult<Order> {
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(id)?;
        if let Some(status_id) = patch.status_id {
            order.status_id = status_id;
        }
        if let Some(address_id) = patch.address_id {
            order.address_id = Some(address_id);
        }
        if let Some(comment) = patch.comment {
            order.comment = Some(comment);
        }
        Ok(order.clone())
    }

    async fn delete_order(&self, id: i64) -> StoreResult<()> {
        let mut orders = self.orders.write().await;
        orders.remove(id)?;
        self.order_items
            .write()
            .await
            .rows
            .retain(|_, item| item.order_id != Some(id));
        Ok(())
    }

    async fn active_order_for(&self, customer_id: i64) -> StoreResult<Option<i64>> {
        Ok(self
            .orders
            .read()
            .await
            .rows
            .values()
            .rev()
            .find(|order| {
                order.customer_id == Some(customer_id) && order.status_id == STATUS_CREATED
            })
            .map(|order| order.id))
    }

    async fn list_order_items(&self, order_id: Option<i64>) -> StoreResult<Vec<OrderItem>> {
        Ok(self
            .order_items
            .read()
            .await
            .list(|item| order_id.is_none() || item.order_id == order_id))
    }

    async fn get_order_item(&self, id: i64) -> StoreResult<OrderItem> {
        self.order_items.read().await.get(id)
    }

    async fn create_order_item(&self, item: OrderItem) -> StoreResult<OrderItem> {
        let mut orders = self.orders.write().await;
        add_to_total(&mut orders, item.order_id, item.price_cents)?;
        Ok(self.order_items.write().await.insert(item))
    }

    async fn update_order_item(
        &self,
        id: i64,
        quantity: u32,
        price_cents: i64,
    ) -> StoreResult<OrderItem> {
        let mut orders = self.orders.write().await;
        let mut items = self.order_items.write().await;
        let item = items.get_mut(id)?;
        let delta = price_cents
            .checked_sub(item.price_cents)
            .ok_or_else(|| StoreError::Conflict("order total is out of range".into()))?;
        add_to_total(&mut orders, item.order_id, delta)?;
        item.quantity = quantity;
        item.price_cents = price_cents;
        Ok(item.clone())
    }

    async fn delete_order_item(&self, id: i64) -> StoreResult<()> {
        let mut orders = self.orders.write().await;
        let mut items = self.order_items.write().await;
        let item = items.remove(id)?;
        add_to_total(&mut orders, item.order_id, -item.price_cents)
    }

    async fn list_tables(&self) -> StoreResult<Vec<Table>> {
        Ok(self.tables.read().await.list(|_| true))
    }

    async fn get_table(&self, id: i64) -> StoreResult<Table> {
        self.tables.read().await.get(id)
    }

    async fn create_table(&self, table: Table) -> StoreResult<Table> {
        let mut tables = self.tables.write().await;
        if tables
            .rows
            .values()
            .any(|existing| existing.number == table.number)
        {
            return Err(StoreError::Conflict("table number in use".into()));
        }
        Ok(tables.insert(table))
    }

    async fn patch_table(&self, id: i64, patch: TablePatch) -> StoreResult<Table> {
        let mut tables = self.tables.write().await;
        let taken = patch.number.is_some_and(|number| {
            tables
                .rows
                .values()
                .any(|existing| existing.id != id && existing.number == number)
        });
        if taken {
            return Err(StoreError::Conflict("table number in use".into()));
        }
        let table = tables.get_mut(id)?;
        if let Some(number) = patch.number {
            table.number = number;
        }
        if let Some(seats) = patch.seats {
            table.seats = seats;
        }
        Ok(table.clone())
    }

    async fn delete_table(&self, id: i64) -> StoreResult<()> {
        if self
            .reservations
            .read()
            .await
            .rows
            .values()
            .any(|reservation| reservation.table_id == id)
        {
            return Err(StoreError::Conflict("table has reservations".into()));
        }
        self.tables.write().await.remove(id)?;
        Ok(())
    }

    async fn list_reservations(&self, customer_id: Option<i64>) -> StoreResult<Vec<Reservation>> {
        Ok(self
            .reservations
            .read()
            .await
            .list(|reservation| customer_id.is_none() || reservation.customer_id == customer_id))
    }

    async fn get_reservation(&self, id: i64) -> StoreResult<Reservation> {
        self.reservations.read().await.get(id)
    }

    async fn create_reservation(&self, reservation: Reservation) -> StoreResult<Reservation> {
        let mut reservations = self.reservations.write().await;
        if reservations.rows.values().any(|existing| {
            existing.table_id == reservation.table_id
                && existing.reserved_at == reservation.reserved_at
        }) {
            return Err(StoreError::Conflict("table already reserved".into()));
        }
        Ok(reservations.insert(reservation))
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
