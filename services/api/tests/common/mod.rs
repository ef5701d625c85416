#![allow(dead_code)]

use axum::body::Body;
use std::sync::Arc;
use std::time::Duration;
use trattoria_api::app::{AppState, build_router};
use trattoria_api::auth::keys::signing_keys_from_seed;
use trattoria_api::auth::token::{SigningKeys, mint_token};
use trattoria_api::model::{Category, Dish, Table, User};
use trattoria_api::store::RestaurantStore;
use trattoria_api::store::memory::InMemoryStore;
use trattoria_authz::{Authorizer, Role};

pub type App = axum::routing::RouterIntoService<Body, ()>;

pub struct TestApp {
    pub app: App,
    pub store: Arc<InMemoryStore>,
    pub keys: Arc<SigningKeys>,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let keys = Arc::new(signing_keys_from_seed([42; 32]));
    let state_store: Arc<dyn RestaurantStore + Send + Sync> = store.clone();
    let state = AppState {
        api_version: "v1".to_string(),
        store: state_store,
        authorizer: Arc::new(Authorizer::standard()),
        signing_keys: keys.clone(),
        token_ttl: Duration::from_secs(900),
        token_leeway_secs: 0,
        default_page_size: 20,
    };
    TestApp {
        app: build_router(state).into_service(),
        store,
        keys,
    }
}

impl TestApp {
    /// Insert a user directly and return a session token for them.
    pub async fn user_with_token(&self, email: &str, role: Role) -> (i64, String) {
        let user = self
            .store
            .create_user(User {
                id: 0,
                email: email.to_string(),
                name: email.to_string(),
                phone: None,
                role,
                password_hash: String::new(),
            })
            .await
            .expect("create user");
        let token = mint_token(&self.keys, user.id, role.as_str(), Duration::from_secs(900))
            .expect("token");
        (user.id, token)
    }

    pub async fn dish(&self, name: &str, price_cents: i64) -> Dish {
        self.store
            .create_dish(Dish {
                id: 0,
                name: name.to_string(),
                description: None,
                price_cents,
                category_id: None,
                available: true,
            })
            .await
            .expect("create dish")
    }

    pub async fn category(&self, name: &str) -> Category {
        self.store
            .create_category(Category {
                id: 0,
                name: name.to_string(),
                description: None,
            })
            .await
            .expect("create category")
    }

    pub async fn table(&self, number: u32, seats: u32) -> Table {
        self.store
            .create_table(Table {
                id: 0,
                number,
                seats,
            })
            .await
            .expect("create table")
    }
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}
