//! HTTP API request/response types.
//!
//! # Purpose
//! Shared payload shapes for the restaurant REST API and OpenAPI schema
//! generation. Domain records live in [`crate::model`].
use crate::model::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
    pub backend: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SystemInfo {
    pub service: String,
    pub api_version: String,
}

/// One page of a list endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
    /// Number of matching records across all pages.
    pub total: usize,
}

#[derive(Debug, Deserialize, IntoParams, Default)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams, Default)]
#[into_params(parameter_in = Query)]
pub struct UserFilter {
    /// Only records belonging to this user.
    pub user: Option<i64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams, Default)]
#[into_params(parameter_in = Query)]
pub struct CustomerFilter {
    /// Only records of this customer.
    pub customer: Option<i64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams, Default)]
#[into_params(parameter_in = Query)]
pub struct OrderFilter {
    /// Only items of this order.
    pub order: Option<i64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams, Default)]
#[into_params(parameter_in = Query)]
pub struct CategoryFilter {
    pub category: Option<i64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams, Default)]
#[into_params(parameter_in = Query)]
pub struct DishFilter {
    pub dish: Option<i64>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct AddressCreateRequest {
    /// Owner of the address; defaults to the caller.
    pub user: Option<i64>,
    pub street: String,
    pub city: String,
    pub postal_code: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CategoryCreateRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct DishCreateRequest {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category_id: Option<i64>,
    #[serde(default = "available_by_default")]
    pub available: bool,
}

fn available_by_default() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderCreateRequest {
    /// Customer placing the order; defaults to the caller.
    pub customer: Option<i64>,
    pub address: Option<i64>,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct TableCreateRequest {
    pub number: u32,
    pub seats: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CartQuoteLine {
    pub dish: i64,
    pub name: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct CartQuote {
    pub lines: Vec<CartQuoteLine>,
    pub total_cents: i64,
    pub quoted_at: DateTime<Utc>,
}
