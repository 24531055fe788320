//! Database entities and API request types.
//!
//! Entities map 1:1 to tables in `migrations/`. Timestamps are stored as
//! `YYYY-MM-DD HH:MM:SS.ffffff` UTC text so lexicographic order matches
//! chronological order.

use serde::{Deserialize, Serialize};

pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub role: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PricingPlan {
    pub id: String,
    pub name: String,
    pub price_minor: i64,
    pub duration_days: i64,
    pub is_active: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub status: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub plan_id: String,
    pub quantity: i64,
    pub unit_price_minor: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Invoice {
    pub id: String,
    pub order_id: String,
    pub number: String,
    pub amount_minor: i64,
    pub status: String,
    pub created_at: String,
}

/// An order item joined with the plan it references.
#[derive(Debug, Clone)]
pub struct OrderItemWithPlan {
    pub item: OrderItem,
    pub plan: PricingPlan,
}

/// An order with its items and its most recent invoices.
#[derive(Debug, Clone)]
pub struct OrderWithRelations {
    pub order: Order,
    pub items: Vec<OrderItemWithPlan>,
    pub invoices: Vec<Invoice>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}
