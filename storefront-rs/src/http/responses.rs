use serde::Serialize;

use crate::models::{Invoice, OrderWithRelations, PricingPlan, User};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub role: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            avatar: user.avatar,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: &'static str,
}

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub id: String,
    pub order_id: String,
    pub plan_id: String,
    pub quantity: i64,
    pub unit_price_minor: i64,
    pub plan: PricingPlan,
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub user_id: String,
    pub status: String,
    pub created_at: String,
    pub items: Vec<OrderItemResponse>,
    pub invoices: Vec<Invoice>,
}

impl From<OrderWithRelations> for OrderResponse {
    fn from(entry: OrderWithRelations) -> Self {
        Self {
            id: entry.order.id,
            user_id: entry.order.user_id,
            status: entry.order.status,
            created_at: entry.order.created_at,
            items: entry
                .items
                .into_iter()
                .map(|entry| OrderItemResponse {
                    id: entry.item.id,
                    order_id: entry.item.order_id,
                    plan_id: entry.item.plan_id,
                    quantity: entry.item.quantity,
                    unit_price_minor: entry.item.unit_price_minor,
                    plan: entry.plan,
                })
                .collect::<Vec<_>>(),
            invoices: entry.invoices,
        }
    }
}
