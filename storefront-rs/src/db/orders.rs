use sqlx::SqlitePool;

use crate::models::{Invoice, Order, OrderItem, OrderItemWithPlan, OrderWithRelations, PricingPlan};

/// How many invoices are attached to each order in a listing.
const RECENT_INVOICE_LIMIT: i64 = 5;

/// A user's orders, newest first, each with its items (joined with their
/// plan) and its most recent invoices, newest first.
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<OrderWithRelations>, sqlx::Error> {
    let orders = sqlx::query_as::<_, Order>(
        r#"
        SELECT id, user_id, status, created_at
        FROM orders
        WHERE user_id = ?
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut result = Vec::with_capacity(orders.len());
    for order in orders {
        let items = items_for_order(pool, &order.id).await?;
        let invoices = recent_invoices(pool, &order.id).await?;
        result.push(OrderWithRelations {
            order,
            items,
            invoices,
        });
    }

    Ok(result)
}

#[derive(sqlx::FromRow)]
struct ItemWithPlanRow {
    id: String,
    order_id: String,
    plan_id: String,
    quantity: i64,
    unit_price_minor: i64,
    plan_name: String,
    plan_price_minor: i64,
    plan_duration_days: i64,
    plan_is_active: bool,
    plan_created_at: String,
}

async fn items_for_order(
    pool: &SqlitePool,
    order_id: &str,
) -> Result<Vec<OrderItemWithPlan>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ItemWithPlanRow>(
        r#"
        SELECT
            oi.id,
            oi.order_id,
            oi.plan_id,
            oi.quantity,
            oi.unit_price_minor,
            p.name AS plan_name,
            p.price_minor AS plan_price_minor,
            p.duration_days AS plan_duration_days,
            p.is_active AS plan_is_active,
            p.created_at AS plan_created_at
        FROM order_items oi
        JOIN pricing_plans p ON p.id = oi.plan_id
        WHERE oi.order_id = ?
        ORDER BY oi.rowid
        "#,
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| OrderItemWithPlan {
            plan: PricingPlan {
                id: row.plan_id.clone(),
                name: row.plan_name,
                price_minor: row.plan_price_minor,
                duration_days: row.plan_duration_days,
                is_active: row.plan_is_active,
                created_at: row.plan_created_at,
            },
            item: OrderItem {
                id: row.id,
                order_id: row.order_id,
                plan_id: row.plan_id,
                quantity: row.quantity,
                unit_price_minor: row.unit_price_minor,
            },
        })
        .collect::<Vec<_>>())
}

async fn recent_invoices(pool: &SqlitePool, order_id: &str) -> Result<Vec<Invoice>, sqlx::Error> {
    sqlx::query_as::<_, Invoice>(
        r#"
        SELECT id, order_id, number, amount_minor, status, created_at
        FROM invoices
        WHERE order_id = ?
        ORDER BY created_at DESC, rowid DESC
        LIMIT ?
        "#,
    )
    .bind(order_id)
    .bind(RECENT_INVOICE_LIMIT)
    .fetch_all(pool)
    .await
}
