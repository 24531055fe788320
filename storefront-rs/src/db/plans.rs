use sqlx::SqlitePool;

use crate::models::PricingPlan;

/// All pricing plans in storage order.
pub async fn list_plans(pool: &SqlitePool) -> Result<Vec<PricingPlan>, sqlx::Error> {
    sqlx::query_as::<_, PricingPlan>(
        r#"
        SELECT id, name, price_minor, duration_days, is_active, created_at
        FROM pricing_plans
        ORDER BY rowid
        "#,
    )
    .fetch_all(pool)
    .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use anyhow::Result;
    use sqlx::SqlitePool;

    use crate::db::test_util::memory_pool;

    use super::list_plans;

    async fn insert_plan(pool: &SqlitePool, id: &str, name: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO pricing_plans (id, name, price_minor, duration_days, is_active, created_at) \
             VALUES (?, ?, 990, 30, 1, ?)",
        )
        .bind(id)
        .bind(name)
        .bind(crate::db::now_utc())
        .execute(pool)
        .await?;
        Ok(())
    }

    #[tokio::test]
    async fn list_plans_preserves_storage_order() -> Result<()> {
        let pool = memory_pool().await?;
        insert_plan(&pool, "p-zeta", "Zeta").await?;
        insert_plan(&pool, "p-alpha", "Alpha").await?;
        insert_plan(&pool, "p-mid", "Mid").await?;

        let plans = list_plans(&pool).await?;
        let ids = plans.iter().map(|plan| plan.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["p-zeta", "p-alpha", "p-mid"]);
        Ok(())
    }

    #[tokio::test]
    async fn list_plans_returns_empty_for_empty_catalog() -> Result<()> {
        let pool = memory_pool().await?;
        assert!(list_plans(&pool).await?.is_empty());
        Ok(())
    }
}
