//! PostgreSQL implementation of UsageLedger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use crate::domain::foundation::{
    AgencyId, DomainError, Money, NumberId, PromoCodeId, Timestamp, UsageRecordId, UserId,
};
use crate::domain::promo::{NewUsage, PromoCodeUsage};
use crate::ports::UsageLedger;

use super::{col, db_error};

const COLUMNS: &str = "id, promo_code_id, user_id, number_id, discount_amount, original_price, \
     final_price, commission_amount, agency_id, used_at";

/// PostgreSQL implementation of UsageLedger.
///
/// Append-only: rows are never updated or deleted, and there is no foreign
/// key to `promo_codes`, so history survives code deletion.
#[derive(Clone)]
pub struct PostgresUsageLedger {
    pool: PgPool,
}

impl PostgresUsageLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsageLedger for PostgresUsageLedger {
    async fn insert(&self, usage: NewUsage) -> Result<PromoCodeUsage, DomainError> {
        let record = usage.into_usage(Timestamp::now());

        sqlx::query(
            r#"
            INSERT INTO promo_code_usages (
                id, promo_code_id, user_id, number_id, discount_amount,
                original_price, final_price, commission_amount, agency_id, used_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.promo_code_id.as_uuid())
        .bind(record.user_id.as_uuid())
        .bind(record.number_id.as_uuid())
        .bind(record.discount_amount.amount())
        .bind(record.original_price.amount())
        .bind(record.final_price.amount())
        .bind(record.commission_amount.amount())
        .bind(record.agency_id.map(|id| *id.as_uuid()))
        .bind(record.used_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error(format!("Failed to insert usage record: {}", e)))?;

        Ok(record)
    }

    async fn count_for_code(&self, code_id: &PromoCodeId) -> Result<u32, DomainError> {
        let result: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM promo_code_usages WHERE promo_code_id = $1")
                .bind(code_id.as_uuid())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error(format!("Failed to count usages: {}", e)))?;

        Ok(result.0 as u32)
    }

    async fn count_for_code_and_user(
        &self,
        code_id: &PromoCodeId,
        user_id: &UserId,
    ) -> Result<u32, DomainError> {
        let result: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM promo_code_usages WHERE promo_code_id = $1 AND user_id = $2",
        )
        .bind(code_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(format!("Failed to count usages by user: {}", e)))?;

        Ok(result.0 as u32)
    }

    async fn list_for_code(
        &self,
        code_id: &PromoCodeId,
    ) -> Result<Vec<PromoCodeUsage>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM promo_code_usages WHERE promo_code_id = $1 ORDER BY used_at DESC",
            COLUMNS
        ))
        .bind(code_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(format!("Failed to list usages for code: {}", e)))?;

        rows.into_iter().map(row_to_usage).collect()
    }

    async fn list_for_agency(
        &self,
        agency_id: &AgencyId,
    ) -> Result<Vec<PromoCodeUsage>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM promo_code_usages WHERE agency_id = $1 ORDER BY used_at DESC",
            COLUMNS
        ))
        .bind(agency_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(format!("Failed to list usages for agency: {}", e)))?;

        rows.into_iter().map(row_to_usage).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn row_to_usage(row: PgRow) -> Result<PromoCodeUsage, DomainError> {
    let discount_amount: Decimal = col(&row, "discount_amount")?;
    let original_price: Decimal = col(&row, "original_price")?;
    let final_price: Decimal = col(&row, "final_price")?;
    let commission_amount: Decimal = col(&row, "commission_amount")?;
    let agency_id: Option<uuid::Uuid> = col(&row, "agency_id")?;
    let used_at: DateTime<Utc> = col(&row, "used_at")?;

    Ok(PromoCodeUsage {
        id: UsageRecordId::from_uuid(col(&row, "id")?),
        promo_code_id: PromoCodeId::from_uuid(col(&row, "promo_code_id")?),
        user_id: UserId::from_uuid(col(&row, "user_id")?),
        number_id: NumberId::from_uuid(col(&row, "number_id")?),
        discount_amount: Money::new(discount_amount),
        original_price: Money::new(original_price),
        final_price: Money::new(final_price),
        commission_amount: Money::new(commission_amount),
        agency_id: agency_id.map(AgencyId::from_uuid),
        used_at: Timestamp::from_datetime(used_at),
    })
}
