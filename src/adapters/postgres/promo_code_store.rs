//! PostgreSQL implementation of PromoCodeStore.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, PromoCodeId, Timestamp};
use crate::domain::promo::{
    CodeKey, DiscountPolicy, PromoCode, PromoCodePatch, PromoCodeStatus, PromoCodeType,
};
use crate::ports::PromoCodeStore;

use super::{col, db_error};

const COLUMNS: &str = "id, code, code_type, discount_type, discount_value, max_discount, \
     min_purchase, usage_limit, usage_limit_per_user, usage_count, valid_from, valid_until, \
     status, agency_id, agency_name, commission_rate, description, created_at, updated_at";

/// PostgreSQL implementation of PromoCodeStore.
///
/// The `code` column carries the normalized uppercase form and has a unique
/// index, so case-insensitive matching is a plain equality lookup.
#[derive(Clone)]
pub struct PostgresPromoCodeStore {
    pool: PgPool,
}

impl PostgresPromoCodeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn write_row(&self, code: &PromoCode) -> Result<(), DomainError> {
        let (discount_type, discount_value, max_discount) = discount_to_columns(&code.discount);

        sqlx::query(
            r#"
            INSERT INTO promo_codes (
                id, code, code_type, discount_type, discount_value, max_discount,
                min_purchase, usage_limit, usage_limit_per_user, usage_count,
                valid_from, valid_until, status, agency_id, agency_name,
                commission_rate, description, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19
            )
            "#,
        )
        .bind(code.id.as_uuid())
        .bind(code.code.as_str())
        .bind(code_type_to_str(code.code_type))
        .bind(discount_type)
        .bind(discount_value)
        .bind(max_discount)
        .bind(code.min_purchase.map(|m| m.amount()))
        .bind(code.usage_limit.map(|l| l as i32))
        .bind(code.usage_limit_per_user.map(|l| l as i32))
        .bind(code.usage_count as i32)
        .bind(code.valid_from.as_datetime())
        .bind(code.valid_until.as_datetime())
        .bind(status_to_str(code.status))
        .bind(code.agency_id.map(|id| *id.as_uuid()))
        .bind(code.agency_name.as_deref())
        .bind(code.commission_rate)
        .bind(code.description.as_deref())
        .bind(code.created_at.as_datetime())
        .bind(code.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error(format!("Failed to insert promo code: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl PromoCodeStore for PostgresPromoCodeStore {
    async fn find_by_code(&self, code: &CodeKey) -> Result<Option<PromoCode>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM promo_codes WHERE code = $1",
            COLUMNS
        ))
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error(format!("Failed to fetch promo code: {}", e)))?;

        row.map(row_to_promo_code).transpose()
    }

    async fn find_by_id(&self, id: &PromoCodeId) -> Result<Option<PromoCode>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM promo_codes WHERE id = $1",
            COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error(format!("Failed to fetch promo code: {}", e)))?;

        row.map(row_to_promo_code).transpose()
    }

    async fn insert(&self, code: PromoCode) -> Result<PromoCode, DomainError> {
        self.write_row(&code).await?;
        Ok(code)
    }

    async fn update(
        &self,
        id: &PromoCodeId,
        patch: PromoCodePatch,
    ) -> Result<Option<PromoCode>, DomainError> {
        let Some(mut code) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        patch.apply_to(&mut code, Timestamp::now());

        let (discount_type, discount_value, max_discount) = discount_to_columns(&code.discount);

        let result = sqlx::query(
            r#"
            UPDATE promo_codes SET
                code = $2,
                code_type = $3,
                discount_type = $4,
                discount_value = $5,
                max_discount = $6,
                min_purchase = $7,
                usage_limit = $8,
                usage_limit_per_user = $9,
                usage_count = $10,
                valid_from = $11,
                valid_until = $12,
                status = $13,
                agency_id = $14,
                agency_name = $15,
                commission_rate = $16,
                description = $17,
                updated_at = $18
            WHERE id = $1
            "#,
        )
        .bind(code.id.as_uuid())
        .bind(code.code.as_str())
        .bind(code_type_to_str(code.code_type))
        .bind(discount_type)
        .bind(discount_value)
        .bind(max_discount)
        .bind(code.min_purchase.map(|m| m.amount()))
        .bind(code.usage_limit.map(|l| l as i32))
        .bind(code.usage_limit_per_user.map(|l| l as i32))
        .bind(code.usage_count as i32)
        .bind(code.valid_from.as_datetime())
        .bind(code.valid_until.as_datetime())
        .bind(status_to_str(code.status))
        .bind(code.agency_id.map(|id| *id.as_uuid()))
        .bind(code.agency_name.as_deref())
        .bind(code.commission_rate)
        .bind(code.description.as_deref())
        .bind(code.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error(format!("Failed to update promo code: {}", e)))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(code))
    }

    async fn delete(&self, id: &PromoCodeId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM promo_codes WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error(format!("Failed to delete promo code: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self) -> Result<Vec<PromoCode>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM promo_codes ORDER BY created_at DESC",
            COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(format!("Failed to list promo codes: {}", e)))?;

        rows.into_iter().map(row_to_promo_code).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn code_type_to_str(code_type: PromoCodeType) -> &'static str {
    match code_type {
        PromoCodeType::User => "user",
        PromoCodeType::Agency => "agency",
    }
}

fn str_to_code_type(s: &str) -> Result<PromoCodeType, DomainError> {
    match s {
        "user" => Ok(PromoCodeType::User),
        "agency" => Ok(PromoCodeType::Agency),
        _ => Err(db_error(format!("Invalid promo code type: {}", s))),
    }
}

fn status_to_str(status: PromoCodeStatus) -> &'static str {
    match status {
        PromoCodeStatus::Active => "active",
        PromoCodeStatus::Inactive => "inactive",
        PromoCodeStatus::Expired => "expired",
    }
}

fn str_to_status(s: &str) -> Result<PromoCodeStatus, DomainError> {
    match s {
        "active" => Ok(PromoCodeStatus::Active),
        "inactive" => Ok(PromoCodeStatus::Inactive),
        "expired" => Ok(PromoCodeStatus::Expired),
        _ => Err(db_error(format!("Invalid promo code status: {}", s))),
    }
}

fn discount_to_columns(policy: &DiscountPolicy) -> (&'static str, Decimal, Option<Decimal>) {
    match policy {
        DiscountPolicy::Percentage { rate, max_discount } => {
            ("percentage", *rate, max_discount.map(|m| m.amount()))
        }
        DiscountPolicy::Fixed {
            amount,
            max_discount,
        } => ("fixed", amount.amount(), max_discount.map(|m| m.amount())),
    }
}

fn columns_to_discount(
    kind: &str,
    value: Decimal,
    cap: Option<Decimal>,
) -> Result<DiscountPolicy, DomainError> {
    use crate::domain::foundation::Money;

    let max_discount = cap.map(Money::new);
    match kind {
        "percentage" => Ok(DiscountPolicy::Percentage {
            rate: value,
            max_discount,
        }),
        "fixed" => Ok(DiscountPolicy::Fixed {
            amount: Money::new(value),
            max_discount,
        }),
        _ => Err(db_error(format!("Invalid discount type: {}", kind))),
    }
}

fn row_to_promo_code(row: PgRow) -> Result<PromoCode, DomainError> {
    use crate::domain::foundation::{AgencyId, Money};
    use chrono::{DateTime, Utc};

    let code_str: String = col(&row, "code")?;
    let code = CodeKey::try_new(&code_str).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Stored code is not a valid key: {}", e),
        )
    })?;

    let code_type_str: String = col(&row, "code_type")?;
    let discount_type: String = col(&row, "discount_type")?;
    let discount_value: Decimal = col(&row, "discount_value")?;
    let max_discount: Option<Decimal> = col(&row, "max_discount")?;
    let status_str: String = col(&row, "status")?;

    let min_purchase: Option<Decimal> = col(&row, "min_purchase")?;
    let usage_limit: Option<i32> = col(&row, "usage_limit")?;
    let usage_limit_per_user: Option<i32> = col(&row, "usage_limit_per_user")?;
    let usage_count: i32 = col(&row, "usage_count")?;

    let valid_from: DateTime<Utc> = col(&row, "valid_from")?;
    let valid_until: DateTime<Utc> = col(&row, "valid_until")?;
    let created_at: DateTime<Utc> = col(&row, "created_at")?;
    let updated_at: DateTime<Utc> = col(&row, "updated_at")?;

    let agency_id: Option<uuid::Uuid> = col(&row, "agency_id")?;

    Ok(PromoCode {
        id: PromoCodeId::from_uuid(col(&row, "id")?),
        code,
        code_type: str_to_code_type(&code_type_str)?,
        discount: columns_to_discount(&discount_type, discount_value, max_discount)?,
        min_purchase: min_purchase.map(Money::new),
        usage_limit: usage_limit.map(|l| l as u32),
        usage_limit_per_user: usage_limit_per_user.map(|l| l as u32),
        usage_count: usage_count as u32,
        valid_from: Timestamp::from_datetime(valid_from),
        valid_until: Timestamp::from_datetime(valid_until),
        status: str_to_status(&status_str)?,
        agency_id: agency_id.map(AgencyId::from_uuid),
        agency_name: col(&row, "agency_name")?,
        commission_rate: col(&row, "commission_rate")?,
        description: col(&row, "description")?,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    })
}
