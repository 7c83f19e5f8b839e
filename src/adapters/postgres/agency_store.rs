//! PostgreSQL implementation of AgencyStore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::PgPool;

use crate::domain::agency::{Agency, AgencyPatch, AgencyStatus, CommissionCredit};
use crate::domain::foundation::{AgencyId, DomainError, ErrorCode, Money, PromoCodeId, Timestamp};
use crate::domain::promo::CodeKey;
use crate::ports::AgencyStore;

use super::{col, db_error};

const COLUMNS: &str = "id, name, email, promo_code, promo_code_id, total_referrals, \
     total_earnings, pending_payout, commission_rate, status, bank_details, created_at, \
     updated_at";

/// PostgreSQL implementation of AgencyStore.
///
/// Commission credits are a single UPDATE with SQL-side additions, so
/// concurrent redemptions of the same referral code cannot lose aggregate
/// updates.
#[derive(Clone)]
pub struct PostgresAgencyStore {
    pool: PgPool,
}

impl PostgresAgencyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AgencyStore for PostgresAgencyStore {
    async fn find_by_id(&self, id: &AgencyId) -> Result<Option<Agency>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM agencies WHERE id = $1", COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(format!("Failed to fetch agency: {}", e)))?;

        row.map(row_to_agency).transpose()
    }

    async fn insert(&self, agency: Agency) -> Result<Agency, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO agencies (
                id, name, email, promo_code, promo_code_id, total_referrals,
                total_earnings, pending_payout, commission_rate, status,
                bank_details, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(agency.id.as_uuid())
        .bind(&agency.name)
        .bind(&agency.email)
        .bind(agency.promo_code.as_ref().map(|c| c.as_str()))
        .bind(agency.promo_code_id.map(|id| *id.as_uuid()))
        .bind(agency.total_referrals as i64)
        .bind(agency.total_earnings.amount())
        .bind(agency.pending_payout.amount())
        .bind(agency.commission_rate)
        .bind(status_to_str(agency.status))
        .bind(agency.bank_details.as_deref())
        .bind(agency.created_at.as_datetime())
        .bind(agency.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error(format!("Failed to insert agency: {}", e)))?;

        Ok(agency)
    }

    async fn update(
        &self,
        id: &AgencyId,
        patch: AgencyPatch,
    ) -> Result<Option<Agency>, DomainError> {
        let Some(mut agency) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        patch.apply_to(&mut agency, Timestamp::now());

        let result = sqlx::query(
            r#"
            UPDATE agencies SET
                name = $2,
                email = $3,
                commission_rate = $4,
                status = $5,
                bank_details = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(agency.id.as_uuid())
        .bind(&agency.name)
        .bind(&agency.email)
        .bind(agency.commission_rate)
        .bind(status_to_str(agency.status))
        .bind(agency.bank_details.as_deref())
        .bind(agency.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error(format!("Failed to update agency: {}", e)))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(agency))
    }

    async fn set_referral_code(
        &self,
        id: &AgencyId,
        code: Option<(PromoCodeId, CodeKey)>,
    ) -> Result<Option<Agency>, DomainError> {
        let (code_id, key) = match &code {
            Some((code_id, key)) => (Some(*code_id.as_uuid()), Some(key.as_str().to_string())),
            None => (None, None),
        };

        let row = sqlx::query(&format!(
            r#"
            UPDATE agencies SET
                promo_code_id = $2,
                promo_code = $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(id.as_uuid())
        .bind(code_id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error(format!("Failed to set agency referral code: {}", e)))?;

        row.map(row_to_agency).transpose()
    }

    async fn credit_commission(
        &self,
        id: &AgencyId,
        credit: CommissionCredit,
    ) -> Result<Option<Agency>, DomainError> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE agencies SET
                total_referrals = total_referrals + $2,
                total_earnings = total_earnings + $3,
                pending_payout = pending_payout + $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(id.as_uuid())
        .bind(credit.referrals as i64)
        .bind(credit.amount.amount())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error(format!("Failed to credit agency commission: {}", e)))?;

        row.map(row_to_agency).transpose()
    }

    async fn list(&self) -> Result<Vec<Agency>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM agencies ORDER BY created_at DESC",
            COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error(format!("Failed to list agencies: {}", e)))?;

        rows.into_iter().map(row_to_agency).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn status_to_str(status: AgencyStatus) -> &'static str {
    match status {
        AgencyStatus::Active => "active",
        AgencyStatus::Inactive => "inactive",
    }
}

fn str_to_status(s: &str) -> Result<AgencyStatus, DomainError> {
    match s {
        "active" => Ok(AgencyStatus::Active),
        "inactive" => Ok(AgencyStatus::Inactive),
        _ => Err(db_error(format!("Invalid agency status: {}", s))),
    }
}

fn row_to_agency(row: PgRow) -> Result<Agency, DomainError> {
    let promo_code: Option<String> = col(&row, "promo_code")?;
    let promo_code = promo_code
        .map(|c| {
            CodeKey::try_new(&c).map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Stored referral code is not a valid key: {}", e),
                )
            })
        })
        .transpose()?;

    let promo_code_id: Option<uuid::Uuid> = col(&row, "promo_code_id")?;
    let total_referrals: i64 = col(&row, "total_referrals")?;
    let total_earnings: Decimal = col(&row, "total_earnings")?;
    let pending_payout: Decimal = col(&row, "pending_payout")?;
    let status_str: String = col(&row, "status")?;
    let created_at: DateTime<Utc> = col(&row, "created_at")?;
    let updated_at: DateTime<Utc> = col(&row, "updated_at")?;

    Ok(Agency {
        id: AgencyId::from_uuid(col(&row, "id")?),
        name: col(&row, "name")?,
        email: col(&row, "email")?,
        promo_code,
        promo_code_id: promo_code_id.map(PromoCodeId::from_uuid),
        total_referrals: total_referrals as u64,
        total_earnings: Money::new(total_earnings),
        pending_payout: Money::new(pending_payout),
        commission_rate: col(&row, "commission_rate")?,
        status: str_to_status(&status_str)?,
        bank_details: col(&row, "bank_details")?,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    })
}
