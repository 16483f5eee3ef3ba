//! Database service for receipt-service.

use crate::models::{
    ListReceiptsFilter, Receipt, ReceiptItem, ReceiptWithItems, UpdateUserProfile, User,
};
use crate::receipts::ReceiptDraft;
use crate::services::metrics::DB_QUERY_DURATION;
use receiptr_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "receipt-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // User Operations
    // -------------------------------------------------------------------------

    /// Persist a new business account.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn create_user(&self, user: &User) -> Result<User, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_user"])
            .start_timer();

        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (
                user_id, name, email, password_hash, business_name, address, phone,
                website, logo_url, vat_rate, selected_template, created_utc
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING user_id, name, email, password_hash, business_name, address, phone,
                website, logo_url, vat_rate, selected_template, created_utc
            "#,
        )
        .bind(user.user_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.business_name)
        .bind(&user.address)
        .bind(&user.phone)
        .bind(&user.website)
        .bind(&user.logo_url)
        .bind(user.vat_rate)
        .bind(&user.selected_template)
        .bind(user.created_utc)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!("Email already registered"))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create user: {}", e)),
        })?;

        timer.observe_duration();

        info!(user_id = %created.user_id, "User registered");

        Ok(created)
    }

    /// Look up an account by email (login path).
    #[instrument(skip(self, email))]
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_user_by_email"])
            .start_timer();

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, name, email, password_hash, business_name, address, phone,
                website, logo_url, vat_rate, selected_template, created_utc
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to find user: {}", e)))?;

        timer.observe_duration();

        Ok(user)
    }

    /// Look up an account by id.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_user_by_id"])
            .start_timer();

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, name, email, password_hash, business_name, address, phone,
                website, logo_url, vat_rate, selected_template, created_utc
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to find user: {}", e)))?;

        timer.observe_duration();

        Ok(user)
    }

    /// Update a business profile. Absent fields keep their current value.
    #[instrument(skip(self, update), fields(user_id = %user_id))]
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        update: &UpdateUserProfile,
    ) -> Result<Option<User>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_profile"])
            .start_timer();

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                business_name = COALESCE($3, business_name),
                address = COALESCE($4, address),
                phone = COALESCE($5, phone),
                website = COALESCE($6, website),
                logo_url = COALESCE($7, logo_url),
                vat_rate = COALESCE($8, vat_rate)
            WHERE user_id = $1
            RETURNING user_id, name, email, password_hash, business_name, address, phone,
                website, logo_url, vat_rate, selected_template, created_utc
            "#,
        )
        .bind(user_id)
        .bind(&update.name)
        .bind(&update.business_name)
        .bind(&update.address)
        .bind(&update.phone)
        .bind(&update.website)
        .bind(&update.logo_url)
        .bind(update.vat_rate)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update profile: {}", e)))?;

        timer.observe_duration();

        Ok(user)
    }

    /// Update the receipt template an account renders with.
    #[instrument(skip(self), fields(user_id = %user_id, template = %selected_template))]
    pub async fn update_template(
        &self,
        user_id: Uuid,
        selected_template: &str,
    ) -> Result<Option<User>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_template"])
            .start_timer();

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET selected_template = $2
            WHERE user_id = $1
            RETURNING user_id, name, email, password_hash, business_name, address, phone,
                website, logo_url, vat_rate, selected_template, created_utc
            "#,
        )
        .bind(user_id)
        .bind(selected_template)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to update template: {}", e))
        })?;

        timer.observe_duration();

        Ok(user)
    }

    // -------------------------------------------------------------------------
    // Receipt Operations
    // -------------------------------------------------------------------------

    /// Persist an assembled receipt.
    ///
    /// Header and line items are written in one transaction: either the
    /// whole receipt becomes visible or nothing does. A duplicate
    /// receipt_number surfaces as a Conflict for the caller to handle.
    #[instrument(skip(self, draft), fields(user_id = %user_id, receipt_number = %draft.receipt_number))]
    pub async fn create_receipt(
        &self,
        user_id: Uuid,
        draft: &ReceiptDraft,
    ) -> Result<ReceiptWithItems, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_receipt"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let receipt_id = Uuid::new_v4();
        let receipt = sqlx::query_as::<_, Receipt>(
            r#"
            INSERT INTO receipts (
                receipt_id, user_id, receipt_number, customer_name, payment_method,
                subtotal, vat, total, created_utc
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING receipt_id, user_id, receipt_number, customer_name, payment_method,
                subtotal, vat, total, created_utc
            "#,
        )
        .bind(receipt_id)
        .bind(user_id)
        .bind(&draft.receipt_number)
        .bind(&draft.customer_name)
        .bind(&draft.payment_method)
        .bind(draft.subtotal)
        .bind(draft.vat)
        .bind(draft.total)
        .bind(draft.created_utc)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!(
                    "Receipt number {} already exists",
                    draft.receipt_number
                ))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create receipt: {}", e)),
        })?;

        let mut items = Vec::with_capacity(draft.items.len());
        for (position, item) in draft.items.iter().enumerate() {
            let inserted = sqlx::query_as::<_, ReceiptItem>(
                r#"
                INSERT INTO receipt_items (
                    receipt_item_id, receipt_id, position, description, quantity, price
                )
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING receipt_item_id, receipt_id, position, description, quantity, price
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(receipt_id)
            .bind(position as i32)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.price)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to insert line item: {}", e))
            })?;
            items.push(inserted);
        }

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit receipt: {}", e))
        })?;

        timer.observe_duration();

        info!(
            receipt_id = %receipt.receipt_id,
            receipt_number = %receipt.receipt_number,
            total = %receipt.total,
            "Receipt created"
        );

        Ok(ReceiptWithItems { receipt, items })
    }

    /// List an account's receipts, newest first, with optional search and
    /// creation-day filters.
    #[instrument(skip(self, filter), fields(user_id = %user_id))]
    pub async fn list_receipts(
        &self,
        user_id: Uuid,
        filter: &ListReceiptsFilter,
    ) -> Result<Vec<ReceiptWithItems>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_receipts"])
            .start_timer();

        let receipts = sqlx::query_as::<_, Receipt>(
            r#"
            SELECT receipt_id, user_id, receipt_number, customer_name, payment_method,
                subtotal, vat, total, created_utc
            FROM receipts
            WHERE user_id = $1
              AND ($2::text IS NULL
                   OR customer_name ILIKE '%' || $2 || '%'
                   OR receipt_number ILIKE '%' || $2 || '%')
              AND ($3::date IS NULL
                   OR (created_utc >= $3::date AND created_utc < $3::date + INTERVAL '1 day'))
            ORDER BY created_utc DESC
            "#,
        )
        .bind(user_id)
        .bind(&filter.search)
        .bind(filter.date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list receipts: {}", e)))?;

        let with_items = self.attach_items(receipts).await?;

        timer.observe_duration();

        Ok(with_items)
    }

    /// Public lookup of a shared receipt by its number.
    #[instrument(skip(self), fields(receipt_number = %receipt_number))]
    pub async fn find_receipt_by_number(
        &self,
        receipt_number: &str,
    ) -> Result<Option<ReceiptWithItems>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_receipt_by_number"])
            .start_timer();

        let receipt = sqlx::query_as::<_, Receipt>(
            r#"
            SELECT receipt_id, user_id, receipt_number, customer_name, payment_method,
                subtotal, vat, total, created_utc
            FROM receipts
            WHERE receipt_number = $1
            "#,
        )
        .bind(receipt_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to find receipt: {}", e)))?;

        let result = match receipt {
            Some(receipt) => self.attach_items(vec![receipt]).await?.pop(),
            None => None,
        };

        timer.observe_duration();

        Ok(result)
    }

    /// Fetch line items for a batch of receipts and zip them back onto
    /// their headers, preserving header order.
    async fn attach_items(
        &self,
        receipts: Vec<Receipt>,
    ) -> Result<Vec<ReceiptWithItems>, AppError> {
        if receipts.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = receipts.iter().map(|r| r.receipt_id).collect();
        let items = sqlx::query_as::<_, ReceiptItem>(
            r#"
            SELECT receipt_item_id, receipt_id, position, description, quantity, price
            FROM receipt_items
            WHERE receipt_id = ANY($1)
            ORDER BY receipt_id, position
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to load line items: {}", e))
        })?;

        let mut by_receipt: HashMap<Uuid, Vec<ReceiptItem>> = HashMap::new();
        for item in items {
            by_receipt.entry(item.receipt_id).or_default().push(item);
        }

        Ok(receipts
            .into_iter()
            .map(|receipt| {
                let items = by_receipt.remove(&receipt.receipt_id).unwrap_or_default();
                ReceiptWithItems { receipt, items }
            })
            .collect())
    }
}
