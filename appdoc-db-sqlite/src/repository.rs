use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use appdoc_core::{
    Application, ApplicationRepository, ApplicationState, Fund, LegalEntity, Person, Product,
    RepositoryError, Review, ReviewReason,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Map, Value};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use tracing::debug;
use uuid::Uuid;

use crate::decimal::{decimal_to_text, get_decimal};

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Connect to `database_url`, creating the file if it does not exist.
    ///
    /// Accepts sqlx URLs (`sqlite://appdoc.db`), bare paths and `:memory:`.
    /// An in-memory database lives on a single pooled connection, since
    /// every SQLite connection would otherwise see its own empty database.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .create_if_missing(true);

        let in_memory = database_url.contains(":memory:");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Load and execute all SQL seed files from the specified directory.
    /// Files are executed in alphabetical order by filename.
    pub async fn run_seeds(&self, seeds_dir: &Path) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(seeds_dir)
            .with_context(|| format!("Failed to read seeds directory '{}'", seeds_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "sql"))
            .collect();

        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let sql = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read seed file '{}'", path.display()))?;

            sqlx::raw_sql(&sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to execute seed file '{}'", path.display()))?;
            debug!(seed = %path.display(), "applied seed file");
        }

        Ok(())
    }

    /// Insert `application` or replace the stored copy, together with its
    /// products, funds and review, in one transaction.
    pub async fn save_application(&self, application: &Application) -> Result<(), RepositoryError> {
        let id = application.id.to_string();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        for table in ["reviews", "funds", "products", "applications"] {
            let column = if table == "applications" { "id" } else { "application_id" };
            sqlx::query(&format!("DELETE FROM {table} WHERE {column} = ?"))
                .bind(&id)
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::Database(e.to_string()))?;
        }

        let legal_entity = application.legal_entity.as_ref();
        sqlx::query(
            "INSERT INTO applications (
                id, state, reference_number, first_name, surname, applied_on,
                is_legal_entity, legal_entity_name, legal_entity_registration_number
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(application.state.as_str())
        .bind(&application.reference_number)
        .bind(&application.person.first_name)
        .bind(&application.person.surname)
        .bind(application.date)
        .bind(application.is_legal_entity)
        .bind(legal_entity.map(|e| e.name.as_str()))
        .bind(legal_entity.map(|e| e.registration_number.as_str()))
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        for (product_position, product) in application.products.iter().enumerate() {
            let product_position = product_position as i64;
            sqlx::query("INSERT INTO products (application_id, position, name) VALUES (?, ?, ?)")
                .bind(&id)
                .bind(product_position)
                .bind(&product.name)
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::Database(e.to_string()))?;

            for (position, fund) in product.funds.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO funds (application_id, product_position, position, name, amount, fees)
                     VALUES (?, ?, ?, ?, ?, ?)",
                )
                .bind(&id)
                .bind(product_position)
                .bind(position as i64)
                .bind(&fund.name)
                .bind(decimal_to_text(fund.amount))
                .bind(decimal_to_text(fund.fees))
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::Database(e.to_string()))?;
            }
        }

        if let Some(review) = &application.current_review {
            let metadata = serde_json::to_string(&review.metadata)
                .map_err(|e| RepositoryError::Database(e.to_string()))?;
            sqlx::query("INSERT INTO reviews (application_id, reason, metadata) VALUES (?, ?, ?)")
                .bind(&id)
                .bind(review.reason.code())
                .bind(metadata)
                .execute(&mut *tx)
                .await
                .map_err(|e| RepositoryError::Database(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        debug!(application_id = %application.id, "saved application");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn load_products(&self, id: &str) -> Result<Vec<Product>, RepositoryError> {
        let product_rows = sqlx::query(
            "SELECT position, name FROM products WHERE application_id = ? ORDER BY position",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let fund_rows = sqlx::query(
            "SELECT product_position, name, amount, fees FROM funds
             WHERE application_id = ? ORDER BY product_position, position",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        // Both queries are ordered by product position, so each product's
        // funds are the next contiguous run of fund rows.
        let mut fund_rows = fund_rows.iter().peekable();
        let mut products = Vec::with_capacity(product_rows.len());
        for row in &product_rows {
            let position: i64 = get(row, "position")?;
            let mut funds = Vec::new();
            while let Some(fund_row) = fund_rows.peek() {
                let product_position: i64 = get(fund_row, "product_position")?;
                if product_position > position {
                    break;
                }
                if product_position == position {
                    funds.push(row_to_fund(fund_row)?);
                }
                fund_rows.next();
            }
            products.push(Product {
                name: get(row, "name")?,
                funds,
            });
        }
        Ok(products)
    }

    async fn load_review(&self, id: &str) -> Result<Option<Review>, RepositoryError> {
        let row = sqlx::query("SELECT reason, metadata FROM reviews WHERE application_id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let reason: String = get(&row, "reason")?;
        let metadata: String = get(&row, "metadata")?;
        let metadata: Map<String, Value> = serde_json::from_str(&metadata).map_err(|e| {
            RepositoryError::Database(format!("Invalid review metadata: {}", e))
        })?;

        Ok(Some(Review {
            reason: ReviewReason::from(reason),
            metadata,
        }))
    }
}

fn get<'r, T>(row: &'r SqliteRow, column: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column)
        .map_err(|e| RepositoryError::Database(format!("Failed to get {}: {}", column, e)))
}

fn row_to_fund(row: &SqliteRow) -> Result<Fund, RepositoryError> {
    Ok(Fund {
        name: get(row, "name")?,
        amount: get_decimal(row, "amount")?,
        fees: get_decimal(row, "fees")?,
    })
}

fn row_to_application(row: &SqliteRow) -> Result<Application, RepositoryError> {
    let id: String = get(row, "id")?;
    let state: String = get(row, "state")?;
    let legal_entity_name: Option<String> = get(row, "legal_entity_name")?;
    let registration_number: Option<String> = get(row, "legal_entity_registration_number")?;

    Ok(Application {
        id: Uuid::parse_str(&id)
            .map_err(|e| RepositoryError::Database(format!("Invalid application id '{}': {}", id, e)))?,
        state: ApplicationState::parse(&state).ok_or_else(|| {
            RepositoryError::Database(format!("Unknown application state '{}'", state))
        })?,
        reference_number: get(row, "reference_number")?,
        person: Person {
            first_name: get(row, "first_name")?,
            surname: get(row, "surname")?,
        },
        date: get::<NaiveDate>(row, "applied_on")?,
        is_legal_entity: get(row, "is_legal_entity")?,
        legal_entity: legal_entity_name.map(|name| LegalEntity {
            name,
            registration_number: registration_number.unwrap_or_default(),
        }),
        products: Vec::new(),
        current_review: None,
    })
}

#[async_trait]
impl ApplicationRepository for SqliteRepository {
    async fn get_application(&self, id: Uuid) -> Result<Application, RepositoryError> {
        let key = id.to_string();
        let row = sqlx::query(
            "SELECT id, state, reference_number, first_name, surname, applied_on,
                    is_legal_entity, legal_entity_name, legal_entity_registration_number
             FROM applications WHERE id = ?",
        )
        .bind(&key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        let mut application = row_to_application(&row)?;
        application.products = self.load_products(&key).await?;
        application.current_review = self.load_review(&key).await?;
        Ok(application)
    }
}
