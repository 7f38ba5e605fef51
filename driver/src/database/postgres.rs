mod rental;

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use error_stack::Report;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Error, PgConnection, Pool, Postgres};
use tracing::info;

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::KernelError;

use crate::env;
use crate::error::ConvertError;

pub use self::rental::*;

static POSTGRES_URL: &str = "POSTGRES_URL";

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL)?;
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(5))
            .connect(&url)
            .await
            .convert_error()?;
        migrate(&pool).await?;
        Ok(Self { pool })
    }
}

async fn migrate(pool: &Pool<Postgres>) -> error_stack::Result<(), KernelError> {
    // language=postgresql
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS rentals (
            id          BIGSERIAL PRIMARY KEY,
            vehicle_id  UUID        NOT NULL,
            customer_id UUID        NOT NULL,
            rent_date   TIMESTAMPTZ NOT NULL,
            return_date TIMESTAMPTZ
        )
        "#,
    )
    .execute(pool)
    .await
    .convert_error()?;
    // At most one open rental per vehicle.
    // language=postgresql
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS rentals_open_vehicle
            ON rentals (vehicle_id)
            WHERE return_date IS NULL
        "#,
    )
    .execute(pool)
    .await
    .convert_error()?;
    info!("rentals schema is ready");
    Ok(())
}

#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Transaction = PostgresConnection;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let transaction = self.pool.begin().await.convert_error()?;
        Ok(PostgresConnection(transaction))
    }
}

pub struct PostgresConnection(sqlx::Transaction<'static, Postgres>);

#[async_trait::async_trait]
impl Transaction for PostgresConnection {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0.commit().await.convert_error()
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.0.rollback().await.convert_error()
    }
}

impl Deref for PostgresConnection {
    type Target = PgConnection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PostgresConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> ConvertError for Result<T, Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let context = match &error {
                Error::PoolTimedOut => KernelError::Timeout,
                Error::Database(db) if db.is_unique_violation() => KernelError::Concurrency,
                _ => KernelError::Internal,
            };
            Report::from(error).change_context(context)
        })
    }
}
