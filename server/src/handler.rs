use std::ops::Deref;
use std::sync::Arc;

use driver::database::{
    PostgresDatabase, PostgresRentalRepository, RedisDatabase, RedisRentalCache,
};
use kernel::interface::cache::DependOnRentalCache;
use kernel::interface::database::DependOnDatabaseConnection;
use kernel::interface::query::DependOnRentalQuery;
use kernel::interface::update::DependOnRentalModifier;
use kernel::KernelError;

#[derive(Clone)]
pub struct AppModule(Arc<Handler>);

impl AppModule {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        Ok(Self(Arc::new(Handler::init().await?)))
    }
}

impl Deref for AppModule {
    type Target = Handler;
    fn deref(&self) -> &Self::Target {
        Deref::deref(&self.0)
    }
}

pub struct Handler {
    pgpool: PostgresDatabase,
    rental_repository: PostgresRentalRepository,
    rental_cache: RedisRentalCache,
}

impl Handler {
    pub async fn init() -> error_stack::Result<Self, KernelError> {
        let pgpool = PostgresDatabase::new().await?;
        let redis = RedisDatabase::new()?;
        let rental_cache = RedisRentalCache::new(redis)?;

        Ok(Self {
            pgpool,
            rental_repository: PostgresRentalRepository,
            rental_cache,
        })
    }
}

impl DependOnDatabaseConnection for Handler {
    type DatabaseConnection = PostgresDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.pgpool
    }
}

impl DependOnRentalQuery for Handler {
    type RentalQuery = PostgresRentalRepository;
    fn rental_query(&self) -> &Self::RentalQuery {
        &self.rental_repository
    }
}

impl DependOnRentalModifier for Handler {
    type RentalModifier = PostgresRentalRepository;
    fn rental_modifier(&self) -> &Self::RentalModifier {
        &self.rental_repository
    }
}

impl DependOnRentalCache for Handler {
    type RentalCache = RedisRentalCache;
    fn rental_cache(&self) -> &Self::RentalCache {
        &self.rental_cache
    }
}
