use serde::de::DeserializeOwned;
use serde::Serialize;

use kernel::interface::cache::RentalCache;
use kernel::interface::database::DatabaseConnection;
use kernel::prelude::entity::{Rental, RentalId, SelectLimit, SelectOffset};
use kernel::KernelError;

use crate::database::redis::{RedisConnection, RedisDatabase};
use crate::env_or;
use crate::error::ConvertError;

const RENTAL_CACHE_TTL: &str = "RENTAL_CACHE_TTL";
const DEFAULT_TTL_SECONDS: u64 = 3600;
const GENERATION_KEY: &str = "rental-cache:gen";

/// Every entry lives under its own key with its own TTL. Keys embed the generation they were
/// read under, so bumping `rental-cache:gen` orphans older entries until they expire.
pub struct RedisRentalCache {
    db: RedisDatabase,
    ttl: u64,
}

impl RedisRentalCache {
    pub fn new(db: RedisDatabase) -> error_stack::Result<Self, KernelError> {
        let ttl = env_or(RENTAL_CACHE_TTL, DEFAULT_TTL_SECONDS)?;
        Ok(Self { db, ttl })
    }
}

fn single_key(generation: u64, id: &RentalId) -> String {
    format!("rental-cache:{generation}:id:{}", id.as_ref())
}

fn page_key(generation: u64, limit: &SelectLimit, offset: &SelectOffset) -> String {
    format!(
        "rental-cache:{generation}:all:{}:{}",
        limit.as_ref(),
        offset.as_ref()
    )
}

#[async_trait::async_trait]
impl RentalCache for RedisRentalCache {
    async fn generation(&self) -> error_stack::Result<u64, KernelError> {
        let mut con = self.db.transact().await?;
        RedisRentalInternal::generation(&mut con).await
    }

    async fn get(
        &self,
        generation: u64,
        id: &RentalId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        let mut con = self.db.transact().await?;
        RedisRentalInternal::read(&mut con, &single_key(generation, id)).await
    }

    async fn put(&self, generation: u64, rental: &Rental) -> error_stack::Result<(), KernelError> {
        let mut con = self.db.transact().await?;
        let key = single_key(generation, rental.id());
        RedisRentalInternal::write(&mut con, &key, rental, self.ttl).await
    }

    async fn get_all(
        &self,
        generation: u64,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Option<Vec<Rental>>, KernelError> {
        let mut con = self.db.transact().await?;
        RedisRentalInternal::read(&mut con, &page_key(generation, limit, offset)).await
    }

    async fn put_all(
        &self,
        generation: u64,
        limit: &SelectLimit,
        offset: &SelectOffset,
        rentals: &[Rental],
    ) -> error_stack::Result<(), KernelError> {
        let mut con = self.db.transact().await?;
        let key = page_key(generation, limit, offset);
        RedisRentalInternal::write(&mut con, &key, rentals, self.ttl).await
    }

    async fn invalidate(&self) -> error_stack::Result<(), KernelError> {
        let mut con = self.db.transact().await?;
        RedisRentalInternal::next_generation(&mut con).await
    }
}

pub(in crate::database) struct RedisRentalInternal;

impl RedisRentalInternal {
    async fn generation(con: &mut RedisConnection) -> error_stack::Result<u64, KernelError> {
        let generation: Option<u64> = redis::cmd("GET")
            .arg(GENERATION_KEY)
            .query_async(&mut **con)
            .await
            .convert_error()?;
        Ok(generation.unwrap_or_default())
    }

    async fn next_generation(con: &mut RedisConnection) -> error_stack::Result<(), KernelError> {
        redis::cmd("INCR")
            .arg(GENERATION_KEY)
            .query_async::<_, u64>(&mut **con)
            .await
            .convert_error()?;
        Ok(())
    }

    async fn read<T: DeserializeOwned>(
        con: &mut RedisConnection,
        key: &str,
    ) -> error_stack::Result<Option<T>, KernelError> {
        let raw: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut **con)
            .await
            .convert_error()?;
        raw.map(|raw| serde_json::from_str(&raw))
            .transpose()
            .convert_error()
    }

    async fn write<T: Serialize + ?Sized>(
        con: &mut RedisConnection,
        key: &str,
        value: &T,
        ttl: u64,
    ) -> error_stack::Result<(), KernelError> {
        let raw = serde_json::to_string(value).convert_error()?;
        redis::cmd("SET")
            .arg(key)
            .arg(raw)
            .arg("EX")
            .arg(ttl)
            .query_async::<_, ()>(&mut **con)
            .await
            .convert_error()
    }
}
