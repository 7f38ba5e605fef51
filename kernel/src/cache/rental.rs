use crate::entity::{Rental, RentalId, SelectLimit, SelectOffset};
use crate::KernelError;

/// Read-through cache for rental listings and single rentals.
///
/// Entries are written under a generation. `invalidate` moves the cache to a new generation, so
/// an entry put with a generation captured before a write is never read back after it.
/// Readers capture `generation` before reading storage and pass it to both `get*` and `put*`.
/// A miss is `Ok(None)`.
#[async_trait::async_trait]
pub trait RentalCache: 'static + Sync + Send {
    async fn generation(&self) -> error_stack::Result<u64, KernelError>;
    async fn get(
        &self,
        generation: u64,
        id: &RentalId,
    ) -> error_stack::Result<Option<Rental>, KernelError>;
    async fn put(&self, generation: u64, rental: &Rental) -> error_stack::Result<(), KernelError>;
    async fn get_all(
        &self,
        generation: u64,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Option<Vec<Rental>>, KernelError>;
    async fn put_all(
        &self,
        generation: u64,
        limit: &SelectLimit,
        offset: &SelectOffset,
        rentals: &[Rental],
    ) -> error_stack::Result<(), KernelError>;
    /// Must be called after every committed write.
    async fn invalidate(&self) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnRentalCache: 'static + Sync + Send {
    type RentalCache: RentalCache;
    fn rental_cache(&self) -> &Self::RentalCache;
}
