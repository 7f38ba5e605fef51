use error_stack::Report;
use tracing::warn;

use kernel::interface::cache::RentalCache;
use kernel::interface::database::Transaction;
use kernel::prelude::entity::Operator;
use kernel::KernelError;

pub(crate) static RENTAL_ADD_CLAIM: &str = "rental.add";
pub(crate) static RENTAL_UPDATE_CLAIM: &str = "rental.update";
pub(crate) static RENTAL_DELETE_CLAIM: &str = "rental.delete";

pub(crate) fn authorize(operator: &Operator, claim: &str) -> error_stack::Result<(), KernelError> {
    if operator.permits(claim) {
        Ok(())
    } else {
        Err(Report::new(KernelError::Forbidden).attach_printable(format!("Requires {claim}")))
    }
}

/// Commits on success and rolls back otherwise.
pub(crate) async fn settle<T, C: Transaction>(
    con: C,
    result: error_stack::Result<T, KernelError>,
) -> error_stack::Result<T, KernelError> {
    match result {
        Ok(value) => {
            con.commit().await?;
            Ok(value)
        }
        Err(report) => {
            if let Err(rollback) = con.roll_back().await {
                warn!("Rollback failed: {rollback:?}");
            }
            Err(report)
        }
    }
}

/// Cache failures never fail a write that is already committed.
pub(crate) async fn evict<C: RentalCache>(cache: &C) {
    if let Err(report) = cache.invalidate().await {
        warn!("Failed to invalidate rental cache: {report:?}");
    }
}

/// The cache generation to read and repopulate under. `None` skips the cache.
pub(crate) async fn cache_generation<C: RentalCache>(cache: &C) -> Option<u64> {
    match cache.generation().await {
        Ok(generation) => Some(generation),
        Err(report) => {
            warn!("Rental cache unavailable: {report:?}");
            None
        }
    }
}
