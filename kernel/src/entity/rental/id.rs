use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Assigned by storage and strictly increasing in creation order.
#[derive(
    Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, Fromln, AsRefln,
)]
pub struct RentalId(i64);

impl RentalId {
    pub fn new(id: impl Into<i64>) -> Self {
        Self(id.into())
    }
}
