use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct VehicleId(Uuid);

impl VehicleId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}
