use destructure::Destructure;
use vodca::References;

use crate::entity::{CustomerId, RentDate, VehicleId};

/// A rental that has not been stored yet and therefore has no id.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct RentalDraft {
    vehicle_id: VehicleId,
    customer_id: CustomerId,
    rent_date: RentDate,
}

impl RentalDraft {
    pub fn new(vehicle_id: VehicleId, customer_id: CustomerId, rent_date: RentDate) -> Self {
        Self {
            vehicle_id,
            customer_id,
            rent_date,
        }
    }
}
