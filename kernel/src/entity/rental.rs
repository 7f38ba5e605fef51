mod draft;
mod id;
mod rent_date;
mod return_date;

pub use self::{draft::*, id::*, rent_date::*, return_date::*};
use crate::entity::{CustomerId, VehicleId};
use destructure::{Destructure, Mutation};
use serde::{Deserialize, Serialize};
use vodca::References;

#[derive(
    Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References, Destructure, Mutation,
)]
pub struct Rental {
    id: RentalId,
    vehicle_id: VehicleId,
    customer_id: CustomerId,
    rent_date: RentDate,
    return_date: Option<ReturnDate>,
}

impl Rental {
    pub fn new(
        id: RentalId,
        vehicle_id: VehicleId,
        customer_id: CustomerId,
        rent_date: RentDate,
        return_date: Option<ReturnDate>,
    ) -> Self {
        Self {
            id,
            vehicle_id,
            customer_id,
            rent_date,
            return_date,
        }
    }

    /// An open rental has no return date; its vehicle is out.
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }
}
