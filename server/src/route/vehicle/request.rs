use uuid::Uuid;

use application::transfer::{CloseRentalDto, GetVehicleRentalsDto};

use crate::controller::Intake;

#[derive(Debug)]
pub struct ReturnRequest {
    vehicle_id: Uuid,
}

impl ReturnRequest {
    pub fn new(vehicle_id: Uuid) -> Self {
        Self { vehicle_id }
    }
}

pub struct Transformer;

impl Intake<Uuid> for Transformer {
    type To = GetVehicleRentalsDto;
    fn emit(&self, vehicle_id: Uuid) -> Self::To {
        GetVehicleRentalsDto { vehicle_id }
    }
}

impl Intake<ReturnRequest> for Transformer {
    type To = CloseRentalDto;
    fn emit(&self, input: ReturnRequest) -> Self::To {
        CloseRentalDto {
            vehicle_id: input.vehicle_id,
        }
    }
}
