use error_stack::Report;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::prelude::entity::{
    CustomerId, DestructRental, RentDate, Rental, RentalDraft, SelectLimit, SelectOffset,
    VehicleId,
};
use kernel::KernelError;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RentalDto {
    pub id: i64,
    pub vehicle_id: Uuid,
    pub customer_id: Uuid,
    pub rent_date: OffsetDateTime,
    pub return_date: Option<OffsetDateTime>,
}

impl From<Rental> for RentalDto {
    fn from(value: Rental) -> Self {
        let DestructRental {
            id,
            vehicle_id,
            customer_id,
            rent_date,
            return_date,
        } = value.into_destruct();
        Self {
            id: id.into(),
            vehicle_id: vehicle_id.into(),
            customer_id: customer_id.into(),
            rent_date: rent_date.into(),
            return_date: return_date.map(OffsetDateTime::from),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct AvailabilityDto {
    pub vehicle_id: Uuid,
    pub open: bool,
    pub last_rental_closed: bool,
}

#[derive(Debug)]
pub struct GetAllRentalDto {
    pub limit: SelectLimit,
    pub offset: SelectOffset,
}

impl GetAllRentalDto {
    pub(crate) fn validate(&self) -> error_stack::Result<(), KernelError> {
        if *self.limit.as_ref() < 0 || *self.offset.as_ref() < 0 {
            return Err(Report::new(KernelError::Validation).attach_printable(format!(
                "limit and offset must not be negative: {self:?}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct GetRentalDto {
    pub id: i64,
}

#[derive(Debug)]
pub struct GetVehicleRentalsDto {
    pub vehicle_id: Uuid,
}

#[derive(Debug)]
pub struct CreateRentalDto {
    pub vehicle_id: Uuid,
    pub customer_id: Uuid,
    /// Defaults to now.
    pub rent_date: Option<OffsetDateTime>,
}

impl TryFrom<CreateRentalDto> for RentalDraft {
    type Error = Report<KernelError>;
    fn try_from(value: CreateRentalDto) -> Result<Self, Self::Error> {
        if value.vehicle_id.is_nil() {
            return Err(
                Report::new(KernelError::Validation).attach_printable("vehicle_id must be set")
            );
        }
        if value.customer_id.is_nil() {
            return Err(
                Report::new(KernelError::Validation).attach_printable("customer_id must be set")
            );
        }
        Ok(RentalDraft::new(
            VehicleId::new(value.vehicle_id),
            CustomerId::new(value.customer_id),
            value.rent_date.map_or_else(RentDate::now, RentDate::new),
        ))
    }
}

#[derive(Debug)]
pub struct UpdateRentalDto {
    pub id: i64,
    pub customer_id: Option<Uuid>,
    pub rent_date: Option<OffsetDateTime>,
}

impl UpdateRentalDto {
    pub(crate) fn validate(&self) -> error_stack::Result<(), KernelError> {
        match self.customer_id {
            Some(customer_id) if customer_id.is_nil() => Err(Report::new(KernelError::Validation)
                .attach_printable("customer_id must not be nil")),
            _ => Ok(()),
        }
    }
}

#[derive(Debug)]
pub struct DeleteRentalDto {
    pub id: i64,
}

#[derive(Debug)]
pub struct CloseRentalDto {
    pub vehicle_id: Uuid,
}
