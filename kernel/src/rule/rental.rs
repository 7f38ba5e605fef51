//! Availability and state-transition rules for rentals.
//!
//! Every check here is pure: it inspects a vehicle's history and either accepts the
//! requested transition or rejects it with a [`KernelError`]. Persisting the outcome is left
//! to the caller.

use error_stack::Report;
use time::OffsetDateTime;

use crate::entity::{Rental, ReturnDate, VehicleId};
use crate::KernelError;

/// All rentals of one vehicle, ordered by creation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RentalHistory {
    vehicle_id: VehicleId,
    rentals: Vec<Rental>,
}

impl RentalHistory {
    /// Rentals of other vehicles are dropped and the rest ordered by id, so the result does
    /// not depend on the order storage returned them in.
    pub fn new(vehicle_id: VehicleId, rentals: Vec<Rental>) -> Self {
        let mut rentals = rentals
            .into_iter()
            .filter(|rental| rental.vehicle_id() == &vehicle_id)
            .collect::<Vec<_>>();
        rentals.sort_by_key(|rental| *rental.id());
        Self {
            vehicle_id,
            rentals,
        }
    }

    pub fn vehicle_id(&self) -> &VehicleId {
        &self.vehicle_id
    }

    pub fn rentals(&self) -> &[Rental] {
        &self.rentals
    }

    pub fn into_rentals(self) -> Vec<Rental> {
        self.rentals
    }

    pub fn is_empty(&self) -> bool {
        self.rentals.is_empty()
    }

    /// The most recently created rental, if any.
    pub fn latest(&self) -> Option<&Rental> {
        self.rentals.last()
    }

    pub fn is_vehicle_currently_open(&self) -> bool {
        self.rentals.iter().any(Rental::is_open)
    }

    /// Looks at the latest rental only. An empty history passes.
    pub fn check_last_rental_closed(&self) -> error_stack::Result<(), KernelError> {
        match self.latest() {
            Some(rental) if rental.is_open() => Err(Report::new(KernelError::VehicleBusy)
                .attach_printable(format!(
                    "Latest rental {:?} of vehicle {:?} is still open",
                    rental.id(),
                    self.vehicle_id
                ))),
            _ => Ok(()),
        }
    }

    /// A new rental may start only while no rental of the vehicle is open.
    pub fn check_add_eligible(&self) -> error_stack::Result<(), KernelError> {
        match self.rentals.iter().find(|rental| rental.is_open()) {
            Some(open) => Err(Report::new(KernelError::VehicleBusy).attach_printable(format!(
                "Vehicle {:?} is out on rental {:?}",
                self.vehicle_id,
                open.id()
            ))),
            None => Ok(()),
        }
    }

    /// Returns the latest rental closed at `at`. Earlier rentals are never touched.
    pub fn close_latest(&self, at: ReturnDate) -> error_stack::Result<Rental, KernelError> {
        let latest = self.latest().ok_or_else(|| {
            Report::new(KernelError::NotFound).attach_printable(format!(
                "Vehicle {:?} has never been rented",
                self.vehicle_id
            ))
        })?;
        if !latest.is_open() {
            return Err(Report::new(KernelError::AlreadyClosed).attach_printable(format!(
                "Latest rental {:?} of vehicle {:?} is already returned",
                latest.id(),
                self.vehicle_id
            )));
        }
        let mut closed = latest.clone();
        closed.substitute(|rental| *rental.return_date = Some(at));
        Ok(closed)
    }
}

/// Only an existing, closed rental may be deleted.
pub fn check_deletable(rental: Option<&Rental>) -> error_stack::Result<&Rental, KernelError> {
    let rental = rental.ok_or_else(|| Report::new(KernelError::InvalidRecord))?;
    if rental.is_open() {
        return Err(Report::new(KernelError::VehicleBusy).attach_printable(format!(
            "Rental {:?} is still open and cannot be deleted",
            rental.id()
        )));
    }
    Ok(rental)
}

/// A returned rental cannot have started after its return.
pub fn check_rent_period(rental: &Rental) -> error_stack::Result<(), KernelError> {
    match rental.return_date() {
        Some(returned)
            if OffsetDateTime::from(rental.rent_date().clone())
                > OffsetDateTime::from(returned.clone()) =>
        {
            Err(Report::new(KernelError::Validation).attach_printable(format!(
                "Rental {:?} would start after its return",
                rental.id()
            )))
        }
        _ => Ok(()),
    }
}
