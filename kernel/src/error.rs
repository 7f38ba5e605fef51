use std::fmt::Display;

use error_stack::Context;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum KernelError {
    /// The vehicle already has an open rental.
    VehicleBusy,
    /// The referenced rental does not exist.
    InvalidRecord,
    /// The latest rental of the vehicle is already closed.
    AlreadyClosed,
    /// The vehicle has no rental to act on.
    NotFound,
    /// A concurrent write won the race for the same vehicle.
    Concurrency,
    Forbidden,
    Validation,
    Timeout,
    Internal,
}

impl KernelError {
    /// Whether this failure is a business rule rejection rather than an infrastructure fault.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, KernelError::Timeout | KernelError::Internal)
    }
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::VehicleBusy => write!(f, "Vehicle is currently rented"),
            KernelError::InvalidRecord => write!(f, "Rental record does not exist"),
            KernelError::AlreadyClosed => write!(f, "Rental is already closed"),
            KernelError::NotFound => write!(f, "Vehicle has no rental history"),
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::Forbidden => write!(f, "Operation is not permitted"),
            KernelError::Validation => write!(f, "Invalid input"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}
