mod common;
mod customer;
mod operator;
mod rental;
mod vehicle;

pub use self::{common::*, customer::*, operator::*, rental::*, vehicle::*};
