mod rental;
mod vehicle;

use axum::http::HeaderMap;

use kernel::prelude::entity::Operator;

pub use self::{rental::*, vehicle::*};

pub(crate) static OPERATION_CLAIMS_HEADER: &str = "x-operation-claims";

/// Reads the caller's operation claims. A missing or unreadable header yields no claims.
///
/// The header is trusted as given. An upstream gateway must authenticate the caller and set it,
/// stripping any value the client sent.
pub(crate) fn operator(headers: &HeaderMap) -> Operator {
    headers
        .get(OPERATION_CLAIMS_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(Operator::from_claim_list)
        .unwrap_or_default()
}
