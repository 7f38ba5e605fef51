use axum::http::HeaderMap;
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::{
    CreateRentalDto, DeleteRentalDto, GetAllRentalDto, GetRentalDto, UpdateRentalDto,
};
use kernel::prelude::entity::{Operator, SelectLimit, SelectOffset};

use crate::controller::Intake;
use crate::route::operator;

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    vehicle_id: Uuid,
    customer_id: Uuid,
    #[serde(default, with = "time::serde::rfc3339::option")]
    rent_date: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    customer_id: Option<Uuid>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    rent_date: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct GetAllRequest {
    #[serde(default)]
    limit: SelectLimit,
    #[serde(default)]
    offset: SelectOffset,
}

pub struct Transformer;

impl Intake<GetAllRequest> for Transformer {
    type To = GetAllRentalDto;
    fn emit(&self, input: GetAllRequest) -> Self::To {
        GetAllRentalDto {
            limit: input.limit,
            offset: input.offset,
        }
    }
}

impl Intake<i64> for Transformer {
    type To = GetRentalDto;
    fn emit(&self, id: i64) -> Self::To {
        GetRentalDto { id }
    }
}

impl Intake<(HeaderMap, CreateRequest)> for Transformer {
    type To = (Operator, CreateRentalDto);
    fn emit(&self, (headers, input): (HeaderMap, CreateRequest)) -> Self::To {
        (
            operator(&headers),
            CreateRentalDto {
                vehicle_id: input.vehicle_id,
                customer_id: input.customer_id,
                rent_date: input.rent_date,
            },
        )
    }
}

impl Intake<(HeaderMap, i64, UpdateRequest)> for Transformer {
    type To = (Operator, UpdateRentalDto);
    fn emit(&self, (headers, id, input): (HeaderMap, i64, UpdateRequest)) -> Self::To {
        (
            operator(&headers),
            UpdateRentalDto {
                id,
                customer_id: input.customer_id,
                rent_date: input.rent_date,
            },
        )
    }
}

impl Intake<(HeaderMap, i64)> for Transformer {
    type To = (Operator, DeleteRentalDto);
    fn emit(&self, (headers, id): (HeaderMap, i64)) -> Self::To {
        (operator(&headers), DeleteRentalDto { id })
    }
}

#[cfg(test)]
mod test {
    use axum::http::{HeaderMap, HeaderValue};
    use uuid::Uuid;

    use crate::controller::Intake;
    use crate::route::rental::request::{CreateRequest, GetAllRequest, Transformer};

    #[test]
    fn paging_defaults() {
        let request: GetAllRequest = serde_json::from_str("{}").unwrap();
        let dto = Transformer.emit(request);
        assert_eq!(dto.limit.as_ref(), &30);
        assert_eq!(dto.offset.as_ref(), &0);
    }

    #[test]
    fn create_carries_claims_and_optional_date() {
        let vehicle_id = Uuid::new_v4();
        let customer_id = Uuid::new_v4();
        let request: CreateRequest = serde_json::from_value(serde_json::json!({
            "vehicle_id": vehicle_id,
            "customer_id": customer_id,
        }))
        .unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-operation-claims", HeaderValue::from_static("admin"));

        let (operator, dto) = Transformer.emit((headers, request));
        assert!(operator.permits("rental.add"));
        assert_eq!(dto.vehicle_id, vehicle_id);
        assert_eq!(dto.customer_id, customer_id);
        assert!(dto.rent_date.is_none());
    }
}
