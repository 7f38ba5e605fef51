use axum::http::StatusCode;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::{AvailabilityDto, RentalDto};

use crate::controller::Exhaust;
use crate::result::{message, ReasonCode, Replied, UniformResult};

#[derive(Debug, Serialize)]
pub struct RentalResponse {
    id: i64,
    vehicle_id: Uuid,
    customer_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    rent_date: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    return_date: Option<OffsetDateTime>,
}

impl From<RentalDto> for RentalResponse {
    fn from(value: RentalDto) -> Self {
        Self {
            id: value.id,
            vehicle_id: value.vehicle_id,
            customer_id: value.customer_id,
            rent_date: value.rent_date,
            return_date: value.return_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    vehicle_id: Uuid,
    open: bool,
    last_rental_closed: bool,
}

impl From<AvailabilityDto> for AvailabilityResponse {
    fn from(value: AvailabilityDto) -> Self {
        Self {
            vehicle_id: value.vehicle_id,
            open: value.open,
            last_rental_closed: value.last_rental_closed,
        }
    }
}

/// Presents read results.
pub struct Presenter;

impl Exhaust<Vec<RentalDto>> for Presenter {
    type To = Replied<Vec<RentalResponse>>;
    fn emit(&self, input: Vec<RentalDto>) -> Self::To {
        let rentals = input.into_iter().map(RentalResponse::from).collect();
        Replied(
            StatusCode::OK,
            UniformResult::success(message::RENTAL_LISTED, rentals),
        )
    }
}

impl Exhaust<Option<RentalDto>> for Presenter {
    type To = Result<Replied<RentalResponse>, Replied<()>>;
    fn emit(&self, input: Option<RentalDto>) -> Self::To {
        match input {
            Some(rental) => Ok(Replied(
                StatusCode::OK,
                UniformResult::success(message::RENTAL_FOUND, rental.into()),
            )),
            None => {
                let reason = ReasonCode::InvalidRecord;
                Err(Replied(reason.status(), UniformResult::failure(reason)))
            }
        }
    }
}

impl Exhaust<AvailabilityDto> for Presenter {
    type To = Replied<AvailabilityResponse>;
    fn emit(&self, input: AvailabilityDto) -> Self::To {
        Replied(
            StatusCode::OK,
            UniformResult::success(message::VEHICLE_AVAILABILITY, input.into()),
        )
    }
}

/// Presents the outcome of a write with its own status and message key.
pub struct WritePresenter {
    status: StatusCode,
    message: &'static str,
}

impl WritePresenter {
    pub fn added() -> Self {
        Self {
            status: StatusCode::CREATED,
            message: message::RENTAL_ADDED,
        }
    }

    pub fn updated() -> Self {
        Self {
            status: StatusCode::OK,
            message: message::RENTAL_UPDATED,
        }
    }

    pub fn deleted() -> Self {
        Self {
            status: StatusCode::OK,
            message: message::RENTAL_DELETED,
        }
    }

    pub fn closed() -> Self {
        Self {
            status: StatusCode::OK,
            message: message::RENTAL_CLOSED,
        }
    }
}

impl Exhaust<RentalDto> for WritePresenter {
    type To = Replied<RentalResponse>;
    fn emit(&self, input: RentalDto) -> Self::To {
        Replied(self.status, UniformResult::success(self.message, input.into()))
    }
}

impl Exhaust<()> for WritePresenter {
    type To = Replied<()>;
    fn emit(&self, _: ()) -> Self::To {
        Replied(self.status, UniformResult::done(self.message))
    }
}

#[cfg(test)]
mod test {
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use serde_json::Value;
    use time::macros::datetime;
    use uuid::Uuid;

    use application::transfer::RentalDto;

    use crate::controller::Exhaust;
    use crate::route::rental::response::{Presenter, WritePresenter};

    fn dto() -> RentalDto {
        RentalDto {
            id: 3,
            vehicle_id: Uuid::nil(),
            customer_id: Uuid::nil(),
            rent_date: datetime!(2024-06-01 08:30 UTC),
            return_date: None,
        }
    }

    async fn body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn added_rental_is_created() {
        let response = WritePresenter::added().emit(dto()).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body(response).await;
        assert_eq!(body["success"], true);
        assert!(body["reason_code"].is_null());
        assert_eq!(body["message"], "rental.added");
        assert_eq!(body["payload"]["id"], 3);
        assert_eq!(body["payload"]["rent_date"], "2024-06-01T08:30:00Z");
        assert!(body["payload"]["return_date"].is_null());
    }

    #[tokio::test]
    async fn missing_rental_is_reported() {
        let response = Presenter.emit(None::<RentalDto>).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["reason_code"], "InvalidRecord");
    }
}
