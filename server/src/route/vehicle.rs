mod request;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Router;
use uuid::Uuid;

use application::service::{CloseRentalService, GetRentalService, VehicleAvailabilityService};

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::route::rental::{RentalPresenter, RentalWritePresenter};

use self::request::{ReturnRequest, Transformer as VehicleTransformer};

pub trait VehicleRouter {
    fn route_vehicle(self) -> Self;
}

impl VehicleRouter for Router<AppModule> {
    fn route_vehicle(self) -> Self {
        self.route(
            "/vehicles/:id/rentals",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(VehicleTransformer, RentalPresenter)
                        .intake(id)
                        .handle(|dto| async move { module.get_vehicle_rentals(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/vehicles/:id/availability",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(VehicleTransformer, RentalPresenter)
                        .intake(id)
                        .handle(|dto| async move { module.get_availability(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/vehicles/:id/return",
            post(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(VehicleTransformer, RentalWritePresenter::closed())
                        .intake(ReturnRequest::new(id))
                        .handle(|dto| async move { module.close_rental(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
