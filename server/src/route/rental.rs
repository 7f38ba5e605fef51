mod request;
mod response;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::Query;

use application::service::{
    AddRentalService, DeleteRentalService, GetRentalService, UpdateRentalService,
};

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;

pub(crate) use self::request::Transformer as RentalTransformer;
pub(crate) use self::response::{
    Presenter as RentalPresenter, WritePresenter as RentalWritePresenter,
};

use self::request::{CreateRequest, GetAllRequest, UpdateRequest};

pub trait RentalRouter {
    fn route_rental(self) -> Self;
}

impl RentalRouter for Router<AppModule> {
    fn route_rental(self) -> Self {
        self.route(
            "/rentals",
            get(
                |State(module): State<AppModule>, Query(req): Query<GetAllRequest>| async move {
                    Controller::new(RentalTransformer, RentalPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.get_all_rentals(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>,
                 headers: HeaderMap,
                 Json(req): Json<CreateRequest>| async move {
                    Controller::new(RentalTransformer, RentalWritePresenter::added())
                        .intake((headers, req))
                        .handle(|(operator, dto)| async move {
                            module.add_rental(&operator, dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/rentals/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<i64>| async move {
                    Controller::new(RentalTransformer, RentalPresenter)
                        .intake(id)
                        .handle(|dto| async move { module.get_rental(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .patch(
                |State(module): State<AppModule>,
                 Path(id): Path<i64>,
                 headers: HeaderMap,
                 Json(req): Json<UpdateRequest>| async move {
                    Controller::new(RentalTransformer, RentalWritePresenter::updated())
                        .intake((headers, id, req))
                        .handle(|(operator, dto)| async move {
                            module.update_rental(&operator, dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>, Path(id): Path<i64>, headers: HeaderMap| async move {
                    Controller::new(RentalTransformer, RentalWritePresenter::deleted())
                        .intake((headers, id))
                        .handle(|(operator, dto)| async move {
                            module.delete_rental(&operator, dto).await
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
