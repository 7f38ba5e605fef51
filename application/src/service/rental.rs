use std::time::{Duration, Instant};

use error_stack::{Report, ResultExt};
use tracing::{debug, warn};

use kernel::interface::cache::{DependOnRentalCache, RentalCache};
use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::query::{DependOnRentalQuery, RentalQuery};
use kernel::interface::update::{DependOnRentalModifier, RentalModifier};
use kernel::prelude::entity::{
    CustomerId, Operator, RentDate, Rental, RentalDraft, RentalId, ReturnDate, VehicleId,
};
use kernel::prelude::rule::{check_deletable, check_rent_period, RentalHistory};
use kernel::KernelError;

use crate::service::pipeline::{
    authorize, cache_generation, evict, settle, RENTAL_ADD_CLAIM, RENTAL_DELETE_CLAIM,
    RENTAL_UPDATE_CLAIM,
};
use crate::transfer::{
    AvailabilityDto, CloseRentalDto, CreateRentalDto, DeleteRentalDto, GetAllRentalDto,
    GetRentalDto, GetVehicleRentalsDto, RentalDto, UpdateRentalDto,
};

const SLOW_QUERY: Duration = Duration::from_secs(5);

#[async_trait::async_trait]
pub trait GetRentalService:
    'static + Sync + Send + DependOnRentalQuery + DependOnRentalCache
{
    #[tracing::instrument(skip(self))]
    async fn get_all_rentals(
        &self,
        dto: GetAllRentalDto,
    ) -> error_stack::Result<Vec<RentalDto>, KernelError> {
        dto.validate()?;
        let GetAllRentalDto { limit, offset } = dto;
        let generation = cache_generation(self.rental_cache()).await;
        if let Some(generation) = generation {
            match self.rental_cache().get_all(generation, &limit, &offset).await {
                Ok(Some(rentals)) => return Ok(rentals.into_iter().map(RentalDto::from).collect()),
                Ok(None) => {}
                Err(report) => warn!("Rental cache unavailable: {report:?}"),
            }
        }

        let mut connection = self.database_connection().transact().await?;
        let rentals = self
            .rental_query()
            .find_all(&mut connection, &limit, &offset)
            .await?;

        if let Some(generation) = generation {
            if let Err(report) = self
                .rental_cache()
                .put_all(generation, &limit, &offset, &rentals)
                .await
            {
                warn!("Failed to cache rentals: {report:?}");
            }
        }
        Ok(rentals.into_iter().map(RentalDto::from).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn get_rental(
        &self,
        dto: GetRentalDto,
    ) -> error_stack::Result<Option<RentalDto>, KernelError> {
        let started = Instant::now();
        let id = RentalId::new(dto.id);
        let generation = cache_generation(self.rental_cache()).await;

        let cached = match generation {
            Some(generation) => match self.rental_cache().get(generation, &id).await {
                Ok(cached) => cached,
                Err(report) => {
                    warn!("Rental cache unavailable: {report:?}");
                    None
                }
            },
            None => None,
        };
        let rental = match cached {
            Some(rental) => Some(rental),
            None => {
                let mut connection = self.database_connection().transact().await?;
                let rental = self.rental_query().find_by_id(&mut connection, &id).await?;
                if let (Some(rental), Some(generation)) = (&rental, generation) {
                    if let Err(report) = self.rental_cache().put(generation, rental).await {
                        warn!("Failed to cache rental: {report:?}");
                    }
                }
                rental
            }
        };

        let elapsed = started.elapsed();
        if elapsed > SLOW_QUERY {
            warn!("Fetching rental {id:?} took {elapsed:?}");
        }
        Ok(rental.map(RentalDto::from))
    }

    #[tracing::instrument(skip(self))]
    async fn get_vehicle_rentals(
        &self,
        dto: GetVehicleRentalsDto,
    ) -> error_stack::Result<Vec<RentalDto>, KernelError> {
        let history = load_history(self, dto.vehicle_id).await?;
        Ok(history
            .into_rentals()
            .into_iter()
            .map(RentalDto::from)
            .collect())
    }
}

impl<T> GetRentalService for T where T: DependOnRentalQuery + DependOnRentalCache {}

#[async_trait::async_trait]
pub trait VehicleAvailabilityService: 'static + Sync + Send + DependOnRentalQuery {
    /// True while any rental of the vehicle is open.
    #[tracing::instrument(skip(self))]
    async fn is_vehicle_currently_open(
        &self,
        dto: GetVehicleRentalsDto,
    ) -> error_stack::Result<bool, KernelError> {
        let history = load_history(self, dto.vehicle_id).await?;
        Ok(history.is_vehicle_currently_open())
    }

    /// Succeeds when the vehicle's latest rental is closed or it has none.
    #[tracing::instrument(skip(self))]
    async fn check_last_rental_closed(
        &self,
        dto: GetVehicleRentalsDto,
    ) -> error_stack::Result<(), KernelError> {
        let history = load_history(self, dto.vehicle_id).await?;
        history.check_last_rental_closed()
    }

    #[tracing::instrument(skip(self))]
    async fn get_availability(
        &self,
        dto: GetVehicleRentalsDto,
    ) -> error_stack::Result<AvailabilityDto, KernelError> {
        let history = load_history(self, dto.vehicle_id).await?;
        Ok(AvailabilityDto {
            vehicle_id: dto.vehicle_id,
            open: history.is_vehicle_currently_open(),
            last_rental_closed: history.check_last_rental_closed().is_ok(),
        })
    }
}

impl<T> VehicleAvailabilityService for T where T: DependOnRentalQuery {}

#[async_trait::async_trait]
pub trait AddRentalService:
    'static + Sync + Send + DependOnRentalQuery + DependOnRentalModifier + DependOnRentalCache
{
    #[tracing::instrument(skip(self))]
    async fn add_rental(
        &self,
        operator: &Operator,
        dto: CreateRentalDto,
    ) -> error_stack::Result<RentalDto, KernelError> {
        authorize(operator, RENTAL_ADD_CLAIM)?;
        let draft = RentalDraft::try_from(dto)?;

        let mut connection = self.database_connection().transact().await?;
        let result: error_stack::Result<Rental, KernelError> = async {
            let rentals = self
                .rental_query()
                .find_by_vehicle_id(&mut connection, draft.vehicle_id())
                .await?;
            RentalHistory::new(draft.vehicle_id().clone(), rentals).check_add_eligible()?;
            self.rental_modifier().create(&mut connection, &draft).await
        }
        .await;
        let rental = settle(connection, result)
            .await
            .map_err(|report| {
                debug!("Rental rejected: {report:?}");
                report
            })?;

        evict(self.rental_cache()).await;
        Ok(RentalDto::from(rental))
    }
}

impl<T> AddRentalService for T where
    T: DependOnRentalQuery + DependOnRentalModifier + DependOnRentalCache
{
}

#[async_trait::async_trait]
pub trait UpdateRentalService:
    'static + Sync + Send + DependOnRentalQuery + DependOnRentalModifier + DependOnRentalCache
{
    /// Rewrites the passthrough fields only. The vehicle and return date stay as stored.
    #[tracing::instrument(skip(self))]
    async fn update_rental(
        &self,
        operator: &Operator,
        dto: UpdateRentalDto,
    ) -> error_stack::Result<RentalDto, KernelError> {
        authorize(operator, RENTAL_UPDATE_CLAIM)?;
        dto.validate()?;

        let id = RentalId::new(dto.id);
        let mut connection = self.database_connection().transact().await?;
        let result: error_stack::Result<Rental, KernelError> = async {
            let mut rental = self
                .rental_query()
                .find_by_id(&mut connection, &id)
                .await?
                .ok_or_else(|| {
                    Report::new(KernelError::InvalidRecord)
                        .attach_printable(format!("Rental {id:?} does not exist"))
                })?;
            rental.substitute(|rental| {
                if let Some(customer_id) = dto.customer_id {
                    *rental.customer_id = CustomerId::new(customer_id);
                }
                if let Some(rent_date) = dto.rent_date {
                    *rental.rent_date = RentDate::new(rent_date);
                }
            });
            check_rent_period(&rental)?;
            self.rental_modifier().update(&mut connection, &rental).await?;
            Ok(rental)
        }
        .await;
        let rental = settle(connection, result)
            .await
            .map_err(|report| {
                debug!("Update rejected: {report:?}");
                report
            })?;

        evict(self.rental_cache()).await;
        Ok(RentalDto::from(rental))
    }
}

impl<T> UpdateRentalService for T where
    T: DependOnRentalQuery + DependOnRentalModifier + DependOnRentalCache
{
}

#[async_trait::async_trait]
pub trait DeleteRentalService:
    'static + Sync + Send + DependOnRentalQuery + DependOnRentalModifier + DependOnRentalCache
{
    #[tracing::instrument(skip(self))]
    async fn delete_rental(
        &self,
        operator: &Operator,
        dto: DeleteRentalDto,
    ) -> error_stack::Result<(), KernelError> {
        authorize(operator, RENTAL_DELETE_CLAIM)?;

        let id = RentalId::new(dto.id);
        let mut connection = self.database_connection().transact().await?;
        let result: error_stack::Result<(), KernelError> = async {
            let rental = self.rental_query().find_by_id(&mut connection, &id).await?;
            check_deletable(rental.as_ref())
                .attach_printable_lazy(|| format!("Deleting rental {id:?}"))?;
            self.rental_modifier().delete(&mut connection, &id).await
        }
        .await;
        settle(connection, result)
            .await
            .map_err(|report| {
                debug!("Deletion rejected: {report:?}");
                report
            })?;

        evict(self.rental_cache()).await;
        Ok(())
    }
}

impl<T> DeleteRentalService for T where
    T: DependOnRentalQuery + DependOnRentalModifier + DependOnRentalCache
{
}

#[async_trait::async_trait]
pub trait CloseRentalService:
    'static + Sync + Send + DependOnRentalQuery + DependOnRentalModifier + DependOnRentalCache
{
    /// Returns the vehicle: closes its most recent rental.
    #[tracing::instrument(skip(self))]
    async fn close_rental(&self, dto: CloseRentalDto) -> error_stack::Result<RentalDto, KernelError> {
        let vehicle_id = VehicleId::new(dto.vehicle_id);
        let mut connection = self.database_connection().transact().await?;
        let result: error_stack::Result<Rental, KernelError> = async {
            let rentals = self
                .rental_query()
                .find_by_vehicle_id(&mut connection, &vehicle_id)
                .await?;
            let closed =
                RentalHistory::new(vehicle_id.clone(), rentals).close_latest(ReturnDate::now())?;
            self.rental_modifier().close(&mut connection, &closed).await?;
            Ok(closed)
        }
        .await;
        let rental = settle(connection, result)
            .await
            .map_err(|report| {
                debug!("Return rejected: {report:?}");
                report
            })?;

        evict(self.rental_cache()).await;
        Ok(RentalDto::from(rental))
    }
}

impl<T> CloseRentalService for T where
    T: DependOnRentalQuery + DependOnRentalModifier + DependOnRentalCache
{
}

async fn load_history<T>(
    module: &T,
    vehicle_id: uuid::Uuid,
) -> error_stack::Result<RentalHistory, KernelError>
where
    T: DependOnRentalQuery + ?Sized,
{
    let vehicle_id = VehicleId::new(vehicle_id);
    let mut connection = module.database_connection().transact().await?;
    let rentals = module
        .rental_query()
        .find_by_vehicle_id(&mut connection, &vehicle_id)
        .await?;
    Ok(RentalHistory::new(vehicle_id, rentals))
}
