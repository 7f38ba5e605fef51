use error_stack::Report;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use kernel::interface::query::RentalQuery;
use kernel::interface::update::RentalModifier;
use kernel::prelude::entity::{
    CustomerId, RentDate, Rental, RentalDraft, RentalId, ReturnDate, SelectLimit, SelectOffset,
    VehicleId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresConnection;
use crate::error::ConvertError;

pub struct PostgresRentalRepository;

#[async_trait::async_trait]
impl RentalQuery for PostgresRentalRepository {
    type Transaction = PostgresConnection;

    async fn find_by_id(
        &self,
        con: &mut PostgresConnection,
        id: &RentalId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        PgRentalInternal::find_by_id(con, id).await
    }

    async fn find_by_vehicle_id(
        &self,
        con: &mut PostgresConnection,
        vehicle_id: &VehicleId,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        PgRentalInternal::find_by_vehicle_id(con, vehicle_id).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresConnection,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        PgRentalInternal::find_all(con, limit, offset).await
    }
}

#[async_trait::async_trait]
impl RentalModifier for PostgresRentalRepository {
    type Transaction = PostgresConnection;

    async fn create(
        &self,
        con: &mut PostgresConnection,
        draft: &RentalDraft,
    ) -> error_stack::Result<Rental, KernelError> {
        PgRentalInternal::create(con, draft).await
    }

    async fn update(
        &self,
        con: &mut PostgresConnection,
        rental: &Rental,
    ) -> error_stack::Result<(), KernelError> {
        PgRentalInternal::update(con, rental).await
    }

    async fn close(
        &self,
        con: &mut PostgresConnection,
        rental: &Rental,
    ) -> error_stack::Result<(), KernelError> {
        PgRentalInternal::close(con, rental).await
    }

    async fn delete(
        &self,
        con: &mut PostgresConnection,
        id: &RentalId,
    ) -> error_stack::Result<(), KernelError> {
        PgRentalInternal::delete(con, id).await
    }
}

#[derive(sqlx::FromRow)]
struct RentalRow {
    id: i64,
    vehicle_id: Uuid,
    customer_id: Uuid,
    rent_date: OffsetDateTime,
    return_date: Option<OffsetDateTime>,
}

impl From<RentalRow> for Rental {
    fn from(value: RentalRow) -> Self {
        Rental::new(
            RentalId::new(value.id),
            VehicleId::new(value.vehicle_id),
            CustomerId::new(value.customer_id),
            RentDate::new(value.rent_date),
            value.return_date.map(ReturnDate::new),
        )
    }
}

pub(in crate::database) struct PgRentalInternal;

impl PgRentalInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &RentalId,
    ) -> error_stack::Result<Option<Rental>, KernelError> {
        let row = sqlx::query_as::<_, RentalRow>(
            // language=postgresql
            r#"
            SELECT id, vehicle_id, customer_id, rent_date, return_date
            FROM rentals
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Rental::from))
    }

    async fn find_by_vehicle_id(
        con: &mut PgConnection,
        vehicle_id: &VehicleId,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        let rows = sqlx::query_as::<_, RentalRow>(
            // language=postgresql
            r#"
            SELECT id, vehicle_id, customer_id, rent_date, return_date
            FROM rentals
            WHERE vehicle_id = $1
            ORDER BY id
            "#,
        )
        .bind(vehicle_id.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Rental::from).collect())
    }

    async fn find_all(
        con: &mut PgConnection,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<Rental>, KernelError> {
        let rows = sqlx::query_as::<_, RentalRow>(
            // language=postgresql
            r#"
            SELECT id, vehicle_id, customer_id, rent_date, return_date
            FROM rentals
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit.as_ref())
        .bind(offset.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Rental::from).collect())
    }

    /// Fails with [`KernelError::Concurrency`] when the vehicle already has an open rental.
    async fn create(
        con: &mut PgConnection,
        draft: &RentalDraft,
    ) -> error_stack::Result<Rental, KernelError> {
        let row = sqlx::query_as::<_, RentalRow>(
            // language=postgresql
            r#"
            INSERT INTO rentals (vehicle_id, customer_id, rent_date)
            VALUES ($1, $2, $3)
            RETURNING id, vehicle_id, customer_id, rent_date, return_date
            "#,
        )
        .bind(draft.vehicle_id().as_ref())
        .bind(draft.customer_id().as_ref())
        .bind(draft.rent_date().as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(Rental::from(row))
    }

    async fn update(con: &mut PgConnection, rental: &Rental) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            UPDATE rentals
            SET customer_id = $2, rent_date = $3
            WHERE id = $1
            "#,
        )
        .bind(rental.id().as_ref())
        .bind(rental.customer_id().as_ref())
        .bind(rental.rent_date().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn close(con: &mut PgConnection, rental: &Rental) -> error_stack::Result<(), KernelError> {
        let return_date = rental.return_date().as_ref().ok_or_else(|| {
            Report::new(KernelError::Internal)
                .attach_printable(format!("Rental {:?} has no return date", rental.id()))
        })?;
        let result = sqlx::query(
            // language=postgresql
            r#"
            UPDATE rentals
            SET return_date = $2
            WHERE id = $1 AND return_date IS NULL
            "#,
        )
        .bind(rental.id().as_ref())
        .bind(return_date.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Report::new(KernelError::Concurrency)
                .attach_printable(format!("Rental {:?} was closed concurrently", rental.id())));
        }
        Ok(())
    }

    async fn delete(con: &mut PgConnection, id: &RentalId) -> error_stack::Result<(), KernelError> {
        sqlx::query(
            // language=postgresql
            r#"
            DELETE FROM rentals
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}
