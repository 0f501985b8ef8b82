//! PostgreSQL-backed `ClientRepository` implementation using Diesel ORM.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::SortDirection;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ClientRepository, ClientRepositoryError};
use crate::domain::{
    Client, ClientId, ClientListQuery, ClientPatch, ClientSortField, NewClient, ReporterPhone,
};

use super::models::{ClientChangeset, ClientRow, NewClientRow};
use super::password_codec::{PasswordCodec, PlaintextPasswordCodec};
use super::pool::{DbPool, PoolError};
use super::schema::clients;

/// Diesel-backed implementation of the `ClientRepository` port.
#[derive(Clone)]
pub struct DieselClientRepository {
    pool: DbPool,
    codec: Arc<dyn PasswordCodec>,
}

impl DieselClientRepository {
    /// Create a repository storing passwords with [`PlaintextPasswordCodec`].
    pub fn new(pool: DbPool) -> Self {
        Self::with_codec(pool, Arc::new(PlaintextPasswordCodec))
    }

    /// Create a repository with a specific password codec.
    pub fn with_codec(pool: DbPool, codec: Arc<dyn PasswordCodec>) -> Self {
        Self { pool, codec }
    }
}

/// Convert a stored row into a domain record.
///
/// Rows written by other tools may break domain invariants; those surface as
/// query errors rather than panics.
fn row_to_client(
    row: ClientRow,
    codec: &dyn PasswordCodec,
) -> Result<Client, ClientRepositoryError> {
    let id = row.id;
    let invalid = |err: &dyn std::fmt::Display| {
        ClientRepositoryError::query(format!("stored client {id} is invalid: {err}"))
    };
    let reporter_phone = ReporterPhone::new(row.reporter_phone).map_err(|err| invalid(&err))?;
    let password = codec.decode(&row.password).map_err(|err| invalid(&err))?;

    Ok(Client {
        id: ClientId::from(id),
        whatsapp_group_name: row.whatsapp_group_name,
        bid: row.bid,
        uid: row.uid,
        mtc_group_id: row.mtc_group_id,
        reporter_name: row.reporter_name,
        reporter_phone,
        comp_id: row.comp_id,
        user_name: row.user_name,
        password,
        app_guid: row.app_guid,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

/// Map pool errors to client repository errors.
fn map_pool_error(error: PoolError) -> ClientRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ClientRepositoryError::connection(message)
        }
    }
}

/// Loggable description of a Diesel failure.
fn failure_detail(error: &diesel::result::Error) -> String {
    match error {
        diesel::result::Error::DatabaseError(kind, info) => {
            format!("{kind:?}: {}", info.message())
        }
        other => other.to_string(),
    }
}

/// Map Diesel errors to client repository errors.
fn map_diesel_error(error: diesel::result::Error) -> ClientRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    debug!(detail = %failure_detail(&error), "diesel operation failed");

    match error {
        DieselError::NotFound => ClientRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => ClientRepositoryError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ClientRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            ClientRepositoryError::query("client row violates a table constraint")
        }
        _ => ClientRepositoryError::query("database error"),
    }
}

macro_rules! order_by {
    ($query:expr, $column:expr, $direction:expr) => {
        match $direction {
            SortDirection::Asc => $query.order_by($column.asc()),
            SortDirection::Desc => $query.order_by($column.desc()),
        }
    };
}

/// Sorted, unpaginated select over the clients table.
///
/// `id` is always the final sort key so pages are stable across requests.
fn sorted_clients(
    sort_by: ClientSortField,
    direction: SortDirection,
) -> clients::BoxedQuery<'static, Pg> {
    let query = clients::table.into_boxed();
    let query = match sort_by {
        ClientSortField::Id => order_by!(query, clients::id, direction),
        ClientSortField::WhatsappGroupName => {
            order_by!(query, clients::whatsapp_group_name, direction)
        }
        ClientSortField::Bid => order_by!(query, clients::bid, direction),
        ClientSortField::Uid => order_by!(query, clients::uid, direction),
        ClientSortField::MtcGroupId => order_by!(query, clients::mtc_group_id, direction),
        ClientSortField::ReporterName => order_by!(query, clients::reporter_name, direction),
        ClientSortField::ReporterPhone => order_by!(query, clients::reporter_phone, direction),
        ClientSortField::CompId => order_by!(query, clients::comp_id, direction),
        ClientSortField::UserName => order_by!(query, clients::user_name, direction),
        ClientSortField::AppGuid => order_by!(query, clients::app_guid, direction),
        ClientSortField::CreatedAt => order_by!(query, clients::created_at, direction),
        ClientSortField::UpdatedAt => order_by!(query, clients::updated_at, direction),
    };
    query.then_order_by(clients::id.asc())
}

fn page_bounds(query: &ClientListQuery) -> Result<(i64, i64), ClientRepositoryError> {
    let offset = i64::try_from(query.page.offset())
        .map_err(|_| ClientRepositoryError::query("page offset out of range"))?;
    Ok((i64::from(query.page.limit()), offset))
}

fn changeset<'a>(
    patch: &'a ClientPatch,
    password: Option<&'a str>,
    now: DateTime<Utc>,
) -> ClientChangeset<'a> {
    ClientChangeset {
        whatsapp_group_name: patch.whatsapp_group_name.as_deref(),
        bid: patch.bid,
        uid: patch.uid,
        mtc_group_id: patch.mtc_group_id,
        reporter_name: patch.reporter_name.as_deref(),
        reporter_phone: patch.reporter_phone.as_ref().map(AsRef::as_ref),
        comp_id: patch.comp_id.as_deref(),
        user_name: patch.user_name.as_deref(),
        password,
        app_guid: patch.app_guid.as_deref(),
        updated_at: now,
    }
}

#[async_trait]
impl ClientRepository for DieselClientRepository {
    async fn insert(
        &self,
        client: &NewClient,
        now: DateTime<Utc>,
    ) -> Result<Client, ClientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let password = self.codec.encode(&client.password);
        let row = NewClientRow {
            id: Uuid::new_v4(),
            whatsapp_group_name: client.whatsapp_group_name.as_deref(),
            bid: client.bid,
            uid: client.uid,
            mtc_group_id: client.mtc_group_id,
            reporter_name: &client.reporter_name,
            reporter_phone: client.reporter_phone.as_ref(),
            comp_id: &client.comp_id,
            user_name: &client.user_name,
            password: &password,
            app_guid: &client.app_guid,
            created_at: now,
            updated_at: now,
        };

        let stored: ClientRow = diesel::insert_into(clients::table)
            .values(&row)
            .returning(ClientRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_client(stored, self.codec.as_ref())
    }

    async fn find_by_id(&self, id: &ClientId) -> Result<Option<Client>, ClientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ClientRow> = clients::table
            .find(*id.as_uuid())
            .select(ClientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| row_to_client(row, self.codec.as_ref()))
            .transpose()
    }

    async fn find_first_by_group(
        &self,
        whatsapp_group_name: &str,
    ) -> Result<Option<Client>, ClientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ClientRow> = clients::table
            .filter(clients::whatsapp_group_name.eq(whatsapp_group_name))
            .order_by((clients::created_at.asc(), clients::id.asc()))
            .select(ClientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| row_to_client(row, self.codec.as_ref()))
            .transpose()
    }

    async fn update(
        &self,
        id: &ClientId,
        patch: &ClientPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Client>, ClientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let password = patch.password.as_ref().map(|p| self.codec.encode(p));
        let changes = changeset(patch, password.as_deref(), now);

        let row: Option<ClientRow> = diesel::update(clients::table.find(*id.as_uuid()))
            .set(&changes)
            .returning(ClientRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| row_to_client(row, self.codec.as_ref()))
            .transpose()
    }

    async fn delete(&self, id: &ClientId) -> Result<bool, ClientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(clients::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn count(&self) -> Result<u64, ClientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = clients::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        u64::try_from(total).map_err(|_| ClientRepositoryError::query("negative row count"))
    }

    async fn list(&self, query: &ClientListQuery) -> Result<Vec<Client>, ClientRepositoryError> {
        let (limit, offset) = page_bounds(query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ClientRow> = sorted_clients(query.sort_by, query.direction)
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| row_to_client(row, self.codec.as_ref()))
            .collect()
    }
}
