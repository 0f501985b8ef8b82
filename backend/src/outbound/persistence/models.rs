//! Internal Diesel row structs for the `clients` table.
//!
//! These types never leave the persistence layer; the repository converts
//! them to and from domain records.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::clients;

/// Row struct for reading from the clients table.
///
/// Field order matches the table definition so whole-table loads work
/// without an explicit select.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = clients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ClientRow {
    pub id: Uuid,
    pub whatsapp_group_name: Option<String>,
    pub bid: i64,
    pub uid: i64,
    pub mtc_group_id: i64,
    pub reporter_name: String,
    pub reporter_phone: String,
    pub comp_id: String,
    pub user_name: String,
    pub password: String,
    pub app_guid: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for new client records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = clients)]
pub(crate) struct NewClientRow<'a> {
    pub id: Uuid,
    pub whatsapp_group_name: Option<&'a str>,
    pub bid: i64,
    pub uid: i64,
    pub mtc_group_id: i64,
    pub reporter_name: &'a str,
    pub reporter_phone: &'a str,
    pub comp_id: &'a str,
    pub user_name: &'a str,
    pub password: &'a str,
    pub app_guid: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for partial updates. `None` fields are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = clients)]
pub(crate) struct ClientChangeset<'a> {
    pub whatsapp_group_name: Option<&'a str>,
    pub bid: Option<i64>,
    pub uid: Option<i64>,
    pub mtc_group_id: Option<i64>,
    pub reporter_name: Option<&'a str>,
    pub reporter_phone: Option<&'a str>,
    pub comp_id: Option<&'a str>,
    pub user_name: Option<&'a str>,
    pub password: Option<&'a str>,
    pub app_guid: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}
