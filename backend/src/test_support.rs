//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`).
//!
//! Compiled for `cfg(test)` and behind the `test-support` feature.

use std::cmp::Ordering;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use pagination::SortDirection;

use crate::domain::ports::{ClientRepository, ClientRepositoryError};
use crate::domain::{
    Client, ClientId, ClientListQuery, ClientPatch, ClientSortField, NewClient,
};

/// Clock whose reading only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// In-memory [`ClientRepository`] with the same ordering rules as the
/// PostgreSQL adapter: nulls sort last ascending and first descending, and
/// ties fall back to ascending id.
#[derive(Default)]
pub struct InMemoryClientRepository {
    records: Mutex<Vec<Client>>,
    unavailable: Mutex<bool>,
}

impl InMemoryClientRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a connection error.
    pub fn set_unavailable(&self, unavailable: bool) {
        *lock(&self.unavailable) = unavailable;
    }

    /// Snapshot of every stored record in insertion order.
    pub fn records(&self) -> Vec<Client> {
        lock(&self.records).clone()
    }

    fn guard(&self) -> Result<MutexGuard<'_, Vec<Client>>, ClientRepositoryError> {
        if *lock(&self.unavailable) {
            return Err(ClientRepositoryError::connection("in-memory store offline"));
        }
        Ok(lock(&self.records))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn nullable<T: Ord>(left: Option<&T>, right: Option<&T>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.cmp(right),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}

fn compare_field(field: ClientSortField, left: &Client, right: &Client) -> Ordering {
    match field {
        ClientSortField::Id => left.id.cmp(&right.id),
        ClientSortField::WhatsappGroupName => nullable(
            left.whatsapp_group_name.as_ref(),
            right.whatsapp_group_name.as_ref(),
        ),
        ClientSortField::Bid => left.bid.cmp(&right.bid),
        ClientSortField::Uid => left.uid.cmp(&right.uid),
        ClientSortField::MtcGroupId => left.mtc_group_id.cmp(&right.mtc_group_id),
        ClientSortField::ReporterName => left.reporter_name.cmp(&right.reporter_name),
        ClientSortField::ReporterPhone => {
            AsRef::<str>::as_ref(&left.reporter_phone).cmp(right.reporter_phone.as_ref())
        }
        ClientSortField::CompId => left.comp_id.cmp(&right.comp_id),
        ClientSortField::UserName => left.user_name.cmp(&right.user_name),
        ClientSortField::AppGuid => left.app_guid.cmp(&right.app_guid),
        ClientSortField::CreatedAt => left.created_at.cmp(&right.created_at),
        ClientSortField::UpdatedAt => left.updated_at.cmp(&right.updated_at),
    }
}

fn ordered(query: &ClientListQuery, left: &Client, right: &Client) -> Ordering {
    let primary = compare_field(query.sort_by, left, right);
    let primary = match query.direction {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    };
    primary.then_with(|| left.id.cmp(&right.id))
}

#[async_trait]
impl ClientRepository for InMemoryClientRepository {
    async fn insert(
        &self,
        client: &NewClient,
        now: DateTime<Utc>,
    ) -> Result<Client, ClientRepositoryError> {
        let mut records = self.guard()?;
        let stored = Client::from_new(ClientId::random(), client.clone(), now);
        records.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: &ClientId) -> Result<Option<Client>, ClientRepositoryError> {
        let records = self.guard()?;
        Ok(records.iter().find(|client| &client.id == id).cloned())
    }

    async fn find_first_by_group(
        &self,
        whatsapp_group_name: &str,
    ) -> Result<Option<Client>, ClientRepositoryError> {
        let records = self.guard()?;
        Ok(records
            .iter()
            .filter(|client| client.whatsapp_group_name.as_deref() == Some(whatsapp_group_name))
            .min_by(|left, right| {
                left.created_at
                    .cmp(&right.created_at)
                    .then_with(|| left.id.cmp(&right.id))
            })
            .cloned())
    }

    async fn update(
        &self,
        id: &ClientId,
        patch: &ClientPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Client>, ClientRepositoryError> {
        let mut records = self.guard()?;
        Ok(records
            .iter_mut()
            .find(|client| &client.id == id)
            .map(|client| {
                client.apply(patch, now);
                client.clone()
            }))
    }

    async fn delete(&self, id: &ClientId) -> Result<bool, ClientRepositoryError> {
        let mut records = self.guard()?;
        let before = records.len();
        records.retain(|client| &client.id != id);
        Ok(records.len() != before)
    }

    async fn count(&self) -> Result<u64, ClientRepositoryError> {
        let records = self.guard()?;
        Ok(records.len() as u64)
    }

    async fn list(&self, query: &ClientListQuery) -> Result<Vec<Client>, ClientRepositoryError> {
        let records = self.guard()?;
        let mut sorted = records.clone();
        sorted.sort_by(|left, right| ordered(query, left, right));
        let skip = usize::try_from(query.page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(query.page.limit()).unwrap_or(usize::MAX);
        Ok(sorted.into_iter().skip(skip).take(take).collect())
    }
}
