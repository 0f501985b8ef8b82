//! Listing options: page bounds and sort order for client enumeration.

use std::fmt;
use std::str::FromStr;

use pagination::{DEFAULT_LIMIT, DEFAULT_PAGE, PageRequest, PageRequestError, SortDirection};
use serde::Deserialize;

use super::{ClientValidationErrors, FieldError};

/// Record fields a listing may be ordered by.
///
/// The password is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClientSortField {
    Id,
    WhatsappGroupName,
    Bid,
    Uid,
    MtcGroupId,
    ReporterName,
    ReporterPhone,
    CompId,
    UserName,
    AppGuid,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl ClientSortField {
    /// Every sortable field, in record order.
    pub const ALL: [Self; 12] = [
        Self::Id,
        Self::WhatsappGroupName,
        Self::Bid,
        Self::Uid,
        Self::MtcGroupId,
        Self::ReporterName,
        Self::ReporterPhone,
        Self::CompId,
        Self::UserName,
        Self::AppGuid,
        Self::CreatedAt,
        Self::UpdatedAt,
    ];

    /// Wire name of the field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::WhatsappGroupName => "whatsappGroupName",
            Self::Bid => "bid",
            Self::Uid => "uid",
            Self::MtcGroupId => "mtcGroupID",
            Self::ReporterName => "reporterName",
            Self::ReporterPhone => "reporterPhone",
            Self::CompId => "compId",
            Self::UserName => "userName",
            Self::AppGuid => "appGuid",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }
}

impl fmt::Display for ClientSortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientSortField {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or(())
    }
}

/// Validated listing query handed to repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientListQuery {
    pub page: PageRequest,
    pub sort_by: ClientSortField,
    pub direction: SortDirection,
}

impl Default for ClientListQuery {
    fn default() -> Self {
        Self {
            page: PageRequest::default(),
            sort_by: ClientSortField::default(),
            direction: SortDirection::Desc,
        }
    }
}

/// Raw listing options as supplied by callers.
///
/// Missing values fall back to page 1, 10 items, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListClientsOptions {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListClientsOptions {
    /// Validate options against the configured maximum page size.
    ///
    /// # Examples
    /// ```
    /// use client_registry::domain::{ClientSortField, ListClientsOptions};
    /// use pagination::SortDirection;
    ///
    /// let query = ListClientsOptions::default().into_query(100).expect("defaults are valid");
    /// assert_eq!(query.sort_by, ClientSortField::CreatedAt);
    /// assert_eq!(query.direction, SortDirection::Desc);
    /// assert_eq!(query.page.limit(), 10);
    /// ```
    pub fn into_query(self, max_limit: u32) -> Result<ClientListQuery, ClientValidationErrors> {
        let mut errors = Vec::new();

        let page = PageRequest::new(
            self.page.unwrap_or(i64::from(DEFAULT_PAGE)),
            self.limit.unwrap_or(i64::from(DEFAULT_LIMIT)),
            max_limit,
        )
        .map_err(|err| errors.push(page_error(err)))
        .ok();

        let sort_by = match self.sort_by.as_deref() {
            None => Some(ClientSortField::default()),
            Some(raw) => raw
                .parse::<ClientSortField>()
                .map_err(|()| {
                    let allowed: Vec<&str> =
                        ClientSortField::ALL.iter().map(|f| f.as_str()).collect();
                    errors.push(FieldError::new(
                        "sortBy",
                        format!("must be one of [{}]", allowed.join(", ")),
                    ));
                })
                .ok(),
        };

        let direction = match self.sort_order.as_deref() {
            None => Some(SortDirection::Desc),
            Some(raw) => raw
                .parse::<SortDirection>()
                .map_err(|_| errors.push(FieldError::new("sortOrder", "must be one of [asc, desc]")))
                .ok(),
        };

        match (page, sort_by, direction) {
            (Some(page), Some(sort_by), Some(direction)) => Ok(ClientListQuery {
                page,
                sort_by,
                direction,
            }),
            _ => Err(ClientValidationErrors::new(errors)),
        }
    }
}

fn page_error(err: PageRequestError) -> FieldError {
    match err {
        PageRequestError::PageTooSmall => {
            FieldError::new("page", "must be greater than or equal to 1")
        }
        PageRequestError::PageTooLarge { max } => {
            FieldError::new("page", format!("must be less than or equal to {max}"))
        }
        PageRequestError::LimitTooSmall => {
            FieldError::new("limit", "must be greater than or equal to 1")
        }
        PageRequestError::LimitTooLarge { max } => {
            FieldError::new("limit", format!("must be less than or equal to {max}"))
        }
    }
}
