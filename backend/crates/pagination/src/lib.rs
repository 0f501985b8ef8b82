//! Offset pagination primitives shared by the client registry backend.
//!
//! The crate owns three small pieces of the listing contract:
//!
//! - [`PageRequest`]: a validated `(page, limit)` pair with a caller-imposed
//!   maximum page size, exposing the row offset used by storage adapters.
//! - [`SortDirection`]: the `asc` / `desc` ordering keyword.
//! - [`Paginated`]: the page envelope returned to callers, carrying the
//!   unfiltered total alongside the echoed request.
//!
//! Nothing here knows about HTTP or SQL; adapters translate at the edges.

mod direction;
mod envelope;
mod request;

pub use direction::{SortDirection, SortDirectionParseError};
pub use envelope::Paginated;
pub use request::{DEFAULT_LIMIT, DEFAULT_PAGE, PageRequest, PageRequestError};
