//! Table metadata binding an entity to its storage.

use crate::filter::FilterValue;
use crate::tenant::TableScope;
use forwarder_core::{Auditable, Entity};
use sqlx::postgres::PgRow;
use sqlx::query_builder::Separated;
use sqlx::{Encode, FromRow, Postgres, Type};
use std::fmt::Display;
use validator::Validate;

/// How rows of a table are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// `DELETE` the row.
    Hard,
    /// Stamp `deleted_at` / `deleted_by`; the row stays.
    Soft,
    /// Stamp the markers, then `DELETE`, in one transaction.
    SoftThenHard,
}

impl DeletePolicy {
    /// True when the table carries `deleted_at` / `deleted_by` columns.
    #[must_use]
    pub const fn tracks_deletion(self) -> bool {
        !matches!(self, Self::Hard)
    }
}

/// Identifier types a [`Record`] can be keyed by.
pub trait RecordId:
    Clone + Send + Sync + Display + Into<FilterValue> + for<'q> Encode<'q, Postgres> + Type<Postgres> + 'static
{
}

impl<T> RecordId for T where
    T: Clone + Send + Sync + Display + Into<FilterValue> + for<'q> Encode<'q, Postgres> + Type<Postgres> + 'static
{
}

/// An entity persisted in one table.
///
/// Rows are read with `SELECT *` into the entity's `FromRow` impl, so the
/// struct fields must match the table's columns. Writes list the columns
/// explicitly: [`ID_COLUMN`](Self::ID_COLUMN), then [`COLUMNS`](Self::COLUMNS)
/// in the order [`bind_columns`](Self::bind_columns) binds them, then the
/// audit columns. Soft-delete markers are never written by an upsert.
pub trait Record:
    Entity + Auditable + Validate + for<'r> FromRow<'r, PgRow> + Clone + Send + Sync + Unpin + 'static
{
    /// Resource name used in `NotFound` errors and logs.
    const RESOURCE: &'static str;

    /// Unqualified table name.
    const TABLE: &'static str;

    const SCOPE: TableScope = TableScope::Tenant;

    const ID_COLUMN: &'static str = "id";

    /// Payload columns, excluding the id, audit and soft-delete columns.
    const COLUMNS: &'static [&'static str];

    /// Unique key a newly identified row resolves conflicts on. Rows that
    /// already carry an id always resolve on [`ID_COLUMN`](Self::ID_COLUMN).
    const CONFLICT_TARGET: &'static [&'static str] = &["id"];

    const DELETE_POLICY: DeletePolicy;

    /// `ORDER BY` clause applied to listings without an explicit order.
    const DEFAULT_ORDER: Option<&'static str> = None;

    /// Binds one value per entry of [`COLUMNS`](Self::COLUMNS), in order.
    fn bind_columns(&self, row: &mut Separated<'_, '_, Postgres, &'static str>);

    /// Column holding the soft-delete marker, for tables that track deletion.
    #[must_use]
    fn deleted_column() -> Option<&'static str> {
        Self::DELETE_POLICY.tracks_deletion().then_some("deleted_at")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_deletion() {
        assert!(!DeletePolicy::Hard.tracks_deletion());
        assert!(DeletePolicy::Soft.tracks_deletion());
        assert!(DeletePolicy::SoftThenHard.tracks_deletion());
    }
}
