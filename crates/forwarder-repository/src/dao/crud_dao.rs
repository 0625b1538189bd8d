//! The operations every tenant-scoped DAO offers.
//!
//! Lookups take a typed query struct whose fields default to their zero
//! value. A zero field (nil UUID, empty string, empty list, `None`) adds no
//! predicate, so `Query::default()` matches every live row.

use crate::filter::Filter;
use crate::record::Record;
use async_trait::async_trait;
use forwarder_core::{ForwarderResult, Page, PageRequest, RequestContext};
use sqlx::PgConnection;

/// A typed set of optional filter arguments.
pub trait RecordQuery: Send + Sync + 'static {
    /// Builds the predicates for the non-zero arguments.
    fn to_filter(&self) -> Filter;
}

/// Create, read, and delete over one entity's table.
///
/// The `_in` methods run on a caller-opened transaction so several writes
/// can be committed together.
#[async_trait]
pub trait CrudDao<E: Record>: Send + Sync {
    /// Filter arguments accepted by lookups.
    type Query: RecordQuery;

    /// Inserts or updates `entity`, refreshing it with the stored row.
    async fn upsert(&self, ctx: &RequestContext, entity: &mut E) -> ForwarderResult<E>;

    /// [`upsert`](Self::upsert) inside a transaction.
    async fn upsert_in(&self, conn: &mut PgConnection, ctx: &RequestContext, entity: &mut E) -> ForwarderResult<E>;

    /// Upserts each entity in turn. Not atomic.
    async fn upsert_all(&self, ctx: &RequestContext, entities: &mut [E]) -> ForwarderResult<Vec<E>>;

    /// Upserts each entity inside a transaction.
    async fn upsert_all_in(
        &self,
        conn: &mut PgConnection,
        ctx: &RequestContext,
        entities: &mut [E],
    ) -> ForwarderResult<Vec<E>>;

    /// First matching row, or `NotFound`.
    async fn get(&self, ctx: &RequestContext, query: &Self::Query) -> ForwarderResult<E>;

    /// Live row by id, or `NotFound`.
    async fn get_by_id(&self, ctx: &RequestContext, id: &E::Id) -> ForwarderResult<E>;

    /// Every matching row.
    async fn get_all(&self, ctx: &RequestContext, query: &Self::Query) -> ForwarderResult<Vec<E>>;

    /// [`get_all`](Self::get_all) inside a transaction.
    async fn get_all_in(
        &self,
        conn: &mut PgConnection,
        ctx: &RequestContext,
        query: &Self::Query,
    ) -> ForwarderResult<Vec<E>>;

    /// One page of matching rows.
    async fn get_page(&self, ctx: &RequestContext, query: &Self::Query, page: PageRequest) -> ForwarderResult<Page<E>>;

    /// Number of matching rows.
    async fn count(&self, ctx: &RequestContext, query: &Self::Query) -> ForwarderResult<u64>;

    /// Deletes by id per the entity's delete policy. Returns `true` if a
    /// live row was affected.
    async fn delete(&self, ctx: &RequestContext, id: &E::Id) -> ForwarderResult<bool>;

    /// Deletes every matching row. Returns the affected count.
    async fn delete_all(&self, ctx: &RequestContext, query: &Self::Query) -> ForwarderResult<u64>;
}
