//! Generic Postgres `CrudDao`.

use crate::dao::{CrudDao, RecordQuery};
use crate::pool::DatabasePoolInterface;
use crate::record::{Record, RecordId};
use crate::repository::TenantRepository;
use async_trait::async_trait;
use forwarder_core::{ForwarderError, ForwarderResult, Page, PageRequest, RequestContext};
use sqlx::PgConnection;
use std::marker::PhantomData;
use std::sync::Arc;

/// [`CrudDao`] for entity `E` filtered by query type `Q`.
///
/// Entity-specific DAO traits are implemented on concrete instantiations,
/// e.g. `PgCrudDao<Shipment, ShipmentQuery>`.
pub struct PgCrudDao<E, Q> {
    repo: TenantRepository<E>,
    _query: PhantomData<fn() -> Q>,
}

impl<E, Q> Clone for PgCrudDao<E, Q> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            _query: PhantomData,
        }
    }
}

impl<E, Q> std::fmt::Debug for PgCrudDao<E, Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgCrudDao")
            .field("repo", &self.repo)
            .field("query", &std::any::type_name::<Q>())
            .finish()
    }
}

impl<E, Q> PgCrudDao<E, Q>
where
    E: Record,
    E::Id: RecordId,
    Q: RecordQuery,
{
    /// Creates a new DAO on a shared pool.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self {
            repo: TenantRepository::new(pool),
            _query: PhantomData,
        }
    }

    /// The repository backing this DAO.
    #[must_use]
    pub const fn repository(&self) -> &TenantRepository<E> {
        &self.repo
    }
}

#[async_trait]
impl<E, Q> CrudDao<E> for PgCrudDao<E, Q>
where
    E: Record,
    E::Id: RecordId,
    Q: RecordQuery,
{
    type Query = Q;

    async fn upsert(&self, ctx: &RequestContext, entity: &mut E) -> ForwarderResult<E> {
        self.repo.upsert(ctx, entity).await
    }

    async fn upsert_in(&self, conn: &mut PgConnection, ctx: &RequestContext, entity: &mut E) -> ForwarderResult<E> {
        self.repo.upsert_in(conn, ctx, entity).await
    }

    async fn upsert_all(&self, ctx: &RequestContext, entities: &mut [E]) -> ForwarderResult<Vec<E>> {
        self.repo.upsert_all(ctx, entities).await
    }

    async fn upsert_all_in(
        &self,
        conn: &mut PgConnection,
        ctx: &RequestContext,
        entities: &mut [E],
    ) -> ForwarderResult<Vec<E>> {
        self.repo.upsert_all_in(conn, ctx, entities).await
    }

    async fn get(&self, ctx: &RequestContext, query: &Q) -> ForwarderResult<E> {
        self.repo.get(ctx, &query.to_filter()).await
    }

    async fn get_by_id(&self, ctx: &RequestContext, id: &E::Id) -> ForwarderResult<E> {
        self.repo.get_by_id(ctx, id).await
    }

    async fn get_all(&self, ctx: &RequestContext, query: &Q) -> ForwarderResult<Vec<E>> {
        self.repo.get_all(ctx, &query.to_filter()).await
    }

    async fn get_all_in(&self, conn: &mut PgConnection, ctx: &RequestContext, query: &Q) -> ForwarderResult<Vec<E>> {
        self.repo.get_all_in(conn, ctx, &query.to_filter()).await
    }

    async fn get_page(&self, ctx: &RequestContext, query: &Q, page: PageRequest) -> ForwarderResult<Page<E>> {
        self.repo.get_page(ctx, &query.to_filter(), page).await
    }

    async fn count(&self, ctx: &RequestContext, query: &Q) -> ForwarderResult<u64> {
        self.repo.count(ctx, &query.to_filter()).await
    }

    async fn delete(&self, ctx: &RequestContext, id: &E::Id) -> ForwarderResult<bool> {
        self.repo.delete(ctx, id).await
    }

    async fn delete_all(&self, ctx: &RequestContext, query: &Q) -> ForwarderResult<u64> {
        let filter = query.to_filter();
        if filter.is_unconstrained() {
            return Err(ForwarderError::validation(format!(
                "refusing to delete every {} row without a filter",
                E::RESOURCE
            )));
        }
        self.repo.delete_where(ctx, &filter).await
    }
}
