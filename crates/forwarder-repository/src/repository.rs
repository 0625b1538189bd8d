//! Generic tenant-scoped repository.
//!
//! One [`TenantRepository`] serves every [`Record`]: it resolves the table
//! for the request's tenant, builds parameterized statements, stamps audit
//! metadata, and logs each storage error once before returning it.
//!
//! Methods come in pairs: the plain form runs on the pool, the `_in` form
//! runs on a caller-opened transaction (`&mut *tx`).

use crate::filter::Filter;
use crate::pool::DatabasePoolInterface;
use crate::record::{DeletePolicy, Record, RecordId};
use chrono::{DateTime, Utc};
use forwarder_core::{
    now_utc, ForwarderError, ForwarderResult, Page, PageRequest, RequestContext, ValidateExt,
    AUDIT_COLUMNS,
};
use sqlx::{PgConnection, PgExecutor, PgPool, Postgres, QueryBuilder};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, error};

/// CRUD over one tenant-scoped table.
pub struct TenantRepository<E> {
    pool: Arc<dyn DatabasePoolInterface>,
    _record: PhantomData<fn() -> E>,
}

impl<E> Clone for TenantRepository<E> {
    fn clone(&self) -> Self {
        Self {
            pool: Arc::clone(&self.pool),
            _record: PhantomData,
        }
    }
}

impl<E> std::fmt::Debug for TenantRepository<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantRepository")
            .field("record", &std::any::type_name::<E>())
            .finish()
    }
}

impl<E> TenantRepository<E>
where
    E: Record,
    E::Id: RecordId,
{
    /// Creates a repository on a shared pool.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }

    /// Returns the underlying pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        self.pool.inner()
    }

    /// Returns the quoted, schema-qualified table for the request's tenant.
    #[must_use]
    pub fn table(&self, ctx: &RequestContext) -> String {
        self.pool.tables().resolve(ctx.tenant(), E::TABLE, E::SCOPE)
    }

    // ---------------------------------------------------------------- upsert

    /// Inserts or updates `entity` and refreshes it with the stored row.
    ///
    /// A nil id is replaced with a new one and creation metadata is stamped;
    /// update metadata is stamped on every call. The stored `id`, creation
    /// and deletion columns are never overwritten by the update branch.
    pub async fn upsert(&self, ctx: &RequestContext, entity: &mut E) -> ForwarderResult<E> {
        self.upsert_with(self.pool.inner(), ctx, entity).await
    }

    /// [`upsert`](Self::upsert) inside a caller-owned transaction.
    pub async fn upsert_in(
        &self,
        conn: &mut PgConnection,
        ctx: &RequestContext,
        entity: &mut E,
    ) -> ForwarderResult<E> {
        self.upsert_with(conn, ctx, entity).await
    }

    /// Upserts each entity in turn.
    ///
    /// Not atomic: rows written before a failure stay written. Use
    /// [`upsert_all_in`](Self::upsert_all_in) for all-or-nothing.
    pub async fn upsert_all(&self, ctx: &RequestContext, entities: &mut [E]) -> ForwarderResult<Vec<E>> {
        let mut saved = Vec::with_capacity(entities.len());
        for entity in entities.iter_mut() {
            saved.push(self.upsert_with(self.pool.inner(), ctx, entity).await?);
        }
        Ok(saved)
    }

    /// Upserts each entity inside a caller-owned transaction.
    pub async fn upsert_all_in(
        &self,
        conn: &mut PgConnection,
        ctx: &RequestContext,
        entities: &mut [E],
    ) -> ForwarderResult<Vec<E>> {
        let mut saved = Vec::with_capacity(entities.len());
        for entity in entities.iter_mut() {
            saved.push(self.upsert_with(&mut *conn, ctx, entity).await?);
        }
        Ok(saved)
    }

    async fn upsert_with<'e, X>(&self, executor: X, ctx: &RequestContext, entity: &mut E) -> ForwarderResult<E>
    where
        X: PgExecutor<'e>,
    {
        entity.validate_entity()?;

        let now = now_utc();
        let assigned = entity.ensure_id();
        if assigned || entity.audit().created_at == DateTime::<Utc>::default() {
            entity.audit_mut().stamp_created(ctx.actor(), now);
        }
        entity.audit_mut().stamp_updated(ctx.actor(), now);

        let table = self.table(ctx);
        debug!(tenant = %ctx.tenant(), table = %table, id = %entity.id(), new = assigned, "Upserting {}", E::RESOURCE);

        // A stored row is matched by id so its natural key may change.
        let id_target = [E::ID_COLUMN];
        let conflict_target: &[&str] = if assigned { E::CONFLICT_TARGET } else { &id_target };
        let mut qb = upsert_query(&table, entity, conflict_target);
        let saved = qb
            .build_query_as::<E>()
            .fetch_one(executor)
            .await
            .map_err(|e| storage_error(ctx, &table, "upsert", e))?;

        *entity = saved.clone();
        Ok(saved)
    }

    // ------------------------------------------------------------------ read

    /// Returns the first row matching `filter`, if any.
    pub async fn find(&self, ctx: &RequestContext, filter: &Filter) -> ForwarderResult<Option<E>> {
        self.find_with(self.pool.inner(), ctx, filter).await
    }

    /// [`find`](Self::find) inside a caller-owned transaction.
    pub async fn find_in(
        &self,
        conn: &mut PgConnection,
        ctx: &RequestContext,
        filter: &Filter,
    ) -> ForwarderResult<Option<E>> {
        self.find_with(conn, ctx, filter).await
    }

    /// Returns the first row matching `filter` or `NotFound`.
    pub async fn get(&self, ctx: &RequestContext, filter: &Filter) -> ForwarderResult<E> {
        self.find(ctx, filter)
            .await?
            .ok_or_else(|| ForwarderError::not_found(E::RESOURCE, filter))
    }

    /// Returns the live row with this id or `NotFound`.
    pub async fn get_by_id(&self, ctx: &RequestContext, id: &E::Id) -> ForwarderResult<E> {
        let filter = Filter::new().eq(E::ID_COLUMN, id.clone());
        self.find(ctx, &filter)
            .await?
            .ok_or_else(|| ForwarderError::not_found(E::RESOURCE, id))
    }

    async fn find_with<'e, X>(&self, executor: X, ctx: &RequestContext, filter: &Filter) -> ForwarderResult<Option<E>>
    where
        X: PgExecutor<'e>,
    {
        let table = self.table(ctx);
        debug!(tenant = %ctx.tenant(), table = %table, filter = %filter, "Finding {}", E::RESOURCE);

        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM ");
        qb.push(&table);
        filter.push_where(&mut qb, E::deleted_column());
        filter.push_order(&mut qb, E::DEFAULT_ORDER);
        qb.push(" LIMIT 1");
        qb.build_query_as::<E>()
            .fetch_optional(executor)
            .await
            .map_err(|e| storage_error(ctx, &table, "get", e))
    }

    /// Returns every row matching `filter`, in the entity's default order
    /// unless the filter sets one.
    pub async fn get_all(&self, ctx: &RequestContext, filter: &Filter) -> ForwarderResult<Vec<E>> {
        self.get_all_with(self.pool.inner(), ctx, filter).await
    }

    /// [`get_all`](Self::get_all) inside a caller-owned transaction.
    pub async fn get_all_in(
        &self,
        conn: &mut PgConnection,
        ctx: &RequestContext,
        filter: &Filter,
    ) -> ForwarderResult<Vec<E>> {
        self.get_all_with(conn, ctx, filter).await
    }

    async fn get_all_with<'e, X>(&self, executor: X, ctx: &RequestContext, filter: &Filter) -> ForwarderResult<Vec<E>>
    where
        X: PgExecutor<'e>,
    {
        let table = self.table(ctx);
        debug!(tenant = %ctx.tenant(), table = %table, filter = %filter, "Listing {}", E::RESOURCE);

        let mut qb = select_query::<E>(&table, filter);
        qb.build_query_as::<E>()
            .fetch_all(executor)
            .await
            .map_err(|e| storage_error(ctx, &table, "get_all", e))
    }

    /// Returns one page of rows matching `filter` plus the total count.
    pub async fn get_page(&self, ctx: &RequestContext, filter: &Filter, page: PageRequest) -> ForwarderResult<Page<E>> {
        let total = self.count(ctx, filter).await?;
        let content = self.get_all(ctx, &filter.clone().page(page)).await?;
        Ok(Page::new(content, page, total))
    }

    /// Counts rows matching `filter`.
    pub async fn count(&self, ctx: &RequestContext, filter: &Filter) -> ForwarderResult<u64> {
        let table = self.table(ctx);
        debug!(tenant = %ctx.tenant(), table = %table, filter = %filter, "Counting {}", E::RESOURCE);

        let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM ");
        qb.push(&table);
        filter.push_where(&mut qb, E::deleted_column());

        let count = qb
            .build_query_scalar::<i64>()
            .fetch_one(self.pool.inner())
            .await
            .map_err(|e| storage_error(ctx, &table, "count", e))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    // ---------------------------------------------------------------- delete

    /// Deletes the row with this id according to the entity's
    /// [`DeletePolicy`]. Returns whether a live row was affected.
    pub async fn delete(&self, ctx: &RequestContext, id: &E::Id) -> ForwarderResult<bool> {
        let filter = Filter::new().eq(E::ID_COLUMN, id.clone());
        Ok(self.delete_where(ctx, &filter).await? > 0)
    }

    /// Deletes every live row matching `filter`. Returns the affected count.
    pub async fn delete_where(&self, ctx: &RequestContext, filter: &Filter) -> ForwarderResult<u64> {
        let table = self.table(ctx);
        debug!(
            tenant = %ctx.tenant(),
            table = %table,
            filter = %filter,
            policy = ?E::DELETE_POLICY,
            "Deleting {}",
            E::RESOURCE
        );

        match E::DELETE_POLICY {
            DeletePolicy::Hard => self.hard_delete(self.pool.inner(), ctx, &table, filter).await,
            DeletePolicy::Soft => self.mark_deleted(self.pool.inner(), ctx, &table, filter).await,
            DeletePolicy::SoftThenHard => {
                let mut tx = self
                    .pool
                    .inner()
                    .begin()
                    .await
                    .map_err(|e| storage_error(ctx, &table, "delete", e))?;

                let marked = self.mark_deleted(&mut *tx, ctx, &table, filter).await?;
                if marked > 0 {
                    let only_marked = filter.clone().include_deleted().is_not_null("deleted_at");
                    self.hard_delete(&mut *tx, ctx, &table, &only_marked).await?;
                }

                tx.commit()
                    .await
                    .map_err(|e| storage_error(ctx, &table, "delete", e))?;
                Ok(marked)
            }
        }
    }

    async fn hard_delete<'e, X>(&self, executor: X, ctx: &RequestContext, table: &str, filter: &Filter) -> ForwarderResult<u64>
    where
        X: PgExecutor<'e>,
    {
        let mut qb = QueryBuilder::<Postgres>::new("DELETE FROM ");
        qb.push(table);
        filter.push_where(&mut qb, E::deleted_column());

        let result = qb
            .build()
            .execute(executor)
            .await
            .map_err(|e| storage_error(ctx, table, "delete", e))?;
        Ok(result.rows_affected())
    }

    async fn mark_deleted<'e, X>(&self, executor: X, ctx: &RequestContext, table: &str, filter: &Filter) -> ForwarderResult<u64>
    where
        X: PgExecutor<'e>,
    {
        let now = now_utc();
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE ");
        qb.push(table)
            .push(" SET deleted_at = ")
            .push_bind(now)
            .push(", deleted_by = ")
            .push_bind(ctx.actor())
            .push(", updated_at = GREATEST(")
            .push_bind(now)
            .push(", updated_at + interval '1 microsecond'), updated_by = ")
            .push_bind(ctx.actor());
        // Already-deleted rows keep their original markers.
        filter.live_only().push_where(&mut qb, Some("deleted_at"));

        let result = qb
            .build()
            .execute(executor)
            .await
            .map_err(|e| storage_error(ctx, table, "delete", e))?;
        Ok(result.rows_affected())
    }
}

/// Converts a driver error and logs it once with its call site.
pub(crate) fn storage_error(ctx: &RequestContext, table: &str, op: &'static str, err: sqlx::Error) -> ForwarderError {
    let err = ForwarderError::from(err);
    error!(
        tenant = %ctx.tenant(),
        table,
        op,
        request_id = %ctx.request_id(),
        code = err.error_code(),
        error = %err,
        "Storage error"
    );
    err
}

/// `INSERT … ON CONFLICT (conflict_target) DO UPDATE … RETURNING *` for one
/// entity. Columns of the conflict target are left out of the update branch.
fn upsert_query<E>(table: &str, entity: &E, conflict_target: &[&str]) -> QueryBuilder<'static, Postgres>
where
    E: Record,
    E::Id: RecordId,
{
    let audit = *entity.audit();
    let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO ");
    qb.push(table).push(" AS t (").push(E::ID_COLUMN);
    for column in E::COLUMNS.iter().chain(AUDIT_COLUMNS) {
        qb.push(", ").push(column);
    }
    qb.push(") VALUES (");
    {
        let mut row = qb.separated(", ");
        row.push_bind(entity.id().clone());
        entity.bind_columns(&mut row);
        row.push_bind(audit.created_at)
            .push_bind(audit.created_by)
            .push_bind(audit.updated_at)
            .push_bind(audit.updated_by);
    }
    qb.push(") ON CONFLICT (")
        .push(conflict_target.join(", "))
        .push(") DO UPDATE SET ");
    for column in E::COLUMNS
        .iter()
        .copied()
        .filter(|column| !conflict_target.contains(column))
    {
        qb.push(column).push(" = EXCLUDED.").push(column).push(", ");
    }
    qb.push(
        "updated_at = GREATEST(EXCLUDED.updated_at, t.updated_at + interval '1 microsecond'), \
         updated_by = EXCLUDED.updated_by RETURNING *",
    );
    qb
}

/// `SELECT * FROM … WHERE … ORDER BY … LIMIT …`.
fn select_query<E: Record>(table: &str, filter: &Filter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM ");
    qb.push(table);
    filter.push_where(&mut qb, E::deleted_column());
    filter.push_order(&mut qb, E::DEFAULT_ORDER);
    filter.push_limit(&mut qb);
    qb
}
