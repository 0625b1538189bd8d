//! Conditional predicate builder.
//!
//! DAO lookups take optional filter arguments. A predicate is only emitted
//! for an argument that carries a value: `eq_if` skips zero values (empty
//! string, nil UUID, zero, empty list), `any_of` skips empty lists, and the
//! `*_opt` variants skip `None`. Every value is bound as a parameter; only
//! the `&'static str` column names are spliced into the SQL text.

use chrono::{DateTime, NaiveDate, Utc};
use forwarder_core::PageRequest;
use rust_decimal::Decimal;
use sqlx::{Postgres, QueryBuilder};
use std::fmt;
use uuid::Uuid;

/// A bindable filter value.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Uuid(Uuid),
    Int(i64),
    Bool(bool),
    Decimal(Decimal),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    UuidList(Vec<Uuid>),
    TextList(Vec<String>),
}

impl FilterValue {
    /// True for the zero value of the underlying type.
    ///
    /// Booleans are never zero; use [`Filter::eq_opt`] for optional flags.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Text(v) => v.is_empty(),
            Self::Uuid(v) => v.is_nil(),
            Self::Int(v) => *v == 0,
            Self::Decimal(v) => v.is_zero(),
            Self::UuidList(v) => v.is_empty(),
            Self::TextList(v) => v.is_empty(),
            Self::Bool(_) | Self::Timestamp(_) | Self::Date(_) => false,
        }
    }

    fn push_bind(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self.clone() {
            Self::Text(v) => qb.push_bind(v),
            Self::Uuid(v) => qb.push_bind(v),
            Self::Int(v) => qb.push_bind(v),
            Self::Bool(v) => qb.push_bind(v),
            Self::Decimal(v) => qb.push_bind(v),
            Self::Timestamp(v) => qb.push_bind(v),
            Self::Date(v) => qb.push_bind(v),
            Self::UuidList(v) => qb.push_bind(v),
            Self::TextList(v) => qb.push_bind(v),
        };
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(v) => write!(f, "'{}'", v),
            Self::Uuid(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Decimal(v) => write!(f, "{}", v),
            Self::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
            Self::Date(v) => write!(f, "{}", v),
            Self::UuidList(v) => write!(f, "{:?}", v),
            Self::TextList(v) => write!(f, "{:?}", v),
        }
    }
}

macro_rules! filter_value_from {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for FilterValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )+
    };
}

filter_value_from! {
    String => Text,
    &str => Text,
    Uuid => Uuid,
    i64 => Int,
    i32 => Int,
    bool => Bool,
    Decimal => Decimal,
    DateTime<Utc> => Timestamp,
    NaiveDate => Date,
    Vec<Uuid> => UuidList,
    Vec<String> => TextList,
}

impl From<&[Uuid]> for FilterValue {
    fn from(value: &[Uuid]) -> Self {
        Self::UuidList(value.to_vec())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    NotEq,
    Any,
    Gte,
    Lte,
    IsNull,
    IsNotNull,
}

impl Op {
    const fn sql(self) -> &'static str {
        match self {
            Self::Eq => " = ",
            Self::NotEq => " <> ",
            Self::Any => " = ANY(",
            Self::Gte => " >= ",
            Self::Lte => " <= ",
            Self::IsNull => " IS NULL",
            Self::IsNotNull => " IS NOT NULL",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Predicate {
    column: &'static str,
    op: Op,
    value: Option<FilterValue>,
}

/// Sort direction for [`Filter::order_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    const fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Optional WHERE / ORDER BY / LIMIT arguments of a lookup.
///
/// An empty filter matches every live row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    predicates: Vec<Predicate>,
    include_deleted: bool,
    order: Vec<(&'static str, SortDirection)>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl Filter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with(mut self, column: &'static str, op: Op, value: Option<FilterValue>) -> Self {
        self.predicates.push(Predicate { column, op, value });
        self
    }

    /// `column = value`, always applied.
    #[must_use]
    pub fn eq(self, column: &'static str, value: impl Into<FilterValue>) -> Self {
        self.with(column, Op::Eq, Some(value.into()))
    }

    /// `column = value`, skipped when `value` is a zero value.
    #[must_use]
    pub fn eq_if(self, column: &'static str, value: impl Into<FilterValue>) -> Self {
        let value = value.into();
        if value.is_zero() {
            return self;
        }
        self.with(column, Op::Eq, Some(value))
    }

    /// `column = value` when `value` is `Some`.
    #[must_use]
    pub fn eq_opt<V: Into<FilterValue>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.eq(column, value),
            None => self,
        }
    }

    /// `column <> value`, always applied.
    #[must_use]
    pub fn not_eq(self, column: &'static str, value: impl Into<FilterValue>) -> Self {
        self.with(column, Op::NotEq, Some(value.into()))
    }

    /// `column = ANY(values)`, skipped when the list is empty.
    #[must_use]
    pub fn any_of(self, column: &'static str, values: impl Into<FilterValue>) -> Self {
        let values = values.into();
        if values.is_zero() {
            return self;
        }
        self.with(column, Op::Any, Some(values))
    }

    /// `column >= value` when `value` is `Some`.
    #[must_use]
    pub fn gte_opt<V: Into<FilterValue>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(column, Op::Gte, Some(value.into())),
            None => self,
        }
    }

    /// `column <= value` when `value` is `Some`.
    #[must_use]
    pub fn lte_opt<V: Into<FilterValue>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(column, Op::Lte, Some(value.into())),
            None => self,
        }
    }

    #[must_use]
    pub fn is_null(self, column: &'static str) -> Self {
        self.with(column, Op::IsNull, None)
    }

    #[must_use]
    pub fn is_not_null(self, column: &'static str) -> Self {
        self.with(column, Op::IsNotNull, None)
    }

    /// Also match soft-deleted rows.
    #[must_use]
    pub fn include_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }

    /// Also match soft-deleted rows when `include` is set.
    #[must_use]
    pub fn include_deleted_if(self, include: bool) -> Self {
        if include {
            self.include_deleted()
        } else {
            self
        }
    }

    /// Appends a sort key. Overrides the entity's default ordering.
    #[must_use]
    pub fn order_by(mut self, column: &'static str, direction: SortDirection) -> Self {
        self.order.push((column, direction));
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets limit and offset from a page request.
    #[must_use]
    pub fn page(self, page: PageRequest) -> Self {
        self.limit(i64::try_from(page.limit()).unwrap_or(i64::MAX))
            .offset(i64::try_from(page.offset()).unwrap_or(i64::MAX))
    }

    /// Returns true when soft-deleted rows are requested.
    #[must_use]
    pub const fn includes_deleted(&self) -> bool {
        self.include_deleted
    }

    /// Returns true when no predicate will be emitted.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Returns a copy matching live rows only.
    #[must_use]
    pub(crate) fn live_only(&self) -> Self {
        Self {
            include_deleted: false,
            ..self.clone()
        }
    }

    /// Appends ` WHERE …` when there is anything to filter on.
    ///
    /// `deleted_column` names the soft-delete marker of tables that track
    /// deletion; live rows only are matched unless [`include_deleted`]
    /// was requested.
    ///
    /// [`include_deleted`]: Self::include_deleted
    pub(crate) fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>, deleted_column: Option<&str>) {
        let mut keyword = " WHERE ";

        if let Some(column) = deleted_column.filter(|_| !self.include_deleted) {
            qb.push(keyword).push(column).push(" IS NULL");
            keyword = " AND ";
        }

        for predicate in &self.predicates {
            qb.push(keyword).push(predicate.column).push(predicate.op.sql());
            keyword = " AND ";
            if let Some(value) = &predicate.value {
                value.push_bind(qb);
            }
            if predicate.op == Op::Any {
                qb.push(")");
            }
        }
    }

    /// Appends ` ORDER BY …` from the filter, else from `default_order`.
    pub(crate) fn push_order(&self, qb: &mut QueryBuilder<'_, Postgres>, default_order: Option<&str>) {
        if self.order.is_empty() {
            if let Some(order) = default_order {
                qb.push(" ORDER BY ").push(order);
            }
            return;
        }

        qb.push(" ORDER BY ");
        for (i, (column, direction)) in self.order.iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(*column).push(" ").push(direction.sql());
        }
    }

    /// Appends ` LIMIT` / ` OFFSET` when set.
    pub(crate) fn push_limit(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        if let Some(limit) = self.limit {
            qb.push(" LIMIT ").push_bind(limit);
        }
        if let Some(offset) = self.offset {
            qb.push(" OFFSET ").push_bind(offset);
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.predicates.is_empty() {
            return f.write_str("<any>");
        }
        for (i, predicate) in self.predicates.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match &predicate.value {
                Some(value) => write!(f, "{}{}{}", predicate.column, predicate.op.sql().trim_end_matches('('), value)?,
                None => write!(f, "{}{}", predicate.column, predicate.op.sql())?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(filter: &Filter, deleted: Option<&str>, default_order: Option<&str>) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM t");
        filter.push_where(&mut qb, deleted);
        filter.push_order(&mut qb, default_order);
        filter.push_limit(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn test_zero_values_add_no_predicate() {
        let filter = Filter::new()
            .eq_if("reference", "")
            .eq_if("customer_id", Uuid::nil())
            .eq_if("pieces", 0_i64)
            .any_of("id", Vec::<Uuid>::new())
            .eq_opt::<bool>("is_master", None)
            .gte_opt::<NaiveDate>("etd", None);

        assert!(filter.is_unconstrained());
        assert_eq!(render(&filter, None, None), "SELECT * FROM t");
    }

    #[test]
    fn test_predicates_are_bound_in_order() {
        let filter = Filter::new()
            .eq_if("customer_id", Uuid::now_v7())
            .any_of("status", vec!["booked".to_string(), "in_transit".to_string()])
            .gte_opt("etd", NaiveDate::from_ymd_opt(2024, 1, 1))
            .is_not_null("eta");

        assert_eq!(
            render(&filter, None, None),
            "SELECT * FROM t WHERE customer_id = $1 AND status = ANY($2) AND etd >= $3 AND eta IS NOT NULL"
        );
    }

    #[test]
    fn test_live_rows_only_unless_requested() {
        let filter = Filter::new().eq("shipment_id", Uuid::now_v7());
        assert_eq!(
            render(&filter, Some("deleted_at"), None),
            "SELECT * FROM t WHERE deleted_at IS NULL AND shipment_id = $1"
        );

        let filter = filter.include_deleted();
        assert_eq!(
            render(&filter, Some("deleted_at"), None),
            "SELECT * FROM t WHERE shipment_id = $1"
        );
    }

    #[test]
    fn test_explicit_order_overrides_default() {
        let filter = Filter::new();
        assert_eq!(
            render(&filter, None, Some("created_at DESC")),
            "SELECT * FROM t ORDER BY created_at DESC"
        );

        let filter = Filter::new()
            .order_by("etd", SortDirection::Asc)
            .order_by("reference", SortDirection::Desc);
        assert_eq!(
            render(&filter, None, Some("created_at DESC")),
            "SELECT * FROM t ORDER BY etd ASC, reference DESC"
        );
    }

    #[test]
    fn test_paging_binds_limit_and_offset() {
        let filter = Filter::new().page(PageRequest::new(2, 25));
        assert_eq!(render(&filter, None, None), "SELECT * FROM t LIMIT $1 OFFSET $2");
    }

    #[test]
    fn test_display_names_predicates() {
        let id = Uuid::now_v7();
        let filter = Filter::new().eq("id", id).is_null("eta");
        assert_eq!(filter.to_string(), format!("id = {}, eta IS NULL", id));
        assert_eq!(Filter::new().to_string(), "<any>");
    }
}
