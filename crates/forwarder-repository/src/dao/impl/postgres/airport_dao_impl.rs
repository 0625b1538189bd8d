//! Postgres airport DAO. Codes are matched trimmed and uppercased.

use super::PgCrudDao;
use crate::dao::{AirportDao, AirportQuery, CrudDao};
use async_trait::async_trait;
use forwarder_core::{ForwarderResult, RequestContext};
use forwarder_domain::Airport;

pub type PgAirportDao = PgCrudDao<Airport, AirportQuery>;

#[async_trait]
impl AirportDao for PgAirportDao {
    async fn get_by_code(&self, ctx: &RequestContext, code: &str) -> ForwarderResult<Airport> {
        self.get_by_id(ctx, &normalize_code(code)).await
    }

    async fn list_by_country(&self, ctx: &RequestContext, country_code: &str) -> ForwarderResult<Vec<Airport>> {
        let query = AirportQuery {
            country_code: normalize_code(country_code),
            ..AirportQuery::default()
        };
        self.get_all(ctx, &query).await
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
