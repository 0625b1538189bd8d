//! Airport reference data. Shared by every tenant and stored in the public
//! schema.

use super::{CrudDao, RecordQuery};
use crate::filter::Filter;
use async_trait::async_trait;
use forwarder_core::{ForwarderResult, RequestContext};
use forwarder_domain::Airport;

#[derive(Debug, Clone, Default)]
pub struct AirportQuery {
    pub code: String,
    pub codes: Vec<String>,
    pub country_code: String,
    pub city: String,
}

impl RecordQuery for AirportQuery {
    fn to_filter(&self) -> Filter {
        Filter::new()
            .eq_if("code", self.code.to_ascii_uppercase())
            .any_of("code", self.codes.iter().map(|c| c.to_ascii_uppercase()).collect::<Vec<_>>())
            .eq_if("country_code", self.country_code.to_ascii_uppercase())
            .eq_if("city", self.city.as_str())
    }
}

#[async_trait]
pub trait AirportDao: CrudDao<Airport, Query = AirportQuery> {
    /// Looks up an airport by IATA code, case-insensitively.
    async fn get_by_code(&self, ctx: &RequestContext, code: &str) -> ForwarderResult<Airport>;

    /// Airports in a country, ordered by code.
    async fn list_by_country(&self, ctx: &RequestContext, country_code: &str) -> ForwarderResult<Vec<Airport>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_uppercased() {
        let query = AirportQuery {
            code: "lhr".to_string(),
            country_code: "gb".to_string(),
            ..AirportQuery::default()
        };
        assert_eq!(query.to_filter().to_string(), "code = 'LHR', country_code = 'GB'");
        assert!(AirportQuery::default().to_filter().is_unconstrained());
    }
}
