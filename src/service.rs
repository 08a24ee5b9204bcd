//! Munro lookups and listings.
//!
//! [`MunroService`] owns the name index, a shared store handle and the filter
//! compiler. Its operations are synchronous; the HTTP layer runs them on the
//! blocking pool.

use crate::catalog::MunroIndex;
use crate::config::ServiceConfig;
use crate::filter::{Condition, FilterCompiler, FilterError, Predicate};
use crate::model::{GetMunroResponse, Munro};
use crate::pagination::{PaginatedData, PaginationError};
use crate::query::{ListParams, PageRequest};
use crate::store::memory::RECORD_ID_FIELD;
use crate::store::{DocumentStore, StoreError, StoreResult};
use log::debug;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Munro not found: {id}")]
    NotFound { id: String },

    #[error(transparent)]
    MalformedFilter(#[from] FilterError),

    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error(transparent)]
    QueryExecutionFailed(#[from] StoreError),

    #[error("Worker task failed: {0}")]
    Worker(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub struct MunroService {
    index: Arc<MunroIndex>,
    store: Arc<dyn DocumentStore>,
    config: ServiceConfig,
    compiler: FilterCompiler,
}

impl MunroService {
    pub fn new(
        index: Arc<MunroIndex>,
        store: Arc<dyn DocumentStore>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            index,
            store,
            config,
            compiler: FilterCompiler::new(config.filter),
        }
    }

    pub fn index(&self) -> &MunroIndex {
        &self.index
    }

    /// Look up one record with its position and neighbors in the name index
    pub fn get_munro(&self, id: &str) -> ServiceResult<GetMunroResponse> {
        let predicate = Predicate::term(RECORD_ID_FIELD, Condition::Equals(id.into()));
        let document = self
            .store
            .find_one(&predicate)?
            .ok_or_else(|| ServiceError::NotFound { id: id.to_string() })?;
        let munro = Munro::from_document(&document)?;

        let neighbors = self.index.locate(id);
        let random = self
            .index
            .random(&mut rand::thread_rng())
            .map(str::to_string);

        Ok(GetMunroResponse {
            munro,
            index: neighbors.as_ref().map(|n| n.index),
            prev: neighbors.as_ref().and_then(|n| n.prev).map(str::to_string),
            next: neighbors.as_ref().and_then(|n| n.next).map(str::to_string),
            random,
        })
    }

    /// Every identifier in the name index, sorted
    pub fn list_names(&self) -> Vec<String> {
        self.index.names().to_vec()
    }

    /// Filtered, sorted, projected and paginated listing
    pub fn list_munros(&self, params: &ListParams) -> ServiceResult<PaginatedData<Vec<Munro>>> {
        let request = PageRequest::from_params(params, &self.compiler)?;
        debug!(
            "list request: page {} limit {} sort {} {}",
            request.page,
            request.limit,
            request.sort_field,
            request.sort_index()
        );

        let page = request
            .into_page_query(self.config.filter_policy)
            .execute(self.store.as_ref())?
            .try_map(|documents| {
                documents
                    .iter()
                    .map(Munro::from_document)
                    .collect::<StoreResult<Vec<_>>>()
            })?;

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{Document, Value};
    use crate::pagination::FilterPolicy;
    use crate::store::MemoryStore;
    use anyhow::Result;

    fn service(config: ServiceConfig) -> MunroService {
        let records = [
            ("ben-macdui", "Ben Macdui", 1309, "Cairngorms"),
            ("ben-nevis", "Ben Nevis", 1345, "Fort William"),
            ("braeriach", "Braeriach", 1296, "Cairngorms"),
            ("schiehallion", "Schiehallion", 1083, "Loch Rannoch"),
        ];
        let index = MunroIndex::from_names(records.iter().map(|(id, ..)| *id));
        let store = MemoryStore::seed(records.into_iter().map(|(id, name, altitude, region)| {
            let document: Document = [
                ("name", Value::from(name)),
                ("altitude", Value::Int64(altitude)),
                ("region", Value::from(region)),
            ]
            .into_iter()
            .collect();
            (id.to_string(), document)
        }));
        MunroService::new(Arc::new(index), Arc::new(store), config)
    }

    fn params(filter: Option<&str>) -> ListParams {
        ListParams {
            filter: filter.map(str::to_string),
            ..ListParams::default()
        }
    }

    #[test]
    fn test_get_munro() -> Result<()> {
        let service = service(ServiceConfig::default());
        let response = service.get_munro("braeriach")?;

        assert_eq!(response.munro.name, "Braeriach");
        assert_eq!(response.munro.id, "braeriach");
        assert_eq!(response.index, Some(2));
        assert_eq!(response.prev.as_deref(), Some("ben-nevis"));
        assert_eq!(response.next.as_deref(), Some("schiehallion"));
        let random = response.random.expect("index is not empty");
        assert!(service.index().locate(&random).is_some());
        Ok(())
    }

    #[test]
    fn test_get_munro_at_edges() -> Result<()> {
        let service = service(ServiceConfig::default());

        let first = service.get_munro("ben-macdui")?;
        assert_eq!(first.index, Some(0));
        assert_eq!(first.prev, None);

        let last = service.get_munro("schiehallion")?;
        assert_eq!(last.next, None);
        Ok(())
    }

    #[test]
    fn test_get_munro_not_found() {
        let err = service(ServiceConfig::default())
            .get_munro("ben-lomond")
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { ref id } if id == "ben-lomond"));
        assert_eq!(err.to_string(), "Munro not found: ben-lomond");
    }

    #[test]
    fn test_list_names() {
        assert_eq!(
            service(ServiceConfig::default()).list_names(),
            vec!["ben-macdui", "ben-nevis", "braeriach", "schiehallion"]
        );
    }

    #[test]
    fn test_list_munros_filtered() -> Result<()> {
        let service = service(ServiceConfig::default());
        let page = service.list_munros(&ListParams {
            sort_param: Some("altitude".to_string()),
            sort_direction: Some("asc".to_string()),
            ..params(Some("region==Cairngorms"))
        })?;

        let names: Vec<&str> = page.data.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Braeriach", "Ben Macdui"]);
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.pagination.total_pages, 1);
        Ok(())
    }

    #[test]
    fn test_list_munros_projection() -> Result<()> {
        let service = service(ServiceConfig::default());
        let page = service.list_munros(&ListParams {
            fields: Some("name".to_string()),
            ..ListParams::default()
        })?;

        assert_eq!(page.data.len(), 4);
        assert!(page.data.iter().all(|m| m.altitude == 0 && m.region.is_empty()));
        assert!(page.data.iter().all(|m| !m.name.is_empty()));
        Ok(())
    }

    #[test]
    fn test_list_munros_malformed_filter() {
        let err = service(ServiceConfig::default())
            .list_munros(&params(Some("a==b==c")))
            .unwrap_err();
        assert!(matches!(err, ServiceError::MalformedFilter(_)));
    }

    #[test]
    fn test_list_munros_requires_filter() -> Result<()> {
        let service = service(ServiceConfig {
            filter_policy: FilterPolicy::Required,
            ..ServiceConfig::default()
        });

        let err = service.list_munros(&params(None)).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Pagination(PaginationError::FilterRequired)
        ));

        assert_eq!(service.list_munros(&params(Some("")))?.pagination.total, 4);
        Ok(())
    }
}
