use anyhow::Result;
use munro_api::catalog::{load_dataset, MunroIndex};
use munro_api::config::ServiceConfig;
use munro_api::filter::{FilterError, FilterOptions};
use munro_api::pagination::{FilterPolicy, PaginationError};
use munro_api::query::ListParams;
use munro_api::service::{MunroService, ServiceError};
use munro_api::store::MemoryStore;
use std::path::Path;
use std::sync::Arc;

fn sample_service(config: ServiceConfig) -> Result<MunroService> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/munro_data.json");
    let records = load_dataset(&path)?;
    let index = Arc::new(MunroIndex::from_names(records.keys().cloned()));
    let store = Arc::new(MemoryStore::seed(records));
    Ok(MunroService::new(index, store, config))
}

fn list(service: &MunroService, pairs: &[(&str, &str)]) -> Result<Vec<String>, ServiceError> {
    let page = service.list_munros(&params(pairs))?;
    Ok(page.data.into_iter().map(|m| m.name).collect())
}

fn params(pairs: &[(&str, &str)]) -> ListParams {
    let mut params = ListParams::default();
    for (key, value) in pairs {
        let value = Some(value.to_string());
        match *key {
            "page" => params.page = value,
            "limit" => params.limit = value,
            "sort_param" => params.sort_param = value,
            "sort_direction" => params.sort_direction = value,
            "fields" => params.fields = value,
            "filter" => params.filter = value,
            other => panic!("unknown parameter {other}"),
        }
    }
    params
}

#[test]
fn test_lookup_with_neighbors() -> Result<()> {
    let service = sample_service(ServiceConfig::default())?;

    let response = service.get_munro("ben-nevis")?;
    assert_eq!(response.munro.name, "Ben Nevis");
    assert_eq!(response.munro.altitude, 1345);
    assert_eq!(response.munro.routes.len(), 2);
    assert_eq!(response.index, Some(2));
    assert_eq!(response.prev.as_deref(), Some("ben-macdui"));
    assert_eq!(response.next.as_deref(), Some("braeriach"));

    let first = service.get_munro("ben-lawers")?;
    assert_eq!(first.index, Some(0));
    assert_eq!(first.prev, None);

    let last = service.get_munro("sgurr-alasdair")?;
    assert_eq!(last.next, None);
    Ok(())
}

#[test]
fn test_lookup_missing() -> Result<()> {
    let service = sample_service(ServiceConfig::default())?;
    assert!(matches!(
        service.get_munro("ben-lomond"),
        Err(ServiceError::NotFound { .. })
    ));
    Ok(())
}

#[test]
fn test_random_pick_is_a_known_munro() -> Result<()> {
    let service = sample_service(ServiceConfig::default())?;
    let names = service.list_names();
    for _ in 0..20 {
        let random = service.get_munro("braeriach")?.random.expect("index is not empty");
        assert!(names.contains(&random));
    }
    Ok(())
}

#[test]
fn test_default_listing() -> Result<()> {
    let service = sample_service(ServiceConfig::default())?;
    let page = service.list_munros(&ListParams::default())?;

    assert_eq!(page.data.len(), 8);
    assert_eq!(page.data[0].name, "Ben Lawers");
    assert_eq!(page.pagination.total, 8);
    assert_eq!(page.pagination.page, 1);
    assert_eq!(page.pagination.per_page, 25);
    assert_eq!(page.pagination.total_pages, 1);
    assert_eq!(page.pagination.prev, 0);
    assert_eq!(page.pagination.next, 0);
    Ok(())
}

#[test]
fn test_name_ascending_lists_reverse_alphabetical() -> Result<()> {
    let service = sample_service(ServiceConfig::default())?;
    let names = list(
        &service,
        &[("sort_param", "name"), ("sort_direction", "asc"), ("limit", "2")],
    )?;
    assert_eq!(names, vec!["Sgurr Alasdair", "Schiehallion"]);
    Ok(())
}

#[test]
fn test_altitude_descending() -> Result<()> {
    let service = sample_service(ServiceConfig::default())?;
    let names = list(
        &service,
        &[("sort_param", "altitude"), ("sort_direction", "desc"), ("limit", "3")],
    )?;
    assert_eq!(names, vec!["Ben Nevis", "Ben Macdui", "Braeriach"]);
    Ok(())
}

#[test]
fn test_filtered_second_page() -> Result<()> {
    let service = sample_service(ServiceConfig::default())?;
    let page = service.list_munros(&params(&[
        ("filter", "region==Cairngorms"),
        ("limit", "2"),
        ("page", "2"),
    ]))?;

    let names: Vec<&str> = page.data.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Cairn Gorm", "Cairn Toul"]);
    assert_eq!(page.pagination.total, 4);
    assert_eq!(page.pagination.total_pages, 2);
    assert_eq!(page.pagination.prev, 1);
    assert_eq!(page.pagination.next, 0);
    Ok(())
}

#[test]
fn test_comparison_with_pattern() -> Result<()> {
    let service = sample_service(ServiceConfig::default())?;
    let names = list(
        &service,
        &[
            ("filter", "altitude>=1290,region~Cairn"),
            ("sort_param", "altitude"),
            ("sort_direction", "asc"),
        ],
    )?;
    assert_eq!(names, vec!["Cairn Toul", "Braeriach", "Ben Macdui"]);
    Ok(())
}

#[test]
fn test_fractional_literals_are_truncated_by_default() -> Result<()> {
    let truncating = sample_service(ServiceConfig::default())?;
    let page = truncating.list_munros(&params(&[("filter", "rating>=4.5")]))?;
    assert_eq!(page.pagination.total, 6);

    let exact = sample_service(ServiceConfig {
        filter: FilterOptions {
            fractional_literals: true,
            ..FilterOptions::default()
        },
        ..ServiceConfig::default()
    })?;
    let page = exact.list_munros(&params(&[("filter", "rating>=4.5")]))?;
    assert_eq!(page.pagination.total, 3);
    Ok(())
}

#[test]
fn test_unknown_operator_clauses() -> Result<()> {
    let permissive = sample_service(ServiceConfig::default())?;
    let page = permissive.list_munros(&params(&[("filter", "Ben Nevis")]))?;
    assert_eq!(page.pagination.total, 8);

    let strict = sample_service(ServiceConfig {
        filter: FilterOptions {
            reject_unknown_operators: true,
            ..FilterOptions::default()
        },
        ..ServiceConfig::default()
    })?;
    assert!(matches!(
        strict.list_munros(&params(&[("filter", "Ben Nevis")])),
        Err(ServiceError::MalformedFilter(FilterError::UnrecognizedClause { .. }))
    ));
    Ok(())
}

#[test]
fn test_malformed_filter() -> Result<()> {
    let service = sample_service(ServiceConfig::default())?;
    assert!(matches!(
        service.list_munros(&params(&[("filter", "altitude>1000>2000")])),
        Err(ServiceError::MalformedFilter(FilterError::MalformedFilterClause { .. }))
    ));
    Ok(())
}

#[test]
fn test_projection() -> Result<()> {
    let service = sample_service(ServiceConfig::default())?;
    let page = service.list_munros(&params(&[("fields", "name,altitude")]))?;

    assert!(page.data.iter().all(|m| !m.name.is_empty() && m.altitude > 0));
    assert!(page.data.iter().all(|m| m.region.is_empty() && m.routes.is_empty()));
    Ok(())
}

#[test]
fn test_required_filter_policy() -> Result<()> {
    let service = sample_service(ServiceConfig {
        filter_policy: FilterPolicy::Required,
        ..ServiceConfig::default()
    })?;

    assert!(matches!(
        service.list_munros(&ListParams::default()),
        Err(ServiceError::Pagination(PaginationError::FilterRequired))
    ));
    assert_eq!(
        service.list_munros(&params(&[("filter", "")]))?.pagination.total,
        8
    );
    Ok(())
}

#[test]
fn test_out_of_range_paging_is_normalized() -> Result<()> {
    let service = sample_service(ServiceConfig::default())?;
    let page = service.list_munros(&params(&[("page", "-4"), ("limit", "0")]))?;
    assert_eq!(page.pagination.page, 1);
    assert_eq!(page.pagination.per_page, 25);

    let page = service.list_munros(&params(&[("page", "9"), ("limit", "3")]))?;
    assert!(page.data.is_empty());
    assert_eq!(page.pagination.total_pages, 3);
    assert_eq!(page.pagination.prev, 8);
    assert_eq!(page.pagination.next, 0);
    Ok(())
}
