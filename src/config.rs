//! Service configuration shared by the library and the binary.

use crate::filter::FilterOptions;
use crate::pagination::FilterPolicy;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8080;

/// Default cap on in-flight requests
pub const DEFAULT_MAX_CONNECTIONS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Whether list requests must carry a `filter` parameter
    pub filter_policy: FilterPolicy,
    pub filter: FilterOptions,
    pub max_connections: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            filter_policy: FilterPolicy::Optional,
            filter: FilterOptions::default(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}
