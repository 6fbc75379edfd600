/// Network adapters for the identity directory API
mod caching_service_principal_repository;
mod graph_client;

pub use caching_service_principal_repository::CachingServicePrincipalRepository;
pub use graph_client::{
    GraphClient, GraphClientConfig, DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_SECONDARY_ENDPOINT,
};
