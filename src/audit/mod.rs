//! Audit domain: value objects, the risk policy and the pure services that
//! normalize, expand and classify application registrations.
pub mod domain;
pub mod policies;
pub mod services;
