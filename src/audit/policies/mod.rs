/// Versioned policy values the classifier evaluates against
mod risk_policy;

pub use risk_policy::{
    RiskPolicy, CUSTOM_POLICY_VERSION, DEFAULT_EXPIRY_THRESHOLD_DAYS, GRAPH_RESOURCE_NAME,
    POLICY_VERSION,
};
