mod normalizer;
mod permission_expander;
mod risk_classifier;
mod scan_metadata_generator;

pub use normalizer::ApplicationNormalizer;
pub use permission_expander::PermissionExpander;
pub use risk_classifier::RiskClassifier;
pub use scan_metadata_generator::{ScanMetadataGenerator, TOOL_NAME};
