//! Stable identifiers for rules and finding codes.
//!
//! Rule ids are the snake_case names users put in `.ociguard.toml`. `code` is a short
//! discriminator for which branch of a rule produced the finding.

// Rules
pub const RULE_COMPUTE_INSTANCE_IN_TRANSIT_ENCRYPTION: &str =
    "oci_compute_instance_in_transit_encryption";
pub const RULE_COMPUTE_INSTANCE_MONITORING: &str = "oci_compute_instance_monitoring";
pub const RULE_OBJECT_STORAGE_BUCKET_PUBLIC_ACCESS: &str =
    "oci_object_storage_bucket_public_access";
pub const RULE_OBJECT_STORAGE_BUCKET_VERSIONING: &str = "oci_object_storage_bucket_versioning";
pub const RULE_NETWORK_SECURITY_GROUP_SSH: &str = "oci_network_security_group_ssh";
pub const RULE_PROVIDER_HARDCODED_KEYS: &str = "oci_provider_hardcoded_keys";

// Codes: presence/value rules
pub const CODE_MISSING_BLOCK: &str = "missing_block";
pub const CODE_MISSING_ATTRIBUTE: &str = "missing_attribute";
pub const CODE_NONCOMPLIANT_VALUE: &str = "noncompliant_value";

// Codes: oci_network_security_group_ssh
pub const CODE_SSH_OPEN_TO_WORLD: &str = "ssh_open_to_world";

// Codes: oci_provider_hardcoded_keys
pub const CODE_HARDCODED_SECRET: &str = "hardcoded_secret";

// Tool-level
pub const RULE_TOOL_RUNTIME: &str = "tool.runtime";
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
