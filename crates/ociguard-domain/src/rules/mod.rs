use crate::extract::ExtractedBlock;
use crate::rule::Rule;

mod compute_instance_in_transit_encryption;
mod compute_instance_monitoring;
mod network_security_group_ssh;
mod object_storage_bucket_public_access;
mod object_storage_bucket_versioning;
mod provider_hardcoded_keys;


pub use compute_instance_in_transit_encryption::ComputeInstanceInTransitEncryption;
pub use compute_instance_monitoring::ComputeInstanceMonitoring;
pub use network_security_group_ssh::NetworkSecurityGroupSsh;
pub use object_storage_bucket_public_access::ObjectStorageBucketPublicAccess;
pub use object_storage_bucket_versioning::ObjectStorageBucketVersioning;
pub use provider_hardcoded_keys::ProviderHardcodedKeys;

/// Every shipped rule, in evaluation order.
pub fn all() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(ComputeInstanceInTransitEncryption),
        Box::new(ComputeInstanceMonitoring),
        Box::new(ObjectStorageBucketPublicAccess),
        Box::new(ObjectStorageBucketVersioning),
        Box::new(NetworkSecurityGroupSsh),
        Box::new(ProviderHardcodedKeys),
    ]
}

/// First label of a resource block: its resource kind, used in messages.
fn resource_kind<'a>(block: &ExtractedBlock<'a>) -> &'a str {
    block.first_label().unwrap_or_default()
}
