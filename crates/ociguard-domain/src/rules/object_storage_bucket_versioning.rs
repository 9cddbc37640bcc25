use super::resource_kind;
use crate::extract::Lookup;
use crate::rule::{CheckError, Rule, Runner};
use crate::schema::BodySchema;
use ociguard_types::ids;

const RESOURCE: &str = "oci_objectstorage_bucket";
const ATTRIBUTE: &str = "versioning";
const COMPLIANT: &str = "Enabled";

/// Buckets must have `versioning = "Enabled"`.
pub struct ObjectStorageBucketVersioning;

impl Rule for ObjectStorageBucketVersioning {
    fn name(&self) -> &'static str {
        ids::RULE_OBJECT_STORAGE_BUCKET_VERSIONING
    }

    fn link(&self) -> &'static str {
        "https://docs.oracle.com/en-us/iaas/Content/Object/Tasks/usingversioning.htm"
    }

    fn check(&self, runner: &mut Runner<'_>) -> Result<(), CheckError> {
        let schema = BodySchema::new().attribute(ATTRIBUTE);

        for bucket in runner.resource_content(RESOURCE, &schema)? {
            let message = format!(
                "OCI Object Storage Bucket '{}' does not have object versioning enabled",
                resource_kind(&bucket)
            );
            match bucket.attribute(ATTRIBUTE) {
                Lookup::Present(attr) => {
                    if runner.evaluate_string(&attr.expr)? != COMPLIANT {
                        runner.emit(ids::CODE_NONCOMPLIANT_VALUE, message, &attr.expr.range);
                    }
                }
                Lookup::Missing | Lookup::NotRequested => {
                    runner.emit(ids::CODE_MISSING_ATTRIBUTE, message, bucket.def_range);
                }
            }
        }
        Ok(())
    }
}
