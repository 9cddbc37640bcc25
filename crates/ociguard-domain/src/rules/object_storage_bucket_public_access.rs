use super::resource_kind;
use crate::extract::Lookup;
use crate::rule::{CheckError, Rule, Runner};
use crate::schema::BodySchema;
use ociguard_types::ids;

const RESOURCE: &str = "oci_objectstorage_bucket";
const ATTRIBUTE: &str = "access_type";
const COMPLIANT: &str = "NoPublicAccess";

/// Buckets must say `access_type = "NoPublicAccess"` out loud.
pub struct ObjectStorageBucketPublicAccess;

impl Rule for ObjectStorageBucketPublicAccess {
    fn name(&self) -> &'static str {
        ids::RULE_OBJECT_STORAGE_BUCKET_PUBLIC_ACCESS
    }

    fn link(&self) -> &'static str {
        "https://docs.oracle.com/en-us/iaas/Content/Security/Reference/objectstorage_security.htm"
    }

    fn check(&self, runner: &mut Runner<'_>) -> Result<(), CheckError> {
        let schema = BodySchema::new().attribute(ATTRIBUTE);

        for bucket in runner.resource_content(RESOURCE, &schema)? {
            let kind = resource_kind(&bucket);
            let Lookup::Present(attr) = bucket.attribute(ATTRIBUTE) else {
                runner.emit(
                    ids::CODE_MISSING_ATTRIBUTE,
                    format!(
                        "OCI Object Storage Bucket '{kind}' does not explicitly set access_type to NoPublicAccess"
                    ),
                    bucket.def_range,
                );
                continue;
            };

            if runner.evaluate_string(&attr.expr)? != COMPLIANT {
                runner.emit(
                    ids::CODE_NONCOMPLIANT_VALUE,
                    format!("OCI Object Storage Bucket '{kind}' is publicly accessible"),
                    &attr.expr.range,
                );
            }
        }
        Ok(())
    }
}
