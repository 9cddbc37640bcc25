use super::resource_kind;
use crate::extract::Lookup;
use crate::rule::{CheckError, Rule, Runner};
use crate::schema::BodySchema;
use ociguard_types::ids;

const RESOURCE: &str = "oci_core_instance";
const BLOCK: &str = "launch_options";
const ATTRIBUTE: &str = "is_pv_encryption_in_transit_enabled";

/// Compute instances must encrypt boot volume traffic in transit.
pub struct ComputeInstanceInTransitEncryption;

impl Rule for ComputeInstanceInTransitEncryption {
    fn name(&self) -> &'static str {
        ids::RULE_COMPUTE_INSTANCE_IN_TRANSIT_ENCRYPTION
    }

    fn link(&self) -> &'static str {
        "https://docs.oracle.com/en-us/iaas/Content/Security/Reference/security_recommendations.htm"
    }

    fn check(&self, runner: &mut Runner<'_>) -> Result<(), CheckError> {
        let schema = BodySchema::new().block(BLOCK, BodySchema::new().attribute(ATTRIBUTE));

        for instance in runner.resource_content(RESOURCE, &schema)? {
            let launch_options: Vec<_> = instance.blocks_of(BLOCK).collect();
            if launch_options.is_empty() {
                runner.emit(
                    ids::CODE_MISSING_BLOCK,
                    "OCI Compute Instance boot volume does not have in-transit data encryption enabled",
                    instance.def_range,
                );
                continue;
            }

            let message = format!(
                "OCI Compute Instance '{}' does not have boot volume in-transit data encryption enabled",
                resource_kind(&instance)
            );
            for options in launch_options {
                let Lookup::Present(attr) = options.attribute(ATTRIBUTE) else {
                    runner.emit(ids::CODE_MISSING_ATTRIBUTE, &message, instance.def_range);
                    continue;
                };
                if !runner.evaluate_bool(&attr.expr)? {
                    runner.emit(ids::CODE_NONCOMPLIANT_VALUE, &message, &attr.expr.range);
                }
            }
        }
        Ok(())
    }
}
