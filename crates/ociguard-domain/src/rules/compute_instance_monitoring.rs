use super::resource_kind;
use crate::extract::Lookup;
use crate::rule::{CheckError, Rule, Runner};
use crate::schema::BodySchema;
use ociguard_types::ids;

const RESOURCE: &str = "oci_core_instance";
const BLOCK: &str = "agent_config";
const ATTRIBUTE: &str = "is_monitoring_disabled";

/// Compute instances must keep the monitoring agent plugin on.
pub struct ComputeInstanceMonitoring;

impl Rule for ComputeInstanceMonitoring {
    fn name(&self) -> &'static str {
        ids::RULE_COMPUTE_INSTANCE_MONITORING
    }

    fn link(&self) -> &'static str {
        "https://docs.oracle.com/en-us/iaas/Content/Monitoring/Concepts/monitoringoverview.htm"
    }

    fn check(&self, runner: &mut Runner<'_>) -> Result<(), CheckError> {
        let schema = BodySchema::new().block(BLOCK, BodySchema::new().attribute(ATTRIBUTE));

        for instance in runner.resource_content(RESOURCE, &schema)? {
            let message = format!(
                "OCI Compute Instance '{}' does not have monitoring enabled",
                resource_kind(&instance)
            );

            let agent_configs: Vec<_> = instance.blocks_of(BLOCK).collect();
            if agent_configs.is_empty() {
                runner.emit(ids::CODE_MISSING_BLOCK, &message, instance.def_range);
                continue;
            }

            for config in agent_configs {
                let Lookup::Present(attr) = config.attribute(ATTRIBUTE) else {
                    runner.emit(ids::CODE_MISSING_ATTRIBUTE, &message, instance.def_range);
                    continue;
                };
                // The attribute is inverted: `true` switches monitoring off.
                if runner.evaluate_bool(&attr.expr)? {
                    runner.emit(ids::CODE_NONCOMPLIANT_VALUE, &message, &attr.expr.range);
                }
            }
        }
        Ok(())
    }
}
