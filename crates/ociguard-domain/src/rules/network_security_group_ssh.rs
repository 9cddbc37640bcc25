use super::resource_kind;
use crate::extract::{ExtractedBlock, Lookup};
use crate::rule::{CheckError, Rule, Runner};
use crate::schema::BodySchema;
use ociguard_types::ids;

const RESOURCE: &str = "oci_core_network_security_group_security_rule";
const SSH_PORT: i64 = 22;
const INGRESS: &str = "INGRESS";
const ANYWHERE: &str = "0.0.0.0/0";
/// IANA protocol number for TCP, and the catch-all.
const TCP_PROTOCOLS: [&str; 2] = ["6", "all"];

/// Ingress rules must not open port 22 to the whole internet.
///
/// Every offending `destination_port_range` yields its own finding, all anchored on the
/// security rule block.
pub struct NetworkSecurityGroupSsh;

impl Rule for NetworkSecurityGroupSsh {
    fn name(&self) -> &'static str {
        ids::RULE_NETWORK_SECURITY_GROUP_SSH
    }

    fn link(&self) -> &'static str {
        "https://docs.oracle.com/en-us/iaas/Content/Security/Reference/networksecurity_topic.htm"
    }

    fn check(&self, runner: &mut Runner<'_>) -> Result<(), CheckError> {
        let schema = BodySchema::new()
            .attributes(["direction", "source", "protocol"])
            .block(
                "tcp_options",
                BodySchema::new().block(
                    "destination_port_range",
                    BodySchema::new().attributes(["min", "max"]),
                ),
            );

        for rule in runner.resource_content(RESOURCE, &schema)? {
            if !gate(runner, &rule, "direction", |d| d == INGRESS)?
                || !gate(runner, &rule, "source", |s| s == ANYWHERE)?
                || !gate(runner, &rule, "protocol", |p| TCP_PROTOCOLS.contains(&p))?
            {
                continue;
            }

            let message = format!(
                "OCI Security Group rule '{}' allows unrestricted ingress access to port {SSH_PORT}",
                resource_kind(&rule)
            );
            for tcp in rule.blocks_of("tcp_options") {
                for range in tcp.blocks_of("destination_port_range") {
                    let (Lookup::Present(min), Lookup::Present(max)) =
                        (range.attribute("min"), range.attribute("max"))
                    else {
                        continue;
                    };
                    let min = runner.evaluate_int(&min.expr)?;
                    let max = runner.evaluate_int(&max.expr)?;
                    if (min..=max).contains(&SSH_PORT) {
                        runner.emit(ids::CODE_SSH_OPEN_TO_WORLD, &message, rule.def_range);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Absent gating attribute means the rule is not evaluable, which is a skip.
fn gate(
    runner: &Runner<'_>,
    block: &ExtractedBlock<'_>,
    name: &str,
    accept: impl Fn(&str) -> bool,
) -> Result<bool, CheckError> {
    match block.attribute(name) {
        Lookup::Present(attr) => Ok(accept(&runner.evaluate_string(&attr.expr)?)),
        Lookup::Missing | Lookup::NotRequested => Ok(false),
    }
}
