use crate::extract::Lookup;
use crate::resolve::{ResolvedValue, ValueType};
use crate::rule::{CheckError, Rule, Runner};
use crate::schema::BodySchema;
use ociguard_types::ids;
use tracing::debug;

const PROVIDER: &str = "oci";
const ATTRIBUTE: &str = "private_key_password";

/// The provider's private key password must come from a variable, function, or the
/// environment, never a literal.
///
/// Only the syntactic form decides. Resolution is attempted for diagnostics and its
/// failure does not abort the pass.
pub struct ProviderHardcodedKeys;

impl Rule for ProviderHardcodedKeys {
    fn name(&self) -> &'static str {
        ids::RULE_PROVIDER_HARDCODED_KEYS
    }

    fn link(&self) -> &'static str {
        "https://docs.oracle.com/en-us/iaas/Content/Security/Reference/iam_security.htm"
    }

    fn check(&self, runner: &mut Runner<'_>) -> Result<(), CheckError> {
        let schema = BodySchema::new().attribute(ATTRIBUTE);

        for provider in runner.provider_content(PROVIDER, &schema)? {
            let Lookup::Present(attr) = provider.attribute(ATTRIBUTE) else {
                continue;
            };

            let resolver = runner.resolver();
            if let ResolvedValue::Unresolved(u) = resolver.resolve(&attr.expr, ValueType::String)
            {
                debug!(range = %attr.expr.range, reason = %u.reason, "private key password not statically known");
            }

            if !resolver.references_variable(&attr.expr) {
                runner.emit(
                    ids::CODE_HARDCODED_SECRET,
                    "OCI provider has hard-coded private key password",
                    &attr.expr.range,
                );
            }
        }
        Ok(())
    }
}
