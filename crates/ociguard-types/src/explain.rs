//! Explain registry for rules and finding codes.
//!
//! Maps rule IDs and codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a rule or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the rule/code.
    pub title: &'static str,
    /// What the rule checks and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after HCL examples.
    pub examples: ExamplePair,
}

/// Before and after configuration examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Configuration that would trigger a finding.
    pub before: &'static str,
    /// Configuration that passes the rule.
    pub after: &'static str,
}

/// Look up an explanation by rule id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        ids::RULE_COMPUTE_INSTANCE_IN_TRANSIT_ENCRYPTION => Some(explain_in_transit_encryption()),
        ids::RULE_COMPUTE_INSTANCE_MONITORING => Some(explain_monitoring()),
        ids::RULE_OBJECT_STORAGE_BUCKET_PUBLIC_ACCESS => Some(explain_bucket_public_access()),
        ids::RULE_OBJECT_STORAGE_BUCKET_VERSIONING => Some(explain_bucket_versioning()),
        ids::RULE_NETWORK_SECURITY_GROUP_SSH => Some(explain_nsg_ssh()),
        ids::RULE_PROVIDER_HARDCODED_KEYS => Some(explain_provider_hardcoded_keys()),

        ids::CODE_MISSING_BLOCK => Some(explain_missing_block()),
        ids::CODE_MISSING_ATTRIBUTE => Some(explain_missing_attribute()),
        ids::CODE_NONCOMPLIANT_VALUE => Some(explain_noncompliant_value()),
        ids::CODE_SSH_OPEN_TO_WORLD => Some(explain_nsg_ssh()),
        ids::CODE_HARDCODED_SECRET => Some(explain_provider_hardcoded_keys()),

        _ => None,
    }
}

/// List all known rule IDs.
pub fn all_rule_ids() -> &'static [&'static str] {
    &[
        ids::RULE_COMPUTE_INSTANCE_IN_TRANSIT_ENCRYPTION,
        ids::RULE_COMPUTE_INSTANCE_MONITORING,
        ids::RULE_OBJECT_STORAGE_BUCKET_PUBLIC_ACCESS,
        ids::RULE_OBJECT_STORAGE_BUCKET_VERSIONING,
        ids::RULE_NETWORK_SECURITY_GROUP_SSH,
        ids::RULE_PROVIDER_HARDCODED_KEYS,
    ]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_MISSING_BLOCK,
        ids::CODE_MISSING_ATTRIBUTE,
        ids::CODE_NONCOMPLIANT_VALUE,
        ids::CODE_SSH_OPEN_TO_WORLD,
        ids::CODE_HARDCODED_SECRET,
    ]
}

// --- Rule-level explanations ---

fn explain_in_transit_encryption() -> Explanation {
    Explanation {
        title: "Compute Boot Volume In-Transit Encryption",
        description: "\
Detects `oci_core_instance` resources whose boot volume does not encrypt data in transit
between the instance and the block volume service.

Paravirtualized attachments only encrypt in-transit traffic when
`launch_options.is_pv_encryption_in_transit_enabled` is `true`. Leaving it unset falls back
to the image default, which is commonly unencrypted.",
        remediation: "\
Add a `launch_options` block and set `is_pv_encryption_in_transit_enabled = true`.
Every `launch_options` block on the instance is checked independently.",
        examples: ExamplePair {
            before: r#"resource "oci_core_instance" "app" {
  shape = "VM.Standard2.1"
}"#,
            after: r#"resource "oci_core_instance" "app" {
  shape = "VM.Standard2.1"

  launch_options {
    is_pv_encryption_in_transit_enabled = true
  }
}"#,
        },
    }
}

fn explain_monitoring() -> Explanation {
    Explanation {
        title: "Compute Instance Monitoring",
        description: "\
Detects `oci_core_instance` resources that do not run the monitoring agent plugin.

Monitoring is governed by `agent_config.is_monitoring_disabled`. The rule requires the
`agent_config` block to exist and the attribute to be explicitly `false`, so that metrics
collection does not silently depend on provider defaults.",
        remediation: "\
Add an `agent_config` block with `is_monitoring_disabled = false`.",
        examples: ExamplePair {
            before: r#"resource "oci_core_instance" "app" {
  agent_config {
    is_monitoring_disabled = true
  }
}"#,
            after: r#"resource "oci_core_instance" "app" {
  agent_config {
    is_monitoring_disabled = false
  }
}"#,
        },
    }
}

fn explain_bucket_public_access() -> Explanation {
    Explanation {
        title: "Object Storage Bucket Public Access",
        description: "\
Detects `oci_objectstorage_bucket` resources that allow anonymous reads.

Any `access_type` other than `NoPublicAccess` (for example `ObjectRead` or
`ObjectReadWithoutList`) exposes objects to the internet. Omitting `access_type` is also
flagged: the intent should be stated explicitly.",
        remediation: "\
Set `access_type = \"NoPublicAccess\"` and serve public content through pre-authenticated
requests or a CDN instead.",
        examples: ExamplePair {
            before: r#"resource "oci_objectstorage_bucket" "assets" {
  access_type = "ObjectRead"
}"#,
            after: r#"resource "oci_objectstorage_bucket" "assets" {
  access_type = "NoPublicAccess"
}"#,
        },
    }
}

fn explain_bucket_versioning() -> Explanation {
    Explanation {
        title: "Object Storage Bucket Versioning",
        description: "\
Detects `oci_objectstorage_bucket` resources without object versioning.

Without versioning an overwrite or delete is unrecoverable. The rule requires
`versioning = \"Enabled\"`; `Disabled` or an omitted attribute are both flagged.",
        remediation: "\
Set `versioning = \"Enabled\"` and pair it with a lifecycle policy to expire old versions.",
        examples: ExamplePair {
            before: r#"resource "oci_objectstorage_bucket" "backups" {
  versioning = "Disabled"
}"#,
            after: r#"resource "oci_objectstorage_bucket" "backups" {
  versioning = "Enabled"
}"#,
        },
    }
}

fn explain_nsg_ssh() -> Explanation {
    Explanation {
        title: "Network Security Group SSH Exposure",
        description: "\
Detects `oci_core_network_security_group_security_rule` resources that admit SSH (TCP port 22)
from `0.0.0.0/0`.

A rule is considered exposed when it is an `INGRESS` rule, its `source` is `0.0.0.0/0`, its
`protocol` is `6` (TCP) or `all`, and any `tcp_options.destination_port_range` includes 22.
One finding is reported per offending port range.",
        remediation: "\
Restrict `source` to a bastion or corporate CIDR, or use the OCI Bastion service instead of
direct SSH ingress.",
        examples: ExamplePair {
            before: r#"resource "oci_core_network_security_group_security_rule" "ssh" {
  direction = "INGRESS"
  source    = "0.0.0.0/0"
  protocol  = "6"

  tcp_options {
    destination_port_range {
      min = 22
      max = 22
    }
  }
}"#,
            after: r#"resource "oci_core_network_security_group_security_rule" "ssh" {
  direction = "INGRESS"
  source    = "10.0.0.0/16"
  protocol  = "6"

  tcp_options {
    destination_port_range {
      min = 22
      max = 22
    }
  }
}"#,
        },
    }
}

fn explain_provider_hardcoded_keys() -> Explanation {
    Explanation {
        title: "Provider Hard-coded Private Key Password",
        description: "\
Detects `provider \"oci\"` blocks whose `private_key_password` is a literal.

A literal lands in version control and in plan output. Any expression that references a
variable or function is treated as parameterized; the rule does not verify where that
parameter comes from.",
        remediation: "\
Reference a sensitive variable (`var.private_key_password`) or read it from the environment
(`TF_VAR_private_key_password`), or drop the attribute and rely on the OCI config file.",
        examples: ExamplePair {
            before: r#"provider "oci" {
  private_key_password = "hunter2"
}"#,
            after: r#"provider "oci" {
  private_key_password = var.private_key_password
}"#,
        },
    }
}

// --- Code-level explanations ---

fn explain_missing_block() -> Explanation {
    Explanation {
        title: "Missing Configuration Block",
        description: "\
The nested block that governs a security property is absent from the resource, so the
property falls back to an unverified default.",
        remediation: "\
Add the nested block named in the finding and set its governing attribute explicitly.
Run `ociguard explain <rule_id>` for the rule-specific block.",
        examples: ExamplePair {
            before: r#"resource "oci_core_instance" "app" {
}"#,
            after: r#"resource "oci_core_instance" "app" {
  agent_config {
    is_monitoring_disabled = false
  }
}"#,
        },
    }
}

fn explain_missing_attribute() -> Explanation {
    Explanation {
        title: "Missing Governing Attribute",
        description: "\
The attribute that governs a security property is not set, so the property falls back to
an unverified default.",
        remediation: "\
Set the attribute named in the rule explicitly to its compliant value.",
        examples: ExamplePair {
            before: r#"resource "oci_objectstorage_bucket" "b" {
  name = "b"
}"#,
            after: r#"resource "oci_objectstorage_bucket" "b" {
  name       = "b"
  versioning = "Enabled"
}"#,
        },
    }
}

fn explain_noncompliant_value() -> Explanation {
    Explanation {
        title: "Non-compliant Attribute Value",
        description: "\
The governing attribute is set, and resolves to a value that disables the security
property. The finding points at the offending expression.",
        remediation: "\
Change the value to the compliant one, or change the variable default it resolves from.",
        examples: ExamplePair {
            before: r#"resource "oci_objectstorage_bucket" "b" {
  access_type = "ObjectRead"
}"#,
            after: r#"resource "oci_objectstorage_bucket" "b" {
  access_type = "NoPublicAccess"
}"#,
        },
    }
}
