//! Rule scenarios over real HCL text: exact messages and source ranges.

use ociguard_domain::emit::RuleStamp;
use ociguard_domain::resolve::StaticResolver;
use ociguard_domain::rule::{CheckError, Rule, Runner};
use ociguard_domain::rules::{
    ComputeInstanceInTransitEncryption, ComputeInstanceMonitoring, NetworkSecurityGroupSsh,
    ObjectStorageBucketPublicAccess, ObjectStorageBucketVersioning, ProviderHardcodedKeys,
};
use ociguard_hcl::{build_context, parse_document};
use ociguard_types::{Finding, RepoPath};
use std::collections::BTreeMap;

type Span = (u32, u32, u32, u32);

struct Case {
    name: &'static str,
    content: &'static str,
    expected: Vec<(&'static str, Span)>,
}

fn run(rule: &dyn Rule, file: &str, content: &str) -> Result<Vec<Finding>, CheckError> {
    let doc = parse_document(&RepoPath::new(file), content).expect("parse");
    let ctx = build_context(std::slice::from_ref(&doc), &BTreeMap::new());
    let resolver = StaticResolver::new(&ctx);
    let stamp = RuleStamp {
        id: rule.name(),
        severity: rule.severity(),
        link: rule.link(),
    };
    let mut runner = Runner::new(&doc, &resolver, stamp);
    rule.check(&mut runner)?;
    Ok(runner.into_findings())
}

fn assert_cases(rule: &dyn Rule, file: &str, cases: Vec<Case>) {
    for case in cases {
        let findings = run(rule, file, case.content)
            .unwrap_or_else(|e| panic!("{}: unexpected error: {e}", case.name));
        let actual: Vec<(&str, Span)> = findings
            .iter()
            .map(|f| (f.message.as_str(), f.range.span()))
            .collect();
        assert_eq!(actual, case.expected, "{}", case.name);
        for f in &findings {
            assert_eq!(f.range.filename.as_str(), file, "{}", case.name);
            assert_eq!(f.rule_id, rule.name(), "{}", case.name);
        }
    }
}

const ENCRYPTION_NAMED: &str =
    "OCI Compute Instance 'oci_core_instance' does not have boot volume in-transit data encryption enabled";

#[test]
fn compute_instance_in_transit_encryption() {
    let cases = vec![
        Case {
            name: "no launch_options block",
            content: r#"
resource "oci_core_instance" "instance" {
  availability_domain = "ad1"
  compartment_id      = "ocid1.compartment.oc1..unique_id"
  shape               = "VM.Standard2.1"
}"#,
            expected: vec![(
                "OCI Compute Instance boot volume does not have in-transit data encryption enabled",
                (2, 1, 2, 40),
            )],
        },
        Case {
            name: "missing is_pv_encryption_in_transit_enabled attribute",
            content: r#"
resource "oci_core_instance" "instance" {
  availability_domain = "ad1"
  compartment_id      = "ocid1.compartment.oc1..unique_id"
  shape               = "VM.Standard2.1"
  
  launch_options {
    network_type = "VFIO"
  }
}"#,
            expected: vec![(ENCRYPTION_NAMED, (2, 1, 2, 40))],
        },
        Case {
            name: "is_pv_encryption_in_transit_enabled is false",
            content: r#"
resource "oci_core_instance" "instance" {
  availability_domain = "ad1"
  compartment_id      = "ocid1.compartment.oc1..unique_id"
  shape               = "VM.Standard2.1"
  
  launch_options {
    is_pv_encryption_in_transit_enabled = false
  }
}"#,
            expected: vec![(ENCRYPTION_NAMED, (8, 43, 8, 48))],
        },
        Case {
            name: "is_pv_encryption_in_transit_enabled is true",
            content: r#"
resource "oci_core_instance" "instance" {
  availability_domain = "ad1"
  compartment_id      = "ocid1.compartment.oc1..unique_id"
  shape               = "VM.Standard2.1"
  
  launch_options {
    is_pv_encryption_in_transit_enabled = true
  }
}"#,
            expected: vec![],
        },
        Case {
            name: "multiple instances with different configurations",
            content: r#"
resource "oci_core_instance" "compliant_instance" {
  availability_domain = "ad1"
  compartment_id      = "ocid1.compartment.oc1..unique_id"
  shape               = "VM.Standard2.1"
  
  launch_options {
    is_pv_encryption_in_transit_enabled = true
  }
}

resource "oci_core_instance" "non_compliant_instance" {
  availability_domain = "ad1"
  compartment_id      = "ocid1.compartment.oc1..unique_id"
  shape               = "VM.Standard2.1"
  
  launch_options {
    is_pv_encryption_in_transit_enabled = false
  }
}"#,
            expected: vec![(ENCRYPTION_NAMED, (18, 43, 18, 48))],
        },
    ];
    assert_cases(&ComputeInstanceInTransitEncryption, "main.tf", cases);
}

const MONITORING: &str = "OCI Compute Instance 'oci_core_instance' does not have monitoring enabled";

#[test]
fn compute_instance_monitoring() {
    let cases = vec![
        Case {
            name: "no agent_config block",
            content: r#"
resource "oci_core_instance" "instance1" {
  availability_domain = "example-ad"
  compartment_id      = "ocid1.compartment.oc1..example"
  shape               = "VM.Standard2.1"
}"#,
            expected: vec![(MONITORING, (2, 1, 2, 41))],
        },
        Case {
            name: "agent_config exists but is_monitoring_disabled not set",
            content: r#"
resource "oci_core_instance" "instance2" {
  availability_domain = "example-ad"
  compartment_id      = "ocid1.compartment.oc1..example"
  shape               = "VM.Standard2.1"
  
  agent_config {
    is_management_disabled = false
  }
}"#,
            expected: vec![(MONITORING, (2, 1, 2, 41))],
        },
        Case {
            name: "monitoring disabled",
            content: r#"
resource "oci_core_instance" "instance3" {
  availability_domain = "example-ad"
  compartment_id      = "ocid1.compartment.oc1..example"
  shape               = "VM.Standard2.1"
  
  agent_config {
    is_monitoring_disabled = true
  }
}"#,
            expected: vec![(MONITORING, (8, 30, 8, 34))],
        },
        Case {
            name: "monitoring enabled",
            content: r#"
resource "oci_core_instance" "instance4" {
  availability_domain = "example-ad"
  compartment_id      = "ocid1.compartment.oc1..example"
  shape               = "VM.Standard2.1"
  
  agent_config {
    is_monitoring_disabled = false
  }
}"#,
            expected: vec![],
        },
        Case {
            name: "multiple instances with different configurations",
            content: r#"
resource "oci_core_instance" "instance5" {
  availability_domain = "example-ad"
  compartment_id      = "ocid1.compartment.oc1..example"
  shape               = "VM.Standard2.1"
}

resource "oci_core_instance" "instance6" {
  availability_domain = "example-ad"
  compartment_id      = "ocid1.compartment.oc1..example"
  shape               = "VM.Standard2.1"
  
  agent_config {
    is_monitoring_disabled = false
  }
}

resource "oci_core_instance" "instance7" {
  availability_domain = "example-ad"
  compartment_id      = "ocid1.compartment.oc1..example"
  shape               = "VM.Standard2.1"
  
  agent_config {
    is_monitoring_disabled = true
  }
}"#,
            expected: vec![(MONITORING, (2, 1, 2, 41)), (MONITORING, (24, 30, 24, 34))],
        },
    ];
    assert_cases(&ComputeInstanceMonitoring, "main.tf", cases);
}

const PUBLIC: &str = "OCI Object Storage Bucket 'oci_objectstorage_bucket' is publicly accessible";

#[test]
fn object_storage_bucket_public_access() {
    let cases = vec![
        Case {
            name: "ObjectRead is public",
            content: r#"
resource "oci_objectstorage_bucket" "test" {
	access_type = "ObjectRead"
}"#,
            expected: vec![(PUBLIC, (3, 16, 3, 28))],
        },
        Case {
            name: "ObjectReadWithoutList is public",
            content: r#"
resource "oci_objectstorage_bucket" "test" {
	access_type = "ObjectReadWithoutList"
}"#,
            expected: vec![(PUBLIC, (3, 16, 3, 39))],
        },
        Case {
            name: "NoPublicAccess is private",
            content: r#"
resource "oci_objectstorage_bucket" "test" {
	access_type = "NoPublicAccess"
}"#,
            expected: vec![],
        },
        Case {
            name: "missing access_type",
            content: r#"
resource "oci_objectstorage_bucket" "test" {
	# access_type not specified
}"#,
            expected: vec![(
                "OCI Object Storage Bucket 'oci_objectstorage_bucket' does not explicitly set access_type to NoPublicAccess",
                (2, 1, 2, 43),
            )],
        },
        Case {
            name: "variable for access_type",
            content: r#"
variable "access_type" {
	default = "ObjectRead"
}

resource "oci_objectstorage_bucket" "test" {
	access_type = var.access_type
}"#,
            expected: vec![(PUBLIC, (7, 16, 7, 31))],
        },
    ];
    assert_cases(&ObjectStorageBucketPublicAccess, "main.tf", cases);
}

const VERSIONING: &str =
    "OCI Object Storage Bucket 'oci_objectstorage_bucket' does not have object versioning enabled";

#[test]
fn object_storage_bucket_versioning() {
    let cases = vec![
        Case {
            name: "versioning enabled",
            content: r#"
resource "oci_objectstorage_bucket" "test" {
  name       = "test_bucket"
  versioning = "Enabled"
}"#,
            expected: vec![],
        },
        Case {
            name: "versioning not enabled",
            content: r#"
resource "oci_objectstorage_bucket" "test" {
  name       = "test_bucket"
  versioning = "Disabled"
}"#,
            expected: vec![(VERSIONING, (4, 16, 4, 26))],
        },
        Case {
            name: "versioning attribute missing",
            content: r#"
resource "oci_objectstorage_bucket" "test" {
  name = "test_bucket"
}"#,
            expected: vec![(VERSIONING, (2, 1, 2, 43))],
        },
    ];
    assert_cases(&ObjectStorageBucketVersioning, "main.tf", cases);
}

const SSH: &str = "OCI Security Group rule 'oci_core_network_security_group_security_rule' allows unrestricted ingress access to port 22";

fn security_rule(direction: &str, source: &str, protocol: &str, ranges: &[(i64, i64)]) -> String {
    let mut out = format!(
        "\nresource \"oci_core_network_security_group_security_rule\" \"test\" {{\n\tdirection = \"{direction}\"\n\tsource = \"{source}\"\n\tprotocol = \"{protocol}\"\n\t\n\ttcp_options {{\n"
    );
    for (min, max) in ranges {
        out.push_str(&format!(
            "\t\tdestination_port_range {{\n\t\t\tmin = {min}\n\t\t\tmax = {max}\n\t\t}}\n\t\t\n"
        ));
    }
    out.push_str("\t}\n}");
    out
}

#[test]
fn network_security_group_ssh() {
    let rule = NetworkSecurityGroupSsh;
    let check = |content: &str| -> Vec<(String, Span)> {
        run(&rule, "main.tf", content)
            .expect("check")
            .into_iter()
            .map(|f| (f.message, f.range.span()))
            .collect()
    };
    let open = vec![(SSH.to_string(), (2, 1, 2, 64))];

    let commented = r#"
resource "oci_core_network_security_group_security_rule" "test" {
	direction = "INGRESS"
	source = "0.0.0.0/0"
	protocol = "6"  # TCP
	
	tcp_options {
		destination_port_range {
			min = 22
			max = 22
		}
	}
}"#;
    assert_eq!(check(commented), open, "SSH port open to 0.0.0.0/0");

    assert_eq!(
        check(&security_rule("INGRESS", "0.0.0.0/0", "6", &[(20, 30)])),
        open,
        "SSH port in wider range"
    );
    assert_eq!(
        check(&security_rule("INGRESS", "0.0.0.0/0", "all", &[(22, 22)])),
        open,
        "all protocols open"
    );
    assert_eq!(
        check(&security_rule("INGRESS", "0.0.0.0/0", "6", &[(80, 443), (20, 25)])),
        open,
        "multiple port ranges with one including 22"
    );

    for (name, content) in [
        ("not ingress", security_rule("EGRESS", "0.0.0.0/0", "6", &[(22, 22)])),
        ("not 0.0.0.0/0 source", security_rule("INGRESS", "10.0.0.0/8", "6", &[(22, 22)])),
        ("not TCP", security_rule("INGRESS", "0.0.0.0/0", "17", &[(22, 22)])),
        ("range excludes 22", security_rule("INGRESS", "0.0.0.0/0", "6", &[(80, 443)])),
    ] {
        assert!(check(&content).is_empty(), "{name}");
    }

    let twice = check(&security_rule("INGRESS", "0.0.0.0/0", "6", &[(22, 22), (1, 1024)]));
    assert_eq!(twice, vec![open[0].clone(), open[0].clone()], "one finding per range");
}

#[test]
fn provider_hardcoded_keys() {
    let cases = vec![
        Case {
            name: "hardcoded key password",
            content: r#"
provider "oci" {
  private_key_password = "hardcoded_password"
}"#,
            expected: vec![(
                "OCI provider has hard-coded private key password",
                (3, 26, 3, 46),
            )],
        },
        Case {
            name: "no hardcoded key password",
            content: r#"
provider "oci" {
}"#,
            expected: vec![],
        },
        Case {
            name: "password from variable",
            content: r#"
variable "key_password" {}

provider "oci" {
  private_key_password = var.key_password
}"#,
            expected: vec![],
        },
        Case {
            name: "password from file",
            content: r#"
provider "oci" {
  private_key_password = trimspace(file("~/.oci/pw"))
}"#,
            expected: vec![],
        },
        Case {
            name: "other provider",
            content: r#"
provider "aws" {
  private_key_password = "not-ours"
}"#,
            expected: vec![],
        },
    ];
    assert_cases(&ProviderHardcodedKeys, "provider.tf", cases);
}

#[test]
fn unresolved_variable_is_a_fault_not_a_pass() {
    let content = r#"
variable "access_type" {}

resource "oci_objectstorage_bucket" "test" {
  access_type = var.access_type
}"#;
    match run(&ObjectStorageBucketPublicAccess, "main.tf", content) {
        Err(CheckError::Unresolved { range, reason, .. }) => {
            assert_eq!(range.span(), (5, 17, 5, 32));
            assert!(reason.contains("var.access_type"), "{reason}");
        }
        other => panic!("expected unresolved fault, got {other:?}"),
    }
}

#[test]
fn interpolated_value_resolves_through_locals() {
    let content = r#"
locals {
  mode = "Enabled"
}

resource "oci_objectstorage_bucket" "test" {
  versioning = "${local.mode}"
}"#;
    let findings = run(&ObjectStorageBucketVersioning, "main.tf", content).expect("check");
    assert!(findings.is_empty());
}
