//! CLI entry point for ociguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, logging setup, and exit
//! codes. All business logic lives in the `ociguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use ociguard_app::{
    format_rule_listing, list_rules, parse_report_json, render_annotations, render_markdown,
    render_text, report_exit_code, run_check, run_explain, runtime_error_report,
    serialize_report, to_renderable, CheckInput, ExplainOutput,
};
use ociguard_settings::Overrides;
use ociguard_types::ReportEnvelope;
use std::collections::BTreeMap;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "ociguard",
    version,
    about = "Security best-practice checks for OCI Terraform configurations"
)]
struct Cli {
    /// Directory scanned for `*.tf` files.
    #[arg(long, default_value = ".", global = true)]
    root: Utf8PathBuf,

    /// Path to ociguard config TOML (relative paths resolve against --root).
    #[arg(long, default_value = ".ociguard.toml", global = true)]
    config: Utf8PathBuf,

    /// Override profile (strict|warn).
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Override maximum findings to emit.
    #[arg(long, global = true)]
    max_findings: Option<u32>,

    /// Log at debug level (otherwise `OCIGUARD_LOG`, default `warn`).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate the rules and write artifacts.
    Check {
        /// Set a Terraform variable (`name=value`); wins over config and `variable` defaults.
        #[arg(long = "var", value_parser = parse_var)]
        vars: Vec<(String, String)>,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/ociguard/report.json")]
        report_out: Utf8PathBuf,

        /// What to print on stdout.
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/ociguard/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        #[arg(long, default_value = "artifacts/ociguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        #[arg(long, default_value = "artifacts/ociguard/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Explain a rule id or finding code with remediation guidance.
    Explain {
        /// The rule id (e.g. "oci_network_security_group_ssh") or code (e.g. "hardcoded_secret").
        identifier: String,
    },

    /// List rules with their effective enabled flag, severity, and reference link.
    Rules,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Commands::Check {
            ref vars,
            ref report_out,
            format,
            write_markdown,
            ref markdown_out,
        } => cmd_check(&cli, vars, report_out, format, write_markdown, markdown_out),
        Commands::Md {
            ref report,
            ref output,
        } => cmd_md(report, output.as_deref()),
        Commands::Annotations { ref report, max } => cmd_annotations(report, max),
        Commands::Explain { ref identifier } => cmd_explain(identifier),
        Commands::Rules => cmd_rules(&cli),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("OCIGUARD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn parse_var(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected name=value, got `{s}`")),
    }
}

fn overrides(cli: &Cli, vars: &[(String, String)]) -> Overrides {
    Overrides {
        profile: cli.profile.clone(),
        max_findings: cli.max_findings,
        variables: vars.iter().cloned().collect::<BTreeMap<_, _>>(),
    }
}

/// Missing config file is allowed (defaults apply); any other read failure is an error.
fn read_config(root: &Utf8Path, config: &Utf8Path) -> anyhow::Result<String> {
    let path = root.join(config);
    match std::fs::read_to_string(&path) {
        Ok(text) => {
            debug!(config = %path, "loaded config");
            Ok(text)
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(config = %path, "no config file, using defaults");
            Ok(String::new())
        }
        Err(err) => Err(err).with_context(|| format!("read config: {}", path)),
    }
}

fn cmd_check(
    cli: &Cli,
    vars: &[(String, String)],
    report_out: &Utf8Path,
    format: OutputFormat,
    write_markdown: bool,
    markdown_out: &Utf8Path,
) -> anyhow::Result<()> {
    let root = cli
        .root
        .canonicalize_utf8()
        .unwrap_or_else(|_| cli.root.clone());

    let result = (|| -> anyhow::Result<i32> {
        if !root.is_dir() {
            anyhow::bail!("root is not a directory: {}", root);
        }
        let cfg_text = read_config(&root, &cli.config)?;

        let output = run_check(CheckInput {
            repo_root: &root,
            config_text: &cfg_text,
            overrides: overrides(cli, vars),
        })?;

        write_report_file(report_out, &output.report).context("write report json")?;

        let renderable = to_renderable(&output.report);
        if write_markdown {
            let md = render_markdown(&renderable);
            write_text_file(markdown_out, &md).context("write markdown")?;
        }

        match format {
            OutputFormat::Text => print!("{}", render_text(&renderable)),
            OutputFormat::Json => {
                let data = serialize_report(&output.report)?;
                println!("{}", String::from_utf8_lossy(&data));
            }
        }

        Ok(report_exit_code(&output.report))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let report = runtime_error_report(&format!("{err:#}"));
            let _ = write_report_file(report_out, &report);
            eprintln!("ociguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn write_report_file(path: &Utf8Path, report: &ReportEnvelope) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    let data = serialize_report(report).context("serialize report")?;
    std::fs::write(path, data).with_context(|| format!("write report: {}", path))?;
    Ok(())
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, text).with_context(|| format!("write text: {}", path))?;
    Ok(())
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;
    let md = render_markdown(&to_renderable(&report));

    if let Some(out_path) = output {
        write_text_file(out_path, &md).context("write markdown output")?;
    } else {
        print!("{}", md);
    }

    Ok(())
}

fn cmd_annotations(report_path: &Utf8Path, max: usize) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;

    for annotation in render_annotations(&to_renderable(&report), max) {
        println!("{}", annotation);
    }

    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", ociguard_app::format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_rule_ids,
            available_codes,
        } => {
            eprint!(
                "{}",
                ociguard_app::format_not_found(&identifier, available_rule_ids, available_codes)
            );
            std::process::exit(1);
        }
    }
}

fn cmd_rules(cli: &Cli) -> anyhow::Result<()> {
    let cfg_text = read_config(&cli.root, &cli.config)?;
    let listing = list_rules(&cfg_text, overrides(cli, &[]))?;
    print!("{}", format_rule_listing(&listing));
    Ok(())
}
