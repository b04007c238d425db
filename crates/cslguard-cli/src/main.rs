//! CLI entry point for cslguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and
//! exit codes. All business logic lives in the `cslguard-app` crate.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use cslguard_app::{
    format_explanation, format_unknown_code, outcome_exit_code, parse_scope, run_decide,
    run_explain, run_validate, verdict_exit_code, DecideInput, ExplainOutput, ValidateInput,
};
use cslguard_domain::model::DecisionContext;
use cslguard_settings::Overrides;
use cslguard_types::LoadVerdict;

#[derive(Parser, Debug)]
#[command(
    name = "cslguard",
    version,
    about = "Policy guardrail validation and decision evaluation for CSL rule sets"
)]
struct Cli {
    /// Root directory containing cslguard.toml and the policy directory.
    #[arg(long, default_value = ".")]
    root: Utf8PathBuf,

    /// Path to cslguard config TOML, relative to the root.
    #[arg(long, default_value = "cslguard.toml")]
    config: Utf8PathBuf,

    /// Override profile (standard|strict).
    #[arg(long)]
    profile: Option<String>,

    /// Override the policy directory, relative to the root.
    #[arg(long)]
    policy_dir: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate the policy directory and print a per-file summary.
    ///
    /// Exits 0 on pass/warn, 2 on fail, 1 on a runtime error (e.g. a
    /// missing policy directory).
    Validate {
        /// Where to write the JSON report (skipped when not given).
        #[arg(long)]
        report_out: Option<Utf8PathBuf>,

        /// Write a Markdown report alongside the summary.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/cslguard/report.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Load the policy directory and evaluate one decision context.
    ///
    /// Exits 0 for approved/repaired, 2 for rejected, 3 for escalate.
    Decide {
        /// Policy scope: a policy name, or `all`.
        #[arg(long, default_value = "all")]
        scope: String,

        /// Path to a JSON file with the decision context (a flat object of
        /// numbers, strings, and booleans).
        #[arg(long)]
        context: Utf8PathBuf,
    },

    /// Explain a finding code with remediation guidance.
    Explain {
        /// The finding code (e.g. "unbalanced_braces") to explain.
        code: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Validate {
            ref report_out,
            write_markdown,
            ref markdown_out,
        } => cmd_validate(&cli, report_out.clone(), write_markdown, markdown_out.clone()),
        Commands::Decide { ref scope, ref context } => {
            cmd_decide(&cli, scope.clone(), context.clone())
        }
        Commands::Explain { code } => cmd_explain(&code),
    }
}

fn load(cli: &Cli) -> anyhow::Result<cslguard_app::ValidateOutput> {
    let root = cli.root.canonicalize_utf8().unwrap_or_else(|_| cli.root.clone());
    if !root.exists() {
        anyhow::bail!("root does not exist: {}", root);
    }

    // Missing config file is allowed (defaults apply).
    let cfg_path = root.join(&cli.config);
    let cfg_text = std::fs::read_to_string(&cfg_path).unwrap_or_default();

    let overrides = Overrides {
        profile: cli.profile.clone(),
        policy_dir: cli.policy_dir.clone(),
    };

    run_validate(ValidateInput {
        root: &root,
        config_text: &cfg_text,
        overrides,
    })
}

fn cmd_validate(
    cli: &Cli,
    report_out: Option<Utf8PathBuf>,
    write_markdown: bool,
    markdown_out: Utf8PathBuf,
) -> anyhow::Result<()> {
    let output = match load(cli) {
        Ok(output) => output,
        Err(err) => {
            eprintln!("cslguard error: {err:#}");
            std::process::exit(1);
        }
    };

    print!("{}", cslguard_render::render_summary(&output.report));

    if let Some(path) = report_out {
        let json = cslguard_render::serialize_report(&output.report).context("serialize report")?;
        write_text_file(&path, &json).context("write report json")?;
    }
    if write_markdown {
        let md = cslguard_render::render_markdown(&output.report);
        write_text_file(&markdown_out, &md).context("write markdown")?;
    }

    let code = verdict_exit_code(output.report.verdict);
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn cmd_decide(cli: &Cli, scope: String, context_path: Utf8PathBuf) -> anyhow::Result<()> {
    let output = match load(cli) {
        Ok(output) => output,
        Err(err) => {
            eprintln!("cslguard error: {err:#}");
            std::process::exit(1);
        }
    };

    let Some(ruleset) = output.ruleset else {
        eprintln!("policy load failed; refusing to evaluate:");
        eprint!("{}", cslguard_render::render_summary(&output.report));
        std::process::exit(verdict_exit_code(LoadVerdict::Fail));
    };

    let context_text = std::fs::read_to_string(&context_path)
        .with_context(|| format!("read context: {}", context_path))?;
    let context =
        DecisionContext::from_json_str(&context_text).context("parse decision context")?;

    let verdict = run_decide(DecideInput {
        ruleset: &ruleset,
        scope: parse_scope(&scope),
        context,
    });

    let json = serde_json::to_string_pretty(&verdict).context("serialize verdict")?;
    println!("{json}");

    let code = outcome_exit_code(verdict.outcome);
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn cmd_explain(code: &str) -> anyhow::Result<()> {
    match run_explain(code) {
        ExplainOutput::Found(exp) => {
            print!("{}", format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound { code, known_codes } => {
            eprint!("{}", format_unknown_code(&code, known_codes));
            std::process::exit(1);
        }
    }
}

fn write_text_file(path: &camino::Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, text).with_context(|| format!("write text: {}", path))?;
    Ok(())
}
