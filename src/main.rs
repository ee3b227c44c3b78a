// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context, Result};
use appstack::{
    assembler::Assembler,
    defaults::Defaults,
    deployment::DeploymentSpec,
    network_prefix::generate_prefix,
    resolver::Resolver,
    vcs::GitCli,
};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Parser)]
#[command(
    name = "appstack",
    version,
    about = "Generate the Kubernetes resource graph of an HTTP workload"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a deployment request and print its resource graph
    Render {
        /// Deployment request (YAML or JSON)
        #[arg(long, env = "APPSTACK_SPEC")]
        spec: PathBuf,

        /// Runtime environment, overriding the request's `runtimeEnv`
        #[arg(long, env = "APPSTACK_ENV")]
        env: Option<String>,

        /// Organization defaults file; built-in defaults when omitted
        #[arg(long, env = "APPSTACK_DEFAULTS")]
        defaults: Option<PathBuf>,

        /// Repository the name, URL and version are read from
        #[arg(long, env = "APPSTACK_REPO", default_value = ".")]
        repo: PathBuf,

        /// Token for the development `.netrc` secret
        #[arg(long, env = "APPSTACK_GIT_TOKEN", hide_env_values = true)]
        git_token: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
        output: OutputFormat,
    },

    /// Generate random IPv6 ULA /64 prefixes
    Prefix {
        #[arg(long, default_value_t = 1)]
        count: usize,
    },

    /// Print the standard priority classes
    PriorityClasses {
        /// Organization defaults file; built-in defaults when omitted
        #[arg(long, env = "APPSTACK_DEFAULTS")]
        defaults: Option<PathBuf>,
    },

    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            spec,
            env,
            defaults,
            repo,
            git_token,
            output,
        } => render(&spec, env, defaults.as_deref(), repo, git_token, output),
        Commands::Prefix { count } => print_prefixes(count),
        Commands::PriorityClasses { defaults } => print_priority_classes(defaults.as_deref()),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "appstack", &mut std::io::stdout());
            Ok(())
        }
    }
}

// Logs go to stderr so rendered manifests can be piped.
//
// Respects RUST_LOG (default "info") and RUST_LOG_FORMAT ("json" or compact text).
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .compact()
                .init();
        }
    }
}

fn load_defaults(path: Option<&std::path::Path>) -> Result<Defaults> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "Loading defaults");
            Defaults::from_yaml_file(path)
        }
        None => Ok(Defaults::default()),
    }
}

fn render(
    spec_path: &std::path::Path,
    env: Option<String>,
    defaults_path: Option<&std::path::Path>,
    repo: PathBuf,
    git_token: Option<String>,
    output: OutputFormat,
) -> Result<()> {
    let defaults = load_defaults(defaults_path)?;
    let mut spec = DeploymentSpec::from_yaml_file(spec_path)?;

    if env.is_some() {
        spec.runtime_env = env;
    }
    if let Some(token) = git_token {
        spec.dev.get_or_insert_with(Default::default).git_token = Some(token);
    }

    info!(repo = %repo.display(), spec = %spec_path.display(), "Rendering resource graph");

    let resolver = Resolver::new(defaults, Arc::new(GitCli::new(repo)))
        .context("Invalid defaults")?;
    let resolved = resolver
        .resolve(&spec)
        .with_context(|| format!("Failed to resolve {}", spec_path.display()))?;
    let graph = Assembler::default()
        .assemble(&resolved, &resolved.identity())
        .context("Failed to assemble resource graph")?;

    let rendered = match output {
        OutputFormat::Yaml => graph.to_yaml()?,
        OutputFormat::Json => graph.to_json()? + "\n",
    };
    std::io::stdout().write_all(rendered.as_bytes())?;
    Ok(())
}

fn print_prefixes(count: usize) -> Result<()> {
    if count == 0 {
        bail!("--count must be at least 1");
    }
    let mut rng = rand::rng();
    let mut stdout = std::io::stdout().lock();
    for _ in 0..count {
        writeln!(stdout, "{}", generate_prefix(&mut rng).cidr())?;
    }
    Ok(())
}

fn print_priority_classes(defaults_path: Option<&std::path::Path>) -> Result<()> {
    let table = load_defaults(defaults_path)?.priority_class_table()?;
    let mut stdout = std::io::stdout().lock();
    for class in table.to_priority_classes() {
        write!(stdout, "---\n{}", serde_yaml::to_string(&class)?)?;
    }
    Ok(())
}
