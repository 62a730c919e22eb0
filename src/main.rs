use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;

use importsweep::codebase::{PublishSettings, DEFAULT_BRANCH, DEFAULT_REMOTE};
use importsweep::vcs::{RepoSlug, DEFAULT_API_URL};
use importsweep::RunConfig;

#[derive(Parser)]
#[command(name = "importsweep")]
#[command(author = "Zachary Woods <143150513+zach-fau@users.noreply.github.com>")]
#[command(version)]
#[command(about = "Remove unused imports and open a pull request with the change", long_about = None)]
struct Cli {
    /// Project root to sweep (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Branch to commit the change to
    #[arg(long, default_value = DEFAULT_BRANCH)]
    branch: String,

    /// Base branch of the pull request (defaults to the checked-out branch)
    #[arg(long)]
    base: Option<String>,

    /// Remote to push the branch to
    #[arg(long, default_value = DEFAULT_REMOTE)]
    remote: String,

    /// GitHub repository as OWNER/NAME (defaults to the remote URL)
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repo: Option<RepoSlug>,

    /// Token used to push and to open the pull request
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Show debug logs
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn run_config(&self) -> anyhow::Result<RunConfig> {
        let root = if self.path.is_absolute() {
            self.path.clone()
        } else {
            std::env::current_dir()
                .context("failed to determine the current directory")?
                .join(&self.path)
        };

        Ok(RunConfig::new(root).with_publish(PublishSettings {
            branch: self.branch.clone(),
            base: self.base.clone(),
            remote: self.remote.clone(),
            repo: self.repo.clone(),
            token: self.token.clone().filter(|t| !t.is_empty()),
            api_url: self.api_url.clone(),
        }))
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.quiet, cli.verbose) {
        eprintln!("Error: {e:#}");
        process::exit(2);
    }

    let config = match cli.run_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(2);
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match importsweep::run(&config, &mut out) {
        Ok(report) => {
            tracing::debug!(
                removed = report.removed,
                skipped = report.skipped_side_effects,
                "Codemod finished"
            );
        }
        Err(e) => {
            // Already reported on stdout by the codemod
            tracing::debug!(error = ?e, "Codemod failed");
            process::exit(1);
        }
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("IMPORTSWEEP_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
