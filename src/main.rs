//! diffscribe - CLI entry point.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use diffscribe::commit::ExclusionRules;
use diffscribe::git::check_git_installed;
use diffscribe::{
    ExternalEditor, FlowContext, FlowError, GitCli, HttpCompletionClient, Settings,
    TerminalPrompter, run_commit_flow, run_security_flow,
};

/// Generate a commit message for staged changes, review it, and commit.
#[derive(Parser, Debug)]
#[command(name = "diffscribe")]
#[command(about = "Generate a commit message for staged changes, review it, and commit")]
#[command(version)]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a message and commit (the default)
    Commit,
    /// Commit, then append an LLM security review to the message and amend
    Secure,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<FlowError>() {
                Some(flow) if flow.is_cancellation() => eprintln!("{}", flow),
                _ => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "diffscribe=debug" } else { "diffscribe=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    // Step 1: Check prerequisites
    check_git_installed()?;

    // Step 2: Open git repository
    let git = GitCli::discover(Path::new("."))
        .context("Not a git repository. Run diffscribe from within a git repository.")?;

    // Step 3: Load exclusions and settings
    let exclusions = ExclusionRules::load(git.workdir())
        .context("Failed to read exclusion file")?;
    let settings = Settings::from_env();
    debug!(?settings, exclusions = exclusions.len(), "Loaded configuration");

    let backend = HttpCompletionClient::new(&settings)?;
    let editor = ExternalEditor::from_env();
    let mut prompter = TerminalPrompter::new();

    let mut ctx = FlowContext {
        vcs: &git,
        backend: &backend,
        prompter: &mut prompter,
        editor: &editor,
        exclusions: &exclusions,
        model: &settings.model,
    };

    // Step 4: Run the selected flow
    let run = match cli.command.unwrap_or(Command::Commit) {
        Command::Commit => run_commit_flow(&mut ctx).await?,
        Command::Secure => run_security_flow(&mut ctx).await?,
    };

    debug!(amended = run.amended, pushed = run.pushed, "Flow complete");
    Ok(())
}
