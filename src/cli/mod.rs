//! CLI surface for tigs.
//!
//! Thin: parse arguments, open the repository, call into [`crate::chats`],
//! render the result. Command output goes to stdout, diagnostics to stderr.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, builder::BoolishValueParser};
use serde::Serialize;

use crate::config::{self, Config, ConfigError};
use crate::core::RemoteName;
use crate::git::GitRepo;
use crate::sync::Strategy;
use crate::{Error, Result};

mod commands;
mod render;

// =============================================================================
// Entry + global options
// =============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "tigs",
    version,
    about = "Store and sync chat transcripts as git notes",
    infer_subcommands = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Machine-readable JSON output.
    #[arg(
        long,
        global = true,
        default_value_t = false,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub json: bool,

    /// Repository path (default: discover from cwd).
    #[arg(long, global = true, value_name = "PATH")]
    pub repo: Option<PathBuf>,

    /// More diagnostics on stderr (repeat for more).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Attach a chat to a commit.
    #[command(alias = "add")]
    AddChat(AddChatArgs),

    /// Print the chats attached to a commit.
    #[command(alias = "show")]
    ShowChat(CommitArgs),

    /// List commits that carry chats.
    #[command(alias = "ls")]
    ListChats,

    /// Remove every chat from a commit.
    #[command(alias = "rm")]
    RemoveChat(CommitArgs),

    /// Fetch a remote's chats into its staging namespace.
    Fetch(RemoteArgs),

    /// Fetch and merge a remote's chats into the local ones.
    Pull(PullArgs),

    /// Publish local chats after checking every noted commit is on the remote.
    Push(RemoteArgs),
}

// =============================================================================
// Per-command args
// =============================================================================

#[derive(Args, Debug)]
pub struct CommitArgs {
    /// Commit to operate on: hash, branch or any revision expression.
    #[arg(default_value = "HEAD")]
    pub commit: String,
}

#[derive(Args, Debug)]
pub struct AddChatArgs {
    #[arg(default_value = "HEAD")]
    pub commit: String,

    /// Chat document text (YAML, one or more documents).
    #[arg(short = 'm', long = "message", value_name = "TEXT", required = true)]
    pub message: String,
}

#[derive(Args, Debug)]
pub struct RemoteArgs {
    /// Remote name (default: configured remote, usually `origin`).
    #[arg(value_parser = parse_remote)]
    pub remote: Option<RemoteName>,
}

#[derive(Args, Debug)]
pub struct PullArgs {
    #[arg(value_parser = parse_remote)]
    pub remote: Option<RemoteName>,

    /// How to settle commits whose chats differ (default: configured, usually `union`).
    #[arg(short = 's', long, value_enum, ignore_case = true)]
    pub strategy: Option<Strategy>,
}

// =============================================================================
// Public API
// =============================================================================

/// Parse CLI from raw args. Usage errors exit with status 1.
pub fn parse_from<I, T>(args: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    }
}

/// Layered config for the repository the CLI points at.
pub fn load_config(cli: &Cli) -> std::result::Result<Config, ConfigError> {
    let root = crate::repo::workdir(cli.repo.as_deref());
    config::load_for_repo(root.as_deref())
}

/// Run the CLI (used by bin).
pub fn run(cli: Cli, config: Config) -> Result<()> {
    let repo = crate::repo::discover(cli.repo.as_deref())?;
    let ctx = Ctx {
        repo,
        json: cli.json,
        config,
    };

    match cli.command {
        Commands::AddChat(args) => commands::chat::add(&ctx, args),
        Commands::ShowChat(args) => commands::chat::show(&ctx, args),
        Commands::ListChats => commands::chat::list(&ctx),
        Commands::RemoveChat(args) => commands::chat::remove(&ctx, args),
        Commands::Fetch(args) => commands::sync::fetch(&ctx, args),
        Commands::Pull(args) => commands::sync::pull(&ctx, args),
        Commands::Push(args) => commands::sync::push(&ctx, args),
    }
}

// =============================================================================
// Context + helpers
// =============================================================================

pub(crate) struct Ctx {
    repo: GitRepo,
    json: bool,
    config: Config,
}

impl Ctx {
    fn remote(&self, explicit: Option<RemoteName>) -> RemoteName {
        explicit.unwrap_or_else(|| self.config.remote.clone())
    }
}

fn parse_remote(raw: &str) -> std::result::Result<RemoteName, String> {
    RemoteName::parse(raw).map_err(|e| e.to_string())
}

/// Write `text` to stdout as is. A closed pipe is not an error.
fn print_raw(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    match stdout.write_all(text.as_bytes()).and_then(|()| stdout.flush()) {
        Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => Err(Error::Io(e)),
        _ => Ok(()),
    }
}

fn print_line(text: &str) -> Result<()> {
    print_raw(&format!("{text}\n"))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    print_line(&s)
}
