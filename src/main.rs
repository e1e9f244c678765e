use clap::{Parser, Subcommand};
use colored::Colorize;
use gitlet::areas::repository::Repository;
use gitlet::artifacts::status::file_change::FileLabel;
use gitlet::artifacts::status::status_info::StatusInfo;
use gitlet::commands::porcelain::checkout::CheckoutTarget;
use gitlet::commands::porcelain::log::LogEntry;
use gitlet::commands::porcelain::merge::MergeOutcome;
use gitlet::errors::{RepositoryError, Result};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "GITLET_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Parser)]
#[command(
    name = "gitlet",
    version = "0.1.0",
    author = "Sami Barbut-Dica",
    about = "A tiny local version-control system",
    long_about = "gitlet keeps snapshots of a working directory in a .gitlet directory. \
    It supports staging, commits, branches, checkout, reset and three-way merges, \
    all on the local machine.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Create a new repository in the current directory",
        long_about = "This command creates the .gitlet directory and the initial commit on branch master."
    )]
    Init,
    #[command(
        name = "add",
        about = "Stage files for the next commit",
        long_about = "This command stages the current content of the given files. \
        Directories are expanded to the files below them."
    )]
    Add {
        #[arg(index = 1, required = true, help = "Files or directories to stage")]
        paths: Vec<PathBuf>,
    },
    #[command(
        name = "rm",
        about = "Unstage a file or stage its removal",
        long_about = "This command unstages a staged file, or deletes a tracked file and stages its removal."
    )]
    Rm {
        #[arg(index = 1)]
        path: PathBuf,
    },
    #[command(
        name = "commit",
        about = "Record the staged changes",
        long_about = "This command creates a new commit on the current branch from the staged changes."
    )]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: String,
    },
    #[command(name = "status", about = "Show branches and file states")]
    Status,
    #[command(name = "log", about = "Show the history of the current branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the IDs of commits with the given message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(name = "branch", about = "Create a branch at the current commit")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch pointer")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(
        name = "checkout",
        about = "Switch branches or restore a file",
        long_about = "gitlet checkout <branch> switches to a branch. \
        gitlet checkout -- <file> restores a file from the current commit. \
        gitlet checkout <commit> -- <file> restores a file from the given commit."
    )]
    Checkout {
        #[arg(
            index = 1,
            required_unless_present = "file",
            help = "Branch name, or commit ID when a file is given"
        )]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "File to restore")]
        file: Option<PathBuf>,
    },
    #[command(
        name = "reset",
        about = "Check out a commit and move the current branch to it"
    )]
    Reset {
        #[arg(index = 1)]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    if std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(RepositoryError::Storage(error)) => {
            eprintln!("fatal: {error:#}");
            ExitCode::FAILURE
        }
        Err(error) if error.is_fatal() => {
            eprintln!("fatal: {error}");
            ExitCode::FAILURE
        }
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<()> {
    let pwd = std::env::current_dir()?;
    let repository = Repository::new(&pwd)?;

    match command {
        Commands::Init => {
            repository.init()?;
            println!(
                "Initialized empty Gitlet repository in {}",
                repository.git_path().display()
            );
        }
        Commands::Add { paths } => {
            for path in paths {
                repository.add(absolute_to(&pwd, &path))?;
            }
        }
        Commands::Rm { path } => repository.rm(absolute_to(&pwd, &path))?,
        Commands::Commit { message } => {
            repository.commit(&message)?;
        }
        Commands::Status => print_status(&repository.status()?),
        Commands::Log => repository.log()?.iter().for_each(print_log_entry),
        Commands::GlobalLog => repository.global_log()?.iter().for_each(print_log_entry),
        Commands::Find { message } => {
            let found = repository.find(&message)?;
            if found.is_empty() {
                println!("Found no commit with that message.");
            }
            for oid in found {
                println!("{oid}");
            }
        }
        Commands::Branch { name } => repository.branch(&name)?,
        Commands::RmBranch { name } => repository.delete_branch(&name)?,
        Commands::Checkout { target, file } => {
            let target = match (target, file) {
                (Some(name), None) => CheckoutTarget::Branch(name),
                (None, Some(path)) => CheckoutTarget::File(absolute_to(&pwd, &path)),
                (Some(commit), Some(path)) => CheckoutTarget::CommitFile {
                    commit,
                    path: absolute_to(&pwd, &path),
                },
                (None, None) => {
                    eprintln!("Incorrect operands.");
                    return Ok(());
                }
            };
            repository.checkout(target)?;
        }
        Commands::Reset { commit } => {
            repository.reset(&commit)?;
        }
        Commands::Merge { branch } => match repository.merge(&branch)? {
            MergeOutcome::NothingToMerge => println!("Already up to date."),
            MergeOutcome::AlreadyAncestor => {
                println!("Given branch is an ancestor of the current branch.")
            }
            MergeOutcome::FastForwarded => println!("Current branch fast-forwarded."),
            MergeOutcome::Merged { conflicted, .. } => {
                if conflicted {
                    println!("Encountered a merge conflict.");
                }
            }
        },
    }

    Ok(())
}

fn absolute_to(pwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        pwd.join(path)
    }
}

fn print_log_entry(entry: &LogEntry) {
    println!("===");
    println!("{} {}", "commit".yellow(), entry.oid.as_ref().yellow());
    if let Some((first, second)) = entry.merge_parents() {
        println!("Merge: {} {}", first.to_short_oid(), second.to_short_oid());
    }
    println!("Date: {}", entry.commit.timestamp());
    println!("{}", entry.commit.message());
    println!();
}

fn print_status(status: &StatusInfo) {
    print_section("Branches");
    for branch in &status.branches {
        if branch.current {
            println!("*{}", branch.name.as_ref().green());
        } else {
            println!("{}", branch.name);
        }
    }
    println!();

    print_section("Staged Files");
    for path in &status.staged {
        println!("{}", path.display().to_string().green());
    }
    println!();

    print_section("Removed Files");
    for path in &status.removed {
        println!("{}", path.display().to_string().red());
    }
    println!();

    print_section("Modifications Not Staged For Commit");
    for path in &status.modified {
        println!("{}{}", path.display(), FileLabel::Modified);
    }
    for path in &status.deleted {
        println!("{}{}", path.display(), FileLabel::Deleted);
    }
    println!();

    print_section("Untracked Files");
    for path in &status.untracked {
        println!("{}", path.display());
    }
    println!();
}

fn print_section(title: &str) {
    println!("{}", format!("=== {title} ===").bold());
}
