use ait::areas::repository::Repository;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ait",
    version = "0.1.0",
    about = "Content-addressed versioning for AI artifacts",
    long_about = "ait tracks datasets, model weights and experiment outputs \
    with a content-addressed object store, a staging index and an immutable \
    commit history, so that any past state can be named and restored by id.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "Creates the .ait skeleton in the current directory or at the specified path. \
        An already-initialized repository is left untouched."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
        #[arg(long, help = "Author name recorded in the repository config")]
        name: Option<String>,
        #[arg(long, help = "Author email recorded in the repository config")]
        email: Option<String>,
    },
    #[command(
        name = "add",
        about = "Stage files for the next commit",
        long_about = "Hashes the given files, stores their content in the object database and \
        records them in the staging index. Directories are expanded recursively."
    )]
    Add {
        #[arg(index = 1, required = true, help = "Files or directories to stage")]
        paths: Vec<String>,
    },
    #[command(
        name = "commit",
        about = "Create a new commit from the staged snapshot",
        long_about = "Freezes the staging index into a tree, records a commit pointing at it \
        and advances the active branch."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "status",
        about = "Show staged, modified, deleted and untracked paths",
        long_about = "Compares the working tree, the staging index and the HEAD tree by content \
        hash and reports every difference."
    )]
    Status {
        #[arg(long, help = "Machine-readable two-letter codes, one path per line")]
        porcelain: bool,
    },
    #[command(
        name = "log",
        about = "Show the commit history of the active branch",
        long_about = "Walks parent links from HEAD down to the root commit."
    )]
    Log {
        #[arg(long, help = "One line per commit: short id and message subject")]
        oneline: bool,
    },
    #[command(
        name = "diff",
        about = "Show which paths differ between snapshots",
        long_about = "By default compares the working tree against the staging index; with \
        --cached compares the staging index against the HEAD tree."
    )]
    Diff {
        #[arg(long, help = "Compare the staging index against HEAD")]
        cached: bool,
        #[arg(index = 1, help = "Restrict the comparison to one path")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "branch",
        about = "List branches or create a new one at HEAD",
        long_about = "Without arguments lists all branches, marking the active one. With a name \
        creates a new branch pointing at the current HEAD commit."
    )]
    Branch {
        #[arg(index = 1, help = "Name of the branch to create")]
        name: Option<String>,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "Prints the textual form of a blob, tree or commit. Accepts a full object \
        id or an unambiguous prefix."
    )]
    CatFile {
        #[arg(short = 'p', long, help = "The object id (or prefix) to print")]
        sha: String,
    },
}

fn repository_at_pwd() -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path, name, email } => {
            let mut repository = match path {
                Some(path) => Repository::new(&path, Box::new(std::io::stdout()))?,
                None => repository_at_pwd()?,
            };

            repository.init(name, email).await?
        }
        Commands::Add { paths } => {
            let mut repository = repository_at_pwd()?;

            let report = repository.add(&paths).await?;
            if !report.is_complete() {
                std::process::exit(1);
            }
        }
        Commands::Commit { message } => {
            let mut repository = repository_at_pwd()?;

            repository.commit(message.as_str()).await?;
        }
        Commands::Status { porcelain } => {
            let mut repository = repository_at_pwd()?;

            repository.status(porcelain).await?;
        }
        Commands::Log { oneline } => {
            let mut repository = repository_at_pwd()?;

            repository.log(oneline).await?
        }
        Commands::Diff { cached, path } => {
            let mut repository = repository_at_pwd()?;

            repository.diff(cached, path.as_deref()).await?;
        }
        Commands::Branch { name } => {
            let mut repository = repository_at_pwd()?;

            repository.branch(name).await?
        }
        Commands::CatFile { sha } => {
            let mut repository = repository_at_pwd()?;

            repository.cat_file(&sha).await?
        }
    }

    Ok(())
}
