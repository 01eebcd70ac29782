//! Command line definition.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use faqueue_core::queue::DEFAULT_WAIT_SECS;
use faqueue_core::{Rating, SubmissionType};

#[derive(Debug, Parser)]
#[command(
    name = "faqueue",
    version,
    about = "Upload queue and submission client for FurAffinity"
)]
pub struct Cli {
    /// Log level to use, overridden by RUST_LOG
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Path to the config file [default: ~/.faqueue.toml]
    #[arg(long, global = true, env = "FAQUEUE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store authentication cookies for FurAffinity
    Auth {
        /// Value of the `a` cookie
        a_cookie: String,
        /// Value of the `b` cookie
        b_cookie: String,
    },

    /// Print the current notification counters as JSON
    Notifications,

    /// Upload a new submission
    Upload(UploadArgs),

    /// Edit the info of an existing submission in your editor
    Edit {
        /// Submission id
        id: String,
    },

    /// Manage an upload queue in the current directory
    #[command(subcommand)]
    Queue(QueueCommand),
}

#[derive(Debug, clap::Args)]
pub struct UploadArgs {
    /// File to upload
    pub file: PathBuf,

    /// Submission title
    #[arg(long)]
    pub title: String,

    /// Submission description
    #[arg(long)]
    pub description: String,

    /// Submission rating: general, mature or adult
    #[arg(long)]
    pub rating: Rating,

    /// Submission type: submission, story, poetry or music
    #[arg(long = "type", default_value = "submission")]
    pub submission_type: SubmissionType,

    /// Keywords, separated by spaces
    #[arg(long, default_value = "")]
    pub keywords: String,

    /// Disable comments on this submission
    #[arg(long)]
    pub lock_comments: bool,

    /// Place this upload in your scraps
    #[arg(long)]
    pub scrap: bool,

    /// Create a new folder and place this submission into it
    #[arg(long, default_value = "")]
    pub create_folder_name: String,
}

#[derive(Debug, Subcommand)]
pub enum QueueCommand {
    /// Initialise a queue directory
    Init {
        /// Directory to initialise [default: current directory]
        dir: Option<PathBuf>,
    },

    /// Add files to the upload queue
    Add {
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Remove files from the upload queue
    Remove {
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Delete files that were uploaded, with their info files
    Clean,

    /// Open an editor to rearrange the queue
    Reorder,

    /// Print the current status of the queue
    Status,

    /// Upload all submissions in the queue
    Upload {
        /// Seconds to wait between each upload, at least 30
        #[arg(long, default_value_t = DEFAULT_WAIT_SECS)]
        wait_time: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("faqueue").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_upload() {
        let cli = parse(&[
            "upload",
            "a.png",
            "--title",
            "Foo",
            "--description",
            "Bar",
            "--rating",
            "mature",
            "--scrap",
        ])
        .unwrap();
        let Command::Upload(args) = cli.command else {
            panic!("expected upload");
        };
        assert_eq!(args.rating, Rating::Mature);
        assert_eq!(args.submission_type, SubmissionType::Submission);
        assert!(args.scrap);
        assert!(!args.lock_comments);
    }

    #[test]
    fn test_parse_rejects_unknown_rating() {
        assert!(parse(&[
            "upload",
            "a.png",
            "--title",
            "Foo",
            "--description",
            "Bar",
            "--rating",
            "extreme",
        ])
        .is_err());
    }

    #[test]
    fn test_parse_queue_upload_default_wait() {
        let cli = parse(&["queue", "upload"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Queue(QueueCommand::Upload { wait_time: 60 })
        ));
    }

    #[test]
    fn test_parse_queue_add_requires_files() {
        assert!(parse(&["queue", "add"]).is_err());
        let cli = parse(&["--log-level", "debug", "queue", "add", "a.png", "b.png"]).unwrap();
        assert_eq!(cli.log_level, "debug");
        let Command::Queue(QueueCommand::Add { files }) = cli.command else {
            panic!("expected queue add");
        };
        assert_eq!(files, vec!["a.png", "b.png"]);
    }
}
