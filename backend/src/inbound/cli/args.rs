//! Command-line arguments for the `recky` binary.

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::{StatsRole, Vote};

/// `recky` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "recky",
    about = "Manage friends and vote on recommendations in a Recky document store",
    version
)]
pub struct CliArgs {
    /// Snapshot file to operate on. Falls back to `RECKY_STORE_PATH`.
    #[arg(long = "store", value_name = "path", global = true)]
    pub store_path: Option<String>,
    /// Uid of the signed-in user.
    #[arg(long = "as", value_name = "uid", global = true)]
    pub acting_as: Option<String>,
    /// Operation to run.
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Operations exposed by the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum CliCommand {
    /// Send a friend request to the user registered under `email`.
    SendRequest {
        /// Recipient email address, any case.
        email: String,
    },
    /// Accept a pending friend request.
    Accept {
        /// Uid of the user who sent the request.
        uid: String,
    },
    /// Dismiss a pending friend request.
    Ignore {
        /// Uid of the user who sent the request.
        uid: String,
    },
    /// End a friendship.
    RemoveFriend {
        /// Uid of the friend.
        uid: String,
    },
    /// List pending friend requests.
    Requests,
    /// List friends with their thumbs-up ratios.
    Friends,
    /// Print the number of pending friend requests.
    PendingCount,
    /// Vote on a recommendation you received.
    Vote {
        /// Recommendation id.
        id: String,
        /// `up` or `down`.
        #[arg(value_enum)]
        vote: VoteArg,
        /// Optional note; blank clears any existing note.
        #[arg(long, default_value = "")]
        note: String,
    },
    /// Show recommendations you sent and received, newest first.
    Feed,
    /// Show one recommendation.
    Show {
        /// Recommendation id.
        id: String,
    },
    /// Summarise votes on what you sent or received.
    Stats {
        /// `sent` or `received`.
        #[arg(value_enum)]
        role: StatsRoleArg,
    },
}

impl CliCommand {
    /// Kebab-case name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SendRequest { .. } => "send-request",
            Self::Accept { .. } => "accept",
            Self::Ignore { .. } => "ignore",
            Self::RemoveFriend { .. } => "remove-friend",
            Self::Requests => "requests",
            Self::Friends => "friends",
            Self::PendingCount => "pending-count",
            Self::Vote { .. } => "vote",
            Self::Feed => "feed",
            Self::Show { .. } => "show",
            Self::Stats { .. } => "stats",
        }
    }
}

/// Vote value accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VoteArg {
    /// Thumbs up.
    Up,
    /// Thumbs down.
    Down,
}

impl From<VoteArg> for Vote {
    fn from(value: VoteArg) -> Self {
        match value {
            VoteArg::Up => Self::Up,
            VoteArg::Down => Self::Down,
        }
    }
}

/// Stats perspective accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatsRoleArg {
    /// Recommendations you sent.
    Sent,
    /// Recommendations you received.
    Received,
}

impl From<StatsRoleArg> for StatsRole {
    fn from(value: StatsRoleArg) -> Self {
        match value {
            StatsRoleArg::Sent => Self::Sent,
            StatsRoleArg::Received => Self::Received,
        }
    }
}
