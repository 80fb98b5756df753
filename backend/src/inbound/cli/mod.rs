//! Command-line inbound adapter.
//!
//! Parses `recky` subcommands and dispatches them to the driving ports held
//! in [`CliState`]. Output is returned as lines so the binary decides where
//! to print them, and whether the store needs saving.

mod args;
mod render;
mod state;

use thiserror::Error;
use tracing::debug;

pub use self::args::{CliArgs, CliCommand, StatsRoleArg, VoteArg};
pub use self::state::CliState;

use crate::domain::{Error, RecommendationId, UserId, Vote};

/// Errors raised while running a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The command needs a signed-in user.
    #[error("`{command}` requires --as <uid>")]
    MissingActor {
        /// Command that was attempted.
        command: &'static str,
    },
    /// An argument failed validation.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the problem.
        message: String,
    },
    /// The domain rejected the operation.
    #[error("{code}: {0}", code = .0.code())]
    Domain(Error),
}

impl From<Error> for CliError {
    fn from(value: Error) -> Self {
        Self::Domain(value)
    }
}

/// Result of a CLI command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandReport {
    /// Lines to print, in order.
    pub lines: Vec<String>,
    /// Whether the store changed and must be persisted.
    pub mutated: bool,
}

impl CommandReport {
    fn read(lines: Vec<String>) -> Self {
        Self {
            lines,
            mutated: false,
        }
    }

    fn write(line: String) -> Self {
        Self {
            lines: vec![line],
            mutated: true,
        }
    }
}

fn parse_uid(raw: &str) -> Result<UserId, CliError> {
    UserId::new(raw).map_err(|err| CliError::InvalidArgument {
        message: err.to_string(),
    })
}

fn parse_recommendation_id(raw: &str) -> Result<RecommendationId, CliError> {
    RecommendationId::new(raw).map_err(|err| CliError::InvalidArgument {
        message: err.to_string(),
    })
}

/// Run `command` as `acting_as` against the ports in `state`.
///
/// # Errors
///
/// Returns [`CliError::MissingActor`] when a command other than
/// `pending-count` runs without a signed-in user, and propagates domain
/// errors from write operations.
pub async fn execute(
    state: &CliState,
    acting_as: Option<&UserId>,
    command: &CliCommand,
) -> Result<CommandReport, CliError> {
    debug!(command = command.name(), signed_in = acting_as.is_some(), "running command");

    let current = match acting_as {
        Some(uid) => uid,
        None if *command == CliCommand::PendingCount => {
            let count = state.friendships_query.count_pending_requests(None).await;
            return Ok(CommandReport::read(vec![count.to_string()]));
        }
        None => {
            return Err(CliError::MissingActor {
                command: command.name(),
            });
        }
    };
    let report = match command {
        CliCommand::SendRequest { email } => {
            let outcome = state.friendships.send_request(current, email).await?;
            debug!(?outcome, "friend request handled");
            CommandReport {
                lines: vec![format!("friend request sent to {}", email.trim())],
                mutated: outcome.changed_state(),
            }
        }
        CliCommand::Accept { uid } => {
            let sender = parse_uid(uid)?;
            state.friendships.accept_request(current, &sender).await?;
            CommandReport::write(format!("you are now friends with {sender}"))
        }
        CliCommand::Ignore { uid } => {
            let sender = parse_uid(uid)?;
            state.friendships.ignore_request(current, &sender).await?;
            CommandReport::write(format!("ignored friend request from {sender}"))
        }
        CliCommand::RemoveFriend { uid } => {
            let friend = parse_uid(uid)?;
            state.friendships.remove_friend(current, &friend).await?;
            CommandReport::write(format!("removed {friend} from friends"))
        }
        CliCommand::Requests => {
            let requests = state.friendships_query.list_friend_requests(current).await;
            if requests.is_empty() {
                CommandReport::read(vec!["no pending friend requests".to_owned()])
            } else {
                CommandReport::read(requests.iter().map(render::friend_request_line).collect())
            }
        }
        CliCommand::Friends => {
            let friends = state.friendships_query.list_friends(current).await;
            if friends.is_empty() {
                CommandReport::read(vec!["no friends yet".to_owned()])
            } else {
                CommandReport::read(friends.iter().map(render::friend_line).collect())
            }
        }
        CliCommand::Vote { id, vote, note } => {
            let id = parse_recommendation_id(id)?;
            let vote = Vote::from(*vote);
            state.votes.submit_vote(&id, current, vote, note).await?;
            CommandReport::write(format!("voted {} on {id}", vote.glyph()))
        }
        CliCommand::Feed => {
            let feed = state.recommendations_query.load_feed(current).await;
            if feed.is_empty() {
                CommandReport::read(vec!["no recommendations yet".to_owned()])
            } else {
                CommandReport::read(feed.iter().map(render::feed_line).collect())
            }
        }
        CliCommand::Show { id } => {
            let id = parse_recommendation_id(id)?;
            let detail = state
                .recommendations_query
                .recommendation_detail(&id, current)
                .await
                .ok_or_else(|| Error::not_found(format!("recommendation {id} not found")))?;
            CommandReport::read(render::detail_lines(&detail))
        }
        CliCommand::Stats { role } => {
            let tally = state
                .recommendations_query
                .vote_stats(current, (*role).into())
                .await;
            CommandReport::read(render::tally_lines(&tally))
        }
        CliCommand::PendingCount => {
            let count = state
                .friendships_query
                .count_pending_requests(Some(current))
                .await;
            CommandReport::read(vec![count.to_string()])
        }
    };
    Ok(report)
}
