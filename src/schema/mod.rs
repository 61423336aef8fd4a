//! Types used throughout.
//!
//! > Schema defines the plain old data types that views operate on. Notably, the schema module has
//! > no knowledge of the database, nor any dependencies on any of the rest of the system.

use crate::error::Error;
use chrono::{DateTime, Utc};
use serde_derive::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// A user, as the registry knows them.
#[derive(Clone, Debug, Eq, PartialEq, Queryable, Serialize)]
pub struct User {
    /// The user's ID. Assigned outside this system.
    pub user_id: String,

    /// The user's display name.
    pub username: String,

    /// The team the user belongs to, if any.
    pub team_name: Option<String>,

    /// Whether the user can be picked as a reviewer.
    pub is_active: bool,
}

/// A team, along with the users currently bound to it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Team {
    /// The team's name, which is also its key.
    pub team_name: String,

    /// The team's members.
    pub members: Vec<TeamMember>,
}

/// A user as seen from their team.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Queryable, Serialize)]
pub struct TeamMember {
    /// The member's user ID.
    pub user_id: String,

    /// The member's display name.
    pub username: String,

    /// Whether the member can be picked as a reviewer.
    pub is_active: bool,
}

/// The lifecycle state of a pull request. `Open` moves to `Merged`, and `Merged` is terminal.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Status {
    /// Under review; reviewers may be reassigned.
    #[serde(rename = "OPEN")]
    Open,

    /// Merged. Nothing about the pull request changes any more.
    #[serde(rename = "MERGED")]
    Merged,
}

impl Status {
    /// The status as it is stored and serialized.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Open => "OPEN",
            Status::Merged => "MERGED",
        }
    }
}

impl Display for Status {
    fn fmt(&self, fmt: &mut Formatter) -> FmtResult {
        fmt.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Status, Error> {
        match s {
            "OPEN" => Ok(Status::Open),
            "MERGED" => Ok(Status::Merged),
            _ => Err(Error::inconsistent(format!(
                "unknown pull request status {:?}",
                s
            ))),
        }
    }
}

/// A pull request, including the reviewers assigned to it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PullRequest {
    /// The pull request's ID, chosen by whoever created it.
    pub pull_request_id: String,

    /// The pull request's title.
    pub pull_request_name: String,

    /// The user ID of the pull request's author.
    pub author_id: String,

    /// Whether the pull request is open or merged.
    pub status: Status,

    /// When the pull request was created.
    pub created_at: DateTime<Utc>,

    /// When the pull request was merged, if it has been.
    pub merged_at: Option<DateTime<Utc>>,

    /// The user IDs of the assigned reviewers, in ascending order. Never more than two, and never
    /// the author.
    pub assigned_reviewers: Vec<String>,
}

impl PullRequest {
    /// Returns whether the given user is one of the assigned reviewers.
    pub fn is_reviewer(&self, user_id: &str) -> bool {
        self.assigned_reviewers.iter().any(|r| r == user_id)
    }
}

/// A request to create a pull request.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct NewPullRequest {
    /// The ID the new pull request should have.
    pub pull_request_id: String,

    /// The pull request's title.
    pub pull_request_name: String,

    /// The user ID of the author.
    pub author_id: String,

    /// The creation time. Defaults to the current time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn status_round_trips_through_strings() {
        assert_eq!("OPEN".parse::<Status>().unwrap(), Status::Open);
        assert_eq!("MERGED".parse::<Status>().unwrap(), Status::Merged);
        assert_eq!(Status::Merged.to_string(), "MERGED");
    }

    #[test]
    fn unknown_status_is_inconsistent() {
        let err = "CLOSED".parse::<Status>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Inconsistent);
    }

    #[test]
    fn pull_request_serializes_with_literal_status() {
        let created_at = "2019-02-01T12:00:00Z".parse().unwrap();
        let pr = PullRequest {
            pull_request_id: "pr-1".to_owned(),
            pull_request_name: "Add search".to_owned(),
            author_id: "u1".to_owned(),
            status: Status::Open,
            created_at,
            merged_at: None,
            assigned_reviewers: vec!["u2".to_owned(), "u3".to_owned()],
        };
        assert_eq!(
            serde_json::to_value(&pr).unwrap(),
            json!({
                "pull_request_id": "pr-1",
                "pull_request_name": "Add search",
                "author_id": "u1",
                "status": "OPEN",
                "created_at": "2019-02-01T12:00:00Z",
                "merged_at": null,
                "assigned_reviewers": ["u2", "u3"],
            })
        );
        assert!(pr.is_reviewer("u3"));
        assert!(!pr.is_reviewer("u1"));
    }

    #[test]
    fn new_pull_request_defaults_created_at() {
        let new: NewPullRequest = serde_json::from_value(json!({
            "pull_request_id": "pr-2",
            "pull_request_name": "Fix typo",
            "author_id": "u1",
        }))
        .unwrap();
        assert_eq!(new.created_at, None);
    }
}
