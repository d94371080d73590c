use std::str::FromStr;

use uuid::Uuid;

use crate::{Error, Time, UserId};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct ComplaintId(pub Uuid);

impl std::fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommentId(pub Uuid);

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplaintStatus {
    Open,
    InProgress,
    Resolved,
}

impl FromStr for ComplaintStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<ComplaintStatus, Error> {
        match s {
            "open" => Ok(ComplaintStatus::Open),
            "in-progress" => Ok(ComplaintStatus::InProgress),
            "resolved" => Ok(ComplaintStatus::Resolved),
            _ => Err(Error::InvalidArgument(format!(
                "unknown complaint status {s:?}"
            ))),
        }
    }
}

/// Immutable once appended; ordering within a complaint is append order.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub author: String,
    pub content: String,
    pub timestamp: Time,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Complaint {
    pub id: ComplaintId,
    pub title: String,
    pub category: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub status: ComplaintStatus,
    pub upvotes: i64,
    pub downvotes: i64,
    pub date_submitted: Time,
    pub comments: Vec<Comment>,
}

/// Body of `POST /api/complaints`.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct NewComplaint {
    pub title: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl NewComplaint {
    pub fn validate(&self) -> Result<(), Error> {
        for (field, value) in [
            ("title", &self.title),
            ("category", &self.category),
            ("description", &self.description),
        ] {
            if value.trim().is_empty() {
                return Err(Error::InvalidArgument(format!(
                    "{field} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

/// Body of `POST /api/complaints/:id/comments`.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct NewComment {
    pub author: String,
    pub content: String,
}

impl NewComment {
    pub fn validate(&self) -> Result<(), Error> {
        if self.author.trim().is_empty() {
            return Err(Error::InvalidArgument(String::from(
                "author must not be empty",
            )));
        }
        if self.content.trim().is_empty() {
            return Err(Error::InvalidArgument(String::from(
                "content must not be empty",
            )));
        }
        Ok(())
    }
}

/// Body of `POST /api/complaints/:id/status`.
#[derive(Clone, Copy, Debug, serde::Deserialize, serde::Serialize)]
pub struct SetStatus {
    pub status: ComplaintStatus,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

/// Body of `POST /api/complaints/:id/vote`.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct VoteRequest {
    pub user_id: UserId,
    pub direction: VoteDirection,
}

/// Authoritative post-vote state, returned to the caller so the client can
/// reconcile whatever it mutated optimistically.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct VoteCounts {
    pub upvotes: i64,
    pub downvotes: i64,
    pub user_vote: Option<VoteDirection>,
}

/// At most one per `(complaint_id, user_id)` pair.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct VoteRecord {
    pub complaint_id: ComplaintId,
    pub user_id: UserId,
    pub direction: VoteDirection,
}
