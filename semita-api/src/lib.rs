pub use uuid::{uuid, Uuid};

pub type Time = chrono::DateTime<chrono::Utc>;

mod complaint;
mod error;
mod insights;
mod notification;
mod service;

pub use complaint::{
    Comment, CommentId, Complaint, ComplaintId, ComplaintStatus, NewComment, NewComplaint,
    SetStatus, VoteCounts, VoteDirection, VoteRecord, VoteRequest,
};
pub use error::Error;
pub use insights::Insights;
pub use notification::{Notification, NotificationId, NotificationType};
pub use service::{Service, ServiceId, ServiceStatus, StatusReport};

/// Caller identity for vote bookkeeping. There is no account system: the
/// client picks a stable opaque key (device id, cookie, ...) and sends it
/// with each vote. Any "my vote" flag the client keeps locally is advisory
/// UI state; the records stored under this id are authoritative.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
pub struct UserId(pub String);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
