use anyhow::Context;
use chrono::Utc;
use semita_api::{
    Comment, CommentId, Complaint, ComplaintId, ComplaintStatus, NewComment, NewComplaint,
    NotificationType, Uuid,
};

use crate::{
    db::{self, Db},
    notifications, Error,
};

/// All complaints, newest submission first.
pub async fn list(db: &Db) -> anyhow::Result<Vec<Complaint>> {
    let mut complaints: Vec<Complaint> = db
        .fetch_all(db::COMPLAINT_PREFIX)
        .await
        .context("listing complaints")?
        .into_iter()
        .map(|(_, c)| c)
        .collect();
    complaints.sort_by(|a, b| b.date_submitted.cmp(&a.date_submitted));
    Ok(complaints)
}

pub async fn list_by_status(
    db: &Db,
    status: ComplaintStatus,
) -> anyhow::Result<Vec<Complaint>> {
    let mut complaints = list(db).await?;
    complaints.retain(|c| c.status == status);
    Ok(complaints)
}

pub async fn get(db: &Db, id: &ComplaintId) -> Result<Complaint, Error> {
    db.fetch(&db::complaint_key(id))
        .await
        .with_context(|| format!("fetching complaint {id}"))?
        .ok_or_else(|| Error::not_found(format!("complaint {id} does not exist")))
}

pub async fn submit(db: &Db, data: NewComplaint) -> Result<Complaint, Error> {
    data.validate()?;
    let complaint = Complaint {
        id: ComplaintId(Uuid::new_v4()),
        title: data.title,
        category: data.category,
        description: data.description,
        location: data.location.filter(|l| !l.trim().is_empty()),
        status: ComplaintStatus::Open,
        upvotes: 0,
        downvotes: 0,
        date_submitted: Utc::now(),
        comments: Vec::new(),
    };
    db.save(&db::complaint_key(&complaint.id), &complaint)
        .await
        .with_context(|| format!("persisting complaint {}", complaint.id))?;
    notifications::push(
        db,
        NotificationType::Info,
        String::from("New Complaint Submitted"),
        format!("{} - {}", complaint.title, complaint.category),
        None,
        Some(complaint.id),
    )
    .await?;
    Ok(complaint)
}

pub async fn add_comment(
    db: &Db,
    id: &ComplaintId,
    data: NewComment,
) -> Result<Comment, Error> {
    data.validate()?;
    let key = db::complaint_key(id);
    let _guard = db.lock(&key).await;
    let mut complaint: Complaint = db
        .fetch(&key)
        .await
        .with_context(|| format!("fetching complaint {id}"))?
        .ok_or_else(|| Error::not_found(format!("complaint {id} does not exist")))?;
    let comment = Comment {
        id: CommentId(Uuid::new_v4()),
        author: data.author,
        content: data.content,
        timestamp: Utc::now(),
    };
    complaint.comments.push(comment.clone());
    db.save(&key, &complaint)
        .await
        .with_context(|| format!("persisting complaint {id}"))?;
    Ok(comment)
}

/// Any status is reachable from any other; there are deliberately no
/// transition guards. Reaching `resolved` from another status notifies the
/// neighborhood.
pub async fn set_status(
    db: &Db,
    id: &ComplaintId,
    status: ComplaintStatus,
) -> Result<Complaint, Error> {
    let key = db::complaint_key(id);
    let _guard = db.lock(&key).await;
    let mut complaint: Complaint = db
        .fetch(&key)
        .await
        .with_context(|| format!("fetching complaint {id}"))?
        .ok_or_else(|| Error::not_found(format!("complaint {id} does not exist")))?;
    let previous = complaint.status;
    complaint.status = status;
    db.save(&key, &complaint)
        .await
        .with_context(|| format!("persisting complaint {id}"))?;
    if status == ComplaintStatus::Resolved && previous != ComplaintStatus::Resolved {
        notifications::push(
            db,
            NotificationType::Success,
            String::from("Complaint Resolved"),
            complaint.title.clone(),
            None,
            Some(complaint.id),
        )
        .await?;
    }
    Ok(complaint)
}
