use anyhow::Context;
use semita_api::{Complaint, ComplaintId, VoteCounts, VoteRecord, VoteRequest};

use crate::{
    db::{self, Db},
    Error,
};

/// Toggle-vote on a complaint. Clicking the same direction twice retracts
/// the vote; clicking the other direction moves it. At most one vote record
/// exists per `(complaint, user)` pair, and the whole read-modify-write runs
/// under the complaint's advisory lock so concurrent voters cannot
/// double-count.
pub async fn vote(db: &Db, id: &ComplaintId, req: VoteRequest) -> Result<VoteCounts, Error> {
    if req.user_id.0.trim().is_empty() {
        return Err(Error::invalid_argument("user_id must not be empty"));
    }

    let complaint_key = db::complaint_key(id);
    let _guard = db.lock(&complaint_key).await;
    let mut complaint: Complaint = db
        .fetch(&complaint_key)
        .await
        .with_context(|| format!("fetching complaint {id}"))?
        .ok_or_else(|| Error::not_found(format!("complaint {id} does not exist")))?;

    let vote_key = db::vote_key(id, &req.user_id);
    let existing: Option<VoteRecord> = db
        .fetch(&vote_key)
        .await
        .with_context(|| format!("fetching vote record {vote_key:?}"))?;

    let user_vote = match existing {
        Some(prior) if prior.direction == req.direction => {
            // un-voting: same button clicked twice
            decrement(&mut complaint, req.direction);
            db.remove(&vote_key)
                .await
                .with_context(|| format!("removing vote record {vote_key:?}"))?;
            None
        }
        Some(prior) => {
            decrement(&mut complaint, prior.direction);
            increment(&mut complaint, req.direction);
            db.save(
                &vote_key,
                &VoteRecord {
                    complaint_id: *id,
                    user_id: req.user_id.clone(),
                    direction: req.direction,
                },
            )
            .await
            .with_context(|| format!("persisting vote record {vote_key:?}"))?;
            Some(req.direction)
        }
        None => {
            increment(&mut complaint, req.direction);
            db.save(
                &vote_key,
                &VoteRecord {
                    complaint_id: *id,
                    user_id: req.user_id.clone(),
                    direction: req.direction,
                },
            )
            .await
            .with_context(|| format!("persisting vote record {vote_key:?}"))?;
            Some(req.direction)
        }
    };

    // unreachable given the algorithm, but guards against a concurrent
    // double-decrement on stores without per-key atomicity
    complaint.upvotes = complaint.upvotes.max(0);
    complaint.downvotes = complaint.downvotes.max(0);

    db.save(&complaint_key, &complaint)
        .await
        .with_context(|| format!("persisting complaint {id}"))?;

    Ok(VoteCounts {
        upvotes: complaint.upvotes,
        downvotes: complaint.downvotes,
        user_vote,
    })
}

fn increment(complaint: &mut Complaint, direction: semita_api::VoteDirection) {
    match direction {
        semita_api::VoteDirection::Up => complaint.upvotes += 1,
        semita_api::VoteDirection::Down => complaint.downvotes += 1,
    }
}

fn decrement(complaint: &mut Complaint, direction: semita_api::VoteDirection) {
    match direction {
        semita_api::VoteDirection::Up => complaint.upvotes -= 1,
        semita_api::VoteDirection::Down => complaint.downvotes -= 1,
    }
}
