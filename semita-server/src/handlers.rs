use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use semita_api::{
    Comment, Complaint, ComplaintId, ComplaintStatus, Insights, NewComment, NewComplaint,
    Notification, NotificationId, Service, ServiceId, SetStatus, StatusReport, Uuid, VoteCounts,
    VoteRequest,
};

use crate::{complaints, db::Db, insights, notifications, services, votes, Error};

#[derive(serde::Deserialize, serde::Serialize)]
pub struct ServiceList {
    pub services: Vec<Service>,
}

#[derive(serde::Deserialize, serde::Serialize)]
pub struct ServiceUpdated {
    pub service: Service,
}

#[derive(serde::Deserialize, serde::Serialize)]
pub struct ComplaintList {
    pub complaints: Vec<Complaint>,
}

#[derive(serde::Deserialize, serde::Serialize)]
pub struct ComplaintDetail {
    pub complaint: Complaint,
}

#[derive(serde::Deserialize, serde::Serialize)]
pub struct CommentAdded {
    pub comment: Comment,
}

#[derive(serde::Deserialize, serde::Serialize)]
pub struct NotificationList {
    pub notifications: Vec<Notification>,
    pub unread: usize,
}

#[derive(serde::Deserialize)]
pub struct ComplaintFilter {
    pub status: Option<String>,
}

pub async fn list_services(State(db): State<Db>) -> Result<Json<ServiceList>, Error> {
    Ok(Json(ServiceList {
        services: services::list(&db).await.context("listing services")?,
    }))
}

pub async fn report_service_status(
    State(db): State<Db>,
    Path(service_id): Path<String>,
    Json(report): Json<StatusReport>,
) -> Result<Json<ServiceUpdated>, Error> {
    let id = ServiceId(service_id);
    let service = services::report_status(&db, &id, report).await?;
    Ok(Json(ServiceUpdated { service }))
}

pub async fn list_complaints(
    State(db): State<Db>,
    Query(filter): Query<ComplaintFilter>,
) -> Result<Json<ComplaintList>, Error> {
    let complaints = match filter.status {
        None => complaints::list(&db).await.context("listing complaints")?,
        Some(status) => {
            let status = status.parse::<ComplaintStatus>()?;
            complaints::list_by_status(&db, status)
                .await
                .context("listing complaints by status")?
        }
    };
    Ok(Json(ComplaintList { complaints }))
}

pub async fn get_complaint(
    State(db): State<Db>,
    Path(complaint_id): Path<Uuid>,
) -> Result<Json<ComplaintDetail>, Error> {
    let complaint = complaints::get(&db, &ComplaintId(complaint_id)).await?;
    Ok(Json(ComplaintDetail { complaint }))
}

pub async fn submit_complaint(
    State(db): State<Db>,
    Json(data): Json<NewComplaint>,
) -> Result<Json<ComplaintDetail>, Error> {
    let complaint = complaints::submit(&db, data).await?;
    Ok(Json(ComplaintDetail { complaint }))
}

pub async fn vote_complaint(
    State(db): State<Db>,
    Path(complaint_id): Path<Uuid>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<VoteCounts>, Error> {
    let counts = votes::vote(&db, &ComplaintId(complaint_id), req).await?;
    Ok(Json(counts))
}

pub async fn add_comment(
    State(db): State<Db>,
    Path(complaint_id): Path<Uuid>,
    Json(data): Json<NewComment>,
) -> Result<Json<CommentAdded>, Error> {
    let comment = complaints::add_comment(&db, &ComplaintId(complaint_id), data).await?;
    Ok(Json(CommentAdded { comment }))
}

pub async fn set_complaint_status(
    State(db): State<Db>,
    Path(complaint_id): Path<Uuid>,
    Json(data): Json<SetStatus>,
) -> Result<Json<ComplaintDetail>, Error> {
    let complaint =
        complaints::set_status(&db, &ComplaintId(complaint_id), data.status).await?;
    Ok(Json(ComplaintDetail { complaint }))
}

pub async fn list_notifications(
    State(db): State<Db>,
) -> Result<Json<NotificationList>, Error> {
    let notifications = notifications::list(&db)
        .await
        .context("listing notifications")?;
    let unread = notifications.iter().filter(|n| !n.read).count();
    Ok(Json(NotificationList {
        notifications,
        unread,
    }))
}

pub async fn mark_notification_read(
    State(db): State<Db>,
    Path(notification_id): Path<Uuid>,
) -> Result<(), Error> {
    notifications::mark_read(&db, &NotificationId(notification_id)).await
}

pub async fn mark_all_notifications_read(State(db): State<Db>) -> Result<(), Error> {
    notifications::mark_all_read(&db)
        .await
        .context("marking all notifications read")?;
    Ok(())
}

pub async fn get_insights(State(db): State<Db>) -> Result<Json<Insights>, Error> {
    Ok(Json(
        insights::compute(&db).await.context("computing insights")?,
    ))
}
