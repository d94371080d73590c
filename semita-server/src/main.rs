use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod complaints;
mod db;
mod error;
mod handlers;
mod insights;
mod notifications;
mod services;
mod votes;

pub use error::Error;

use crate::db::{Db, MemoryStore};

#[derive(structopt::StructOpt)]
struct Opt {
    /// Address to listen on
    #[structopt(short, long, default_value = "0.0.0.0:3000")]
    bind: std::net::SocketAddr,
}

pub fn app(db: Db) -> Router {
    Router::new()
        .route("/api/services", get(handlers::list_services))
        .route(
            "/api/services/:service_id/status",
            post(handlers::report_service_status),
        )
        .route(
            "/api/complaints",
            get(handlers::list_complaints).post(handlers::submit_complaint),
        )
        .route(
            "/api/complaints/:complaint_id",
            get(handlers::get_complaint),
        )
        .route(
            "/api/complaints/:complaint_id/vote",
            post(handlers::vote_complaint),
        )
        .route(
            "/api/complaints/:complaint_id/comments",
            post(handlers::add_comment),
        )
        .route(
            "/api/complaints/:complaint_id/status",
            post(handlers::set_complaint_status),
        )
        .route("/api/notifications", get(handlers::list_notifications))
        .route(
            "/api/notifications/:notification_id/read",
            post(handlers::mark_notification_read),
        )
        .route(
            "/api/notifications/read-all",
            post(handlers::mark_all_notifications_read),
        )
        .route("/api/insights", get(handlers::get_insights))
        .layer(TraceLayer::new_for_http())
        // the SPA frontend is served from a different origin
        .layer(CorsLayer::permissive())
        .with_state(db)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let opt = <Opt as structopt::StructOpt>::from_args();

    let db = Db::new(Arc::new(MemoryStore::new()));
    services::seed_defaults(&db)
        .await
        .context("seeding default services")?;

    tracing::info!("listening on {}", opt.bind);
    axum::Server::bind(&opt.bind)
        .serve(app(db).into_make_service())
        .await
        .context("serving axum webserver")
}
