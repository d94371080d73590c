use std::collections::BTreeMap;

use anyhow::Context;
use semita_api::{Complaint, ComplaintStatus, Insights, Service, ServiceStatus};

use crate::db::{self, Db};

/// Recompute community metrics from the live collections. Nothing is
/// persisted and nothing is mutated; two scans per call.
pub async fn compute(db: &Db) -> anyhow::Result<Insights> {
    let services: Vec<(String, Service)> = db
        .fetch_all(db::SERVICE_PREFIX)
        .await
        .context("scanning services for insights")?;
    let complaints: Vec<(String, Complaint)> = db
        .fetch_all(db::COMPLAINT_PREFIX)
        .await
        .context("scanning complaints for insights")?;

    let active_issues = services
        .iter()
        .filter(|(_, s)| matches!(s.status, ServiceStatus::Issue | ServiceStatus::Outage))
        .count() as i64;

    let total_complaints = complaints.len() as i64;
    let open_complaints = complaints
        .iter()
        .filter(|(_, c)| c.status == ComplaintStatus::Open)
        .count() as i64;
    let resolved = complaints
        .iter()
        .filter(|(_, c)| c.status == ComplaintStatus::Resolved)
        .count() as i64;

    let resolution_rate = if total_complaints == 0 {
        0
    } else {
        (100.0 * resolved as f64 / total_complaints as f64).round() as i64
    };

    let mut category_breakdown = BTreeMap::new();
    for (_, c) in &complaints {
        *category_breakdown.entry(c.category.clone()).or_insert(0) += 1;
    }

    Ok(Insights {
        active_issues,
        total_complaints,
        open_complaints,
        resolution_rate,
        category_breakdown,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{complaints, db::MemoryStore, services};
    use semita_api::{NewComplaint, ServiceId, StatusReport};

    fn mem() -> Db {
        Db::new(Arc::new(MemoryStore::new()))
    }

    fn complaint(title: &str, category: &str) -> NewComplaint {
        NewComplaint {
            title: String::from(title),
            category: String::from(category),
            description: String::from("details"),
            location: None,
        }
    }

    #[tokio::test]
    async fn empty_store_yields_zero_rate_not_a_division_error() {
        let db = mem();
        let insights = compute(&db).await.unwrap();
        assert_eq!(insights.total_complaints, 0);
        assert_eq!(insights.resolution_rate, 0);
        assert_eq!(insights.active_issues, 0);
        assert!(insights.category_breakdown.is_empty());
    }

    #[tokio::test]
    async fn rate_is_rounded_to_the_nearest_percent() {
        let db = mem();
        let a = complaints::submit(&db, complaint("a", "Water Supply"))
            .await
            .unwrap();
        complaints::submit(&db, complaint("b", "Water Supply"))
            .await
            .unwrap();
        complaints::submit(&db, complaint("c", "Maintenance"))
            .await
            .unwrap();
        complaints::set_status(&db, &a.id, semita_api::ComplaintStatus::Resolved)
            .await
            .unwrap();

        let insights = compute(&db).await.unwrap();
        assert_eq!(insights.total_complaints, 3);
        assert_eq!(insights.open_complaints, 2);
        // 1/3 resolved, rounds to 33
        assert_eq!(insights.resolution_rate, 33);
        assert_eq!(insights.category_breakdown.get("Water Supply"), Some(&2));
        assert_eq!(insights.category_breakdown.get("Maintenance"), Some(&1));
    }

    #[tokio::test]
    async fn services_in_trouble_count_as_active_issues() {
        let db = mem();
        services::seed_defaults(&db).await.unwrap();
        for (id, status) in [
            ("water", semita_api::ServiceStatus::Outage),
            ("electricity", semita_api::ServiceStatus::Issue),
            ("garbage", semita_api::ServiceStatus::Maintenance),
        ] {
            services::report_status(
                &db,
                &ServiceId(String::from(id)),
                StatusReport {
                    status,
                    description: String::from("report"),
                    reported_by: String::from("resident1"),
                },
            )
            .await
            .unwrap();
        }
        let insights = compute(&db).await.unwrap();
        // maintenance is not an active issue
        assert_eq!(insights.active_issues, 2);
    }
}
