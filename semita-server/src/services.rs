use anyhow::Context;
use chrono::Utc;
use semita_api::{NotificationType, Service, ServiceId, ServiceStatus, StatusReport};

use crate::{
    db::{self, Db},
    notifications, Error,
};

/// Seeded once at startup where absent. Recovered from the original
/// deployment's init data; icons are the frontend's icon names.
const DEFAULT_SERVICES: &[(&str, &str, &str, &str)] = &[
    (
        "electricity",
        "Electricity",
        "Power supply is stable across all blocks",
        "Zap",
    ),
    ("water", "Water Supply", "Water supply is normal", "Droplets"),
    (
        "garbage",
        "Garbage Collection",
        "Collection schedule is on track",
        "Trash2",
    ),
    (
        "security",
        "Security",
        "All security measures are operational",
        "Shield",
    ),
    (
        "maintenance",
        "Maintenance",
        "No ongoing maintenance issues",
        "Wrench",
    ),
];

pub async fn list(db: &Db) -> anyhow::Result<Vec<Service>> {
    Ok(db
        .fetch_all(db::SERVICE_PREFIX)
        .await
        .context("listing services")?
        .into_iter()
        .map(|(_, s)| s)
        .collect())
}

pub async fn seed_defaults(db: &Db) -> anyhow::Result<()> {
    for (id, name, description, icon) in DEFAULT_SERVICES {
        let id = ServiceId(String::from(*id));
        let key = db::service_key(&id);
        let _guard = db.lock(&key).await;
        if db.fetch::<Service>(&key).await?.is_some() {
            continue;
        }
        db.save(
            &key,
            &Service {
                id,
                name: String::from(*name),
                status: ServiceStatus::Active,
                description: String::from(*description),
                last_update: Utc::now(),
                reports_count: 0,
                icon: String::from(*icon),
                reported_by: None,
            },
        )
        .await
        .with_context(|| format!("seeding service {key:?}"))?;
    }
    Ok(())
}

/// Apply a resident's status report and fan out the matching notification.
/// Reporting on an id nobody has seen yet creates a default shell for it
/// rather than failing.
pub async fn report_status(
    db: &Db,
    id: &ServiceId,
    report: StatusReport,
) -> Result<Service, Error> {
    let key = db::service_key(id);
    let _guard = db.lock(&key).await;
    let mut service: Service = db
        .fetch(&key)
        .await
        .with_context(|| format!("fetching service {id}"))?
        .unwrap_or_else(|| Service {
            id: id.clone(),
            name: id.0.clone(),
            status: report.status,
            description: String::new(),
            last_update: Utc::now(),
            reports_count: 0,
            icon: String::from("default"),
            reported_by: None,
        });
    service.status = report.status;
    service.description = report.description.clone();
    service.last_update = Utc::now();
    service.reports_count += 1;
    service.reported_by = Some(report.reported_by);
    db.save(&key, &service)
        .await
        .with_context(|| format!("persisting service {id}"))?;

    let kind = match report.status {
        ServiceStatus::Outage => NotificationType::Alert,
        ServiceStatus::Issue => NotificationType::Warning,
        _ => NotificationType::Info,
    };
    notifications::push(
        db,
        kind,
        format!("{} Status Update", service.name),
        report.description,
        Some(id.clone()),
        None,
    )
    .await?;
    Ok(service)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::db::MemoryStore;

    fn mem() -> Db {
        Db::new(Arc::new(MemoryStore::new()))
    }

    fn report(status: ServiceStatus, description: &str) -> StatusReport {
        StatusReport {
            status,
            description: String::from(description),
            reported_by: String::from("resident1"),
        }
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let db = mem();
        seed_defaults(&db).await.unwrap();
        let before = list(&db).await.unwrap();
        assert_eq!(before.len(), 5);

        // a report mutates one record; reseeding must not undo it
        report_status(
            &db,
            &ServiceId(String::from("water")),
            report(ServiceStatus::Outage, "Main line burst"),
        )
        .await
        .unwrap();
        seed_defaults(&db).await.unwrap();

        let after = list(&db).await.unwrap();
        assert_eq!(after.len(), 5);
        let water = after.iter().find(|s| s.id.0 == "water").unwrap();
        assert_eq!(water.status, ServiceStatus::Outage);
        assert_eq!(water.reports_count, 1);
    }

    #[tokio::test]
    async fn outage_report_emits_one_alert() {
        let db = mem();
        seed_defaults(&db).await.unwrap();
        let updated = report_status(
            &db,
            &ServiceId(String::from("water")),
            report(ServiceStatus::Outage, "Main line burst"),
        )
        .await
        .unwrap();
        assert_eq!(updated.status, ServiceStatus::Outage);
        assert_eq!(updated.reports_count, 1);

        let alerts: Vec<_> = notifications::list(&db)
            .await
            .unwrap()
            .into_iter()
            .filter(|n| n.kind == NotificationType::Alert)
            .collect();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].service_id, Some(ServiceId(String::from("water"))));
        assert_eq!(alerts[0].message, "Main line burst");
    }

    #[tokio::test]
    async fn issue_and_recovery_map_to_warning_and_info() {
        let db = mem();
        seed_defaults(&db).await.unwrap();
        let id = ServiceId(String::from("electricity"));
        report_status(&db, &id, report(ServiceStatus::Issue, "Flickering in Block C"))
            .await
            .unwrap();
        report_status(&db, &id, report(ServiceStatus::Active, "Restored"))
            .await
            .unwrap();

        let kinds: Vec<_> = notifications::list(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.kind)
            .collect();
        assert!(kinds.contains(&NotificationType::Warning));
        assert!(kinds.contains(&NotificationType::Info));
    }

    #[tokio::test]
    async fn unknown_service_gets_a_default_shell() {
        let db = mem();
        let id = ServiceId(String::from("streetlights"));
        let created = report_status(&db, &id, report(ServiceStatus::Issue, "Lamp out"))
            .await
            .unwrap();
        assert_eq!(created.name, "streetlights");
        assert_eq!(created.reports_count, 1);
        assert_eq!(created.icon, "default");
        assert_eq!(list(&db).await.unwrap().len(), 1);
    }
}
