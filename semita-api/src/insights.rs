use std::collections::BTreeMap;

/// Community analytics, recomputed from the live collections on every
/// request. Nothing here is persisted.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Insights {
    /// Services currently in `issue` or `outage` state.
    pub active_issues: i64,
    pub total_complaints: i64,
    pub open_complaints: i64,
    /// `round(100 * resolved / total)`, 0 when there are no complaints.
    pub resolution_rate: i64,
    pub category_breakdown: BTreeMap<String, i64>,
}
