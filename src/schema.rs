use serde::Deserialize;

// ------------------------------------------------------------
// Pulumi Service API response bodies
// ------------------------------------------------------------
//
// Only the fields the scrapers read are required. Anything else
// the API returns is ignored by serde.
//

/// Body of `GET /api/orgs/{org}/resources/summary`.
#[derive(Debug, Deserialize, Clone)]
pub struct ResourceSummary {
    /// Hourly buckets, oldest first. The last entry is the current hour.
    pub summary: Vec<HourlySummary>,
}

/// One hour of resources-under-management data.
#[derive(Debug, Deserialize, Clone)]
pub struct HourlySummary {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,

    /// Resources under management during this hour
    pub resources: i64,
}

/// Body of `GET /api/user/stacks`.
#[derive(Debug, Deserialize, Clone)]
pub struct StackList {
    pub stacks: Vec<StackSummary>,
}

/// One stack as listed by the user stacks endpoint.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StackSummary {
    pub org_name: String,
    pub project_name: String,
    pub stack_name: String,

    /// Unix seconds of the last update; absent for stacks never updated
    #[serde(default)]
    pub last_update: Option<i64>,

    #[serde(default)]
    pub resource_count: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_without_update_fields_decodes() {
        let stack: StackSummary = serde_json::from_str(
            r#"{"orgName":"acme","projectName":"web","stackName":"dev"}"#,
        )
        .unwrap();

        assert_eq!(stack.stack_name, "dev");
        assert_eq!(stack.last_update, None);
        assert_eq!(stack.resource_count, None);
    }

    #[test]
    fn summary_ignores_unknown_fields() {
        let summary: ResourceSummary = serde_json::from_str(
            r#"{"summary":[{"year":2024,"month":1,"day":1,"hour":3,"resources":7,"extra":true}],"next":null}"#,
        )
        .unwrap();

        assert_eq!(summary.summary.len(), 1);
        assert_eq!(summary.summary[0].resources, 7);
    }
}
