//! Cluster event parsing and prompt rendering.
//!
//! Task state-change events arrive as loosely structured JSON from the event
//! bus. Extraction never panics: anything missing or malformed simply yields
//! no target, which the decision logic reports as such.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Most recent service events included in the prompt.
pub const MAX_RECENT_SERVICE_EVENTS: usize = 6;

/// Character limit per prompt section, keeping oversized event payloads
/// from blowing the model's input budget.
pub const PROMPT_SECTION_LIMIT: usize = 5000;

const PROMPT_TEMPLATE: &str = "You are a DevOps SRE assistant. Given the following ECS event and recent service events, diagnose the most likely root cause and propose ONE safe action.

Return STRICT JSON with keys:
- diagnosis: short string
- confidence: number between 0 and 1
- safe_action: one of [\"none\",\"force_redeploy\",\"scale_up\",\"note\"]
- note: short operator note

EVENT:
{event}

RECENT_SERVICE_EVENTS:
{svc_events}
";

/// Identifies the service a cluster event refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceRef {
    pub cluster_arn: String,
    pub service_name: String,
}

impl ServiceRef {
    /// Extract the target service from a task state-change event.
    ///
    /// The cluster ARN comes from `detail.clusterArn`, falling back to the
    /// first entry of the top-level `resources` array. The service name is
    /// the part after the colon in `detail.group` (`"service:<name>"`).
    /// Returns `None` when either half is missing or empty.
    pub fn from_event(event: &Value) -> Option<Self> {
        let detail = event.get("detail");

        let cluster_arn = detail
            .and_then(|d| d.get("clusterArn"))
            .and_then(Value::as_str)
            .or_else(|| {
                event
                    .get("resources")
                    .and_then(|r| r.get(0))
                    .and_then(Value::as_str)
            })
            .filter(|s| !s.is_empty())?;

        let group = detail
            .and_then(|d| d.get("group"))
            .and_then(Value::as_str)
            .unwrap_or("");
        let service_name = group
            .split_once(':')
            .map(|(_, name)| name)
            .filter(|name| !name.is_empty())?;

        Some(Self {
            cluster_arn: cluster_arn.to_string(),
            service_name: service_name.to_string(),
        })
    }
}

/// A recent event from the service's deployment history, fed to the prompt
/// as context.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceEvent {
    pub message: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Render the diagnostic prompt for an event and its service history.
///
/// Each substituted section is truncated to [`PROMPT_SECTION_LIMIT`]
/// characters.
pub fn render_prompt(event: &Value, service_events: &[ServiceEvent]) -> String {
    let event_json = truncate_chars(
        serde_json::to_string(event).unwrap_or_default(),
        PROMPT_SECTION_LIMIT,
    );
    let events_json = truncate_chars(
        serde_json::to_string(service_events).unwrap_or_default(),
        PROMPT_SECTION_LIMIT,
    );

    PROMPT_TEMPLATE
        .replacen("{event}", &event_json, 1)
        .replacen("{svc_events}", &events_json, 1)
}

fn truncate_chars(s: String, limit: usize) -> String {
    if s.chars().count() <= limit {
        s
    } else {
        s.chars().take(limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_target_from_detail() {
        let event = json!({
            "detail": {
                "clusterArn": "arn:aws:ecs:us-east-1:123456789012:cluster/poc",
                "group": "service:agentic-poc-service",
            }
        });
        let target = ServiceRef::from_event(&event).unwrap();
        assert_eq!(
            target.cluster_arn,
            "arn:aws:ecs:us-east-1:123456789012:cluster/poc"
        );
        assert_eq!(target.service_name, "agentic-poc-service");
    }

    #[test]
    fn falls_back_to_resources_for_cluster_arn() {
        let event = json!({
            "resources": ["arn:aws:ecs:us-east-1:123456789012:cluster/poc"],
            "detail": { "group": "service:web" }
        });
        let target = ServiceRef::from_event(&event).unwrap();
        assert_eq!(target.service_name, "web");
    }

    #[test]
    fn missing_group_yields_no_target() {
        let event = json!({
            "detail": { "clusterArn": "arn:aws:ecs:us-east-1:123456789012:cluster/poc" }
        });
        assert_eq!(ServiceRef::from_event(&event), None);
    }

    #[test]
    fn group_without_service_name_yields_no_target() {
        let event = json!({
            "detail": {
                "clusterArn": "arn:aws:ecs:us-east-1:123456789012:cluster/poc",
                "group": "service:",
            }
        });
        assert_eq!(ServiceRef::from_event(&event), None);
    }

    #[test]
    fn empty_event_yields_no_target() {
        assert_eq!(ServiceRef::from_event(&json!({})), None);
    }

    #[test]
    fn prompt_contains_event_and_history() {
        let event = json!({ "detail": { "stoppedReason": "OutOfMemoryError" } });
        let history = vec![ServiceEvent {
            message: "service poc has reached a steady state.".to_string(),
            created_at: "2025-08-25T12:00:00Z".to_string(),
        }];
        let prompt = render_prompt(&event, &history);
        assert!(prompt.contains("OutOfMemoryError"));
        assert!(prompt.contains("steady state"));
        assert!(prompt.contains("safe_action"));
    }

    #[test]
    fn prompt_truncates_oversized_event() {
        let event = json!({ "blob": "x".repeat(20_000) });
        let prompt = render_prompt(&event, &[]);
        // Template text plus one truncated section; the 20k payload must not
        // survive intact.
        assert!(prompt.len() < PROMPT_SECTION_LIMIT + PROMPT_TEMPLATE.len() + 100);
    }
}
