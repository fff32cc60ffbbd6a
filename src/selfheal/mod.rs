//! Self-heal planning for cluster task events.
//!
//! When a deployed task dies, the event bus emits a state-change event. The
//! planner renders a diagnostic prompt from that event plus the service's
//! recent history, parses the model's (possibly messy) response into a
//! [`RemediationPlan`], and decides which conservative action to take.
//!
//! Only the planning logic lives here. Invoking the model and mutating the
//! cluster are the hosting platform's job; the `plan` CLI subcommand drives
//! this module as an offline dry run.

pub mod event;
pub mod plan;

pub use event::{render_prompt, ServiceEvent, ServiceRef, MAX_RECENT_SERVICE_EVENTS};
pub use plan::{RemediationPlan, SafeAction};

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

/// The action the operator (or an automated runner) should take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Remediation {
    /// Plan proposed nothing actionable.
    NoOp,
    /// Plan proposed an action but the event named no cluster/service.
    MissingTarget,
    /// Redeploy the service's tasks without changing its definition.
    ForceRedeploy { service: String },
    /// Raise the service's desired count.
    ScaleTo { service: String, desired: u64 },
    /// Scale-up refused: the service already has tasks desired.
    SkippedNonZeroDesired { service: String, desired: u64 },
}

/// Decide what to do about a plan.
///
/// Only `force_redeploy` and `scale_up` are ever acted on, and scaling is
/// deliberately conservative: a service is only brought from zero to one,
/// never pushed higher.
pub fn decide(
    plan: &RemediationPlan,
    target: Option<&ServiceRef>,
    desired_count: u64,
) -> Remediation {
    if !matches!(
        plan.safe_action,
        SafeAction::ForceRedeploy | SafeAction::ScaleUp
    ) {
        return Remediation::NoOp;
    }

    let Some(target) = target else {
        return Remediation::MissingTarget;
    };

    match plan.safe_action {
        SafeAction::ForceRedeploy => Remediation::ForceRedeploy {
            service: target.service_name.clone(),
        },
        SafeAction::ScaleUp => {
            if desired_count == 0 {
                Remediation::ScaleTo {
                    service: target.service_name.clone(),
                    desired: 1,
                }
            } else {
                Remediation::SkippedNonZeroDesired {
                    service: target.service_name.clone(),
                    desired: desired_count,
                }
            }
        }
        SafeAction::None | SafeAction::Note => Remediation::NoOp,
    }
}

/// Errors from loading planner inputs off disk (the CLI dry-run path).
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Load a captured cluster event from a JSON file.
pub fn load_event(path: &Path) -> Result<Value, PlanError> {
    let contents = read(path)?;
    serde_json::from_str(&contents).map_err(|source| PlanError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load captured service history from a JSON array file, keeping only the
/// most recent [`MAX_RECENT_SERVICE_EVENTS`] entries.
pub fn load_service_events(path: &Path) -> Result<Vec<ServiceEvent>, PlanError> {
    let contents = read(path)?;
    let mut events: Vec<ServiceEvent> =
        serde_json::from_str(&contents).map_err(|source| PlanError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    events.truncate(MAX_RECENT_SERVICE_EVENTS);
    Ok(events)
}

fn read(path: &Path) -> Result<String, PlanError> {
    std::fs::read_to_string(path).map_err(|source| PlanError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> ServiceRef {
        ServiceRef {
            cluster_arn: "arn:aws:ecs:us-east-1:123456789012:cluster/poc".to_string(),
            service_name: "agentic-poc-service".to_string(),
        }
    }

    fn plan_with(action: SafeAction) -> RemediationPlan {
        RemediationPlan {
            diagnosis: "test".to_string(),
            confidence: 0.8,
            safe_action: action,
            note: String::new(),
        }
    }

    #[test]
    fn note_and_none_plans_are_noops() {
        let target = target();
        for action in [SafeAction::None, SafeAction::Note] {
            let decision = decide(&plan_with(action), Some(&target), 0);
            assert_eq!(decision, Remediation::NoOp);
        }
    }

    #[test]
    fn actionable_plan_without_target_is_reported() {
        let decision = decide(&plan_with(SafeAction::ForceRedeploy), None, 0);
        assert_eq!(decision, Remediation::MissingTarget);
    }

    #[test]
    fn force_redeploy_names_the_service() {
        let decision = decide(&plan_with(SafeAction::ForceRedeploy), Some(&target()), 3);
        assert_eq!(
            decision,
            Remediation::ForceRedeploy {
                service: "agentic-poc-service".to_string()
            }
        );
    }

    #[test]
    fn scale_up_only_from_zero() {
        let decision = decide(&plan_with(SafeAction::ScaleUp), Some(&target()), 0);
        assert_eq!(
            decision,
            Remediation::ScaleTo {
                service: "agentic-poc-service".to_string(),
                desired: 1
            }
        );
    }

    #[test]
    fn scale_up_skipped_when_tasks_already_desired() {
        let decision = decide(&plan_with(SafeAction::ScaleUp), Some(&target()), 2);
        assert_eq!(
            decision,
            Remediation::SkippedNonZeroDesired {
                service: "agentic-poc-service".to_string(),
                desired: 2
            }
        );
    }

    #[test]
    fn load_event_reports_missing_file() {
        let err = load_event(Path::new("no/such/event.json")).unwrap_err();
        assert!(matches!(err, PlanError::Read { .. }));
    }

    #[test]
    fn load_service_events_caps_history() {
        use std::io::Write;

        let events: Vec<ServiceEvent> = (0..10)
            .map(|i| ServiceEvent {
                message: format!("event {i}"),
                created_at: "2025-08-25T12:00:00Z".to_string(),
            })
            .collect();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&events).unwrap()).unwrap();

        let loaded = load_service_events(file.path()).unwrap();
        assert_eq!(loaded.len(), MAX_RECENT_SERVICE_EVENTS);
        assert_eq!(loaded[0].message, "event 0");
    }
}
