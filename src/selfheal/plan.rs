//! Remediation plans parsed from model output.
//!
//! The diagnostic model is asked for strict JSON but does not always comply:
//! output may carry leading prose, trailing newlines, or no JSON at all.
//! Parsing is therefore tolerant - it never fails, falling back to a
//! note-only plan that preserves the raw text for the operator.

use serde::{Deserialize, Serialize};

/// Confidence assigned when the model returned free text instead of JSON.
pub const FREE_TEXT_CONFIDENCE: f64 = 0.5;

/// The closed set of actions a plan may propose.
///
/// Anything the model says outside this set fails strict parsing and falls
/// back to [`SafeAction::Note`], so an inventive model can never name an
/// action the decision logic would act on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SafeAction {
    #[default]
    None,
    ForceRedeploy,
    ScaleUp,
    Note,
}

/// A diagnosis and proposed action for a failing service.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemediationPlan {
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub safe_action: SafeAction,
    #[serde(default)]
    pub note: String,
}

impl RemediationPlan {
    /// Parse a plan out of raw model output.
    ///
    /// Takes the substring between the first `{` and the last `}` and parses
    /// it as JSON; missing keys default (absent `safe_action` means no
    /// action). If there is no brace pair or the JSON is invalid, the whole
    /// text becomes a note-only plan.
    pub fn parse(text: &str) -> Self {
        if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
            if start < end {
                if let Ok(plan) = serde_json::from_str::<RemediationPlan>(&text[start..=end]) {
                    return plan;
                }
            }
        }
        Self::free_text(text)
    }

    fn free_text(text: &str) -> Self {
        Self {
            diagnosis: text.trim().to_string(),
            confidence: FREE_TEXT_CONFIDENCE,
            safe_action: SafeAction::Note,
            note: "model returned free text".to_string(),
        }
    }
}
