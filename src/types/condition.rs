// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::conditions::*;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: String,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub last_transition_time: String,
}

impl Condition {
    fn new(condition_type: &str, status: bool, reason: &str, message: Option<String>) -> Self {
        Condition {
            condition_type: condition_type.to_string(),
            status: if status { "True" } else { "False" }.to_string(),
            reason: reason.to_string(),
            message,
            last_transition_time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    /// The external resource exists and is ready for use
    pub fn available() -> Self {
        Self::new(TYPE_READY, true, REASON_AVAILABLE, None)
    }

    /// The external resource was just created
    pub fn creating() -> Self {
        Self::new(TYPE_READY, false, REASON_CREATING, None)
    }

    /// The external resource is being deleted
    pub fn deleting() -> Self {
        Self::new(TYPE_READY, false, REASON_DELETING, None)
    }

    pub fn reconcile_success() -> Self {
        Self::new(TYPE_SYNCED, true, REASON_RECONCILE_SUCCESS, None)
    }

    pub fn reconcile_error(message: impl Into<String>) -> Self {
        Self::new(TYPE_SYNCED, false, REASON_RECONCILE_ERROR, Some(message.into()))
    }

    pub fn is_true(&self) -> bool {
        self.status == "True"
    }
}

/// Set a condition, replacing any existing condition of the same type.
/// The transition time is kept when the status does not change.
pub fn set_condition(conditions: &mut Vec<Condition>, mut condition: Condition) {
    match conditions
        .iter_mut()
        .find(|c| c.condition_type == condition.condition_type)
    {
        Some(existing) => {
            if existing.status == condition.status {
                condition.last_transition_time = existing.last_transition_time.clone();
            }
            *existing = condition;
        }
        None => conditions.push(condition),
    }
}

/// Find a condition by type
pub fn find_condition<'a>(conditions: &'a [Condition], condition_type: &str) -> Option<&'a Condition> {
    conditions.iter().find(|c| c.condition_type == condition_type)
}
