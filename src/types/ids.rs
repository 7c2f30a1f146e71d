//! Deterministic UUIDv5 identifiers for runs and actions.
//!
//! The UUID namespace is derived from a stable tag (`NS_TAG`) so that
//! `run_id` and `action_id` are reproducible across runs for the same
//! serialized step/action sequence.
use std::fmt::Write;
use uuid::Uuid;

use super::plan::{Action, Plan};
use crate::constants::NS_TAG;

/// Internal: return the UUID namespace used for deterministic IDs.
fn namespace() -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, NS_TAG.as_bytes())
}

/// Serialize an action into a stable, human-readable string used for UUIDv5
/// input. Only the op mnemonic and the target key participate; rendered
/// file contents (which may embed credentials) never do.
fn serialize_action(a: &Action) -> String {
    format!("{}:{}", a.op.code(), a.target.key())
}

/// Compute a deterministic UUIDv5 for a plan by serializing steps and their
/// actions in order.
///
/// Two plans with identical step/action sequences (including ordering) have
/// the same `run_id`.
#[must_use]
pub fn run_id(plan: &Plan) -> Uuid {
    let ns = namespace();
    let mut s = String::new();
    for step in &plan.steps {
        s.push_str(&step.name);
        s.push('\n');
        for a in &step.actions {
            s.push_str(&serialize_action(a));
            s.push('\n');
        }
    }
    Uuid::new_v5(&ns, s.as_bytes())
}

/// Compute a deterministic UUIDv5 for an action as a function of the run ID
/// and the action's serialized form, including the stable position index.
#[must_use]
pub fn action_id(run_id: &Uuid, action: &Action, idx: usize) -> Uuid {
    let mut s = serialize_action(action);
    let _ = write!(s, "#{idx}");
    Uuid::new_v5(run_id, s.as_bytes())
}
