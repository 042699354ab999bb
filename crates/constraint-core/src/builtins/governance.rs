//! Governance builtins: monetary policy, permission boundaries, proposals,
//! execution checkpoints, model baskets, constraint lifecycles and audit
//! trails.

use super::{array_field, exact_field, number_field, str_field, weights_normalized};
use crate::eval::{Arity, FunctionRegistry};
use crate::exact;
use crate::value::Value;

/// Lifecycle transitions a constraint may take.
const LIFECYCLE_TRANSITIONS: &[(&str, &str)] = &[
    ("proposed", "under_review"),
    ("proposed", "rejected"),
    ("under_review", "enacted"),
    ("under_review", "rejected"),
    ("enacted", "deprecated"),
];

/// Fields a permission boundary must carry to be in force.
const BOUNDARY_FIELDS: &[&str] = &["scope", "permitted_if", "reporting", "revocation"];

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register("monetary_policy_solvent", Arity::Exact(2), |ev, call| {
        let policy = ev.eval_arg(call, 0)?;
        let supply = ev.eval_arg(call, 1)?;
        let solvent = match (exact_field(&policy, "conservation_ceiling"), exact::coerce(&supply)) {
            (Some(ceiling), Some(supply)) => supply <= ceiling,
            _ => false,
        };
        Ok(Value::Bool(solvent))
    });
    registry.register("permission_boundary_active", Arity::Exact(1), |ev, call| {
        let boundary = ev.eval_arg(call, 0)?;
        let active = BOUNDARY_FIELDS
            .iter()
            .all(|field| boundary.get(field).is_some_and(|v| !v.is_null()));
        Ok(Value::Bool(active))
    });
    registry.register("proposal_quorum_met", Arity::Exact(1), |ev, call| {
        let proposal = ev.eval_arg(call, 0)?;
        Ok(Value::Bool(quorum_met(&proposal)))
    });
    registry.register("proposal_weights_normalized", Arity::Exact(1), |ev, call| {
        let proposal = ev.eval_arg(call, 0)?;
        let normalized = vote_weights(&proposal)
            .is_some_and(|weights| weights.is_empty() || weights_normalized(weights));
        Ok(Value::Bool(normalized))
    });
    registry.register("proposal_execution_valid", Arity::Exact(1), |ev, call| {
        let execution = ev.eval_arg(call, 0)?;
        Ok(Value::Bool(execution_valid(&execution)))
    });
    registry.register("execution_checkpoint_valid", Arity::Exact(1), |ev, call| {
        let checkpoint = ev.eval_arg(call, 0)?;
        let valid = matches!(
            (
                str_field(&checkpoint, "health_status"),
                str_field(&checkpoint, "proceed_decision"),
            ),
            (Some("healthy"), Some("continue"))
                | (Some("degraded"), Some("continue" | "pause"))
                | (Some("failing"), Some("rollback"))
        );
        Ok(Value::Bool(valid))
    });
    registry.register("basket_weights_normalized", Arity::Exact(1), |ev, call| {
        let basket = ev.eval_arg(call, 0)?;
        let weights: Option<Vec<f64>> = array_field(&basket, "entries")
            .and_then(|entries| entries.iter().map(|e| number_field(e, "weight")).collect());
        let normalized = weights.is_some_and(|w| !w.is_empty() && weights_normalized(w));
        Ok(Value::Bool(normalized))
    });
    registry.register("constraint_lifecycle_valid", Arity::Exact(1), |ev, call| {
        let event = ev.eval_arg(call, 0)?;
        let transition = (str_field(&event, "from_status"), str_field(&event, "to_status"));
        let valid = match transition {
            (Some(from), Some(to)) => LIFECYCLE_TRANSITIONS.contains(&(from, to)),
            _ => false,
        };
        Ok(Value::Bool(valid))
    });
    registry.register("audit_trail_chain_valid", Arity::Exact(1), |ev, call| {
        let trail = ev.eval_arg(call, 0)?;
        Ok(Value::Bool(audit_chain_linked(&trail)))
    });
}

/// Weights of `voting.votes_cast`; `None` when any vote lacks a numeric weight.
fn vote_weights(proposal: &Value) -> Option<Vec<f64>> {
    let votes = proposal.get("voting").and_then(|v| array_field(v, "votes_cast"))?;
    votes.iter().map(|vote| number_field(vote, "weight")).collect()
}

fn quorum_met(proposal: &Value) -> bool {
    let Some(required) = proposal
        .get("voting")
        .and_then(|v| number_field(v, "quorum_required"))
    else {
        return false;
    };
    match vote_weights(proposal) {
        Some(weights) if !weights.is_empty() => weights.iter().sum::<f64>() >= required,
        _ => false,
    }
}

fn execution_valid(execution: &Value) -> bool {
    if str_field(execution, "status") != Some("completed") {
        return false;
    }
    array_field(execution, "changes_applied").is_some_and(|changes| {
        !changes.is_empty()
            && changes
                .iter()
                .all(|change| str_field(change, "result") == Some("success"))
    })
}

/// Structural linkage only: each `previous_hash` names the hash before it,
/// starting from `genesis_hash`. Content hashes are not recomputed.
fn audit_chain_linked(trail: &Value) -> bool {
    let (Some(entries), Some(genesis)) = (array_field(trail, "entries"), str_field(trail, "genesis_hash"))
    else {
        return false;
    };
    let mut expected = genesis;
    for entry in entries {
        if str_field(entry, "previous_hash") != Some(expected) {
            return false;
        }
        match str_field(entry, "entry_hash") {
            Some(hash) => expected = hash,
            None => return false,
        }
    }
    true
}
