//! Saga and multi-agent outcome predicates.

use std::collections::HashSet;

use dashu::Integer;

use super::temporal::parse_timestamp;
use super::{array_field, exact_field, number_field, str_field};
use crate::eval::{Arity, FunctionRegistry};
use crate::value::Value;

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register("saga_amount_conserved", Arity::Exact(1), |ev, call| {
        let saga = ev.eval_arg(call, 0)?;
        Ok(Value::Bool(saga_amount_conserved(&saga)))
    });
    registry.register("saga_steps_sequential", Arity::Exact(1), |ev, call| {
        let saga = ev.eval_arg(call, 0)?;
        Ok(Value::Bool(saga_steps_sequential(&saga)))
    });
    registry.register("saga_timeout_valid", Arity::Exact(1), |ev, call| {
        let saga = ev.eval_arg(call, 0)?;
        Ok(Value::Bool(saga_timeout_valid(&saga)))
    });
    registry.register("outcome_consensus_valid", Arity::Exact(1), |ev, call| {
        let outcome = ev.eval_arg(call, 0)?;
        Ok(Value::Bool(outcome_consensus_valid(&outcome)))
    });
}

fn is_completed(step: &Value) -> bool {
    str_field(step, "status") == Some("completed")
}

/// Sum of `amount_micro` over completed steps; `None` if any is unusable.
fn completed_total(steps: &[Value]) -> Option<Integer> {
    steps
        .iter()
        .filter(|step| is_completed(step))
        .try_fold(Integer::ZERO, |total, step| {
            Some(total + exact_field(step, "amount_micro")?)
        })
}

/// Forward amounts must be fully unwound once compensation has run.
fn saga_amount_conserved(saga: &Value) -> bool {
    if saga.as_object().is_none() {
        return false;
    }
    let Some(steps) = array_field(saga, "steps") else {
        return false;
    };
    let compensation = match saga.get("compensation_steps") {
        None | Some(Value::Null) => &[][..],
        Some(value) => match value.as_array() {
            Some(items) => items,
            None => return false,
        },
    };

    let Some(forward) = completed_total(steps) else {
        return false;
    };
    if !compensation.iter().any(is_completed) {
        return true;
    }
    completed_total(compensation).is_some_and(|compensated| compensated == forward)
}

fn saga_steps_sequential(saga: &Value) -> bool {
    let Some(steps) = array_field(saga, "steps") else {
        return false;
    };
    let mut seen = HashSet::with_capacity(steps.len());
    steps.iter().all(|step| match str_field(step, "step_id") {
        Some(id) => seen.insert(id),
        None => false,
    })
}

/// Every completed step must finish within `timeout.per_step_seconds`.
fn saga_timeout_valid(saga: &Value) -> bool {
    let Some(steps) = array_field(saga, "steps") else {
        return false;
    };
    let Some(per_step) = saga.get("timeout").and_then(|t| number_field(t, "per_step_seconds")) else {
        return false;
    };
    steps.iter().filter(|step| is_completed(step)).all(|step| {
        let started = step.get("started_at").and_then(parse_timestamp);
        let completed = step.get("completed_at").and_then(parse_timestamp);
        match (started, completed) {
            (Some(started), Some(completed)) => {
                let seconds = (completed - started).num_milliseconds() as f64 / 1000.0;
                seconds >= 0.0 && seconds <= per_step
            }
            _ => false,
        }
    })
}

/// Checks that the declared outcome type is consistent with the votes.
///
/// - unanimous: at least one vote, all agree, consensus achieved
/// - majority: agree ratio meets the threshold, consensus achieved
/// - deadlock: agree ratio below the threshold, consensus not achieved
/// - escalation: consensus not achieved and an `escalated_to` target named
fn outcome_consensus_valid(outcome: &Value) -> bool {
    let (Some(kind), Some(votes)) = (str_field(outcome, "outcome_type"), array_field(outcome, "votes"))
    else {
        return false;
    };
    let achieved = outcome.get("consensus_achieved").and_then(Value::as_bool);
    let threshold = number_field(outcome, "consensus_threshold");

    let agree = votes
        .iter()
        .filter(|vote| str_field(vote, "vote") == Some("agree"))
        .count();
    let ratio = if votes.is_empty() {
        0.0
    } else {
        agree as f64 / votes.len() as f64
    };

    match kind {
        "unanimous" => !votes.is_empty() && agree == votes.len() && achieved == Some(true),
        "majority" => threshold.is_some_and(|t| ratio >= t) && achieved == Some(true),
        "deadlock" => threshold.is_some_and(|t| ratio < t) && achieved == Some(false),
        "escalation" => {
            achieved != Some(true)
                && str_field(outcome, "escalated_to").is_some_and(|target| !target.is_empty())
        }
        _ => false,
    }
}
