//! Delegation chain, delegation tree and emergent capability predicates.

use dashu::Integer;

use super::temporal::parse_timestamp;
use super::{array_field, exact_field, str_field, string_list};
use crate::eval::{Arity, Call, EvalError, Evaluator, FunctionRegistry};
use crate::exact;
use crate::value::Value;

/// Trees deeper than this are rejected outright.
pub const MAX_TREE_DEPTH: usize = 10;

pub(super) fn register(registry: &mut FunctionRegistry) {
    registry.register("all_links_subset_authority", Arity::Exact(1), |ev, call| {
        links_predicate(ev, call, |links| {
            let scopes: Option<Vec<Vec<&str>>> = links
                .iter()
                .map(|link| link.get("authority_scope").and_then(string_list))
                .collect();
            scopes.is_some_and(|scopes| {
                scopes
                    .windows(2)
                    .all(|pair| pair[1].iter().all(|s| pair[0].contains(s)))
            })
        })
    });
    registry.register("delegation_budget_conserved", Arity::Exact(1), |ev, call| {
        links_predicate(ev, call, |links| {
            links.windows(2).all(|pair| {
                let parent = pair[0].get("budget_allocated_micro").unwrap_or(&Value::Null);
                let child = pair[1].get("budget_allocated_micro").unwrap_or(&Value::Null);
                if parent.is_null() || child.is_null() {
                    return true;
                }
                match (exact::coerce(parent), exact::coerce(child)) {
                    (Some(parent), Some(child)) => child <= parent,
                    _ => false,
                }
            })
        })
    });
    registry.register("links_temporally_ordered", Arity::Exact(1), |ev, call| {
        links_predicate(ev, call, |links| {
            let stamps: Option<Vec<_>> = links
                .iter()
                .map(|link| link.get("timestamp").and_then(parse_timestamp))
                .collect();
            stamps.is_some_and(|stamps| stamps.windows(2).all(|pair| pair[0] <= pair[1]))
        })
    });
    registry.register("links_form_chain", Arity::Exact(1), |ev, call| {
        links_predicate(ev, call, |links| {
            links.windows(2).all(|pair| {
                matches!(
                    (str_field(&pair[0], "delegatee"), str_field(&pair[1], "delegator")),
                    (Some(delegatee), Some(delegator)) if delegatee == delegator
                )
            })
        })
    });
    registry.register("no_emergent_in_individual", Arity::Exact(2), |ev, call| {
        let emergent = ev.eval_arg(call, 0)?;
        let individual = ev.eval_arg(call, 1)?;
        Ok(Value::Bool(no_emergent_in_individual(&emergent, &individual)))
    });
    registry.register("all_emergent_have_evidence", Arity::Exact(2), |ev, call| {
        let emergent = ev.eval_arg(call, 0)?;
        let evidence = ev.eval_arg(call, 1)?;
        Ok(Value::Bool(all_emergent_have_evidence(&emergent, &evidence)))
    });
    registry.register("tree_budget_conserved", Arity::Exact(1), |ev, call| {
        let root = ev.eval_arg(call, 0)?;
        Ok(Value::Bool(root.is_null() || budget_conserved(&root, 0)))
    });
    registry.register("tree_authority_narrowing", Arity::Exact(1), |ev, call| {
        let root = ev.eval_arg(call, 0)?;
        Ok(Value::Bool(root.is_null() || authority_narrows(&root, 0)))
    });
}

/// Evaluate the links argument and apply `check` when it is an array.
fn links_predicate(
    ev: &mut Evaluator<'_>,
    call: &Call<'_>,
    check: impl FnOnce(&[Value]) -> bool,
) -> Result<Value, EvalError> {
    let links = ev.eval_arg(call, 0)?;
    Ok(Value::Bool(links.as_array().is_some_and(check)))
}

fn no_emergent_in_individual(emergent: &Value, individual: &Value) -> bool {
    if emergent.is_null() || individual.is_null() {
        return true;
    }
    let (Some(emergent), Some(models)) = (string_list(emergent), individual.as_object()) else {
        return false;
    };
    let mut held = models.values().filter_map(Value::as_array).flatten();
    !held.any(|capability| capability.as_str().is_some_and(|c| emergent.contains(&c)))
}

fn all_emergent_have_evidence(emergent: &Value, evidence: &Value) -> bool {
    let Some(evidence) = evidence.as_array() else {
        return false;
    };
    if emergent.is_null() {
        return true;
    }
    let Some(emergent) = string_list(emergent) else {
        return false;
    };
    emergent.iter().all(|capability| {
        evidence
            .iter()
            .any(|record| str_field(record, "capability") == Some(*capability))
    })
}

fn children(node: &Value) -> Option<&[Value]> {
    match node.get("children") {
        None | Some(Value::Null) => Some(&[][..]),
        Some(value) => value.as_array(),
    }
}

fn budget_conserved(node: &Value, depth: usize) -> bool {
    if depth > MAX_TREE_DEPTH || node.as_object().is_none() {
        return false;
    }
    let (Some(budget), Some(children)) = (exact_field(node, "budget_allocated_micro"), children(node))
    else {
        return false;
    };
    if children.is_empty() {
        return true;
    }

    let mut allocated = Integer::ZERO;
    for child in children {
        let Some(child_budget) = exact_field(child, "budget_allocated_micro") else {
            return false;
        };
        allocated += child_budget;
    }
    allocated <= budget && children.iter().all(|child| budget_conserved(child, depth + 1))
}

fn authority_narrows(node: &Value, depth: usize) -> bool {
    if depth > MAX_TREE_DEPTH {
        return false;
    }
    let (Some(scope), Some(children)) = (array_field(node, "authority_scope"), children(node)) else {
        return false;
    };
    let Some(parent) = lowercase_scope(scope) else {
        return false;
    };
    children.iter().all(|child| {
        let Some(child_scope) = array_field(child, "authority_scope").and_then(lowercase_scope)
        else {
            return false;
        };
        child_scope.iter().all(|s| parent.contains(s)) && authority_narrows(child, depth + 1)
    })
}

fn lowercase_scope(scope: &[Value]) -> Option<Vec<String>> {
    scope.iter().map(|s| s.as_str().map(str::to_lowercase)).collect()
}

#[cfg(test)]
mod tests {
    use super::super::testing::holds;
    use serde_json::{json, Value as Json};

    #[test]
    fn authority_subset_chain() {
        let ok = json!({"links": [{"authority_scope": ["read", "write"]}, {"authority_scope": ["read"]}]});
        assert!(holds("all_links_subset_authority(links)", ok));
        let widen = json!({"links": [{"authority_scope": ["read"]}, {"authority_scope": ["read", "write"]}]});
        assert!(!holds("all_links_subset_authority(links)", widen));
        assert!(holds("all_links_subset_authority(links)", json!({"links": []})));
        assert!(!holds("all_links_subset_authority(links)", json!({"links": "x"})));
    }

    #[test]
    fn budgets_decrease() {
        let ok = json!({"links": [{"budget_allocated_micro": "1000"}, {"budget_allocated_micro": "500"}]});
        assert!(holds("delegation_budget_conserved(links)", ok));
        let over = json!({"links": [{"budget_allocated_micro": "500"}, {"budget_allocated_micro": "1000"}]});
        assert!(!holds("delegation_budget_conserved(links)", over));
        let nulls = json!({"links": [{"budget_allocated_micro": "500"}, {}, {"budget_allocated_micro": null}]});
        assert!(holds("delegation_budget_conserved(links)", nulls));
    }

    #[test]
    fn temporal_order() {
        let ok = json!({"links": [{"timestamp": "2026-01-01T00:00:00Z"}, {"timestamp": "2026-01-02T00:00:00Z"}]});
        assert!(holds("links_temporally_ordered(links)", ok));
        let reversed = json!({"links": [{"timestamp": "2026-01-02T00:00:00Z"}, {"timestamp": "2026-01-01T00:00:00Z"}]});
        assert!(!holds("links_temporally_ordered(links)", reversed));
        let missing = json!({"links": [{"timestamp": null}]});
        assert!(!holds("links_temporally_ordered(links)", missing));
    }

    #[test]
    fn chain_links() {
        let ok = json!({"links": [{"delegatee": "B"}, {"delegator": "B", "delegatee": "C"}]});
        assert!(holds("links_form_chain(links)", ok));
        let broken = json!({"links": [{"delegatee": "B"}, {"delegator": "X", "delegatee": "C"}]});
        assert!(!holds("links_form_chain(links)", broken));
        assert!(holds("links_form_chain(links)", json!({"links": [{"delegatee": "A"}]})));
    }

    #[test]
    fn emergent_capabilities() {
        let individual = json!({"m1": ["reasoning"], "m2": ["coding"]});
        assert!(holds(
            "no_emergent_in_individual(emergent, individual)",
            json!({"emergent": ["consensus"], "individual": individual})
        ));
        assert!(!holds(
            "no_emergent_in_individual(emergent, individual)",
            json!({"emergent": ["reasoning"], "individual": individual})
        ));
        assert!(holds(
            "no_emergent_in_individual(emergent, individual)",
            json!({"emergent": ["x"], "individual": null})
        ));

        let evidence = json!([{"capability": "consensus", "source": "eval"}]);
        assert!(holds(
            "all_emergent_have_evidence(emergent, evidence)",
            json!({"emergent": ["consensus"], "evidence": evidence})
        ));
        assert!(!holds(
            "all_emergent_have_evidence(emergent, evidence)",
            json!({"emergent": ["consensus", "synthesis"], "evidence": evidence})
        ));
        assert!(!holds(
            "all_emergent_have_evidence(emergent, evidence)",
            json!({"emergent": [], "evidence": "none"})
        ));
    }

    fn deep_tree(depth: usize) -> Json {
        let mut node = json!({"authority_scope": ["billing"], "budget_allocated_micro": "100", "children": []});
        for _ in 0..depth {
            node = json!({"authority_scope": ["billing"], "budget_allocated_micro": "100", "children": [node]});
        }
        node
    }

    #[test]
    fn tree_budgets() {
        let ok = json!({"root": {"budget_allocated_micro": "1000", "children": [
            {"budget_allocated_micro": "500", "children": []},
            {"budget_allocated_micro": "500", "children": []},
        ]}});
        assert!(holds("tree_budget_conserved(root)", ok));
        let nested_over = json!({"root": {"budget_allocated_micro": "1000", "children": [
            {"budget_allocated_micro": "800", "children": [
                {"budget_allocated_micro": "500", "children": []},
                {"budget_allocated_micro": "400", "children": []},
            ]},
        ]}});
        assert!(!holds("tree_budget_conserved(root)", nested_over));
        assert!(holds("tree_budget_conserved(root)", json!({"root": null})));
        assert!(holds("tree_budget_conserved(root)", json!({"root": {"budget_allocated_micro": "1"}})));
    }

    #[test]
    fn tree_authority() {
        let ok = json!({"root": {"authority_scope": ["Billing", "INFERENCE"], "children": [
            {"authority_scope": ["billing"], "children": []},
            {"authority_scope": [], "children": []},
        ]}});
        assert!(holds("tree_authority_narrowing(root)", ok));
        let widen = json!({"root": {"authority_scope": ["billing", "inference"], "children": [
            {"authority_scope": ["billing", "inference"], "children": [
                {"authority_scope": ["billing", "delegation"], "children": []},
            ]},
        ]}});
        assert!(!holds("tree_authority_narrowing(root)", widen));
    }

    #[test]
    fn tree_depth_limit() {
        assert!(holds("tree_budget_conserved(root)", json!({"root": deep_tree(9)})));
        assert!(!holds("tree_budget_conserved(root)", json!({"root": deep_tree(12)})));
        assert!(holds("tree_authority_narrowing(root)", json!({"root": deep_tree(9)})));
        assert!(!holds("tree_authority_narrowing(root)", json!({"root": deep_tree(12)})));
    }
}
