//! Names a context field should not take.
//!
//! A field called `len` still resolves as a value, but a reader of
//! `len(len)` would be surprised. Schema authors run
//! [`find_reserved_collisions`] over their field names before deployment.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use serde::Serialize;

use crate::builtins::standard_functions;

/// Keywords and pseudo-fields the language gives meaning to.
const RESERVED_KEYWORDS: &[&str] = &["true", "false", "null", "undefined", "length"];

/// Builtins that hosts register outside the standard registry.
const RESERVED_HOST_FUNCTIONS: &[&str] = &["model_routing_eligible"];

/// Every standard builtin name, the host builtins and the language keywords.
pub static RESERVED_EVALUATOR_NAMES: LazyLock<BTreeSet<String>> = LazyLock::new(|| {
    let functions = standard_functions();
    let names: BTreeSet<String> = functions
        .names()
        .into_iter()
        .chain(RESERVED_KEYWORDS.iter().copied())
        .chain(RESERVED_HOST_FUNCTIONS.iter().copied())
        .map(str::to_string)
        .collect();
    names
});

/// Check if a name is reserved.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_EVALUATOR_NAMES.contains(name)
}

/// A field whose name is reserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservedCollision {
    pub field: String,
    /// Where the field came from, e.g. a schema id.
    pub source: String,
}

/// Every reserved name among `fields`, in input order.
pub fn find_reserved_collisions<I, S>(fields: I, source: &str) -> Vec<ReservedCollision>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    fields
        .into_iter()
        .filter(|field| is_reserved(field.as_ref()))
        .map(|field| ReservedCollision {
            field: field.as_ref().to_string(),
            source: source.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_and_keywords_are_reserved() {
        for name in ["bigint_sum", "every", "has", "now", "true", "undefined", "length"] {
            assert!(is_reserved(name), "{}", name);
        }
        assert!(is_reserved("model_routing_eligible"));
        assert!(!is_reserved("balance"));
        assert!(!is_reserved("Len"));
    }

    #[test]
    fn covers_the_standard_registry() {
        let functions = standard_functions();
        assert_eq!(
            RESERVED_EVALUATOR_NAMES.len(),
            functions.len() + RESERVED_KEYWORDS.len() + RESERVED_HOST_FUNCTIONS.len()
        );
    }

    #[test]
    fn collisions_in_input_order() {
        let fields = ["amount", "now", "owner", "len", "status"];
        let found = find_reserved_collisions(fields, "BillingEntry");
        assert_eq!(
            found,
            vec![
                ReservedCollision {
                    field: "now".into(),
                    source: "BillingEntry".into()
                },
                ReservedCollision {
                    field: "len".into(),
                    source: "BillingEntry".into()
                },
            ]
        );
        assert!(find_reserved_collisions(Vec::<String>::new(), "x").is_empty());
    }
}
