use super::{ArgumentSpec, BuiltinSpec, Example};

const LINKS_ARG: &[ArgumentSpec] = &[ArgumentSpec {
    name: "links",
    type_: "DelegationLink[]",
    description: "Delegation links in chain order",
}];

const SAGA_ARG: &[ArgumentSpec] = &[ArgumentSpec {
    name: "saga",
    type_: "SagaContext",
    description: "Saga with `steps`, optional `compensation_steps` and `timeout`",
}];

const FIELD_PATH_ARG: &[ArgumentSpec] = &[ArgumentSpec {
    name: "path",
    type_: "field path",
    description: "Dotted field path, written unquoted",
}];

const BIGINT_OPERANDS: &[ArgumentSpec] = &[
    ArgumentSpec {
        name: "a",
        type_: "bigint_coercible",
        description: "Left operand",
    },
    ArgumentSpec {
        name: "b",
        type_: "bigint_coercible",
        description: "Right operand",
    },
];

const TIMESTAMP_PAIR: &[ArgumentSpec] = &[
    ArgumentSpec {
        name: "a",
        type_: "string",
        description: "RFC 3339 timestamp",
    },
    ArgumentSpec {
        name: "b",
        type_: "string",
        description: "RFC 3339 timestamp",
    },
];

const AGE_ARGS: &[ArgumentSpec] = &[
    ArgumentSpec {
        name: "ts",
        type_: "string",
        description: "RFC 3339 timestamp",
    },
    ArgumentSpec {
        name: "max_age_seconds",
        type_: "number",
        description: "Maximum age in seconds",
    },
    ArgumentSpec {
        name: "reference",
        type_: "string?",
        description: "Reference instant; defaults to the evaluation time",
    },
];

/// All standard builtins with documentation.
pub static EVALUATOR_BUILTIN_SPECS: &[BuiltinSpec] = &[
    // ==================== Exact integers ====================
    BuiltinSpec {
        name: "bigint_sum",
        signature: "bigint_sum(array, field?) -> bigint",
        description: "Exact sum of an array of integers, or of one field across an array of objects.",
        arguments: &[
            ArgumentSpec {
                name: "source",
                type_: "array",
                description: "Array literal or field path resolving to an array",
            },
            ArgumentSpec {
                name: "field",
                type_: "string?",
                description: "Field to read from each element",
            },
        ],
        return_type: "bigint",
        short_circuit: false,
        examples: &[
            Example {
                description: "Sum of an array literal",
                context: r#"{"a": "100", "b": "200"}"#,
                expression: "bigint_sum([a, b]) == 300",
                expected: "true",
            },
            Example {
                description: "Sum of a field across objects",
                context: r#"{"items": [{"cost": "10"}, {"cost": "20"}, {"cost": "30"}]}"#,
                expression: "bigint_sum(items, 'cost') == 60",
                expected: "true",
            },
        ],
        edge_cases: &[
            "Empty array sums to 0",
            "Null and missing values are skipped",
            "Null source sums to 0",
            "Non-integer values are a type mismatch",
        ],
    },
    BuiltinSpec {
        name: "bigint_gte",
        signature: "bigint_gte(a, b) -> boolean",
        description: "True when a >= b, compared exactly.",
        arguments: BIGINT_OPERANDS,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Greater value passes",
                context: r#"{"budget": "1000", "cost": "500"}"#,
                expression: "bigint_gte(budget, cost)",
                expected: "true",
            },
            Example {
                description: "Equal values pass",
                context: r#"{"a": "100", "b": "100"}"#,
                expression: "bigint_gte(a, b)",
                expected: "true",
            },
            Example {
                description: "Lesser value fails",
                context: r#"{"a": "50", "b": "100"}"#,
                expression: "bigint_gte(a, b)",
                expected: "false",
            },
        ],
        edge_cases: &["Null counts as 0", "Non-integer strings are a type mismatch"],
    },
    BuiltinSpec {
        name: "bigint_gt",
        signature: "bigint_gt(a, b) -> boolean",
        description: "True when a > b, compared exactly.",
        arguments: BIGINT_OPERANDS,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Strictly greater passes",
                context: r#"{"a": "200", "b": "100"}"#,
                expression: "bigint_gt(a, b)",
                expected: "true",
            },
            Example {
                description: "Equal values fail",
                context: r#"{"a": "100", "b": "100"}"#,
                expression: "bigint_gt(a, b)",
                expected: "false",
            },
        ],
        edge_cases: &["Same coercion as bigint_gte"],
    },
    BuiltinSpec {
        name: "bigint_eq",
        signature: "bigint_eq(a, b) -> boolean",
        description: "True when a == b, compared exactly.",
        arguments: BIGINT_OPERANDS,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Equal decimal strings",
                context: r#"{"a": "1000000", "b": "1000000"}"#,
                expression: "bigint_eq(a, b)",
                expected: "true",
            },
            Example {
                description: "Different values",
                context: r#"{"a": "100", "b": "200"}"#,
                expression: "bigint_eq(a, b)",
                expected: "false",
            },
            Example {
                description: "String and number forms agree",
                context: r#"{"a": "0"}"#,
                expression: "bigint_eq(a, 0)",
                expected: "true",
            },
        ],
        edge_cases: &["String \"0\" equals number 0", "Null equals 0"],
    },
    BuiltinSpec {
        name: "bigint_add",
        signature: "bigint_add(a, b) -> string",
        description: "Exact a + b, returned as a decimal string.",
        arguments: BIGINT_OPERANDS,
        return_type: "string",
        short_circuit: false,
        examples: &[
            Example {
                description: "Simple addition",
                context: r#"{"a": "100", "b": "200"}"#,
                expression: "bigint_add(a, b)",
                expected: r#""300""#,
            },
            Example {
                description: "Addition with zero",
                context: r#"{"a": "500", "b": "0"}"#,
                expression: "bigint_eq(bigint_add(a, b), 500)",
                expected: "true",
            },
        ],
        edge_cases: &["Null inputs count as 0", "Magnitude is unbounded and results stay exact"],
    },
    BuiltinSpec {
        name: "bigint_sub",
        signature: "bigint_sub(a, b) -> string",
        description: "Exact a - b, returned as a decimal string.",
        arguments: BIGINT_OPERANDS,
        return_type: "string",
        short_circuit: false,
        examples: &[
            Example {
                description: "Simple subtraction",
                context: r#"{"total": "1000", "part": "300"}"#,
                expression: "bigint_sub(total, part)",
                expected: r#""700""#,
            },
            Example {
                description: "Negative result",
                context: r#"{"a": "100", "b": "250"}"#,
                expression: "bigint_sub(a, b)",
                expected: r#""-150""#,
            },
        ],
        edge_cases: &["Can produce negative results", "Null inputs count as 0"],
    },
    BuiltinSpec {
        name: "is_bigint_coercible",
        signature: "is_bigint_coercible(x) -> boolean",
        description: "True when x is an integer string, an integral number or a bigint.",
        arguments: &[ArgumentSpec {
            name: "x",
            type_: "unknown",
            description: "Value to test",
        }],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Integer string",
                context: r#"{"amount": "1000000"}"#,
                expression: "is_bigint_coercible(amount)",
                expected: "true",
            },
            Example {
                description: "Fractional string",
                context: r#"{"amount": "12.5"}"#,
                expression: "is_bigint_coercible(amount)",
                expected: "false",
            },
        ],
        edge_cases: &["Null is not coercible", "Fractional numbers are not coercible"],
    },
    // ==================== Measurement and equality ====================
    BuiltinSpec {
        name: "len",
        signature: "len(x) -> number",
        description: "Length of an array or string, or the key count of an object.",
        arguments: &[ArgumentSpec {
            name: "x",
            type_: "array | string | object",
            description: "Value to measure",
        }],
        return_type: "number",
        short_circuit: false,
        examples: &[
            Example {
                description: "Array length",
                context: r#"{"items": ["a", "b", "c"]}"#,
                expression: "len(items)",
                expected: "3",
            },
            Example {
                description: "Minimum string length",
                context: r#"{"nonce": "abcdefghijklmnop"}"#,
                expression: "len(nonce) >= 16",
                expected: "true",
            },
        ],
        edge_cases: &["Strings count characters", "Any other value has length 0"],
    },
    BuiltinSpec {
        name: "type_of",
        signature: "type_of(x) -> string",
        description: "Runtime type name: string, number, bigint, boolean, array, object, null or undefined.",
        arguments: &[ArgumentSpec {
            name: "x",
            type_: "unknown",
            description: "Value or field path",
        }],
        return_type: "string",
        short_circuit: false,
        examples: &[
            Example {
                description: "Decimal amounts are strings",
                context: r#"{"amount": "100"}"#,
                expression: "type_of(amount)",
                expected: r#""string""#,
            },
            Example {
                description: "Missing field",
                context: r#"{}"#,
                expression: "type_of(missing) == 'undefined'",
                expected: "true",
            },
        ],
        edge_cases: &["A missing path reports undefined instead of failing"],
    },
    BuiltinSpec {
        name: "eq",
        signature: "eq(a, b) -> boolean",
        description: "Strict equality with no numeric coercion.",
        arguments: &[
            ArgumentSpec {
                name: "a",
                type_: "unknown",
                description: "Left operand",
            },
            ArgumentSpec {
                name: "b",
                type_: "unknown",
                description: "Right operand",
            },
        ],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Equal strings",
                context: r#"{"status": "active"}"#,
                expression: "eq(status, 'active')",
                expected: "true",
            },
            Example {
                description: "Different strings",
                context: r#"{"status": "active"}"#,
                expression: "eq(status, 'expired')",
                expected: "false",
            },
        ],
        edge_cases: &["The string \"1\" does not equal the number 1"],
    },
    BuiltinSpec {
        name: "unique_values",
        signature: "unique_values(array, field) -> boolean",
        description: "True when no two elements share the same non-null value of field.",
        arguments: &[
            ArgumentSpec {
                name: "array",
                type_: "object[]",
                description: "Elements to inspect",
            },
            ArgumentSpec {
                name: "field",
                type_: "string",
                description: "Field compared across elements",
            },
        ],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Distinct ids",
                context: r#"{"xs": [{"id": "a"}, {"id": "b"}]}"#,
                expression: "unique_values(xs, 'id')",
                expected: "true",
            },
            Example {
                description: "Repeated id",
                context: r#"{"xs": [{"id": "a"}, {"id": "b"}, {"id": "a"}]}"#,
                expression: "unique_values(xs, 'id')",
                expected: "false",
            },
        ],
        edge_cases: &["Null and missing values are ignored", "Non-array input returns false"],
    },
    BuiltinSpec {
        name: "object_keys_subset",
        signature: "object_keys_subset(record, allowed) -> boolean",
        description: "True when every key of record appears in allowed.",
        arguments: &[
            ArgumentSpec {
                name: "record",
                type_: "Record<string, unknown>",
                description: "Object whose keys are checked",
            },
            ArgumentSpec {
                name: "allowed",
                type_: "string[]",
                description: "Permitted key names",
            },
        ],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "All keys allowed",
                context: r#"{"rec": {"a": 1, "b": 2}, "allowed": ["a", "b", "c"]}"#,
                expression: "object_keys_subset(rec, allowed)",
                expected: "true",
            },
            Example {
                description: "Unexpected key",
                context: r#"{"rec": {"a": 1, "d": 2}, "allowed": ["a", "b", "c"]}"#,
                expression: "object_keys_subset(rec, allowed)",
                expected: "false",
            },
        ],
        edge_cases: &["Null record returns true", "Non-array allowed returns false"],
    },
    // ==================== Quantifiers and presence ====================
    BuiltinSpec {
        name: "every",
        signature: "every(array, x -> predicate) -> boolean",
        description: "True when the predicate holds for every element. Also written array.every(x => predicate).",
        arguments: &[
            ArgumentSpec {
                name: "array",
                type_: "array",
                description: "Elements to test",
            },
            ArgumentSpec {
                name: "predicate",
                type_: "lambda",
                description: "Parameter bound to each element in turn",
            },
        ],
        return_type: "boolean",
        short_circuit: true,
        examples: &[
            Example {
                description: "All positive",
                context: r#"{"xs": [1, 2, 3]}"#,
                expression: "every(xs, x -> x > 0)",
                expected: "true",
            },
            Example {
                description: "Vacuously true for an empty array",
                context: r#"{"xs": []}"#,
                expression: "every(xs, x -> false)",
                expected: "true",
            },
        ],
        edge_cases: &[
            "Stops at the first element that fails",
            "Non-array input is a type mismatch",
        ],
    },
    BuiltinSpec {
        name: "some",
        signature: "some(array, x -> predicate) -> boolean",
        description: "True when the predicate holds for at least one element. Also written array.some(x => predicate).",
        arguments: &[
            ArgumentSpec {
                name: "array",
                type_: "array",
                description: "Elements to test",
            },
            ArgumentSpec {
                name: "predicate",
                type_: "lambda",
                description: "Parameter bound to each element in turn",
            },
        ],
        return_type: "boolean",
        short_circuit: true,
        examples: &[
            Example {
                description: "One match",
                context: r#"{"xs": [1, 2, 3]}"#,
                expression: "some(xs, x -> x == 2)",
                expected: "true",
            },
            Example {
                description: "False for an empty array",
                context: r#"{"xs": []}"#,
                expression: "some(xs, x -> true)",
                expected: "false",
            },
        ],
        edge_cases: &[
            "Stops at the first element that passes",
            "Non-array input is a type mismatch",
        ],
    },
    BuiltinSpec {
        name: "has",
        signature: "has(path) -> boolean",
        description: "True when the field path is present, even if its value is null.",
        arguments: FIELD_PATH_ARG,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Present field",
                context: r#"{"order": {"expires_at": null}}"#,
                expression: "has(order.expires_at)",
                expected: "true",
            },
            Example {
                description: "Guarding an optional field",
                context: r#"{"order": {}}"#,
                expression: "!has(order.expires_at) || order.expires_at > 0",
                expected: "true",
            },
        ],
        edge_cases: &["Never fails on a missing path"],
    },
    // ==================== State history ====================
    BuiltinSpec {
        name: "changed",
        signature: "changed(path) -> boolean",
        description: "True when the value at path differs from the one in the _previous snapshot.",
        arguments: FIELD_PATH_ARG,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Field changed",
                context: r#"{"status": "active", "_previous": {"status": "pending"}}"#,
                expression: "changed(status)",
                expected: "true",
            },
            Example {
                description: "Field unchanged",
                context: r#"{"status": "active", "_previous": {"status": "active"}}"#,
                expression: "changed(status)",
                expected: "false",
            },
        ],
        edge_cases: &["No _previous returns false", "Comparison is strict, without coercion"],
    },
    BuiltinSpec {
        name: "previous",
        signature: "previous(path) -> unknown",
        description: "The value at path in the _previous snapshot.",
        arguments: FIELD_PATH_ARG,
        return_type: "unknown",
        short_circuit: false,
        examples: &[
            Example {
                description: "Prior value",
                context: r#"{"status": "active", "_previous": {"status": "pending"}}"#,
                expression: "previous(status)",
                expected: r#""pending""#,
            },
            Example {
                description: "No snapshot",
                context: r#"{"status": "active"}"#,
                expression: "previous(status) == null",
                expected: "true",
            },
        ],
        edge_cases: &["No _previous returns null", "Missing path returns null"],
    },
    BuiltinSpec {
        name: "delta",
        signature: "delta(path) -> bigint | number",
        description: "Current minus previous value at path. Exact for integers, floating point otherwise.",
        arguments: FIELD_PATH_ARG,
        return_type: "bigint | number",
        short_circuit: false,
        examples: &[
            Example {
                description: "Exact delta",
                context: r#"{"balance": "1000", "_previous": {"balance": "800"}}"#,
                expression: "bigint_eq(delta(balance), 200)",
                expected: "true",
            },
            Example {
                description: "No snapshot",
                context: r#"{"balance": "1000"}"#,
                expression: "bigint_eq(delta(balance), 0)",
                expected: "true",
            },
        ],
        edge_cases: &[
            "No _previous returns 0",
            "Null counts as 0",
            "Non-numeric values return 0",
        ],
    },
    // ==================== Time ====================
    BuiltinSpec {
        name: "is_after",
        signature: "is_after(a, b) -> boolean",
        description: "True when timestamp a is strictly after timestamp b.",
        arguments: TIMESTAMP_PAIR,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "One hour later",
                context: r#"{"a": "2026-06-01T01:00:00Z", "b": "2026-06-01T00:00:00Z"}"#,
                expression: "is_after(a, b)",
                expected: "true",
            },
            Example {
                description: "Equal instants",
                context: r#"{"a": "2026-06-01T00:00:00Z", "b": "2026-06-01T00:00:00Z"}"#,
                expression: "is_after(a, b)",
                expected: "false",
            },
        ],
        edge_cases: &["Unparseable timestamps return false", "Offsets are normalized to UTC"],
    },
    BuiltinSpec {
        name: "is_before",
        signature: "is_before(a, b) -> boolean",
        description: "True when timestamp a is strictly before timestamp b.",
        arguments: TIMESTAMP_PAIR,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Earlier instant",
                context: r#"{"a": "2026-02-01T00:00:00Z", "b": "2026-06-01T00:00:00Z"}"#,
                expression: "is_before(a, b)",
                expected: "true",
            },
            Example {
                description: "Not a timestamp",
                context: r#"{"a": "2026/02/01", "b": "2026-06-01T00:00:00Z"}"#,
                expression: "is_before(a, b)",
                expected: "false",
            },
        ],
        edge_cases: &["Unparseable timestamps return false"],
    },
    BuiltinSpec {
        name: "is_between",
        signature: "is_between(t, lo, hi) -> boolean",
        description: "True when lo <= t <= hi.",
        arguments: &[
            ArgumentSpec {
                name: "t",
                type_: "string",
                description: "RFC 3339 timestamp",
            },
            ArgumentSpec {
                name: "lo",
                type_: "string",
                description: "Inclusive lower bound",
            },
            ArgumentSpec {
                name: "hi",
                type_: "string",
                description: "Inclusive upper bound",
            },
        ],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Inside the window",
                context: r#"{"t": "2026-01-15T00:00:00Z", "lo": "2026-01-01T00:00:00Z", "hi": "2026-02-01T00:00:00Z"}"#,
                expression: "is_between(t, lo, hi)",
                expected: "true",
            },
            Example {
                description: "On the bound",
                context: r#"{"lo": "2026-01-01T00:00:00Z", "hi": "2026-02-01T00:00:00Z"}"#,
                expression: "is_between(hi, lo, hi)",
                expected: "true",
            },
        ],
        edge_cases: &["Both bounds are inclusive", "Unparseable timestamps return false"],
    },
    BuiltinSpec {
        name: "is_stale",
        signature: "is_stale(ts, max_age_seconds, reference?) -> boolean",
        description: "True when more than max_age_seconds have elapsed from ts to the reference instant.",
        arguments: AGE_ARGS,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Two hours old",
                context: r#"{"ts": "2026-01-01T22:00:00Z", "ref": "2026-01-02T00:00:00Z"}"#,
                expression: "is_stale(ts, 3600, ref)",
                expected: "true",
            },
            Example {
                description: "Exactly at the limit",
                context: r#"{"ts": "2026-01-01T23:00:00Z", "ref": "2026-01-02T00:00:00Z"}"#,
                expression: "is_stale(ts, 3600, ref)",
                expected: "false",
            },
        ],
        edge_cases: &[
            "Negative max age returns false",
            "Unparseable timestamps return false",
            "Without a reference the evaluation time is used",
        ],
    },
    BuiltinSpec {
        name: "is_within",
        signature: "is_within(ts, max_age_seconds, reference?) -> boolean",
        description: "True when at most max_age_seconds have elapsed from ts to the reference instant.",
        arguments: AGE_ARGS,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Thirty minutes old",
                context: r#"{"ts": "2026-01-01T23:30:00Z", "ref": "2026-01-02T00:00:00Z"}"#,
                expression: "is_within(ts, 3600, ref)",
                expected: "true",
            },
            Example {
                description: "Negative window",
                context: r#"{"ts": "2026-01-01T23:30:00Z", "ref": "2026-01-02T00:00:00Z"}"#,
                expression: "is_within(ts, -1, ref)",
                expected: "false",
            },
        ],
        edge_cases: &[
            "Negative max age returns false",
            "Complement of is_stale for valid input",
        ],
    },
    BuiltinSpec {
        name: "now",
        signature: "now() -> string",
        description: "The evaluation instant as an RFC 3339 UTC string with milliseconds.",
        arguments: &[],
        return_type: "string",
        short_circuit: false,
        examples: &[Example {
            description: "Current time is a timestamp string",
            context: r#"{}"#,
            expression: "type_of(now()) == 'string'",
            expected: "true",
        }],
        edge_cases: &["Pinned by the evaluation_timestamp option"],
    },
    // ==================== Delegation ====================
    BuiltinSpec {
        name: "all_links_subset_authority",
        signature: "all_links_subset_authority(links) -> boolean",
        description: "Each link's authority_scope is a subset of the previous link's.",
        arguments: LINKS_ARG,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Authority narrows",
                context: r#"{"links": [{"authority_scope": ["read", "write"]}, {"authority_scope": ["read"]}]}"#,
                expression: "all_links_subset_authority(links)",
                expected: "true",
            },
            Example {
                description: "Authority widens",
                context: r#"{"links": [{"authority_scope": ["read"]}, {"authority_scope": ["read", "write"]}]}"#,
                expression: "all_links_subset_authority(links)",
                expected: "false",
            },
        ],
        edge_cases: &["Empty and single-link chains return true", "Non-array input returns false"],
    },
    BuiltinSpec {
        name: "delegation_budget_conserved",
        signature: "delegation_budget_conserved(links) -> boolean",
        description: "Each link's budget_allocated_micro is at most the previous link's.",
        arguments: LINKS_ARG,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Budget decreases down the chain",
                context: r#"{"links": [{"budget_allocated_micro": "1000"}, {"budget_allocated_micro": "500"}]}"#,
                expression: "delegation_budget_conserved(links)",
                expected: "true",
            },
            Example {
                description: "Child exceeds parent",
                context: r#"{"links": [{"budget_allocated_micro": "500"}, {"budget_allocated_micro": "1000"}]}"#,
                expression: "delegation_budget_conserved(links)",
                expected: "false",
            },
        ],
        edge_cases: &["Pairs with a null budget are skipped", "Empty chains return true"],
    },
    BuiltinSpec {
        name: "links_temporally_ordered",
        signature: "links_temporally_ordered(links) -> boolean",
        description: "Link timestamps are non-decreasing.",
        arguments: LINKS_ARG,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Ordered",
                context: r#"{"links": [{"timestamp": "2026-01-01T00:00:00Z"}, {"timestamp": "2026-01-02T00:00:00Z"}]}"#,
                expression: "links_temporally_ordered(links)",
                expected: "true",
            },
            Example {
                description: "Reversed",
                context: r#"{"links": [{"timestamp": "2026-01-02T00:00:00Z"}, {"timestamp": "2026-01-01T00:00:00Z"}]}"#,
                expression: "links_temporally_ordered(links)",
                expected: "false",
            },
        ],
        edge_cases: &["A null timestamp returns false", "Empty chains return true"],
    },
    BuiltinSpec {
        name: "links_form_chain",
        signature: "links_form_chain(links) -> boolean",
        description: "Each link's delegatee is the next link's delegator.",
        arguments: LINKS_ARG,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Connected chain",
                context: r#"{"links": [{"delegatee": "B"}, {"delegator": "B", "delegatee": "C"}]}"#,
                expression: "links_form_chain(links)",
                expected: "true",
            },
            Example {
                description: "Broken chain",
                context: r#"{"links": [{"delegatee": "B"}, {"delegator": "X", "delegatee": "C"}]}"#,
                expression: "links_form_chain(links)",
                expected: "false",
            },
        ],
        edge_cases: &["Empty and single-link chains return true"],
    },
    BuiltinSpec {
        name: "no_emergent_in_individual",
        signature: "no_emergent_in_individual(emergent, individual) -> boolean",
        description: "No emergent capability appears in any individual model's capability list.",
        arguments: &[
            ArgumentSpec {
                name: "emergent",
                type_: "string[]",
                description: "Capabilities observed only in the ensemble",
            },
            ArgumentSpec {
                name: "individual",
                type_: "Record<string, string[]>",
                description: "Capabilities per individual model",
            },
        ],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Capability is truly emergent",
                context: r#"{"emergent": ["consensus"], "individual": {"m1": ["reasoning"], "m2": ["coding"]}}"#,
                expression: "no_emergent_in_individual(emergent, individual)",
                expected: "true",
            },
            Example {
                description: "Capability already held by a model",
                context: r#"{"emergent": ["reasoning"], "individual": {"m1": ["reasoning"], "m2": ["coding"]}}"#,
                expression: "no_emergent_in_individual(emergent, individual)",
                expected: "false",
            },
        ],
        edge_cases: &["Empty emergent list returns true", "Null individual returns true"],
    },
    BuiltinSpec {
        name: "all_emergent_have_evidence",
        signature: "all_emergent_have_evidence(emergent, evidence) -> boolean",
        description: "Every emergent capability has an evidence record with a matching capability.",
        arguments: &[
            ArgumentSpec {
                name: "emergent",
                type_: "string[]",
                description: "Capabilities observed only in the ensemble",
            },
            ArgumentSpec {
                name: "evidence",
                type_: "CapabilityEvidence[]",
                description: "Evidence records",
            },
        ],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Evidence present",
                context: r#"{"emergent": ["consensus"], "evidence": [{"capability": "consensus", "test_name": "test-1", "score": 0.9}]}"#,
                expression: "all_emergent_have_evidence(emergent, evidence)",
                expected: "true",
            },
            Example {
                description: "Evidence missing",
                context: r#"{"emergent": ["consensus", "synthesis"], "evidence": [{"capability": "consensus", "test_name": "test-1", "score": 0.9}]}"#,
                expression: "all_emergent_have_evidence(emergent, evidence)",
                expected: "false",
            },
        ],
        edge_cases: &["Empty emergent list returns true", "Non-array evidence returns false"],
    },
    BuiltinSpec {
        name: "tree_budget_conserved",
        signature: "tree_budget_conserved(node) -> boolean",
        description: "At every node, the children's budget_allocated_micro sum is at most the node's own.",
        arguments: &[ArgumentSpec {
            name: "node",
            type_: "DelegationTreeNode",
            description: "Root of the delegation tree",
        }],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Children fit the parent budget",
                context: r#"{"root": {"budget_allocated_micro": "1000", "children": [{"budget_allocated_micro": "600", "children": []}, {"budget_allocated_micro": "400", "children": []}]}}"#,
                expression: "tree_budget_conserved(root)",
                expected: "true",
            },
            Example {
                description: "Children exceed the parent budget",
                context: r#"{"root": {"budget_allocated_micro": "1000", "children": [{"budget_allocated_micro": "700", "children": []}, {"budget_allocated_micro": "400", "children": []}]}}"#,
                expression: "tree_budget_conserved(root)",
                expected: "false",
            },
        ],
        edge_cases: &["Null tree returns true", "Trees deeper than 10 levels return false"],
    },
    BuiltinSpec {
        name: "tree_authority_narrowing",
        signature: "tree_authority_narrowing(node) -> boolean",
        description: "At every node, each child's authority_scope is a subset of the node's, ignoring case.",
        arguments: &[ArgumentSpec {
            name: "node",
            type_: "DelegationTreeNode",
            description: "Root of the delegation tree",
        }],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Scopes narrow",
                context: r#"{"root": {"authority_scope": ["Billing", "inference"], "children": [{"authority_scope": ["billing"], "children": []}]}}"#,
                expression: "tree_authority_narrowing(root)",
                expected: "true",
            },
            Example {
                description: "Child gains a scope",
                context: r#"{"root": {"authority_scope": ["billing"], "children": [{"authority_scope": ["billing", "delegation"], "children": []}]}}"#,
                expression: "tree_authority_narrowing(root)",
                expected: "false",
            },
        ],
        edge_cases: &["Null tree returns true", "Trees deeper than 10 levels return false"],
    },
    // ==================== Sagas and outcomes ====================
    BuiltinSpec {
        name: "saga_amount_conserved",
        signature: "saga_amount_conserved(saga) -> boolean",
        description: "When completed compensation exists, its amount_micro total equals the completed forward total.",
        arguments: SAGA_ARG,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Fully compensated",
                context: r#"{"saga": {"steps": [{"step_id": "s1", "status": "completed", "amount_micro": "1000"}], "compensation_steps": [{"step_id": "c1", "status": "completed", "amount_micro": "1000"}]}}"#,
                expression: "saga_amount_conserved(saga)",
                expected: "true",
            },
            Example {
                description: "Partially compensated",
                context: r#"{"saga": {"steps": [{"step_id": "s1", "status": "completed", "amount_micro": "1000"}], "compensation_steps": [{"step_id": "c1", "status": "completed", "amount_micro": "400"}]}}"#,
                expression: "saga_amount_conserved(saga)",
                expected: "false",
            },
        ],
        edge_cases: &[
            "No completed compensation returns true",
            "Only completed steps are counted",
            "Non-object saga returns false",
        ],
    },
    BuiltinSpec {
        name: "saga_steps_sequential",
        signature: "saga_steps_sequential(saga) -> boolean",
        description: "Every step carries a distinct step_id.",
        arguments: SAGA_ARG,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Distinct ids",
                context: r#"{"saga": {"steps": [{"step_id": "s1"}, {"step_id": "s2"}]}}"#,
                expression: "saga_steps_sequential(saga)",
                expected: "true",
            },
            Example {
                description: "Repeated id",
                context: r#"{"saga": {"steps": [{"step_id": "s1"}, {"step_id": "s1"}]}}"#,
                expression: "saga_steps_sequential(saga)",
                expected: "false",
            },
        ],
        edge_cases: &["Empty steps return true", "Null saga returns false"],
    },
    BuiltinSpec {
        name: "saga_timeout_valid",
        signature: "saga_timeout_valid(saga) -> boolean",
        description: "Every completed step finished within timeout.per_step_seconds of starting.",
        arguments: SAGA_ARG,
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Step within its budget",
                context: r#"{"saga": {"steps": [{"step_id": "s1", "status": "completed", "started_at": "2026-01-15T10:00:00Z", "completed_at": "2026-01-15T10:00:30Z"}], "timeout": {"per_step_seconds": 60}}}"#,
                expression: "saga_timeout_valid(saga)",
                expected: "true",
            },
            Example {
                description: "Step overran",
                context: r#"{"saga": {"steps": [{"step_id": "s1", "status": "completed", "started_at": "2026-01-15T10:00:00Z", "completed_at": "2026-01-15T10:02:00Z"}], "timeout": {"per_step_seconds": 60}}}"#,
                expression: "saga_timeout_valid(saga)",
                expected: "false",
            },
        ],
        edge_cases: &[
            "Steps that are not completed are skipped",
            "A completed step without both timestamps returns false",
            "Missing timeout returns false",
        ],
    },
    BuiltinSpec {
        name: "outcome_consensus_valid",
        signature: "outcome_consensus_valid(outcome) -> boolean",
        description: "The declared outcome_type (unanimous, majority, deadlock or escalation) agrees with the votes and consensus flag.",
        arguments: &[ArgumentSpec {
            name: "outcome",
            type_: "MultiModelOutcome",
            description: "Outcome with votes, consensus_threshold and consensus_achieved",
        }],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Majority reached",
                context: r#"{"outcome": {"outcome_type": "majority", "votes": [{"vote": "agree"}, {"vote": "agree"}, {"vote": "disagree"}], "consensus_threshold": 0.5, "consensus_achieved": true}}"#,
                expression: "outcome_consensus_valid(outcome)",
                expected: "true",
            },
            Example {
                description: "Unanimity claimed with a dissenter",
                context: r#"{"outcome": {"outcome_type": "unanimous", "votes": [{"vote": "agree"}, {"vote": "disagree"}], "consensus_threshold": 1.0, "consensus_achieved": true}}"#,
                expression: "outcome_consensus_valid(outcome)",
                expected: "false",
            },
        ],
        edge_cases: &[
            "Escalation requires a non-empty escalated_to",
            "Unknown outcome types return false",
        ],
    },
    // ==================== Governance ====================
    BuiltinSpec {
        name: "monetary_policy_solvent",
        signature: "monetary_policy_solvent(policy, supply) -> boolean",
        description: "True when supply is at most policy.conservation_ceiling, compared exactly.",
        arguments: &[
            ArgumentSpec {
                name: "policy",
                type_: "MonetaryPolicy",
                description: "Policy carrying conservation_ceiling",
            },
            ArgumentSpec {
                name: "supply",
                type_: "bigint_coercible",
                description: "Current supply",
            },
        ],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Within the ceiling",
                context: r#"{"policy": {"conservation_ceiling": "1000000"}, "supply": "500000"}"#,
                expression: "monetary_policy_solvent(policy, supply)",
                expected: "true",
            },
            Example {
                description: "Over the ceiling",
                context: r#"{"policy": {"conservation_ceiling": "1000000"}, "supply": "1500000"}"#,
                expression: "monetary_policy_solvent(policy, supply)",
                expected: "false",
            },
        ],
        edge_cases: &["Supply equal to the ceiling is solvent", "Null policy returns false"],
    },
    BuiltinSpec {
        name: "permission_boundary_active",
        signature: "permission_boundary_active(boundary) -> boolean",
        description: "True when scope, permitted_if, reporting and revocation are all present.",
        arguments: &[ArgumentSpec {
            name: "boundary",
            type_: "PermissionBoundary",
            description: "Boundary to inspect",
        }],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Complete boundary",
                context: r#"{"boundary": {"scope": "billing", "permitted_if": "true", "reporting": {"required": true}, "revocation": {"trigger": "manual"}}}"#,
                expression: "permission_boundary_active(boundary)",
                expected: "true",
            },
            Example {
                description: "No reporting",
                context: r#"{"boundary": {"scope": "billing", "permitted_if": "true", "revocation": {"trigger": "manual"}}}"#,
                expression: "permission_boundary_active(boundary)",
                expected: "false",
            },
        ],
        edge_cases: &["Null fields count as missing", "Null boundary returns false"],
    },
    BuiltinSpec {
        name: "proposal_quorum_met",
        signature: "proposal_quorum_met(proposal) -> boolean",
        description: "True when the weights in voting.votes_cast sum to at least voting.quorum_required.",
        arguments: &[ArgumentSpec {
            name: "proposal",
            type_: "GovernanceProposal",
            description: "Proposal with a voting record",
        }],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Quorum reached",
                context: r#"{"proposal": {"voting": {"quorum_required": 0.5, "votes_cast": [{"voter_id": "a", "weight": 0.3}, {"voter_id": "b", "weight": 0.3}]}}}"#,
                expression: "proposal_quorum_met(proposal)",
                expected: "true",
            },
            Example {
                description: "Quorum missed",
                context: r#"{"proposal": {"voting": {"quorum_required": 0.8, "votes_cast": [{"voter_id": "a", "weight": 0.3}, {"voter_id": "b", "weight": 0.2}]}}}"#,
                expression: "proposal_quorum_met(proposal)",
                expected: "false",
            },
        ],
        edge_cases: &["No votes returns false", "Null proposal returns false"],
    },
    BuiltinSpec {
        name: "proposal_weights_normalized",
        signature: "proposal_weights_normalized(proposal) -> boolean",
        description: "True when the weights in voting.votes_cast sum to 1 within 0.001.",
        arguments: &[ArgumentSpec {
            name: "proposal",
            type_: "GovernanceProposal",
            description: "Proposal with a voting record",
        }],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Weights sum to one",
                context: r#"{"proposal": {"voting": {"votes_cast": [{"weight": 0.1}, {"weight": 0.2}, {"weight": 0.3}, {"weight": 0.4}]}}}"#,
                expression: "proposal_weights_normalized(proposal)",
                expected: "true",
            },
            Example {
                description: "Weights overshoot",
                context: r#"{"proposal": {"voting": {"votes_cast": [{"weight": 0.5}, {"weight": 0.6}]}}}"#,
                expression: "proposal_weights_normalized(proposal)",
                expected: "false",
            },
        ],
        edge_cases: &["No votes returns true", "Null proposal returns false"],
    },
    BuiltinSpec {
        name: "proposal_execution_valid",
        signature: "proposal_execution_valid(execution) -> boolean",
        description: "True when the execution completed and every applied change succeeded.",
        arguments: &[ArgumentSpec {
            name: "execution",
            type_: "ProposalExecution",
            description: "Execution record with status and changes_applied",
        }],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Clean execution",
                context: r#"{"execution": {"status": "completed", "changes_applied": [{"result": "success"}, {"result": "success"}]}}"#,
                expression: "proposal_execution_valid(execution)",
                expected: "true",
            },
            Example {
                description: "Skipped change",
                context: r#"{"execution": {"status": "completed", "changes_applied": [{"result": "success"}, {"result": "skipped"}]}}"#,
                expression: "proposal_execution_valid(execution)",
                expected: "false",
            },
        ],
        edge_cases: &["No changes returns false", "Any status other than completed returns false"],
    },
    BuiltinSpec {
        name: "execution_checkpoint_valid",
        signature: "execution_checkpoint_valid(checkpoint) -> boolean",
        description: "The proceed_decision is allowed for the health_status: healthy continues, degraded continues or pauses, failing rolls back.",
        arguments: &[ArgumentSpec {
            name: "checkpoint",
            type_: "ExecutionCheckpoint",
            description: "Checkpoint with health_status and proceed_decision",
        }],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Degraded and paused",
                context: r#"{"cp": {"health_status": "degraded", "proceed_decision": "pause"}}"#,
                expression: "execution_checkpoint_valid(cp)",
                expected: "true",
            },
            Example {
                description: "Failing but continuing",
                context: r#"{"cp": {"health_status": "failing", "proceed_decision": "continue"}}"#,
                expression: "execution_checkpoint_valid(cp)",
                expected: "false",
            },
        ],
        edge_cases: &["Unknown health status returns false", "Null checkpoint returns false"],
    },
    BuiltinSpec {
        name: "basket_weights_normalized",
        signature: "basket_weights_normalized(basket) -> boolean",
        description: "True when the weights of basket.entries sum to 1 within 0.001.",
        arguments: &[ArgumentSpec {
            name: "basket",
            type_: "BasketComposition",
            description: "Basket with weighted entries",
        }],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Normalized",
                context: r#"{"basket": {"entries": [{"model_id": "a", "weight": 0.6}, {"model_id": "b", "weight": 0.4}]}}"#,
                expression: "basket_weights_normalized(basket)",
                expected: "true",
            },
            Example {
                description: "Empty basket",
                context: r#"{"basket": {"entries": []}}"#,
                expression: "basket_weights_normalized(basket)",
                expected: "false",
            },
        ],
        edge_cases: &["Empty entries return false", "Drift up to 0.001 is tolerated"],
    },
    BuiltinSpec {
        name: "constraint_lifecycle_valid",
        signature: "constraint_lifecycle_valid(event) -> boolean",
        description: "True when from_status -> to_status is an allowed constraint lifecycle transition.",
        arguments: &[ArgumentSpec {
            name: "event",
            type_: "ConstraintLifecycleEvent",
            description: "Event with from_status and to_status",
        }],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Review enacts",
                context: r#"{"event": {"from_status": "under_review", "to_status": "enacted"}}"#,
                expression: "constraint_lifecycle_valid(event)",
                expected: "true",
            },
            Example {
                description: "Skipping review",
                context: r#"{"event": {"from_status": "proposed", "to_status": "enacted"}}"#,
                expression: "constraint_lifecycle_valid(event)",
                expected: "false",
            },
        ],
        edge_cases: &[
            "Allowed: proposed -> under_review | rejected, under_review -> enacted | rejected, enacted -> deprecated",
            "Same-status transitions return false",
        ],
    },
    BuiltinSpec {
        name: "audit_trail_chain_valid",
        signature: "audit_trail_chain_valid(trail) -> boolean",
        description: "Each entry's previous_hash is the prior entry's entry_hash, starting from genesis_hash.",
        arguments: &[ArgumentSpec {
            name: "trail",
            type_: "AuditTrail",
            description: "Trail with entries and genesis_hash",
        }],
        return_type: "boolean",
        short_circuit: false,
        examples: &[
            Example {
                description: "Linked chain",
                context: r#"{"trail": {"genesis_hash": "g", "entries": [{"entry_hash": "a", "previous_hash": "g"}, {"entry_hash": "b", "previous_hash": "a"}]}}"#,
                expression: "audit_trail_chain_valid(trail)",
                expected: "true",
            },
            Example {
                description: "First entry not linked to genesis",
                context: r#"{"trail": {"genesis_hash": "g", "entries": [{"entry_hash": "a", "previous_hash": "x"}]}}"#,
                expression: "audit_trail_chain_valid(trail)",
                expected: "false",
            },
        ],
        edge_cases: &["Empty trail returns true", "Content hashes are not recomputed"],
    },
];
