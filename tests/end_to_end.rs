//! End-to-end tests: JSON lines in, Python module out

use json2type::{infer_from_reader, render_module, InferConfig, JsonBackend, RenderConfig};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Cursor;

fn run(input: &str) -> String {
    run_with(input, InferConfig::default())
}

fn run_with(input: &str, config: InferConfig) -> String {
    let inference = infer_from_reader(Cursor::new(input), config, |_| {}).unwrap();
    render_module(&inference.root, &RenderConfig::default())
}

const POLICIES: &str = r#"[{"limit": 1000000, "price": 1200, "value": "", "excess": "No", "coverage": "do", "retention": 0, "bundled_with": "Other"}, {"limit": 2000000, "price": 2100, "value": "", "excess": "Yes", "coverage": "fiduciary", "retention": 5000, "bundled_with": "epli"}]
[{"limit": 500000, "price": 800, "value": "", "excess": "No", "coverage": "epli", "retention": 2500, "bundled_with": "crm"}, {"limit": 1000000, "price": 950, "value": "", "excess": "Yes", "coverage": "do", "retention": 0, "bundled_with": "mpl"}]
"#;

#[test]
fn test_list_of_policies() {
    assert_eq!(
        run(POLICIES),
        "import typing as t

class RootDict(t.TypedDict):
    limit: int
    price: int
    value: t.Literal['']
    excess: t.Literal['No', 'Yes']
    coverage: t.Literal['do', 'fiduciary', 'epli']
    retention: int
    bundled_with: t.Literal['Other', 'epli', 'crm', 'mpl']

RootType = list[RootDict]"
    );
}

#[test]
fn test_widening_and_optional_field() {
    let input = "{\"a\": 1}\n{\"a\": 1.5, \"b\": \"x\"}\n{\"a\": 2}\n";
    assert_eq!(
        run(input),
        "import typing as t

class RootDict(t.TypedDict):
    a: float
    b: t.NotRequired[t.Literal['x']]

RootType = RootDict"
    );
}

#[test]
fn test_tagged_records() {
    let input = "{\"tag\": \"A\", \"v\": 1}\n{\"tag\": \"B\", \"v\": \"s\"}\n";
    assert_eq!(
        run(input),
        "import typing as t

class RootDict(t.TypedDict):
    tag: t.Literal['A', 'B']
    v: t.Union[int, t.Literal['s']]

RootType = RootDict"
    );
}

#[test]
fn test_nested_records_with_nullable_fields() {
    let input = r#"{"id": 1, "user": {"name": "ann", "email": null}, "tags": ["a"]}
{"id": 2, "user": {"name": "bob", "email": "bob@example.com"}, "tags": []}
this line is not json
{"id": 3, "user": {"name": "cy"}, "tags": null}
"#;
    assert_eq!(
        run(input),
        "import typing as t

class UserDict(t.TypedDict):
    name: t.Literal['ann', 'bob', 'cy']
    email: t.NotRequired[t.Optional[t.Literal['bob@example.com']]]

class RootDict(t.TypedDict):
    id: int
    user: UserDict
    tags: t.Optional[list[t.Literal['a']]]

RootType = RootDict"
    );
}

#[test]
fn test_output_is_stable_across_runs() {
    let input = "{\"x\": [1, \"a\", {\"k\": null}]}\n{\"x\": [], \"y\": {\"z\": 1.0}}\n";
    assert_eq!(run(input), run(input));
}

#[test]
fn test_simd_backend_produces_same_module() {
    let simd = run_with(POLICIES, InferConfig::default().with_backend(JsonBackend::Simd));
    assert_eq!(simd, run(POLICIES));
}

#[test]
fn test_many_distinct_values_become_str() {
    let input: String = (0..25).map(|i| format!("{{\"code\": \"c{i}\"}}\n")).collect();
    let bounded = run_with(&input, InferConfig::bounded_by(&RenderConfig::default()));
    let unbounded = run(&input);

    assert!(bounded.contains("    code: str\n"));
    assert_eq!(bounded, unbounded);
}

#[test]
fn test_incompatible_records_fail_without_output() {
    let input = "{\"a\": [1]}\n{\"a\": 1}\n";
    let err = infer_from_reader(Cursor::new(input), InferConfig::default(), |_| {}).unwrap_err();
    assert_eq!(err.to_string(), "Cannot merge \"array\" and \"int\"");
}

#[test]
fn test_model_serializes_as_json() {
    let input = "{\"id\": 1, \"tag\": \"a\"}\n{\"id\": 2}\n";
    let inference = infer_from_reader(Cursor::new(input), InferConfig::default(), |_| {}).unwrap();
    let model = serde_json::to_value(&inference.root).unwrap();

    assert_eq!(
        model,
        json!({
            "type": "object",
            "position": "$",
            "properties": {
                "id": {"type": "scalar", "position": "$/id", "kind": "int"},
                "tag": {
                    "type": "string",
                    "position": "$/tag",
                    "values": {"counts": {"a": 1}, "overflowed": false, "untracked": 0}
                }
            },
            "not_required": ["tag"],
            "keys_statistic": {"id": 2, "tag": 1},
            "merge_count": 1
        })
    );
}
