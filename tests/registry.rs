//! Tool registry contract tests against the built-in tools

use std::sync::{Arc, Mutex};

use serde_json::json;
use tooldeck::core::config::SlideConfig;
use tooldeck::core::{Arguments, ToolError};
use tooldeck::tools::{ScriptError, ScriptRunner, ToolRegistry};

#[derive(Default)]
struct CountingRunner {
    runs: Mutex<usize>,
}

impl ScriptRunner for CountingRunner {
    fn run(&self, _script: &str) -> Result<String, ScriptError> {
        *self.runs.lock().unwrap() += 1;
        Ok(String::new())
    }
}

fn registry() -> (ToolRegistry, Arc<CountingRunner>) {
    let runner = Arc::new(CountingRunner::default());
    (
        ToolRegistry::with_script_runner(SlideConfig::default(), runner.clone()),
        runner,
    )
}

fn args(value: serde_json::Value) -> Arguments {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_well_formed_arguments_never_invalid() {
    let (registry, _) = registry();

    for name in registry.names() {
        match registry.invoke(name, &args(json!({"text": "Hello World"}))) {
            Ok(_) | Err(ToolError::ExecutionFailure { .. }) => {}
            Err(other) => panic!("{name}: unexpected {other}"),
        }
    }
}

#[test]
fn test_missing_required_field_never_executes() {
    let (registry, runner) = registry();

    for name in registry.names() {
        let err = registry.invoke(name, &Arguments::new()).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }), "{name}: {err}");
    }
    assert_eq!(*runner.runs.lock().unwrap(), 0);
}

#[test]
fn test_unknown_tool_has_no_side_effects() {
    let (registry, runner) = registry();

    let err = registry
        .invoke("delete_everything", &args(json!({"text": "x"})))
        .unwrap_err();

    assert!(matches!(err, ToolError::UnknownTool { ref name } if name == "delete_everything"));
    assert_eq!(*runner.runs.lock().unwrap(), 0);
}

#[test]
fn test_reverse_is_idempotent() {
    let (registry, runner) = registry();
    let input = args(json!({"text": "Hello, World!"}));

    let first = registry.invoke("reverse_string", &input).unwrap();
    let second = registry.invoke("reverse_string", &input).unwrap();

    assert_eq!(first, "!dlroW ,olleH");
    assert_eq!(first, second);
    assert_eq!(*runner.runs.lock().unwrap(), 0);
}

#[test]
fn test_slide_tool_runs_automation_once() {
    let (registry, runner) = registry();

    let out = registry
        .invoke("create_keynote_slide", &args(json!({"text": "Hello"})))
        .unwrap();

    assert_eq!(out, "Created Keynote slide with provided text: Hello");
    assert_eq!(*runner.runs.lock().unwrap(), 1);
}

#[test]
fn test_describe_is_machine_readable() {
    let (registry, _) = registry();
    let described = serde_json::to_value(registry.describe()).unwrap();

    assert_eq!(described[0]["function"]["name"], "reverse_string");
    assert_eq!(described[1]["function"]["name"], "create_keynote_slide");
    assert_eq!(
        described[1]["function"]["parameters"]["properties"]["text"]["type"],
        "string"
    );
}
