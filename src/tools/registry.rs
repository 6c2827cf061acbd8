//! Tool registry - validates and dispatches tool calls
//!
//! A static, declarative table of name -> parameter schema -> handler. The
//! registry checks arguments against the schema before any handler runs and
//! never retries; failures go back to the caller.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::core::config::{Config, SlideConfig};
use crate::core::{
    Arguments, BoxError, ParamSpec, Result as TooldeckResult, ToolDefinition, ToolError,
};
use crate::tools::slides::{KeynoteSlideTool, OsaScript, ScriptRunner};
use crate::tools::text::ReverseTool;

/// Handler invoked with arguments that already passed validation
pub type Handler = Arc<dyn Fn(&Arguments) -> Result<String, BoxError> + Send + Sync>;

/// A named operation with its parameter schema and handler
#[derive(Clone)]
pub struct ToolDescriptor {
    name: String,
    description: String,
    params: Vec<ParamSpec>,
    handler: Handler,
}

impl ToolDescriptor {
    /// Create a descriptor with no parameters yet
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Arguments) -> Result<String, BoxError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    /// Append a parameter; declaration order is the positional order
    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Function definition with a JSON Schema for the parameters
    pub fn definition(&self) -> ToolDefinition {
        let properties: serde_json::Map<String, Value> = self
            .params
            .iter()
            .map(|p| {
                (
                    p.name.clone(),
                    json!({ "type": p.param_type.as_str(), "description": p.description }),
                )
            })
            .collect();

        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        ToolDefinition::function(
            &self.name,
            &self.description,
            json!({
                "type": "object",
                "properties": properties,
                "required": required,
            }),
        )
    }

    /// Positional call line, e.g. `FUNCTION_CALL: reverse_string|<text: string>`
    pub fn usage(&self) -> String {
        let mut line = format!("FUNCTION_CALL: {}", self.name);
        for p in &self.params {
            let optional = if p.required { "" } else { "?" };
            line.push_str(&format!("|<{}{}: {}>", p.name, optional, p.param_type));
        }
        line
    }

    /// Check arguments against the declared schema
    pub fn validate(&self, args: &Arguments) -> Result<(), ToolError> {
        if let Some(unexpected) = args
            .keys()
            .find(|k| !self.params.iter().any(|p| &p.name == *k))
        {
            return Err(ToolError::invalid(
                &self.name,
                format!("unexpected argument '{}'", unexpected),
            ));
        }

        for p in &self.params {
            match args.get(&p.name) {
                None | Some(Value::Null) if p.required => {
                    return Err(ToolError::invalid(
                        &self.name,
                        format!("missing required argument '{}'", p.name),
                    ));
                }
                None | Some(Value::Null) => {}
                Some(value) if !p.param_type.accepts(value) => {
                    return Err(ToolError::invalid(
                        &self.name,
                        format!(
                            "argument '{}' must be {}, got {}",
                            p.name,
                            p.param_type,
                            json_type_name(value)
                        ),
                    ));
                }
                Some(_) => {}
            }
        }

        Ok(())
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Registry of available tools
#[derive(Debug, Default)]
pub struct ToolRegistry {
    /// Descriptors in registration order
    tools: Vec<ToolDescriptor>,
    /// Name -> position in `tools`
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create a registry with no tools
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in tools and default slide layout
    pub fn new() -> Self {
        Self::with_script_runner(SlideConfig::default(), Arc::new(OsaScript))
    }

    /// Create a registry with the built-in tools using configured slide layout
    pub fn from_config(config: &Config) -> Self {
        Self::with_script_runner(config.slides.clone(), Arc::new(OsaScript))
    }

    /// Built-in tools, with slide automation routed through `runner`
    pub fn with_script_runner(slides: SlideConfig, runner: Arc<dyn ScriptRunner>) -> Self {
        let mut registry = Self::empty();

        let builtins = [
            ReverseTool::new().descriptor(),
            KeynoteSlideTool::new(slides, runner).descriptor(),
        ];
        for descriptor in builtins {
            if let Err(e) = registry.register(descriptor) {
                warn!("Skipping built-in tool: {}", e);
            }
        }

        registry
    }

    /// Register a tool; names must be unique
    pub fn register(&mut self, descriptor: ToolDescriptor) -> Result<(), ToolError> {
        if self.index.contains_key(descriptor.name()) {
            return Err(ToolError::AlreadyRegistered {
                name: descriptor.name().to_string(),
            });
        }

        self.index
            .insert(descriptor.name().to_string(), self.tools.len());
        self.tools.push(descriptor);
        Ok(())
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Whether a tool is registered
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Registered tool names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// All descriptors, in registration order
    pub fn descriptors(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// Machine-readable tool list published to the reasoning service
    pub fn describe(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(ToolDescriptor::definition).collect()
    }

    /// `describe()` rendered as pretty-printed JSON
    pub fn describe_json(&self) -> TooldeckResult<String> {
        Ok(serde_json::to_string_pretty(&self.describe())?)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validate arguments and run the tool
    pub fn invoke(&self, name: &str, args: &Arguments) -> Result<String, ToolError> {
        let tool = self.get(name).ok_or_else(|| ToolError::unknown(name))?;
        tool.validate(args)?;

        debug!(tool = name, "Invoking tool");
        (tool.handler)(args).map_err(|source| ToolError::execution(name, source))
    }

    /// Map positional values onto the declared parameter order, coercing each
    /// to its declared type. Missing values stay absent for `invoke` to report.
    pub fn bind_positional(&self, name: &str, values: &[String]) -> Result<Arguments, ToolError> {
        let tool = self.get(name).ok_or_else(|| ToolError::unknown(name))?;

        if values.len() > tool.params.len() {
            return Err(ToolError::invalid(
                name,
                format!(
                    "expected at most {} argument(s), got {}",
                    tool.params.len(),
                    values.len()
                ),
            ));
        }

        let mut args = Arguments::new();
        for (spec, raw) in tool.params.iter().zip(values) {
            args.insert(spec.name.clone(), coerce(name, spec, raw)?);
        }
        Ok(args)
    }

    /// Bind `key=value` pairs by parameter name, coercing each value
    pub fn bind_named(
        &self,
        name: &str,
        pairs: &[(String, String)],
    ) -> Result<Arguments, ToolError> {
        let tool = self.get(name).ok_or_else(|| ToolError::unknown(name))?;

        let mut args = Arguments::new();
        for (key, raw) in pairs {
            let spec = tool
                .params
                .iter()
                .find(|p| &p.name == key)
                .ok_or_else(|| ToolError::invalid(name, format!("unexpected argument '{}'", key)))?;
            args.insert(key.clone(), coerce(name, spec, raw)?);
        }
        Ok(args)
    }
}

fn coerce(tool: &str, spec: &ParamSpec, raw: &str) -> Result<Value, ToolError> {
    spec.param_type.coerce(raw).ok_or_else(|| {
        ToolError::invalid(
            tool,
            format!(
                "argument '{}' must be {}, got '{}'",
                spec.name, spec.param_type, raw
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ParamType;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_tool(calls: Arc<AtomicUsize>) -> ToolDescriptor {
        ToolDescriptor::new("repeat", "Repeat text", move |args| {
            calls.fetch_add(1, Ordering::SeqCst);
            let text = args.get("text").and_then(Value::as_str).unwrap_or_default();
            let times = args.get("times").and_then(Value::as_i64).unwrap_or(1);
            Ok(text.repeat(times as usize))
        })
        .param(ParamSpec::required("text", ParamType::String, "Text"))
        .param(ParamSpec::optional("times", ParamType::Integer, "Count"))
    }

    fn args(value: Value) -> Arguments {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_builtins_registered_in_order() {
        let registry = ToolRegistry::new();
        assert_eq!(registry.names(), vec!["reverse_string", "create_keynote_slide"]);
        assert_eq!(registry.describe().len(), 2);

        let published: Value = serde_json::from_str(&registry.describe_json().unwrap()).unwrap();
        assert_eq!(published[1]["function"]["name"], "create_keynote_slide");
    }

    #[test]
    fn test_duplicate_rejected() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = ToolRegistry::empty();
        registry.register(counting_tool(calls.clone())).unwrap();
        let err = registry.register(counting_tool(calls)).unwrap_err();
        assert!(matches!(err, ToolError::AlreadyRegistered { .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_invalid_arguments_never_execute() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = ToolRegistry::empty();
        registry.register(counting_tool(calls.clone())).unwrap();

        for bad in [
            json!({}),
            json!({"text": null}),
            json!({"text": 3}),
            json!({"text": "a", "times": "two"}),
            json!({"text": "a", "extra": true}),
        ] {
            let err = registry.invoke("repeat", &args(bad)).unwrap_err();
            assert!(matches!(err, ToolError::InvalidArguments { .. }), "{err}");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_optional_parameter() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = ToolRegistry::empty();
        registry.register(counting_tool(calls.clone())).unwrap();

        assert_eq!(registry.invoke("repeat", &args(json!({"text": "ab"}))).unwrap(), "ab");
        assert_eq!(
            registry
                .invoke("repeat", &args(json!({"text": "ab", "times": 2})))
                .unwrap(),
            "abab"
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_handler_failure_wraps_cause() {
        let mut registry = ToolRegistry::empty();
        registry
            .register(ToolDescriptor::new("boom", "Always fails", |_| {
                Err("kaboom".into())
            }))
            .unwrap();

        match registry.invoke("boom", &Arguments::new()).unwrap_err() {
            ToolError::ExecutionFailure { tool, source } => {
                assert_eq!(tool, "boom");
                assert_eq!(source.to_string(), "kaboom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bind_positional() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = ToolRegistry::empty();
        registry.register(counting_tool(calls)).unwrap();

        let bound = registry
            .bind_positional("repeat", &["x".to_string(), "3".to_string()])
            .unwrap();
        assert_eq!(bound.get("times"), Some(&json!(3)));

        let partial = registry.bind_positional("repeat", &[]).unwrap();
        assert!(partial.is_empty());

        let too_many = registry.bind_positional(
            "repeat",
            &["x".to_string(), "1".to_string(), "y".to_string()],
        );
        assert!(matches!(too_many, Err(ToolError::InvalidArguments { .. })));

        let bad_type = registry.bind_positional("repeat", &["x".to_string(), "lots".to_string()]);
        assert!(matches!(bad_type, Err(ToolError::InvalidArguments { .. })));

        let unknown = registry.bind_positional("nope", &[]);
        assert!(matches!(unknown, Err(ToolError::UnknownTool { .. })));
    }

    #[test]
    fn test_bind_named() {
        let registry = ToolRegistry::new();
        let bound = registry
            .bind_named("reverse_string", &[("text".to_string(), "abc".to_string())])
            .unwrap();
        assert_eq!(registry.invoke("reverse_string", &bound).unwrap(), "cba");

        let err = registry
            .bind_named("reverse_string", &[("txt".to_string(), "abc".to_string())])
            .unwrap_err();
        assert!(err.to_string().contains("unexpected argument 'txt'"));
    }

    #[test]
    fn test_definition_and_usage() {
        let calls = Arc::new(AtomicUsize::new(0));
        let tool = counting_tool(calls);

        let def = tool.definition();
        assert_eq!(def.tool_type, "function");
        assert_eq!(def.function.name, "repeat");
        assert_eq!(def.function.parameters["required"], json!(["text"]));
        assert_eq!(def.function.parameters["properties"]["times"]["type"], "integer");

        assert_eq!(
            tool.usage(),
            "FUNCTION_CALL: repeat|<text: string>|<times?: integer>"
        );
    }
}
