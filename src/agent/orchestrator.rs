//! Agent orchestrator
//!
//! Runs the plan/execute loop for one request: ask the reasoning service for
//! an action, run it, feed the observation back, and stop on a final answer
//! or at the iteration cap. Strictly sequential.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::agent::action::ActionInstruction;
use crate::agent::conversation::Conversation;
use crate::agent::loop_state::{AgentLoopState, Observation};
use crate::agent::prompt::build_system_prompt;
use crate::core::{Config, Result, ToolError, TooldeckError};
use crate::llm::{create_provider, GenerateOptions, LLMProvider};
use crate::tools::ToolRegistry;

/// Result of a request that reached a final answer
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    /// Final answer, verbatim from the model
    pub answer: String,
    /// Full history of the session
    pub conversation: Conversation,
    /// Tool executions attempted
    pub tool_invocations: usize,
}

impl SessionOutcome {
    /// Planning rounds used
    pub fn iterations(&self) -> usize {
        self.conversation.iterations()
    }
}

/// Main agent that orchestrates the reasoning service and tools
pub struct Agent {
    /// Configuration
    config: Config,
    /// Reasoning service
    llm: Arc<dyn LLMProvider>,
    /// Tool registry (shared with the blocking pool while a tool runs)
    tools: Arc<ToolRegistry>,
    /// System instructions, built once from the registry
    system_prompt: String,
}

impl Agent {
    /// Create an agent backed by Gemini and the built-in tools
    pub fn new(config: Config) -> Result<Self> {
        let llm = create_provider(&config)?;
        let tools = ToolRegistry::from_config(&config);
        Ok(Self::with_parts(config, llm, tools))
    }

    /// Create an agent from explicit parts
    pub fn with_parts(config: Config, llm: Arc<dyn LLMProvider>, tools: ToolRegistry) -> Self {
        let system_prompt = build_system_prompt(&tools, config.agent.system_prompt.as_deref());
        debug!(tools = ?tools.names(), "Agent ready");

        Self {
            config,
            llm,
            tools: Arc::new(tools),
            system_prompt,
        }
    }

    /// Process a request and return the final answer
    pub async fn process(&self, request: &str) -> Result<String> {
        Ok(self.run(request).await?.answer)
    }

    /// Process a request and return the whole session
    ///
    /// Ends with a final answer, or with `Planning` (undecodable reply) or
    /// `MaxIterationsExceeded`. Tool errors are fed back to the model.
    pub async fn run(&self, request: &str) -> Result<SessionOutcome> {
        info!("Processing new request: {}", request);

        let mut state = AgentLoopState::new(request, self.config.agent.max_iterations);

        while state.should_continue() {
            let round = state.begin_round();
            info!(round, max = state.max_iterations, "Waiting for plan");

            let reply = match self
                .llm
                .chat(
                    &self.system_prompt,
                    state.conversation.turns(),
                    Some(GenerateOptions {
                        temperature: Some(self.config.gemini.temperature),
                        max_tokens: self.config.gemini.max_output_tokens,
                    }),
                )
                .await
            {
                Ok(reply) => reply,
                Err(e) => {
                    state.abort();
                    return Err(e);
                }
            };

            debug!(round, "Model reply: {}", reply.content);
            state.record_plan(&reply.content);

            let action = match ActionInstruction::parse(&reply.content) {
                Ok(action) => action,
                Err(e) => {
                    state.abort();
                    warn!(round, "Aborting: {}", e);
                    return Err(e);
                }
            };

            match action {
                ActionInstruction::FinalAnswer { text } => {
                    info!(
                        rounds = round,
                        tools = state.tool_invocations,
                        "Final answer received"
                    );
                    state.finish(text.clone());
                    return Ok(SessionOutcome {
                        answer: text,
                        conversation: state.conversation,
                        tool_invocations: state.tool_invocations,
                    });
                }
                ActionInstruction::CallTool { name, arguments } => {
                    state.begin_tool();
                    info!(round, tool = %name, args = ?arguments, "Executing tool");

                    let observation = self.execute_tool(&name, &arguments, &state).await;
                    if observation.success {
                        info!(tool = %name, "Tool result: {}", observation.output);
                    } else {
                        warn!(tool = %name, "Tool error: {}", observation.output);
                    }
                    state.record_observation(observation);
                }
            }
        }

        state.abort();
        warn!(
            limit = state.max_iterations,
            "Aborting: iteration cap reached without a final answer"
        );
        Err(TooldeckError::MaxIterationsExceeded {
            limit: state.max_iterations,
        })
    }

    /// Run one tool call and turn the outcome into an observation
    async fn execute_tool(
        &self,
        name: &str,
        values: &[String],
        state: &AgentLoopState,
    ) -> Observation {
        // An unknown name wins over any argument problem
        if !self.tools.contains(name) {
            return Observation::error(name, ToolError::unknown(name).to_string());
        }

        let args = match state
            .resolve_references(name, values)
            .and_then(|resolved| self.tools.bind_positional(name, &resolved))
        {
            Ok(args) => args,
            Err(e) => return Observation::error(name, e.to_string()),
        };

        // Handlers may block on OS automation
        let tools = Arc::clone(&self.tools);
        let tool = name.to_string();
        let result = tokio::task::spawn_blocking(move || tools.invoke(&tool, &args)).await;

        match result {
            Ok(Ok(output)) => Observation::success(name, output),
            Ok(Err(e)) => Observation::error(name, e.to_string()),
            Err(join) => Observation::error(
                name,
                ToolError::execution(name, join.to_string()).to_string(),
            ),
        }
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// System instructions sent with every planning request
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Name and model of the reasoning service
    pub fn provider_label(&self) -> String {
        format!("{} ({})", self.llm.name(), self.llm.model())
    }
}
