//! Interactive REPL for tooldeck
//!
//! Reads requests line by line until end of input or an exit command.

use std::io::{self, BufRead, Write};

use tracing::{error, warn};

use crate::agent::Agent;
use crate::cli::commands::{handle_command, CommandResult};
use crate::core::Result;

/// Interactive REPL (Read-Eval-Print Loop)
pub struct Repl {
    agent: Agent,
}

impl Repl {
    /// Create a REPL around an agent
    pub fn new(agent: Agent) -> Self {
        Self { agent }
    }

    /// Run the REPL on stdin/stdout
    pub async fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock()).await
    }

    /// Run the REPL on the given input and output
    ///
    /// A failed request is reported and the loop keeps going; only I/O
    /// errors end it early. Loop guards print as `Stopped:`, other failures
    /// as `Error:`.
    pub async fn run_with<R, W>(&mut self, mut input: R, mut output: W) -> Result<()>
    where
        R: BufRead,
        W: Write,
    {
        self.print_banner(&mut output)?;

        loop {
            write!(output, "\nEnter your request: ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                // EOF (Ctrl+D)
                writeln!(output, "\nGoodbye!")?;
                break;
            }

            match handle_command(&line, self.agent.tools()) {
                CommandResult::Exit => {
                    writeln!(output, "Goodbye!")?;
                    break;
                }
                CommandResult::Handled(text) => writeln!(output, "{}", text)?,
                CommandResult::None => continue,
                CommandResult::Continue(request) => match self.agent.process(&request).await {
                    Ok(answer) => writeln!(output, "\nResult: {}", answer)?,
                    Err(e) if e.is_loop_guard() => {
                        warn!("Request stopped: {}", e);
                        writeln!(output, "\nStopped: {}", e)?;
                    }
                    Err(e) => {
                        error!("Request failed: {}", e);
                        writeln!(output, "\nError: {}", e)?;
                    }
                },
            }
        }

        Ok(())
    }

    /// Print the startup banner
    fn print_banner<W: Write>(&self, output: &mut W) -> Result<()> {
        writeln!(output, "=== tooldeck interactive mode ===")?;
        writeln!(output, "Model:  {}", self.agent.provider_label())?;
        writeln!(
            output,
            "Tools:  {}",
            self.agent.tools().names().join(", ")
        )?;
        writeln!(
            output,
            "Rounds: {} per request",
            self.agent.config().agent.max_iterations
        )?;
        writeln!(output, "Type 'help' for commands, 'exit' to quit")?;
        Ok(())
    }
}
