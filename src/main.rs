//! tooldeck - natural-language tool runner
//!
//! Main entry point for the CLI application.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tooldeck::cli::commands::tools_text;
use tooldeck::{Agent, Config, Repl, ToolRegistry};

/// Request used when neither a request nor --interactive is given
const DEMO_REQUEST: &str =
    "reverse 'Hello World' and create a Keynote slide with the reversed text";

/// tooldeck - let an LLM drive a small set of local tools
#[derive(Parser, Debug)]
#[command(name = "tooldeck")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Request to run once (defaults to a demo request)
    request: Option<String>,

    /// Read requests from stdin until EOF or 'exit'
    #[arg(long, short = 'i', conflicts_with = "request")]
    interactive: bool,

    /// Gemini model to use
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Maximum planning rounds per request
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Enable debug output
    #[arg(long, short = 'd')]
    debug: bool,

    /// List the tools published to the model and exit
    #[arg(long)]
    list_tools: bool,

    /// Invoke a tool directly, without the model
    #[arg(long, value_name = "TOOL")]
    call: Option<String>,

    /// Argument for --call, as key=value (repeatable)
    #[arg(long = "arg", value_name = "KEY=VALUE", value_parser = parse_key_val, requires = "call")]
    args: Vec<(String, String)>,

    /// Print the default configuration file and exit
    #[arg(long)]
    print_config: bool,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    Ok((key.trim().to_string(), value.to_string()))
}

fn init_logging(debug: bool) {
    let default = if debug { "tooldeck=debug" } else { "tooldeck=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_config {
        println!("{}", Config::default_config_toml());
        return Ok(());
    }

    // Build configuration
    let mut config = Config::load()?;

    // Apply CLI overrides
    if let Some(ref model) = args.model {
        config.gemini.model = model.clone();
    }

    if let Some(max) = args.max_iterations {
        config.agent.max_iterations = max;
    }

    if args.debug {
        config.agent.debug = true;
    }

    config.validate()?;
    init_logging(config.agent.debug);

    if args.list_tools {
        let tools = ToolRegistry::from_config(&config);
        println!("{}", tools.describe_json()?);
        if config.agent.debug {
            eprintln!("{}", tools_text(&tools));
        }
        return Ok(());
    }

    // Direct tool call, no model involved
    if let Some(tool) = args.call {
        let tools = ToolRegistry::from_config(&config);
        let bound = tools.bind_named(&tool, &args.args)?;
        println!("{}", tools.invoke(&tool, &bound)?);
        return Ok(());
    }

    let agent = Agent::new(config)?;

    // Interactive REPL mode
    if args.interactive {
        Repl::new(agent).run().await?;
        return Ok(());
    }

    // Single request mode
    let request = args.request.unwrap_or_else(|| DEMO_REQUEST.to_string());
    let answer = agent.process(&request).await?;
    println!("{}", answer);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interactive_rejects_request() {
        let err = Args::try_parse_from(["tooldeck", "-i", "reverse abc"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);

        let args = Args::try_parse_from(["tooldeck", "-i"]).unwrap();
        assert!(args.interactive && args.request.is_none());
    }

    #[test]
    fn test_call_args() {
        let args =
            Args::try_parse_from(["tooldeck", "--call", "reverse_string", "--arg", "text=a=b"])
                .unwrap();
        assert_eq!(args.call.as_deref(), Some("reverse_string"));
        assert_eq!(args.args, vec![("text".to_string(), "a=b".to_string())]);

        assert!(Args::try_parse_from(["tooldeck", "--arg", "text=x"]).is_err());
        assert!(parse_key_val("novalue").is_err());
    }
}
