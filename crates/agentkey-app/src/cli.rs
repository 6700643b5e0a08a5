use clap::Parser;

/// AgentKey: global hotkeys that route captured context through
/// text-processing agents.
#[derive(Parser, Debug)]
#[command(name = "agentkey", version, about)]
pub struct Args {
    /// Settings file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the registered agents and exit.
    #[arg(long)]
    pub list_agents: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
