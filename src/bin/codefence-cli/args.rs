use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "codefence",
    about = "Coding agent that answers a prompt using sandboxed filesystem and Python tools"
)]
pub struct CliArgs {
    /// Natural-language request for the agent.
    #[arg(index = 1)]
    pub prompt: Option<String>,
    /// Print iteration banners and tool traffic on stderr.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
