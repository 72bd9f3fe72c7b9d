#[path = "codefence-cli/app/mod.rs"]
mod app;
#[path = "codefence-cli/args.rs"]
mod args;
#[path = "codefence-cli/logging.rs"]
mod logging;
#[path = "codefence-cli/sandbox/mod.rs"]
mod sandbox;
#[path = "codefence-cli/tools/mod.rs"]
mod tools;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
