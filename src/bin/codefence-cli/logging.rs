use flexi_logger::Logger;

/// Initialize stderr logging; `RUST_LOG`-style env overrides win.
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    Logger::try_with_env_or_str(default_level)?.start()?;
    Ok(())
}
