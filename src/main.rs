use anyhow::Result;
use clap::Parser;
use shader_deliver::cli::Cli;
use shader_deliver::{debug, runner};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI --log-level takes precedence, then RUST_LOG, then info.
    debug::init(
        cli.log_level.map(|level| level.to_level_filter()),
        cli.log_file.as_deref(),
    )?;

    log::info!("shader-deliver v{}", shader_deliver::VERSION);

    let result = runner::run(&cli);
    let code = runner::exit_code(&result);
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
