use clap::Parser;
use color_eyre::eyre::Result;
use fixtool::cmd::MainCmd;

fn main() -> Result<()> {
    color_eyre::install()?;

    if std::env::var_os("RUST_BACKTRACE").is_none() {
        std::env::set_var("RUST_BACKTRACE", "1");
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    MainCmd::parse().run()?;

    Ok(())
}
