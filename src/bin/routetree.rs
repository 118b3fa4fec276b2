use clap::Parser;
use routetree::cli::{run_cli, Cli};
use routetree::logging::{init_logging_with_config, LogConfig};

fn main() -> anyhow::Result<()> {
    let _guard = init_logging_with_config(&LogConfig::from_env())?;
    let cli = Cli::parse();
    run_cli(cli, &mut std::io::stdout().lock())
}
