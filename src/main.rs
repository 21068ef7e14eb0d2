use anyhow::Context;
use evacopt::config::{ConfigManager, ExperimentPaths};
use evacopt::error::EvacError;
use evacopt::services::{DriverArgs, ExperimentDriver};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("evacopt");

    let cli = match DriverArgs::parse(args.get(1..).unwrap_or_default()) {
        Ok(cli) => cli,
        Err(EvacError::Usage(reason)) => {
            println!("{}", DriverArgs::usage(program));
            log::debug!("Usage error: {}", reason);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    let paths = ExperimentPaths::new(".", &cli.environment_name, cli.num_exits);
    let config = ConfigManager::load_experiment(
        &cli.search_config,
        &paths,
        cli.num_exits,
        &cli.simulation_config,
    )
    .context("Failed to load experiment configuration")?;
    log::info!("{:?}", config);

    let mut driver = ExperimentDriver::from_config(config, paths)
        .context("Failed to set up the experiment")?;
    driver.run().context("Experiment failed")?;

    println!("EA finished");
    Ok(())
}
