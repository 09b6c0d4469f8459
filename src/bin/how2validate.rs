//! How2Validate CLI
//!
//! Validates secrets against the services they belong to

use anyhow::Result;
use how2validate::core::logging::init_logging;
use how2validate::{
    CargoUpdater, ChoiceSet, ConfigLoadOptions, ConfigLoader, Dispatcher, H2vError, Invocation,
    RegistrySource, ServiceHandlers, ToolConfig, ValidationOutcome, parse_request,
};
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    match run().await {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if let Some(error) = e.downcast_ref::<H2vError>() {
                for action in error.suggested_actions() {
                    eprintln!("  - {}", action);
                }
            }
            process::exit(1);
        }
    }
}

async fn run() -> Result<i32> {
    let config = ConfigLoader::load(ConfigLoadOptions::from_process()).await?;
    init_logging(&config.logging)?;

    let document = RegistrySource::from_config(&config).load_document().await?;
    let choices = ChoiceSet::from_token_manager(&document);

    let request = match parse_request(std::env::args(), &choices, &config) {
        Ok(Invocation::Version(banner)) => {
            println!("{}", banner);
            return Ok(0);
        }
        Ok(Invocation::Request(request)) => request,
        Err(e) => {
            e.print()?;
            return Ok(e.exit_code());
        }
    };

    let backend = ServiceHandlers::new(&document, &config)?;
    let updater = CargoUpdater::new(config.package_name.as_str());
    let report = Dispatcher::new(&choices, &backend, &updater)
        .run(&request)
        .await;

    if let Some(outcome) = &report.outcome {
        print_outcome(outcome, &config);
    }

    Ok(0)
}

fn print_outcome(outcome: &ValidationOutcome, config: &ToolConfig) {
    if let ValidationOutcome::Status(status) = outcome {
        println!("[{}] {}", status.state.label(config), status.message);
    }
}
