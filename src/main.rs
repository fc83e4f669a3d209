use std::sync::Arc;

use log::{debug, error, info};
use twitch_recorder::configuration::{Arguments, Config};
use twitch_recorder::controller::Controller;
use twitch_recorder::logging;
use twitch_recorder::notification::notifier;
use twitch_recorder::post_processing::PostProcessor;

#[tokio::main]
async fn main() {
    let arguments = Arguments::from_args();

    // The log file location lives in the configuration, so it is read before the logger
    // exists and its errors are reported right after.
    let config = Config::load(&arguments);
    let log_file = config.as_ref().ok().and_then(|config| config.log_file.clone());
    if let Err(e) = logging::init(arguments.log_level, log_file.as_deref()) {
        eprintln!("Unable to set up logging: {}", e);
        std::process::exit(1);
    }

    info!(
        "twitch-recorder v{}: records every live session of a channel",
        env!("CARGO_PKG_VERSION")
    );

    match Config::source(&arguments) {
        Some(path) => info!("Reading configuration from {}", path.display()),
        None => debug!("No configuration file, starting from defaults"),
    }
    let config = config.unwrap_or_else(|e| {
        error!("Unable to load configuration: {}", e);
        std::process::exit(1);
    });
    info!("Configuration loaded, watching {}", config.username);
    debug!("{:?}", config.layout());

    let notifier = notifier::from_config(&config).unwrap_or_else(|e| {
        error!("Unable to set up notifications: {}", e);
        std::process::exit(1);
    });
    let grace = config.request_timeout();

    let post_processor = Arc::new(PostProcessor::from_config(&config));
    let pending = post_processor.prepare_sweep().await.unwrap_or_else(|e| {
        error!("Unable to prepare the recording directories: {}", e);
        std::process::exit(1);
    });

    let sweeper = post_processor.clone();
    let _sweep = tokio::spawn(async move {
        sweeper.sweep(pending).await;
    });

    let mut controller = Controller::from_config(config, notifier.clone(), post_processor)
        .unwrap_or_else(|e| {
            error!("Unable to create a controller instance: {}, exiting...", e);
            std::process::exit(1);
        });

    let result = tokio::spawn(async move {
        info!("Spawning the controller");
        controller.run().await
    })
    .await;

    match result {
        Ok(Err(e)) => error!("Controller stopped: {}, exiting...", e),
        Ok(Ok(())) => info!("Controller stopped"),
        Err(e) => error!("Error joining the controller task: {:?}", e),
    }

    notifier.shutdown(grace).await;
    std::process::exit(1);
}
