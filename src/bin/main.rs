use tigs::{cli, telemetry};

fn main() {
    let cli = cli::parse_from(std::env::args_os());

    // Telemetry needs the logging config; a broken config file still gets
    // reported through the defaults.
    let config = cli::load_config(&cli);
    let logging = config
        .as_ref()
        .map(|cfg| cfg.logging.clone())
        .unwrap_or_default();
    let _telemetry_guard = telemetry::init(telemetry::TelemetryConfig::new(cli.verbose, logging));

    let result = config
        .map_err(tigs::Error::from)
        .and_then(|config| cli::run(cli, config));
    if let Err(e) = result {
        tracing::debug!(
            effect = e.effect().as_str(),
            retryable = e.transience().is_retryable(),
            "command failed"
        );
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
