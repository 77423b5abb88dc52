use android_attr_ids::cli::Cli;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = Cli::build_command().get_matches();

    // Logs go to stderr; stdout may carry the encoded table
    let default_level = Cli::log_level(matches.get_count("verbose"));
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = Cli::run_with_matches(matches) {
        error!("{}", e);
        std::process::exit(1);
    }
}
