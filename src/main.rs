use RedoxThe::cli::cli_main::run_interactive_menu;
use RedoxThe::settings::with_settings;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

pub fn main() {
    let level = with_settings(|manager| manager.config().log_level_filter());
    let config = ConfigBuilder::new().set_time_level(log::LevelFilter::Off).build();
    if let Err(e) = TermLogger::init(level, config, TerminalMode::Mixed, ColorChoice::Auto) {
        eprintln!("logger is not available: {}", e);
    }
    run_interactive_menu();
}
