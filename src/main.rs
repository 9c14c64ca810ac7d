use log::warn;
use science_hub::Utils::logger::init_logging;
use science_hub::cli::cli_main::run_interactive_menu;
use science_hub::settings::{ConfigManager, DEFAULT_CONFIG_FILE};

pub fn main() {
    let (mut manager, config_error) = ConfigManager::load(DEFAULT_CONFIG_FILE);
    let logging = init_logging(manager.get_config());
    if let Err(e) = &logging {
        eprintln!("Logging disabled: {}", e);
    }
    // the logger did not exist yet while the file was read
    if let Some(e) = config_error {
        let message = format!(
            "Configuration '{}' not usable ({}), using defaults. Changing a setting will overwrite it.",
            DEFAULT_CONFIG_FILE, e
        );
        match logging {
            Ok(()) => warn!("{}", message),
            Err(_) => eprintln!("{}", message),
        }
    }
    run_interactive_menu(&mut manager);
}
