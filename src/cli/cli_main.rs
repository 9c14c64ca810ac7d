use super::cli_balancer::balancer_menu;
use super::cli_elements::{element_menu, isotope_menu, phase_menu, shells_menu};
use super::cli_molmass::molar_mass_menu;
use crate::Chemistry::molmass::MolarMassCalculator;
use crate::Chemistry::periodic_table::PeriodicTable;
use crate::settings::ConfigManager;
use log::warn;
use std::io::{self, Write};

pub fn run_interactive_menu(manager: &mut ConfigManager) {
    loop {
        show_main_menu();
        let Some(choice) = get_user_input() else {
            break;
        };

        match choice.trim() {
            "1" => molar_mass_menu(&build_calculator(manager)),
            "2" => balancer_menu(),
            "3" => isotope_menu(&load_table(manager)),
            "4" => element_menu(&load_table(manager)),
            "5" => phase_menu(&load_table(manager)),
            "6" => shells_menu(&load_table(manager)),
            "7" => settings_menu(manager),
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
}
/* colors
Blue (\x1b[34m) - Welcome header text

Yellow (\x1b[33m) - Menu options

Cyan (\x1b[36m) - "Enter your choice:" prompt

Reset (\x1b[0m) - Returns to normal color after each colored section
*/
fn show_main_menu() {
    println!(
        "\x1b[34m\n Welcome to Science Hub: chemistry calculators\n
    formula parsing, molar mass, reaction balancing, element data \n \x1b[0m"
    );
    println!("\x1b[33m1. Molecular Weight Calculator\x1b[0m");
    println!("\x1b[33m2. Reaction Balancer\x1b[0m");
    println!("\x1b[33m3. Isotopic Notation\x1b[0m");
    println!("\x1b[33m4. Element Lookup\x1b[0m");
    println!("\x1b[33m5. Phase Predictor\x1b[0m");
    println!("\x1b[33m6. Shell Configuration\x1b[0m");
    println!("\x1b[33m7. Settings\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    prompt("Enter your choice: ");
}

pub(crate) fn prompt(text: &str) {
    print!("\x1b[36m{}\x1b[0m", text);
    // a failed flush only delays the prompt text
    let _ = io::stdout().flush();
}

/// One line from stdin, `None` at end of input or on a read error
pub(crate) fn get_user_input() -> Option<String> {
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) => None,
        Ok(_) => Some(input),
        Err(e) => {
            warn!("Failed to read input: {}", e);
            None
        }
    }
}

// the configured table, or the built-in one when the configured file is unusable
fn load_table(manager: &ConfigManager) -> PeriodicTable {
    match manager.periodic_table() {
        Ok(table) => table,
        Err(e) => {
            println!("{}. Using the built-in periodic table.", e);
            warn!("Configured periodic table not loaded: {}", e);
            PeriodicTable::builtin()
        }
    }
}

fn build_calculator(manager: &ConfigManager) -> MolarMassCalculator {
    MolarMassCalculator::new(load_table(manager)).with_precision(manager.get_config().precision)
}

fn settings_menu(manager: &mut ConfigManager) {
    loop {
        let config = manager.get_config();
        println!("\n=== Settings ({}) ===", manager.config_file());
        println!(
            "Periodic table: {}",
            config.periodic_table.as_deref().unwrap_or("built-in")
        );
        println!("Precision: {} decimal places", config.precision);
        println!("Log file: {} (level {})", config.log_file, config.log_level);
        println!("Clear log on startup: {}", config.clear_log_on_startup);
        println!("\x1b[33m1. Set precision\x1b[0m");
        println!("\x1b[33m2. Use periodic table file\x1b[0m");
        println!("\x1b[33m3. Use built-in periodic table\x1b[0m");
        println!("\x1b[33m4. Toggle clear log on startup\x1b[0m");
        println!("\x1b[33m5. Reset to defaults\x1b[0m");
        println!("\x1b[33m0. Back to main menu\x1b[0m");
        prompt("Enter your choice: ");

        let Some(choice) = get_user_input() else {
            break;
        };
        let result = match choice.trim() {
            "1" => {
                prompt("Decimal places: ");
                let Some(input) = get_user_input() else { break };
                match input.trim().parse::<usize>() {
                    Ok(precision) => manager.set_precision(precision),
                    Err(_) => {
                        println!("Precision must be a non-negative integer.");
                        continue;
                    }
                }
            }
            "2" => {
                prompt("Path to PeriodicTableJSON file: ");
                let Some(input) = get_user_input() else { break };
                manager.set_periodic_table(input.trim())
            }
            "3" => manager.use_builtin_periodic_table(),
            "4" => {
                let clear = !manager.get_config().clear_log_on_startup;
                manager.set_clear_log_on_startup(clear)
            }
            "5" => manager.reset_to_defaults(),
            "0" => break,
            _ => {
                println!("Invalid choice. Please try again.");
                continue;
            }
        };
        match result {
            Ok(()) => println!("Settings saved."),
            Err(e) => println!("Error: {}", e),
        }
    }
}
