use super::cli_main::{get_user_input, prompt};
use crate::Chemistry::periodic_table::{PeriodicTable, normalize_symbol};
use crate::Chemistry::temperature::parse_temperature;
use crate::Utils::logger::log_event;

/// "C 14", "C-14" or "c14" -> ("C", 14)
fn parse_isotope_query(input: &str) -> Option<(String, u32)> {
    let input = input.trim();
    let split = input.find(|c: char| c.is_ascii_digit())?;
    let symbol = input[..split].trim().trim_end_matches('-').trim();
    let mass_number = input[split..].trim().parse().ok()?;
    if symbol.is_empty() {
        return None;
    }
    Some((symbol.to_string(), mass_number))
}

pub fn isotope_answer(table: &PeriodicTable, input: &str) -> String {
    let Some((symbol, mass_number)) = parse_isotope_query(input) else {
        return "Please enter an element symbol and a mass number, e.g. C 14.".to_string();
    };
    let answer = match table.isotope(&symbol, mass_number) {
        Ok(isotope) => format!(
            "Isotopic Notation: {}\nElement: {} ({})\nAtomic Number (Protons): {}\nNeutrons: {}",
            isotope.notation(),
            isotope.name,
            isotope.symbol,
            isotope.protons,
            isotope.neutrons
        ),
        Err(e) => format!("Error: {}", e),
    };
    log_event(
        "Isotopic Notation",
        &format!("Element={}, Mass Number={}", symbol, mass_number),
        &answer.replace('\n', "; "),
    );
    answer
}

pub fn element_answer(table: &PeriodicTable, symbol: &str) -> String {
    let symbol = normalize_symbol(symbol);
    match table.get(&symbol) {
        Some(element) => format!(
            "{} ({})\nAtomic Number: {}\nAtomic Mass: {} g/mol",
            element.name, element.symbol, element.number, element.atomic_mass
        ),
        None => format!("Element symbol '{}' not found", symbol),
    }
}

/// Phase of an element at a temperature typed with its unit ("25", "77F", "300K"), at 1 atm
pub fn phase_answer(table: &PeriodicTable, symbol: &str, temperature: &str) -> String {
    let symbol = normalize_symbol(symbol);
    let temperature = match parse_temperature(temperature) {
        Ok(temperature) => temperature,
        Err(e) => return format!("Enter a valid temperature. ({})", e),
    };
    let answer = match table.phase_at(&symbol, temperature.to_kelvin()) {
        Ok(prediction) => format!(
            "Melting point: {:.2} K\nBoiling point: {:.2} K\nPredicted phase at {} and 1 atm: {}",
            prediction.melt, prediction.boil, temperature, prediction.phase
        ),
        Err(e) => format!("Error: {}", e),
    };
    log_event(
        "Phase Predictor",
        &format!("{}, {}", symbol, temperature),
        &answer.replace('\n', "; "),
    );
    answer
}

/// Electron shell occupation, one line per shell
pub fn shells_answer(table: &PeriodicTable, symbol: &str) -> String {
    let symbol = normalize_symbol(symbol);
    let answer = match table.shells(&symbol) {
        Ok(shells) => {
            let mut lines = vec![format!(
                "Shells of {}: {}",
                symbol,
                shells
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            )];
            for (i, &electrons) in shells.iter().enumerate() {
                lines.push(format!("n={} {}", i + 1, "o".repeat(electrons as usize)));
            }
            lines.join("\n")
        }
        Err(e) => format!("Error: {}", e),
    };
    log_event("Shell Configuration", &symbol, answer.lines().next().unwrap_or(""));
    answer
}

pub fn isotope_menu(table: &PeriodicTable) {
    println!("\n=== Isotopic Notation ===");
    println!("Enter an element symbol and a mass number (C 14), an empty line returns to the main menu.");
    loop {
        prompt("Isotope: ");
        let Some(input) = get_user_input() else { break };
        if input.trim().is_empty() {
            break;
        }
        println!("{}", isotope_answer(table, &input));
    }
}

pub fn element_menu(table: &PeriodicTable) {
    println!("\n=== Element Lookup ({} elements) ===", table.len());
    loop {
        prompt("Element symbol (empty line to return): ");
        let Some(input) = get_user_input() else { break };
        if input.trim().is_empty() {
            break;
        }
        println!("{}", element_answer(table, &input));
    }
}

pub fn phase_menu(table: &PeriodicTable) {
    println!("\n=== Phase Predictor ===");
    println!("Temperature in °C, °F or K, e.g. 25, 77F, 300K. An empty symbol returns to the main menu.");
    loop {
        prompt("Element symbol: ");
        let Some(symbol) = get_user_input() else { break };
        if symbol.trim().is_empty() {
            break;
        }
        prompt("Temperature [25]: ");
        let Some(temperature) = get_user_input() else { break };
        let temperature = match temperature.trim() {
            "" => "25",
            text => text,
        };
        println!("{}", phase_answer(table, &symbol, temperature));
    }
}

pub fn shells_menu(table: &PeriodicTable) {
    println!("\n=== Shell Configuration ===");
    loop {
        prompt("Element symbol (empty line to return): ");
        let Some(input) = get_user_input() else { break };
        if input.trim().is_empty() {
            break;
        }
        println!("{}", shells_answer(table, &input));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_isotope_query() {
        assert_eq!(parse_isotope_query("C 14"), Some(("C".to_string(), 14)));
        assert_eq!(parse_isotope_query("U-235"), Some(("U".to_string(), 235)));
        assert_eq!(parse_isotope_query("fe56"), Some(("fe".to_string(), 56)));
        assert_eq!(parse_isotope_query("14"), None);
        assert_eq!(parse_isotope_query("C"), None);
        assert_eq!(parse_isotope_query("C 1x"), None);
    }

    #[test]
    fn test_isotope_answer() {
        let table = PeriodicTable::builtin();
        assert_eq!(
            isotope_answer(&table, "C 14"),
            "Isotopic Notation: 14C\nElement: Carbon (C)\nAtomic Number (Protons): 6\nNeutrons: 8"
        );
        assert!(isotope_answer(&table, "C 3").starts_with("Error: "));
        assert!(isotope_answer(&table, "Qq 3").starts_with("Error: "));
        assert!(isotope_answer(&table, "carbon").starts_with("Please enter"));
    }

    #[test]
    fn test_element_answer() {
        let table = PeriodicTable::builtin();
        let answer = element_answer(&table, "fe\n");
        assert!(answer.starts_with("Iron (Fe)\nAtomic Number: 26"));
        assert_eq!(element_answer(&table, "Xx"), "Element symbol 'Xx' not found");
    }

    #[test]
    fn test_phase_answer() {
        let table = PeriodicTable::builtin();
        assert_eq!(
            phase_answer(&table, "hg", "25"),
            "Melting point: 234.32 K\nBoiling point: 629.88 K\nPredicted phase at 25.0 °C and 1 atm: Liquid"
        );
        assert!(phase_answer(&table, "Fe", "77F").ends_with("Solid"));
        assert!(phase_answer(&table, "Fe", "4000 K").ends_with("Gas"));
        assert!(phase_answer(&table, "N", "-200").ends_with("Liquid"));
        assert!(phase_answer(&table, "Fe", "hot").starts_with("Enter a valid temperature."));
        assert_eq!(
            phase_answer(&table, "C", "25"),
            "Error: No melting or boiling point data available for C"
        );
        assert!(phase_answer(&table, "Fe", "-300").starts_with("Error: Temperature"));
    }

    #[test]
    fn test_shells_answer() {
        let table = PeriodicTable::builtin();
        assert_eq!(shells_answer(&table, "na"), "Shells of Na: 2, 8, 1\nn=1 oo\nn=2 oooooooo\nn=3 o");
        assert_eq!(shells_answer(&table, "Og"), "Error: No shell data for element 'Og'");
    }
}
