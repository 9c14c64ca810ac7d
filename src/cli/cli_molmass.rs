use super::cli_main::{get_user_input, prompt};
use crate::Chemistry::formula_parser::{FormulaError, hill_formula};
use crate::Chemistry::molmass::{MassReport, MolarMassCalculator};

/// What the molecular weight calculator shows for one formula
#[derive(Debug, Clone)]
pub struct MolarMassAnswer {
    pub text: String,
    /// `None` when the formula did not parse
    pub report: Option<MassReport>,
}

/// Calculates once; the text and the breakdown table both come from the same report
pub fn molar_mass_answer(calculator: &MolarMassCalculator, formula: &str) -> MolarMassAnswer {
    match calculator.evaluate(formula) {
        Ok((counts, report)) => {
            let mut text = calculator.report_text(&report);
            text.push_str(&format!("\nHill formula: {}", hill_formula(&counts)));
            MolarMassAnswer {
                text,
                report: Some(report),
            }
        }
        Err(e) => {
            let text = match e {
                FormulaError::Empty => "Please enter a molecular formula.".to_string(),
                e => format!("Error parsing formula: {}", e),
            };
            MolarMassAnswer { text, report: None }
        }
    }
}

pub fn molar_mass_menu(calculator: &MolarMassCalculator) {
    println!("\n=== Molecular Weight Calculator ===");
    println!("Enter formulas like H2O, Fe2(SO4)3 or CuSO4·5H2O, an empty line returns to the main menu.");
    loop {
        prompt("Formula: ");
        let Some(input) = get_user_input() else { break };
        let formula = input.trim();
        if formula.is_empty() {
            break;
        }
        let answer = molar_mass_answer(calculator, formula);
        println!("{}", answer.text);
        if let Some(report) = &answer.report {
            calculator.report_table(report).printstd();
        }
    }
}
