/// Module to calculate the molar mass of a chemical formula and its per-element breakdown
///
/// Unknown element symbols are not an error here: they are collected in
/// [`MassReport::unknown`] so that the recognised part of the formula can still be shown.
use crate::Chemistry::formula_parser::{ElementCounts, FormulaError, parse_hydrate_formula};
use crate::Chemistry::periodic_table::PeriodicTable;
use crate::Utils::logger::log_event;
use log::{info, warn};
use prettytable::{Cell, Row, Table};
use std::collections::{BTreeSet, HashMap};

/// one element of the breakdown: `count` atoms of `symbol` weigh `subtotal` g/mol
#[derive(Debug, Clone, PartialEq)]
pub struct MassLine {
    pub symbol: String,
    pub count: usize,
    pub subtotal: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MassReport {
    /// g/mol, sum of all subtotals
    pub total: f64,
    /// sorted by symbol
    pub breakdown: Vec<MassLine>,
    /// symbols missing from the mass table
    pub unknown: BTreeSet<String>,
}

impl MassReport {
    /// Mass fraction of every known element in percent, in breakdown order.
    /// Empty when the total mass is zero.
    pub fn mass_percent(&self) -> Vec<(String, f64)> {
        if self.total <= 0.0 {
            return Vec::new();
        }
        self.breakdown
            .iter()
            .map(|line| (line.symbol.clone(), 100.0 * line.subtotal / self.total))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.unknown.is_empty()
    }
}

/// Sums `count * atomic mass` over the elements of `counts`, in symbol order.
pub fn compute_mass(counts: &ElementCounts, mass_table: &HashMap<String, f64>) -> MassReport {
    let mut symbols: Vec<&String> = counts.keys().collect();
    symbols.sort();

    let mut report = MassReport::default();
    for symbol in symbols {
        let count = counts[symbol];
        match mass_table.get(symbol) {
            Some(&mass) => {
                let subtotal = count as f64 * mass;
                report.total += subtotal;
                report.breakdown.push(MassLine {
                    symbol: symbol.clone(),
                    count,
                    subtotal,
                });
            }
            None => {
                report.unknown.insert(symbol.clone());
            }
        }
    }
    report
}

// Function to calculate the molar mass of a vector of chemical formulas
pub fn calculate_molar_mass_of_vector_of_subs(
    vec_of_formulae: &[&str],
    mass_table: &HashMap<String, f64>,
) -> Result<Vec<f64>, FormulaError> {
    let mut molar_masses = Vec::with_capacity(vec_of_formulae.len());
    for formula in vec_of_formulae {
        let counts = parse_hydrate_formula(formula)?;
        let report = compute_mass(&counts, mass_table);
        if !report.is_complete() {
            warn!(
                "Unknown elements in '{}': {:?}, their mass is not counted",
                formula, report.unknown
            );
        }
        molar_masses.push(report.total);
    }
    Ok(molar_masses)
}

/// Molecular weight calculator: formula in, breakdown and total out.
#[derive(Debug, Clone)]
pub struct MolarMassCalculator {
    table: PeriodicTable,
    mass_table: HashMap<String, f64>,
    /// decimal places in the text report
    pub precision: usize,
}

impl MolarMassCalculator {
    pub fn new(table: PeriodicTable) -> Self {
        let mass_table = table.mass_table();
        Self {
            table,
            mass_table,
            precision: 4,
        }
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn table(&self) -> &PeriodicTable {
        &self.table
    }

    /// Parses the (possibly hydrate) formula and computes its molar mass.
    /// Surrounding whitespace is ignored; blank input is [`FormulaError::Empty`].
    pub fn calculate(&self, formula: &str) -> Result<MassReport, FormulaError> {
        self.evaluate(formula).map(|(_, report)| report)
    }

    /// Same as [`MolarMassCalculator::calculate`], also returning the parsed element counts.
    /// Every call is one event in the session log.
    pub fn evaluate(&self, formula: &str) -> Result<(ElementCounts, MassReport), FormulaError> {
        let formula = formula.trim();
        let counts = match parse_hydrate_formula(formula) {
            Ok(counts) => counts,
            Err(e) => {
                log_event(
                    "Molecular Weight Calculator",
                    &format!("Formula={}", formula),
                    &format!("Error: {}", e),
                );
                return Err(e);
            }
        };
        let report = compute_mass(&counts, &self.mass_table);
        info!(
            "{} parsed into {} elements, {} unknown",
            formula,
            counts.len(),
            report.unknown.len()
        );
        log_event(
            "Molecular Weight Calculator",
            &format!("Formula={}", formula),
            &format!("{:.*} g/mol", self.precision, report.total),
        );
        Ok((counts, report))
    }

    fn element_name(&self, symbol: &str) -> &str {
        self.table
            .get(symbol)
            .map(|e| e.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("Unknown")
    }

    /// Text shown to the user:
    /// ```text
    /// Fe (Iron) × 2 = 111.6900 g/mol
    /// ...
    ///
    /// Unknown elements: Xx
    ///
    /// Total Molecular Weight: 111.6900 g/mol
    /// ```
    pub fn report_text(&self, report: &MassReport) -> String {
        let precision = self.precision;
        let mut lines: Vec<String> = report
            .breakdown
            .iter()
            .map(|line| {
                format!(
                    "{} ({}) × {} = {:.*} g/mol",
                    line.symbol,
                    self.element_name(&line.symbol),
                    line.count,
                    precision,
                    line.subtotal
                )
            })
            .collect();
        if !report.unknown.is_empty() {
            let unknown: Vec<&str> = report.unknown.iter().map(String::as_str).collect();
            lines.push(format!("\nUnknown elements: {}", unknown.join(", ")));
        }
        lines.push(format!(
            "\nTotal Molecular Weight: {:.*} g/mol",
            precision, report.total
        ));
        lines.join("\n")
    }

    /// Same breakdown as a table with mass fractions
    pub fn report_table(&self, report: &MassReport) -> Table {
        let precision = self.precision;
        let percents = report.mass_percent();
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell::new("Element"),
            Cell::new("Name"),
            Cell::new("Atoms"),
            Cell::new("Mass, g/mol"),
            Cell::new("Mass, %"),
        ]));
        for (line, (_, percent)) in report.breakdown.iter().zip(percents.iter()) {
            table.add_row(Row::new(vec![
                Cell::new(&line.symbol),
                Cell::new(self.element_name(&line.symbol)),
                Cell::new(&line.count.to_string()),
                Cell::new(&format!("{:.*}", precision, line.subtotal)),
                Cell::new(&format!("{:.2}", percent)),
            ]));
        }
        for symbol in &report.unknown {
            table.add_row(Row::new(vec![
                Cell::new(symbol),
                Cell::new("Unknown"),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
            ]));
        }
        table.add_row(Row::new(vec![
            Cell::new("Total"),
            Cell::new(""),
            Cell::new(""),
            Cell::new(&format!("{:.*}", precision, report.total)),
            Cell::new(if report.total > 0.0 { "100.00" } else { "-" }),
        ]));
        table
    }
}

impl Default for MolarMassCalculator {
    fn default() -> Self {
        Self::new(PeriodicTable::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Chemistry::formula_parser::parse_formula;
    use crate::Chemistry::periodic_table::ElementData;
    use approx::assert_relative_eq;

    fn sample_masses() -> HashMap<String, f64> {
        HashMap::from([
            ("Fe".to_string(), 55.85),
            ("S".to_string(), 32.07),
            ("O".to_string(), 16.00),
        ])
    }

    #[test]
    fn test_compute_mass_reports_unknown_symbols() {
        let counts = ElementCounts::from([("Fe".to_string(), 2), ("Xx".to_string(), 1)]);
        let masses = HashMap::from([("Fe".to_string(), 55.85)]);
        let report = compute_mass(&counts, &masses);
        assert_relative_eq!(report.total, 111.70, epsilon = 1e-9);
        assert_eq!(report.unknown, BTreeSet::from(["Xx".to_string()]));
        assert_eq!(report.breakdown.len(), 1);
        assert_eq!(report.breakdown[0].symbol, "Fe");
        assert_eq!(report.breakdown[0].count, 2);
        assert_relative_eq!(report.breakdown[0].subtotal, 111.70, epsilon = 1e-9);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_compute_mass_of_nothing() {
        let report = compute_mass(&ElementCounts::new(), &sample_masses());
        assert_eq!(report.total, 0.0);
        assert!(report.breakdown.is_empty());
        assert!(report.unknown.is_empty());
        assert!(report.mass_percent().is_empty());
    }

    #[test]
    fn test_iron_sulfate_end_to_end() {
        let counts = parse_formula("Fe2(SO4)3").unwrap();
        let report = compute_mass(&counts, &sample_masses());
        let symbols: Vec<&str> = report.breakdown.iter().map(|l| l.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["Fe", "O", "S"]);
        assert_relative_eq!(report.breakdown[0].subtotal, 111.70, epsilon = 1e-9);
        assert_relative_eq!(report.breakdown[1].subtotal, 192.00, epsilon = 1e-9);
        assert_relative_eq!(report.breakdown[2].subtotal, 96.21, epsilon = 1e-9);
        assert_relative_eq!(report.total, 399.91, epsilon = 1e-9);
        let sum: f64 = report.breakdown.iter().map(|l| l.subtotal).sum();
        assert_relative_eq!(report.total, sum, epsilon = 1e-12);
    }

    #[test]
    fn test_mass_percent() {
        let counts = parse_formula("H2O").unwrap();
        let masses = HashMap::from([("H".to_string(), 1.0), ("O".to_string(), 16.0)]);
        let percents = compute_mass(&counts, &masses).mass_percent();
        assert_eq!(percents[0].0, "H");
        assert_relative_eq!(percents[0].1, 11.111111, epsilon = 1e-5);
        assert_relative_eq!(percents[1].1, 88.888888, epsilon = 1e-5);
    }

    #[test]
    fn test_calculate_molar_mass() {
        let calculator = MolarMassCalculator::default();
        let cases = [
            ("H2O", 18.015),
            ("NaCl", 58.44),
            ("C6H8O6", 176.12),
            ("Ca(NO3)2", 164.086),
            ("CuSO4·5H2O", 249.68),
            (" C6H12O6 ", 180.156),
        ];
        for (formula, expected) in cases {
            let report = calculator.calculate(formula).unwrap();
            assert_relative_eq!(report.total, expected, epsilon = 1e-2);
            assert!(report.is_complete());
        }
    }

    #[test]
    fn test_evaluate_returns_counts_with_report() {
        let calculator = MolarMassCalculator::default();
        let (counts, report) = calculator.evaluate(" CuSO4·5H2O ").unwrap();
        assert_eq!(counts["H"], 10);
        assert_eq!(counts["O"], 9);
        assert_eq!(report, calculator.calculate("CuSO4·5H2O").unwrap());
        assert_eq!(calculator.evaluate(""), Err(FormulaError::Empty));
    }

    #[test]
    fn test_calculate_rejects_malformed_formulas() {
        let calculator = MolarMassCalculator::default();
        assert_eq!(calculator.calculate("   "), Err(FormulaError::Empty));
        assert!(calculator.calculate("H2O)").is_err());
        assert!(calculator.calculate("h2o").is_err());
    }

    #[test]
    fn test_vector_of_substances() {
        let masses = PeriodicTable::builtin().mass_table();
        let result =
            calculate_molar_mass_of_vector_of_subs(&["H2O", "NaCl", "C6H8O6", "Ca(NO3)2"], &masses)
                .unwrap();
        let expected = [18.015, 58.44, 176.12, 164.086];
        for (calculated, expected) in result.iter().zip(expected.iter()) {
            assert_relative_eq!(*calculated, *expected, epsilon = 1e-2);
        }
        assert!(calculate_molar_mass_of_vector_of_subs(&["H2O", "(("], &masses).is_err());
    }

    #[test]
    fn test_report_text() {
        let table = PeriodicTable::from_elements(vec![ElementData {
            number: 26,
            symbol: "Fe".to_string(),
            name: "Iron".to_string(),
            atomic_mass: 55.85,
            ..Default::default()
        }])
        .unwrap();
        let calculator = MolarMassCalculator::new(table).with_precision(2);
        let report = calculator.calculate("Fe2Xx").unwrap();
        assert_eq!(
            calculator.report_text(&report),
            "Fe (Iron) × 2 = 111.70 g/mol\n\nUnknown elements: Xx\n\nTotal Molecular Weight: 111.70 g/mol"
        );
    }

    #[test]
    fn test_report_table() {
        let calculator = MolarMassCalculator::default();
        let report = calculator.calculate("H2O").unwrap();
        let table = calculator.report_table(&report);
        // header, H, O, total
        assert_eq!(table.len(), 4);
        let rendered = table.to_string();
        assert!(rendered.contains("Hydrogen"));
        assert!(rendered.contains("100.00"));
    }
}
