/// eng
/// Parsing of chemical formulae into element counts. Supports nested groups in round brackets
/// and hydrates (CuSO4·5H2O). Element symbols are checked only for their shape (uppercase letter
/// plus optional lowercase letter), whether such an element exists is decided by the mass lookup.
/// # Examples
/// ```
/// use science_hub::Chemistry::formula_parser::{parse_hydrate_formula, canonical_formula};
/// let counts = parse_hydrate_formula("CuSO4·5H2O").unwrap();
/// assert_eq!(counts["O"], 9);
/// assert_eq!(counts["H"], 10);
/// assert_eq!(canonical_formula(&counts), "CuH10O9S");
/// ```
pub mod formula_parser;
/// eng
/// Molar mass of a formula with per-element subtotals, mass fractions and a text/table report.
/// Symbols missing from the mass table are reported, not raised.
/// # Examples
/// ```
/// use science_hub::Chemistry::molmass::MolarMassCalculator;
/// let calculator = MolarMassCalculator::default();
/// let report = calculator.calculate("Fe2(SO4)3").unwrap();
/// assert!((report.total - 399.858).abs() < 1e-3);
/// assert!(report.unknown.is_empty());
/// ```
pub mod molmass;
/// element data: built-in periodic table or PeriodicTableJSON file, isotope composition,
/// phase at a temperature, electron shells
pub mod periodic_table;
/// temperatures with °C, °F or K units, for phase prediction
pub mod temperature;
/// balancing of reaction equations with exact integer arithmetic
pub mod reaction_balancer;
