//! # Reaction balancer
//!
//! Balances equations like `C3H8 + O2 -> CO2 + H2O`.
//!
//! Every species is parsed into element counts and an element × species matrix is built,
//! product columns negated. The coefficients are the integer vector spanning the null
//! space of that matrix. The null space is found exactly with fraction-free Gaussian
//! elimination over integers, so no rounding of floating point pivots is involved.
//! A reaction is accepted only when the null space is one-dimensional and the vector
//! has all coefficients of the same sign.
use crate::Chemistry::formula_parser::{
    ElementCounts, FormulaError, HYDRATE_SEPARATOR, HYDRATE_SEPARATOR_ASCII, parse_formula,
    parse_hydrate_formula,
};
use crate::Utils::logger::log_event;
use log::info;
use nalgebra::DMatrix;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static ARROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"->|→|=").expect("arrow pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    #[error("Reaction must have exactly one '->' or '='")]
    Arrow,
    #[error("Reaction has no {0}")]
    EmptySide(&'static str),
    #[error("Invalid formula '{species}': {source}")]
    Formula {
        species: String,
        #[source]
        source: FormulaError,
    },
    #[error("No solution found")]
    NoSolution,
    #[error("Reaction has {dimension} independent solutions, coefficients are not unique")]
    Ambiguous { dimension: usize },
    #[error("Reaction cannot be balanced with positive coefficients")]
    NotPositive,
    #[error("Coefficients are too large")]
    Overflow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalancedReaction {
    pub reactants: Vec<String>,
    pub products: Vec<String>,
    /// reactants first, then products
    pub coefficients: Vec<u64>,
}

impl BalancedReaction {
    pub fn reactant_coefficients(&self) -> &[u64] {
        &self.coefficients[..self.reactants.len()]
    }

    pub fn product_coefficients(&self) -> &[u64] {
        &self.coefficients[self.reactants.len()..]
    }
}

fn format_side(species: &[String], coefficients: &[u64]) -> String {
    species
        .iter()
        .zip(coefficients)
        .map(|(s, &c)| if c == 1 { s.clone() } else { format!("{} {}", c, s) })
        .collect::<Vec<_>>()
        .join(" + ")
}

impl fmt::Display for BalancedReaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            format_side(&self.reactants, self.reactant_coefficients()),
            format_side(&self.products, self.product_coefficients())
        )
    }
}

/// Splits an equation into reactants and products. Blank species are dropped.
pub fn parse_reaction(reaction: &str) -> Result<(Vec<String>, Vec<String>), BalanceError> {
    let sides: Vec<&str> = ARROW.split(reaction).collect();
    if sides.len() != 2 {
        return Err(BalanceError::Arrow);
    }
    let split_side = |side: &str| -> Vec<String> {
        side.split('+')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    };
    let reactants = split_side(sides[0]);
    let products = split_side(sides[1]);
    if reactants.is_empty() {
        return Err(BalanceError::EmptySide("reactants"));
    }
    if products.is_empty() {
        return Err(BalanceError::EmptySide("products"));
    }
    Ok((reactants, products))
}

// hydrate notation only when a separator is present, so that a leading
// stoichiometric coefficient like "2H2" is rejected instead of read as H4
fn species_counts(species: &str) -> Result<ElementCounts, BalanceError> {
    let parsed = if species.contains([HYDRATE_SEPARATOR, HYDRATE_SEPARATOR_ASCII]) {
        parse_hydrate_formula(species)
    } else {
        parse_formula(species)
    };
    parsed.map_err(|source| BalanceError::Formula {
        species: species.to_string(),
        source,
    })
}

fn compositions(species: &[&str]) -> Result<(Vec<ElementCounts>, Vec<String>), BalanceError> {
    let parsed = species
        .iter()
        .map(|s| species_counts(s))
        .collect::<Result<Vec<_>, _>>()?;
    let elements: BTreeSet<String> = parsed.iter().flat_map(|c| c.keys().cloned()).collect();
    Ok((parsed, elements.into_iter().collect()))
}

/// Element composition matrix: one row per species, one column per element
/// (sorted symbols, returned alongside).
pub fn element_composition_matrix(
    species: &[&str],
) -> Result<(DMatrix<f64>, Vec<String>), BalanceError> {
    let (parsed, elements) = compositions(species)?;
    let matrix = DMatrix::from_fn(parsed.len(), elements.len(), |i, j| {
        parsed[i].get(&elements[j]).copied().unwrap_or(0) as f64
    });
    Ok((matrix, elements))
}

// element × species, product columns negated
fn stoichiometric_matrix(
    reactants: &[String],
    products: &[String],
) -> Result<DMatrix<i128>, BalanceError> {
    let species: Vec<&str> = reactants
        .iter()
        .chain(products.iter())
        .map(String::as_str)
        .collect();
    let (parsed, elements) = compositions(&species)?;
    let n_reactants = reactants.len();
    Ok(DMatrix::from_fn(elements.len(), species.len(), |i, j| {
        let count = parsed[j].get(&elements[i]).copied().unwrap_or(0) as i128;
        if j < n_reactants { count } else { -count }
    }))
}

fn gcd(mut a: i128, mut b: i128) -> i128 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn lcm(a: i128, b: i128) -> Result<i128, BalanceError> {
    if a == 0 || b == 0 {
        return Ok(0);
    }
    (a / gcd(a, b))
        .checked_mul(b)
        .map(i128::abs)
        .ok_or(BalanceError::Overflow)
}

fn reduce_row(m: &mut DMatrix<i128>, row: usize) {
    let divisor = m.row(row).iter().fold(0, |g, &v| gcd(g, v));
    if divisor > 1 {
        for v in m.row_mut(row).iter_mut() {
            *v /= divisor;
        }
    }
}

/// Smallest integer vector spanning the null space of `m`, when that space is a line.
fn integer_null_vector(mut m: DMatrix<i128>) -> Result<Vec<i128>, BalanceError> {
    let (rows, cols) = m.shape();
    // (row, column) of every pivot
    let mut pivots: Vec<(usize, usize)> = Vec::new();
    let mut row = 0;
    for col in 0..cols {
        if row == rows {
            break;
        }
        let Some(pivot) = (row..rows).find(|&r| m[(r, col)] != 0) else {
            continue;
        };
        m.swap_rows(row, pivot);
        reduce_row(&mut m, row);
        let a = m[(row, col)];
        for r in 0..rows {
            let b = m[(r, col)];
            if r == row || b == 0 {
                continue;
            }
            for c in 0..cols {
                let scaled = m[(r, c)].checked_mul(a).ok_or(BalanceError::Overflow)?;
                let sub = m[(row, c)].checked_mul(b).ok_or(BalanceError::Overflow)?;
                m[(r, c)] = scaled.checked_sub(sub).ok_or(BalanceError::Overflow)?;
            }
            reduce_row(&mut m, r);
        }
        pivots.push((row, col));
        row += 1;
    }

    let free: Vec<usize> = (0..cols)
        .filter(|c| !pivots.iter().any(|&(_, pc)| pc == *c))
        .collect();
    let free_col = match free.as_slice() {
        [] => return Err(BalanceError::NoSolution),
        [single] => *single,
        many => {
            return Err(BalanceError::Ambiguous {
                dimension: many.len(),
            });
        }
    };

    // x_free = lcm of pivots keeps every pivot variable integral
    let mut scale = 1;
    for &(r, c) in &pivots {
        scale = lcm(scale, m[(r, c)])?;
    }
    let mut x = vec![0i128; cols];
    x[free_col] = scale;
    for &(r, c) in &pivots {
        let numerator = m[(r, free_col)]
            .checked_mul(scale)
            .ok_or(BalanceError::Overflow)?;
        x[c] = -numerator / m[(r, c)];
    }

    let divisor = x.iter().fold(0, |g, &v| gcd(g, v));
    if divisor > 1 {
        x.iter_mut().for_each(|v| *v /= divisor);
    }
    if x.iter().all(|&v| v < 0) {
        x.iter_mut().for_each(|v| *v = -*v);
    }
    if x.iter().any(|&v| v <= 0) {
        return Err(BalanceError::NotPositive);
    }
    Ok(x)
}

/// Balances one equation with the smallest positive integer coefficients.
///
/// ```
/// use science_hub::Chemistry::reaction_balancer::balance_reaction;
/// let balanced = balance_reaction("H2 + O2 -> H2O").unwrap();
/// assert_eq!(balanced.coefficients, vec![2, 1, 2]);
/// assert_eq!(balanced.to_string(), "2 H2 + O2 -> 2 H2O");
/// ```
pub fn balance_reaction(reaction: &str) -> Result<BalancedReaction, BalanceError> {
    let (reactants, products) = parse_reaction(reaction)?;
    let matrix = stoichiometric_matrix(&reactants, &products)?;
    info!(
        "balancing '{}': {} elements, {} species",
        reaction.trim(),
        matrix.nrows(),
        matrix.ncols()
    );
    let solution = integer_null_vector(matrix)?;
    let coefficients = solution
        .into_iter()
        .map(|v| u64::try_from(v).map_err(|_| BalanceError::Overflow))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(BalancedReaction {
        reactants,
        products,
        coefficients,
    })
}

/// Balances every non-blank line of `text`, one result per line
pub fn balance_all(text: &str) -> Vec<(String, Result<BalancedReaction, BalanceError>)> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let result = balance_reaction(line);
            match &result {
                Ok(balanced) => log_event("Reaction Balancer", line, &balanced.to_string()),
                Err(e) => log_event("Reaction Balancer", line, &format!("Error: {}", e)),
            }
            (line.to_string(), result)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coefficients(reaction: &str) -> Vec<u64> {
        balance_reaction(reaction).unwrap().coefficients
    }

    #[test]
    fn test_parse_reaction() {
        let (reactants, products) = parse_reaction("H2 + O2 -> H2O").unwrap();
        assert_eq!(reactants, vec!["H2", "O2"]);
        assert_eq!(products, vec!["H2O"]);
        let (reactants, products) = parse_reaction(" C3H8+O2 = CO2 + H2O + ").unwrap();
        assert_eq!(reactants, vec!["C3H8", "O2"]);
        assert_eq!(products, vec!["CO2", "H2O"]);
        assert_eq!(parse_reaction("H2 + O2"), Err(BalanceError::Arrow));
        assert_eq!(parse_reaction("A -> B -> C"), Err(BalanceError::Arrow));
        assert_eq!(
            parse_reaction(" -> H2O"),
            Err(BalanceError::EmptySide("reactants"))
        );
        assert_eq!(
            parse_reaction("H2 + O2 = "),
            Err(BalanceError::EmptySide("products"))
        );
    }

    #[test]
    fn test_balance_simple_reactions() {
        assert_eq!(coefficients("H2 + O2 -> H2O"), vec![2, 1, 2]);
        assert_eq!(coefficients("C3H8 + O2 = CO2 + H2O"), vec![1, 5, 3, 4]);
        assert_eq!(coefficients("Fe + O2 -> Fe2O3"), vec![4, 3, 2]);
        assert_eq!(coefficients("CH4 + O2 → CO2 + H2O"), vec![1, 2, 1, 2]);
    }

    #[test]
    fn test_balance_with_groups() {
        assert_eq!(
            coefficients("Ca(OH)2 + H3PO4 -> Ca3(PO4)2 + H2O"),
            vec![3, 2, 1, 6]
        );
        assert_eq!(
            coefficients("KMnO4 + HCl = KCl + MnCl2 + H2O + Cl2"),
            vec![2, 16, 2, 2, 8, 5]
        );
        assert_eq!(
            coefficients("CuSO4·5H2O -> CuSO4 + H2O"),
            vec![1, 1, 5]
        );
    }

    #[test]
    fn test_format_balanced() {
        let balanced = balance_reaction("C3H8 + O2 -> CO2 + H2O").unwrap();
        assert_eq!(balanced.to_string(), "C3H8 + 5 O2 -> 3 CO2 + 4 H2O");
        assert_eq!(balanced.reactant_coefficients(), &[1, 5]);
        assert_eq!(balanced.product_coefficients(), &[3, 4]);
    }

    #[test]
    fn test_balance_failures() {
        assert_eq!(balance_reaction("H2 -> O2"), Err(BalanceError::NoSolution));
        assert_eq!(
            balance_reaction("H2 + O2 -> H2O + H2O2"),
            Err(BalanceError::Ambiguous { dimension: 2 })
        );
        assert_eq!(
            balance_reaction("H2O + NaCl -> H2O"),
            Err(BalanceError::NotPositive)
        );
        assert!(matches!(
            balance_reaction("2H2 + O2 -> H2O"),
            Err(BalanceError::Formula { .. })
        ));
    }

    #[test]
    fn test_element_composition_matrix() {
        let (matrix, elements) = element_composition_matrix(&["H2O", "NaCl", "C3H8", "CH4"]).unwrap();
        assert_eq!(elements, vec!["C", "Cl", "H", "Na", "O"]);
        assert_eq!(matrix.nrows(), 4);
        assert_eq!(matrix.ncols(), 5);
        assert_eq!(matrix[(0, 2)], 2.0);
        assert_eq!(matrix[(2, 0)], 3.0);
        assert_eq!(matrix[(1, 4)], 0.0);
    }

    #[test]
    fn test_balance_all() {
        let results = balance_all("H2 + O2 -> H2O\n\n  \nNa + Cl2 = NaCl\nbad line");
        assert_eq!(results.len(), 3);
        assert_eq!(
            results[1].1.as_ref().unwrap().to_string(),
            "2 Na + Cl2 -> 2 NaCl"
        );
        assert_eq!(results[2].0, "bad line");
        assert!(results[2].1.is_err());
    }

    #[test]
    fn test_gcd_lcm() {
        assert_eq!(gcd(12, -18), 6);
        assert_eq!(gcd(0, 5), 5);
        assert_eq!(lcm(4, 6), Ok(12));
        assert_eq!(lcm(-3, 5), Ok(15));
    }
}
