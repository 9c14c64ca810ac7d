//! # Formula parser
//!
//! Turns a chemical formula typed by a user into a map `element symbol -> number of atoms`.
//!
//! Supported notation:
//! - element symbols: one uppercase letter optionally followed by one lowercase letter (`O`, `Fe`)
//! - counts written as a suffix of a symbol or of a closing bracket (`H2`, `(SO4)3`)
//! - nested groups in round brackets (`Ca3(PO4)2`, `K4(Fe(CN)6)`)
//! - hydrates, parts separated by the middle dot `·` (or `*`), each part optionally
//!   prefixed by a multiplier (`CuSO4·5H2O`)
//!
//! Parsing is done in two steps: [`tokenize`] scans the string left to right and
//! [`parse_formula`] reduces the tokens with an explicit stack of frames, one frame per
//! open bracket, so deeply nested input cannot exhaust the call stack.
//!
//! Any malformed input is rejected as a whole, no partial counts are ever returned.
use regex::Regex;
use std::collections::HashMap;
use std::iter::Peekable;
use std::sync::LazyLock;
use thiserror::Error;

/// element symbol -> number of atoms
pub type ElementCounts = HashMap<String, usize>;

/// separator between the parts of a hydrate formula, e.g. CuSO4·5H2O
pub const HYDRATE_SEPARATOR: char = '·';
/// ASCII stand-in for [`HYDRATE_SEPARATOR`]
pub const HYDRATE_SEPARATOR_ASCII: char = '*';

// leading multiplier of a hydrate part: "5H2O" -> ("5", "H2O")
static HYDRATE_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^([0-9]+)(.*)$").expect("hydrate part pattern is valid"));

/// Errors of formula parsing. Positions are character offsets in the parsed string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    #[error("Formula is empty")]
    Empty,
    #[error("Invalid element symbol at: {fragment} (position {position})")]
    Syntax { fragment: String, position: usize },
    #[error("Mismatched parentheses in formula (position {position})")]
    UnbalancedParentheses { position: usize },
    #[error("Count must be a positive integer (position {position})")]
    ZeroCount { position: usize },
    #[error("Empty group '()' in formula (position {position})")]
    EmptyGroup { position: usize },
    #[error("Number of atoms is too large")]
    CountOverflow,
    #[error("Part {part} of the hydrate formula contains no formula")]
    EmptyHydratePart { part: usize },
}

impl FormulaError {
    /// moves the reported position by `offset` characters; used when a sub-formula
    /// is parsed out of a longer hydrate formula
    fn shifted(self, offset: usize) -> Self {
        match self {
            FormulaError::Syntax { fragment, position } => FormulaError::Syntax {
                fragment,
                position: position + offset,
            },
            FormulaError::UnbalancedParentheses { position } => {
                FormulaError::UnbalancedParentheses {
                    position: position + offset,
                }
            }
            FormulaError::ZeroCount { position } => FormulaError::ZeroCount {
                position: position + offset,
            },
            FormulaError::EmptyGroup { position } => FormulaError::EmptyGroup {
                position: position + offset,
            },
            other => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Element(String),
    Number(usize),
    OpenParen,
    CloseParen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// character offset of the first character of the token
    pub position: usize,
}

fn syntax_error(chars: &[char], position: usize) -> FormulaError {
    FormulaError::Syntax {
        fragment: chars[position..].iter().collect(),
        position,
    }
}

/// Splits a formula into element symbols, numbers and brackets.
///
/// Two-letter symbols are matched greedily: `Co` is cobalt, `CO` is carbon and oxygen.
/// A lowercase letter that does not follow an uppercase one, whitespace and any other
/// character are rejected.
pub fn tokenize(formula: &str) -> Result<Vec<Token>, FormulaError> {
    let chars: Vec<char> = formula.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let start = i;
        let kind = match chars[i] {
            '(' => {
                i += 1;
                TokenKind::OpenParen
            }
            ')' => {
                i += 1;
                TokenKind::CloseParen
            }
            c if c.is_ascii_uppercase() => {
                let mut symbol = c.to_string();
                i += 1;
                if let Some(&next) = chars.get(i) {
                    if next.is_ascii_lowercase() {
                        symbol.push(next);
                        i += 1;
                    }
                }
                TokenKind::Element(symbol)
            }
            c if c.is_ascii_digit() => {
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let digits: String = chars[start..i].iter().collect();
                let value = digits
                    .parse::<usize>()
                    .map_err(|_| FormulaError::CountOverflow)?;
                TokenKind::Number(value)
            }
            _ => return Err(syntax_error(&chars, i)),
        };
        tokens.push(Token {
            kind,
            position: start,
        });
    }
    Ok(tokens)
}

/// Adds `source * multiplier` to `target`, summing counts of symbols present in both.
pub fn merge_counts(
    target: &mut ElementCounts,
    source: &ElementCounts,
    multiplier: usize,
) -> Result<(), FormulaError> {
    for (symbol, count) in source {
        let added = count
            .checked_mul(multiplier)
            .ok_or(FormulaError::CountOverflow)?;
        let entry = target.entry(symbol.clone()).or_insert(0);
        *entry = entry
            .checked_add(added)
            .ok_or(FormulaError::CountOverflow)?;
    }
    Ok(())
}

// a bracket level being filled
struct Frame {
    counts: ElementCounts,
    opened_at: usize,
}

// count suffix after a symbol or a closing bracket, 1 when absent
fn take_count<I>(tokens: &mut Peekable<I>) -> Result<usize, FormulaError>
where
    I: Iterator<Item = Token>,
{
    match tokens.next_if(|token| matches!(token.kind, TokenKind::Number(_))) {
        Some(Token {
            kind: TokenKind::Number(0),
            position,
        }) => Err(FormulaError::ZeroCount { position }),
        Some(Token {
            kind: TokenKind::Number(n),
            ..
        }) => Ok(n),
        _ => Ok(1),
    }
}

/// Parses a formula (without hydrate parts) into element counts.
///
/// ```
/// use science_hub::Chemistry::formula_parser::parse_formula;
/// let counts = parse_formula("Fe2(SO4)3").unwrap();
/// assert_eq!(counts["Fe"], 2);
/// assert_eq!(counts["S"], 3);
/// assert_eq!(counts["O"], 12);
/// ```
pub fn parse_formula(formula: &str) -> Result<ElementCounts, FormulaError> {
    if formula.is_empty() {
        return Err(FormulaError::Empty);
    }
    let chars: Vec<char> = formula.chars().collect();
    let mut tokens = tokenize(formula)?.into_iter().peekable();
    let mut stack = vec![Frame {
        counts: ElementCounts::new(),
        opened_at: 0,
    }];

    while let Some(token) = tokens.next() {
        match token.kind {
            TokenKind::OpenParen => stack.push(Frame {
                counts: ElementCounts::new(),
                opened_at: token.position,
            }),
            TokenKind::CloseParen => {
                let group = match stack.pop() {
                    Some(frame) if !stack.is_empty() => frame,
                    _ => {
                        return Err(FormulaError::UnbalancedParentheses {
                            position: token.position,
                        });
                    }
                };
                if group.counts.is_empty() {
                    return Err(FormulaError::EmptyGroup {
                        position: group.opened_at,
                    });
                }
                let multiplier = take_count(&mut tokens)?;
                let Some(top) = stack.last_mut() else {
                    return Err(FormulaError::UnbalancedParentheses {
                        position: token.position,
                    });
                };
                merge_counts(&mut top.counts, &group.counts, multiplier)?;
            }
            TokenKind::Element(symbol) => {
                let count = take_count(&mut tokens)?;
                let Some(top) = stack.last_mut() else {
                    return Err(FormulaError::UnbalancedParentheses {
                        position: token.position,
                    });
                };
                let entry = top.counts.entry(symbol).or_insert(0);
                *entry = entry
                    .checked_add(count)
                    .ok_or(FormulaError::CountOverflow)?;
            }
            // a number that is not the suffix of a symbol or of a group
            TokenKind::Number(_) => return Err(syntax_error(&chars, token.position)),
        }
    }

    if stack.len() != 1 {
        let position = stack.last().map(|frame| frame.opened_at).unwrap_or(0);
        return Err(FormulaError::UnbalancedParentheses { position });
    }
    Ok(stack.pop().map(|frame| frame.counts).unwrap_or_default())
}

fn is_hydrate_separator(c: char) -> bool {
    c == HYDRATE_SEPARATOR || c == HYDRATE_SEPARATOR_ASCII
}

/// Parses a formula that may consist of several parts separated by `·` (or `*`),
/// each part optionally starting with a multiplier: `CuSO4·5H2O`, `Na2CO3*10H2O`.
///
/// A formula without separators gives the same result as [`parse_formula`].
pub fn parse_hydrate_formula(formula: &str) -> Result<ElementCounts, FormulaError> {
    if formula.is_empty() {
        return Err(FormulaError::Empty);
    }
    let mut total = ElementCounts::new();
    let mut offset = 0;
    for (index, part) in formula.split(is_hydrate_separator).enumerate() {
        let (multiplier, subformula, prefix_len) = match HYDRATE_PART.captures(part) {
            Some(caps) => {
                let digits = caps.get(1).map_or("", |m| m.as_str());
                let rest = caps.get(2).map_or("", |m| m.as_str());
                let multiplier = digits
                    .parse::<usize>()
                    .map_err(|_| FormulaError::CountOverflow)?;
                if multiplier == 0 {
                    return Err(FormulaError::ZeroCount { position: offset });
                }
                (multiplier, rest, digits.chars().count())
            }
            None => (1, part, 0),
        };
        if subformula.is_empty() {
            return Err(FormulaError::EmptyHydratePart { part: index });
        }
        let counts =
            parse_formula(subformula).map_err(|e| e.shifted(offset + prefix_len))?;
        merge_counts(&mut total, &counts, multiplier)?;
        // one character for the separator
        offset += part.chars().count() + 1;
    }
    Ok(total)
}

fn push_term(formula: &mut String, symbol: &str, count: usize) {
    formula.push_str(symbol);
    if count > 1 {
        formula.push_str(&count.to_string());
    }
}

/// Canonical form of element counts: symbols in alphabetical order, count written only
/// when greater than 1. Parsing the result gives back the same counts.
pub fn canonical_formula(counts: &ElementCounts) -> String {
    let mut symbols: Vec<&String> = counts.keys().collect();
    symbols.sort();
    let mut formula = String::new();
    for symbol in symbols {
        push_term(&mut formula, symbol, counts[symbol]);
    }
    formula
}

/// Hill notation: carbon first, hydrogen second, then the rest alphabetically.
/// Without carbon every symbol, hydrogen included, is alphabetical.
pub fn hill_formula(counts: &ElementCounts) -> String {
    let mut symbols: Vec<&String> = counts.keys().collect();
    symbols.sort();
    let mut formula = String::new();
    if let Some(&carbon) = counts.get("C") {
        push_term(&mut formula, "C", carbon);
        if let Some(&hydrogen) = counts.get("H") {
            push_term(&mut formula, "H", hydrogen);
        }
        symbols.retain(|s| s.as_str() != "C" && s.as_str() != "H");
    }
    for symbol in symbols {
        push_term(&mut formula, symbol, counts[symbol]);
    }
    formula
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(formula: &str) -> Vec<TokenKind> {
        tokenize(formula)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_prefers_two_letter_symbols() {
        assert_eq!(
            kinds("NaCl"),
            vec![
                TokenKind::Element("Na".to_string()),
                TokenKind::Element("Cl".to_string())
            ]
        );
        assert_eq!(
            kinds("CO"),
            vec![
                TokenKind::Element("C".to_string()),
                TokenKind::Element("O".to_string())
            ]
        );
    }

    #[test]
    fn test_tokenize_numbers_and_brackets() {
        let tokens = tokenize("Mg(OH)12").unwrap();
        assert_eq!(tokens.len(), 6);
        assert_eq!(tokens[1].kind, TokenKind::OpenParen);
        assert_eq!(tokens[4].kind, TokenKind::CloseParen);
        assert_eq!(tokens[5].kind, TokenKind::Number(12));
        assert_eq!(tokens[5].position, 6);
    }

    #[test]
    fn test_tokenize_rejects_foreign_characters() {
        assert_eq!(
            tokenize("H2 O"),
            Err(FormulaError::Syntax {
                fragment: " O".to_string(),
                position: 2
            })
        );
        assert!(matches!(
            tokenize("CuSO4·5H2O"),
            Err(FormulaError::Syntax { position: 5, .. })
        ));
    }

    #[test]
    fn test_tokenize_huge_number_overflows() {
        assert_eq!(
            tokenize("H99999999999999999999999999"),
            Err(FormulaError::CountOverflow)
        );
    }

    #[test]
    fn test_merge_counts() {
        let mut target = ElementCounts::from([("H".to_string(), 1)]);
        let source = ElementCounts::from([("H".to_string(), 2), ("O".to_string(), 1)]);
        merge_counts(&mut target, &source, 3).unwrap();
        assert_eq!(target["H"], 7);
        assert_eq!(target["O"], 3);
    }

    #[test]
    fn test_merge_counts_overflow() {
        let mut target = ElementCounts::new();
        let source = ElementCounts::from([("H".to_string(), usize::MAX)]);
        assert_eq!(
            merge_counts(&mut target, &source, 2),
            Err(FormulaError::CountOverflow)
        );
    }

    #[test]
    fn test_error_positions_are_shifted_in_hydrates() {
        assert_eq!(
            parse_hydrate_formula("CuSO4·5H2O)"),
            Err(FormulaError::UnbalancedParentheses { position: 10 })
        );
    }
}
