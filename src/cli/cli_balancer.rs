use super::cli_main::{get_user_input, prompt};
use crate::Chemistry::reaction_balancer::{
    BalanceError, balance_all, element_composition_matrix, parse_reaction,
};
use prettytable::{Cell, Row, Table};

/// One output line per reaction in `text`
pub fn balancer_answer(text: &str) -> Vec<String> {
    balance_all(text)
        .into_iter()
        .map(|(line, result)| match result {
            Ok(balanced) => balanced.to_string(),
            Err(e) => format!("Error balancing '{}': {}", line, e),
        })
        .collect()
}

/// species × element table of atom counts
pub fn composition_table(species: &[&str]) -> Result<Table, BalanceError> {
    let (matrix, elements) = element_composition_matrix(species)?;
    let mut table = Table::new();
    let mut header = vec![Cell::new("Species")];
    header.extend(elements.iter().map(|element| Cell::new(element)));
    table.add_row(Row::new(header));
    for (i, name) in species.iter().enumerate() {
        let mut row = vec![Cell::new(name)];
        row.extend((0..elements.len()).map(|j| Cell::new(&matrix[(i, j)].to_string())));
        table.add_row(Row::new(row));
    }
    Ok(table)
}

pub fn balancer_menu() {
    println!("\n=== Reaction Balancer ===");
    println!("Enter reactions like H2 + O2 -> H2O, one per line.");
    println!("An empty line balances everything entered so far.");
    let mut lines = Vec::new();
    loop {
        prompt("Reaction: ");
        let Some(input) = get_user_input() else { break };
        if input.trim().is_empty() {
            break;
        }
        lines.push(input.trim().to_string());
    }
    if lines.is_empty() {
        return;
    }
    let text = lines.join("\n");
    for answer in balancer_answer(&text) {
        println!("{}", answer);
    }
    // composition of the last reaction
    if let Some(last) = lines.last() {
        if let Ok((reactants, products)) = parse_reaction(last) {
            let species: Vec<&str> = reactants
                .iter()
                .chain(products.iter())
                .map(String::as_str)
                .collect();
            if let Ok(table) = composition_table(&species) {
                table.printstd();
            }
        }
    }
}
