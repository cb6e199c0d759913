use crate::Formulae::elements::all_elements;
use crate::Formulae::molmass::EvaluationResult;
use crate::Formulae::molmass_errors::{ErrorReport, FormulaError};
use nalgebra::DMatrix;
use prettytable::{Cell, Row, Table, row};

/// table of the composition breakdown followed by the total molecular weight
pub fn composition_table(result: &EvaluationResult, decimal_places: usize) -> Table {
    let p = decimal_places;
    let mut table = Table::new();
    table.add_row(row![
        "Z",
        "Symbol",
        "Name",
        "Atomic weight",
        "Count",
        "Mass, g/mol",
        "Mass %"
    ]);
    for entry in &result.composition {
        table.add_row(row![
            entry.element.atomic_number,
            entry.element.symbol,
            entry.element.name,
            format!("{:.p$}", entry.element.atomic_weight),
            entry.count,
            format!("{:.p$}", entry.weight_contribution),
            format!("{:.p$}", entry.percent_composition)
        ]);
    }
    table.add_row(row![
        "",
        "Total",
        format!("{} elements", result.distinct_element_count),
        "",
        result.total_atoms(),
        format!("{:.p$}", result.molecular_weight),
        format!("{:.p$}", 100.0)
    ]);
    table
}

pub fn print_composition(formula: &str, result: &EvaluationResult, decimal_places: usize) {
    println!(
        "\n{}: molar mass {:.p$} g/mol",
        formula,
        result.molecular_weight,
        p = decimal_places
    );
    composition_table(result, decimal_places).printstd();
}

/// one row per element of the periodic table
pub fn element_table() -> Table {
    let mut table = Table::new();
    table.add_row(row!["Z", "Symbol", "Name", "Atomic weight"]);
    for element in all_elements() {
        table.add_row(row![
            element.atomic_number,
            element.symbol,
            element.name,
            element.atomic_weight
        ]);
    }
    table
}

/// element composition matrix with formulae as row titles
pub fn matrix_table(formulae: &[&str], matrix: &DMatrix<f64>, elements: &[String]) -> Table {
    let mut table = Table::new();
    let mut header = vec![Cell::new("Formula")];
    header.extend(elements.iter().map(|e| Cell::new(e)));
    table.add_row(Row::new(header));
    for (i, formula) in formulae.iter().enumerate() {
        let mut cells = vec![Cell::new(formula)];
        cells.extend((0..matrix.ncols()).map(|j| Cell::new(&matrix[(i, j)].to_string())));
        table.add_row(Row::new(cells));
    }
    table
}

/// element composition matrix as `{ "formulae": [...], "elements": [...], "counts": [[...]] }`
pub fn matrix_json(formulae: &[&str], matrix: &DMatrix<f64>, elements: &[String]) -> serde_json::Value {
    let counts: Vec<Vec<f64>> = matrix
        .row_iter()
        .map(|row| row.iter().copied().collect())
        .collect();
    serde_json::json!({
        "formulae": formulae,
        "elements": elements,
        "counts": counts,
    })
}

/// JSON of the evaluation outcome: the result itself or `{ "error": ..., "code": ... }`
pub fn to_json(outcome: &Result<EvaluationResult, FormulaError>) -> serde_json::Value {
    let value = match outcome {
        Ok(result) => serde_json::to_value(result),
        Err(error) => serde_json::to_value(ErrorReport::from(error)),
    };
    // both types serialize into plain maps
    value.unwrap_or(serde_json::Value::Null)
}
