/// Periodic table: symbol, name, atomic number and standard atomic weight of elements 1-118.
/// Lookups by symbol go through a hash index built once and never changed afterwards.
pub mod elements;
/// eng
/// Recursive descent parser of chemical formulae. The parser takes a formula like "K4(Fe(CN)6)"
/// and returns the number of atoms of every symbol in order of first appearance:
/// 1) element symbols are an uppercase letter followed by lowercase letters;
/// 2) a number after a symbol or after a closing bracket is a stoichiometric coefficient, 1 if absent;
/// 3) coefficients after brackets multiply everything inside, nested brackets multiply their coefficients.
/// Syntax errors report the offending character and its position.
///
/// # Examples
/// ```
/// use MolMass::Formulae::formula_parser::parse_formula;
/// let atomic_composition = parse_formula("Na(NO3)2").unwrap();
/// assert_eq!(atomic_composition.get("O"), Some(6));
/// println!("{:?}", atomic_composition.to_hashmap());
/// ```
pub mod formula_parser;
/// Module to calculate the atomic composition, molar mass and percent composition of a chemical formula
///
///  # Examples
/// ```
/// use MolMass::Formulae::molmass::{calculate_molar_mass, MolarMassCalculator};
/// let result = calculate_molar_mass("C6H8O6").unwrap();
/// println!("Molar mass: {:?} g/mol", result.molecular_weight);
/// for entry in &result.composition {
///     println!("{}: {} atoms, {:.2} %", entry.element.symbol, entry.count, entry.percent_composition);
/// }
/// // chemical groups: Me (methyl) is {"C":1, "H":3}
/// let mut calculator = MolarMassCalculator::new();
/// calculator.add_group("Me", &[("C", 1), ("H", 3)]).unwrap();
/// let xylene = calculator.evaluate("C6H4(Me)2").unwrap();
/// assert_eq!(xylene.count_of("C"), 8);
/// ```
pub mod molmass;
/// errors of parsing and evaluation
pub mod molmass_errors;
/// tables and JSON for evaluation results
pub mod molmass_output;
