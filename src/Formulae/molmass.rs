use crate::Formulae::elements::{self, Element};
use crate::Formulae::formula_parser::{FormulaParser, ParsedFormula};
use crate::Formulae::molmass_errors::{FormulaError, GroupError};
use log::{debug, info, warn};
use nalgebra::DMatrix;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

// trailing phase marks like H2O(g), NaCl(cr), NaCl(aq)
static PHASE_MARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((?:g|l|s|c|cr|aq)\)$").expect("valid phase mark regex"));

/// Chemical formulae may contain special names for chemical groups, e.g. Me (methyl)
/// which is {"C":1, "H":3}. Maps the name of the group to its atomic composition.
pub type ChemicalGroups = BTreeMap<String, BTreeMap<String, usize>>;

/// one element of the composition breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionEntry {
    #[serde(flatten)]
    pub element: &'static Element,
    pub count: usize,
    pub weight_contribution: f64,
    pub percent_composition: f64,
}

impl CompositionEntry {
    pub fn symbol(&self) -> &'static str {
        self.element.symbol
    }
}

/// successful evaluation of a formula
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    /// g/mol
    pub molecular_weight: f64,
    /// ascending by atomic number
    pub composition: Vec<CompositionEntry>,
    pub distinct_element_count: usize,
}

impl EvaluationResult {
    /// composition entry of an element, by symbol
    pub fn entry(&self, symbol: &str) -> Option<&CompositionEntry> {
        self.composition.iter().find(|e| e.element.symbol == symbol)
    }

    /// number of atoms of an element, 0 if absent
    pub fn count_of(&self, symbol: &str) -> usize {
        self.entry(symbol).map(|e| e.count).unwrap_or(0)
    }

    pub fn total_atoms(&self) -> usize {
        self.composition.iter().map(|e| e.count).sum()
    }
}

/// settings of the evaluator; the defaults give the plain grammar with no limits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorSettings {
    /// abbreviations of chemical groups, e.g. Me -> {C: 1, H: 3}
    pub groups: ChemicalGroups,
    /// drop a trailing phase mark: (g), (l), (s), (c), (cr), (aq)
    pub strip_phase_marks: bool,
    /// maximal formula length in characters
    pub max_formula_length: Option<usize>,
    /// maximal nesting depth of parentheses
    pub max_nesting_depth: Option<usize>,
}

/// Evaluates chemical formulae against the element table.
/// Holds only immutable settings, so one instance can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct MolarMassCalculator {
    settings: EvaluatorSettings,
}

impl MolarMassCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// calculator with the given settings, every group definition is checked first
    pub fn with_settings(settings: EvaluatorSettings) -> Result<Self, GroupError> {
        validate_groups(&settings.groups)?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &EvaluatorSettings {
        &self.settings
    }

    /// adds an abbreviation of a chemical group
    pub fn add_group(&mut self, name: &str, composition: &[(&str, usize)]) -> Result<(), GroupError> {
        let atoms = composition
            .iter()
            .map(|(symbol, count)| (symbol.to_string(), *count))
            .collect();
        validate_group(name, &atoms)?;
        self.settings.groups.insert(name.to_string(), atoms);
        Ok(())
    }

    /// parses the formula into symbol counts, group names are not expanded
    pub fn parse(&self, formula: &str) -> Result<ParsedFormula, FormulaError> {
        if formula.trim().is_empty() {
            return Err(FormulaError::Empty);
        }
        if let Some(max) = self.settings.max_formula_length {
            let length = formula.chars().count();
            if length > max {
                return Err(FormulaError::TooLong { length, max });
            }
        }
        let formula = if self.settings.strip_phase_marks {
            PHASE_MARK.replace(formula, "")
        } else {
            formula.into()
        };
        if formula.trim().is_empty() {
            return Err(FormulaError::Empty);
        }
        FormulaParser::new(&formula)
            .with_max_depth(self.settings.max_nesting_depth)
            .parse()
    }

    /// parses and evaluates a formula
    pub fn evaluate(&self, formula: &str) -> Result<EvaluationResult, FormulaError> {
        info!("evaluating formula {}", formula);
        let parsed = self.parse(formula)?;
        let resolved = self.resolve(&parsed)?;
        let result = compose(resolved)?;
        debug!(
            "formula {}: {} g/mol, {} elements",
            formula, result.molecular_weight, result.distinct_element_count
        );
        Ok(result)
    }

    /// Resolves parsed symbols into elements, expanding group abbreviations.
    /// The first unknown symbol stops the resolution.
    fn resolve(&self, parsed: &ParsedFormula) -> Result<Vec<(&'static Element, usize)>, FormulaError> {
        let mut resolved: Vec<(&'static Element, usize)> = Vec::new();
        for entry in parsed.entries() {
            if let Some(group) = self.settings.groups.get(&entry.symbol) {
                if elements::is_element(&entry.symbol) {
                    warn!(
                        "group {} shadows the element with the same symbol",
                        entry.symbol
                    );
                }
                for (atom, &quantity) in group {
                    if quantity == 0 {
                        return Err(FormulaError::ZeroCount {
                            position: entry.position,
                        });
                    }
                    let element = elements::lookup(atom)
                        .ok_or_else(|| FormulaError::UnknownElement(atom.clone()))?;
                    let count = quantity
                        .checked_mul(entry.count)
                        .ok_or(FormulaError::CountOverflow {
                            position: entry.position,
                        })?;
                    accumulate(&mut resolved, element, count, entry.position)?;
                }
            } else {
                let element = elements::lookup(&entry.symbol)
                    .ok_or_else(|| FormulaError::UnknownElement(entry.symbol.clone()))?;
                accumulate(&mut resolved, element, entry.count, entry.position)?;
            }
        }
        Ok(resolved)
    }

    /// molar masses of a vector of formulae, one result per formula
    pub fn molar_masses(&self, formulae: &[&str]) -> Vec<Result<f64, FormulaError>> {
        formulae
            .iter()
            .map(|formula| self.evaluate(formula).map(|r| r.molecular_weight))
            .collect()
    }

    /// Matrix of atom counts: one row per formula, one column per element.
    /// Columns are the union of all elements ordered by atomic number.
    pub fn element_composition_matrix(
        &self,
        formulae: &[&str],
    ) -> Result<(DMatrix<f64>, Vec<String>), FormulaError> {
        let results = formulae
            .iter()
            .map(|formula| self.evaluate(formula))
            .collect::<Result<Vec<_>, _>>()?;
        let mut columns: Vec<&'static Element> = results
            .iter()
            .flat_map(|r| r.composition.iter().map(|e| e.element))
            .collect();
        columns.sort_by_key(|element| element.atomic_number);
        columns.dedup_by_key(|element| element.atomic_number);

        let mut matrix = DMatrix::zeros(results.len(), columns.len());
        for (i, result) in results.iter().enumerate() {
            for (j, element) in columns.iter().enumerate() {
                matrix[(i, j)] = result.count_of(element.symbol) as f64;
            }
        }
        let names = columns.iter().map(|e| e.symbol.to_string()).collect();
        Ok((matrix, names))
    }
}

/// Checks a group definition: the name must read as a symbol (uppercase letter
/// followed by lowercase letters), atoms must be known elements with counts of at least 1.
pub fn validate_group(name: &str, atoms: &BTreeMap<String, usize>) -> Result<(), GroupError> {
    let mut chars = name.chars();
    let well_formed = chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_lowercase());
    if !well_formed {
        return Err(GroupError::InvalidName(name.to_string()));
    }
    if atoms.is_empty() {
        return Err(GroupError::EmptyComposition(name.to_string()));
    }
    for (symbol, &count) in atoms {
        if !elements::is_element(symbol) {
            return Err(GroupError::UnknownElement {
                group: name.to_string(),
                symbol: symbol.clone(),
            });
        }
        if count == 0 {
            return Err(GroupError::ZeroCount {
                group: name.to_string(),
                symbol: symbol.clone(),
            });
        }
    }
    Ok(())
}

pub fn validate_groups(groups: &ChemicalGroups) -> Result<(), GroupError> {
    groups
        .iter()
        .try_for_each(|(name, atoms)| validate_group(name, atoms))
}

fn accumulate(
    resolved: &mut Vec<(&'static Element, usize)>,
    element: &'static Element,
    count: usize,
    position: usize,
) -> Result<(), FormulaError> {
    match resolved
        .iter_mut()
        .find(|(e, _)| e.atomic_number == element.atomic_number)
    {
        Some((_, existing)) => {
            *existing = existing
                .checked_add(count)
                .ok_or(FormulaError::CountOverflow { position })?;
        }
        None => resolved.push((element, count)),
    }
    Ok(())
}

// percentages need the final molecular weight, so they are computed after the sum
fn compose(resolved: Vec<(&'static Element, usize)>) -> Result<EvaluationResult, FormulaError> {
    if resolved.is_empty() {
        return Err(FormulaError::NoElements);
    }
    debug_assert!(resolved.iter().all(|(_, count)| *count > 0));
    let molecular_weight: f64 = resolved
        .iter()
        .map(|(element, count)| element.atomic_weight * *count as f64)
        .sum();
    let mut composition: Vec<CompositionEntry> = resolved
        .into_iter()
        .map(|(element, count)| {
            let weight_contribution = element.atomic_weight * count as f64;
            CompositionEntry {
                element,
                count,
                weight_contribution,
                percent_composition: 100.0 * weight_contribution / molecular_weight,
            }
        })
        .collect();
    composition.sort_by_key(|entry| entry.element.atomic_number);
    let distinct_element_count = composition.len();
    Ok(EvaluationResult {
        molecular_weight,
        composition,
        distinct_element_count,
    })
}

/// Function to calculate the molar mass and composition of a chemical formula with
/// default settings
pub fn calculate_molar_mass(formula: &str) -> Result<EvaluationResult, FormulaError> {
    MolarMassCalculator::new().evaluate(formula)
}

/// Function to calculate the molar masses of a vector of chemical formulae
pub fn calculate_molar_mass_of_vector_of_subs(
    vec_of_formulae: &[&str],
) -> Vec<Result<f64, FormulaError>> {
    MolarMassCalculator::new().molar_masses(vec_of_formulae)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_water() {
        let result = calculate_molar_mass("H2O").unwrap();
        assert_relative_eq!(result.molecular_weight, 18.015, epsilon = 1e-3);
        assert_eq!(result.distinct_element_count, 2);
        let h = &result.composition[0];
        let o = &result.composition[1];
        assert_eq!((h.symbol(), h.count), ("H", 2));
        assert_eq!((o.symbol(), o.count), ("O", 1));
        assert_relative_eq!(h.percent_composition, 11.19, epsilon = 1e-2);
        assert_relative_eq!(o.percent_composition, 88.81, epsilon = 1e-2);
    }

    #[test]
    fn test_composition_sorted_by_atomic_number() {
        let result = calculate_molar_mass("SO4(NH4)2").unwrap();
        let numbers: Vec<u8> = result
            .composition
            .iter()
            .map(|e| e.element.atomic_number)
            .collect();
        assert_eq!(numbers, vec![1, 7, 8, 16]);
    }

    #[test]
    fn test_unknown_element() {
        assert_eq!(
            calculate_molar_mass("Xx2"),
            Err(FormulaError::UnknownElement("Xx".to_string()))
        );
        // first unresolved symbol in order of appearance
        assert_eq!(
            calculate_molar_mass("HQZz"),
            Err(FormulaError::UnknownElement("Q".to_string()))
        );
    }

    #[test]
    fn test_empty_and_atomless() {
        assert_eq!(calculate_molar_mass(""), Err(FormulaError::Empty));
        assert_eq!(calculate_molar_mass("()"), Err(FormulaError::NoElements));
        assert_eq!(calculate_molar_mass("(())2"), Err(FormulaError::NoElements));
    }

    #[test]
    fn test_groups() {
        let mut calculator = MolarMassCalculator::new();
        calculator.add_group("Me", &[("C", 1), ("H", 3)]).unwrap();
        let toluene = calculator.evaluate("C6H5Me").unwrap();
        assert_eq!(toluene.count_of("C"), 7);
        assert_eq!(toluene.count_of("H"), 8);
        assert_eq!(toluene.distinct_element_count, 2);

        let xylene = calculator.evaluate("C6H4(Me)2").unwrap();
        assert_eq!(xylene.count_of("C"), 8);
        assert_eq!(xylene.count_of("H"), 10);
        assert_relative_eq!(
            xylene.molecular_weight,
            calculate_molar_mass("C8H10").unwrap().molecular_weight,
            epsilon = 1e-9
        );
        // without the group Me is just an unknown symbol
        assert_eq!(
            calculate_molar_mass("C6H5Me"),
            Err(FormulaError::UnknownElement("Me".to_string()))
        );
    }

    #[test]
    fn test_invalid_groups_rejected() {
        let mut calculator = MolarMassCalculator::new();
        assert_eq!(
            calculator.add_group("R", &[("Qq", 1)]),
            Err(GroupError::UnknownElement {
                group: "R".to_string(),
                symbol: "Qq".to_string()
            })
        );
        assert_eq!(
            calculator.add_group("R", &[("H", 0)]),
            Err(GroupError::ZeroCount {
                group: "R".to_string(),
                symbol: "H".to_string()
            })
        );
        assert_eq!(
            calculator.add_group("Et", &[]),
            Err(GroupError::EmptyComposition("Et".to_string()))
        );
        assert_eq!(
            calculator.add_group("me", &[("C", 1)]),
            Err(GroupError::InvalidName("me".to_string()))
        );
        assert!(calculator.add_group("M2", &[("C", 1)]).is_err());
        assert!(calculator.settings().groups.is_empty());
        // nothing was added, so R stays an unknown symbol
        assert_eq!(
            calculator.evaluate("R"),
            Err(FormulaError::UnknownElement("R".to_string()))
        );

        let mut groups = ChemicalGroups::new();
        groups.insert("Me".to_string(), BTreeMap::from([("C".to_string(), 0)]));
        let settings = EvaluatorSettings {
            groups,
            ..Default::default()
        };
        assert!(matches!(
            MolarMassCalculator::with_settings(settings),
            Err(GroupError::ZeroCount { .. })
        ));
    }

    #[test]
    fn test_zero_group_count_is_not_evaluated() {
        // settings put together without with_settings
        let mut groups = ChemicalGroups::new();
        groups.insert("Me".to_string(), BTreeMap::from([("C".to_string(), 0)]));
        let calculator = MolarMassCalculator {
            settings: EvaluatorSettings {
                groups,
                ..Default::default()
            },
        };
        assert_eq!(
            calculator.evaluate("HMe"),
            Err(FormulaError::ZeroCount { position: 1 })
        );
    }

    #[test]
    fn test_phase_marks() {
        let calculator = MolarMassCalculator::with_settings(EvaluatorSettings {
            strip_phase_marks: true,
            ..Default::default()
        })
        .unwrap();
        let gas = calculator.evaluate("H2O(g)").unwrap();
        assert_relative_eq!(gas.molecular_weight, 18.015, epsilon = 1e-3);
        assert!(calculator.evaluate("NaCl(aq)").is_ok());
        assert_eq!(calculator.evaluate("(g)"), Err(FormulaError::Empty));
        // only switched on by the settings
        assert_eq!(
            calculate_molar_mass("H2O(g)"),
            Err(FormulaError::UnexpectedCharacter {
                character: 'g',
                position: 4
            })
        );
    }

    #[test]
    fn test_limits() {
        let calculator = MolarMassCalculator::with_settings(EvaluatorSettings {
            max_formula_length: Some(5),
            max_nesting_depth: Some(1),
            ..Default::default()
        })
        .unwrap();
        assert!(calculator.evaluate("H2O").is_ok());
        assert_eq!(
            calculator.evaluate("C6H12O6"),
            Err(FormulaError::TooLong { length: 7, max: 5 })
        );
        assert_eq!(
            calculator.evaluate("((H))"),
            Err(FormulaError::TooDeep {
                position: 1,
                max: 1
            })
        );
    }

    #[test]
    fn test_element_composition_matrix() {
        let calculator = MolarMassCalculator::new();
        let (matrix, elements) = calculator
            .element_composition_matrix(&["H2O", "NaCl", "C3H8", "CH4"])
            .unwrap();
        assert_eq!(elements, vec!["H", "C", "O", "Na", "Cl"]);
        assert_eq!(matrix.nrows(), 4);
        assert_eq!(matrix.ncols(), 5);
        assert_eq!(matrix[(0, 0)], 2.0);
        assert_eq!(matrix[(0, 2)], 1.0);
        assert_eq!(matrix[(2, 1)], 3.0);
        assert_eq!(matrix[(2, 0)], 8.0);
        assert_eq!(matrix[(1, 1)], 0.0);
        assert!(
            calculator
                .element_composition_matrix(&["H2O", "Xx"])
                .is_err()
        );
    }
}
