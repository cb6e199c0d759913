/// Recursive descent parser of chemical formulae.
///
/// Grammar (case sensitive):
/// ```text
/// formula      := term*
/// term         := element-term | group-term
/// element-term := UPPER lower* digits?
/// group-term   := '(' term* ')' digits?
/// ```
/// A missing count means 1. Group multipliers are applied to everything inside the
/// group, including nested groups, and the result is summed into the enclosing
/// scope. Parsing is a single left to right pass; the first character that does not
/// fit the grammar stops it with an error pointing at that character (0-based index
/// in characters, not bytes).
///
/// The parser knows nothing about the periodic table: "Xx" is a valid symbol here,
/// resolution is done by the evaluator.
use crate::Formulae::molmass_errors::FormulaError;
use log::debug;
use std::collections::HashMap;

/// one distinct symbol of a parsed formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolCount {
    pub symbol: String,
    pub count: usize,
    /// character index of the first occurrence
    pub position: usize,
}

/// Distinct symbols with their atom counts, in order of first occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedFormula {
    counts: Vec<SymbolCount>,
}

impl ParsedFormula {
    pub fn new() -> Self {
        Self { counts: Vec::new() }
    }

    /// adds atoms of a symbol, summing into an existing entry
    /// `position` is reported if the count overflows
    pub fn add(&mut self, symbol: &str, count: usize, position: usize) -> Result<(), FormulaError> {
        match self.counts.iter_mut().find(|entry| entry.symbol == symbol) {
            Some(entry) => {
                entry.count = entry
                    .count
                    .checked_add(count)
                    .ok_or(FormulaError::CountOverflow { position })?;
            }
            None => self.counts.push(SymbolCount {
                symbol: symbol.to_string(),
                count,
                position,
            }),
        }
        Ok(())
    }

    /// merges `other` multiplied by `multiplier` into self
    pub fn merge_scaled(
        &mut self,
        other: &ParsedFormula,
        multiplier: usize,
        position: usize,
    ) -> Result<(), FormulaError> {
        for entry in other.entries() {
            let scaled = entry
                .count
                .checked_mul(multiplier)
                .ok_or(FormulaError::CountOverflow { position })?;
            self.add(&entry.symbol, scaled, entry.position)?;
        }
        Ok(())
    }

    pub fn get(&self, symbol: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|entry| entry.symbol == symbol)
            .map(|entry| entry.count)
    }

    pub fn entries(&self) -> &[SymbolCount] {
        &self.counts
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|entry| (entry.symbol.as_str(), entry.count))
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.counts.iter().map(|entry| entry.symbol.as_str()).collect()
    }

    /// number of distinct symbols
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// total number of atoms
    pub fn total_atoms(&self) -> usize {
        self.counts.iter().map(|entry| entry.count).sum()
    }

    pub fn to_hashmap(&self) -> HashMap<String, usize> {
        self.iter().map(|(s, c)| (s.to_string(), c)).collect()
    }
}

/// Parser state: the formula as characters, a cursor and the current group depth.
pub struct FormulaParser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
    max_depth: Option<usize>,
}

impl FormulaParser {
    pub fn new(formula: &str) -> Self {
        Self {
            chars: formula.chars().collect(),
            pos: 0,
            depth: 0,
            max_depth: None,
        }
    }

    /// limits nesting of parentheses, `None` means unlimited
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// parses the whole formula
    pub fn parse(mut self) -> Result<ParsedFormula, FormulaError> {
        let parsed = self.parse_scope(None)?;
        debug!("parsed formula into {:?}", parsed.to_hashmap());
        Ok(parsed)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Parses terms until the end of input (top level) or the `)` closing the group
    /// opened at `open`. The closing `)` is consumed, the multiplier after it is not.
    fn parse_scope(&mut self, open: Option<usize>) -> Result<ParsedFormula, FormulaError> {
        let mut scope = ParsedFormula::new();
        loop {
            let Some(c) = self.peek() else {
                return match open {
                    Some(position) => Err(FormulaError::UnclosedGroup { position }),
                    None => Ok(scope),
                };
            };
            match c {
                '(' => {
                    let start = self.pos;
                    self.pos += 1;
                    self.depth += 1;
                    if let Some(max) = self.max_depth {
                        if self.depth > max {
                            return Err(FormulaError::TooDeep {
                                position: start,
                                max,
                            });
                        }
                    }
                    let group = self.parse_scope(Some(start))?;
                    self.depth -= 1;
                    let multiplier = self.parse_count()?;
                    scope.merge_scaled(&group, multiplier, start)?;
                }
                ')' if open.is_some() => {
                    self.pos += 1;
                    return Ok(scope);
                }
                c if c.is_ascii_uppercase() => {
                    let start = self.pos;
                    let symbol = self.parse_symbol();
                    let count = self.parse_count()?;
                    scope.add(&symbol, count, start)?;
                }
                character => {
                    return Err(FormulaError::UnexpectedCharacter {
                        character,
                        position: self.pos,
                    });
                }
            }
        }
    }

    // one uppercase letter followed by any number of lowercase letters
    fn parse_symbol(&mut self) -> String {
        let start = self.pos;
        self.pos += 1;
        while matches!(self.peek(), Some(c) if c.is_ascii_lowercase()) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    // optional decimal count, 1 if absent
    fn parse_count(&mut self) -> Result<usize, FormulaError> {
        let start = self.pos;
        let mut value: usize = 0;
        while let Some(digit) = self.peek().and_then(|c| c.to_digit(10)) {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit as usize))
                .ok_or(FormulaError::CountOverflow { position: start })?;
            self.pos += 1;
        }
        if self.pos == start {
            return Ok(1);
        }
        if value == 0 {
            return Err(FormulaError::ZeroCount { position: start });
        }
        Ok(value)
    }
}

/// Parses a formula into symbol counts without resolving symbols.
/// A blank string is [`FormulaError::Empty`].
pub fn parse_formula(formula: &str) -> Result<ParsedFormula, FormulaError> {
    if formula.trim().is_empty() {
        return Err(FormulaError::Empty);
    }
    FormulaParser::new(formula).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(formula: &str) -> Vec<(String, usize)> {
        parse_formula(formula)
            .unwrap()
            .iter()
            .map(|(s, c)| (s.to_string(), c))
            .collect()
    }

    fn pairs(expected: &[(&str, usize)]) -> Vec<(String, usize)> {
        expected.iter().map(|(s, c)| (s.to_string(), *c)).collect()
    }

    #[test]
    fn test_simple_formulae() {
        assert_eq!(counts("H2O"), pairs(&[("H", 2), ("O", 1)]));
        assert_eq!(counts("C6H12O6"), pairs(&[("C", 6), ("H", 12), ("O", 6)]));
        assert_eq!(counts("NaCl"), pairs(&[("Na", 1), ("Cl", 1)]));
        assert_eq!(counts("Fe2O3"), pairs(&[("Fe", 2), ("O", 3)]));
    }

    #[test]
    fn test_repeated_symbols_accumulate() {
        assert_eq!(counts("C5H6OOH"), pairs(&[("C", 5), ("H", 7), ("O", 2)]));
        assert_eq!(
            counts("CH3COOH"),
            pairs(&[("C", 2), ("H", 4), ("O", 2)])
        );
        assert_eq!(counts("H10H20H3"), pairs(&[("H", 33)]));
    }

    #[test]
    fn test_group_distribution() {
        assert_eq!(counts("(AB2)3"), pairs(&[("A", 3), ("B", 6)]));
        // the multiplier does not touch counts outside the group
        assert_eq!(counts("B(AB2)3"), pairs(&[("B", 7), ("A", 3)]));
        assert_eq!(counts("Ca(OH)2"), pairs(&[("Ca", 1), ("O", 2), ("H", 2)]));
        assert_eq!(
            counts("(NH4)2SO4"),
            pairs(&[("N", 2), ("H", 8), ("S", 1), ("O", 4)])
        );
        assert_eq!(counts("Na(NO3)2"), pairs(&[("Na", 1), ("N", 2), ("O", 6)]));
    }

    #[test]
    fn test_nested_groups_multiply() {
        assert_eq!(counts("((A)2)3"), pairs(&[("A", 6)]));
        assert_eq!(
            counts("K4(Fe(CN)6)"),
            pairs(&[("K", 4), ("Fe", 1), ("C", 6), ("N", 6)])
        );
        assert_eq!(
            counts("Al2(SO4(H2O)2)3"),
            pairs(&[("Al", 2), ("S", 3), ("O", 18), ("H", 12)])
        );
        assert_eq!(counts("(((H)))"), pairs(&[("H", 1)]));
    }

    #[test]
    fn test_multi_digit_counts() {
        assert_eq!(counts("C12H22O11"), pairs(&[("C", 12), ("H", 22), ("O", 11)]));
        assert_eq!(counts("(CH2)100"), pairs(&[("C", 100), ("H", 200)]));
    }

    #[test]
    fn test_empty_group_contributes_nothing() {
        assert!(parse_formula("()").unwrap().is_empty());
        assert_eq!(counts("H2()3O"), pairs(&[("H", 2), ("O", 1)]));
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(parse_formula(""), Err(FormulaError::Empty));
        assert_eq!(parse_formula("   "), Err(FormulaError::Empty));
    }

    #[test]
    fn test_syntax_errors_point_at_character() {
        assert_eq!(
            parse_formula("H2O)"),
            Err(FormulaError::UnexpectedCharacter {
                character: ')',
                position: 3
            })
        );
        assert_eq!(
            parse_formula("2H2O"),
            Err(FormulaError::UnexpectedCharacter {
                character: '2',
                position: 0
            })
        );
        assert_eq!(
            parse_formula("h2o"),
            Err(FormulaError::UnexpectedCharacter {
                character: 'h',
                position: 0
            })
        );
        assert_eq!(
            parse_formula("H2 O"),
            Err(FormulaError::UnexpectedCharacter {
                character: ' ',
                position: 2
            })
        );
        assert_eq!(
            parse_formula("Na+"),
            Err(FormulaError::UnexpectedCharacter {
                character: '+',
                position: 2
            })
        );
    }

    #[test]
    fn test_position_counts_characters_not_bytes() {
        assert_eq!(
            parse_formula("CuSO4·5H2O"),
            Err(FormulaError::UnexpectedCharacter {
                character: '·',
                position: 5
            })
        );
        assert_eq!(
            parse_formula("Hé"),
            Err(FormulaError::UnexpectedCharacter {
                character: 'é',
                position: 1
            })
        );
    }

    #[test]
    fn test_unclosed_group() {
        assert_eq!(
            parse_formula("Ca(OH"),
            Err(FormulaError::UnclosedGroup { position: 2 })
        );
        assert_eq!(
            parse_formula("((H)2"),
            Err(FormulaError::UnclosedGroup { position: 0 })
        );
    }

    #[test]
    fn test_zero_and_overflowing_counts() {
        assert_eq!(
            parse_formula("H0"),
            Err(FormulaError::ZeroCount { position: 1 })
        );
        assert_eq!(
            parse_formula("(OH)00"),
            Err(FormulaError::ZeroCount { position: 4 })
        );
        assert_eq!(
            parse_formula("H99999999999999999999999"),
            Err(FormulaError::CountOverflow { position: 1 })
        );
        let huge = format!("(H{})2", usize::MAX);
        assert_eq!(
            parse_formula(&huge),
            Err(FormulaError::CountOverflow { position: 0 })
        );
    }

    #[test]
    fn test_max_depth() {
        let parsed = FormulaParser::new("((H)2)3")
            .with_max_depth(Some(2))
            .parse()
            .unwrap();
        assert_eq!(parsed.get("H"), Some(6));
        assert_eq!(
            FormulaParser::new("H(((O)))").with_max_depth(Some(2)).parse(),
            Err(FormulaError::TooDeep {
                position: 3,
                max: 2
            })
        );
    }

    #[test]
    fn test_parsed_formula_helpers() {
        let parsed = parse_formula("(NH4)2SO4").unwrap();
        assert_eq!(parsed.len(), 4);
        assert_eq!(parsed.total_atoms(), 15);
        assert_eq!(parsed.symbols(), vec!["N", "H", "S", "O"]);
        let map = parsed.to_hashmap();
        assert_eq!(map.get("H"), Some(&8));
        assert_eq!(parsed.get("Cl"), None);
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let first = parse_formula("Mg3(PO4)2(H2O)8").unwrap();
        let second = parse_formula("Mg3(PO4)2(H2O)8").unwrap();
        assert_eq!(first, second);
    }
}
