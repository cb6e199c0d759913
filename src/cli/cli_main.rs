use crate::Formulae::molmass::{EvaluationResult, MolarMassCalculator};
use crate::Formulae::molmass_errors::FormulaError;
use crate::Formulae::molmass_output::{
    element_table, matrix_json, matrix_table, print_composition, to_json,
};
use crate::Utils::logger::init_logger;
use crate::settings::{ConfigManager, DEFAULT_CONFIG_FILE, MolMassConfig, parse_group_definition};
use clap::Parser;
use log::{LevelFilter, debug};
use std::error::Error;
use std::io::{self, Write};

/// nesting limit of the command line tool when the configuration sets none
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 256;

#[derive(Parser, Debug)]
#[command(
    name = "molmass",
    version,
    about = "Molar mass, atomic composition and mass percent of chemical formulae"
)]
pub struct Cli {
    /// Chemical formulae, e.g. H2O "Ca(OH)2" "(NH4)2SO4"; interactive menu if omitted
    pub formulae: Vec<String>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the element composition matrix of all formulae
    #[arg(long)]
    pub matrix: bool,

    /// Print the periodic table
    #[arg(long)]
    pub elements: bool,

    /// Configuration file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Chemical group abbreviation, repeatable
    #[arg(short, long = "group", value_name = "NAME=FORMULA")]
    pub groups: Vec<String>,

    /// Ignore a trailing phase mark: (g), (l), (s), (c), (cr), (aq)
    #[arg(long)]
    pub strip_phase: bool,

    /// Digits after the decimal point
    #[arg(short, long, value_name = "N")]
    pub decimals: Option<usize>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// log level from -v flags, the configured level otherwise
    pub fn level_filter(&self, config: &MolMassConfig) -> Result<LevelFilter, Box<dyn Error>> {
        Ok(match self.verbose {
            0 => config.level_filter()?,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
    }

    /// calculator from the configuration with command line overrides applied
    pub fn build_calculator(&self, config: &MolMassConfig) -> Result<MolarMassCalculator, Box<dyn Error>> {
        let mut settings = config.evaluator.clone();
        for definition in &self.groups {
            let (name, atoms) = parse_group_definition(definition)?;
            settings.groups.insert(name, atoms);
        }
        if self.strip_phase {
            settings.strip_phase_marks = true;
        }
        // the parser recurses on '(', an unbounded depth would overflow the stack
        settings.max_nesting_depth = settings.max_nesting_depth.or(Some(DEFAULT_MAX_NESTING_DEPTH));
        Ok(MolarMassCalculator::with_settings(settings)?)
    }
}

/// Entry point of the binary. Returns false if some formula could not be evaluated.
pub fn run_cli() -> Result<bool, Box<dyn Error>> {
    let cli = Cli::parse();
    let manager = ConfigManager::with_config_file(&cli.config);
    let config = manager.get_config().clone();
    init_logger(cli.level_filter(&config)?, config.log_file.as_deref())?;
    debug!("arguments: {:?}", cli);

    let calculator = cli.build_calculator(&config)?;
    let decimals = cli.decimals.unwrap_or(config.decimal_places);

    if cli.elements {
        element_table().printstd();
    }
    if cli.formulae.is_empty() {
        if !cli.elements {
            run_interactive_menu(&calculator, &manager, decimals)?;
        }
        return Ok(true);
    }

    let formulae: Vec<&str> = cli.formulae.iter().map(|f| f.as_str()).collect();
    let outcomes: Vec<_> = formulae.iter().map(|f| calculator.evaluate(f)).collect();
    let all_ok = outcomes.iter().all(|o| o.is_ok());
    if cli.json {
        let mut report = json_report(&outcomes);
        if cli.matrix {
            report = serde_json::json!({
                "results": report,
                "matrix": matrix_report(&calculator, &formulae),
            });
        }
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(all_ok);
    }
    for (formula, outcome) in formulae.iter().zip(&outcomes) {
        print_outcome(formula, outcome, decimals);
    }
    if cli.matrix {
        print_matrix(&calculator, &formulae);
    }
    Ok(all_ok)
}

/// one JSON object for a single formula, an array for several
pub fn json_report(outcomes: &[Result<EvaluationResult, FormulaError>]) -> serde_json::Value {
    match outcomes {
        [single] => to_json(single),
        _ => serde_json::Value::Array(outcomes.iter().map(to_json).collect()),
    }
}

/// matrix as JSON, or the error that prevented building it
pub fn matrix_report(calculator: &MolarMassCalculator, formulae: &[&str]) -> serde_json::Value {
    match calculator.element_composition_matrix(formulae) {
        Ok((matrix, elements)) => matrix_json(formulae, &matrix, &elements),
        Err(error) => to_json(&Err(error)),
    }
}

/// Error message; syntax errors get the formula printed with a caret under the
/// offending character.
pub fn describe_error(formula: &str, error: &FormulaError) -> String {
    match error.position() {
        Some(position) => format!(
            "{}: {}\n  {}\n  {}^",
            formula,
            error,
            formula,
            " ".repeat(position)
        ),
        None => format!("{}: {}", formula, error),
    }
}

fn print_outcome(formula: &str, outcome: &Result<EvaluationResult, FormulaError>, decimals: usize) {
    match outcome {
        Ok(result) => print_composition(formula, result, decimals),
        Err(error) => eprintln!("\x1b[31m{}\x1b[0m", describe_error(formula, error)),
    }
}

fn print_matrix(calculator: &MolarMassCalculator, formulae: &[&str]) {
    match calculator.element_composition_matrix(formulae) {
        Ok((matrix, elements)) => {
            println!("\nElement composition matrix:");
            matrix_table(formulae, &matrix, &elements).printstd();
        }
        Err(error) => eprintln!("\x1b[31mcannot build matrix: {}\x1b[0m", error),
    }
}

/* colors
Blue (\x1b[34m) - Welcome header text
Yellow (\x1b[33m) - Menu options
Cyan (\x1b[36m) - prompts
Red (\x1b[31m) - errors
Reset (\x1b[0m) - Returns to normal color after each colored section
*/
pub fn run_interactive_menu(
    calculator: &MolarMassCalculator,
    manager: &ConfigManager,
    decimals: usize,
) -> io::Result<()> {
    loop {
        show_main_menu()?;
        let choice = get_user_input()?;

        match choice.trim() {
            "1" => {
                let formula = ask("Enter formula: ")?;
                print_outcome(formula.trim(), &calculator.evaluate(formula.trim()), decimals);
            }
            "2" => {
                let line = ask("Enter formulae separated by spaces: ")?;
                let formulae: Vec<&str> = line.split_whitespace().collect();
                if formulae.is_empty() {
                    println!("No formulae given.");
                } else {
                    print_matrix(calculator, &formulae);
                }
            }
            "3" => {
                element_table().printstd();
            }
            "4" => {
                println!("Configuration file: {}", manager.config_file());
                let config = serde_json::to_string_pretty(manager.get_config())
                    .map_err(io::Error::other)?;
                println!("{}", config);
            }
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
    Ok(())
}

fn show_main_menu() -> io::Result<()> {
    println!(
        "\x1b[34m\n MolMass: molar mass and percent composition of chemical formulae\n \x1b[0m"
    );
    println!("\x1b[33m1. Molar mass of a formula\x1b[0m");
    println!("\x1b[33m2. Element composition matrix\x1b[0m");
    println!("\x1b[33m3. Periodic table\x1b[0m");
    println!("\x1b[33m4. Show configuration\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    io::stdout().flush()
}

fn ask(prompt: &str) -> io::Result<String> {
    print!("\x1b[36m{}\x1b[0m", prompt);
    io::stdout().flush()?;
    get_user_input()
}

fn get_user_input() -> io::Result<String> {
    let mut input = String::new();
    // end of input behaves like "exit"
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok("0".to_string());
    }
    Ok(input)
}
