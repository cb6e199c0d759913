/// command line interface: arguments, interactive menu and printing of results
pub mod cli_main;
