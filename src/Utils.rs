/// logging to terminal and file with simplelog
pub mod logger;
