//! Help message display for CLI.

#![allow(clippy::print_stdout)]

use crate::config::Config;

/// Print help message based on configuration state.
pub fn print_smart_help(config: &Config) {
    print!("{}", smart_help(config));
}

/// Help text for the current configuration state.
pub fn smart_help(config: &Config) -> String {
    if config.support.king_jar.is_none() {
        first_time_help()
    } else {
        configured_help()
    }
}

/// Setup guide for users without a configured viewer jar.
pub fn first_time_help() -> String {
    [
        "No KiNG viewer configured. Get started with kinplot:",
        "",
        "1. Initialize configuration:",
        "   kinplot config init",
        "",
        "2. Point [support] king_jar in the config file at your king.jar,",
        "   or pass --king-jar on each run. Run 'kinplot config path' to",
        "   find the config file.",
        "",
        "3. Plot principal coordinates:",
        "   kinplot -i beta_div_coords.txt -m mapping.txt -o plots",
        "",
        "Run 'kinplot -h' for all options.",
        "",
    ]
    .join("\n")
}

/// Brief usage reminder for configured users.
pub fn configured_help() -> String {
    [
        "Usage: kinplot -i <COORDS> -m <MAPPING> [OPTIONS]",
        "",
        "Example: kinplot -i beta_div_coords.txt -m mapping.txt -b Treatment -o plots",
        "",
        "Run 'kinplot -h' for all options.",
        "",
    ]
    .join("\n")
}
