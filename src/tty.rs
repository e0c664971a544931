//! Terminal detection for CLI input and output.

use std::io::{self, IsTerminal};

pub fn is_stdin_tty() -> bool {
    io::stdin().is_terminal()
}

pub fn is_stdout_tty() -> bool {
    io::stdout().is_terminal()
}

// log_status! macro is defined in lib.rs (#[macro_export]) and available crate-wide.
