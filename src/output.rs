//! User-facing terminal messages.
//! Colors are enabled only when the target stream is a TTY.

use owo_colors::OwoColorize;

pub fn print_warn(msg: &str) {
    if atty::is(atty::Stream::Stderr) {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

/// Print an error; multi-line messages are indented under the prefix.
pub fn print_error(msg: &str) {
    let body = msg.replace('\n', "\n  ");
    if atty::is(atty::Stream::Stderr) {
        eprintln!("{} {}", "error:".red().bold(), body);
    } else {
        eprintln!("error: {}", body);
    }
}
