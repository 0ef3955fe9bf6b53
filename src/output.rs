use owo_colors::OwoColorize;

/// Small wrapper around stdout/stderr printing to provide consistent, colored
/// user-facing messages. Colors are enabled only when output is a TTY.
pub fn stdout_is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn stderr_is_tty() -> bool {
    atty::is(atty::Stream::Stderr)
}

/// Severity used to pick a color for a progress tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Ok,
    Info,
    Warn,
    Error,
}

/// Render `text` in the tone's color when `color` is set.
pub fn paint(tone: Tone, text: &str, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    match tone {
        Tone::Ok => text.green().bold().to_string(),
        Tone::Info => text.cyan().bold().to_string(),
        Tone::Warn => text.yellow().bold().to_string(),
        Tone::Error => text.red().bold().to_string(),
    }
}

pub fn print_info(msg: &str) {
    println!("{} {}", paint(Tone::Info, "info:", stdout_is_tty()), msg);
}

pub fn print_warn(msg: &str) {
    eprintln!("{} {}", paint(Tone::Warn, "warn:", stderr_is_tty()), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", paint(Tone::Error, "error:", stderr_is_tty()), msg);
}

pub fn print_success(msg: &str) {
    println!("{} {}", paint(Tone::Ok, "ok:", stdout_is_tty()), msg);
}
