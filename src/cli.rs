use anyhow::Result;
use console::Term;
use std::sync::atomic::{AtomicBool, Ordering};

const PREFIX_LEN: u16 = 10;

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Status output goes to stderr, so stdout only carries query results
pub struct Writer {
    term: Term,
}

impl Writer {
    pub fn new() -> Self {
        Writer {
            term: Term::stderr(),
        }
    }

    pub fn get_max_len(&self) -> u16 {
        let (_, width) = self.term.size_checked().unwrap_or((25, 80));
        width.saturating_sub(PREFIX_LEN)
    }

    pub fn writeln(&self, prefix: &str, msg: &str) -> Result<()> {
        // Continuation lines keep the prefix column clear
        for (no, line) in msg.lines().enumerate() {
            let prefix = if no == 0 { prefix } else { "" };
            self.term
                .write_line(&format!("{}{}", gen_prefix(prefix), line))?;
        }
        if msg.is_empty() {
            self.term.write_line(&gen_prefix(prefix))?;
        }
        Ok(())
    }

    /// Write words separated by spaces, breaking lines at word boundaries
    pub fn write_chunks<S: AsRef<str>>(&self, prefix: &str, chunks: &[S]) -> Result<()> {
        let max_len = self.get_max_len() as usize;
        let mut line = String::new();
        let mut first = true;
        for chunk in chunks {
            let chunk = chunk.as_ref();
            let len = console::measure_text_width(&line) + console::measure_text_width(chunk);
            if !line.is_empty() && len + 1 > max_len {
                self.writeln(if first { prefix } else { "" }, &line)?;
                first = false;
                line.clear();
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(chunk);
        }
        if !line.is_empty() {
            self.writeln(if first { prefix } else { "" }, &line)?;
        }
        Ok(())
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

/// Right-align a (possibly styled) prefix into the prefix column
pub fn gen_prefix(prefix: &str) -> String {
    let width = console::measure_text_width(prefix);
    let padding = (PREFIX_LEN as usize).saturating_sub(width + 1);
    format!("{}{} ", " ".repeat(padding), prefix)
}

#[macro_export]
macro_rules! msg {
    ($prefix:expr, $($arg:tt)+) => {
        $crate::WRITER.writeln($prefix, &format!($($arg)+)).ok();
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        if $crate::cli::is_verbose() {
            $crate::msg!(&console::style("DEBUG").dim().to_string(), $($arg)+);
        }
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::msg!(&console::style("INFO").blue().bold().to_string(), $($arg)+);
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::msg!(&console::style("WARNING").yellow().bold().to_string(), $($arg)+);
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::msg!(&console::style("ERROR").red().bold().to_string(), $($arg)+);
    };
}

#[macro_export]
macro_rules! due_to {
    ($($arg:tt)+) => {
        $crate::msg!(&console::style("DUE TO").yellow().bold().to_string(), $($arg)+);
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)+) => {
        $crate::msg!(&console::style("SUCCESS").green().bold().to_string(), $($arg)+);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gen_prefix() {
        assert_eq!(gen_prefix("INFO"), "     INFO ");
        assert_eq!(gen_prefix(""), "          ");
        // Styling does not count towards the width
        let styled = console::style("INFO").blue().force_styling(true).to_string();
        assert_eq!(console::measure_text_width(&gen_prefix(&styled)), 10);
    }
}
