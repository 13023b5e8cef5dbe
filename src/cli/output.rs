//! Colored terminal output for packaging runs
//!
//! Status lines go to stdout and are dropped in quiet mode. Errors and hints
//! go to stderr and are always shown.

use std::io::Write;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Output manager for consistent colored terminal output
#[derive(Debug)]
pub struct OutputManager {
    stdout: BufferWriter,
    quiet: bool,
}

impl Clone for OutputManager {
    fn clone(&self) -> Self {
        Self::new(self.quiet)
    }
}

impl OutputManager {
    /// Create a new output manager
    pub fn new(quiet: bool) -> Self {
        Self {
            stdout: BufferWriter::stdout(ColorChoice::Auto),
            quiet,
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) -> std::io::Result<()> {
        self.status("ℹ", ColorSpec::new().set_fg(Some(Color::Cyan)), message)
    }

    /// Print a success message
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.status(
            "✓",
            ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true),
            message,
        )
    }

    /// Print a section header
    pub fn section(&self, title: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut buffer = self.stdout.buffer();
        buffer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        writeln!(&mut buffer, "── {title} ──")?;
        buffer.reset()?;
        self.stdout.print(&buffer)
    }

    /// Print an error message (always shown)
    pub fn error(&self, message: &str) {
        let spec = ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true).clone();
        if print_line(&BufferWriter::stderr(ColorChoice::Auto), "✗", &spec, message).is_err() {
            eprintln!("✗ {message}");
        }
    }

    /// Print a hint line under an error (always shown)
    pub fn hint(&self, message: &str) {
        let spec = ColorSpec::new().set_fg(Some(Color::Yellow)).clone();
        if print_line(&BufferWriter::stderr(ColorChoice::Auto), "  •", &spec, message).is_err() {
            eprintln!("  • {message}");
        }
    }

    fn status(&self, symbol: &str, spec: &ColorSpec, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        print_line(&self.stdout, symbol, spec, message)
    }
}

/// Writes `symbol` in `spec` colors followed by the plain message.
fn print_line(
    writer: &BufferWriter,
    symbol: &str,
    spec: &ColorSpec,
    message: &str,
) -> std::io::Result<()> {
    let mut buffer = writer.buffer();
    buffer.set_color(spec)?;
    write!(&mut buffer, "{symbol}")?;
    buffer.reset()?;
    writeln!(&mut buffer, " {message}")?;
    writer.print(&buffer)
}
