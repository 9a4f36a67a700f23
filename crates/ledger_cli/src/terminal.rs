//! Module for the terminal output implementation.
//!
//! Status lines go to stderr, report lines go to stdout.

use std::cell::RefCell;
use std::fmt;
use std::io::{stderr, stdout, IsTerminal, Write};
use std::str::FromStr;

use anyhow::{bail, Result};
use owo_colors::{AnsiColors, OwoColorize};

/// When to colorize output.
#[derive(Default, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Color {
    /// Automatically provide colorized output based on whether
    /// the output is a terminal.
    #[default]
    Auto,
    /// Never provide colorized output.
    Never,
    /// Always provide colorized output.
    Always,
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "auto" => Ok(Self::Auto),
            "never" => Ok(Self::Never),
            "always" => Ok(Self::Always),
            _ => bail!("argument for --color must be auto, always, or never, but found `{value}`"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Never => write!(f, "never"),
            Self::Always => write!(f, "always"),
        }
    }
}

/// The requested verbosity of output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Event payloads are printed along with statuses.
    Verbose,
    /// Normal output.
    Normal,
    /// No status lines. Reports are still printed.
    Quiet,
}

/// Output that considers preferences for verbosity and color.
#[derive(Debug)]
pub struct Terminal {
    output: RefCell<Output>,
    verbosity: Verbosity,
}

impl Terminal {
    /// Creates a new terminal writing to stdio.
    pub fn new(verbosity: Verbosity, color: Color) -> Self {
        Terminal {
            output: RefCell::new(Output::Stream {
                stderr_is_terminal: stderr().is_terminal(),
                stdout_is_terminal: stdout().is_terminal(),
                color,
            }),
            verbosity,
        }
    }

    /// Creates a terminal writing everything to `out`, without color.
    pub fn from_write(out: Box<dyn Write>, verbosity: Verbosity) -> Self {
        Terminal {
            output: RefCell::new(Output::Write(out)),
            verbosity,
        }
    }

    /// Prints a green 'status' message.
    pub fn status<T, U>(&self, status: T, message: U) -> Result<()>
    where
        T: fmt::Display,
        U: fmt::Display,
    {
        self.status_with_color(status, message, AnsiColors::Green)
    }

    /// Prints a 'status' message with the specified color.
    pub fn status_with_color<T, U>(&self, status: T, message: U, color: AnsiColors) -> Result<()>
    where
        T: fmt::Display,
        U: fmt::Display,
    {
        if self.verbosity == Verbosity::Quiet {
            return Ok(());
        }

        let mut output = self.output.borrow_mut();
        let status_color = status.color(color);
        let status = if output.stderr_color() {
            &status_color as &dyn fmt::Display
        } else {
            &status
        };

        output.print(status, &message)
    }

    /// Writes a line to stdout, optionally colored.
    pub fn line(&self, fragment: impl fmt::Display, color: Option<AnsiColors>) -> Result<()> {
        self.output.borrow_mut().write_stdout(fragment, color)
    }

    /// Returns the verbosity of the terminal.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }
}

/// A `Write`able object, either with or without color support.
enum Output {
    /// A plain write object without color support.
    Write(Box<dyn Write>),
    /// Color-enabled stdio, with information on whether color should be used.
    Stream {
        stderr_is_terminal: bool,
        stdout_is_terminal: bool,
        color: Color,
    },
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Write(_) => f.write_str("Write"),
            Output::Stream { color, .. } => f.debug_struct("Stream").field("color", color).finish(),
        }
    }
}

impl Color {
    fn enabled(self, is_terminal: bool) -> bool {
        match self {
            Color::Auto => is_terminal,
            Color::Never => false,
            Color::Always => true,
        }
    }
}

impl Output {
    fn stderr_color(&self) -> bool {
        match self {
            Output::Write(_) => false,
            Output::Stream {
                stderr_is_terminal,
                color,
                ..
            } => color.enabled(*stderr_is_terminal),
        }
    }

    fn stdout_color(&self) -> bool {
        match self {
            Output::Write(_) => false,
            Output::Stream {
                stdout_is_terminal,
                color,
                ..
            } => color.enabled(*stdout_is_terminal),
        }
    }

    /// Prints a bold, right justified status followed by a message.
    fn print(&mut self, status: &dyn fmt::Display, message: &dyn fmt::Display) -> Result<()> {
        match self {
            Output::Stream { .. } => {
                let status_bold = status.bold();
                let status = if self.stderr_color() {
                    &status_bold as &dyn fmt::Display
                } else {
                    status
                };
                writeln!(stderr(), "{status:>12} {message}")?;
            }
            Output::Write(w) => writeln!(w, "{status:>12} {message}")?,
        }

        Ok(())
    }

    fn write_stdout(&mut self, fragment: impl fmt::Display, color: Option<AnsiColors>) -> Result<()> {
        match self {
            Output::Stream { .. } => {
                let mut stdout = stdout();
                match color {
                    Some(color) if self.stdout_color() => {
                        writeln!(stdout, "{}", fragment.color(color))?
                    }
                    _ => writeln!(stdout, "{fragment}")?,
                }
            }
            Output::Write(w) => writeln!(w, "{fragment}")?,
        }

        Ok(())
    }
}
