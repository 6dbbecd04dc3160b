// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal and JSON lines output modes.

use serde::Serialize;
use std::fmt::Display;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output
    Normal,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    mode: OutputMode,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Print one result record: its `Display` form, or a JSON line.
    pub fn record<T: Serialize + ?Sized>(&self, kind: &str, value: &T, human: impl Display) {
        match self.mode {
            OutputMode::Normal => println!("{human}"),
            OutputMode::Json => {
                if let Some(line) = json_line(kind, value) {
                    println!("{line}");
                }
            }
        }
    }

    /// Print a success message.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => println!("{message}"),
            OutputMode::Json => {
                let event = JsonEvent {
                    event: "success",
                    message,
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    println!("{json}");
                }
            }
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => eprintln!("Error: {message}"),
            OutputMode::Json => {
                let event = JsonEvent {
                    event: "error",
                    message,
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    eprintln!("{json}");
                }
            }
        }
    }
}

fn json_line<T: Serialize + ?Sized>(kind: &str, value: &T) -> Option<String> {
    serde_json::to_string(&JsonRecord { kind, data: value }).ok()
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
}

#[derive(Serialize)]
struct JsonRecord<'a, T: Serialize + ?Sized> {
    kind: &'a str,
    data: &'a T,
}
