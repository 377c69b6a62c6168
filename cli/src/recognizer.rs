//! Subprocess-backed recognition adapter
//!
//! Runs a configured recognition command (by default `pix2text`) with
//! the image path as its final argument and treats stdout as the
//! recognized markup, one expression per line.

use mathnotes::{normalize_recognized, MathError, MathResult, Recognizer};
use std::path::Path;
use std::process::Command;

pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
}

impl CommandRecognizer {
    /// `command` is a whitespace-separated program and fixed arguments,
    /// e.g. `"pix2text --no-line-break"`.
    pub fn new(command: &str) -> Self {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_else(|| "pix2text".to_string());
        Self {
            program,
            args: parts.collect(),
        }
    }
}

impl Recognizer for CommandRecognizer {
    fn recognize(&self, image: &Path) -> MathResult<String> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(image)
            .output()
            .map_err(|e| {
                MathError::Recognize(format!("failed to launch '{}': {}", self.program, e))
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MathError::Recognize(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        let text = String::from_utf8_lossy(&output.stdout);
        Ok(normalize_recognized(&text))
    }
}
