//! Text-to-speech through whatever engine the platform provides
//!
//! Engines are tried in order; the first one that starts and exits cleanly
//! wins. Text is passed as an argument or on stdin, never interpolated into
//! a shell command line.

use cmdgate_core::{EffectHandler, HandlerError};
use std::io::Write;
use std::process::{Command, Stdio};

/// How the text reaches the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInput {
    Argument,
    Stdin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtsEngine {
    pub program: String,
    pub args: Vec<String>,
    pub input: TextInput,
}

impl TtsEngine {
    pub fn new(program: impl Into<String>, args: &[&str], input: TextInput) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            input,
        }
    }

    fn speak(&self, text: &str) -> Result<(), String> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let status = match self.input {
            TextInput::Argument => command
                .arg(text)
                .stdin(Stdio::null())
                .status()
                .map_err(|e| format!("{}: {}", self.program, e))?,
            TextInput::Stdin => {
                let mut child = command
                    .stdin(Stdio::piped())
                    .spawn()
                    .map_err(|e| format!("{}: {}", self.program, e))?;
                if let Some(mut stdin) = child.stdin.take() {
                    stdin
                        .write_all(text.as_bytes())
                        .map_err(|e| format!("{}: {}", self.program, e))?;
                }
                child
                    .wait()
                    .map_err(|e| format!("{}: {}", self.program, e))?
            }
        };

        if status.success() {
            Ok(())
        } else {
            Err(format!("{}: exited with {}", self.program, status))
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpeakEffect {
    engines: Vec<TtsEngine>,
}

impl SpeakEffect {
    pub fn with_engines(engines: Vec<TtsEngine>) -> Self {
        Self { engines }
    }

    /// `say` on macOS, SAPI through PowerShell on Windows, otherwise
    /// `espeak` then `festival`
    pub fn platform_default() -> Self {
        let engines = if cfg!(target_os = "macos") {
            vec![TtsEngine::new("say", &[], TextInput::Argument)]
        } else if cfg!(windows) {
            vec![TtsEngine::new(
                "powershell",
                &[
                    "-NoProfile",
                    "-Command",
                    "Add-Type -AssemblyName System.Speech; \
                     (New-Object System.Speech.Synthesis.SpeechSynthesizer).Speak([Console]::In.ReadToEnd())",
                ],
                TextInput::Stdin,
            )]
        } else {
            vec![
                TtsEngine::new("espeak", &[], TextInput::Argument),
                TtsEngine::new("festival", &["--tts"], TextInput::Stdin),
            ]
        };
        Self { engines }
    }
}

impl EffectHandler for SpeakEffect {
    fn execute(&self, parameter: &str) -> Result<String, HandlerError> {
        let mut failures = Vec::new();
        for engine in &self.engines {
            match engine.speak(parameter) {
                Ok(()) => return Ok(format!("Speaking: {}", parameter)),
                Err(reason) => failures.push(reason),
            }
        }

        if failures.is_empty() {
            failures.push("no engine configured".to_string());
        }
        Err(HandlerError::new(format!(
            "TTS not available: {}",
            failures.join("; ")
        )))
    }
}
