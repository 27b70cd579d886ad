//! Command grammar
//!
//! A raw command is `KIND` or `KIND: parameter`. Parsing validates the kind
//! against the closed [`InstructionKind`] set; synonyms and sugar are resolved
//! later by [`Instruction::route`] so that the parsed form keeps the kind the
//! producer actually wrote.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ParseError;

/// Every instruction kind accepted on the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstructionKind {
    Print,
    CreateFile,
    SpeakNow,
    UpdateMemory,
    RunModule,
    RestartSystem,
    LoadScript,
    SetMode,
    VoiceSpeak,
    MemoryBackup,
    UpdateBrain,
}

impl InstructionKind {
    pub const ALL: [InstructionKind; 11] = [
        InstructionKind::Print,
        InstructionKind::CreateFile,
        InstructionKind::SpeakNow,
        InstructionKind::UpdateMemory,
        InstructionKind::RunModule,
        InstructionKind::RestartSystem,
        InstructionKind::LoadScript,
        InstructionKind::SetMode,
        InstructionKind::VoiceSpeak,
        InstructionKind::MemoryBackup,
        InstructionKind::UpdateBrain,
    ];

    /// Wire name as written by producers
    pub fn as_str(&self) -> &'static str {
        match self {
            InstructionKind::Print => "PRINT",
            InstructionKind::CreateFile => "CREATE_FILE",
            InstructionKind::SpeakNow => "SPEAK_NOW",
            InstructionKind::UpdateMemory => "UPDATE_MEMORY",
            InstructionKind::RunModule => "RUN_MODULE",
            InstructionKind::RestartSystem => "RESTART_SYSTEM",
            InstructionKind::LoadScript => "LOAD_SCRIPT",
            InstructionKind::SetMode => "SET_MODE",
            InstructionKind::VoiceSpeak => "VOICE_SPEAK",
            InstructionKind::MemoryBackup => "MEMORY_BACKUP",
            InstructionKind::UpdateBrain => "UPDATE_BRAIN",
        }
    }

    /// Look up a kind by its exact (already uppercased) wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// The handler slot this kind is executed by
    pub fn handler_kind(&self) -> HandlerKind {
        match self {
            InstructionKind::Print => HandlerKind::Print,
            InstructionKind::CreateFile => HandlerKind::CreateFile,
            InstructionKind::SpeakNow | InstructionKind::VoiceSpeak => HandlerKind::Speak,
            InstructionKind::UpdateMemory | InstructionKind::SetMode | InstructionKind::UpdateBrain => {
                HandlerKind::UpdateMemory
            }
            InstructionKind::RunModule => HandlerKind::RunModule,
            InstructionKind::RestartSystem => HandlerKind::RestartSystem,
            InstructionKind::LoadScript => HandlerKind::LoadScript,
            InstructionKind::MemoryBackup => HandlerKind::MemoryBackup,
        }
    }
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstructionKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_uppercase();
        Self::from_name(&name).ok_or(ParseError::UnknownKind(name))
    }
}

/// Handler slots after synonym and sugar normalization
///
/// This is the key space of the effect registry; it is smaller than
/// [`InstructionKind`] because several kinds share one handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HandlerKind {
    Print,
    CreateFile,
    Speak,
    UpdateMemory,
    RunModule,
    RestartSystem,
    LoadScript,
    MemoryBackup,
}

impl HandlerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerKind::Print => "PRINT",
            HandlerKind::CreateFile => "CREATE_FILE",
            HandlerKind::Speak => "SPEAK_NOW",
            HandlerKind::UpdateMemory => "UPDATE_MEMORY",
            HandlerKind::RunModule => "RUN_MODULE",
            HandlerKind::RestartSystem => "RESTART_SYSTEM",
            HandlerKind::LoadScript => "LOAD_SCRIPT",
            HandlerKind::MemoryBackup => "MEMORY_BACKUP",
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed, validated form of a raw command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub kind: InstructionKind,
    pub parameter: String,
}

/// An instruction resolved to its handler slot and final parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedInstruction {
    pub handler: HandlerKind,
    pub parameter: String,
}

impl Instruction {
    pub fn new(kind: InstructionKind, parameter: impl Into<String>) -> Self {
        Self {
            kind,
            parameter: parameter.into(),
        }
    }

    /// Parse a raw command string
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnknownKind` carrying the uppercased kind when it
    /// is not part of the instruction set.
    ///
    /// # Example
    ///
    /// ```
    /// use cmdgate_core::instruction::{Instruction, InstructionKind};
    ///
    /// let ins = Instruction::parse("update_memory: a=b=c").unwrap();
    /// assert_eq!(ins.kind, InstructionKind::UpdateMemory);
    /// assert_eq!(ins.parameter, "a=b=c");
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let trimmed = raw.trim();
        let (kind, parameter) = match trimmed.split_once(':') {
            Some((kind, parameter)) => (kind, parameter.trim()),
            None => (trimmed, ""),
        };

        let kind: InstructionKind = kind.parse()?;
        Ok(Self::new(kind, parameter))
    }

    /// Resolve synonyms and sugar into a handler slot
    ///
    /// `SET_MODE` and `UPDATE_BRAIN` become memory updates of
    /// `operational_mode` and `brain_knowledge`; the parameter text is
    /// appended verbatim, so any `=` it contains ends up in the value.
    pub fn route(&self) -> RoutedInstruction {
        let parameter = match self.kind {
            InstructionKind::SetMode => format!("operational_mode={}", self.parameter),
            InstructionKind::UpdateBrain => format!("brain_knowledge={}", self.parameter),
            _ => self.parameter.clone(),
        };

        RoutedInstruction {
            handler: self.kind.handler_kind(),
            parameter,
        }
    }
}

impl FromStr for Instruction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Shorthand for [`Instruction::parse`]
///
/// # Errors
///
/// See [`Instruction::parse`].
pub fn parse(raw: &str) -> Result<Instruction, ParseError> {
    Instruction::parse(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_parameter() {
        let ins = parse("PRINT: hi").unwrap();
        assert_eq!(ins, Instruction::new(InstructionKind::Print, "hi"));
    }

    #[test]
    fn test_parse_without_separator_uppercases_kind() {
        let ins = parse("restart_system").unwrap();
        assert_eq!(ins.kind, InstructionKind::RestartSystem);
        assert_eq!(ins.parameter, "");
    }

    #[test]
    fn test_parse_splits_on_first_colon_only() {
        let ins = parse("  print :  time is 12:30  ").unwrap();
        assert_eq!(ins.kind, InstructionKind::Print);
        assert_eq!(ins.parameter, "time is 12:30");
    }

    #[test]
    fn test_parse_unknown_kind_carries_uppercased_name() {
        assert_eq!(
            parse("foo: bar"),
            Err(ParseError::UnknownKind("FOO".to_string()))
        );
    }

    #[test]
    fn test_parse_empty_command_is_unknown() {
        assert_eq!(parse("   "), Err(ParseError::UnknownKind(String::new())));
    }

    #[test]
    fn test_every_kind_round_trips_through_its_name() {
        for kind in InstructionKind::ALL {
            assert_eq!(InstructionKind::from_name(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_speak_synonyms_share_a_handler() {
        assert_eq!(InstructionKind::SpeakNow.handler_kind(), HandlerKind::Speak);
        assert_eq!(InstructionKind::VoiceSpeak.handler_kind(), HandlerKind::Speak);
    }

    #[test]
    fn test_set_mode_routes_to_memory_update() {
        let routed = parse("SET_MODE: fast").unwrap().route();
        assert_eq!(routed.handler, HandlerKind::UpdateMemory);
        assert_eq!(routed.parameter, "operational_mode=fast");
    }

    #[test]
    fn test_update_brain_keeps_literal_equals() {
        let routed = parse("UPDATE_BRAIN: x=y=z").unwrap().route();
        assert_eq!(routed.handler, HandlerKind::UpdateMemory);
        assert_eq!(routed.parameter, "brain_knowledge=x=y=z");
    }

    #[test]
    fn test_plain_kind_routes_parameter_unchanged() {
        let routed = parse("CREATE_FILE: notes.txt").unwrap().route();
        assert_eq!(routed.handler, HandlerKind::CreateFile);
        assert_eq!(routed.parameter, "notes.txt");
    }
}
