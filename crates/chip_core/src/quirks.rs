use serde::{Deserialize, Serialize};
use serde_json::{ser::PrettyFormatter, Map, Value};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::errors::ChipError;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Instruction behaviours that differ between historical interpreters.
/// Fields missing from a stored record read as `false`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuirkSettings {
    /// 8XY6 / 8XYE shift VX in place instead of copying VY first.
    #[serde(rename = "ModernShiftQuirk", default)]
    pub modern_shift: bool,
    /// FX55 / FX65 leave the index register untouched.
    #[serde(rename = "ModernLoadStoreQuirk", default)]
    pub modern_load_store: bool,
    /// BNNN jumps to XNN + VX instead of NNN + V0.
    #[serde(rename = "JumpQuirk", default)]
    pub super_chip_jump: bool,
}

impl Default for QuirkSettings {
    fn default() -> Self {
        QuirkSettings {
            modern_shift: false,
            modern_load_store: true,
            super_chip_jump: false,
        }
    }
}

impl QuirkSettings {
    pub fn reset_to_default(&mut self) {
        *self = Self::default();
    }
}

/// JSON file of quirk settings keyed by program file name.
#[derive(Clone, Debug)]
pub struct QuirkStore {
    path: PathBuf,
}

impl QuirkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        QuirkStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored settings for `rom_path`. Programs without a record
    /// get the defaults, which are written back immediately.
    pub fn load(&self, rom_path: &Path) -> Result<QuirkSettings, ChipError> {
        let mut quirks = QuirkSettings::default();
        self.load_into(rom_path, &mut quirks)?;
        Ok(quirks)
    }

    /// Replaces `quirks` with the stored record for `rom_path`, or resets it
    /// when there is none. The record is written back in full either way.
    pub fn load_into(&self, rom_path: &Path, quirks: &mut QuirkSettings) -> Result<(), ChipError> {
        let key = program_key(rom_path);
        if !self.path.exists() {
            self.write_records(&Map::new())?;
        }
        let records = self.read_records()?;
        match records.get(&key) {
            Some(record) => {
                *quirks = serde_json::from_value(record.clone())
                    .map_err(|source| self.format_error(source))?;
                tracing::debug!(program = %key, ?quirks, "loaded quirks");
            }
            None => {
                quirks.reset_to_default();
                tracing::debug!(program = %key, "no stored quirks, using defaults");
            }
        }
        self.save(rom_path, quirks)
    }

    /// Overwrites the record for `rom_path`, keeping every other program's record.
    pub fn save(&self, rom_path: &Path, quirks: &QuirkSettings) -> Result<(), ChipError> {
        let key = program_key(rom_path);
        let mut records = if self.path.exists() {
            self.read_records()?
        } else {
            Map::new()
        };
        let record = serde_json::to_value(quirks).map_err(|source| self.format_error(source))?;
        records.insert(key.clone(), record);
        self.write_records(&records)?;
        tracing::debug!(program = %key, ?quirks, path = %self.path.display(), "saved quirks");
        Ok(())
    }

    fn read_records(&self) -> Result<Map<String, Value>, ChipError> {
        let text = fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        serde_json::from_str(&text).map_err(|source| self.format_error(source))
    }

    fn write_records(&self, records: &Map<String, Value>) -> Result<(), ChipError> {
        let mut out = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
        records
            .serialize(&mut ser)
            .map_err(|source| self.format_error(source))?;
        fs::write(&self.path, out).map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> ChipError {
        ChipError::QuirkStoreIo { path: self.path.clone(), source }
    }

    fn format_error(&self, source: serde_json::Error) -> ChipError {
        ChipError::QuirkStoreFormat { path: self.path.clone(), source }
    }
}

impl Default for QuirkStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_PATH)
    }
}

/// Records are keyed by the file name alone so the same ROM matches from any directory.
pub fn program_key(rom_path: &Path) -> String {
    rom_path
        .file_name()
        .unwrap_or(rom_path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
