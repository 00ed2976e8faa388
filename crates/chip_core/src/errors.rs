use std::{io, path::PathBuf};
use thiserror::Error;

use crate::globals::STACK_SIZE;

#[derive(Debug, Error)]
pub enum ChipError {
    #[error("failed to read program {path}: {source}")]
    ProgramRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("program contains no data")]
    EmptyProgram,
    #[error("return at {pc:#06X} with an empty call stack")]
    StackUnderflow { pc: u16 },
    #[error("call at {pc:#06X} exceeds the maximum stack depth of {STACK_SIZE}")]
    StackOverflow { pc: u16 },
    #[error("quirk store {path}: {source}")]
    QuirkStoreIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("quirk store {path} is malformed: {source}")]
    QuirkStoreFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
