pub mod cpu;
pub mod decode;
pub mod display;
pub mod errors;
mod font;
pub mod globals;
pub mod quirks;
pub mod scheduler;
mod utils;

pub use cpu::Cpu;
pub use decode::Opcode;
pub use errors::ChipError;
pub use quirks::{QuirkSettings, QuirkStore};
pub use scheduler::Scheduler;
