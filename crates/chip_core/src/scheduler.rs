use std::time::Duration;

use crate::{
    cpu::Cpu,
    errors::ChipError,
    globals::{
        DEFAULT_INSTRUCTIONS_PER_SECOND, MAX_INSTRUCTIONS_PER_SECOND, MIN_INSTRUCTIONS_PER_SECOND,
        TIMER_HZ,
    },
};

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Turns elapsed wall clock time into instruction steps and 60Hz timer ticks.
/// The two rates keep separate accumulators, counted in billionths of a step,
/// so no time is lost to rounding between frames.
pub struct Scheduler {
    instructions_per_second: u32,
    instruction_acc: u128,
    timer_acc: u128,
}
impl Scheduler {
    pub fn new(instructions_per_second: u32) -> Self {
        Scheduler {
            instructions_per_second: clamp_rate(instructions_per_second),
            instruction_acc: 0,
            timer_acc: 0,
        }
    }
    pub fn instructions_per_second(&self) -> u32 {
        self.instructions_per_second
    }
    pub fn set_instructions_per_second(&mut self, rate: u32) {
        self.instructions_per_second = clamp_rate(rate);
    }
    /// Runs every step and timer tick that fell due during `elapsed`.
    /// Returns the number of instructions executed.
    pub fn advance(&mut self, cpu: &mut Cpu, elapsed: Duration) -> Result<usize, ChipError> {
        let nanos = elapsed.as_nanos();
        self.instruction_acc += nanos * self.instructions_per_second as u128;
        self.timer_acc += nanos * TIMER_HZ as u128;

        let mut executed = 0;
        while self.instruction_acc >= NANOS_PER_SEC {
            self.instruction_acc -= NANOS_PER_SEC;
            cpu.step()?;
            executed += 1;
        }
        while self.timer_acc >= NANOS_PER_SEC {
            self.timer_acc -= NANOS_PER_SEC;
            cpu.decrement_timers();
        }
        Ok(executed)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(DEFAULT_INSTRUCTIONS_PER_SECOND)
    }
}

fn clamp_rate(rate: u32) -> u32 {
    rate.clamp(MIN_INSTRUCTIONS_PER_SECOND, MAX_INSTRUCTIONS_PER_SECOND)
}
