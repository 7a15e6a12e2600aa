pub mod config;
pub mod decode;
pub mod error;
mod execute;
pub mod font;
mod keywait;

use std::ops::Range;
use std::path::Path;
use std::time::Duration;

use chip8_base::{Display, Interpreter, Keys, Pixel};
use log::{debug, error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub use config::{Config, KeyWaitEdge, TickMode};
pub use decode::Instruction;
pub use error::{Fault, LoadError};

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: usize = 0x200;
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START;
pub const STACK_DEPTH: usize = 16;
pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// Register 15 doubles as the carry/borrow/collision flag.
pub const VF: usize = 0xF;

pub type FrameBuffer = [[bool; WIDTH]; HEIGHT];

/// Outcome of a single fetch-decode-execute step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// The word fetched this cycle, 0 if the fetch itself faulted.
    pub instruction: u16,
    /// Program counter after the cycle.
    pub program_counter: u16,
    pub fault: Option<Fault>,
}

impl CycleReport {
    pub fn is_ok(&self) -> bool {
        self.fault.is_none()
    }
}

pub struct ChipState {
    memory: [u8; MEMORY_SIZE],
    program_counter: u16,
    /// Number of return addresses on the stack, 0 when empty.
    stack_pointer: u8,
    stack: [u16; STACK_DEPTH],
    registers: [u8; 16],
    index_register: u16,
    delay_timer: u8,
    sound_timer: u8,
    frame_buffer: FrameBuffer,
    key_state: Keys,
    prev_key_state: Keys,
    awaiting_key: bool,
    display_dirty: bool,
    halted: bool,
    rng: StdRng,
    config: Config,
}

impl Interpreter for ChipState {
    fn step(&mut self, keys: &Keys) -> Option<Display> {
        if self.halted {
            return None;
        }
        self.set_keys(keys);

        let report = self.cycle(self.config.tick_mode);
        if let Some(fault) = report.fault {
            error!(
                "halting: {} (last instruction {:#06x}, pc {:#05x})",
                fault, report.instruction, report.program_counter
            );
            self.halted = true;
        }
        self.take_display()
    }

    fn speed(&self) -> Duration {
        self.config.clock_speed()
    }

    fn buzzer_active(&self) -> bool {
        !self.halted && self.sound_timer != 0
    }
}

impl ChipState {
    pub fn new(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Build a machine drawing `Cxkk` bytes from `rng`.
    pub fn with_rng(config: Config, rng: StdRng) -> Self {
        let mut memory = [0_u8; MEMORY_SIZE];
        memory[font::FONT_ADDR..font::FONT_ADDR + font::FONT.len()].copy_from_slice(&font::FONT);

        ChipState {
            memory,
            program_counter: PROGRAM_START as u16,
            stack_pointer: 0,
            stack: [0; STACK_DEPTH],
            registers: [0; 16],
            index_register: 0,
            delay_timer: 0,
            sound_timer: 0,
            frame_buffer: [[false; WIDTH]; HEIGHT],
            key_state: [false; 16],
            prev_key_state: [false; 16],
            awaiting_key: false,
            display_dirty: true,
            halted: false,
            rng,
            config,
        }
    }

    /// Return to the power-on state, keeping configuration and random source.
    pub fn reset(&mut self) {
        let rng = self.rng.clone();
        *self = Self::with_rng(self.config, rng);
    }

    pub fn load(&mut self, filename: impl AsRef<Path>) -> Result<&mut Self, LoadError> {
        let program = std::fs::read(filename)?;
        self.load_program(&program)
    }

    pub fn load_program(&mut self, program: &[u8]) -> Result<&mut Self, LoadError> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(LoadError::TooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }
        if program.len() % 2 != 0 {
            return Err(LoadError::OddLength {
                size: program.len(),
            });
        }
        self.memory[PROGRAM_START..PROGRAM_START + program.len()].copy_from_slice(program);
        self.program_counter = PROGRAM_START as u16;
        info!("loaded {} byte program at {:#05x}", program.len(), PROGRAM_START);
        Ok(self)
    }

    /// Run exactly one fetch-decode-execute step.
    pub fn cycle(&mut self, mode: TickMode) -> CycleReport {
        let instruction = match self.fetch() {
            Ok(instruction) => instruction,
            Err(fault) => {
                return CycleReport {
                    instruction: 0,
                    program_counter: self.program_counter,
                    fault: Some(fault),
                }
            }
        };

        let fault = self.dispatch(instruction, mode).err();
        if fault.is_none() {
            self.delay_timer = self.delay_timer.saturating_sub(1);
            self.sound_timer = self.sound_timer.saturating_sub(1);
        }

        CycleReport {
            instruction,
            program_counter: self.program_counter,
            fault,
        }
    }

    fn fetch(&mut self) -> Result<u16, Fault> {
        let pc = self.program_counter as usize;
        if pc + 1 >= MEMORY_SIZE {
            return Err(Fault::OutOfBounds { address: pc });
        }
        let instruction = u16::from_be_bytes([self.memory[pc], self.memory[pc + 1]]);
        self.program_counter += 2;
        Ok(instruction)
    }

    fn dispatch(&mut self, raw: u16, mode: TickMode) -> Result<(), Fault> {
        // 0000 is padding
        if raw == 0 {
            return Ok(());
        }
        let instruction = Instruction::decode(raw);
        if mode == TickMode::Traced {
            self.trace(&instruction);
        }
        self.execute(instruction)
    }

    fn trace(&self, i: &Instruction) {
        debug!(
            "instr {:#06x} family {:#x} nnn {:#05x} x {:#x} y {:#x} n {:#x} kk {:#04x} pc {:#05x} i {:#05x} sp {} v {:02x?} awaiting key {}",
            i.raw,
            i.family,
            i.nnn,
            i.x,
            i.y,
            i.n,
            i.kk,
            self.program_counter,
            self.index_register,
            self.stack_pointer,
            self.registers,
            self.awaiting_key,
        );
    }

    /// Memory range `[start, start + len)`, or the first address past the end.
    fn span(&self, start: usize, len: usize) -> Result<Range<usize>, Fault> {
        if start + len > MEMORY_SIZE {
            return Err(Fault::OutOfBounds {
                address: start.max(MEMORY_SIZE),
            });
        }
        Ok(start..start + len)
    }

    fn set_flag(&mut self, flag: bool) {
        self.registers[VF] = flag as u8;
    }

    pub fn set_keys(&mut self, keys: &Keys) {
        self.key_state = *keys;
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame_buffer
    }

    pub fn display_dirty(&self) -> bool {
        self.display_dirty
    }

    /// The frame buffer as host pixels if a redraw is owed, clearing the flag.
    pub fn take_display(&mut self) -> Option<Display> {
        if !self.display_dirty {
            return None;
        }
        self.display_dirty = false;

        let lit = Pixel::try_from(1_u8).unwrap_or_default();
        let mut display = [[Pixel::default(); WIDTH]; HEIGHT];
        for (row, pixels) in display.iter_mut().zip(self.frame_buffer.iter()) {
            for (pixel, &on) in row.iter_mut().zip(pixels.iter()) {
                if on {
                    *pixel = lit;
                }
            }
        }
        Some(display)
    }

    pub fn awaiting_key(&self) -> bool {
        self.awaiting_key
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn register(&self, index: usize) -> u8 {
        self.registers[index & 0xF]
    }

    pub fn index_register(&self) -> u16 {
        self.index_register
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Fixed-seed machine with `program` loaded at 0x200.
#[cfg(test)]
pub(crate) fn test_machine(program: &[u8]) -> ChipState {
    let mut chip = ChipState::new(Config {
        seed: Some(0xC8),
        ..Config::default()
    });
    chip.load_program(program).unwrap();
    chip
}
