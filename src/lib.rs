//! A CHIP-8 virtual machine core.
//!
//! [`interpreter::ChipState`] owns the whole machine and executes one
//! instruction per [`cycle`](interpreter::ChipState::cycle). It implements
//! [`chip8_base::Interpreter`] so it can be handed straight to
//! [`chip8_base::run`].

pub mod interpreter;

pub use interpreter::{ChipState, Config, CycleReport, Fault, KeyWaitEdge, LoadError, TickMode};
