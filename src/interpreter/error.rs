use std::io;

/// Reasons a cycle can trap. Every fault is terminal for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Fault {
    #[error("memory access out of bounds at {address:#06x}")]
    OutOfBounds { address: usize },

    #[error("illegal instruction {instruction:#06x}")]
    IllegalInstruction { instruction: u16 },

    #[error("stack overflow calling {address:#05x}")]
    StackOverflow { address: u16 },

    #[error("stack underflow: return with empty call stack")]
    StackUnderflow,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("could not read program: {0}")]
    Io(#[from] io::Error),

    #[error("program is too large ({size} bytes), max size is {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("program has odd length ({size} bytes), instructions are two bytes")]
    OddLength { size: usize },
}
