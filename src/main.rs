use std::path::PathBuf;

use chip8_vm::{ChipState, Config, KeyWaitEdge, TickMode};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Edge {
    Release,
    Press,
}

impl From<Edge> for KeyWaitEdge {
    fn from(edge: Edge) -> Self {
        match edge {
            Edge::Release => KeyWaitEdge::Release,
            Edge::Press => KeyWaitEdge::Press,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Run a CHIP-8 program", long_about = None)]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    #[arg(short, long, default_value_t = 60, help = "Instructions per second")]
    clock_freq: u32,

    #[arg(short, long, value_enum, default_value_t = Edge::Release, help = "Key transition that ends Fx0A")]
    key_wait_edge: Edge,

    #[arg(short, long, help = "Log every decoded instruction at debug level")]
    trace: bool,

    #[arg(short, long, help = "Seed for the random number generator")]
    seed: Option<u64>,
}

#[allow(unreachable_code)]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = Config {
        clock_freq: args.clock_freq,
        key_wait_edge: args.key_wait_edge.into(),
        tick_mode: if args.trace {
            TickMode::Traced
        } else {
            TickMode::Normal
        },
        seed: args.seed,
    };

    let mut chip8_vm = ChipState::new(config);
    chip8_vm.load(&args.rom)?;
    chip8_base::run(chip8_vm);
    Ok(())
}
