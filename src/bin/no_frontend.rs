use std::path::PathBuf;
use std::time::Duration;

use structopt::StructOpt;

use fake_chip_8::emulator::rom::read_rom;
use fake_chip_8::emulator::{input::DummyInput, output::DummyOutput};
use fake_chip_8::emulator::{Emulator, Result};

/// Run a program without a screen or keyboard, then print the final screen.
#[derive(StructOpt)]
struct Opt {
    /// Milliseconds to wait between instructions
    #[structopt(short, long, default_value = "0")]
    cycle_ms: u64,

    /// Give up after this many steps
    #[structopt(long, default_value = "100000")]
    max_steps: u64,

    /// Seed for the random number instruction
    #[structopt(long)]
    seed: Option<u64>,

    /// Log every executed instruction
    #[structopt(short, long)]
    trace: bool,

    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();

    // Get configuration and read input file
    let opt = Opt::from_args();
    log::info!("Executing {:?}", &opt.input);
    let program = read_rom(&opt.input)?;

    // Load instructions into emulator memory
    let mut emulator = Emulator::with_io(DummyInput, DummyOutput);
    if let Some(seed) = opt.seed {
        emulator.seed_rng(seed);
    }
    if opt.trace {
        emulator.enable_trace();
    }
    emulator.load(&program)?;

    // Start execution
    let cycle = Duration::from_millis(opt.cycle_ms);
    let mut steps = 0;
    while steps < opt.max_steps {
        let running = emulator.step();
        for line in emulator.drain_trace() {
            log::info!("{}", line);
        }
        steps += 1;
        if !running? {
            break;
        }
        if !cycle.is_zero() {
            std::thread::sleep(cycle);
        }
    }

    if emulator.is_running() {
        log::warn!("Gave up after {} steps", steps);
    } else {
        log::info!("Halted after {} steps", steps);
    }
    print!("{}", emulator.frame_buffer());
    Ok(())
}
