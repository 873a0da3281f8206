use std::path::PathBuf;
use std::time::Duration;

use structopt::StructOpt;

use fake_chip_8::emulator::rom::read_rom;
use fake_chip_8::emulator::{Emulator, Result};

mod crossterm_io;
mod key_latch;
mod key_manager;
use crossterm_io::{CrosstermInput, CrosstermOutput};
use key_manager::KeyManager;

/// The program options.
#[derive(StructOpt)]
struct Opt {
    /// Milliseconds to wait between instructions
    #[structopt(short, long, default_value = "8")]
    cycle_ms: u64,

    /// Seed for the random number instruction
    #[structopt(long)]
    seed: Option<u64>,

    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Get configuration and read input file
    let opt = Opt::from_args();
    log::info!("Executing {:?}", &opt.input);
    let program = read_rom(&opt.input)?;

    let key_manager = KeyManager::new();

    // Load instructions into emulator memory
    let mut emulator = Emulator::with_io(
        CrosstermInput::new(&key_manager),
        CrosstermOutput::new()?
    );
    if let Some(seed) = opt.seed {
        emulator.seed_rng(seed);
    }
    emulator.load(&program)?;

    // Start execution
    let result = run(&mut emulator, &key_manager, Duration::from_millis(opt.cycle_ms));

    // Give the terminal back before reporting anything
    drop(emulator);
    if let Err(e) = &result {
        log::error!("Emulator stopped: {}", e);
    }
    result.map_err(Into::into)
}

fn run(emulator: &mut Emulator<CrosstermInput<'_>, CrosstermOutput>, key_manager: &KeyManager, cycle: Duration) -> Result<()> {
    loop {
        if key_manager.quit_requested() {
            emulator.request_stop();
        }
        if !emulator.step()? {
            log::info!("Program finished at {:#05x}", emulator.program_counter());
            return Ok(());
        }
        std::thread::sleep(cycle);
    }
}
