// Separately:
// CPU: 700 times per second by default
// Display: 60 times per second
// Timer: every cycle, or 60 times per second with --timer-mode sixty-hz

use std::error::Error;

use clap::Parser;
use emuchip::{timer::TickClock, Emulator, TimerMode};
use log::info;

mod cli;
mod frontend;

use cli::Args;
use frontend::Frontend;

// keeps a stalled frame from turning into a burst of catch-up cycles
const MAX_CYCLES_PER_FRAME: u32 = 64;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut emu = Emulator::with_config(args.config());
    emu.load_rom_by_file(&args.rom)?;
    info!("running {} with {:?}", args.rom.display(), emu.config());

    let mut frontend = Frontend::new(args.window_scale())?;
    let mut cpu_clock = TickClock::new(args.cycles_per_second);
    let mut timer_clock = TickClock::sixty_hz();
    let external_timers = emu.config().timer_mode == TimerMode::External;

    while frontend.is_running() {
        frontend.sync_keys(emu.keyboard_mut())?;

        for _ in 0..cpu_clock.due().min(MAX_CYCLES_PER_FRAME) {
            match emu.execute_cycle() {
                Ok(_) => {}
                // logged by the emulator, pc still points at the fault so it is retried
                Err(_) => {}
            }
        }
        if external_timers {
            for _ in 0..timer_clock.due() {
                emu.tick_timers();
            }
        }

        frontend.sync_display(emu.display_mut())?;
    }
    Ok(())
}
