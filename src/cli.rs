use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use emuchip::{BorrowFlag, Config, TimerMode};
use minifb::Scale;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerArg {
    /// Count down once per executed instruction
    PerCycle,
    /// Count down at 60Hz of wall clock time
    SixtyHz,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowArg {
    /// 8XY7 sets VF when VY - VX is non-zero
    Legacy,
    /// 8XY7 sets VF when VY >= VX
    Canonical,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleArg {
    X4,
    X8,
    X16,
    X32,
}

#[derive(Parser, Debug)]
#[command(name = "emuchip", about = "CHIP-8 interpreter - ESC to exit")]
pub struct Args {
    /// Raw program image, loaded at 0x200
    #[arg(value_name = "ROM")]
    pub rom: PathBuf,

    #[arg(
        long,
        default_value_t = 700,
        value_parser = clap::value_parser!(u64).range(1..=1_000_000)
    )]
    pub cycles_per_second: u64,

    #[arg(long, value_enum, default_value_t = TimerArg::PerCycle)]
    pub timer_mode: TimerArg,

    #[arg(long, value_enum, default_value_t = BorrowArg::Legacy)]
    pub borrow_flag: BorrowArg,

    /// Fixed seed for CXKK, random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = ScaleArg::X16)]
    pub scale: ScaleArg,
}

impl Args {
    pub fn config(&self) -> Config {
        Config {
            timer_mode: match self.timer_mode {
                TimerArg::PerCycle => TimerMode::PerCycle,
                TimerArg::SixtyHz => TimerMode::External,
            },
            borrow_flag: match self.borrow_flag {
                BorrowArg::Legacy => BorrowFlag::Legacy,
                BorrowArg::Canonical => BorrowFlag::Canonical,
            },
            seed: self.seed,
        }
    }

    pub fn window_scale(&self) -> Scale {
        match self.scale {
            ScaleArg::X4 => Scale::X4,
            ScaleArg::X8 => Scale::X8,
            ScaleArg::X16 => Scale::X16,
            ScaleArg::X32 => Scale::X32,
        }
    }
}
