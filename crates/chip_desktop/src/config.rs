use chip_core::{globals::DEFAULT_INSTRUCTIONS_PER_SECOND, quirks::DEFAULT_CONFIG_PATH};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "chip_desktop", version, about = "CHIP-8 interpreter")]
struct Args {
    /// Program to run.
    rom: PathBuf,

    /// Quirk settings file, keyed by program file name.
    #[arg(long, env = "CHIP8_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Instructions executed per second (1-1000).
    #[arg(long, default_value_t = DEFAULT_INSTRUCTIONS_PER_SECOND)]
    ips: u32,

    /// Window pixels per display pixel.
    #[arg(long, default_value_t = 10)]
    scale: u32,

    /// Seed for the random instruction, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Log filter (tracing-subscriber EnvFilter syntax).
    #[arg(long, env = "CHIP8_LOG", default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub rom: PathBuf,
    pub quirk_store: PathBuf,
    pub instructions_per_second: u32,
    pub scale: u32,
    pub seed: Option<u64>,
    pub log_level: String,
}

impl Config {
    pub fn load() -> Self {
        let args = Args::parse();
        Config {
            rom: args.rom,
            quirk_store: args.config,
            instructions_per_second: args.ips,
            scale: args.scale.max(1),
            seed: args.seed,
            log_level: args.log_level,
        }
    }
}
