use crate::EmulatorConfig;
use clap::Parser;
use std::path::PathBuf;

/// Wall-clock time handed to the RTC at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtcTime {
    pub days: u16,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

#[derive(Parser, Debug, Clone)]
pub struct Args {
    /// Path to the ROM image, loaded at physical address 0
    pub rom: PathBuf,

    /// Number of frames to run
    #[arg(long, default_value_t = 60)]
    pub frames: u64,

    /// Skip LCD frame composition
    #[arg(long)]
    pub headless: bool,

    /// RAM size in bytes (hex: 0x1234 or decimal: 1234)
    #[arg(long, value_parser = parse_hex_or_dec)]
    pub ram_size: Option<u32>,

    /// Initial RTC value as DAYS:HH:MM:SS
    #[arg(long, value_parser = parse_rtc)]
    pub rtc: Option<RtcTime>,

    /// Print the word at this address after the run; may be repeated
    #[arg(long = "peek", value_parser = parse_hex_or_dec)]
    pub peek: Vec<u32>,

    /// Write a save state here after the run
    #[arg(long)]
    pub save_state: Option<PathBuf>,
}

impl Args {
    /// Validate that the arguments are consistent
    pub fn validate(&self) -> Result<(), String> {
        if self.frames == 0 && self.save_state.is_none() && self.peek.is_empty() {
            return Err("--frames 0 needs --peek or --save-state to do anything".to_string());
        }
        self.to_emulator_config()
            .validate()
            .map_err(|e| e.to_string())
    }

    /// Convert Args to EmulatorConfig
    pub fn to_emulator_config(&self) -> EmulatorConfig {
        let mut config = EmulatorConfig::default();
        if let Some(ram_size) = self.ram_size {
            config.ram_size = ram_size;
        }
        config
    }
}

pub fn parse_hex_or_dec(s: &str) -> Result<u32, std::num::ParseIntError> {
    if let Some(hex) = s.strip_prefix("0x") {
        u32::from_str_radix(hex, 16)
    } else {
        s.parse()
    }
}

pub fn parse_rtc(s: &str) -> Result<RtcTime, String> {
    let fields: Vec<&str> = s.split(':').collect();
    let [days, hours, minutes, seconds] = fields[..] else {
        return Err(format!("expected DAYS:HH:MM:SS, got {:?}", s));
    };

    fn field<T: TryFrom<u32>>(value: &str, name: &str, max: u32) -> Result<T, String> {
        let parsed: u32 = value
            .parse()
            .map_err(|_| format!("invalid {}: {:?}", name, value))?;
        if parsed > max {
            return Err(format!("{} out of range: {}", name, parsed));
        }
        T::try_from(parsed).map_err(|_| format!("{} out of range: {}", name, parsed))
    }

    Ok(RtcTime {
        days: field(days, "days", u16::MAX as u32)?,
        hours: field(hours, "hours", 23)?,
        minutes: field(minutes, "minutes", 59)?,
        seconds: field(seconds, "seconds", 59)?,
    })
}

/// Load the ROM image from disk
pub fn load_rom(args: &Args) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    use tracing::info;

    info!("Loading ROM from file: {:?}", args.rom);
    let data = std::fs::read(&args.rom)?;
    let capacity = args.to_emulator_config().rom_size as usize;
    if data.len() > capacity {
        return Err(format!(
            "ROM image is {} bytes, larger than the {} byte flash",
            data.len(),
            capacity
        )
        .into());
    }
    Ok(data)
}
