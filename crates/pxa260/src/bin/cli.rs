use clap::Parser;
use pxa260::{AccessWidth, Args, Emulator, load_rom};
use tracing::info;

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(2);
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load ROM image
    let rom_image = match load_rom(&args) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Failed to load ROM: {}", e);
            std::process::exit(2);
        }
    };

    // Create emulator
    info!("=== Creating Emulator ===");
    let mut emulator = Emulator::new(args.to_emulator_config());
    match emulator.init() {
        Ok((rom, _ram)) => rom[..rom_image.len()].copy_from_slice(&rom_image),
        Err(e) => {
            eprintln!("Failed to initialize emulator: {}", e);
            std::process::exit(2);
        }
    }
    info!("Loaded {} byte ROM image", rom_image.len());

    if let Err(e) = emulator.reset() {
        eprintln!("Reset failed: {}", e);
        std::process::exit(2);
    }
    if let Some(time) = args.rtc {
        emulator.set_rtc(time.days, time.hours, time.minutes, time.seconds);
    }

    // Run emulator
    info!(
        "=== Running {} Frames{} ===",
        args.frames,
        if args.headless { " (Headless)" } else { "" }
    );
    for _ in 0..args.frames {
        if let Err(e) = emulator.execute(!args.headless) {
            eprintln!("Emulator error: {}", e);
            std::process::exit(2);
        }
    }

    // Log final state
    info!("=== Emulation Complete ===");
    emulator.print_final_state();

    for &address in &args.peek {
        match emulator.read_arbitrary_memory(address, AccessWidth::Word) {
            u64::MAX => println!("{:#010X}: <invalid>", address),
            value => println!("{:#010X}: {:#010X}", address, value),
        }
    }

    if let Some(path) = &args.save_state {
        let mut buf = vec![0u8; emulator.state_size()];
        if let Err(e) = emulator.save_state(&mut buf) {
            eprintln!("Failed to save state: {}", e);
            std::process::exit(1);
        }
        if let Err(e) = std::fs::write(path, &buf) {
            eprintln!("Failed to write {:?}: {}", path, e);
            std::process::exit(1);
        }
        info!("Saved {} byte state to {:?}", buf.len(), path);
    }
}
