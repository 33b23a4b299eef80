//! Luxafor CLI tool.

use std::error::Error;
use std::io::{self, Write};
use std::process;

use clap::builder::EnumValueParser;
use clap::{
    crate_description, crate_name, crate_version, value_parser, Arg, ArgAction, ArgMatches,
    Command,
};
use luxafor::{Led, Luxafor, Rgb};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Colors used to test the individual LEDs.
const TESTCOLORS: [Rgb; 6] = [
    Rgb { r: 0xff, g: 0x00, b: 0x00 },
    Rgb { r: 0x00, g: 0xff, b: 0x00 },
    Rgb { r: 0x00, g: 0x00, b: 0xff },
    Rgb { r: 0xff, g: 0x00, b: 0xff },
    Rgb { r: 0xff, g: 0xff, b: 0x00 },
    Rgb { r: 0xff, g: 0xff, b: 0xff },
];

fn main() {
    let matches = cli().get_matches();

    init_logging(matches.get_count("verbose"));

    let devices = match select_devices(&matches) {
        Ok(devices) => devices,
        Err(err) => {
            eprintln!("\x1b[31mError:\x1b[0m {err}");
            process::exit(1);
        },
    };

    let result = match matches.subcommand() {
        Some(("list", _)) => {
            list(&devices);
            Ok(())
        },
        Some(("ledtest", _)) => ledtest(&devices),
        Some((name, sub)) => run(&devices, name, sub),
        None => unreachable!("subcommand is required"),
    };

    match result {
        Ok(()) => (),
        Err(err) => {
            error!(%err, "Command failed");
            eprintln!("\x1b[31mError:\x1b[0m {err}");
            process::exit(1);
        },
    }
}

/// Install the log subscriber.
///
/// `RUST_LOG` takes precedence over the verbosity flags.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

/// Enumerate Luxafors and apply the `--device` filter.
fn select_devices(matches: &ArgMatches) -> Result<Vec<Luxafor>, Box<dyn Error>> {
    let mut devices = luxafor::enumerate()?;

    if let Some(&index) = matches.get_one::<usize>("device") {
        if index >= devices.len() {
            return Err(format!("device {index} not found ({} attached)", devices.len()).into());
        }
        devices = vec![devices.swap_remove(index)];
    }

    Ok(devices)
}

/// Print all attached devices.
fn list(devices: &[Luxafor]) {
    if devices.is_empty() {
        println!("No Luxafor attached.");
    }

    for (i, lux) in devices.iter().enumerate() {
        println!("[{}] {}", i, lux.descriptor().path());
    }
}

/// Apply a single color command to every selected device.
fn run(devices: &[Luxafor], name: &str, matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    if devices.is_empty() {
        return Err("no Luxafor attached (root permissions may be required)".into());
    }

    for lux in devices {
        match name {
            "solid" => lux.solid(required::<Rgb>(matches, "color"))?,
            "set" => {
                let leds: Vec<Led> =
                    matches.get_many::<Led>("led").into_iter().flatten().copied().collect();
                lux.set_many(&leds, required::<Rgb>(matches, "color"))?
            },
            "fade" => lux.fade(
                required::<Led>(matches, "led"),
                required::<Rgb>(matches, "color"),
                required::<u8>(matches, "speed"),
            )?,
            "police" => lux.police(required::<usize>(matches, "loops"))?,
            "off" => lux.off()?,
            name => unreachable!("unknown subcommand {name}"),
        }
    }

    Ok(())
}

/// Mark all individual LEDs in a unique color.
fn ledtest(devices: &[Luxafor]) -> Result<(), Box<dyn Error>> {
    println!("Are you sure you want to test the individual LEDs?");
    println!("\x1b[31mThis will overwrite the current LED colors\x1b[0m.");
    print!(" [y/N] > ");
    let _ = io::stdout().flush();

    // Abort unless the user agrees to overwrite the colors.
    if stdin_nextline().to_lowercase() != "y" {
        println!("Bailing out.");
        return Ok(());
    }

    println!("\nTesting individual LEDs...\n");

    for lux in devices {
        for (led, color) in Led::INDIVIDUAL.iter().zip(TESTCOLORS) {
            println!("Color for LED {:?}: {}", led, color);

            if let Err(err) = lux.set(*led, color) {
                eprintln!("Skipping LED: {err}");
            }
        }
    }

    Ok(())
}

/// Get an argument which always has a value.
fn required<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, name: &str) -> T {
    match matches.get_one::<T>(name) {
        Some(value) => value.clone(),
        None => unreachable!("missing required argument {name}"),
    }
}

/// Read next line from STDIN.
#[inline]
fn stdin_nextline() -> String {
    let mut input = String::new();

    let _ = io::stdin().read_line(&mut input);
    input = input.trim().to_string();

    input
}

/// Get clap CLI parameters.
fn cli() -> Command {
    let color = Arg::new("color")
        .help("LED color in RGB [0xRRGGBB]")
        .required(true)
        .value_parser(value_parser!(Rgb));
    let led = Arg::new("led")
        .help("LED target")
        .required(true)
        .ignore_case(true)
        .value_parser(EnumValueParser::<Led>::new());

    Command::new(crate_name!())
        .version(crate_version!())
        .about(crate_description!())
        .subcommand_required(true)
        .arg(
            Arg::new("device")
                .help("Index of the device to control [default: all]")
                .long("device")
                .short('d')
                .global(true)
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("verbose")
                .help("Increase log verbosity")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count),
        )
        .subcommand(Command::new("list").about("List attached devices"))
        .subcommand(Command::new("solid").about("Set all LEDs to a color").arg(color.clone()))
        .subcommand(
            Command::new("set")
                .about("Set LEDs to a static color")
                .arg(led.clone().num_args(1..).action(ArgAction::Append))
                .arg(color.clone().long("color").short('c')),
        )
        .subcommand(
            Command::new("fade")
                .about("Fade LEDs to a color")
                .arg(led)
                .arg(color)
                .arg(
                    Arg::new("speed")
                        .help("Fade speed [possible values: 0..=255]")
                        .long("speed")
                        .short('s')
                        .default_value("128")
                        .value_parser(value_parser!(u8)),
                ),
        )
        .subcommand(
            Command::new("police").about("Run the police animation").arg(
                Arg::new("loops")
                    .help("Number of animation cycles")
                    .long("loops")
                    .short('l')
                    .default_value("5")
                    .value_parser(value_parser!(usize)),
            ),
        )
        .subcommand(Command::new("off").about("Turn all LEDs off"))
        .subcommand(Command::new("ledtest").about("Test individual LEDs"))
}
