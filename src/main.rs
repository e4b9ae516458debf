//! Command line front end of the coordinate codec
//!
//! Usage: `coordkit [--config FILE] [--preset NAME] <command> ...`

use std::error::Error as StdError;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use coordkit::{
    batch, CoordinateCodec, CoordinateSearch, DisplayFormat, DisplayPreset, GeoPoint, HeightUnit, ReferenceSystem,
    Settings,
};

type CliResult = std::result::Result<(), Box<dyn StdError>>;

#[derive(Parser, Debug)]
#[command(name = "coordkit")]
#[command(about = "Format, parse and sample map coordinates")]
struct Cli {
    /// Settings file, defaults to $COORDKIT_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Display preset applied over the settings (LV03, LV95, DMS, DM, DD, UTM, MGRS)
    #[arg(long, global = true)]
    preset: Option<DisplayPreset>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Format a position as text
    Format {
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
        /// System of the position
        #[arg(long, default_value = "EPSG:4326")]
        crs: String,
        #[arg(long)]
        format: Option<DisplayFormat>,
        #[arg(long)]
        display_crs: Option<String>,
    },

    /// Parse text into a position
    Parse {
        text: String,
        #[arg(long)]
        format: Option<DisplayFormat>,
        /// System to print the position in, defaults to the format's own
        #[arg(long)]
        target_crs: Option<String>,
    },

    /// Sample the project heightmap
    Height {
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
        #[arg(long, default_value = "EPSG:4326")]
        crs: String,
        #[arg(long)]
        unit: Option<HeightUnit>,
    },

    /// Try every format on the text and list the matches
    Search { text: String },

    /// Format an `x,y[,name]` CSV
    BatchFormat {
        /// Input file, defaults to stdin
        #[arg(long, short)]
        input: Option<PathBuf>,
        /// Output file, defaults to stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[arg(long)]
        format: Option<DisplayFormat>,
        #[arg(long, default_value = "EPSG:4326")]
        crs: String,
        #[arg(long)]
        display_crs: Option<String>,
    },

    /// Parse a `text[,name]` CSV
    BatchParse {
        #[arg(long, short)]
        input: Option<PathBuf>,
        #[arg(long, short)]
        output: Option<PathBuf>,
        #[arg(long)]
        format: Option<DisplayFormat>,
    },
}

fn main() {
    coordkit::init_logging("coordkit=info");

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult {
    let settings = Settings::discover(cli.config.as_deref())?;
    let mut codec = CoordinateCodec::from_settings(&settings);
    if let Some(preset) = cli.preset {
        codec.display_mut().apply_preset(preset)?;
    }

    match cli.command {
        Command::Format {
            x,
            y,
            crs,
            format,
            display_crs,
        } => {
            let source = ReferenceSystem::from_auth_id(&crs)?;
            let format = format.unwrap_or(codec.display().format());
            let display = display_system(&codec, display_crs.as_deref())?;
            let text = codec.format_with(GeoPoint::new(x, y), &source, format, &display)?;
            println!("{}", text);
        }
        Command::Parse {
            text,
            format,
            target_crs,
        } => {
            let format = format.unwrap_or(codec.display().format());
            let target = match target_crs {
                Some(id) => ReferenceSystem::from_auth_id(&id)?,
                None => codec.native_system(format),
            };
            match codec.parse_into(&text, format, &target)? {
                Some(point) => println!("{} {}", point, target),
                None => return Err(format!("not a valid {} coordinate: {}", format.name(), text).into()),
            }
        }
        Command::Height { x, y, crs, unit } => {
            if let Some(unit) = unit {
                codec.display_mut().set_height_unit(unit);
            }
            let rs = ReferenceSystem::from_auth_id(&crs)?;
            let height = codec.height_at(GeoPoint::new(x, y), &rs)?;
            println!("{} {}", height, codec.display().height_unit().suffix());
        }
        Command::Search { text } => {
            let search = CoordinateSearch::new(codec.display().reference_system().clone());
            for result in search.search(&text) {
                println!("{}\t{}\t{}", result.label, result.pos, result.crs);
            }
        }
        Command::BatchFormat {
            input,
            output,
            format,
            crs,
            display_crs,
        } => {
            let source = ReferenceSystem::from_auth_id(&crs)?;
            let format = format.unwrap_or(codec.display().format());
            let display = display_system(&codec, display_crs.as_deref())?;
            let summary = batch::format_csv(
                &codec,
                open_input(input)?,
                open_output(output)?,
                &source,
                format,
                &display,
            )?;
            eprintln!("{} rows, {} failed", summary.total, summary.failed);
        }
        Command::BatchParse { input, output, format } => {
            let format = format.unwrap_or(codec.display().format());
            let summary = batch::parse_csv(open_input(input)?, open_output(output)?, format)?;
            eprintln!("{} rows, {} failed", summary.total, summary.failed);
        }
    }

    Ok(())
}

fn display_system(codec: &CoordinateCodec, auth_id: Option<&str>) -> coordkit::Result<ReferenceSystem> {
    match auth_id {
        Some(id) => ReferenceSystem::from_auth_id(id),
        None => Ok(codec.display().reference_system().clone()),
    }
}

fn open_input(path: Option<PathBuf>) -> io::Result<Box<dyn Read>> {
    Ok(match path {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin().lock()),
    })
}

fn open_output(path: Option<PathBuf>) -> io::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    })
}
