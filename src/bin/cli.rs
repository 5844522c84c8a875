//! zonewire CLI
//!
//! Encode, decode and inspect zone RPC messages from the command line.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};
use zonewire::protocol::{Message, ReadStream, Variant, Vector3};
use zonewire::{BufferPolicy, BytePoolLength, CodecConfig, Result, WireError};

/// zonewire CLI
#[derive(Parser, Debug)]
#[command(name = "zonewire-cli")]
#[command(about = "Encode and decode typed variant RPC messages")]
#[command(version)]
struct Cli {
    /// Write buffer capacity in bytes
    #[arg(short, long, default_value = "1000")]
    capacity: usize,

    /// Grow the write buffer instead of failing at capacity
    #[arg(long)]
    growable: bool,

    /// Round byte array lengths down to a multiple of 4 when reading
    #[arg(long)]
    truncate_byte_arrays: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a message and print it as hex
    Encode {
        /// Event code
        event_code: i32,

        /// Arguments as kind:value (int:42, float:1.5, bool:true, str:hi,
        /// vec3:1,2,3, bytes:deadbeef)
        args: Vec<String>,
    },

    /// Strictly decode one message
    Decode {
        #[command(flatten)]
        input: Input,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Drain every decodable value, stopping at the first error
    Dump {
        #[command(flatten)]
        input: Input,
    },
}

#[derive(Args, Debug)]
struct Input {
    /// Message bytes as hex
    hex: Option<String>,

    /// Read raw message bytes from a file
    #[arg(short, long, conflicts_with = "hex")]
    file: Option<PathBuf>,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let config = CodecConfig::builder()
        .write_capacity(args.capacity)
        .buffer_policy(if args.growable {
            BufferPolicy::Growable
        } else {
            BufferPolicy::Fixed
        })
        .byte_array_length(if args.truncate_byte_arrays {
            BytePoolLength::TruncateToWord
        } else {
            BytePoolLength::Exact
        })
        .build();

    if let Err(e) = run(args.command, &config) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands, config: &CodecConfig) -> Result<()> {
    match command {
        Commands::Encode { event_code, args } => {
            let message = args
                .iter()
                .map(|arg| parse_arg(arg))
                .collect::<Result<Vec<_>>>()
                .map(|args| Message { event_code, args })?;
            let bytes = message.encode(config)?;
            println!("{}", hex::encode(bytes));
        }
        Commands::Decode { input, json } => {
            let bytes = load_input(&input)?;
            let message = Message::decode(&bytes, config)?;
            if json {
                let out = serde_json::to_string_pretty(&message)
                    .map_err(|e| WireError::Serialization(e.to_string()))?;
                println!("{out}");
            } else {
                println!("event {}", message.event_code);
                for (i, arg) in message.args.iter().enumerate() {
                    println!("  [{i}] {arg:?}");
                }
            }
        }
        Commands::Dump { input } => {
            let bytes = load_input(&input)?;
            let mut stream = ReadStream::with_config(&bytes, config)?;
            let values = stream.read_all();
            println!(
                "{} of {} elements decoded, {} bytes unread",
                values.len(),
                stream.element_count(),
                stream.remaining()
            );
            for (i, value) in values.iter().enumerate() {
                println!("  [{i}] {value:?}");
            }
        }
    }
    Ok(())
}

/// Parse a `kind:value` argument
fn parse_arg(arg: &str) -> Result<Variant> {
    let (kind, value) = arg
        .split_once(':')
        .ok_or_else(|| WireError::Config(format!("expected kind:value, got {arg:?}")))?;
    let invalid = |e: &dyn std::fmt::Display| WireError::Config(format!("bad {kind} {value:?}: {e}"));

    let variant = match kind {
        "int" => Variant::Int(value.parse::<i32>().map_err(|e| invalid(&e))?),
        "float" => Variant::Float(value.parse::<f32>().map_err(|e| invalid(&e))?),
        "bool" => Variant::Bool(value.parse::<bool>().map_err(|e| invalid(&e))?),
        "str" => Variant::String(value.to_string()),
        "vec3" => {
            let parts = value
                .split(',')
                .map(|p| p.trim().parse::<f32>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| invalid(&e))?;
            match parts.as_slice() {
                [x, y, z] => Variant::Vector3(Vector3::new(*x, *y, *z)),
                _ => return Err(invalid(&"expected three components")),
            }
        }
        "bytes" => Variant::ByteArray(hex::decode(value).map_err(|e| invalid(&e))?),
        other => return Err(WireError::Config(format!("unknown argument kind {other:?}"))),
    };
    Ok(variant)
}

fn load_input(input: &Input) -> Result<Vec<u8>> {
    match (&input.hex, &input.file) {
        (_, Some(path)) => Ok(std::fs::read(path)?),
        (Some(text), None) => {
            let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            hex::decode(cleaned).map_err(|e| WireError::Config(format!("invalid hex: {e}")))
        }
        (None, None) => Err(WireError::Config("no input: pass hex or --file".to_string())),
    }
}
