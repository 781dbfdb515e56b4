use std::fmt;
use std::io::{self, Write};

use structopt::StructOpt;

use pica::{decode_all_lossy, decode_all_strict, encode_all, render_text, render_tokens, SENTINEL};

/// Packs short strings into printf-style positional placeholders and back.
///
/// Input starting with '%' is taken as placeholders to decode; anything else
/// is text to encode. Encoded output is prefixed with the fixed %1$s unit so
/// the target templating system's own indexing starts past it.
#[derive(StructOpt)]
#[structopt(name = "pica")]
struct Args {
    /// When decoding, fail on anything that is not a well-formed, decodable
    /// placeholder instead of skipping it.
    #[structopt(long)]
    strict: bool,

    /// Text to encode, or placeholder tokens to decode.
    input: String,
}

#[derive(Debug)]
enum CliError {
    Input(String),
    Internal(io::Error),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Input(_) => 1,
            CliError::Internal(_) => 2,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CliError::Input(message) => write!(f, "{}", message),
            CliError::Internal(e) => write!(f, "internal failure: {}", e),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> CliError {
        CliError::Internal(e)
    }
}

fn transcode(input: &str, strict: bool) -> Result<String, CliError> {
    if input.starts_with('%') {
        let cells = if strict { decode_all_strict(input) } else { decode_all_lossy(input) }
            .map_err(|e| CliError::Input(e.to_string()))?;
        render_text(&cells, strict).map_err(|e| CliError::Input(e.to_string()))
    } else {
        let cells = encode_all(input).map_err(|e| CliError::Input(e.to_string()))?;
        Ok(format!("{}{}", SENTINEL, render_tokens(&cells)))
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let output = transcode(&args.input, args.strict)?;
    let stdout = io::stdout();
    writeln!(stdout.lock(), "{}", output)?;
    Ok(())
}

fn main() {
    let args = Args::from_args();
    if let Err(e) = run(&args) {
        eprintln!("pica: {}", e);
        std::process::exit(e.exit_code());
    }
}
