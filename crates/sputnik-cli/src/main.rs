//! Sputnik CLI tool: parse and inspect Sputnik data files.
//!
//! Examples:
//!   sputnik dump samples/KitchenSink.spk
//!   sputnik get samples/KitchenSink.spk color --section favorites
//!   sputnik get samples/KitchenSink.spk list --array
//!   sputnik json samples/KitchenSink.spk
//!   sputnik dump --strict broken.spk

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::json;
use sputnik_tree::{Document, Lookup, ParseOptions, ROOT, Section, Sector};

const EXIT_SUCCESS: u8 = 0;
const EXIT_PARSE_ERROR: u8 = 1;
const EXIT_IO_ERROR: u8 = 3;

#[derive(Parser, Debug)]
#[command(name = "sputnik", version, about = "Inspect Sputnik data files")]
struct Cli {
    /// Report diagnostics for lines lenient parsing would silently skip
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every sector, section, and object in a file
    Dump {
        /// Input file
        file: PathBuf,
    },
    /// Look up a single value
    Get {
        /// Input file
        file: PathBuf,
        /// Key to look up
        key: String,
        /// Section to look in
        #[arg(long, default_value = ROOT)]
        section: String,
        /// Sector to look in
        #[arg(long, default_value = ROOT)]
        sector: String,
        /// Split the value on ';' and print one element per line
        #[arg(long)]
        array: bool,
    },
    /// Emit the parsed document as JSON
    Json {
        /// Input file
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = ParseOptions { strict: cli.strict };

    match cli.command {
        Command::Dump { file } => match load(&file, options) {
            Ok(doc) => {
                print!("{}", dump(&doc));
                ExitCode::from(EXIT_SUCCESS)
            }
            Err(code) => code,
        },
        Command::Get {
            file,
            key,
            section,
            sector,
            array,
        } => match load(&file, options) {
            Ok(doc) => {
                let at = Lookup {
                    section: &section,
                    sector: &sector,
                };
                if array {
                    for element in doc.value_as_array_at(&key, at) {
                        println!("{element}");
                    }
                } else {
                    println!("{}", doc.value_at(&key, at));
                }
                ExitCode::from(EXIT_SUCCESS)
            }
            Err(code) => code,
        },
        Command::Json { file } => match load(&file, options) {
            Ok(doc) => {
                println!("{:#}", to_json(&doc));
                ExitCode::from(EXIT_SUCCESS)
            }
            Err(code) => code,
        },
    }
}

/// Parse `path`, printing any failure to stderr.
fn load(path: &Path, options: ParseOptions) -> Result<Document, ExitCode> {
    let mut doc = Document::new();
    let status = doc.parse_file_with(path, options);
    if status.success {
        return Ok(doc);
    }

    if status.diagnostics.is_empty() {
        eprintln!("error: {}: {}", path.display(), status.message);
        return Err(ExitCode::from(EXIT_IO_ERROR));
    }

    let filename = path.display().to_string();
    let source = std::fs::read_to_string(path).unwrap_or_default();
    for diagnostic in &status.diagnostics {
        diagnostic.write_report(&filename, &source, std::io::stderr());
    }
    Err(ExitCode::from(EXIT_PARSE_ERROR))
}

/// Plain-text rendering of a document, one line per item.
fn dump(doc: &Document) -> String {
    let mut out = String::new();
    for (name, sector) in doc.sectors() {
        out.push_str(&format!("sector {name}\n"));
        for (name, section) in sector.sections() {
            out.push_str(&format!("  section {name}\n"));
            for (key, value) in section.iter() {
                out.push_str(&format!("    {key} = {value}\n"));
            }
        }
        for (name, map) in sector.objects() {
            out.push_str(&format!("  object {name}\n"));
            for (key, value) in map.iter() {
                out.push_str(&format!("    {key} = {value}\n"));
            }
        }
    }
    out
}

/// JSON rendering: sectors as an object, objects as an ordered array
/// (names repeat, so they cannot be JSON object keys).
fn to_json(doc: &Document) -> serde_json::Value {
    let mut sectors = serde_json::Map::new();
    for (name, sector) in doc.sectors() {
        sectors.insert(name.to_string(), sector_json(sector));
    }
    json!({ "sectors": sectors })
}

fn sector_json(sector: &Sector) -> serde_json::Value {
    let mut sections = serde_json::Map::new();
    for (name, section) in sector.sections() {
        sections.insert(name.to_string(), section_json(section));
    }
    let objects: Vec<_> = sector
        .objects()
        .map(|(name, map)| json!({ "name": name, "values": section_json(map) }))
        .collect();
    json!({ "sections": sections, "objects": objects })
}

fn section_json(section: &Section) -> serde_json::Value {
    let mut values = serde_json::Map::new();
    for (key, value) in section.iter() {
        values.insert(key.to_string(), json!(value));
    }
    serde_json::Value::Object(values)
}
