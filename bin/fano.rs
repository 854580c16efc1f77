#![forbid(unsafe_code)]
use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::{env, fs, process};

use fano::{decode::Decoder, encode::Encoder, CodeTable, FanoError, FrequencyList};
use thiserror::Error;

fn main() -> CodingResult {
    CodingResult::catch_panic(|| {
        let flags = Flags::from_args(env::args_os()).unwrap_or_else(explain);
        init_logger(flags.verbosity);
        run_coding(&flags)
    })
}

/// Process every file in turn, returning the first failure.
fn run_coding(flags: &Flags) -> Result<(), CliError> {
    let mut first_failure = None;
    for file in &flags.files {
        if let Err(err) = process_file(file, flags) {
            eprintln!("{}", err);
            first_failure.get_or_insert(err);
        }
    }

    match first_failure {
        None => Ok(()),
        Some(err) => Err(err),
    }
}

fn process_file(file: &Path, flags: &Flags) -> Result<(), CliError> {
    let data = read_file(file)?;
    if data.is_empty() {
        println!("Nothing to do (file is empty)");
        return Ok(());
    }

    let coding = |source| CliError::Coding {
        path: file.to_owned(),
        source,
    };

    let list = FrequencyList::analyze(&data).map_err(coding)?;
    let table = CodeTable::build(&list);
    if !flags.quiet {
        let stdout = io::stdout();
        write_report(&mut stdout.lock(), file, &list, &table).map_err(|source| {
            CliError::Write {
                path: PathBuf::from("-"),
                source,
            }
        })?;
    }

    let packed = Encoder::new(&table).encode(&data).map_err(coding)?;
    let compressed = with_suffix(file, "compressed");
    write_file(&compressed, &packed)?;
    log::info!(
        "{}: {} bytes compressed to {} bytes",
        file.display(),
        data.len(),
        packed.len()
    );

    if !flags.verify {
        return Ok(());
    }

    let packed = read_file(&compressed)?;
    let decoder = match flags.matcher {
        Matcher::Scan => Decoder::new(&table),
        Matcher::Tree => Decoder::with_tree_walk(&table),
    };
    let unpacked = decoder.decode(&packed).map_err(coding)?;
    write_file(&with_suffix(file, "uncompressed"), &unpacked)?;

    if unpacked != data {
        return Err(CliError::Mismatch(file.to_owned()));
    }

    Ok(())
}

/// Print the code of every symbol in order of its frequency.
fn write_report(
    out: &mut impl Write,
    file: &Path,
    list: &FrequencyList,
    table: &CodeTable,
) -> io::Result<()> {
    writeln!(out, "Shannon-Fano code for \"{}\":", file.display())?;
    for entry in list {
        if let Some(code) = table.get(entry.symbol) {
            writeln!(out, "{:>6}: {}", display_symbol(entry.symbol), code)?;
        }
    }
    writeln!(out)
}

/// Printable characters are quoted, everything else is shown by its value.
fn display_symbol(symbol: u8) -> String {
    if (33..=126).contains(&symbol) {
        format!("'{}'", char::from(symbol))
    } else {
        format!("[{}]", symbol)
    }
}

fn with_suffix(file: &Path, suffix: &str) -> PathBuf {
    let mut name = file.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

fn read_file(path: &Path) -> Result<Vec<u8>, CliError> {
    if !path.exists() {
        return Err(CliError::Missing(path.to_owned()));
    }

    let mut file = fs::File::open(path).map_err(|source| CliError::Open {
        path: path.to_owned(),
        source,
    })?;

    let mut data = vec![];
    file.read_to_end(&mut data)
        .map_err(|source| CliError::Read {
            path: path.to_owned(),
            source,
        })?;

    Ok(data)
}

fn write_file(path: &Path, data: &[u8]) -> Result<(), CliError> {
    let mut file = fs::File::create(path).map_err(|source| CliError::Create {
        path: path.to_owned(),
        source,
    })?;

    file.write_all(data)
        .and_then(|()| file.flush())
        .map_err(|source| CliError::Write {
            path: path.to_owned(),
            source,
        })
}

/// Print usage or version information and exit, with failure for invalid arguments.
fn explain<T>(err: clap::Error) -> T {
    let _ = err.print();
    process::exit(if err.use_stderr() { 1 } else { 0 });
}

fn init_logger(verbosity: u64) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

#[derive(Debug, Error)]
enum CliError {
    #[error("File \"{}\" does not exist", .0.display())]
    Missing(PathBuf),

    #[error("Unable to open file \"{}\"", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("Unable to read file \"{}\"", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Unable to open file \"{}\" for writing", .path.display())]
    Create { path: PathBuf, source: io::Error },

    #[error("Unable to write file \"{}\"", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Unable to code file \"{}\": {source}", .path.display())]
    Coding { path: PathBuf, source: FanoError },

    #[error("Decoded file \"{}\" differs from the original", .0.display())]
    Mismatch(PathBuf),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Missing(_) => 2,
            CliError::Open { .. } => 3,
            CliError::Read { .. } => 4,
            CliError::Create { .. } => 5,
            CliError::Write { .. } => 6,
            CliError::Coding { .. } | CliError::Mismatch(_) => 7,
        }
    }
}

#[derive(Debug)]
struct Flags {
    files: Vec<PathBuf>,
    quiet: bool,
    verify: bool,
    matcher: Matcher,
    verbosity: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Matcher {
    Scan,
    Tree,
}

impl Default for Flags {
    fn default() -> Flags {
        Flags {
            files: vec![],
            quiet: false,
            verify: true,
            matcher: Matcher::Scan,
            verbosity: 0,
        }
    }
}

fn command() -> clap::Command<'static> {
    clap::Command::new("fano")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compress files with a Shannon-Fano code and print the code table")
        .arg(
            clap::Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Do not print the code table")
                .takes_value(false),
        )
        .arg(
            clap::Arg::new("no_verify")
                .long("no-verify")
                .help("Skip decoding the compressed file again")
                .takes_value(false),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log more details, repeat for even more")
                .multiple_occurrences(true)
                .takes_value(false),
        )
        .arg(
            clap::Arg::new("matcher")
                .short('m')
                .long("matcher")
                .takes_value(true)
                .default_value("scan")
                .value_parser(["scan", "tree"]),
        )
        .arg(
            clap::Arg::new("file")
                .required(true)
                .multiple_values(true)
                .value_parser(clap::builder::ValueParser::path_buf()),
        )
}

impl Flags {
    fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut flags = Flags::default();
        let matches = command().try_get_matches_from(args)?;

        flags.quiet = matches.contains_id("quiet");
        flags.verify = !matches.contains_id("no_verify");
        flags.verbosity = matches.occurrences_of("verbose");

        match matches.get_one::<String>("matcher").map(String::as_str) {
            Some("scan") => flags.matcher = Matcher::Scan,
            Some("tree") => flags.matcher = Matcher::Tree,
            Some(_) => unreachable!("unparsed matcher"),
            None => {}
        }

        if let Some(files) = matches.get_many::<PathBuf>("file") {
            flags.files = files.cloned().collect();
        }

        Ok(flags)
    }
}

enum CodingResult {
    Ok,
    Err(CliError),
    Panic,
}

impl CodingResult {
    fn catch_panic(op: fn() -> Result<(), CliError>) -> Self {
        std::panic::catch_unwind(|| match op() {
            Ok(()) => CodingResult::Ok,
            Err(err) => CodingResult::Err(err),
        })
        .unwrap_or(CodingResult::Panic)
    }
}

impl std::process::Termination for CodingResult {
    fn report(self) -> std::process::ExitCode {
        match self {
            CodingResult::Ok => std::process::ExitCode::SUCCESS,
            // Already reported while processing the files.
            CodingResult::Err(err) => std::process::ExitCode::from(err.exit_code()),
            CodingResult::Panic => {
                eprintln!(
                    "The process failed irrecoverably! This should never happen and is a bug."
                );
                std::process::ExitCode::from(128)
            }
        }
    }
}
