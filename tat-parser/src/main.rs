use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use rayon::prelude::*;
use tat_parser_lib::{parse_lexicon, parse_tagnt, parse_tahot, Book, LexiconEntry, Morpheme, Sink};

#[derive(Parser)]
#[command(
    name = "tat-parser",
    about = "Convert amalgamated-text corpus files to per-morpheme CSV"
)]
struct Cli {
    /// Corpus files to convert (TAHOT, TAGNT, TBESH, or TBESG).
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output directory.
    #[arg(long, default_value = "dist")]
    outdir: PathBuf,
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Tahot,
    Tagnt,
    Tbesh,
    Tbesg,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Files are independent: fold state never crosses a file boundary, so
    // a fatal error in one file must not abort its siblings.
    let results: Vec<Result<()>> = cli
        .files
        .par_iter()
        .map(|f| convert_file(f, &cli.outdir).with_context(|| f.display().to_string()))
        .collect();

    let mut failed = 0;
    for res in &results {
        if let Err(e) = res {
            tracing::error!("{e:#}");
            failed += 1;
        }
    }
    if failed > 0 {
        bail!("{failed} of {} files failed", results.len());
    }
    Ok(())
}

fn convert_file(path: &Path, outdir: &Path) -> Result<()> {
    let mut reader = BufReader::new(File::open(path)?);

    // The first line tags the file type and is not a data line.
    let mut first_line = String::new();
    reader.read_line(&mut first_line)?;
    let first_line = first_line.trim_start_matches('\u{feff}');

    let format = detect(first_line)
        .with_context(|| format!("{} has unknown file type", path.display()))?;

    let outpath = match format {
        Format::Tahot => outdir.join("heb_tat").join(numbered_name(path)?),
        Format::Tagnt => outdir.join("grc_tat").join(numbered_name(path)?),
        Format::Tbesh => outdir.join("tbesh.csv"),
        Format::Tbesg => outdir.join("tbesg.csv"),
    };
    fs::create_dir_all(outpath.parent().unwrap_or(outdir))?;

    tracing::info!("{} -> {}", path.display(), outpath.display());

    let mut sink = CsvSink(csv::Writer::from_path(&outpath)?);
    match format {
        Format::Tahot => parse_tahot(reader, &mut sink)?,
        Format::Tagnt => parse_tagnt(reader, &mut sink)?,
        Format::Tbesh | Format::Tbesg => parse_lexicon(reader, &mut sink)?,
    }
    sink.0.flush()?;

    Ok(())
}

/// CSV emission with headers taken from the record struct.
struct CsvSink<W: Write>(csv::Writer<W>);

impl<W: Write> Sink<Morpheme> for CsvSink<W> {
    fn write(&mut self, rec: Morpheme) -> io::Result<()> {
        self.0.serialize(rec).map_err(io::Error::other)
    }
}

impl<W: Write> Sink<LexiconEntry> for CsvSink<W> {
    fn write(&mut self, rec: LexiconEntry) -> io::Result<()> {
        self.0.serialize(rec).map_err(io::Error::other)
    }
}

fn detect(first_line: &str) -> Option<Format> {
    if first_line.starts_with("TAHOT") {
        Some(Format::Tahot)
    } else if first_line.starts_with("TAGNT") {
        Some(Format::Tagnt)
    } else if first_line.starts_with("TBESH") {
        Some(Format::Tbesh)
    } else if first_line.starts_with("TBESG") {
        Some(Format::Tbesg)
    } else {
        None
    }
}

/// `TAHOT Gen-Deu - … .txt` → `01-Gen-Deu.csv`: the second token of the
/// file name is the book range, and the range's first book gives the
/// ordering number.
fn numbered_name(path: &Path) -> Result<String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let range = name
        .split(' ')
        .nth(1)
        .with_context(|| format!("could not extract book range from {name}"))?;
    let first = range.split('-').next().unwrap_or(range);
    let book = Book::from_english(first)
        .with_context(|| format!("could not extract book from {name}"))?;
    Ok(format!("{:02}-{}.csv", book.number(), range))
}
