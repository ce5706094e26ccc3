use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write, stdin, stdout};
use std::path::PathBuf;

use matchlog::summarize;

#[derive(Debug, Parser)]
#[command(name = "matchlog-report", version)]
#[command(about = "Reduce a checkers engine match log into per-player average statistics")]
struct Args {
    /// Path to a match log (reads standard input when omitted)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Optional path to write the report instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(1);
    }

    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let input = InputSource::new(args.input.clone())?;
    let mut output = OutputTarget::new(args.output.clone())?;
    summarize(input, &mut output)?;
    output.flush_inner().context("failed to flush report")?;
    if let Some(path) = &args.output {
        log::debug!("report written to {}", path.display());
    }
    Ok(())
}

enum InputSource {
    Stdin(BufReader<io::Stdin>),
    File(BufReader<File>),
}

impl InputSource {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file =
                File::open(&path).with_context(|| format!("failed to open {}", path.display()))?;
            Ok(Self::File(BufReader::new(file)))
        } else {
            Ok(Self::Stdin(BufReader::new(stdin())))
        }
    }

    fn reader(&mut self) -> &mut dyn BufRead {
        match self {
            Self::Stdin(r) => r,
            Self::File(r) => r,
        }
    }
}

impl Read for InputSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader().read(buf)
    }
}

impl BufRead for InputSource {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.reader().fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader().consume(amt);
    }
}

enum OutputTarget {
    Stdout(BufWriter<io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_inner()
    }
}
