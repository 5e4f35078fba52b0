//! wgknife: WinGroove soundbank dumper.
//!
//! Usage:
//!   wgknife -d   path/to/bank   describe every record on stdout
//!   wgknife -sd  path/to/bank   dump samples to `<bank>_dmp/`
//!   wgknife -sfz path/to/bank   export SFZ instruments to `<bank>_sfz/`

mod cli;

use std::fs;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use wg_master::{
    describe_bank, dump_samples, export_instruments, load_name_table, Bank, ExportKind,
    NameTable, OutputLayout,
};

use cli::{exit, Cli, Mode};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(exit::USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run(cli: &Cli) -> Result<(), u8> {
    let data = fs::read(&cli.path).map_err(|e| {
        eprintln!("Failed to read {}: {}", cli.path.display(), e);
        exit::OPEN
    })?;

    let bank = Bank::open(&data).map_err(|e| {
        eprintln!("Not a WinGroove bank {}: {}", cli.path.display(), e);
        exit::BAD_HEADER
    })?;
    tracing::debug!(
        path = %cli.path.display(),
        bytes = data.len(),
        version = bank.header().version,
        "opened bank"
    );

    let names = match &cli.names {
        Some(path) => load_name_table(path).map_err(|e| {
            eprintln!("{e}");
            exit::NAME_TABLE
        })?,
        None => NameTable::new(),
    };

    match cli.mode {
        Mode::Describe => describe(&bank, &names),
        Mode::SampleDump | Mode::Sfz => export(cli, &bank, &names),
    }
}

fn describe(bank: &Bank<'_>, names: &NameTable) -> Result<(), u8> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    describe_bank(&mut out, bank, names)
        .and_then(|()| out.flush())
        .map_err(|e| {
            eprintln!("Failed to write description: {e}");
            exit::DESCRIBE
        })
}

fn export(cli: &Cli, bank: &Bank<'_>, names: &NameTable) -> Result<(), u8> {
    let kind = match cli.mode {
        Mode::Sfz => ExportKind::Instruments,
        _ => ExportKind::SampleDump,
    };
    let layout = OutputLayout::new(kind, &cli.path, cli.out_dir.as_deref());

    let result = match kind {
        ExportKind::SampleDump => dump_samples(bank, names, &layout),
        ExportKind::Instruments => export_instruments(bank, names, &layout),
    };
    let report = result.map_err(|e| {
        eprintln!("{e}");
        exit::INCOMPLETE_EXPORT
    })?;

    if report.is_complete() {
        Ok(())
    } else {
        eprintln!(
            "{} {} finished with {} skipped artifact(s)",
            cli.mode,
            layout.root().display(),
            report.skipped.len()
        );
        Err(exit::INCOMPLETE_EXPORT)
    }
}
