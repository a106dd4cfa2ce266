use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use deal_history_analyzer::config::{Args, Config, OutputFormat};
use deal_history_analyzer::history::load_chat_export;
use deal_history_analyzer::{report, Pipeline};

struct DualWriter {
    stderr: io::Stderr,
    file: Mutex<File>,
}

impl DualWriter {
    fn file(&self) -> io::Result<std::sync::MutexGuard<'_, File>> {
        self.file
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))
    }
}

impl Write for DualWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let _ = self.stderr.write_all(buf);
        let _ = self.stderr.flush();
        let mut file = self.file()?;
        file.write_all(buf)?;
        file.flush()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stderr.flush()?;
        self.file()?.flush()
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(log::LevelFilter::Info);
    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open {} for logging", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(DualWriter {
            stderr: io::stderr(),
            file: Mutex::new(file),
        })));
    }
    builder.init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let mut config = Config::load(&args.config)?;
    config.apply_args(&args);
    let pipeline = Pipeline::new(&config)?;

    for line in report::header_lines(&config) {
        println!("{}", line);
    }

    let export = load_chat_export(&config.chat_history_path)?;
    info!(
        "Loaded {} messages from {}",
        export.messages.len(),
        config.chat_history_path.display()
    );

    let analysis = pipeline.run(&export.messages)?;
    match args.format {
        OutputFormat::Text => print!("{}", report::render_text(&analysis.rows)),
        OutputFormat::Json => println!("{}", report::render_json(&analysis.rows)?),
    }
    Ok(())
}
