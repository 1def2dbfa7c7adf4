//! Main entry point for the bufzip CLI application.
//!
//! Loads a ZIP archive fully into memory, then lists or extracts its entries.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use bufzip::{
    CentralDirectoryEntry, Cli, Entry, LocalFileReader, MemoryReader, ReadAt, ZipArchive,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let reader: Box<dyn ReadAt> = if cli.file == "-" {
        let mut data = Vec::new();
        tokio::io::stdin().read_to_end(&mut data).await?;
        Box::new(MemoryReader::new(data))
    } else {
        let reader = LocalFileReader::new(Path::new(&cli.file))
            .with_context(|| format!("cannot open {}", cli.file))?;
        Box::new(reader)
    };
    let buf = reader.read_all().await?;
    let archive = ZipArchive::new(buf).with_options(cli.read_options());

    if cli.list || cli.verbose {
        return list_files(&archive, cli.verbose);
    }

    let entries = archive.list_files()?;
    let selected: Vec<_> = entries.into_iter().filter(|e| is_selected(e, &cli)).collect();

    // Decode everything up front; a single bad entry aborts before anything is written
    let decoded = archive.extract_many(selected).await?;

    let show_filename = cli.pipe && decoded.len() > 1;
    for entry in &decoded {
        write_entry(entry, &cli, show_filename).await?;
    }

    Ok(())
}

/// Directories are skipped; positional names and `-x` patterns filter the rest.
fn is_selected(entry: &CentralDirectoryEntry, cli: &Cli) -> bool {
    if entry.is_directory() {
        return false;
    }

    if !cli.files.is_empty() {
        let matches = cli.files.iter().any(|f| {
            if has_glob_chars(f) {
                glob_match(f, &entry.file_name)
            } else {
                entry.file_name == *f || base_name(&entry.file_name) == *f
            }
        });
        if !matches {
            return false;
        }
    }

    !cli
        .exclude
        .iter()
        .any(|x| entry.file_name.contains(x) || glob_match(x, &entry.file_name))
}

fn list_files(archive: &ZipArchive, verbose: bool) -> Result<()> {
    let entries = archive.list_files()?;

    if verbose {
        println!(
            "{:>10}  {:>10}  {:>6}  {:>10}  {:>5}  Name",
            "Length", "Size", "Method", "Date", "Time"
        );
        println!("{}", "-".repeat(70));
    }

    let mut total_uncompressed = 0u64;
    let mut total_compressed = 0u64;
    let mut file_count = 0usize;

    for entry in &entries {
        if !verbose {
            println!("{}", entry.file_name);
            continue;
        }

        let (year, month, day) = entry.mod_date();
        let (hour, minute, _second) = entry.mod_time();
        let method = match entry.compression_method {
            bufzip::CompressionMethod::Stored => "Stored".to_string(),
            bufzip::CompressionMethod::Deflate => "Defl".to_string(),
            bufzip::CompressionMethod::Unknown(code) => format!("#{code}"),
        };

        println!(
            "{:>10}  {:>10}  {:>6}  {:04}-{:02}-{:02}  {:02}:{:02}  {}",
            entry.uncompressed_size,
            entry.compressed_size,
            method,
            year,
            month,
            day,
            hour,
            minute,
            entry.file_name
        );

        if !entry.is_directory() {
            total_uncompressed += entry.uncompressed_size as u64;
            total_compressed += entry.compressed_size as u64;
            file_count += 1;
        }
    }

    if verbose {
        println!("{}", "-".repeat(70));
        println!(
            "{:>10}  {:>10}  {:>30}  {} files",
            total_uncompressed, total_compressed, "", file_count
        );
    }

    Ok(())
}

/// Write one decoded entry to stdout (`-p`) or to disk.
async fn write_entry(entry: &Entry, cli: &Cli, show_filename: bool) -> Result<()> {
    if cli.pipe {
        let mut stdout = tokio::io::stdout();
        if show_filename {
            stdout
                .write_all(format!("--- {} ---\n", entry.file_name).as_bytes())
                .await?;
        }
        stdout.write_all(&entry.data).await?;
        stdout.flush().await?;
        return Ok(());
    }

    let file_name = if cli.junk_paths {
        base_name(&entry.file_name)
    } else {
        entry.file_name.clone()
    };
    let Some(relative) = relative_output_path(&file_name) else {
        warn!(
            name = %entry.file_name,
            "skipping entry that would be written outside the target directory"
        );
        return Ok(());
    };
    let output_path = match cli.extract_dir {
        Some(ref dir) => PathBuf::from(dir).join(relative),
        None => relative,
    };

    if output_path.exists() {
        if cli.never_overwrite {
            if !cli.is_quiet() {
                eprintln!("Skipping: {} (file exists)", entry.file_name);
            }
            return Ok(());
        }
        if !cli.overwrite {
            if !cli.is_quiet() {
                eprintln!("Skipping: {} (use -o to overwrite)", entry.file_name);
            }
            return Ok(());
        }
    }

    if !cli.is_quiet() {
        println!("  inflating: {}", entry.file_name);
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    fs::write(&output_path, &entry.data)
        .await
        .with_context(|| format!("cannot write {}", output_path.display()))?;

    Ok(())
}

/// Archive names may only descend into the target directory: absolute paths,
/// drive prefixes and `..` components are refused.
fn relative_output_path(file_name: &str) -> Option<PathBuf> {
    let path = Path::new(file_name);
    let mut relative = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if relative.as_os_str().is_empty() {
        return None;
    }
    Some(relative)
}

fn base_name(file_name: &str) -> String {
    Path::new(file_name)
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}

fn has_glob_chars(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Glob matching with `*` (any run) and `?` (one character).
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    fn do_match(pattern: &[char], text: &[char]) -> bool {
        match (pattern.first(), text.first()) {
            (None, None) => true,
            (Some('*'), _) => {
                do_match(&pattern[1..], text) || (!text.is_empty() && do_match(pattern, &text[1..]))
            }
            (Some('?'), Some(_)) => do_match(&pattern[1..], &text[1..]),
            (Some(p), Some(t)) if p == t => do_match(&pattern[1..], &text[1..]),
            _ => false,
        }
    }

    do_match(&pattern, &text)
}
