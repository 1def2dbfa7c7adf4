use clap::Parser;

use crate::zip::{EocdSearch, ExtraFieldPolicy, MethodDispatch, ReadOptions};

#[derive(Parser, Debug)]
#[command(name = "bufzip")]
#[command(version)]
#[command(about = "Read a ZIP archive into memory and decode its entries concurrently", long_about = None)]
#[command(after_help = "Examples:\n  \
  bufzip data1.zip -x joe        extract all files except joe from data1.zip\n  \
  bufzip -p foo.zip | more       send contents of foo.zip via pipe into more\n  \
  bufzip -l --compat old.zip     list files the way fixed-offset readers see them")]
pub struct Cli {
    /// ZIP file path, or `-` to read the archive from stdin
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Files to extract (default: all)
    #[arg(value_name = "FILES")]
    pub files: Vec<String>,

    /// List files (short format)
    #[arg(short = 'l')]
    pub list: bool,

    /// List verbosely
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Extract files to pipe, no messages
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Extract files into exdir
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<String>,

    /// Exclude files that follow
    #[arg(short = 'x', value_name = "FILE", num_args = 1..)]
    pub exclude: Vec<String>,

    /// Never overwrite existing files
    #[arg(short = 'n')]
    pub never_overwrite: bool,

    /// Overwrite files WITHOUT prompting
    #[arg(short = 'o')]
    pub overwrite: bool,

    /// Junk paths (do not make directories)
    #[arg(short = 'j')]
    pub junk_paths: bool,

    /// Quiet mode
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// Behave like fixed-offset readers: implies --fixed-tail,
    /// --first-header-extra and --assume-deflate
    #[arg(long)]
    pub compat: bool,

    /// Only look for the end record in the final 22 bytes
    #[arg(long)]
    pub fixed_tail: bool,

    /// Reuse the first local header's extra field length for every entry
    #[arg(long)]
    pub first_header_extra: bool,

    /// Inflate every entry regardless of its compression method
    #[arg(long)]
    pub assume_deflate: bool,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.pipe
    }

    pub fn read_options(&self) -> ReadOptions {
        let mut options = if self.compat {
            ReadOptions::compat()
        } else {
            ReadOptions::default()
        };
        if self.fixed_tail {
            options = options.with_eocd_search(EocdSearch::FixedTail);
        }
        if self.first_header_extra {
            options = options.with_extra_field_policy(ExtraFieldPolicy::FirstLocalHeader);
        }
        if self.assume_deflate {
            options = options.with_method_dispatch(MethodDispatch::AssumeDeflate);
        }
        options
    }
}
