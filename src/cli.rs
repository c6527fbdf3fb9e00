use clap::{Args, Parser, Subcommand, ValueEnum};
use jfif_splice::{Options, Overflow, ScanStrategy};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(version, about = "Extract, edit and re-insert the JFIF header of JPEG files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// How to find the APP0 marker.
    #[arg(long, value_enum, default_value_t = Scan::Byte, global = true)]
    pub scan: Scan,

    /// Reject record values that do not fit their field instead of truncating them.
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Scan {
    /// First FF E0 anywhere in the file
    Byte,
    /// Walk marker segments from SOI
    Walk,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Split each file into <name>.jfif_data (APP0 segment) and <name>.jpg (the rest).
    Extract {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Write the outputs here instead of next to each input.
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Write the JFIF header of each segment or JPEG file to <name>.xml.
    Decode {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Insert a raw segment file after the SOI of a JPEG, writing <segment>.jfif.
    Merge {
        segment: PathBuf,
        jpeg: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Encode an XML record and insert it after the SOI of a JPEG, writing <xml>_merged.jpg.
    Encode {
        xml: PathBuf,
        jpeg: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl GlobalArgs {
    pub fn options(&self) -> Options {
        Options {
            overflow: match self.strict {
                true => Overflow::Strict,
                false => Overflow::Truncate,
            },
            scan: match self.scan {
                Scan::Byte => ScanStrategy::ByteScan,
                Scan::Walk => ScanStrategy::SegmentWalk,
            },
        }
    }
}

/// `photo.jpg` + `xml` -> `photo.xml`
pub fn with_extension(path: &Path, extension: &str) -> PathBuf {
    path.with_extension(extension)
}

/// `dir/photo.jpg` with `--out-dir out` -> `out/photo.jfif_data`, `out/photo.jpg`
pub fn extract_paths(path: &Path, out_dir: Option<&Path>) -> (PathBuf, PathBuf) {
    let base = match (out_dir, path.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    };

    (with_extension(&base, "jfif_data"), with_extension(&base, "jpg"))
}

/// `meta.xml` + `_merged.jpg` -> `meta_merged.jpg`
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.file_stem().map(OsString::from).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}
