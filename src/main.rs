mod cli;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use cli::{extract_paths, with_extension, with_suffix, Cli, Command};
use jfif_splice::io::{write_all_atomic, write_atomic, InputBuffer};
use jfif_splice::{extract, from_xml, merge, to_xml, Extracted, Options, RawSegment};
use log::{error, info};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let options = cli.global.options();

    match cli.command {
        Command::Extract { files, out_dir } => for_each_file(&files, |file| {
            extract_file(file, out_dir.as_deref(), &options)
        }),
        Command::Decode { files } => {
            for_each_file(&files, |file| decode_file(file, &options).map(|p| vec![p]))
        }
        Command::Merge {
            segment,
            jpeg,
            output,
        } => {
            let output = output.unwrap_or_else(|| with_extension(&segment, "jfif"));
            merge_segment_file(&segment, &jpeg, &output)?;
            println!("Merged JFIF saved to {}", output.display());
            Ok(())
        }
        Command::Encode { xml, jpeg, output } => {
            let output = output.unwrap_or_else(|| with_suffix(&xml, "_merged.jpg"));
            merge_xml_file(&xml, &jpeg, &output, &options)?;
            println!("Merged JFIF-encoded JPEG saved to {}", output.display());
            Ok(())
        }
    }
}

/// Runs `op` over every input in parallel and reports results in input order.
fn for_each_file<F>(files: &[PathBuf], op: F) -> Result<()>
where
    F: Fn(&Path) -> Result<Vec<PathBuf>> + Sync,
{
    let results: Vec<_> = files.par_iter().map(|file| op(file)).collect();

    let mut failures = vec![];
    for (file, result) in files.iter().zip(results) {
        match result {
            Ok(outputs) => outputs
                .iter()
                .for_each(|output| println!("{} saved to {}", file.display(), output.display())),
            Err(e) => failures.push(e),
        }
    }

    match failures.len() {
        0 => Ok(()),
        1 => Err(failures.remove(0)),
        n => {
            failures.iter().for_each(|e| error!("{:#}", e));
            Err(anyhow!("{} of {} files failed", n, files.len()))
        }
    }
}

fn read(path: &Path) -> Result<InputBuffer> {
    InputBuffer::from_file_path(path).with_context(|| format!("failed to read {}", path.display()))
}

/// True when `output` names the same file as the existing `input`.
fn is_same_file(output: &Path, input: &Path) -> Result<bool> {
    if output == input {
        return Ok(true);
    }

    if !output.exists() {
        return Ok(false);
    }

    Ok(fs::canonicalize(output)? == fs::canonicalize(input)?)
}

fn extract_file(path: &Path, out_dir: Option<&Path>, options: &Options) -> Result<Vec<PathBuf>> {
    let (segment_path, jpeg_path) = extract_paths(path, out_dir);

    for output in [&segment_path, &jpeg_path] {
        if is_same_file(output, path)? {
            bail!(
                "extracting {} would overwrite it with {}; use --out-dir",
                path.display(),
                output.display()
            );
        }
    }

    let Extracted { segment, body } = {
        let stream = read(path)?;
        extract(&stream, options.scan)
            .with_context(|| format!("failed to extract JFIF segment from {}", path.display()))?
    };

    write_all_atomic(&[
        (segment_path.as_path(), segment.as_bytes()),
        (jpeg_path.as_path(), &body[..]),
    ])
    .with_context(|| {
        format!(
            "failed to write {} and {}",
            segment_path.display(),
            jpeg_path.display()
        )
    })?;

    info!("{}: {} byte segment", path.display(), segment.len());
    Ok(vec![segment_path, jpeg_path])
}

fn decode_file(path: &Path, options: &Options) -> Result<PathBuf> {
    let header = {
        let buffer = read(path)?;
        RawSegment::find(&buffer, options.scan)
            .and_then(|segment| segment.header())
            .with_context(|| format!("failed to decode JFIF header in {}", path.display()))?
    };

    let xml = to_xml(&header)?;
    let xml_path = with_extension(path, "xml");
    write_atomic(&xml_path, xml.as_bytes())
        .with_context(|| format!("failed to write {}", xml_path.display()))?;

    Ok(xml_path)
}

fn merge_segment_file(segment_path: &Path, jpeg_path: &Path, output: &Path) -> Result<()> {
    let segment = RawSegment::parse(&read(segment_path)?)
        .with_context(|| format!("failed to read APP0 segment from {}", segment_path.display()))?;

    let merged = merge(&segment, &read(jpeg_path)?)
        .with_context(|| format!("failed to merge into {}", jpeg_path.display()))?;

    write_atomic(output, &merged).with_context(|| format!("failed to write {}", output.display()))
}

fn merge_xml_file(xml_path: &Path, jpeg_path: &Path, output: &Path, options: &Options) -> Result<()> {
    let xml = fs::read_to_string(xml_path)
        .with_context(|| format!("failed to read {}", xml_path.display()))?;
    let header = from_xml(&xml, options.overflow)
        .with_context(|| format!("failed to parse JFIF record {}", xml_path.display()))?;

    let merged = merge(&header.encode(), &read(jpeg_path)?)
        .with_context(|| format!("failed to merge into {}", jpeg_path.display()))?;

    write_atomic(output, &merged).with_context(|| format!("failed to write {}", output.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jfif_splice::{JfifHeader, ScanStrategy};

    const JPEG: [u8; 26] = [
        0xFF, 0xD8, // SOI
        0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01, 0x02, 0x00, 0x00, 0x48, 0x00,
        0x48, 0x00, 0x00, // APP0
        0xFF, 0xDA, 0x00, 0x02, // SOS
        0xFF, 0xD9, // EOI
    ];

    #[test]
    fn extract_decode_encode_workflow() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("photo.jfif");
        fs::write(&input, JPEG)?;

        let outputs = extract_file(&input, None, &Options::default())?;
        assert_eq!(fs::read(&outputs[0])?, &JPEG[2..20]);
        assert_eq!(fs::read(&outputs[1])?.len(), JPEG.len() - 18);

        let xml_path = decode_file(&outputs[0], &Options::default())?;
        assert_eq!(xml_path, dir.path().join("photo.xml"));

        let merged_path = dir.path().join("photo_merged.jpg");
        merge_xml_file(&xml_path, &outputs[1], &merged_path, &Options::default())?;
        assert_eq!(fs::read(&merged_path)?, JPEG);

        let rebuilt = dir.path().join("rebuilt.jfif");
        merge_segment_file(&outputs[0], &outputs[1], &rebuilt)?;
        assert_eq!(fs::read(&rebuilt)?, JPEG);

        Ok(())
    }

    #[test]
    fn decode_reads_full_jpeg() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("photo.jpg");
        fs::write(&input, JPEG)?;

        let xml_path = decode_file(&input, &Options::default())?;
        let header = from_xml(&fs::read_to_string(xml_path)?, Default::default())?;
        assert_eq!(header.x_density, 72);
        assert_eq!(header, JfifHeader::decode(&JPEG[6..20])?);

        Ok(())
    }

    #[test]
    fn failures_leave_no_output() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("broken.jfif");
        fs::write(&input, [0xFFu8, 0xE0, 0x00, 0x02, 0xFF, 0xD8])?;

        let err = extract_file(&input, None, &Options::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<jfif_splice::Error>(),
            Some(jfif_splice::Error::InvalidOrdering { .. })
        ));
        assert!(!dir.path().join("broken.jfif_data").exists());
        assert!(!dir.path().join("broken.jpg").exists());

        Ok(())
    }

    #[test]
    fn extract_keeps_jpg_input_intact() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("photo.jpg");
        fs::write(&input, JPEG)?;

        let err = extract_file(&input, None, &Options::default()).unwrap_err();
        assert!(err.to_string().contains("--out-dir"));
        assert_eq!(fs::read(&input)?, JPEG);
        assert!(!dir.path().join("photo.jfif_data").exists());

        let out_dir = dir.path().join("split");
        fs::create_dir(&out_dir)?;
        let outputs = extract_file(&input, Some(out_dir.as_path()), &Options::default())?;

        assert_eq!(outputs, vec![out_dir.join("photo.jfif_data"), out_dir.join("photo.jpg")]);
        assert_eq!(fs::read(&input)?, JPEG);
        assert_eq!(fs::read(&outputs[0])?, &JPEG[2..20]);

        Ok(())
    }

    #[test]
    fn failed_body_write_leaves_no_segment() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("photo.jfif");
        fs::write(&input, JPEG)?;
        fs::create_dir(dir.path().join("photo.jpg"))?;

        assert!(extract_file(&input, None, &Options::default()).is_err());
        assert!(!dir.path().join("photo.jfif_data").exists());
        assert_eq!(fs::read(&input)?, JPEG);

        Ok(())
    }

    #[test]
    fn decode_follows_scan_strategy() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("commented.jpg");

        let mut stream = vec![
            0xFF, 0xD8, // SOI
            0xFF, 0xFE, 0x00, 0x06, 0xFF, 0xE0, 0x00, 0x02, // COM holding APP0 bytes
        ];
        stream.extend_from_slice(&JPEG[2..]);
        fs::write(&input, &stream)?;

        assert!(decode_file(&input, &Options::default()).is_err());

        let walk = Options {
            scan: ScanStrategy::SegmentWalk,
            ..Options::default()
        };
        let xml_path = decode_file(&input, &walk)?;
        let header = from_xml(&fs::read_to_string(xml_path)?, Default::default())?;
        assert_eq!(header, JfifHeader::decode(&JPEG[6..20])?);

        Ok(())
    }
}
