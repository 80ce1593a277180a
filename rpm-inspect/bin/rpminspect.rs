mod args;

use anyhow::{Context, Result};
use clap::Parser;
use rpm_inspect::{
    compare_evr, locate, ChecksumAlgorithm, HeaderByteRanges, InspectContext, PackageHeader,
    SignatureRecord,
};
use serde::Serialize;
use std::cmp::Ordering;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use args::{Args, Command};

#[derive(Serialize)]
struct RangesReport<'a> {
    path: &'a Path,
    #[serde(flatten)]
    ranges: HeaderByteRanges,
}

#[derive(Serialize)]
struct InfoReport<'a> {
    path: &'a Path,
    name: &'a str,
    evr: String,
    arch: Option<&'a str>,
    source: bool,
    checksum: ChecksumAlgorithm,
    signed: bool,
    signatures: &'a [SignatureRecord],
}

impl<'a> InfoReport<'a> {
    fn new(path: &'a Path, package: &'a PackageHeader) -> Self {
        Self {
            path,
            name: package.name(),
            evr: package.evr().to_string(),
            arch: package.arch(),
            source: package.is_source_package(),
            checksum: package.checksum_algorithm(),
            signed: package.is_signed(),
            signatures: package.signatures(),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    let ctx = InspectContext::new(args.options());
    match args.command {
        Command::Ranges { json, files } => ranges(&files, json),
        Command::Info { json, files } => show_info(&ctx, &files, json),
        Command::Vercmp { left, right } => {
            println!("{}", ordering_symbol(compare_evr(&left, &right)));
            Ok(())
        }
        Command::Sort { files } => sort(&ctx, &files),
    }
}

fn ordering_symbol(ordering: Ordering) -> &'static str {
    match ordering {
        Ordering::Less => "<",
        Ordering::Equal => "=",
        Ordering::Greater => ">",
    }
}

fn ranges(files: &[PathBuf], json: bool) -> Result<()> {
    let mut reports = Vec::with_capacity(files.len());
    for path in files {
        info!(package = %path.display(), "Locating headers");
        let mut file = BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        );
        let ranges = locate(&mut file)
            .with_context(|| format!("Failed to locate headers: {}", path.display()))?;
        reports.push(RangesReport { path, ranges });
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for RangesReport { path, ranges } in &reports {
            println!(
                "{}: signature={}..{} header={}..{}",
                path.display(),
                ranges.signature.start,
                ranges.signature.end,
                ranges.header.start,
                ranges.header.end
            );
        }
    }
    Ok(())
}

fn read(ctx: &InspectContext, path: &Path) -> Result<PackageHeader> {
    info!(package = %path.display(), "Reading package");
    ctx.read_package_file(path)
        .with_context(|| format!("Failed to read package: {}", path.display()))
}

fn show_info(ctx: &InspectContext, files: &[PathBuf], json: bool) -> Result<()> {
    let packages = files
        .iter()
        .map(|path| read(ctx, path))
        .collect::<Result<Vec<_>>>()?;
    let reports: Vec<_> = files
        .iter()
        .zip(&packages)
        .map(|(path, package)| InfoReport::new(path, package))
        .collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }
    for report in &reports {
        println!("{}:", report.path.display());
        println!("  name: {}", report.name);
        println!("  evr: {}", report.evr);
        if let Some(arch) = report.arch {
            println!("  arch: {}", arch);
        }
        println!("  source: {}", report.source);
        println!("  checksum: {}", report.checksum);
        println!("  signed: {}", report.signed);
        for signature in report.signatures {
            println!("  signature: {} {}", signature.signature_type, signature.key_id);
        }
    }
    Ok(())
}

fn sort(ctx: &InspectContext, files: &[PathBuf]) -> Result<()> {
    info!(count = files.len(), "Sorting packages");
    let sorted = ctx
        .sort_package_files(files)
        .context("Failed to sort packages")?;
    for (path, _) in &sorted {
        println!("{}", path.display());
    }
    Ok(())
}
