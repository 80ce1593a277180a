//! Reading packages from files, streams, and descriptors

use crate::error::Result;
use crate::evr::label_compare;
use crate::header::{load_immutable, load_signature, DecodedPackage, DEFAULT_MAX_DATA_LENGTH};
use crate::lead::read_lead;
use crate::package::PackageHeader;
use crate::range::locate;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options for an [`InspectContext`]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InspectOptions {
    /// Validate the lead before locating headers.  Without this, anything at
    /// all is accepted as a lead.
    pub strict_lead: bool,
    /// Reject header data stores of this many bytes or more
    pub max_data_length: u32,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            strict_lead: false,
            max_data_length: DEFAULT_MAX_DATA_LENGTH,
        }
    }
}

/// Reads packages according to a fixed set of options.
///
/// A context holds no state besides its options, so one context can be
/// shared between threads and reused for any number of packages.
#[derive(Clone, Debug, Default)]
pub struct InspectContext {
    options: InspectOptions,
}

impl InspectContext {
    pub fn new(options: InspectOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &InspectOptions {
        &self.options
    }

    /// Read the headers of the package in `source`, starting from offset 0
    /// no matter where the cursor is.
    pub fn read_package<R: Read + Seek>(&self, source: &mut R) -> Result<PackageHeader> {
        source.seek(SeekFrom::Start(0))?;
        if self.options.strict_lead {
            read_lead(source)?;
        }
        let ranges = locate(source)?;
        debug!(signature = ?ranges.signature, header = ?ranges.header, "located headers");
        source.seek(SeekFrom::Start(ranges.signature.start))?;
        let signature = load_signature(source, self.options.max_data_length)?;
        source.seek(SeekFrom::Start(ranges.header.start))?;
        let main = load_immutable(source, self.options.max_data_length)?;
        debug!(
            signature_entries = signature.len(),
            main_entries = main.len(),
            "decoded headers"
        );
        Ok(PackageHeader::new(DecodedPackage { signature, main }))
    }

    /// Read the headers of the package at `path`
    pub fn read_package_file<P: AsRef<Path>>(&self, path: P) -> Result<PackageHeader> {
        debug!(path = %path.as_ref().display(), "reading package");
        let mut file = BufReader::new(File::open(path)?);
        self.read_package(&mut file)
    }

    /// Read the headers of the package open on `fd`.  The descriptor is
    /// duplicated, so the caller keeps ownership, but the file offset is
    /// shared with the duplicate and will have moved.
    #[cfg(unix)]
    pub fn read_package_fd(&self, fd: std::os::unix::io::BorrowedFd<'_>) -> Result<PackageHeader> {
        let mut file = BufReader::new(File::from(fd.try_clone_to_owned()?));
        self.read_package(&mut file)
    }

    /// Build a model from a bare main header, such as one stored in a
    /// package database
    pub fn load_header(&self, mut bytes: &[u8]) -> Result<PackageHeader> {
        let main = load_immutable(&mut bytes, self.options.max_data_length)?;
        Ok(PackageHeader::from_main_header(main))
    }

    /// Read every package in `paths` and sort them by name, then by EVR.
    /// Packages that compare equal keep their relative order.
    pub fn sort_package_files<I>(&self, paths: I) -> Result<Vec<(PathBuf, PackageHeader)>>
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        let mut packages = paths
            .into_iter()
            .map(|path| {
                let path = path.as_ref().to_owned();
                let header = self.read_package_file(&path)?;
                Ok((header.named_evr(), path, header))
            })
            .collect::<Result<Vec<_>>>()?;
        packages.sort_by(|a, b| label_compare(&a.0, &b.0));
        Ok(packages
            .into_iter()
            .map(|(_, path, header)| (path, header))
            .collect())
    }
}
