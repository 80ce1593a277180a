use rpm_inspect::header::tags::*;
use rpm_inspect::{
    locate, read_header_region, ChecksumAlgorithm, DecodedHeader, InspectContext, InspectOptions,
    RpmLead, SignatureKind, TagValue,
};
use rpm_writer::{HeaderBuilder, HeaderKind, PackageWriter};
use std::fs::File;
use std::io::{Cursor, Write};

fn string(s: &str) -> TagValue {
    TagValue::String(s.to_owned())
}

/// A signature of `len` bytes where byte `i` is `i`
fn counting(len: usize) -> Vec<u8> {
    (0..len).map(|i| i as u8).collect()
}

fn main_builder(name: &str, version: &str, release: &str, epoch: Option<u32>) -> HeaderBuilder {
    let mut main = HeaderBuilder::new(HeaderKind::Main);
    main.push(RPMTAG_NAME, string(name));
    main.push(RPMTAG_VERSION, string(version));
    main.push(RPMTAG_RELEASE, string(release));
    main.push(RPMTAG_OS, string("linux"));
    main.push(RPMTAG_ARCH, string("x86_64"));
    main.push(RPMTAG_FILEDIGESTALGO, TagValue::Int32(vec![8]));
    main.push(
        1004,
        TagValue::I18NString(vec!["A lightweight language".to_owned()]),
    );
    main.push(1118, TagValue::StringArray(vec!["/usr".to_owned(), "/usr/bin".to_owned()]));
    if let Some(epoch) = epoch {
        main.push(RPMTAG_EPOCH, TagValue::Int32(vec![epoch]));
    }
    main
}

fn signature_builder() -> HeaderBuilder {
    let mut signature = HeaderBuilder::new(HeaderKind::Signature);
    signature.push(RPMSIGTAG_RSA, TagValue::Bin(counting(287)));
    signature.push(RPMSIGTAG_SHA1, string("da39a3ee5e6b4b0d3255bfef95601890afd80709"));
    signature.push(
        RPMSIGTAG_SHA256,
        string("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"),
    );
    signature.push(RPMSIGTAG_SIZE, TagValue::Int32(vec![1234]));
    signature.push(RPMSIGTAG_MD5, TagValue::Bin(counting(16)));
    signature.push(RPMSIGTAG_GPG, TagValue::Bin(counting(543)));
    signature
}

fn package(name: &str, version: &str, release: &str, epoch: Option<u32>) -> Vec<u8> {
    PackageWriter::new(
        RpmLead::new(false, 1, 1, name.as_bytes()),
        signature_builder(),
        main_builder(name, version, release, epoch),
    )
    .to_vec(b"not really a cpio archive")
    .unwrap()
}

#[test]
fn reads_written_package() {
    let bytes = package("lua", "5.4.2", "1.fc33", None);
    let strict = InspectContext::new(InspectOptions {
        strict_lead: true,
        ..Default::default()
    });
    let pkg = strict.read_package(&mut Cursor::new(&bytes)).unwrap();
    assert_eq!(pkg.name(), "lua");
    assert_eq!(pkg.evr().to_string(), "5.4.2-1.fc33");
    assert_eq!(pkg.arch(), Some("x86_64"));
    assert_eq!(pkg.checksum_algorithm(), ChecksumAlgorithm::Sha256);
    assert!(!pkg.is_source_package());
    assert!(pkg.is_signed());
    let signatures: Vec<_> = pkg
        .signatures()
        .iter()
        .map(|s| (s.signature_type, &*s.key_id))
        .collect();
    assert_eq!(
        signatures,
        [
            (SignatureKind::Rsa, "0a0b0c0d0e0f1011"),
            (SignatureKind::Gpg, "131415161718191a"),
        ]
    );
    let header = &pkg.raw_header().main;
    assert_eq!(header.region_tag(), Some(RPMTAG_HEADERIMMUTABLE));
    assert_eq!(
        header.get(1118),
        Some(&TagValue::StringArray(vec!["/usr".to_owned(), "/usr/bin".to_owned()]))
    );
    assert_eq!(pkg.raw_header().signature.region_tag(), Some(RPMTAG_HEADERSIGNATURES));
}

#[test]
fn ranges_cover_the_headers() {
    let bytes = package("lua", "5.4.2", "1.fc33", Some(3));
    let mut c = Cursor::new(&bytes);
    let ranges = locate(&mut c).unwrap();
    assert_eq!(ranges.signature.start, 96);
    assert_eq!(ranges.signature.len() % 8, 0);
    assert_eq!(ranges.header.start, ranges.signature.end);
    let payload_start = bytes.len() - b"not really a cpio archive".len();
    // the main header is not padded, so its range may run into the payload
    assert!(ranges.header.end >= payload_start as u64);
    assert!(ranges.header.end - (payload_start as u64) < 8);

    let main = read_header_region(&mut c, ranges.header).unwrap();
    let decoded = DecodedHeader::parse(&main).unwrap();
    assert_eq!(decoded.get(RPMTAG_EPOCH), Some(&TagValue::Int32(vec![3])));
}

#[test]
fn reemits_decoded_headers() {
    let bytes = package("lua", "5.4.2", "1.fc33", Some(1));
    let ctx = InspectContext::default();
    let pkg = ctx.read_package(&mut Cursor::new(&bytes)).unwrap();
    let raw = pkg.raw_header();
    let ranges = locate(&mut Cursor::new(&bytes)).unwrap();
    let main_start = ranges.header.start as usize;

    let main = HeaderBuilder::from_decoded(HeaderKind::Main, &raw.main);
    let emitted = main.to_vec().unwrap();
    assert_eq!(&bytes[main_start..main_start + emitted.len()], &emitted[..]);
    assert_eq!(DecodedHeader::parse(&emitted).unwrap(), raw.main);

    let signature = HeaderBuilder::from_decoded(HeaderKind::Signature, &raw.signature);
    let emitted = signature.to_vec().unwrap();
    assert_eq!(&bytes[96..96 + emitted.len()], &emitted[..]);

    let copy = PackageWriter::new(RpmLead::new(false, 1, 1, b"lua"), signature, main)
        .to_vec(b"not really a cpio archive")
        .unwrap();
    assert_eq!(copy, bytes);
}

#[test]
fn digests_alone_are_not_signatures() {
    let mut signature = signature_builder();
    assert!(signature.remove(RPMSIGTAG_GPG).is_some());
    assert!(signature.remove(RPMSIGTAG_RSA).is_some());
    assert_eq!(signature.remove(RPMSIGTAG_PGP), None);
    let bytes = PackageWriter::new(
        RpmLead::new(false, 1, 1, b"lua"),
        signature,
        main_builder("lua", "5.4.2", "1.fc33", None),
    )
    .to_vec(b"")
    .unwrap();
    let pkg = InspectContext::default()
        .read_package(&mut Cursor::new(&bytes))
        .unwrap();
    assert!(pkg.signatures().is_empty());
    assert!(!pkg.is_signed());
    let digests = &pkg.raw_header().signature;
    assert_eq!(digests.get(RPMSIGTAG_MD5), Some(&TagValue::Bin(counting(16))));
    assert!(digests.get(RPMSIGTAG_SHA256).is_some());
}

#[test]
fn bare_header_has_no_signatures() {
    let main = main_builder("bash", "5.1", "2", None).to_vec().unwrap();
    let pkg = InspectContext::default().load_header(&main).unwrap();
    assert_eq!(pkg.name(), "bash");
    assert!(pkg.signatures().is_empty());
    assert!(!pkg.is_signed());
}

#[test]
fn source_packages() {
    let mut main = main_builder("lua", "5.4.2", "1.fc33", None);
    main.push(RPMTAG_SOURCEPACKAGE, TagValue::Int32(vec![1]));
    main.push(RPMTAG_FILEDIGESTALGO, TagValue::Int32(vec![4]));
    let bytes = PackageWriter::new(
        RpmLead::new(true, 0, 1, b"lua"),
        HeaderBuilder::new(HeaderKind::Signature),
        main,
    )
    .to_vec(b"")
    .unwrap();
    let pkg = InspectContext::default()
        .read_package(&mut Cursor::new(&bytes))
        .unwrap();
    assert!(pkg.is_source_package());
    assert_eq!(pkg.checksum_algorithm(), ChecksumAlgorithm::Md5);
    assert!(!pkg.is_signed());
}

#[test]
fn sorts_package_files() {
    let dir = tempfile::tempdir().unwrap();
    let packages = [
        ("1.rpm", package("zlib", "1.2.11", "1", None)),
        ("2.rpm", package("lua", "5.4.2", "1.fc33", None)),
        ("3.rpm", package("lua", "5.4.0", "1.fc33", Some(0))),
        ("4.rpm", package("lua", "5.4.2", "1.fc33", None)),
        ("5.rpm", package("lua", "5.4.10", "1.fc33", None)),
        ("6.rpm", package("bash", "5.1", "2", None)),
    ];
    let mut paths = vec![];
    for (file, bytes) in &packages {
        let path = dir.path().join(file);
        File::create(&path).unwrap().write_all(bytes).unwrap();
        paths.push(path);
    }
    let sorted = InspectContext::default().sort_package_files(&paths).unwrap();
    let order: Vec<_> = sorted
        .iter()
        .map(|(path, _)| path.file_name().unwrap().to_str().unwrap())
        .collect();
    assert_eq!(order, ["6.rpm", "2.rpm", "4.rpm", "5.rpm", "3.rpm", "1.rpm"]);
    let names: Vec<_> = sorted.iter().map(|(_, pkg)| pkg.name()).collect();
    assert_eq!(names, ["bash", "lua", "lua", "lua", "lua", "zlib"]);
}
