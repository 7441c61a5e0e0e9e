//! Tests for the detection engine and registry

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::extractor::{PlaneReader, RawPlaneReader};
use crate::format::checker::{has_suffix, SignatureChecker};
use crate::format::detect::{detect_by_name, detect_format};
use crate::format::errors::{FormatError, FormatResult};
use crate::format::kontron::{self, KontronParser};
use crate::format::metadata::ImageMetadata;
use crate::format::registry::{FormatEntry, FormatRegistry};
use crate::format::traits::Checker;
use crate::io::handle::DataHandle;

fn raw_reader(metadata: ImageMetadata, handle: DataHandle) -> Box<dyn PlaneReader> {
    Box::new(RawPlaneReader::new(metadata, handle, 0))
}

/// Checker that records how often it ran
struct CountingChecker {
    calls: Arc<AtomicUsize>,
    answer: bool,
}

impl Checker for CountingChecker {
    fn is_format(&self, _handle: &mut DataHandle) -> FormatResult<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer)
    }
}

fn counting_entry(name: &str, answer: bool, calls: &Arc<AtomicUsize>) -> FormatEntry {
    FormatEntry::new(
        name,
        Box::new(CountingChecker { calls: Arc::clone(calls), answer }),
        Box::new(KontronParser),
        raw_reader,
    )
    .with_suffixes(&["abc"])
}

fn sample_file() -> Vec<u8> {
    let mut data = kontron::encode_header(4, 2);
    data.extend([0u8; 8]);
    data
}

#[test]
fn test_has_suffix() {
    let suffixes = vec!["img".to_string(), ".tif".to_string()];
    assert!(has_suffix("scan.IMG", &suffixes));
    assert!(has_suffix("dir/scan.tif", &suffixes));
    assert!(!has_suffix("scanimg", &suffixes));
    assert!(!has_suffix("img", &suffixes));
    assert!(!has_suffix("scan.png", &suffixes));
}

#[test]
fn test_builtin_registry() {
    let registry = FormatRegistry::with_builtin_formats();
    assert_eq!(registry.len(), 1);
    let entry = registry.get("kontron").unwrap();
    assert_eq!(entry.signature(), Some(&kontron::KONTRON_ID[..]));
    assert!(!entry.is_suffix_sufficient());
    assert!(!entry.is_suffix_necessary());
}

#[test]
fn test_duplicate_registration_rejected() {
    let mut registry = FormatRegistry::with_builtin_formats();
    assert!(registry.register(kontron::format_entry()).is_err());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_kontron_detected_by_signature_despite_suffix() {
    let registry = FormatRegistry::with_builtin_formats();
    let mut handle = DataHandle::from_bytes(sample_file());

    let entry = detect_format(&registry, "capture.bin", &mut handle).unwrap();
    assert_eq!(entry.name(), "Kontron");
    assert_eq!(handle.offset(), 0);
}

#[test]
fn test_kontron_suffix_alone_is_not_enough() {
    let registry = FormatRegistry::with_builtin_formats();
    assert!(detect_by_name(&registry, "scan.img").is_none());

    let mut handle = DataHandle::from_bytes(vec![0u8; 200]);
    let result = detect_format(&registry, "scan.img", &mut handle);
    assert!(matches!(result, Err(FormatError::UnsupportedFormat(_))));
}

#[test]
fn test_sufficient_suffix_skips_byte_checks() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = FormatRegistry::new();
    registry
        .register(counting_entry("ByName", false, &calls).suffix_sufficient(true))
        .unwrap();

    let mut handle = DataHandle::from_bytes(Vec::new());
    let entry = detect_format(&registry, "file.ABC", &mut handle).unwrap();
    assert_eq!(entry.name(), "ByName");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_necessary_suffix_gates_checker() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut registry = FormatRegistry::new();
    registry
        .register(counting_entry("Gated", true, &calls).suffix_necessary(true))
        .unwrap();

    let mut handle = DataHandle::from_bytes(vec![1, 2, 3]);
    let result = detect_format(&registry, "file.xyz", &mut handle);
    assert!(matches!(result, Err(FormatError::UnsupportedFormat(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let entry = detect_format(&registry, "file.abc", &mut handle).unwrap();
    assert_eq!(entry.name(), "Gated");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_registration_order_decides_ties() {
    let first_calls = Arc::new(AtomicUsize::new(0));
    let second_calls = Arc::new(AtomicUsize::new(0));
    let mut registry = FormatRegistry::new();
    registry.register(counting_entry("First", true, &first_calls)).unwrap();
    registry.register(counting_entry("Second", true, &second_calls)).unwrap();

    let mut handle = DataHandle::from_bytes(vec![0u8; 4]);
    let entry = detect_format(&registry, "file.abc", &mut handle).unwrap();
    assert_eq!(entry.name(), "First");
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_offset_signature_checker_in_registry() {
    let mut registry = FormatRegistry::new();
    registry
        .register(FormatEntry::new(
            "Tagged",
            Box::new(SignatureChecker::at_offset(b"TAG", 2)),
            Box::new(KontronParser),
            raw_reader,
        ))
        .unwrap();

    let mut handle = DataHandle::from_bytes(b"..TAG..".to_vec());
    assert_eq!(detect_format(&registry, "x", &mut handle).unwrap().name(), "Tagged");

    let mut other = DataHandle::from_bytes(b"TAG....".to_vec());
    assert!(detect_format(&registry, "x", &mut other).is_err());
}

#[test]
fn test_detection_on_closed_handle_fails() {
    let registry = FormatRegistry::with_builtin_formats();
    let mut handle = DataHandle::from_bytes(sample_file());
    handle.close().unwrap();
    assert!(matches!(
        detect_format(&registry, "a.img", &mut handle),
        Err(FormatError::ClosedHandle)
    ));
}

#[test]
fn test_entry_signature_comes_from_checker() {
    let calls = Arc::new(AtomicUsize::new(0));
    assert_eq!(counting_entry("Opaque", true, &calls).signature(), None);

    let tagged = FormatEntry::new(
        "Tagged",
        Box::new(SignatureChecker::at_offset(b"TAG", 2)),
        Box::new(KontronParser),
        raw_reader,
    );
    assert_eq!(tagged.signature(), Some(&b"TAG"[..]));
    assert_eq!(tagged.checker().signature(), tagged.signature());
}
