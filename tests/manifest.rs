// tests/manifest.rs

//! Parse/render tests against a realistic manifest.

mod common;

use common::OCR_MANIFEST;
use pkgmanifest::manifest::LineKind;
use pkgmanifest::{parse_manifest, render, Manifest, PackageEntry, ParseError};
use std::collections::HashSet;

#[test]
fn test_render_parse_roundtrip() {
    let manifest = parse_manifest(OCR_MANIFEST).unwrap();
    assert_eq!(render(&manifest), OCR_MANIFEST);

    let crlf = OCR_MANIFEST.replace('\n', "\r\n");
    assert_eq!(parse_manifest(&crlf).unwrap().render(), crlf);

    let unterminated = OCR_MANIFEST.trim_end();
    assert_eq!(parse_manifest(unterminated).unwrap().render(), unterminated);
}

#[test]
fn test_names_are_unique() {
    let manifest = parse_manifest(OCR_MANIFEST).unwrap();
    let names = manifest.names();
    let unique: HashSet<&str> = names.iter().copied().collect();

    assert_eq!(names.len(), 17);
    assert_eq!(unique.len(), names.len());
}

#[test]
fn test_tesseract_group() {
    let text = "\
# Tesseract OCR and language dependencies
tesseract-ocr
tesseract-ocr-ara
tesseract-ocr-fra
tesseract-ocr-eng
";
    let manifest = parse_manifest(text).unwrap();
    let entries: Vec<&PackageEntry> = manifest.entries().collect();

    assert_eq!(entries.len(), 4);
    for entry in entries {
        assert_eq!(
            entry.group.as_deref(),
            Some("Tesseract OCR and language dependencies")
        );
    }
}

#[test]
fn test_blank_line_between_groups_is_not_an_entry() {
    let manifest = parse_manifest("# Graphics libraries\nlibgl1\n\n# Utility libraries\npoppler-utils\n").unwrap();

    assert_eq!(manifest.len(), 2);
    assert_eq!(*manifest.lines()[2].kind(), LineKind::Blank);
}

#[test]
fn test_utility_libraries_entry() {
    let manifest = parse_manifest(OCR_MANIFEST).unwrap();
    assert_eq!(
        manifest.get("poppler-utils"),
        Some(&PackageEntry {
            group: Some("Utility libraries".to_string()),
            name: "poppler-utils".to_string(),
        })
    );
}

#[test]
fn test_whitespace_only_line() {
    let manifest = parse_manifest("# Locale packs\nlocales\n   \t \nlanguage-pack-fr\n").unwrap();
    assert_eq!(manifest.names(), vec!["locales", "language-pack-fr"]);
}

#[test]
fn test_groups_in_order() {
    let manifest = parse_manifest(OCR_MANIFEST).unwrap();
    let labels: Vec<String> = manifest
        .groups()
        .into_iter()
        .filter_map(|g| g.label)
        .collect();

    assert_eq!(
        labels,
        vec![
            "Graphics libraries",
            "Tesseract OCR and language dependencies",
            "Linear algebra libraries",
            "Locale packs",
            "Utility libraries",
        ]
    );
}

#[test]
fn test_duplicate_across_groups() {
    let text = format!("{}\n# Extra\nlibgl1\n", OCR_MANIFEST);
    let err = parse_manifest(&text).unwrap_err();

    assert!(matches!(
        err,
        ParseError::DuplicatePackage { ref name, first_line: 2, .. } if name == "libgl1"
    ));
}

#[test]
fn test_malformed_line_reports_position() {
    let text = OCR_MANIFEST.replace("gfortran", "gfortran libgfortran5");
    let err = text.parse::<Manifest>().unwrap_err();

    assert_eq!(err.line(), 17);
    assert!(err.to_string().contains("line 17"));
}
