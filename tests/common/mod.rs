// tests/common/mod.rs

//! Shared test utilities and fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use tempfile::TempDir;

/// System dependencies of an OCR and image-processing service.
pub const OCR_MANIFEST: &str = "\
# Graphics libraries
libgl1
libglib2.0-0
libsm6
libxext6
libxrender1

# Tesseract OCR and language dependencies
tesseract-ocr
tesseract-ocr-ara
tesseract-ocr-fra
tesseract-ocr-eng

# Linear algebra libraries
libopenblas-dev
liblapack-dev
gfortran

# Locale packs
locales
language-pack-ar
language-pack-fr

# Utility libraries
poppler-utils
ghostscript
";

/// Write `content` to a manifest file in a fresh temp directory.
///
/// Returns (TempDir, manifest path) - keep the TempDir alive to prevent cleanup.
pub fn write_manifest(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("packages.txt");
    std::fs::write(&path, content).unwrap();
    (temp_dir, path)
}
