// src/manifest/render.rs

//! Rendering a manifest back to text.
//!
//! Every line keeps its original content and terminator, so rendering a
//! parsed manifest reproduces the input byte for byte.

use std::fmt;

use super::Manifest;

/// Render a manifest to text
pub fn render(manifest: &Manifest) -> String {
    let capacity = manifest
        .lines()
        .iter()
        .map(|l| l.content().len() + l.ending().as_str().len())
        .sum();

    let mut out = String::with_capacity(capacity);
    for line in manifest.lines() {
        out.push_str(line.content());
        out.push_str(line.ending().as_str());
    }
    out
}

impl Manifest {
    /// Render this manifest to text
    pub fn render(&self) -> String {
        render(self)
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            f.write_str(line.content())?;
            f.write_str(line.ending().as_str())?;
        }
        Ok(())
    }
}
