//! Rendering an aggregate manifest as a repo manifest document.
//!
//! The layout is fixed: one `<remote>` and one `<default>` element followed
//! by a `<project>` per entry, already sorted by name. Groups are joined
//! with commas in lexicographic order, so rendering the same manifest twice
//! gives byte-identical output.

use std::io::{self, Write};

use crate::classifier::join_labels;
use crate::phases::AggregateManifest;

/// The `<remote>`/`<default>` header of a generated manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestHeader {
    pub remote_name: String,
    pub fetch: String,
    pub review: Option<String>,
    /// Omitted from `<default>` when `None`.
    pub revision: Option<String>,
    pub sync_j: u32,
}

/// Write `manifest` as XML to `out`.
pub fn write_manifest<W: Write>(
    manifest: &AggregateManifest,
    header: &ManifestHeader,
    mut out: W,
) -> io::Result<()> {
    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(out, "<manifest>")?;
    writeln!(out)?;

    writeln!(out, r#"  <remote  name="{}""#, escape(&header.remote_name))?;
    if let Some(review) = &header.review {
        writeln!(out, r#"           review="{}""#, escape(review))?;
    }
    writeln!(out, r#"           fetch="{}" />"#, escape(&header.fetch))?;

    match &header.revision {
        Some(revision) => {
            writeln!(out, r#"  <default revision="{}""#, escape(revision))?;
            writeln!(out, r#"           remote="{}""#, escape(&header.remote_name))?;
        }
        None => writeln!(out, r#"  <default remote="{}""#, escape(&header.remote_name))?,
    }
    writeln!(out, r#"           sync-j="{}" />"#, header.sync_j)?;
    writeln!(out)?;

    for entry in &manifest.entries {
        write!(out, r#"  <project name="{}""#, escape(&entry.name))?;
        if let Some(path) = &entry.path {
            write!(out, r#" path="{}""#, escape(path))?;
        }
        if !entry.groups.is_empty() {
            write!(out, r#" groups="{}""#, escape(&join_labels(&entry.groups)))?;
        }
        writeln!(out, " />")?;
    }

    writeln!(out, "</manifest>")?;
    out.flush()
}

/// Render `manifest` into a string.
pub fn render_to_string(manifest: &AggregateManifest, header: &ManifestHeader) -> io::Result<String> {
    let mut buffer = Vec::new();
    write_manifest(manifest, header, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Escape a value for use inside a double-quoted XML attribute.
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
