//! Parsing of upstream manifest documents.
//!
//! Only the top-level `<project>` and `<include>` elements of a manifest are
//! of interest; everything else (remotes, defaults, copyfiles, ...) is
//! ignored. The document only has to be well-formed XML.

use log::debug;
use xot::Xot;

use crate::error::{Error, Result};

/// A project observed in one revision's document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredProject {
    pub name: String,
    pub path: Option<String>,
    pub remote: Option<String>,
}

impl DeclaredProject {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            remote: None,
        }
    }
}

/// Contents of one manifest document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    pub projects: Vec<DeclaredProject>,
    /// Names of documents pulled in with `<include name="..."/>`.
    pub includes: Vec<String>,
}

/// Parse `bytes` as the manifest `document` of `revision`.
///
/// An empty document is an empty manifest rather than an error.
pub fn parse_document(revision: &str, document: &str, bytes: &[u8]) -> Result<ParsedDocument> {
    let malformed = |message: String| Error::MalformedDocument {
        revision: revision.to_string(),
        document: document.to_string(),
        message,
    };

    let text = std::str::from_utf8(bytes).map_err(|e| malformed(e.to_string()))?;
    if text.trim().is_empty() {
        return Ok(ParsedDocument::default());
    }

    let mut xot = Xot::new();
    let root = xot.parse(text).map_err(|e| malformed(e.to_string()))?;
    let manifest = xot
        .document_element(root)
        .map_err(|e| malformed(e.to_string()))?;

    let project_tag = xot.add_name("project");
    let include_tag = xot.add_name("include");
    let name_attr = xot.add_name("name");
    let path_attr = xot.add_name("path");
    let remote_attr = xot.add_name("remote");

    let mut parsed = ParsedDocument::default();
    for child in xot.children(manifest) {
        let Some(element) = xot.element(child) else {
            continue;
        };
        let tag = element.name();
        if tag != project_tag && tag != include_tag {
            continue;
        }

        let Some(name) = xot.get_attribute(child, name_attr) else {
            debug!("{}@{}: skipping element without a name", document, revision);
            continue;
        };

        if tag == include_tag {
            parsed.includes.push(name.to_string());
        } else {
            parsed.projects.push(DeclaredProject {
                name: name.to_string(),
                path: xot.get_attribute(child, path_attr).map(str::to_string),
                remote: xot.get_attribute(child, remote_attr).map(str::to_string),
            });
        }
    }

    Ok(parsed)
}
