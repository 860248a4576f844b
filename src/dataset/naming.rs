//! Output file naming.

use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

/// How an input image's output basename is derived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum NamingScheme {
    /// `{collection acronym}_{basename}`, where the acronym is the first
    /// `_`-separated token of the parent directory name.
    ///
    /// Two collections sharing a leading token and a file basename map to
    /// the same name.
    #[default]
    Acronym,
    /// The path relative to the input root, extension dropped, with path
    /// separators and other unsafe characters replaced by `_`.
    RelativePath,
}

/// Derive the output basename (no extension) for an image.
pub fn output_basename(image: &Path, input_root: &Path, scheme: NamingScheme) -> String {
    match scheme {
        NamingScheme::Acronym => acronym_basename(image),
        NamingScheme::RelativePath => relative_path_basename(image, input_root),
    }
}

fn acronym_basename(image: &Path) -> String {
    let acronym = image
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    let acronym = acronym.split('_').next().unwrap_or_default();

    let file_name = image
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    let stem = file_name.split('.').next().unwrap_or_default();

    format!("{acronym}_{stem}")
}

fn relative_path_basename(image: &Path, input_root: &Path) -> String {
    let rel = image.strip_prefix(input_root).unwrap_or(image);
    let rel = rel.with_extension("");

    let parts: Vec<String> = rel
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(slug(&part.to_string_lossy())),
            _ => None,
        })
        .collect();
    parts.join("__")
}

fn slug(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
