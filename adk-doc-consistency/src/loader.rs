//! Reading claim and fact files.
//!
//! JSON files may hold either a bare array or an object with a `claims` /
//! `facts` array. TOML files use `[[claims]]` / `[[facts]]` tables.

use crate::batch::DocumentClaims;
use crate::error::{CheckError, Result};
use crate::model::{Claim, SymbolFact};
use crate::reference::ReferenceTable;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonList<T> {
    Bare(Vec<T>),
    Claims { claims: Vec<T> },
    Facts { facts: Vec<T> },
}

impl<T> JsonList<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            JsonList::Bare(items) => items,
            JsonList::Claims { claims } => claims,
            JsonList::Facts { facts } => facts,
        }
    }
}

#[derive(Deserialize)]
struct TomlClaims {
    #[serde(default)]
    claims: Vec<Claim>,
}

#[derive(Deserialize)]
struct TomlFacts {
    #[serde(default)]
    facts: Vec<SymbolFact>,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> Result<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        _ => Err(CheckError::UnsupportedFormat(path.to_path_buf())),
    }
}

fn parse_json_list<T: DeserializeOwned>(content: &str) -> Result<Vec<T>> {
    Ok(serde_json::from_str::<JsonList<T>>(content)?.into_vec())
}

/// Load the claims of one document.
pub fn load_claims(path: impl AsRef<Path>) -> Result<Vec<Claim>> {
    let path = path.as_ref();
    let format = format_of(path)?;
    let content = std::fs::read_to_string(path)?;
    let claims = match format {
        Format::Json => parse_json_list(&content)?,
        Format::Toml => toml::from_str::<TomlClaims>(&content)?.claims,
    };
    debug!("Loaded {} claims from {}", claims.len(), path.display());
    Ok(claims)
}

/// Load a claims file as a named document.
pub fn load_document(path: impl AsRef<Path>) -> Result<DocumentClaims> {
    let path = path.as_ref();
    Ok(DocumentClaims::new(path.display().to_string(), load_claims(path)?))
}

/// Load reference facts.
pub fn load_facts(path: impl AsRef<Path>) -> Result<Vec<SymbolFact>> {
    let path = path.as_ref();
    let format = format_of(path)?;
    let content = std::fs::read_to_string(path)?;
    let facts = match format {
        Format::Json => parse_json_list(&content)?,
        Format::Toml => toml::from_str::<TomlFacts>(&content)?.facts,
    };
    debug!("Loaded {} facts from {}", facts.len(), path.display());
    Ok(facts)
}

/// Load and merge several fact files into one table.
pub fn load_reference_table<P: AsRef<Path>>(paths: &[P]) -> Result<ReferenceTable> {
    let mut table = ReferenceTable::new();
    for path in paths {
        table.extend(load_facts(path)?);
    }
    Ok(table)
}
