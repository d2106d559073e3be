//! Fixture discovery and parsing.
//!
//! Every `.ttl` and `.nt` file under the fixture directory is a fixture.
//! A Turtle file and an N-Triples file sharing a stem describe the same graph.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use ibnode::Graph;
use sophia_api::source::TripleSource;
use sophia_inmem::graph::LightGraph;
use walkdir::WalkDir;

/// Concrete syntax of a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Syntax {
    /// Turtle 1.1.
    Turtle,
    /// N-Triples.
    NTriples,
}

impl Syntax {
    /// Syntax implied by a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "ttl" => Some(Syntax::Turtle),
            "nt" => Some(Syntax::NTriples),
            _ => None,
        }
    }
}

/// A parsed fixture.
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Path relative to the fixture directory, without extension.
    pub name: String,
    /// Syntax it was written in.
    pub syntax: Syntax,
    /// The parsed graph.
    pub graph: Graph,
}

impl Fixture {
    /// `name.ext`, for reports.
    #[must_use]
    pub fn label(&self) -> String {
        match self.syntax {
            Syntax::Turtle => format!("{}.ttl", self.name),
            Syntax::NTriples => format!("{}.nt", self.name),
        }
    }
}

/// Parses one document.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn parse(path: &Path, syntax: Syntax) -> Result<Graph> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let parsed: LightGraph = match syntax {
        Syntax::Turtle => sophia_turtle::parser::turtle::parse_str(&text)
            .collect_triples()
            .map_err(|e| anyhow!("Failed to parse {}: {e}", path.display()))?,
        Syntax::NTriples => sophia_turtle::parser::nt::parse_str(&text)
            .collect_triples()
            .map_err(|e| anyhow!("Failed to parse {}: {e}", path.display()))?,
    };
    Graph::from_sophia(&parsed).with_context(|| format!("Failed to convert {}", path.display()))
}

/// Loads every fixture under `dir`, sorted by name then syntax.
///
/// # Errors
///
/// Returns an error if the directory cannot be walked or a fixture fails
/// to parse.
pub fn discover(dir: &Path) -> Result<Vec<Fixture>> {
    let mut fixtures = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        let path = entry.path();
        let Some(syntax) = Syntax::from_path(path) else {
            continue;
        };
        let name = stem(dir, path);
        tracing::debug!(fixture = %name, ?syntax, "loading fixture");
        fixtures.push(Fixture {
            name,
            syntax,
            graph: parse(path, syntax)?,
        });
    }
    fixtures.sort_by(|a, b| (&a.name, a.syntax).cmp(&(&b.name, b.syntax)));
    Ok(fixtures)
}

/// Groups fixtures that share a name.
#[must_use]
pub fn twins(fixtures: &[Fixture]) -> BTreeMap<&str, Vec<&Fixture>> {
    let mut groups: BTreeMap<&str, Vec<&Fixture>> = BTreeMap::new();
    for fixture in fixtures {
        groups.entry(fixture.name.as_str()).or_default().push(fixture);
    }
    groups
}

fn stem(dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(dir).unwrap_or(path);
    let without_ext: PathBuf = relative.with_extension("");
    without_ext
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
