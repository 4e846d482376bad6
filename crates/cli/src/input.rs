//! Loading triangulations and slope tables from the command line.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use normsurf::api::{named_triangulation, StoredSlopes, Triangulation};
use normsurf::tri::special::NAMES;

/// Where the triangulation comes from: a named example or a JSON gluing table.
#[derive(Args, Clone, Debug)]
pub struct Source {
    /// Named example triangulation
    #[arg(long, conflicts_with = "tri")]
    pub name: Option<String>,
    /// JSON gluing table (`{"tetrahedra": [...]}`)
    #[arg(long)]
    pub tri: Option<PathBuf>,
}

impl Source {
    /// Short label for logs and provenance.
    pub fn label(&self) -> String {
        match (&self.name, &self.tri) {
            (Some(name), _) => name.clone(),
            (None, Some(path)) => path.display().to_string(),
            (None, None) => "<none>".to_string(),
        }
    }

    pub fn load(&self) -> Result<Triangulation> {
        match (&self.name, &self.tri) {
            (Some(name), _) => named(name),
            (None, Some(path)) => read_json(path),
            (None, None) => bail!("pass --name <example> or --tri <file.json>"),
        }
    }
}

fn named(name: &str) -> Result<Triangulation> {
    match named_triangulation(name) {
        Some(tri) => Ok(tri),
        None => bail!("unknown triangulation '{name}' (known: {})", NAMES.join(", ")),
    }
}

pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

pub fn read_slopes(path: &Path) -> Result<StoredSlopes> {
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn named_and_file_sources_agree() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fig8.json");
        let fig8 = named_triangulation("figure-eight").unwrap();
        fs::write(&path, serde_json::to_vec(&fig8).unwrap()).unwrap();

        let by_file = Source {
            name: None,
            tri: Some(path.clone()),
        };
        let by_name = Source {
            name: Some("figure-eight".into()),
            tri: None,
        };
        assert_eq!(by_file.load().unwrap(), by_name.load().unwrap());
        assert_eq!(by_file.label(), path.display().to_string());
    }

    #[test]
    fn unknown_name_lists_the_examples() {
        let src = Source {
            name: Some("nope".into()),
            tri: None,
        };
        let err = src.load().unwrap_err().to_string();
        assert!(err.contains("gieseking"));
        let none = Source { name: None, tri: None };
        assert!(none.load().is_err());
    }
}
