//! Writing result lists as JSON or as flat tables (CSV / Parquet).
//!
//! Tables hold one row per solution. Vector entries are arbitrary-precision,
//! so the vector column is a space-separated string; scalar summaries that
//! fit in `i64` get their own columns.

use std::fs::{self, File};
use std::path::Path;

use anyhow::{bail, Context, Result};
use normsurf::api::{AngleStructureList, CoordVector, NormalSurfaceList, Triangulation};
use polars::prelude::*;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Json,
    Csv,
    Parquet,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("csv") => Ok(Format::Csv),
            Some("parquet") => Ok(Format::Parquet),
            other => bail!("unsupported output extension {other:?} (use .json, .csv or .parquet)"),
        }
    }
}

fn entries(v: &CoordVector) -> String {
    v.iter()
        .map(|x| x.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn surface_table(list: &NormalSurfaceList, tri: &Triangulation) -> PolarsResult<DataFrame> {
    let index: Vec<u32> = (0..list.len() as u32).collect();
    let vectors: Vec<String> = list.iter().map(|s| entries(s.vector())).collect();
    let euler: Vec<Option<i64>> = list
        .iter()
        .map(|s| {
            s.euler_characteristic(tri)
                .and_then(|chi| i64::try_from(&chi).ok())
        })
        .collect();
    let linking: Vec<bool> = list.iter().map(|s| s.is_vertex_linking()).collect();
    let octagon: Vec<bool> = list.iter().map(|s| s.has_octagon()).collect();
    let marked: Vec<bool> = list.iter().map(|s| s.is_marked()).collect();
    DataFrame::new(vec![
        Series::new("index".into(), index),
        Series::new("vector".into(), vectors),
        Series::new("euler".into(), euler),
        Series::new("vertex_linking".into(), linking),
        Series::new("octagon".into(), octagon),
        Series::new("marked".into(), marked),
    ])
}

pub fn angle_table(list: &AngleStructureList) -> PolarsResult<DataFrame> {
    let index: Vec<u32> = (0..list.len() as u32).collect();
    let vectors: Vec<String> = list.iter().map(|s| entries(s.vector())).collect();
    let strict: Vec<bool> = list.iter().map(|s| s.is_strict()).collect();
    let taut: Vec<bool> = list.iter().map(|s| s.is_taut()).collect();
    DataFrame::new(vec![
        Series::new("index".into(), index),
        Series::new("vector".into(), vectors),
        Series::new("strict".into(), strict),
        Series::new("taut".into(), taut),
    ])
}

/// Write `value` as JSON, or `table()` as CSV / Parquet, depending on the
/// extension of `path`. Returns the number of rows written for tables.
pub fn write<T, F>(path: &Path, value: &T, table: F) -> Result<Option<usize>>
where
    T: Serialize,
    F: FnOnce() -> PolarsResult<DataFrame>,
{
    let format = Format::from_path(path)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    if format == Format::Json {
        fs::write(path, serde_json::to_vec_pretty(value)?)
            .with_context(|| format!("writing {}", path.display()))?;
        return Ok(None);
    }
    let mut df = table().context("building output table")?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    match format {
        Format::Csv => CsvWriter::new(file).finish(&mut df)?,
        Format::Parquet => {
            ParquetWriter::new(file).finish(&mut df)?;
        }
        Format::Json => {}
    }
    tracing::info!(rows = df.height(), cols = df.width(), path = %path.display(), "table written");
    Ok(Some(df.height()))
}
