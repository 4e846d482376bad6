use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use normsurf::api::{
    AngleStructureList, BanBoundary, BanNone, BanTorusBoundary, ConverterCfg, Coords, EnumCfg,
    EnumMode, EulerPositive, NoConstraint, NormalSurfaceList, ProgressTracker, TreeSingleSolution,
    Which,
};
use serde_json::json;
use tracing_subscriber::fmt::SubscriberBuilder;

mod input;
mod output;
mod provenance;

use input::Source;
use provenance::Payload;

#[derive(Parser)]
#[command(name = "normsurf")]
#[command(about = "Normal surface and angle structure enumeration")]
struct Cmd {
    /// Log library debug events (tableau and constraint decisions)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BanKind {
    None,
    Boundary,
    TorusBoundary,
}

#[derive(Subcommand)]
enum Action {
    /// Vertex or fundamental normal surfaces
    Enumerate {
        #[command(flatten)]
        source: Source,
        #[arg(long, default_value = "quad")]
        coords: Coords,
        /// Fundamental (Hilbert basis) instead of vertex surfaces
        #[arg(long)]
        fundamental: bool,
        /// Drop the quad / octagon compatibility constraints
        #[arg(long)]
        immersed: bool,
        #[arg(long, value_enum, default_value_t = BanKind::None)]
        ban: BanKind,
        /// Restrict to non-spun surfaces using stored slope equations (JSON)
        #[arg(long, conflicts_with = "ban")]
        slopes: Option<PathBuf>,
        /// Cancel the search after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
        #[arg(long, default_value_t = EnumCfg::default().poll_interval)]
        poll_interval: usize,
        /// Output file (.json, .csv or .parquet)
        #[arg(long)]
        out: PathBuf,
    },
    /// Vertex angle structures, or taut structures only
    Angles {
        #[command(flatten)]
        source: Source,
        #[arg(long)]
        taut: bool,
        #[arg(long)]
        timeout_secs: Option<u64>,
        #[arg(long)]
        out: PathBuf,
    },
    /// Search for one surface with positive Euler characteristic
    Euler {
        #[command(flatten)]
        source: Source,
        #[arg(long, default_value = "standard")]
        coords: Coords,
    },
    /// Print a skeleton summary as JSON
    Skeleton {
        #[command(flatten)]
        source: Source,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    match cmd.action {
        Action::Enumerate {
            source,
            coords,
            fundamental,
            immersed,
            ban,
            slopes,
            timeout_secs,
            poll_interval,
            out,
        } => {
            let which = Which {
                mode: if fundamental {
                    EnumMode::Fundamental
                } else {
                    EnumMode::Vertex
                },
                embedded: !immersed,
            };
            let cfg = EnumCfg { poll_interval };
            enumerate(&source, coords, which, ban, slopes, timeout_secs, cfg, out)
        }
        Action::Angles {
            source,
            taut,
            timeout_secs,
            out,
        } => angles(&source, taut, timeout_secs, out),
        Action::Euler { source, coords } => euler(&source, coords),
        Action::Skeleton { source } => skeleton(&source),
        Action::Report => {
            println!("{}", serde_json::to_string_pretty(&provenance::summary())?);
            Ok(())
        }
    }
}

/// A tracker that cancels itself after `secs`, if given.
fn tracker(secs: Option<u64>) -> ProgressTracker {
    let tracker = ProgressTracker::new();
    if let Some(secs) = secs {
        let watchdog = tracker.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_secs(secs));
            if !watchdog.is_finished() {
                watchdog.cancel();
            }
        });
    }
    tracker
}

#[allow(clippy::too_many_arguments)]
fn enumerate(
    source: &Source,
    coords: Coords,
    which: Which,
    ban: BanKind,
    slopes: Option<PathBuf>,
    timeout_secs: Option<u64>,
    cfg: EnumCfg,
    out: PathBuf,
) -> Result<()> {
    let tri = source.load()?;
    tracing::info!(input = %source.label(), %coords, ?which, ?ban, "enumerate");
    let tracker = tracker(timeout_secs);
    let list = match (&slopes, ban) {
        (Some(path), _) => {
            if coords != Coords::Quad {
                bail!("--slopes requires --coords quad");
            }
            let stored = input::read_slopes(path)?;
            NormalSurfaceList::non_spun(
                &tri,
                &stored,
                ConverterCfg::default(),
                which,
                Some(&tracker),
            )
        }
        (None, BanKind::None) => NormalSurfaceList::enumerate_with(
            &tri,
            coords,
            which,
            &NoConstraint,
            &BanNone,
            Some(&tracker),
            cfg,
        ),
        (None, BanKind::Boundary) => NormalSurfaceList::enumerate_with(
            &tri,
            coords,
            which,
            &NoConstraint,
            &BanBoundary,
            Some(&tracker),
            cfg,
        ),
        (None, BanKind::TorusBoundary) => NormalSurfaceList::enumerate_with(
            &tri,
            coords,
            which,
            &NoConstraint,
            &BanTorusBoundary,
            Some(&tracker),
            cfg,
        ),
    }
    .with_context(|| format!("enumerating {} in {coords} coordinates", source.label()))?;
    if !list.is_complete() {
        tracing::warn!(outcome = ?list.outcome(), "search did not run to completion");
    }

    output::write(&out, &list, || output::surface_table(&list, &tri))?;
    let payload = Payload::new(json!({
        "command": "enumerate",
        "coords": coords.key(),
        "mode": which.mode,
        "embedded": which.embedded,
        "ban": format!("{ban:?}"),
        "slopes": slopes,
        "outcome": list.outcome(),
        "surfaces": list.len(),
    }))
    .with_input(source.label());
    provenance::write_sidecar(&out, payload)?;
    Ok(())
}

fn angles(source: &Source, taut: bool, timeout_secs: Option<u64>, out: PathBuf) -> Result<()> {
    let tri = source.load()?;
    tracing::info!(input = %source.label(), taut, "angles");
    let tracker = tracker(timeout_secs);
    let list = AngleStructureList::enumerate(&tri, taut, Some(&tracker))
        .with_context(|| format!("enumerating angle structures on {}", source.label()))?;
    if !list.is_complete() {
        tracing::warn!(outcome = ?list.outcome(), "search did not run to completion");
    }
    output::write(&out, &list, || output::angle_table(&list))?;
    let payload = Payload::new(json!({
        "command": "angles",
        "taut": taut,
        "outcome": list.outcome(),
        "structures": list.len(),
        "spans_strict": list.spans_strict(),
        "spans_taut": list.spans_taut(),
    }))
    .with_input(source.label());
    provenance::write_sidecar(&out, payload)?;
    Ok(())
}

fn euler(source: &Source, coords: Coords) -> Result<()> {
    let tri = source.load()?;
    let search = TreeSingleSolution::new(&tri, coords, &EulerPositive, &BanNone)
        .with_context(|| format!("positive Euler search in {coords} coordinates"))?;
    let (found, report) = search.find(None);
    let vector = found.map(|v| v.iter().map(|x| x.to_string()).collect::<Vec<_>>());
    let doc = json!({
        "input": source.label(),
        "coords": coords.key(),
        "found": vector,
        "outcome": report.outcome,
        "nodes": report.nodes,
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn skeleton(source: &Source) -> Result<()> {
    let tri = source.load()?;
    let vertices: Vec<_> = tri
        .vertices()
        .iter()
        .map(|v| {
            json!({
                "degree": v.corners.len(),
                "link_euler": v.link_euler,
                "link_orientable": v.link_orientable,
                "ideal": v.is_ideal(),
                "boundary": v.is_boundary(),
            })
        })
        .collect();
    let edges: Vec<_> = tri
        .edges()
        .iter()
        .map(|e| json!({"degree": e.degree(), "boundary": e.boundary, "valid": e.valid}))
        .collect();
    let boundary: Vec<_> = tri
        .boundary_components()
        .iter()
        .map(|b| {
            json!({
                "ideal": b.ideal,
                "orientable": b.orientable,
                "euler": b.euler,
                "triangles": b.triangles.len(),
            })
        })
        .collect();
    let doc = json!({
        "input": source.label(),
        "size": tri.size(),
        "triangles": tri.triangles().len(),
        "edges": edges,
        "vertices": vertices,
        "boundary_components": boundary,
        "valid": tri.is_valid(),
        "orientable": tri.is_orientable(),
        "connected": tri.is_connected(),
        "closed": tri.is_closed(),
        "ideal": tri.is_ideal(),
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
