//! Timing probe over the named triangulations.
//!
//! Purpose
//! - Print vertex counts and wall time for every named triangulation in each
//!   normal coordinate system, plus the angle-structure and taut counts.
//! - Give a quick sanity table when the search or the LP changes.
//!
//! Run with `cargo run --release -p normsurf --example census_timing`.

use std::time::Instant;

use normsurf::api::{named_triangulation, AngleStructureList, Coords, NormalSurfaceList, Which};
use normsurf::tri::special::NAMES;

fn main() {
    let systems = [
        Coords::Standard,
        Coords::Quad,
        Coords::AnStandard,
        Coords::AnQuadOct,
    ];
    println!("{:<14} {:>10} {:>8} {:>10}", "name", "coords", "count", "ms");
    for name in NAMES {
        let tri = named_triangulation(name).expect("listed names resolve");
        for coords in systems {
            let start = Instant::now();
            let list = NormalSurfaceList::enumerate(&tri, coords, Which::default(), None)
                .expect("normal coordinates enumerate");
            let ms = start.elapsed().as_secs_f64() * 1e3;
            println!("{name:<14} {:>10} {:>8} {ms:>10.2}", coords.key(), list.len());
        }
        let start = Instant::now();
        let angles = AngleStructureList::enumerate(&tri, false, None).expect("angles enumerate");
        let taut = AngleStructureList::enumerate(&tri, true, None).expect("taut enumerate");
        let ms = start.elapsed().as_secs_f64() * 1e3;
        println!(
            "{name:<14} {:>10} {:>8} {ms:>10.2}  (taut {}, strict span {})",
            "angle",
            angles.len(),
            taut.len(),
            angles.spans_strict()
        );
    }
}
