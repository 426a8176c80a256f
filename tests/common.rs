use polyomino_packing::{
    solve_region, Outline, Region, RegionReport, ShapeCatalog, SolveOptions, Symmetry,
};

/// Enable log output for the test binary, ignoring repeated calls.
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Build a catalog from outlines drawn with `#` for filled cells, one string
/// per shape with rows separated by `/`.
///
/// # Panics
///  - If any outline is malformed
#[allow(dead_code)]
pub fn catalog(outlines: &[&str], symmetry: Symmetry) -> ShapeCatalog {
    let outlines: Vec<Outline> = outlines
        .iter()
        .map(|outline| {
            let rows: Vec<&str> = outline.split('/').collect();
            Outline::parse(&rows[..]).unwrap()
        })
        .collect();

    ShapeCatalog::new(
        outlines
            .iter()
            .enumerate()
            .map(|(id, outline)| (id as u32, outline)),
        symmetry,
    )
}

/// Solve a single region with default options and check any packing found.
///
/// # Panics
///  - If the solver returns an invalid packing
#[allow(dead_code)]
pub fn solve_checked(
    outlines: &[&str],
    width: usize,
    height: usize,
    counts: &[usize],
) -> RegionReport {
    let catalog = catalog(outlines, Symmetry::Full);
    let region = Region::new(width, height, counts.to_vec());
    let report = solve_region(&region, &catalog, &SolveOptions::default()).unwrap();

    if let Some(arrangement) = report.verdict.witness() {
        log::debug!("Packing of [{}]:\n{}", region, arrangement);
        arrangement.validate(counts).unwrap();
    }

    report
}
