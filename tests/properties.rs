mod common;

use std::collections::HashSet;

use polyomino_packing::{
    packing::anchors, shape::orientations, solve_region, Outline, Region, Rejection, Resolution,
    SearchLimits, ShapeCatalog, SolveOptions, Symmetry, Verdict,
};
use proptest::prelude::*;

fn outline() -> impl Strategy<Value = Outline> {
    (1usize..=4, 1usize..=4)
        .prop_flat_map(|(width, height)| {
            (
                Just(width),
                proptest::collection::vec(any::<bool>(), width * height),
            )
        })
        .prop_filter("outline needs a filled cell", |(_, mask)| {
            mask.iter().any(|filled| *filled)
        })
        .prop_map(|(width, mask)| Outline::new(width, mask).unwrap())
}

fn single_catalog(outline: &Outline) -> ShapeCatalog {
    ShapeCatalog::new([(0, outline)], Symmetry::Full)
}

proptest! {
    #[test]
    fn orientations_are_canonical(outline in outline()) {
        for orientation in orientations(&outline, Symmetry::Full) {
            let cells = orientation.cells();

            prop_assert_eq!(cells.len(), outline.area());
            prop_assert_eq!(cells.iter().map(|(r, _)| *r).min(), Some(0));
            prop_assert_eq!(cells.iter().map(|(_, c)| *c).min(), Some(0));
            prop_assert!(cells.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }

    #[test]
    fn orientation_count_divides_group(outline in outline()) {
        let full = orientations(&outline, Symmetry::Full);
        let rotations = orientations(&outline, Symmetry::Rotations);
        let fixed = orientations(&outline, Symmetry::Fixed);

        prop_assert!([1, 2, 4, 8].contains(&full.len()));
        prop_assert!([1, 2, 4].contains(&rotations.len()));
        prop_assert_eq!(fixed.len(), 1);

        let unique: HashSet<_> = full.iter().collect();
        prop_assert_eq!(unique.len(), full.len());

        // The rotations always come first.
        prop_assert_eq!(&full[..rotations.len()], &rotations[..]);
    }

    #[test]
    fn orientations_are_invariant_under_symmetry(outline in outline()) {
        let expected: HashSet<_> = orientations(&outline, Symmetry::Full).into_iter().collect();

        for transformed in [outline.rotate(), outline.mirror(), outline.flip(), outline.transpose()] {
            let actual: HashSet<_> = orientations(&transformed, Symmetry::Full).into_iter().collect();
            prop_assert_eq!(&actual, &expected);
        }
    }

    #[test]
    fn anchored_cells_stay_in_bounds(outline in outline(), width in 1usize..=6, height in 1usize..=6) {
        for orientation in orientations(&outline, Symmetry::Full) {
            for (row, column) in anchors(&orientation, width, height) {
                for (dr, dc) in orientation.cells() {
                    prop_assert!(row + dr < height);
                    prop_assert!(column + dc < width);
                }
            }
        }
    }

    #[test]
    fn over_area_regions_are_rejected(outline in outline(), width in 1usize..=4, height in 1usize..=4) {
        let count = width * height / outline.area() + 1;
        let region = Region::new(width, height, vec![count]);

        let report = solve_region(&region, &single_catalog(&outline), &SolveOptions::default()).unwrap();

        prop_assert_eq!(report.verdict, Verdict::Infeasible);
        let is_area_rejection = matches!(
            report.resolution,
            Resolution::Rejected(Rejection::AreaExceeded { .. })
        );
        prop_assert!(is_area_rejection);
    }

    #[test]
    fn witnesses_are_valid_packings(
        outline in outline(),
        width in 1usize..=5,
        height in 1usize..=5,
        count in 0usize..=4,
    ) {
        let region = Region::new(width, height, vec![count, 1]);
        let monomino = Outline::from([[1]]);
        let catalog = ShapeCatalog::new([(0, &outline), (1, &monomino)], Symmetry::Full);
        let options = SolveOptions {
            limits: SearchLimits::nodes(20_000),
        };

        let report = solve_region(&region, &catalog, &options).unwrap();

        if let Verdict::Feasible(arrangement) = &report.verdict {
            prop_assert_eq!(arrangement.validate(&region.counts), Ok(()));
        }
        if count == 0 {
            // A single monomino always fits.
            prop_assert!(report.verdict.is_feasible());
        }
    }
}

#[test]
fn orientation_counts_of_known_shapes() {
    common::init_logging();

    let count = |rows: &[&str]| orientations(&Outline::parse(rows).unwrap(), Symmetry::Full).len();

    assert_eq!(count(&["#"]), 1);
    assert_eq!(count(&["##", "##"]), 1);
    assert_eq!(count(&["##"]), 2);
    assert_eq!(count(&["#.", "##"]), 4);
    assert_eq!(count(&["###", ".#."]), 4);
    assert_eq!(count(&[".##", "##."]), 4);
    assert_eq!(count(&["###", "#.."]), 8);
    assert_eq!(count(&[".#.", "###", ".#."]), 1);
}
