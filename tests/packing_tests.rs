mod common;

use common::{catalog, init_logging, solve_checked};
use polyomino_packing::{
    generate::generate_seeded, solve_puzzle, solve_region, BatchOptions, GeneratorOptions,
    ParseErrorKind, Puzzle, Region, Rejection, Resolution, SearchLimits, SolveOptions, Symmetry,
    UnknownPolicy, Verdict,
};

#[test]
fn monominoes_fill_small_square() {
    init_logging();

    let report = solve_checked(&["#"], 2, 2, &[4]);
    let arrangement = report.verdict.witness().unwrap();

    assert_eq!(arrangement.placements.len(), 4);
    assert_eq!(arrangement.to_string(), "AA\nAA");
}

#[test]
fn too_many_monominoes() {
    init_logging();

    let report = solve_checked(&["#"], 2, 2, &[5]);

    assert_eq!(report.verdict, Verdict::Infeasible);
    assert_eq!(
        report.resolution,
        Resolution::Rejected(Rejection::AreaExceeded {
            required: 5,
            available: 4
        })
    );
}

#[test]
fn dominoes_in_small_square() {
    init_logging();

    let report = solve_checked(&["##"], 2, 2, &[2]);

    assert!(report.verdict.is_feasible());
    assert!(matches!(report.resolution, Resolution::Searched { .. }));
}

#[test]
fn l_trominoes_tile_rectangle() {
    init_logging();

    let report = solve_checked(&["#./##"], 3, 4, &[4]);
    let arrangement = report.verdict.witness().unwrap();

    assert!(arrangement
        .owners()
        .iter()
        .flatten()
        .all(|owner| *owner == Some(0)));
}

#[test]
fn plus_and_square_do_not_share_centre() {
    init_logging();

    // Both the plus and every 2x2 square in a 3x3 region need the centre cell.
    let report = solve_checked(&[".#./###/.#.", "##/##"], 3, 3, &[1, 1]);

    assert_eq!(report.verdict, Verdict::Infeasible);
    assert!(matches!(report.resolution, Resolution::Searched { .. }));
}

#[test]
fn shape_without_room_is_rejected() {
    init_logging();

    let report = solve_checked(&["###/.#."], 2, 2, &[1]);

    assert_eq!(report.verdict, Verdict::Infeasible);
    assert_eq!(
        report.resolution,
        Resolution::Rejected(Rejection::InsufficientPlacements {
            shape_index: 0,
            required: 1,
            available: 0
        })
    );
}

#[test]
fn mixed_shapes_leave_cells_empty() {
    init_logging();

    let report = solve_checked(&["###/#..", "##", "#"], 4, 3, &[1, 2, 1]);
    let arrangement = report.verdict.witness().unwrap();

    let empty = arrangement
        .owners()
        .iter()
        .flatten()
        .filter(|owner| owner.is_none())
        .count();
    assert_eq!(empty, 12 - 4 - 4 - 1);
}

#[test]
fn symmetry_restricts_placements() {
    init_logging();

    // A horizontal domino only fits a single column once it may be rotated.
    let region = Region::new(1, 3, vec![1]);
    let solve = |symmetry| {
        solve_region(
            &region,
            &catalog(&["##"], symmetry),
            &SolveOptions::default(),
        )
        .unwrap()
    };

    assert!(solve(Symmetry::Full).verdict.is_feasible());
    assert!(solve(Symmetry::Rotations).verdict.is_feasible());

    let fixed = solve(Symmetry::Fixed);
    assert_eq!(fixed.verdict, Verdict::Infeasible);
    assert!(matches!(
        fixed.resolution,
        Resolution::Rejected(Rejection::InsufficientPlacements { .. })
    ));

    // The S tetromino is chiral: only reflections produce the Z tetromino.
    assert_eq!(catalog(&[".##/##."], Symmetry::Full).shapes()[0].orientations().len(), 4);
    assert_eq!(catalog(&[".##/##."], Symmetry::Rotations).shapes()[0].orientations().len(), 2);
}

#[test]
fn node_limit_gives_unknown() {
    init_logging();

    let catalog = catalog(&["#./##"], Symmetry::Full);
    let region = Region::new(3, 4, vec![4]);
    let options = SolveOptions {
        limits: SearchLimits::nodes(1),
    };

    let report = solve_region(&region, &catalog, &options).unwrap();
    assert!(report.verdict.is_unknown());
    assert!(matches!(report.resolution, Resolution::Searched { nodes: 2 }));
}

#[test]
#[cfg(target_pointer_width = "64")]
fn oversized_regions_never_panic() {
    init_logging();

    let err = Puzzle::parse("0:\n#\n\n4294967296x4294967296: 1\n").unwrap_err();
    assert_eq!(err.line, 4);
    assert_eq!(
        err.kind,
        ParseErrorKind::RegionTooLarge {
            width: 1 << 32,
            height: 1 << 32
        }
    );

    let puzzle = Puzzle::parse("0:\n##\n\n1x1: 9223372036854775808\n").unwrap();
    let report = solve_puzzle(&puzzle, &BatchOptions::default()).unwrap();

    assert_eq!(report.tally().infeasible, 1);
    assert_eq!(
        report.regions()[0].resolution,
        Resolution::Rejected(Rejection::AreaExceeded {
            required: usize::MAX,
            available: 1
        })
    );
}

#[test]
fn repeated_solves_agree() {
    init_logging();

    let first = solve_checked(&["#./##", "##"], 4, 4, &[2, 3]);
    let second = solve_checked(&["#./##", "##"], 4, 4, &[2, 3]);

    assert_eq!(first, second);
}

#[test]
fn generated_puzzles_are_feasible() {
    init_logging();

    let options = GeneratorOptions {
        width: 4,
        height: 4,
        shapes: 3,
    };

    for seed in 0..10 {
        let puzzle = generate_seeded(&options, seed).unwrap();
        let reparsed = Puzzle::parse(&puzzle.to_string()).unwrap();
        assert_eq!(reparsed, puzzle);

        let report = solve_puzzle(&puzzle, &BatchOptions::default()).unwrap();
        assert_eq!(
            report.count_feasible(UnknownPolicy::Reject).unwrap(),
            1,
            "seed {seed} produced an infeasible puzzle:\n{puzzle}"
        );
    }
}

#[test]
fn count_feasible_regions_of_puzzle() {
    init_logging();

    let input = "\
0:
#.
##

1:
##
##

3x4: 4 0
3x3: 1 1
2x2: 0 1
2x2: 2 0
4x4: 0 5
";
    let puzzle: Puzzle = input.parse().unwrap();

    let report = solve_puzzle(
        &puzzle,
        &BatchOptions {
            jobs: 0,
            ..BatchOptions::default()
        },
    )
    .unwrap();

    let feasible: Vec<_> = report
        .regions()
        .iter()
        .map(|region| region.verdict.is_feasible())
        .collect();
    assert_eq!(feasible, vec![true, true, true, false, false]);
    assert_eq!(report.count_feasible(UnknownPolicy::Reject).unwrap(), 3);

    for (region, report) in puzzle.regions.iter().zip(report.regions()) {
        if let Some(arrangement) = report.verdict.witness() {
            arrangement.validate(&region.counts).unwrap();
        }
    }
}
