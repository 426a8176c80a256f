#![no_main]

use libfuzzer_sys::fuzz_target;
use polyomino_packing::{
    solve_region, Outline, Region, SearchLimits, ShapeCatalog, SolveOptions, Symmetry, Verdict,
};

#[derive(Debug)]
struct SmallPackingInput {
    outlines: Vec<Outline>,
    region: Region,
}

impl<'a> arbitrary::Arbitrary<'a> for SmallPackingInput {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let num_shapes = u.int_in_range(1..=3)?;

        let outlines = (0..num_shapes)
            .map(|_| {
                let width = u.int_in_range(1..=3)?;
                let mask = u.arbitrary::<[bool; 9]>()?;
                let height = u.int_in_range(1..=3)?;
                let mut mask = mask[..width * height].to_vec();
                // Outlines need at least one filled cell.
                mask[0] = true;
                Ok(Outline::new(width, mask).expect("outline has a filled cell"))
            })
            .collect::<arbitrary::Result<Vec<_>>>()?;

        let width = u.int_in_range(1..=5)?;
        let height = u.int_in_range(1..=5)?;
        let counts = (0..num_shapes)
            .map(|_| u.int_in_range(0..=3))
            .collect::<arbitrary::Result<Vec<_>>>()?;

        Ok(SmallPackingInput {
            outlines,
            region: Region::new(width, height, counts),
        })
    }
}

fuzz_target!(|data: SmallPackingInput| {
    let catalog = ShapeCatalog::new(
        data.outlines
            .iter()
            .enumerate()
            .map(|(id, outline)| (id as u32, outline)),
        Symmetry::Full,
    );
    let options = SolveOptions {
        limits: SearchLimits::nodes(10_000),
    };

    let report = solve_region(&data.region, &catalog, &options)
        .expect("every region has one count per shape");

    if let Verdict::Feasible(arrangement) = &report.verdict {
        arrangement
            .validate(&data.region.counts)
            .expect("solver returned an invalid packing");
    }
});
