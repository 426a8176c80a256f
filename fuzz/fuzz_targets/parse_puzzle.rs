#![no_main]

use libfuzzer_sys::fuzz_target;
use polyomino_packing::Puzzle;

fuzz_target!(|input: &str| {
    if let Ok(puzzle) = Puzzle::parse(input) {
        let reparsed = Puzzle::parse(&puzzle.to_string()).expect("displayed puzzles parse");
        assert_eq!(reparsed, puzzle);
    }
});
