// patterns.rs - Starter pattern library for seeding a grid

/// A named starter pattern together with the grid dimensions it expects.
///
/// Cells are `(row, col)` pairs. Dimensions leave enough margin that the
/// pattern's usual behavior survives the clipped boundary, at least for the
/// oscillators.
pub struct Pattern {
    pub name: &'static str,
    pub rows: u32,
    pub cols: u32,
    pub cells: &'static [(u32, u32)],
}

impl Pattern {
    /// The pattern's live cells as flat row-major indices.
    pub fn live_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .map(|&(row, col)| (row as usize) * (self.cols as usize) + (col as usize))
            .collect()
    }

    /// Looks a pattern up by name, ignoring ASCII case.
    pub fn find(name: &str) -> Option<&'static Pattern> {
        PATTERNS
            .iter()
            .find(|pattern| pattern.name.eq_ignore_ascii_case(name))
    }
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "Glider",
        rows: 10,
        cols: 10,
        cells: &[(1, 2), (2, 3), (3, 1), (3, 2), (3, 3)],
    },
    Pattern {
        name: "Blinker",
        rows: 3,
        cols: 3,
        cells: &[(1, 0), (1, 1), (1, 2)],
    },
    Pattern {
        name: "Toad",
        rows: 4,
        cols: 4,
        cells: &[(1, 1), (1, 2), (1, 3), (2, 0), (2, 1), (2, 2)],
    },
    Pattern {
        name: "Beacon",
        rows: 4,
        cols: 4,
        cells: &[
            (0, 0),
            (0, 1),
            (1, 0),
            (1, 1),
            (2, 2),
            (2, 3),
            (3, 2),
            (3, 3),
        ],
    },
    Pattern {
        name: "Pulsar",
        rows: 15,
        cols: 15,
        cells: &[
            (1, 3),
            (1, 4),
            (1, 5),
            (1, 9),
            (1, 10),
            (1, 11),
            (3, 1),
            (3, 6),
            (3, 8),
            (3, 13),
            (4, 1),
            (4, 6),
            (4, 8),
            (4, 13),
            (5, 1),
            (5, 6),
            (5, 8),
            (5, 13),
            (6, 3),
            (6, 4),
            (6, 5),
            (6, 9),
            (6, 10),
            (6, 11),
            (8, 3),
            (8, 4),
            (8, 5),
            (8, 9),
            (8, 10),
            (8, 11),
            (9, 1),
            (9, 6),
            (9, 8),
            (9, 13),
            (10, 1),
            (10, 6),
            (10, 8),
            (10, 13),
            (11, 1),
            (11, 6),
            (11, 8),
            (11, 13),
            (13, 3),
            (13, 4),
            (13, 5),
            (13, 9),
            (13, 10),
            (13, 11),
        ],
    },
    Pattern {
        name: "R-pentomino",
        rows: 32,
        cols: 32,
        cells: &[(14, 16), (15, 15), (15, 16), (16, 14), (16, 15)],
    },
    Pattern {
        name: "Gosper Glider Gun",
        rows: 40,
        cols: 40,
        cells: &[
            (2, 26),
            (3, 24),
            (3, 26),
            (4, 14),
            (4, 15),
            (4, 22),
            (4, 23),
            (4, 36),
            (4, 37),
            (5, 13),
            (5, 17),
            (5, 22),
            (5, 23),
            (5, 36),
            (5, 37),
            (6, 2),
            (6, 3),
            (6, 12),
            (6, 18),
            (6, 22),
            (6, 23),
            (7, 2),
            (7, 3),
            (7, 12),
            (7, 16),
            (7, 18),
            (7, 19),
            (7, 24),
            (7, 26),
            (8, 12),
            (8, 18),
            (8, 26),
            (9, 13),
            (9, 17),
            (10, 14),
            (10, 15),
        ],
    },
];
