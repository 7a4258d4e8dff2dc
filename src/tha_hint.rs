// Group labels and per-cell probability hints shown beside the board
// These are display heuristics; constraints sharing cells are never solved together

use std::fmt;

use crate::tha_board::Board;

const ABCS: u128 = 26;

fn num_to_digit(n: u128) -> char {
    char::from(b'A' + (n % ABCS) as u8)
}

/// Render a group id as a base-26 label, least significant digit first.
/// Only the three lowest digits are kept: 0 is "A", 1 is "B", 26 is "AB".
pub fn num_to_label(n: u128) -> String {
    let mut label = String::with_capacity(3);
    label.push(num_to_digit(n));
    let next = n / ABCS;
    if next != 0 {
        label.push(num_to_digit(next));
        let nnext = next / ABCS;
        if nnext != 0 {
            label.push(num_to_digit(nnext));
        }
    }
    label
}

/// One line of the hint panel
#[derive(Clone, Debug, PartialEq)]
pub enum Formula {
    /// Treasure total for the board
    Total(usize),
    /// Every hidden neighbor of an opened cell carries the same label
    Uniform { label: String, rhs: usize, count: usize },
    /// Hidden neighbors with mixed labels sum to `rhs`
    Equation { labels: Vec<String>, rhs: usize },
    /// Estimate for untouched cells (group id 0).
    /// `hidden` may go negative when hinted cells overlap.
    Field { hidden: i64, field: usize },
}

impl Formula {
    pub fn probability(&self) -> Option<f64> {
        match self {
            Formula::Uniform { rhs, count, .. } => Some(*rhs as f64 / *count as f64),
            Formula::Field { hidden, field } => Some(*hidden as f64 / *field as f64),
            _ => None,
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Total(n) => write!(f, "Total treasure: {n}"),
            Formula::Uniform { label, .. } => {
                write!(f, "{label} has probability {:.2}", self.probability().unwrap_or_default())
            }
            Formula::Equation { labels, rhs } => write!(f, "{} = {rhs}", labels.join(" + ")),
            Formula::Field { .. } => {
                write!(f, "A has probability: {:.2}", self.probability().unwrap_or_default())
            }
        }
    }
}

fn all_same(labels: &[String]) -> bool {
    labels.windows(2).all(|w| w[0] == w[1])
}

/// Build the hint panel for the current board
pub fn formulas(board: &Board) -> Vec<Formula> {
    let mut out = vec![Formula::Total(board.treasures())];
    let mut hinted = 0usize;
    let mut field = 0usize;

    for x in 0..board.width() {
        for y in 0..board.height() {
            let cell = board.cell(x, y);
            if !cell.opened {
                if cell.group == 0 {
                    field += 1;
                }
                continue;
            }
            if cell.treasure {
                continue;
            }
            let mut rhs = cell.info as usize;
            let mut labels = Vec::new();
            for (nx, ny) in board.neighbors(x, y) {
                let n = board.cell(nx, ny);
                if n.opened && n.treasure {
                    rhs -= 1;
                } else if !n.opened {
                    labels.push(num_to_label(n.group));
                }
            }
            if labels.is_empty() {
                continue;
            }
            hinted += rhs;
            if all_same(&labels) {
                let count = labels.len();
                out.push(Formula::Uniform {
                    label: labels.swap_remove(0),
                    rhs,
                    count,
                });
            } else {
                out.push(Formula::Equation { labels, rhs });
            }
        }
    }

    if field != 0 {
        let hidden = board.treasures() as i64 - board.found_treasures() as i64 - hinted as i64;
        out.push(Formula::Field { hidden, field });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXED: [(usize, usize); 15] = [
        (3, 0),
        (4, 0),
        (5, 1),
        (0, 3),
        (1, 4),
        (2, 5),
        (3, 3),
        (4, 4),
        (5, 5),
        (2, 3),
        (3, 5),
        (5, 3),
        (4, 2),
        (0, 5),
        (1, 2),
    ];

    #[test]
    fn labels_are_little_endian_base26() {
        assert_eq!(num_to_label(0), "A");
        assert_eq!(num_to_label(1), "B");
        assert_eq!(num_to_label(25), "Z");
        assert_eq!(num_to_label(26), "AB");
        assert_eq!(num_to_label(27), "BB");
        assert_eq!(num_to_label(26 * 26), "AAB");
        // digits past the third are dropped
        assert_eq!(num_to_label(26 * 26 * 26), "AAA");
    }

    #[test]
    fn fresh_board_has_only_total_and_field() {
        let board = Board::with_treasures(6, 6, &FIXED).unwrap();
        let lines = formulas(&board);
        assert_eq!(
            lines,
            vec![
                Formula::Total(15),
                Formula::Field {
                    hidden: 15,
                    field: 36
                },
            ]
        );
        assert_eq!(lines[1].to_string(), "A has probability: 0.42");
    }

    #[test]
    fn corner_reveal_yields_uniform_zero() {
        let mut board = Board::with_treasures(6, 6, &FIXED).unwrap();
        board.open(0, 0).unwrap();
        let lines = formulas(&board);
        assert_eq!(
            lines[1],
            Formula::Uniform {
                label: "B".to_string(),
                rhs: 0,
                count: 3
            }
        );
        assert_eq!(lines[1].to_string(), "B has probability 0.00");
        // 36 cells minus the opened corner minus its three labelled neighbors
        assert_eq!(
            lines[2],
            Formula::Field {
                hidden: 15,
                field: 32
            }
        );
    }

    #[test]
    fn mixed_labels_emit_equation() {
        let mut board = Board::with_treasures(6, 6, &FIXED).unwrap();
        board.open(0, 0).unwrap();
        board.open(1, 1).unwrap();
        let lines = formulas(&board);
        // (0, 0) sees (1, 0) and (0, 1), both neighbors of the two reveals: "D"
        assert_eq!(
            lines[1],
            Formula::Uniform {
                label: "D".to_string(),
                rhs: 0,
                count: 2
            }
        );
        match &lines[2] {
            Formula::Equation { labels, rhs } => {
                assert_eq!(*rhs, 1);
                assert!(labels.contains(&"D".to_string()));
                assert!(labels.contains(&"B".to_string()));
                assert!(!all_same(labels));
            }
            other => panic!("expected an equation, got {other:?}"),
        }
    }

    #[test]
    fn opened_treasures_reduce_rhs() {
        let mut board = Board::with_treasures(3, 3, &[(0, 0), (2, 2)]).unwrap();
        board.open(1, 1).unwrap();
        assert_eq!(board.cell(1, 1).info, 2);
        board.open(0, 0).unwrap();
        let lines = formulas(&board);
        // seven hidden neighbors, all labelled "B", one treasure left among them
        assert_eq!(
            lines[1],
            Formula::Uniform {
                label: "B".to_string(),
                rhs: 1,
                count: 7
            }
        );
        assert!(!lines.iter().any(|l| matches!(l, Formula::Field { .. })));
    }

    #[test]
    fn overlapping_hints_drive_field_estimate_negative() {
        let mut board = Board::with_treasures(3, 3, &[(1, 1)]).unwrap();
        board.open(0, 0).unwrap();
        board.open(2, 2).unwrap();
        let lines = formulas(&board);
        // both corners count the same centre treasure, so the hinted sum is 2
        assert!(matches!(lines[1], Formula::Equation { rhs: 1, .. }));
        assert!(matches!(lines[2], Formula::Equation { rhs: 1, .. }));
        let field = lines.last().unwrap();
        assert_eq!(*field, Formula::Field { hidden: -1, field: 2 });
        assert_eq!(field.to_string(), "A has probability: -0.50");
    }

    #[test]
    fn field_line_skipped_without_untouched_cells() {
        let mut board = Board::with_treasures(2, 2, &[(1, 1)]).unwrap();
        board.open(0, 0).unwrap();
        let lines = formulas(&board);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            Formula::Uniform {
                label: "B".to_string(),
                rhs: 1,
                count: 3
            }
        );
        assert_eq!(lines[1].probability(), Some(1.0 / 3.0));
    }
}
