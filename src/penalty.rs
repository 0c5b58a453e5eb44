//! Mask penalty scoring. Lower is better; the score only orders masks against each other.

pub(crate) const PENALTY_N1: i32 = 3;
pub(crate) const PENALTY_N2: i32 = 3;
pub(crate) const PENALTY_N3: i32 = 40;
pub(crate) const PENALTY_N4: i32 = 10;

/// Scores a `size` x `size` row-major grid of modules (`true` = dark).
pub(crate) fn penalty_score(size: i32, modules: &[bool]) -> i32 {
    assert_eq!(modules.len(), (size * size) as usize);
    let at = |x: i32, y: i32| modules[(y * size + x) as usize];
    let mut result: i32 = 0;

    for y in 0..size {
        result += line_penalty(size, (0..size).map(|x| at(x, y)));
    }
    for x in 0..size {
        result += line_penalty(size, (0..size).map(|y| at(x, y)));
    }

    for y in 0..size - 1 {
        for x in 0..size - 1 {
            let color: bool = at(x, y);
            if color == at(x + 1, y) && color == at(x, y + 1) && color == at(x + 1, y + 1) {
                result += PENALTY_N2;
            }
        }
    }

    // Smallest k >= 0 such that (45-5k)% <= dark/total <= (55+5k)%
    let dark = modules.iter().filter(|&&m| m).count() as i32;
    let total = size * size;
    let k: i32 = ((dark * 20 - total * 10).abs() + total - 1) / total - 1;
    assert!((0..=9).contains(&k));
    result += k * PENALTY_N4;

    assert!((0..=2_568_888).contains(&result));
    result
}

/// Same-color run penalties and finder-like pattern penalties for one row or column.
pub(crate) fn line_penalty(size: i32, line: impl IntoIterator<Item = bool>) -> i32 {
    let mut result: i32 = 0;
    let mut runcolor = false;
    let mut runlen: i32 = 0;
    let mut runhistory = FinderPenalty::new(size);
    for color in line {
        if color == runcolor {
            runlen += 1;
            if runlen == 5 {
                result += PENALTY_N1;
            } else if runlen > 5 {
                result += 1;
            }
        } else {
            runhistory.add_history(runlen);
            if !runcolor {
                result += runhistory.count_patterns() * PENALTY_N3;
            }
            runcolor = color;
            runlen = 1;
        }
    }
    result + runhistory.terminate_and_count(runcolor, runlen) * PENALTY_N3
}

/// The last seven run lengths of a line, newest first. The light quiet zone around the symbol
/// is counted into the first and last light runs.
struct FinderPenalty {
    qr_size: i32,
    run_history: [i32; 7],
}

impl FinderPenalty {
    fn new(size: i32) -> Self {
        Self {
            qr_size: size,
            run_history: [0; 7],
        }
    }

    fn add_history(&mut self, mut currentrunlength: i32) {
        if self.run_history[0] == 0 {
            currentrunlength += self.qr_size;
        }
        let len: usize = self.run_history.len();
        self.run_history.copy_within(0..len - 1, 1);
        self.run_history[0] = currentrunlength;
    }

    /// Counts 1:1:3:1:1 dark-light-dark-light-dark runs with a light run of at least 4 units on
    /// either side. Must be called right after a light run ends.
    fn count_patterns(&self) -> i32 {
        let rh = &self.run_history;
        let n = rh[1];
        debug_assert!(n <= self.qr_size * 3);
        let core = n > 0 && rh[2] == n && rh[3] == n * 3 && rh[4] == n && rh[5] == n;
        i32::from(core && rh[0] >= n * 4 && rh[6] >= n)
            + i32::from(core && rh[6] >= n * 4 && rh[0] >= n)
    }

    fn terminate_and_count(mut self, currentruncolor: bool, mut currentrunlength: i32) -> i32 {
        if currentruncolor {
            self.add_history(currentrunlength);
            currentrunlength = 0;
        }
        currentrunlength += self.qr_size;
        self.add_history(currentrunlength);
        self.count_patterns()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(pattern: &str) -> Vec<bool> {
        pattern.chars().map(|c| c == '#').collect()
    }

    #[test]
    fn test_five_run_costs_n1_more_than_four() {
        let four = line("####.#.#.#.#.#.#.#.#.");
        let five = line("#####.#.#.#.#.#.#.#.#");
        assert_eq!(four.len(), 21);
        assert_eq!(five.len(), 21);
        assert_eq!(line_penalty(21, four), 0);
        assert_eq!(line_penalty(21, five), PENALTY_N1);
    }

    #[test]
    fn test_longer_runs_add_one_per_module() {
        assert_eq!(line_penalty(21, line("######.#.#.#.#.#.#.#.")), PENALTY_N1 + 1);
        assert_eq!(line_penalty(21, line("########.#.#.#.#.#.#.")), PENALTY_N1 + 3);
    }

    #[test]
    fn test_finder_like_pattern() {
        // Light 4, then 1:1:3:1:1, then light 10. The quiet zone widens both light borders,
        // so the pattern is counted from each side.
        let l = line("....#.###.#..........");
        assert_eq!(l.len(), 21);
        let runs = PENALTY_N1 + 5;
        assert_eq!(line_penalty(21, l), 2 * PENALTY_N3 + runs);
    }

    #[test]
    fn test_balance_penalty() {
        let size = 21;
        let all_light = vec![false; 21 * 21];
        let score = penalty_score(size, &all_light);
        // Every row and column is one light run of 21, every 2x2 block is uniform,
        // and a 0% dark ratio needs k = 9.
        let per_line = PENALTY_N1 + 16;
        let expected = 2 * 21 * per_line + 20 * 20 * PENALTY_N2 + 9 * PENALTY_N4;
        assert_eq!(score, expected);
    }

    #[test]
    fn test_checkerboard_has_no_run_or_block_penalty() {
        let size = 21;
        let modules: Vec<bool> = (0..size * size).map(|i| (i / size + i % size) % 2 == 0).collect();
        // 221 dark of 441 keeps the ratio inside 45%..55%.
        assert_eq!(penalty_score(size, &modules), 0);
    }
}
