//! Bounded k-permutation enumeration.
//!
//! Iterative depth-first enumeration with an explicit stack, yielding index
//! sequences in lexicographic order. Callers cap the number examined with
//! `Iterator::take`.
//!
//! [`KPermutations::distinct`] collapses interchangeable items: given keys
//! where equal keys sit next to each other, each distinct key sequence is
//! yielded once, using the leftmost unused index of every run.

use smallvec::SmallVec;

/// Indices into the source slice, one per chosen position.
pub type Selection = SmallVec<[usize; 5]>;

/// All ordered selections of `k` distinct indices out of `0..n`.
#[derive(Clone, Debug)]
pub struct KPermutations {
    n: usize,
    k: usize,
    /// Indices chosen so far.
    stack: Vec<usize>,
    /// Next candidate to try at each depth.
    cursor: Vec<usize>,
    used: Vec<bool>,
    /// Index of the first member of each index's run of equal keys.
    runs: Vec<usize>,
    done: bool,
}

impl KPermutations {
    /// `k` is clamped to `n`.
    #[must_use]
    pub fn new(n: usize, k: usize) -> Self {
        let k = k.min(n);
        Self {
            n,
            k,
            stack: Vec::with_capacity(k),
            cursor: vec![0],
            used: vec![false; n],
            runs: (0..n).collect(),
            done: false,
        }
    }

    /// Ordered selections of `k` items out of `keys`, yielding each
    /// sequence of keys once. Equal keys must be adjacent.
    #[must_use]
    pub fn distinct<K: PartialEq>(keys: &[K], k: usize) -> Self {
        let mut perms = Self::new(keys.len(), k);
        for i in 1..keys.len() {
            if keys[i] == keys[i - 1] {
                perms.runs[i] = perms.runs[i - 1];
            }
        }
        perms
    }

    /// A later member of a run is only taken once its left neighbour is.
    fn skips(&self, candidate: usize) -> bool {
        self.used[candidate]
            || (candidate > 0 && self.runs[candidate] == self.runs[candidate - 1] && !self.used[candidate - 1])
    }
}

impl Iterator for KPermutations {
    type Item = Selection;

    fn next(&mut self) -> Option<Selection> {
        if self.done {
            return None;
        }
        if self.k == 0 {
            self.done = true;
            return Some(Selection::new());
        }

        loop {
            let depth = self.stack.len();
            let mut candidate = self.cursor[depth];
            while candidate < self.n && self.skips(candidate) {
                candidate += 1;
            }

            if candidate >= self.n {
                self.cursor.pop();
                match self.stack.pop() {
                    Some(prev) => self.used[prev] = false,
                    None => {
                        self.done = true;
                        return None;
                    }
                }
                continue;
            }

            self.cursor[depth] = candidate + 1;
            self.stack.push(candidate);
            self.used[candidate] = true;

            if self.stack.len() == self.k {
                let selection = Selection::from_slice(&self.stack);
                self.stack.pop();
                self.used[candidate] = false;
                return Some(selection);
            }
            self.cursor.push(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_enumeration() {
        let all: Vec<Vec<usize>> = KPermutations::new(3, 2).map(|s| s.to_vec()).collect();
        assert_eq!(
            all,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 2],
                vec![2, 0],
                vec![2, 1],
            ]
        );
    }

    #[test]
    fn test_counts() {
        for (n, k, total) in [(9, 5, 15_120), (5, 5, 120), (4, 2, 12), (6, 1, 6)] {
            assert_eq!(KPermutations::new(n, k).count(), total, "n={n} k={k}");
        }
    }

    #[test]
    fn test_distinct_collapses_equal_keys() {
        let keys = ['a', 'a', 'b'];
        let all: Vec<Vec<char>> = KPermutations::distinct(&keys, 2)
            .map(|s| s.iter().map(|&i| keys[i]).collect())
            .collect();
        assert_eq!(all, vec![vec!['a', 'a'], vec!['a', 'b'], vec!['b', 'a']]);

        assert_eq!(KPermutations::distinct(&[1; 9], 5).count(), 1);
        assert_eq!(KPermutations::distinct(&[1, 1, 2, 2, 3], 5).count(), 30);
    }

    #[test]
    fn test_distinct_uses_leftmost_of_run() {
        let keys = [7, 7, 7, 8];
        for selection in KPermutations::distinct(&keys, 2) {
            if keys[selection[0]] == 7 {
                assert_eq!(selection[0], 0);
            }
        }
    }

    #[test]
    fn test_edge_cases() {
        assert_eq!(KPermutations::new(0, 3).count(), 1);
        assert_eq!(KPermutations::new(3, 0).count(), 1);
        assert_eq!(KPermutations::new(2, 5).count(), 2);
    }

    #[test]
    fn test_take_caps_work() {
        assert_eq!(KPermutations::new(9, 5).take(1000).count(), 1000);
    }
}
