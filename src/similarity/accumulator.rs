use crate::types::ItemIndex;

/// Dense scratch row for summing one item's dot products against all others.
///
/// Only the columns touched since the last drain are visited when draining,
/// so reuse across items costs nothing per untouched column.
#[derive(Debug)]
pub(crate) struct SimilarityAccumulator {
    sums: Vec<f64>,
    occupied: Vec<bool>,
    touched: Vec<ItemIndex>,
}

impl SimilarityAccumulator {
    pub(crate) fn new(n_items: usize) -> Self {
        Self {
            sums: vec![0.0; n_items],
            occupied: vec![false; n_items],
            touched: Vec::new(),
        }
    }

    pub(crate) fn add_to(&mut self, item: ItemIndex, value: f64) {
        self.sums[item] += value;
        if !self.occupied[item] {
            self.occupied[item] = true;
            self.touched.push(item);
        }
    }

    /// Take every touched `(item, sum)` except `exclude`, resetting the row.
    pub(crate) fn drain(&mut self, exclude: ItemIndex) -> Vec<(ItemIndex, f64)> {
        let mut out = Vec::with_capacity(self.touched.len());
        for item in self.touched.drain(..) {
            if item != exclude {
                out.push((item, self.sums[item]));
            }
            self.sums[item] = 0.0;
            self.occupied[item] = false;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_and_resets() {
        let mut acc = SimilarityAccumulator::new(4);
        acc.add_to(2, 0.5);
        acc.add_to(0, 0.25);
        acc.add_to(2, 0.5);
        acc.add_to(1, 3.0);

        let out = acc.drain(1);
        assert_eq!(out, vec![(2, 1.0), (0, 0.25)]);

        assert!(acc.drain(usize::MAX).is_empty());
        acc.add_to(2, 1.5);
        assert_eq!(acc.drain(usize::MAX), vec![(2, 1.5)]);
    }
}
