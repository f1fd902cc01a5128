//! Uniqueness tracking for columns with UNIQUE constraints.
//!
//! Fabricated values (emails, SKUs, tracking numbers) collide at scale. Each
//! unique column gets its own [`UniqueSet`]; candidates are re-drawn a bounded
//! number of times before giving up, so a saturated value space fails with a
//! clear error instead of looping forever.

use std::collections::HashSet;

use crate::error::{Result, StoregenError};

/// Retries before declaring a unique value space exhausted.
const MAX_RETRIES: usize = 1000;

/// Tracks values already emitted for one unique column.
#[derive(Debug, Default)]
pub struct UniqueSet {
    seen: HashSet<String>,
}

impl UniqueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw candidates from `fabricate` until one is unseen, then record and
    /// return it.
    ///
    /// Fails with [`StoregenError::UniqueExhausted`] after [`MAX_RETRIES`]
    /// collisions — `table`, `column`, and `row_index` make the error
    /// actionable (which count to lower, or which pool to widen).
    pub fn draw(
        &mut self,
        table: &str,
        column: &str,
        row_index: usize,
        mut fabricate: impl FnMut() -> String,
    ) -> Result<String> {
        for _ in 0..MAX_RETRIES {
            let candidate = fabricate();
            if self.seen.insert(candidate.clone()) {
                return Ok(candidate);
            }
        }
        Err(StoregenError::UniqueExhausted {
            table: table.to_string(),
            column: column.to_string(),
            row_index,
            max_retries: MAX_RETRIES,
        })
    }

    /// Record an externally built value; returns false if already present.
    pub fn insert(&mut self, value: String) -> bool {
        self.seen.insert(value)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_skips_collisions() {
        let mut set = UniqueSet::new();
        let mut counter = 0;
        // First two draws collide on "a", third succeeds
        let values = ["a", "a", "b"];
        let drawn = set
            .draw("t", "c", 0, || {
                let v = values[counter.min(2)].to_string();
                counter += 1;
                v
            })
            .unwrap();
        assert_eq!(drawn, "a");
        let drawn = set
            .draw("t", "c", 1, || {
                let v = values[counter.min(2)].to_string();
                counter += 1;
                v
            })
            .unwrap();
        assert_eq!(drawn, "b");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_draw_exhaustion() {
        let mut set = UniqueSet::new();
        set.insert("only".to_string());
        let err = set.draw("products", "sku", 7, || "only".to_string()).unwrap_err();
        match err {
            StoregenError::UniqueExhausted { table, column, row_index, .. } => {
                assert_eq!(table, "products");
                assert_eq!(column, "sku");
                assert_eq!(row_index, 7);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
