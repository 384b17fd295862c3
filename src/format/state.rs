//! Per-pass state
//!
//! Moving an assignment's right-hand side one level deeper leaves the lines
//! that continue it (a lambda body, the rest of an argument list) indented
//! relative to the old position. [`PendingIndent`] records how many of the
//! following physical lines need extra indentation before they are measured.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Carry {
    extra: usize,
    remaining: usize,
}

/// Extra indentation owed to the next physical lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingIndent {
    carries: Vec<Carry>,
}

impl PendingIndent {
    /// Owe `extra` columns to each of the next `lines` lines
    pub fn push(&mut self, extra: usize, lines: usize) {
        if extra > 0 && lines > 0 {
            self.carries.push(Carry {
                extra,
                remaining: lines,
            });
        }
    }

    /// Consume one line: returns the extra indentation it receives
    pub fn take_line(&mut self) -> usize {
        let extra = self.carries.iter().map(|c| c.extra).sum();
        for carry in &mut self.carries {
            carry.remaining -= 1;
        }
        self.carries.retain(|c| c.remaining > 0);
        extra
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.carries.is_empty()
    }

    pub fn reset(&mut self) {
        self.carries.clear();
    }
}

/// State of one document pass
#[derive(Debug, Clone, Default)]
pub struct PassState {
    pub pending: PendingIndent,
    /// Lines flagged with the manual-review marker
    pub unhandled: usize,
    /// Top-level lines that were rewritten
    pub wrapped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_counts_down() {
        let mut pending = PendingIndent::default();
        pending.push(4, 2);
        assert_eq!(pending.take_line(), 4);
        assert_eq!(pending.take_line(), 4);
        assert_eq!(pending.take_line(), 0);
        assert!(pending.is_empty());
    }

    #[test]
    fn test_nested_carries_add_up() {
        let mut pending = PendingIndent::default();
        pending.push(4, 3);
        assert_eq!(pending.take_line(), 4);
        pending.push(4, 1);
        assert_eq!(pending.take_line(), 8);
        assert_eq!(pending.take_line(), 4);
        assert!(pending.is_empty());
    }

    #[test]
    fn test_zero_carry_is_ignored() {
        let mut pending = PendingIndent::default();
        pending.push(0, 5);
        pending.push(4, 0);
        assert!(pending.is_empty());
        pending.push(2, 9);
        pending.reset();
        assert_eq!(pending.take_line(), 0);
    }
}
