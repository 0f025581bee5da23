use std::cell::Cell;

/// Event code carried by every flag option match.
///
/// Flag options report through their target cell, not through the code, so
/// they all share this value. It never collides with a printable short name.
pub const FLAG_CODE: i32 = 0;

/// How a flag option mutates its target cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagOp {
    /// `*target = value`
    Set,
    /// `*target &= value`
    And,
    /// `*target |= value`
    Or,
}

impl FlagOp {
    /// Apply the operation to `target` and return the value stored.
    pub fn apply(self, target: &Cell<i32>, value: i32) -> i32 {
        let next = match self {
            Self::Set => value,
            Self::And => target.get() & value,
            Self::Or => target.get() | value,
        };
        target.set(next);
        next
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operations_compose_in_order() {
        let cell = Cell::new(-1);
        let observed: Vec<i32> = [
            (FlagOp::Or, 1),
            (FlagOp::And, 1),
            (FlagOp::Or, 1),
            (FlagOp::And, 1),
            (FlagOp::Set, 1337),
        ]
        .into_iter()
        .map(|(op, value)| op.apply(&cell, value))
        .collect();

        assert_eq!(observed, vec![-1, 1, 1, 1, 1337]);
        assert_eq!(cell.get(), 1337);
    }

    #[test]
    fn and_clears_bits() {
        let cell = Cell::new(0b1110);
        assert_eq!(FlagOp::And.apply(&cell, 0b0110), 0b0110);
        assert_eq!(FlagOp::Or.apply(&cell, 0b0001), 0b0111);
    }
}
