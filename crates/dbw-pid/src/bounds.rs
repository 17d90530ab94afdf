/// A closed interval `[lower, upper]` with `upper > lower`.
///
/// The only way to build one is [`Bounds::new`], so an active bound can never
/// carry an empty or inverted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bounds {
    lower: i32,
    upper: i32,
}

impl Bounds {
    pub fn new(lower: i32, upper: i32) -> Option<Self> {
        if upper > lower {
            Some(Self { lower, upper })
        } else {
            None
        }
    }

    pub fn lower(&self) -> i32 {
        self.lower
    }

    pub fn upper(&self) -> i32 {
        self.upper
    }

    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.lower, self.upper)
    }
}

/// A circular feedback domain where `lower` and `upper` are the same point,
/// e.g. a compass heading on `[0, 360]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WrapDomain {
    bounds: Bounds,
}

impl WrapDomain {
    pub fn new(lower: i32, upper: i32) -> Option<Self> {
        Bounds::new(lower, upper).map(|bounds| Self { bounds })
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Signed error along the shortest of the three paths from `feedback` to
    /// `target`:
    ///
    /// - straight across the domain,
    /// - upward through the upper seam,
    /// - downward through the lower seam.
    ///
    /// Ties prefer the straight path, then the upward one.
    pub fn error(&self, target: i32, feedback: i32) -> i32 {
        let (target, feedback) = (target as i64, feedback as i64);
        let (lower, upper) = (self.bounds.lower as i64, self.bounds.upper as i64);

        let direct = target - feedback;
        let via_upper = (target - lower) + (upper - feedback);
        let via_lower = -((upper - target) + (feedback - lower));

        let mut best = direct;
        for candidate in [via_upper, via_lower] {
            if candidate.abs() < best.abs() {
                best = candidate;
            }
        }
        saturate(best)
    }
}

pub(crate) fn saturate(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
