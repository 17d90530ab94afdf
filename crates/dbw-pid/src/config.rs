pub const DEFAULT_MAX_CUMULATION: i32 = 30000;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Gains {
    pub p: f32,
    pub i: f32,
    pub d: f32,
}

impl Gains {
    pub fn new(p: f32, i: f32, d: f32) -> Self {
        Self { p, i, d }
    }
}

/// How the fractional PID sum becomes the integer output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rounding {
    /// Toward zero.
    #[default]
    Truncate,
    /// To the nearest integer, halves away from zero.
    Nearest,
}

impl Rounding {
    /// Saturates at the `i32` range; NaN becomes 0.
    pub fn apply(self, value: f32) -> i32 {
        // `as` truncates toward zero and saturates
        let whole = value as i32;
        match self {
            Rounding::Truncate => whole,
            Rounding::Nearest => {
                // exact for every f32 that fits in i32
                let rest = value - whole as f32;
                if rest >= 0.5 {
                    whole.saturating_add(1)
                } else if rest <= -0.5 {
                    whole.saturating_sub(1)
                } else {
                    whole
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub gains: Gains,
    pub max_cumulation: i32,
    pub rounding: Rounding,
}

impl Config {
    pub fn new(gains: Gains) -> Self {
        Self {
            gains,
            max_cumulation: DEFAULT_MAX_CUMULATION,
            rounding: Rounding::default(),
        }
    }
}

/// Sign-normalises `max` and rejects anything that ends up `<= 1`.
pub(crate) fn normalize_max_cumulation(max: i32) -> Option<i32> {
    let max = max.saturating_abs();
    if max > 1 {
        Some(max)
    } else {
        None
    }
}
