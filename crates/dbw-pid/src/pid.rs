use crate::bounds::{saturate, Bounds, WrapDomain};
use crate::config::{normalize_max_cumulation, Config, Gains, Rounding, DEFAULT_MAX_CUMULATION};
use crate::interface::{FeedbackSource, OutputSink, TimeSource};

/// Discrete-time PID controller, driven once per control cycle by [`tick`].
///
/// `S` supplies feedback, `O` receives the output and `T` is the optional
/// clock. Without a clock every cycle counts as one unit of time.
///
/// [`tick`]: Controller::tick
pub struct Controller<S, O, T = fn() -> u64> {
    gains: Gains,
    rounding: Rounding,
    target: i32,
    enabled: bool,

    current_feedback: i32,
    last_feedback: i32,
    error: i32,
    last_error: i32,
    integral_cumulation: i32,
    max_cumulation: i32,
    cycle_derivative: f32,
    output: i32,

    input_bounds: Option<Bounds>,
    output_bounds: Option<Bounds>,
    wrap_domain: Option<WrapDomain>,

    current_time: u64,
    last_time: u64,

    source: S,
    sink: O,
    clock: Option<T>,
}

impl<S: FeedbackSource, O: OutputSink> Controller<S, O> {
    pub fn new(p: f32, i: f32, d: f32, source: S, sink: O) -> Self {
        Self::with_config(Config::new(Gains::new(p, i, d)), source, sink)
    }

    pub fn with_config(config: Config, source: S, sink: O) -> Self {
        Self {
            gains: config.gains,
            rounding: config.rounding,
            target: 0,
            enabled: true,
            current_feedback: 0,
            last_feedback: 0,
            error: 0,
            last_error: 0,
            integral_cumulation: 0,
            max_cumulation: normalize_max_cumulation(config.max_cumulation)
                .unwrap_or(DEFAULT_MAX_CUMULATION),
            cycle_derivative: 0.,
            output: 0,
            input_bounds: None,
            output_bounds: None,
            wrap_domain: None,
            current_time: 0,
            last_time: 0,
            source,
            sink,
            clock: None,
        }
    }
}

impl<S: FeedbackSource, O: OutputSink, T: TimeSource> Controller<S, O, T> {
    /// Attach a clock, switching integration and the derivative to
    /// elapsed-time weighting. The first cycle is weighted from this moment.
    pub fn with_time_source<C: TimeSource>(self, mut clock: C) -> Controller<S, O, C> {
        let now = clock.now();
        Controller {
            gains: self.gains,
            rounding: self.rounding,
            target: self.target,
            enabled: self.enabled,
            current_feedback: self.current_feedback,
            last_feedback: self.last_feedback,
            error: self.error,
            last_error: self.last_error,
            integral_cumulation: self.integral_cumulation,
            max_cumulation: self.max_cumulation,
            cycle_derivative: self.cycle_derivative,
            output: self.output,
            input_bounds: self.input_bounds,
            output_bounds: self.output_bounds,
            wrap_domain: self.wrap_domain,
            current_time: now,
            last_time: now,
            source: self.source,
            sink: self.sink,
            clock: Some(clock),
        }
    }

    pub fn set_time_source(&mut self, mut clock: T) {
        self.current_time = clock.now();
        self.last_time = self.current_time;
        self.clock = Some(clock);
    }

    /// Run one control cycle.
    ///
    /// Returns the delivered output, or `None` when disabled, in which case
    /// neither the feedback source nor the sink is touched.
    pub fn tick(&mut self) -> Option<i32> {
        if !self.enabled {
            return None;
        }

        self.current_feedback = self.source.read_feedback();
        if let Some(bounds) = self.input_bounds {
            self.current_feedback = bounds.clamp(self.current_feedback);
        }

        self.error = match self.wrap_domain {
            Some(domain) => domain.error(self.target, self.current_feedback),
            None => saturate(self.target as i64 - self.current_feedback as i64),
        };

        let cycle_integral = match self.clock.as_mut() {
            Some(clock) => {
                self.current_time = clock.now();
                let elapsed = self.current_time.saturating_sub(self.last_time);
                self.last_time = self.current_time;

                if elapsed == 0 {
                    warn!(
                        "no time elapsed since last cycle at {=u64}, holding integral",
                        self.current_time
                    );
                    self.cycle_derivative = 0.;
                    0
                } else {
                    let delta_error = self.error as i64 - self.last_error as i64;
                    self.cycle_derivative = delta_error as f32 / elapsed as f32;
                    let elapsed = i64::try_from(elapsed).unwrap_or(i64::MAX);
                    (self.last_error as i64 + self.error as i64 / 2).saturating_mul(elapsed)
                }
            }
            None => {
                self.cycle_derivative = (self.error as i64 - self.last_error as i64) as f32;
                self.error as i64
            }
        };

        let max = self.max_cumulation as i64;
        self.integral_cumulation =
            (self.integral_cumulation as i64).saturating_add(cycle_integral).clamp(-max, max) as i32;

        let raw = self.proportional_component()
            + self.integral_component()
            + self.derivative_component();
        self.output = self.rounding.apply(raw);

        self.last_feedback = self.current_feedback;
        self.last_error = self.error;

        if let Some(bounds) = self.output_bounds {
            self.output = bounds.clamp(self.output);
        }

        trace!(
            "pid tick: feedback={=i32} error={=i32} integral={=i32} output={=i32}",
            self.current_feedback,
            self.error,
            self.integral_cumulation,
            self.output
        );

        self.sink.write_output(self.output);
        Some(self.output)
    }

    /// Disabling clears the output and the integral; re-enabling resets nothing.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled && self.enabled {
            debug!("pid disabled");
            self.output = 0;
            self.integral_cumulation = 0;
        }
        self.enabled = enabled;
    }

    pub fn set_target(&mut self, target: i32) {
        self.target = target;
    }

    pub fn set_gains(&mut self, gains: Gains) {
        self.gains = gains;
    }

    pub fn set_rounding(&mut self, rounding: Rounding) {
        self.rounding = rounding;
    }

    /// Negative values are sign-flipped; anything that is not above 1 after
    /// that is ignored. Returns whether the limit was applied.
    pub fn set_max_integral_cumulation(&mut self, max: i32) -> bool {
        match normalize_max_cumulation(max) {
            Some(max) => {
                self.max_cumulation = max;
                true
            }
            None => false,
        }
    }

    /// Clamp feedback to `[lower, upper]`. Ignored unless `upper > lower`.
    pub fn set_input_bounds(&mut self, lower: i32, upper: i32) -> bool {
        match Bounds::new(lower, upper) {
            Some(bounds) => {
                self.input_bounds = Some(bounds);
                true
            }
            None => false,
        }
    }

    /// Clamp the output to `[lower, upper]`. Ignored unless `upper > lower`.
    pub fn set_output_bounds(&mut self, lower: i32, upper: i32) -> bool {
        match Bounds::new(lower, upper) {
            Some(bounds) => {
                self.output_bounds = Some(bounds);
                true
            }
            None => false,
        }
    }

    /// Treat feedback as circular on `[lower, upper]`. This also clamps
    /// feedback to the same range. Ignored unless `upper > lower`.
    pub fn set_feedback_wrap_bounds(&mut self, lower: i32, upper: i32) -> bool {
        if !self.set_input_bounds(lower, upper) {
            return false;
        }
        self.wrap_domain = WrapDomain::new(lower, upper);
        true
    }

    pub fn proportional_component(&self) -> f32 {
        self.error as f32 * self.gains.p
    }

    pub fn integral_component(&self) -> f32 {
        self.integral_cumulation as f32 * self.gains.i
    }

    pub fn derivative_component(&self) -> f32 {
        self.cycle_derivative * self.gains.d
    }

    pub fn target(&self) -> i32 {
        self.target
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn output(&self) -> i32 {
        self.output
    }

    pub fn error(&self) -> i32 {
        self.error
    }

    pub fn last_error(&self) -> i32 {
        self.last_error
    }

    pub fn feedback(&self) -> i32 {
        self.current_feedback
    }

    pub fn last_feedback(&self) -> i32 {
        self.last_feedback
    }

    pub fn integral_cumulation(&self) -> i32 {
        self.integral_cumulation
    }

    pub fn max_integral_cumulation(&self) -> i32 {
        self.max_cumulation
    }

    pub fn cycle_derivative(&self) -> f32 {
        self.cycle_derivative
    }

    pub fn gains(&self) -> Gains {
        self.gains
    }

    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    pub fn input_bounds(&self) -> Option<Bounds> {
        self.input_bounds
    }

    pub fn output_bounds(&self) -> Option<Bounds> {
        self.output_bounds
    }

    pub fn wrap_domain(&self) -> Option<WrapDomain> {
        self.wrap_domain
    }

    pub fn is_time_aware(&self) -> bool {
        self.clock.is_some()
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn sink_mut(&mut self) -> &mut O {
        &mut self.sink
    }

    pub fn into_parts(self) -> (S, O, Option<T>) {
        (self.source, self.sink, self.clock)
    }
}
