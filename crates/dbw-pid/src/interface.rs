/// Where the controller reads the measured state of the plant from.
pub trait FeedbackSource {
    fn read_feedback(&mut self) -> i32;
}

/// Where the controller delivers its correction.
pub trait OutputSink {
    fn write_output(&mut self, output: i32);
}

/// Monotonic, non-decreasing clock in arbitrary ticks.
pub trait TimeSource {
    fn now(&mut self) -> u64;
}

impl<F: FnMut() -> i32> FeedbackSource for F {
    fn read_feedback(&mut self) -> i32 {
        self()
    }
}

impl<F: FnMut(i32)> OutputSink for F {
    fn write_output(&mut self, output: i32) {
        self(output)
    }
}

impl<F: FnMut() -> u64> TimeSource for F {
    fn now(&mut self) -> u64 {
        self()
    }
}
