use embedded_hal::pwm::{Error as _, SetDutyCycle};

use crate::bounds::Bounds;
use crate::interface::OutputSink;

/// Drives a PWM channel from the controller output.
///
/// `range` is mapped linearly onto `0..=max_duty_cycle`; outputs outside it
/// saturate at either end.
pub struct PwmSink<P> {
    pwm: P,
    range: Bounds,
}

impl<P: SetDutyCycle> PwmSink<P> {
    pub fn new(pwm: P, range: Bounds) -> Self {
        Self { pwm, range }
    }

    pub fn duty_for(&self, output: i32) -> u16 {
        let span = self.range.upper() as i64 - self.range.lower() as i64;
        let offset = self.range.clamp(output) as i64 - self.range.lower() as i64;
        let max = self.pwm.max_duty_cycle() as i64;
        (offset * max / span) as u16
    }

    pub fn release(self) -> P {
        self.pwm
    }
}

impl<P: SetDutyCycle> OutputSink for PwmSink<P> {
    fn write_output(&mut self, output: i32) {
        let duty = self.duty_for(output);
        if let Err(e) = self.pwm.set_duty_cycle(duty) {
            warn!("pwm duty {=u16} rejected: {}", duty, e.kind());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::pwm::ErrorType;

    struct FakePwm {
        max: u16,
        duty: u16,
    }

    impl ErrorType for FakePwm {
        type Error = Infallible;
    }

    impl SetDutyCycle for FakePwm {
        fn max_duty_cycle(&self) -> u16 {
            self.max
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.duty = duty;
            Ok(())
        }
    }

    fn sink(lower: i32, upper: i32) -> PwmSink<FakePwm> {
        let pwm = FakePwm { max: 1000, duty: 0 };
        PwmSink::new(pwm, Bounds::new(lower, upper).unwrap())
    }

    #[test]
    fn maps_range_onto_duty() {
        let mut sink = sink(-100, 100);
        sink.write_output(-100);
        assert_eq!(sink.pwm.duty, 0);
        sink.write_output(0);
        assert_eq!(sink.pwm.duty, 500);
        sink.write_output(100);
        assert_eq!(sink.pwm.duty, 1000);
    }

    #[test]
    fn saturates_outside_range() {
        let mut sink = sink(0, 255);
        sink.write_output(-20);
        assert_eq!(sink.pwm.duty, 0);
        sink.write_output(9000);
        assert_eq!(sink.release().duty, 1000);
    }

    #[test]
    fn full_i32_range() {
        let sink = sink(i32::MIN, i32::MAX);
        assert_eq!(sink.duty_for(i32::MIN), 0);
        assert_eq!(sink.duty_for(i32::MAX), 1000);
    }
}
