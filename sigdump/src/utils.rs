use std::fmt::{Display, Formatter};

/// A time offset printed as `m:ss.mmm`.
pub struct TimeDisplay(u64);

pub trait TimeExt {
    fn display_time(&self) -> TimeDisplay;
}

impl TimeExt for f64 {
    fn display_time(&self) -> TimeDisplay {
        TimeDisplay((self.max(0.0) * 1000.0).round() as _)
    }
}

impl Display for TimeDisplay {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let total_secs = self.0 / 1000;
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        let millis = self.0 % 1000;

        write!(f, "{}:{:02}.{:03}", minutes, seconds, millis)
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::TimeExt;

    #[test]
    fn formatting() {
        assert_eq!(0.0_f64.display_time().to_string(), "0:00.000");
        assert_eq!(1.008_f64.display_time().to_string(), "0:01.008");
        assert_eq!(125.5_f64.display_time().to_string(), "2:05.500");
    }
}
