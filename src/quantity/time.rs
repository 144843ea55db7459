use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

pub type Hours = Quantity<0, 1, 0>;

impl Hours {
    pub fn from_minutes(minutes: f64) -> Self {
        Self::new(minutes / 60.0)
    }
}

impl Display for Hours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} h", self.get())
    }
}

impl Debug for Hours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}h", self.get())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_from_minutes() {
        assert_abs_diff_eq!(Hours::from_minutes(90.0).get(), 1.5);
    }

    #[test]
    fn test_display() {
        assert_eq!(Hours::from(0.0016).to_string(), "0.002 h");
    }
}
