use std::fmt::{Debug, Display, Formatter};

use crate::quantity::Quantity;

/// Mass of the emitted CO₂.
pub type Kilograms = Quantity<0, 0, 1>;

/// CO₂ emitted per kilowatt-hour consumed.
pub type CarbonIntensity = Quantity<-1, -1, 1>;

impl Display for Kilograms {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} kg", self.get())
    }
}

impl Debug for Kilograms {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}kg", self.get())
    }
}

impl Display for CarbonIntensity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} kg/kWh", self.get())
    }
}

impl Debug for CarbonIntensity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}kg/kWh", self.get())
    }
}
