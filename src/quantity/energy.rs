use std::{
    fmt::{Debug, Display, Formatter},
    ops::Mul,
};

use crate::quantity::{
    Quantity,
    emission::{CarbonIntensity, Kilograms},
};

pub type KilowattHours = Quantity<1, 1, 0>;

impl Display for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} kWh", self.get())
    }
}

impl Debug for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0}Wh", self.get() * 1000.0)
    }
}

impl Mul<CarbonIntensity> for KilowattHours {
    type Output = Kilograms;

    fn mul(self, rhs: CarbonIntensity) -> Self::Output {
        Quantity(self.0 * rhs.0)
    }
}
