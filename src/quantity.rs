pub mod emission;
pub mod energy;
pub mod power;
pub mod time;

use std::ops::{Div, Mul};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Physical quantity tagged with the exponents of its dimensions.
///
/// The float is wrapped into [`OrderedFloat`] so that quantities are totally ordered and hashable.
#[derive(
    Clone,
    Copy,
    Default,
    Deserialize,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Neg,
    derive_more::Sub,
    derive_more::SubAssign,
    derive_more::Sum,
)]
#[from(i32, f64, OrderedFloat<f64>)]
#[must_use]
pub struct Quantity<const POWER: isize, const TIME: isize, const MASS: isize>(
    pub OrderedFloat<f64>,
);

impl<const POWER: isize, const TIME: isize, const MASS: isize> Quantity<POWER, TIME, MASS> {
    pub const ZERO: Self = Self(OrderedFloat(0.0));

    pub const fn new(value: f64) -> Self {
        Self(OrderedFloat(value))
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0.0
    }

    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.0.0.is_finite()
    }
}

impl<const POWER: isize, const TIME: isize, const MASS: isize> Mul<f64>
    for Quantity<POWER, TIME, MASS>
{
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl<const POWER: isize, const TIME: isize, const MASS: isize> Div<f64>
    for Quantity<POWER, TIME, MASS>
{
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl<const POWER: isize, const TIME: isize, const MASS: isize> Div<Self>
    for Quantity<POWER, TIME, MASS>
{
    type Output = f64;

    fn div(self, rhs: Self) -> Self::Output {
        (self.0 / rhs.0).0
    }
}
