//! Minkowski four-vectors for momenta and space-time positions.
//!
//! Metric signature (+, -, -, -). The time-like component is `x0`; the
//! spatial part is an `nalgebra::Vector3<f64>`.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// A four-vector (E, p) or (t, x).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FourVector {
    /// Time-like component (energy or time)
    pub x0: f64,

    /// Spatial components (momentum or position)
    pub threevec: Vector3<f64>,
}

impl FourVector {
    pub fn new(x0: f64, x1: f64, x2: f64, x3: f64) -> Self {
        Self {
            x0,
            threevec: Vector3::new(x1, x2, x3),
        }
    }

    pub fn from_parts(x0: f64, threevec: Vector3<f64>) -> Self {
        Self { x0, threevec }
    }

    pub fn zeros() -> Self {
        Self::from_parts(0.0, Vector3::zeros())
    }

    pub fn x0(&self) -> f64 {
        self.x0
    }

    pub fn x1(&self) -> f64 {
        self.threevec.x
    }

    pub fn x2(&self) -> f64 {
        self.threevec.y
    }

    pub fn x3(&self) -> f64 {
        self.threevec.z
    }

    /// Minkowski square x0² - |x|².
    pub fn sqr(&self) -> f64 {
        self.x0 * self.x0 - self.threevec.norm_squared()
    }

    /// Minkowski norm; negative for space-like vectors.
    ///
    /// For a momentum this is the invariant mass.
    pub fn abs(&self) -> f64 {
        let sqr = self.sqr();
        if sqr >= 0.0 {
            sqr.sqrt()
        } else {
            -(-sqr).sqrt()
        }
    }

    /// Velocity of a momentum four-vector, p / E.
    pub fn velocity(&self) -> Vector3<f64> {
        self.threevec / self.x0
    }

    /// Boosts this vector into a frame moving with velocity `v`.
    ///
    /// Boosting by `-v` undoes the transformation. A zero velocity returns
    /// the vector unchanged.
    pub fn lorentz_boost(&self, v: &Vector3<f64>) -> Self {
        let v_sqr = v.norm_squared();
        if v_sqr <= 0.0 {
            return *self;
        }
        let gamma = 1.0 / (1.0 - v_sqr).sqrt();
        let v_dot_x = v.dot(&self.threevec);
        let x0 = gamma * (self.x0 - v_dot_x);
        let threevec = self.threevec + v * ((gamma - 1.0) / v_sqr * v_dot_x - gamma * self.x0);
        Self { x0, threevec }
    }
}

impl Default for FourVector {
    fn default() -> Self {
        Self::zeros()
    }
}

impl Add for FourVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_parts(self.x0 + rhs.x0, self.threevec + rhs.threevec)
    }
}

impl Sub for FourVector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_parts(self.x0 - rhs.x0, self.threevec - rhs.threevec)
    }
}

impl AddAssign for FourVector {
    fn add_assign(&mut self, rhs: Self) {
        self.x0 += rhs.x0;
        self.threevec += rhs.threevec;
    }
}

impl SubAssign for FourVector {
    fn sub_assign(&mut self, rhs: Self) {
        self.x0 -= rhs.x0;
        self.threevec -= rhs.threevec;
    }
}

impl Neg for FourVector {
    type Output = Self;

    fn neg(self) -> Self {
        Self::from_parts(-self.x0, -self.threevec)
    }
}

impl Mul<f64> for FourVector {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::from_parts(self.x0 * rhs, self.threevec * rhs)
    }
}

impl Div<f64> for FourVector {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::from_parts(self.x0 / rhs, self.threevec / rhs)
    }
}

impl std::iter::Sum for FourVector {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zeros(), |acc, v| acc + v)
    }
}

impl std::fmt::Display for FourVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:.6}, {:.6}, {:.6}, {:.6})",
            self.x0, self.threevec.x, self.threevec.y, self.threevec.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_invariant_mass() {
        let p = FourVector::new(5.0, 3.0, 0.0, 0.0);
        assert_relative_eq!(p.abs(), 4.0, epsilon = 1e-12);

        let spacelike = FourVector::new(3.0, 5.0, 0.0, 0.0);
        assert_relative_eq!(spacelike.abs(), -4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_boost_to_rest_frame() {
        let p = FourVector::new(5.0, 0.0, 0.0, 3.0);
        let rest = p.lorentz_boost(&p.velocity());

        assert_relative_eq!(rest.x0, 4.0, epsilon = 1e-12);
        assert_relative_eq!(rest.threevec.norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_boost_roundtrip_preserves_vector() {
        let p = FourVector::new(2.0, 0.3, -0.4, 1.1);
        let v = Vector3::new(0.2, 0.1, -0.5);
        let back = p.lorentz_boost(&v).lorentz_boost(&-v);

        assert_relative_eq!(back.x0, p.x0, epsilon = 1e-12);
        assert_relative_eq!(back.threevec, p.threevec, epsilon = 1e-12);
        assert_relative_eq!(p.lorentz_boost(&v).sqr(), p.sqr(), epsilon = 1e-12);
    }

    #[test]
    fn test_sum_and_difference() {
        let a = FourVector::new(1.0, 0.5, 0.0, 0.0);
        let b = FourVector::new(1.0, -0.5, 0.0, 0.0);
        let total: FourVector = [a, b].into_iter().sum();

        assert_eq!(total, FourVector::new(2.0, 0.0, 0.0, 0.0));
        assert_eq!(total - a, b);
        assert_eq!(-a * 2.0, FourVector::new(-2.0, -1.0, 0.0, 0.0));
    }
}
