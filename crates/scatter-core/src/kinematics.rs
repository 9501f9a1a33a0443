//! Three- and four-vector algebra with the (+,-,-,-) metric.

use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Spatial three-vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct ThreeVector {
    /// x component.
    pub x1: f64,
    /// y component.
    pub x2: f64,
    /// z component.
    pub x3: f64,
}

impl ThreeVector {
    /// Creates a new three-vector.
    pub const fn new(x1: f64, x2: f64, x3: f64) -> Self {
        Self { x1, x2, x3 }
    }

    /// Euclidean dot product.
    pub fn dot(&self, other: &ThreeVector) -> f64 {
        self.x1 * other.x1 + self.x2 * other.x2 + self.x3 * other.x3
    }

    /// Squared Euclidean norm.
    pub fn sqr(&self) -> f64 {
        self.dot(self)
    }

    /// Euclidean norm.
    pub fn abs(&self) -> f64 {
        self.sqr().sqrt()
    }
}

impl From<[f64; 3]> for ThreeVector {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<ThreeVector> for [f64; 3] {
    fn from(v: ThreeVector) -> Self {
        [v.x1, v.x2, v.x3]
    }
}

impl Add for ThreeVector {
    type Output = ThreeVector;

    fn add(self, rhs: ThreeVector) -> ThreeVector {
        ThreeVector::new(self.x1 + rhs.x1, self.x2 + rhs.x2, self.x3 + rhs.x3)
    }
}

impl Sub for ThreeVector {
    type Output = ThreeVector;

    fn sub(self, rhs: ThreeVector) -> ThreeVector {
        ThreeVector::new(self.x1 - rhs.x1, self.x2 - rhs.x2, self.x3 - rhs.x3)
    }
}

impl Mul<f64> for ThreeVector {
    type Output = ThreeVector;

    fn mul(self, rhs: f64) -> ThreeVector {
        ThreeVector::new(self.x1 * rhs, self.x2 * rhs, self.x3 * rhs)
    }
}

impl Neg for ThreeVector {
    type Output = ThreeVector;

    fn neg(self) -> ThreeVector {
        self * -1.0
    }
}

/// Minkowski four-vector `(x0; x1, x2, x3)`.
///
/// Used both for positions (fm) and momenta (GeV).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct FourVector {
    /// Time-like component.
    pub x0: f64,
    /// x component.
    pub x1: f64,
    /// y component.
    pub x2: f64,
    /// z component.
    pub x3: f64,
}

impl FourVector {
    /// Creates a new four-vector.
    pub const fn new(x0: f64, x1: f64, x2: f64, x3: f64) -> Self {
        Self { x0, x1, x2, x3 }
    }

    /// Builds an on-shell momentum from a mass and a spatial momentum.
    pub fn on_shell(mass: f64, momentum: ThreeVector) -> Self {
        let energy = (mass * mass + momentum.sqr()).sqrt();
        Self::new(energy, momentum.x1, momentum.x2, momentum.x3)
    }

    /// Spatial part of the vector.
    pub fn threevec(&self) -> ThreeVector {
        ThreeVector::new(self.x1, self.x2, self.x3)
    }

    /// Minkowski product with metric (+,-,-,-).
    pub fn dot(&self, other: &FourVector) -> f64 {
        self.x0 * other.x0 - self.threevec().dot(&other.threevec())
    }

    /// Minkowski square.
    pub fn sqr(&self) -> f64 {
        self.dot(self)
    }

    /// Invariant length `sqrt(p·p)`; negative squares are reported with a
    /// negative sign so space-like vectors remain distinguishable.
    pub fn abs(&self) -> f64 {
        let sqr = self.sqr();
        if sqr < 0.0 {
            -(-sqr).sqrt()
        } else {
            sqr.sqrt()
        }
    }

    /// Velocity `p/E` of a momentum four-vector.
    pub fn velocity(&self) -> ThreeVector {
        self.threevec() * (1.0 / self.x0)
    }

    /// Lorentz boost into the frame moving with velocity `v`.
    pub fn lorentz_boost(&self, v: ThreeVector) -> FourVector {
        let velocity_squared = v.sqr();
        if velocity_squared <= 0.0 {
            return *self;
        }
        let gamma = 1.0 / (1.0 - velocity_squared).sqrt();
        let spatial = self.threevec();
        let x0_prime = gamma * (self.x0 - spatial.dot(&v));
        let along = gamma / (gamma + 1.0) * (x0_prime + self.x0);
        let boosted = spatial - v * along;
        FourVector::new(x0_prime, boosted.x1, boosted.x2, boosted.x3)
    }
}

impl From<[f64; 4]> for FourVector {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<FourVector> for [f64; 4] {
    fn from(v: FourVector) -> Self {
        [v.x0, v.x1, v.x2, v.x3]
    }
}

impl Add for FourVector {
    type Output = FourVector;

    fn add(self, rhs: FourVector) -> FourVector {
        FourVector::new(
            self.x0 + rhs.x0,
            self.x1 + rhs.x1,
            self.x2 + rhs.x2,
            self.x3 + rhs.x3,
        )
    }
}

impl Sub for FourVector {
    type Output = FourVector;

    fn sub(self, rhs: FourVector) -> FourVector {
        FourVector::new(
            self.x0 - rhs.x0,
            self.x1 - rhs.x1,
            self.x2 - rhs.x2,
            self.x3 - rhs.x3,
        )
    }
}

impl Mul<f64> for FourVector {
    type Output = FourVector;

    fn mul(self, rhs: f64) -> FourVector {
        FourVector::new(self.x0 * rhs, self.x1 * rhs, self.x2 * rhs, self.x3 * rhs)
    }
}

/// Mandelstam `s` of a fixed-target collision with projectile lab momentum `plab`.
pub fn s_from_plab(plab: f64, mass_projectile: f64, mass_target: f64) -> f64 {
    mass_projectile * mass_projectile
        + mass_target * mass_target
        + 2.0 * mass_target * (mass_projectile * mass_projectile + plab * plab).sqrt()
}

/// Centre-of-mass momentum for Mandelstam `s`; zero below threshold.
pub fn pcm_from_s(s: f64, mass_a: f64, mass_b: f64) -> f64 {
    let sum = mass_a + mass_b;
    let diff = mass_a - mass_b;
    let psqr = (s - sum * sum) * (s - diff * diff) / (4.0 * s);
    if psqr > 0.0 {
        psqr.sqrt()
    } else {
        0.0
    }
}
