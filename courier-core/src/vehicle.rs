//! The delivery vehicle's speed and weight profile.

use thiserror::Error;

/// Errors returned by [`Vehicle::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VehicleError {
    /// Speed was zero, negative or not finite.
    #[error("vehicle speed must be a positive finite number, got {0}")]
    InvalidSpeed(f64),
    /// Base weight was negative or not finite.
    #[error("vehicle weight must be a non-negative finite number, got {0}")]
    InvalidWeight(f64),
    /// Maximum load was negative or not finite.
    #[error("vehicle maximum load must be a non-negative finite number, got {0}")]
    InvalidMaxLoad(f64),
    /// Current load was negative or not finite.
    #[error("vehicle current load must be a non-negative finite number, got {0}")]
    InvalidCurrentLoad(f64),
}

/// Speed and weight profile of the single delivery vehicle.
///
/// The evaluator only reads `speed` and `weight`; the load figures are part
/// of the reported profile.
///
/// # Examples
///
/// ```
/// use courier_core::Vehicle;
///
/// let vehicle = Vehicle::default();
/// assert_eq!(vehicle.speed(), 1.0);
/// assert_eq!(vehicle.weight(), 100.0);
/// assert_eq!(vehicle.max_load(), 500.0);
/// assert_eq!(vehicle.current_load(), 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "VehicleFields")
)]
pub struct Vehicle {
    speed: f64,
    weight: f64,
    max_load: f64,
    current_load: f64,
}

impl Vehicle {
    /// Default travel speed in distance units per time unit.
    pub const DEFAULT_SPEED: f64 = 1.0;
    /// Default unladen weight.
    pub const DEFAULT_WEIGHT: f64 = 100.0;
    /// Default maximum load.
    pub const DEFAULT_MAX_LOAD: f64 = 500.0;

    /// Validate and construct an empty vehicle.
    ///
    /// # Errors
    /// Returns [`VehicleError`] when speed is not strictly positive or when
    /// weight or maximum load is negative; non-finite values are rejected.
    pub fn new(speed: f64, weight: f64, max_load: f64) -> Result<Self, VehicleError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(VehicleError::InvalidSpeed(speed));
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(VehicleError::InvalidWeight(weight));
        }
        if !max_load.is_finite() || max_load < 0.0 {
            return Err(VehicleError::InvalidMaxLoad(max_load));
        }
        Ok(Self {
            speed,
            weight,
            max_load,
            current_load: 0.0,
        })
    }

    /// Travel speed.
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Unladen weight.
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Maximum load capacity.
    pub const fn max_load(&self) -> f64 {
        self.max_load
    }

    /// Load currently carried.
    pub const fn current_load(&self) -> f64 {
        self.current_load
    }
}

/// Unvalidated vehicle fields as they appear in serialised form.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct VehicleFields {
    speed: f64,
    weight: f64,
    max_load: f64,
    #[serde(default)]
    current_load: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<VehicleFields> for Vehicle {
    type Error = VehicleError;

    fn try_from(fields: VehicleFields) -> Result<Self, Self::Error> {
        let VehicleFields {
            speed,
            weight,
            max_load,
            current_load,
        } = fields;
        if !current_load.is_finite() || current_load < 0.0 {
            return Err(VehicleError::InvalidCurrentLoad(current_load));
        }
        Ok(Self {
            current_load,
            ..Self::new(speed, weight, max_load)?
        })
    }
}

impl Default for Vehicle {
    fn default() -> Self {
        Self {
            speed: Self::DEFAULT_SPEED,
            weight: Self::DEFAULT_WEIGHT,
            max_load: Self::DEFAULT_MAX_LOAD,
            current_load: 0.0,
        }
    }
}
