//! Pure conversions from the customary units mechanism datasheets are
//! written in to the SI units the simulation runs in.

use std::f64::consts::PI;

/// Standard gravity (m/s²)
pub const STANDARD_GRAVITY: f64 = 9.80665;

const METERS_PER_INCH: f64 = 0.0254;
const METERS_PER_FOOT: f64 = 0.3048;
const KILOGRAMS_PER_POUND: f64 = 0.4535924;
const NEWTONS_PER_POUND_FORCE: f64 = 4.448222;

pub fn inches_to_meters(inches: f64) -> f64 {
    inches * METERS_PER_INCH
}

pub fn feet_to_meters(feet: f64) -> f64 {
    feet * METERS_PER_FOOT
}

pub fn pounds_to_kilograms(pounds: f64) -> f64 {
    pounds * KILOGRAMS_PER_POUND
}

pub fn pounds_force_to_newtons(pounds_force: f64) -> f64 {
    pounds_force * NEWTONS_PER_POUND_FORCE
}

pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

pub fn rpm_to_rad_per_sec(rpm: f64) -> f64 {
    rpm * 2.0 * PI / 60.0
}

pub fn rad_per_sec_to_rpm(rad_per_sec: f64) -> f64 {
    rad_per_sec * 60.0 / (2.0 * PI)
}

/// Weight (N) of a mass (kg) under standard gravity.
pub fn weight_of(mass_kg: f64) -> f64 {
    mass_kg * STANDARD_GRAVITY
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_six_inch_wheel_radius() {
        assert_relative_eq!(inches_to_meters(6.0) / 2.0, 0.0762, epsilon = 1e-12);
    }

    #[test]
    fn test_mass_and_force() {
        assert_relative_eq!(pounds_to_kilograms(150.0), 68.03886, epsilon = 1e-9);
        assert_relative_eq!(pounds_force_to_newtons(10.0), 44.48222, epsilon = 1e-9);
    }

    #[test]
    fn test_drag_race_distance() {
        assert_relative_eq!(feet_to_meters(30.0), 9.144, epsilon = 1e-12);
    }

    #[test]
    fn test_cim_free_speed() {
        assert_relative_eq!(rpm_to_rad_per_sec(5330.0), 558.1563, epsilon = 1e-3);
        assert_relative_eq!(rad_per_sec_to_rpm(rpm_to_rad_per_sec(5330.0)), 5330.0, epsilon = 1e-9);
    }
}
