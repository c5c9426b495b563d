// fh-core/src/units.rs

use uom::si::f64::{
    MassDensity as UomMassDensity, ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Public canonical unit types (SI, f64)
pub type Density = UomMassDensity;
pub type Temperature = UomThermodynamicTemperature;

/// Offset between the Celsius and Kelvin scales.
pub const CELSIUS_OFFSET_K: f64 = 273.15;

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn deg_c(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

/// Mass concentration / density in kg/m³ (numerically equal to mg/mL).
#[inline]
pub fn kg_per_m3(v: f64) -> Density {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Density::new::<kilogram_per_cubic_meter>(v)
}

#[inline]
pub fn celsius_to_kelvin(t_c: f64) -> f64 {
    t_c + CELSIUS_OFFSET_K
}

#[inline]
pub fn kelvin_to_celsius(t_k: f64) -> f64 {
    t_k - CELSIUS_OFFSET_K
}
