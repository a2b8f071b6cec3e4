//! Thermo module: physical constants and helper functions for moist air
//! over seawater.
//!
//! This module provides:
//! - Physical constants shared by every bulk algorithm (gravity, von Kármán
//!   constant, gas constants, heat capacities, radiative constants)
//! - Latent heat of vaporization of seawater as a function of SST
//! - Saturation vapour pressure (Goff 1957) and saturation specific humidity,
//!   with the 2% seawater reduction applied at the sea surface
//! - Moist-air density, specific heat and kinematic viscosity
//! - Potential/virtual temperature and the inverse Obukhov length
//!
//! Units conventions:
//! - Temperatures are Kelvin unless the name says `_c`
//! - Pressures are Pa, specific humidities kg/kg
//! - Heights are metres above the sea surface
//!
//! Design notes:
//! - Everything here is a pure function of its arguments; there is no
//!   iteration and no failure path
//! - Non-finite inputs yield non-finite outputs, they are never clamped, so
//!   land-masked cells stay recognisable downstream
//!
//! # Examples
//! ```rust
//! use aerobulk_rs::thermo::{lvap, q_sat_sea};
//!
//! let lv = lvap(&[293.15, 303.15]);
//! assert!(lv[0] > lv[1]);
//! let qs = q_sat_sea(300.0, 101_325.0);
//! assert!(qs > 0.02 && qs < 0.023);
//! ```
//!
//! # Panics
//! None of the functions panic.

/// Gravitational acceleration [m/s²].
pub const GRAV: f64 = 9.8;
/// Von Kármán constant.
pub const VKARMAN: f64 = 0.4;
/// Freezing point of fresh water [K].
pub const RT0: f64 = 273.15;
/// Triple point of water [K].
pub const RTT0: f64 = 273.16;
/// Specific gas constant of dry air [J/(kg·K)].
pub const R_DRY: f64 = 287.05;
/// Specific gas constant of water vapour [J/(kg·K)].
pub const R_VAP: f64 = 461.495;
/// Ratio of molar masses, water vapour over dry air.
pub const REPS0: f64 = R_DRY / R_VAP;
/// Virtual temperature coefficient (≈ 0.608).
pub const RCTV0: f64 = R_VAP / R_DRY - 1.0;
/// Specific heat of dry air at constant pressure [J/(kg·K)].
pub const CP_DRY: f64 = 1005.0;
/// Specific heat of water vapour at constant pressure [J/(kg·K)].
pub const CP_VAP: f64 = 1860.0;
/// Dry adiabatic lapse rate [K/m].
pub const GAMMA_DRY: f64 = GRAV / CP_DRY;
/// Stefan–Boltzmann constant [W/(m²·K⁴)].
pub const STEFAN: f64 = 5.67e-8;
/// Longwave emissivity of the sea surface.
pub const EMISS_W: f64 = 0.97;
/// Shortwave albedo of the sea surface.
pub const ALBEDO_W: f64 = 0.066;
/// Specific heat of seawater [J/(kg·K)].
pub const CP_W: f64 = 4190.0;
/// Thermal conductivity of seawater [W/(m·K)].
pub const K_W: f64 = 0.6;
/// Kinematic viscosity of seawater [m²/s].
pub const NU_W: f64 = 1.0e-6;
/// Reduction of saturation humidity over seawater (salinity effect).
pub const SEAWATER_Q_FACTOR: f64 = 0.98;

/// Latent heat of vaporization of seawater [J/kg] at sea-surface
/// temperature `sst` [K].
pub fn l_vap(sst: f64) -> f64 {
    (2.501 - 0.00237 * (sst - RT0)) * 1.0e6
}

/// Element-wise [`l_vap`] over a sequence of SSTs [K].
///
/// Order-preserving, one output per input. Non-finite entries (e.g. a land
/// mask encoded as NaN) come back non-finite.
pub fn lvap(sst: &[f64]) -> Vec<f64> {
    sst.iter().copied().map(l_vap).collect()
}

/// Saturation vapour pressure over water [Pa] (Goff 1957).
pub fn e_sat(t: f64) -> f64 {
    let ztmp = RTT0 / t;
    let log10_e_hpa = 10.79574 * (1.0 - ztmp) - 5.028 * (t / RTT0).log10()
        + 1.50475e-4 * (1.0 - 10f64.powf(-8.2969 * (t / RTT0 - 1.0)))
        + 0.42873e-3 * (10f64.powf(4.76955 * (1.0 - ztmp)) - 1.0)
        + 0.78614;
    100.0 * 10f64.powf(log10_e_hpa)
}

/// Saturation specific humidity [kg/kg] at temperature `t` [K] and
/// pressure `p` [Pa].
pub fn q_sat(t: f64, p: f64) -> f64 {
    let e = e_sat(t);
    REPS0 * e / (p - (1.0 - REPS0) * e)
}

/// Saturation specific humidity right above the sea surface, reduced by
/// [`SEAWATER_Q_FACTOR`].
pub fn q_sat_sea(sst: f64, p: f64) -> f64 {
    SEAWATER_Q_FACTOR * q_sat(sst, p)
}

/// Density of moist air [kg/m³].
pub fn rho_air(t: f64, q: f64, p: f64) -> f64 {
    p / (R_DRY * virtual_temperature(t, q))
}

/// Specific heat of moist air [J/(kg·K)].
pub fn cp_air(q: f64) -> f64 {
    CP_DRY + CP_VAP * q
}

/// Kinematic viscosity of air [m²/s] (Andreas 1989 polynomial in °C).
pub fn visc_air(t: f64) -> f64 {
    let t_c = t - RT0;
    1.326e-5 * (1.0 + t_c * (6.542e-3 + t_c * (8.301e-6 - 4.84e-9 * t_c)))
}

/// Potential temperature [K] of air at absolute temperature `t` and height
/// `z` above the surface.
pub fn potential_temperature(t: f64, z: f64) -> f64 {
    t + GAMMA_DRY * z
}

/// Absolute temperature [K] from potential temperature at height `z`.
pub fn absolute_temperature(theta: f64, z: f64) -> f64 {
    theta - GAMMA_DRY * z
}

pub fn virtual_temperature(t: f64, q: f64) -> f64 {
    t * (1.0 + RCTV0 * q)
}

/// Inverse Obukhov length 1/L [1/m] from the turbulent scales.
///
/// `theta` and `q` are taken at the reference height; the sign convention
/// makes 1/L negative when the surface buoyancy flux is upward (unstable).
pub fn one_on_l(theta: f64, q: f64, t_star: f64, q_star: f64, u_star: f64) -> f64 {
    GRAV * VKARMAN * (t_star * (1.0 + RCTV0 * q) + RCTV0 * theta * q_star)
        / (u_star * u_star * virtual_temperature(theta, q))
}
