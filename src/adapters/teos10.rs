use gsw as gsw_teos10;

use crate::thermo::RT0;

/// Practical salinity assumed for the skin layer when none is supplied.
pub const SP_SKIN: f64 = 35.0;

/// Density used when the `gsw` library reports an error [kg/m³].
pub const RHO_W_FALLBACK: f64 = 1025.0;

/// Reference Salinity (used as Absolute Salinity) from Practical Salinity.
/// For standard seawater composition SR ≈ SA.
pub fn sa_from_sp(sp: f64) -> f64 {
    gsw_teos10::conversions::sr_from_sp(sp)
}

/// In-situ density ρ from SA, CT and p (TEOS-10, 75-term polynomial).
/// Falls back to [`RHO_W_FALLBACK`] if the `gsw` library returns an error.
pub fn rho(sa: f64, ct: f64, p_dbar: f64) -> f64 {
    gsw_teos10::volume::rho(sa, ct, p_dbar).unwrap_or(RHO_W_FALLBACK)
}

/// Density of the sea-surface skin layer at `sst` [K].
///
/// At the surface the in-situ and conservative temperatures coincide to
/// well below the accuracy the cool-skin scheme needs, so SST is passed as
/// CT directly at zero sea pressure.
pub fn rho_skin(sst: f64) -> f64 {
    rho(sa_from_sp(SP_SKIN), sst - RT0, 0.0)
}
