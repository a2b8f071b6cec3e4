//! Cool-skin correction of the sea-surface temperature.
//!
//! The top sub-millimetre of the ocean is a conductive layer losing heat to
//! the atmosphere through longwave emission and the turbulent fluxes, while
//! absorbing only a small fraction of the incoming shortwave. Its thickness
//! δ follows Saunders (1967) with the buoyancy-dependent coefficient λ of
//! Fairall et al. (1996); the temperature drop across it is
//! ΔT = Q_abs·δ / k_w.

use crate::adapters::teos10::rho_skin;
use crate::bulk::algorithm::CoolSkin;
use crate::thermo::{ALBEDO_W, CP_W, EMISS_W, GRAV, K_W, NU_W, RT0, STEFAN, l_vap};

/// Haline contraction coefficient of seawater at S = 35.
const BETA_SAL: f64 = 0.026;
/// Initial skin-layer thickness [m].
const DELTA_INIT: f64 = 1.0e-3;
/// Upper bound on δ when the skin is gaining heat (Fairall 1996) [m].
const DELTA_MAX_WARMING: f64 = 0.01;
/// Saunders constant.
const SAUNDERS: f64 = 6.0;

/// Surface forcing seen by the skin layer. Fluxes are positive downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkinForcing {
    /// Bulk sea-surface temperature [K].
    pub sst: f64,
    /// Downwelling shortwave radiation [W/m²].
    pub rad_sw: f64,
    /// Downwelling longwave radiation [W/m²].
    pub rad_lw: f64,
    /// Sensible heat flux [W/m²].
    pub qh: f64,
    /// Latent heat flux [W/m²].
    pub ql: f64,
    /// Friction velocity in the air [m/s].
    pub u_star: f64,
    /// Air density [kg/m³].
    pub rho_a: f64,
}

/// Thermal expansion coefficient of seawater [1/K] as a function of SST in
/// °C (Fairall et al. 1996 fit).
fn alpha_w(sst_c: f64) -> f64 {
    2.1e-5 * (sst_c.max(0.0) + 3.2).powf(0.79)
}

/// Fraction of net shortwave absorbed in a skin layer of thickness `delta`
/// (Fairall et al. 1996, eq. 16).
fn absorbed_fraction(delta: f64) -> f64 {
    0.065 + 11.0 * delta - 6.6e-5 / delta * (1.0 - (-delta / 8.0e-4).exp())
}

/// Temperature difference skin − bulk [K] after `n_iter` updates of the skin
/// thickness and surface temperature. Negative when the skin is cooler.
pub fn cool_skin_delta(scheme: CoolSkin, f: &SkinForcing, n_iter: usize) -> f64 {
    let sst_c = f.sst - RT0;
    let rho_w = rho_skin(f.sst);
    let alpha = alpha_w(sst_c);
    let q_sw_net = (1.0 - ALBEDO_W) * f.rad_sw;
    let u_star_w = f.u_star * (f.rho_a / rho_w).sqrt();
    let big_c =
        16.0 * GRAV * CP_W * (rho_w * NU_W).powi(3) / (K_W * K_W * f.rho_a * f.rho_a);
    // salinity contribution to the buoyancy flux, from evaporation
    let haline = match scheme {
        CoolSkin::Fairall1996 => BETA_SAL * (-f.ql) * CP_W / l_vap(f.sst),
        CoolSkin::ZengBeljaars2005 => 0.0,
    };

    let mut delta = DELTA_INIT;
    let mut d_t = 0.0;
    for _ in 0..=n_iter {
        let t_s = f.sst + d_t;
        let q_lw_net = EMISS_W * (f.rad_lw - STEFAN * t_s.powi(4));
        let mut fs = absorbed_fraction(delta);
        if scheme == CoolSkin::ZengBeljaars2005 {
            fs = fs.max(0.01);
        }
        let q_abs = q_lw_net + f.qh + f.ql + fs * q_sw_net;
        d_t = q_abs * delta / K_W;

        let alq = -alpha * q_abs + haline;
        delta = if alq > 0.0 {
            let lambda = SAUNDERS
                / (1.0 + (big_c * alq / f.u_star.powi(4)).powf(0.75)).powf(1.0 / 3.0);
            lambda * NU_W / u_star_w
        } else {
            let thin = SAUNDERS * NU_W / u_star_w;
            match scheme {
                CoolSkin::Fairall1996 => thin.min(DELTA_MAX_WARMING),
                CoolSkin::ZengBeljaars2005 => thin,
            }
        };
    }
    d_t
}
