//! Built-in roughness/stability closures.
//!
//! Each algorithm differs from the others only in what it plugs into the
//! shared iteration: its ψ functions, how it turns the current friction
//! velocity and neutral wind into roughness lengths, and a handful of
//! scalar knobs (gustiness, minimum wind, ζ bound, cool-skin scheme).
//!
//! References:
//! - COARE 3.0: Fairall et al. (2003), J. Climate 16, 571–591
//! - COARE 3.5: Edson et al. (2013), J. Phys. Oceanogr. 43, 1589–1610
//! - NCAR: Large & Yeager (2004), NCAR Tech. Note TN-460+STR
//! - ECMWF: IFS documentation Cy45r1, Part IV, ch. 3

use crate::bulk::algorithm::{BulkClosure, CoolSkin, RoughnessLengths, SurfaceState};
use crate::bulk::stability::{
    psi_h_coare, psi_h_ecmwf, psi_h_ncar, psi_m_coare, psi_m_ecmwf, psi_m_ncar,
};
use crate::thermo::{GRAV, VKARMAN};

/// Smooth-flow coefficient in z0 = α·u*²/g + 0.11·ν/u*.
const SMOOTH_FLOW: f64 = 0.11;

fn charnock_z0(alpha: f64, state: &SurfaceState) -> f64 {
    alpha * state.u_star * state.u_star / GRAV + SMOOTH_FLOW * state.nu_air / state.u_star
}

fn roughness_reynolds(z0: f64, state: &SurfaceState) -> f64 {
    state.u_star * z0 / state.nu_air
}

/// COARE 3.0.
#[derive(Clone, Copy, Debug, Default)]
pub struct Coare30;

pub static COARE30: Coare30 = Coare30;

impl Coare30 {
    /// Charnock parameter: 0.011 up to 10 m/s, 0.018 from 18 m/s, linear in
    /// between.
    pub fn charnock(u10n: f64) -> f64 {
        (0.011 + (0.018 - 0.011) * (u10n - 10.0) / (18.0 - 10.0)).clamp(0.011, 0.018)
    }
}

impl BulkClosure for Coare30 {
    fn psi_m(&self, zeta: f64) -> f64 {
        psi_m_coare(zeta)
    }

    fn psi_h(&self, zeta: f64) -> f64 {
        psi_h_coare(zeta)
    }

    fn roughness(&self, state: &SurfaceState) -> RoughnessLengths {
        let z0 = charnock_z0(Self::charnock(state.u10n), state);
        let re = roughness_reynolds(z0, state);
        let z0t = (5.5e-5 * re.powf(-0.6)).min(1.1e-4);
        RoughnessLengths { z0, z0t, z0q: z0t }
    }
}

/// COARE 3.5.
#[derive(Clone, Copy, Debug, Default)]
pub struct Coare35;

pub static COARE35: Coare35 = Coare35;

impl Coare35 {
    /// Wind-dependent Charnock parameter, capped at 0.028 for high winds.
    pub fn charnock(u10n: f64) -> f64 {
        (0.0017 * u10n - 0.005).clamp(0.0, 0.028)
    }
}

impl BulkClosure for Coare35 {
    fn psi_m(&self, zeta: f64) -> f64 {
        psi_m_coare(zeta)
    }

    fn psi_h(&self, zeta: f64) -> f64 {
        psi_h_coare(zeta)
    }

    fn roughness(&self, state: &SurfaceState) -> RoughnessLengths {
        let z0 = charnock_z0(Self::charnock(state.u10n), state);
        let re = roughness_reynolds(z0, state);
        let z0t = (5.8e-5 * re.powf(-0.72)).min(1.6e-4);
        RoughnessLengths { z0, z0t, z0q: z0t }
    }
}

/// NCAR (Large & Yeager).
///
/// The original formulation is written in neutral 10 m transfer
/// coefficients; here they are expressed as the equivalent roughness
/// lengths so the shared log-profile iteration reproduces them exactly
/// at neutral stability.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ncar;

pub static NCAR: Ncar = Ncar;

impl Ncar {
    /// Neutral 10 m drag coefficient as a function of U10N [m/s].
    pub fn cd_n10(u10n: f64) -> f64 {
        if u10n >= 33.0 {
            2.34e-3
        } else {
            1.0e-3 * (2.7 / u10n + 0.142 + u10n / 13.09 - 3.148_07e-10 * u10n.powi(6))
        }
    }
}

impl BulkClosure for Ncar {
    fn psi_m(&self, zeta: f64) -> f64 {
        psi_m_ncar(zeta)
    }

    fn psi_h(&self, zeta: f64) -> f64 {
        psi_h_ncar(zeta)
    }

    fn roughness(&self, state: &SurfaceState) -> RoughnessLengths {
        let u10n = state.u10n.max(self.min_wind());
        let sqrt_cdn = Self::cd_n10(u10n).sqrt();
        let ch_n10 = sqrt_cdn * if state.zeta_u >= 0.0 { 18.0e-3 } else { 32.7e-3 };
        let ce_n10 = 34.6e-3 * sqrt_cdn;
        RoughnessLengths {
            z0: 10.0 * (-VKARMAN / sqrt_cdn).exp(),
            z0t: 10.0 * (-VKARMAN * sqrt_cdn / ch_n10).exp(),
            z0q: 10.0 * (-VKARMAN * sqrt_cdn / ce_n10).exp(),
        }
    }

    fn gust_beta(&self) -> f64 {
        0.0
    }

    fn min_wind(&self) -> f64 {
        0.5
    }

    fn max_zeta(&self) -> f64 {
        10.0
    }
}

/// ECMWF IFS.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ecmwf;

pub static ECMWF: Ecmwf = Ecmwf;

impl Ecmwf {
    const CHARNOCK: f64 = 0.018;
    const ALPHA_H: f64 = 0.40;
    const ALPHA_Q: f64 = 0.62;
}

impl BulkClosure for Ecmwf {
    fn psi_m(&self, zeta: f64) -> f64 {
        psi_m_ecmwf(zeta)
    }

    fn psi_h(&self, zeta: f64) -> f64 {
        psi_h_ecmwf(zeta)
    }

    fn roughness(&self, state: &SurfaceState) -> RoughnessLengths {
        let nu_on_u = state.nu_air / state.u_star;
        RoughnessLengths {
            z0: charnock_z0(Self::CHARNOCK, state),
            z0t: Self::ALPHA_H * nu_on_u,
            z0q: Self::ALPHA_Q * nu_on_u,
        }
    }

    fn gust_beta(&self) -> f64 {
        1.0
    }

    fn cool_skin(&self) -> CoolSkin {
        CoolSkin::ZengBeljaars2005
    }
}

/// Minimal user closure: constant Charnock parameter, constant scalar
/// roughness, COARE stability functions.
///
/// Meant for `Algorithm::Other` when a pipeline needs to pin the sea-state
/// dependence, e.g. for sensitivity runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantCharnock {
    pub alpha: f64,
    pub z0t: f64,
}

impl Default for ConstantCharnock {
    fn default() -> Self {
        Self {
            alpha: 0.011,
            z0t: 1.0e-4,
        }
    }
}

impl BulkClosure for ConstantCharnock {
    fn psi_m(&self, zeta: f64) -> f64 {
        psi_m_coare(zeta)
    }

    fn psi_h(&self, zeta: f64) -> f64 {
        psi_h_coare(zeta)
    }

    fn roughness(&self, state: &SurfaceState) -> RoughnessLengths {
        RoughnessLengths {
            z0: charnock_z0(self.alpha, state),
            z0t: self.z0t,
            z0q: self.z0t,
        }
    }
}
