//! Integrated Monin–Obukhov stability functions ψ(ζ).
//!
//! Three families are provided, one per published closure:
//! - COARE (Fairall et al. 1996/2003): Kansas forms blended with the
//!   free-convection limit for ζ < 0, Beljaars–Holtslag-like forms for ζ > 0
//! - ECMWF IFS: Paulson (1970) for ζ < 0, Beljaars & Holtslag (1991) for ζ > 0
//! - NCAR (Large & Yeager 2004): Paulson for ζ < 0, linear −5ζ for ζ > 0
//!
//! All functions vanish at ζ = 0 and are continuous across neutrality.

use core::f64::consts::{FRAC_PI_2, PI};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Paulson (1970) momentum function, with `x = φ_m⁻¹ = (1 − γζ)^¼`.
fn paulson_m(x: f64) -> f64 {
    2.0 * ((1.0 + x) / 2.0).ln() + ((1.0 + x * x) / 2.0).ln() - 2.0 * x.atan() + FRAC_PI_2
}

/// Paulson (1970) heat function, with `x2 = φ_h⁻¹ = (1 − γζ)^½`.
fn paulson_h(x2: f64) -> f64 {
    2.0 * ((1.0 + x2) / 2.0).ln()
}

/// Free-convection limit (Grachev et al. 2000), `y = (1 − γζ)^⅓`.
fn convective(y: f64) -> f64 {
    1.5 * ((1.0 + y + y * y) / 3.0).ln() - SQRT_3 * ((1.0 + 2.0 * y) / SQRT_3).atan()
        + PI / SQRT_3
}

/// Weight of the convective limit in the COARE blend.
fn convective_weight(zeta: f64) -> f64 {
    let z2 = zeta * zeta;
    z2 / (1.0 + z2)
}

pub fn psi_m_coare(zeta: f64) -> f64 {
    if zeta < 0.0 {
        let psi_k = paulson_m((1.0 - 15.0 * zeta).powf(0.25));
        let psi_c = convective((1.0 - 10.15 * zeta).powf(1.0 / 3.0));
        let f = convective_weight(zeta);
        (1.0 - f) * psi_k + f * psi_c
    } else {
        let c = (0.35 * zeta).min(50.0);
        -(1.0 + zeta + 0.6667 * (zeta - 14.28) / c.exp() + 8.525)
    }
}

pub fn psi_h_coare(zeta: f64) -> f64 {
    if zeta < 0.0 {
        let psi_k = paulson_h((1.0 - 15.0 * zeta).sqrt());
        let psi_c = convective((1.0 - 34.15 * zeta).powf(1.0 / 3.0));
        let f = convective_weight(zeta);
        (1.0 - f) * psi_k + f * psi_c
    } else {
        let c = (0.35 * zeta).min(50.0);
        -((1.0 + 2.0 * zeta / 3.0).powf(1.5) + 0.6667 * (zeta - 14.28) / c.exp() + 8.525)
    }
}

// Beljaars & Holtslag (1991) coefficients
const BH_A: f64 = 1.0;
const BH_B: f64 = 2.0 / 3.0;
const BH_C: f64 = 5.0;
const BH_D: f64 = 0.35;

pub fn psi_m_ecmwf(zeta: f64) -> f64 {
    if zeta < 0.0 {
        paulson_m((1.0 - 16.0 * zeta).powf(0.25))
    } else {
        -BH_B * (zeta - BH_C / BH_D) * (-BH_D * zeta).exp() - BH_A * zeta - BH_B * BH_C / BH_D
    }
}

pub fn psi_h_ecmwf(zeta: f64) -> f64 {
    if zeta < 0.0 {
        paulson_h((1.0 - 16.0 * zeta).sqrt())
    } else {
        -BH_B * (zeta - BH_C / BH_D) * (-BH_D * zeta).exp()
            - (1.0 + 2.0 * BH_A * zeta / 3.0).powf(1.5)
            - BH_B * BH_C / BH_D
            + 1.0
    }
}

pub fn psi_m_ncar(zeta: f64) -> f64 {
    if zeta < 0.0 {
        paulson_m((1.0 - 16.0 * zeta).powf(0.25))
    } else {
        -5.0 * zeta
    }
}

pub fn psi_h_ncar(zeta: f64) -> f64 {
    if zeta < 0.0 {
        paulson_h((1.0 - 16.0 * zeta).sqrt())
    } else {
        -5.0 * zeta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Psi = fn(f64) -> f64;

    const ALL: [(&str, Psi); 6] = [
        ("psi_m_coare", psi_m_coare),
        ("psi_h_coare", psi_h_coare),
        ("psi_m_ecmwf", psi_m_ecmwf),
        ("psi_h_ecmwf", psi_h_ecmwf),
        ("psi_m_ncar", psi_m_ncar),
        ("psi_h_ncar", psi_h_ncar),
    ];

    #[test]
    fn vanish_at_neutral_and_are_continuous() {
        for (name, psi) in ALL {
            assert!(psi(0.0).abs() < 1e-2, "{name}(0) = {}", psi(0.0));
            let jump = (psi(1e-6) - psi(-1e-6)).abs();
            assert!(jump < 1e-2, "{name} jumps by {jump} at 0");
        }
    }

    #[test]
    fn sign_follows_stratification() {
        // unstable profiles are less sheared (ψ > 0), stable ones more (ψ < 0)
        for (name, psi) in ALL {
            assert!(psi(-1.0) > 0.0, "{name}(-1) = {}", psi(-1.0));
            assert!(psi(1.0) < 0.0, "{name}(1) = {}", psi(1.0));
        }
    }

    #[test]
    fn stay_finite_in_strong_stratification() {
        for (name, psi) in ALL {
            assert!(psi(-50.0).is_finite(), "{name}(-50)");
            assert!(psi(50.0).is_finite(), "{name}(50)");
        }
    }
}
