use crate::bulk::algorithm::{Algorithm, BulkClosure, SurfaceState, closure_for};
use crate::bulk::skin::{SkinForcing, cool_skin_delta};
use crate::error::AppError;
use crate::models::{FluxConfig, FluxResult, Heights, MeteoBatch, Radiation, Sample, SampleFluxes};
use crate::thermo::{
    GRAV, RCTV0, VKARMAN, absolute_temperature, cp_air, l_vap, one_on_l, potential_temperature,
    q_sat_sea, rho_air, visc_air,
};
use crate::validate::check_sizes;

/// Roughness of the neutral first-guess friction velocity [m].
const Z0_FIRST_GUESS: f64 = 1.0e-4;
/// Scale of the convective-limit Richardson number (Fairall et al. 2003).
const RIB_CONVECTIVE: f64 = 0.004;

/// Compute bulk fluxes for every sample of `batch` with the built-in
/// closure selected by `config.algorithm`.
///
/// The radiative path (cool-skin `t_s` output) is taken iff the batch
/// carries both `rad_sw` and `rad_lw`.
///
/// Errors, all raised before any numerical work:
/// - `ShapeMismatch` / `IncompleteRadiation` for malformed batches
/// - `MissingCustomClosure` for `Algorithm::Other` (use
///   [`compute_fluxes_with`])
///
/// Physically invalid samples are not errors; they yield non-finite values
/// at their own index only.
pub fn compute_fluxes(batch: &MeteoBatch, config: &FluxConfig) -> Result<FluxResult, AppError> {
    let closure = closure_for(config.algorithm, None)?;
    compute_with_closure(batch, config, closure)
}

/// Like [`compute_fluxes`], with `custom` filling the `Algorithm::Other`
/// slot. Built-in variants still resolve to their own closures.
pub fn compute_fluxes_with(
    batch: &MeteoBatch,
    config: &FluxConfig,
    custom: &dyn BulkClosure,
) -> Result<FluxResult, AppError> {
    let closure = closure_for(config.algorithm, Some(custom))?;
    compute_with_closure(batch, config, closure)
}

fn compute_with_closure(
    batch: &MeteoBatch,
    config: &FluxConfig,
    closure: &dyn BulkClosure,
) -> Result<FluxResult, AppError> {
    batch.validate()?;
    let samples = map_samples(batch.len(), closure, config.heights(), config.n_iter, |i| {
        batch.sample(i)
    });
    Ok(FluxResult::from_samples(samples, batch.has_radiation()))
}

/// Skin-temperature inputs and output of the slice-level entry points.
struct SkinSlices<'a> {
    rad_sw: &'a [f64],
    rad_lw: &'a [f64],
    t_s: &'a mut [f64],
}

/// Slice-level entry point without radiation: validates every input and
/// output length, then writes the fluxes in place.
#[allow(clippy::too_many_arguments)]
pub fn model(
    algo: Algorithm,
    zt: f64,
    zu: f64,
    sst: &[f64],
    t_zt: &[f64],
    q_zt: &[f64],
    u_zu: &[f64],
    v_zu: &[f64],
    slp: &[f64],
    ql: &mut [f64],
    qh: &mut [f64],
    tau_x: &mut [f64],
    tau_y: &mut [f64],
    n_iter: usize,
) -> Result<(), AppError> {
    let closure = closure_for(algo, None)?;
    fill_slices(
        closure,
        Heights { zt, zu },
        [sst, t_zt, q_zt, u_zu, v_zu, slp],
        [ql, qh, tau_x, tau_y],
        None,
        n_iter,
    )
}

/// As [`model`], with `custom` filling the `Algorithm::Other` slot.
#[allow(clippy::too_many_arguments)]
pub fn model_with(
    algo: Algorithm,
    zt: f64,
    zu: f64,
    sst: &[f64],
    t_zt: &[f64],
    q_zt: &[f64],
    u_zu: &[f64],
    v_zu: &[f64],
    slp: &[f64],
    ql: &mut [f64],
    qh: &mut [f64],
    tau_x: &mut [f64],
    tau_y: &mut [f64],
    n_iter: usize,
    custom: &dyn BulkClosure,
) -> Result<(), AppError> {
    let closure = closure_for(algo, Some(custom))?;
    fill_slices(
        closure,
        Heights { zt, zu },
        [sst, t_zt, q_zt, u_zu, v_zu, slp],
        [ql, qh, tau_x, tau_y],
        None,
        n_iter,
    )
}

/// Slice-level entry point with radiation: as [`model`], plus the
/// cool-skin corrected surface temperature written to `t_s`.
#[allow(clippy::too_many_arguments)]
pub fn model_with_radiation(
    algo: Algorithm,
    zt: f64,
    zu: f64,
    sst: &[f64],
    t_zt: &[f64],
    q_zt: &[f64],
    u_zu: &[f64],
    v_zu: &[f64],
    slp: &[f64],
    ql: &mut [f64],
    qh: &mut [f64],
    tau_x: &mut [f64],
    tau_y: &mut [f64],
    rad_sw: &[f64],
    rad_lw: &[f64],
    t_s: &mut [f64],
    n_iter: usize,
) -> Result<(), AppError> {
    let closure = closure_for(algo, None)?;
    fill_slices(
        closure,
        Heights { zt, zu },
        [sst, t_zt, q_zt, u_zu, v_zu, slp],
        [ql, qh, tau_x, tau_y],
        Some(SkinSlices { rad_sw, rad_lw, t_s }),
        n_iter,
    )
}

/// As [`model_with_radiation`], with `custom` filling the
/// `Algorithm::Other` slot.
#[allow(clippy::too_many_arguments)]
pub fn model_with_radiation_with(
    algo: Algorithm,
    zt: f64,
    zu: f64,
    sst: &[f64],
    t_zt: &[f64],
    q_zt: &[f64],
    u_zu: &[f64],
    v_zu: &[f64],
    slp: &[f64],
    ql: &mut [f64],
    qh: &mut [f64],
    tau_x: &mut [f64],
    tau_y: &mut [f64],
    rad_sw: &[f64],
    rad_lw: &[f64],
    t_s: &mut [f64],
    n_iter: usize,
    custom: &dyn BulkClosure,
) -> Result<(), AppError> {
    let closure = closure_for(algo, Some(custom))?;
    fill_slices(
        closure,
        Heights { zt, zu },
        [sst, t_zt, q_zt, u_zu, v_zu, slp],
        [ql, qh, tau_x, tau_y],
        Some(SkinSlices { rad_sw, rad_lw, t_s }),
        n_iter,
    )
}

/// Shared body of the slice-level entry points. Lengths are checked in
/// argument order (inputs, flux outputs, then the radiative triple) before
/// anything is written.
fn fill_slices(
    closure: &dyn BulkClosure,
    heights: Heights,
    inputs: [&[f64]; 6],
    outputs: [&mut [f64]; 4],
    skin: Option<SkinSlices<'_>>,
    n_iter: usize,
) -> Result<(), AppError> {
    let [sst, t_zt, q_zt, u_zu, v_zu, slp] = inputs;
    let [ql, qh, tau_x, tau_y] = outputs;
    let n = sst.len();

    let mut lengths = vec![
        sst.len(),
        t_zt.len(),
        q_zt.len(),
        u_zu.len(),
        v_zu.len(),
        slp.len(),
        ql.len(),
        qh.len(),
        tau_x.len(),
        tau_y.len(),
    ];
    if let Some(skin) = &skin {
        lengths.extend([skin.rad_sw.len(), skin.rad_lw.len(), skin.t_s.len()]);
    }
    check_sizes(n, &lengths)?;

    let samples = map_samples(n, closure, heights, n_iter, |i| Sample {
        sst: sst[i],
        t_zt: t_zt[i],
        q_zt: q_zt[i],
        u_zu: u_zu[i],
        v_zu: v_zu[i],
        slp: slp[i],
        radiation: skin.as_ref().map(|s| Radiation {
            sw: s.rad_sw[i],
            lw: s.rad_lw[i],
        }),
    });
    for (i, s) in samples.iter().enumerate() {
        ql[i] = s.ql;
        qh[i] = s.qh;
        tau_x[i] = s.tau_x;
        tau_y[i] = s.tau_y;
    }
    if let Some(skin) = skin {
        for (t_s, s) in skin.t_s.iter_mut().zip(&samples) {
            *t_s = s.t_s.unwrap_or(f64::NAN);
        }
    }
    Ok(())
}

#[cfg(not(feature = "parallel"))]
fn map_samples<F>(
    n: usize,
    closure: &dyn BulkClosure,
    heights: Heights,
    n_iter: usize,
    sample_at: F,
) -> Vec<SampleFluxes>
where
    F: Fn(usize) -> Sample + Sync,
{
    map_samples_seq(n, closure, heights, n_iter, sample_at)
}

/// Run [`solve_sample`] over `0..n`, in index order.
#[cfg_attr(all(feature = "parallel", not(test)), allow(dead_code))]
fn map_samples_seq<F>(
    n: usize,
    closure: &dyn BulkClosure,
    heights: Heights,
    n_iter: usize,
    sample_at: F,
) -> Vec<SampleFluxes>
where
    F: Fn(usize) -> Sample + Sync,
{
    (0..n)
        .map(|i| solve_sample(closure, heights, &sample_at(i), n_iter))
        .collect()
}

/// Run [`solve_sample`] over `0..n` on the rayon pool; results keep index
/// order.
#[cfg(feature = "parallel")]
fn map_samples<F>(
    n: usize,
    closure: &dyn BulkClosure,
    heights: Heights,
    n_iter: usize,
    sample_at: F,
) -> Vec<SampleFluxes>
where
    F: Fn(usize) -> Sample + Sync,
{
    use rayon::prelude::*;

    (0..n)
        .into_par_iter()
        .map(|i| solve_sample(closure, heights, &sample_at(i), n_iter))
        .collect()
}

/// Lower bound that, unlike `f64::max`, keeps NaN.
fn at_least(x: f64, min: f64) -> f64 {
    if x < min { min } else { x }
}

/// Bulk fluxes of a single sample.
///
/// A COARE-style first guess (neutral friction velocity, bulk Richardson
/// number mapped to ζ) is refined by exactly `n_iter` passes. Each pass
/// updates the stability parameter from the current turbulent scales,
/// moves θ and q from `zt` to `zu`, folds convective gustiness into the
/// bulk wind, asks the closure for roughness lengths and recomputes u*, θ*
/// and q* from the log profiles.
///
/// Fluxes are positive downward: a sea warmer than the air gives a negative
/// sensible heat flux, evaporation a negative latent heat flux.
pub fn solve_sample(
    closure: &dyn BulkClosure,
    heights: Heights,
    s: &Sample,
    n_iter: usize,
) -> SampleFluxes {
    let Heights { zt, zu } = heights;
    let max_zeta = closure.max_zeta().abs();
    let clip = |zeta: f64| zeta.clamp(-max_zeta, max_zeta);

    let theta_zt = potential_temperature(s.t_zt, zt);
    let q_zt = s.q_zt;
    let ssq = q_sat_sea(s.sst, s.slp);
    let nu_air = visc_air(s.t_zt);
    let wind = s.u_zu.hypot(s.v_zu);
    let mut u_blk = at_least(wind, closure.min_wind());

    let mut theta_zu = theta_zt;
    let mut q_zu = q_zt;
    let mut d_theta = theta_zu - s.sst;
    let mut d_q = q_zu - ssq;

    // first guess
    let mut u_star = 0.035 * u_blk * (10.0 / Z0_FIRST_GUESS).ln() / (zu / Z0_FIRST_GUESS).ln();
    let ri_b = GRAV * zu / theta_zu * (d_theta + RCTV0 * theta_zu * d_q) / (u_blk * u_blk);
    // the Richardson number carries the sign of ζ, which is all the
    // stability-dependent closures need here
    let mut rough = closure.roughness(&SurfaceState {
        u_star,
        u10n: u_blk,
        zeta_u: ri_b,
        nu_air,
    });
    let cd_n = (VKARMAN / (zu / rough.z0).ln()).powi(2);
    let ct_n = VKARMAN / (zt / rough.z0t).ln();
    let cc = VKARMAN * ct_n / cd_n;
    let beta = closure.gust_beta();
    let convective = if beta > 0.0 {
        -zu / (closure.boundary_layer_height() * RIB_CONVECTIVE * beta.powi(3))
    } else {
        f64::NEG_INFINITY
    };
    let mut zeta_u = clip(if ri_b < 0.0 {
        cc * ri_b / (1.0 + ri_b / convective)
    } else {
        cc * ri_b * (1.0 + 27.0 / 9.0 * ri_b / cc)
    });
    let zeta_t = clip(zt / zu * zeta_u);

    u_star = u_blk * VKARMAN / ((zu / rough.z0).ln() - closure.psi_m(zeta_u));
    let mut t_star = d_theta * VKARMAN / ((zt / rough.z0t).ln() - closure.psi_h(zeta_t));
    let mut q_star = d_q * VKARMAN / ((zt / rough.z0q).ln() - closure.psi_h(zeta_t));

    for _ in 0..n_iter {
        // (a) stability
        let inv_l = one_on_l(theta_zu, q_zu, t_star, q_star, u_star);
        zeta_u = clip(zu * inv_l);
        let zeta_t = clip(zt * inv_l);

        // (b) reference height, gustiness, roughness
        if zt != zu {
            let shift = ((zt / zu).ln() + closure.psi_h(zeta_u) - closure.psi_h(zeta_t)) / VKARMAN;
            theta_zu = theta_zt - t_star * shift;
            q_zu = q_zt - q_star * shift;
            d_theta = theta_zu - s.sst;
            d_q = q_zu - ssq;
        }

        if beta > 0.0 {
            let buoyancy = -GRAV / theta_zu * u_star * (t_star + RCTV0 * theta_zu * q_star);
            let w_star = if buoyancy > 0.0 {
                (buoyancy * closure.boundary_layer_height()).cbrt()
            } else {
                0.0
            };
            u_blk = at_least(wind.hypot(beta * w_star), closure.min_wind());
        }

        let u10n = u_star / VKARMAN * (10.0 / rough.z0).ln();
        rough = closure.roughness(&SurfaceState {
            u_star,
            u10n,
            zeta_u,
            nu_air,
        });

        // (c) turbulent scales
        let psi_h = closure.psi_h(zeta_u);
        u_star = u_blk * VKARMAN / ((zu / rough.z0).ln() - closure.psi_m(zeta_u));
        t_star = d_theta * VKARMAN / ((zu / rough.z0t).ln() - psi_h);
        q_star = d_q * VKARMAN / ((zu / rough.z0q).ln() - psi_h);
    }

    let rho_a = rho_air(absolute_temperature(theta_zu, zu), q_zu, s.slp);
    let l_v = l_vap(s.sst);
    let cd = (u_star / u_blk).powi(2);
    let tau = rho_a * cd * u_blk;
    let qh = rho_a * cp_air(q_zu) * u_star * t_star;
    let ql = rho_a * l_v * u_star * q_star;

    let t_s = s.radiation.map(|rad| {
        let forcing = SkinForcing {
            sst: s.sst,
            rad_sw: rad.sw,
            rad_lw: rad.lw,
            qh,
            ql,
            u_star,
            rho_a,
        };
        s.sst + cool_skin_delta(closure.cool_skin(), &forcing, n_iter)
    });

    SampleFluxes {
        ql,
        qh,
        tau_x: tau * s.u_zu,
        tau_y: tau * s.v_zu,
        evap: -ql / l_v,
        t_s,
    }
}


#[cfg(all(test, feature = "parallel"))]
mod parallel_tests {
    use super::*;
    use crate::bulk::closures::{COARE30, COARE35, ECMWF, NCAR};
    use crate::thermo::q_sat;
    use proptest::prelude::*;

    fn sample() -> impl Strategy<Value = Sample> {
        (
            275.0_f64..305.0,
            -4.0_f64..2.0,
            0.4_f64..0.95,
            -15.0_f64..15.0,
            -15.0_f64..15.0,
            proptest::option::of((0.0_f64..900.0, 250.0_f64..450.0)),
        )
            .prop_map(|(sst, dt, rh, u_zu, v_zu, rad)| {
                let t_zt = sst + dt;
                Sample {
                    sst,
                    t_zt,
                    q_zt: rh * q_sat(t_zt, 101_300.0),
                    u_zu,
                    v_zu,
                    slp: 101_300.0,
                    radiation: rad.map(|(sw, lw)| Radiation { sw, lw }),
                }
            })
    }

    proptest! {
        #[test]
        fn rayon_map_matches_sequential_map_bitwise(
            samples in prop::collection::vec(sample(), 0..24),
            pick in 0usize..4,
        ) {
            let closures: [&dyn BulkClosure; 4] = [&COARE30, &COARE35, &NCAR, &ECMWF];
            let closure = closures[pick];
            let heights = Heights { zt: 2.0, zu: 10.0 };
            let par = map_samples(samples.len(), closure, heights, 5, |i| samples[i]);
            let seq = map_samples_seq(samples.len(), closure, heights, 5, |i| samples[i]);

            prop_assert_eq!(par.len(), seq.len());
            for (p, s) in par.iter().zip(&seq) {
                prop_assert_eq!(p.ql.to_bits(), s.ql.to_bits());
                prop_assert_eq!(p.qh.to_bits(), s.qh.to_bits());
                prop_assert_eq!(p.tau_x.to_bits(), s.tau_x.to_bits());
                prop_assert_eq!(p.tau_y.to_bits(), s.tau_y.to_bits());
                prop_assert_eq!(p.evap.to_bits(), s.evap.to_bits());
                prop_assert_eq!(p.t_s.map(f64::to_bits), s.t_s.map(f64::to_bits));
            }
        }
    }
}
