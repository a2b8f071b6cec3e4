use serde::{Deserialize, Serialize};

use crate::bulk::algorithm::Algorithm;
use crate::error::AppError;
use crate::validate::check_sizes;

/// Default number of similarity-theory refinement passes per sample.
pub const DEFAULT_N_ITER: usize = 5;

/// Measurement heights shared by a whole batch [m].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Heights {
    /// Height of the air temperature and humidity measurements.
    pub zt: f64,
    /// Height of the wind measurements.
    pub zu: f64,
}

impl Default for Heights {
    fn default() -> Self {
        Self { zt: 2.0, zu: 10.0 }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FluxConfig {
    pub algorithm: Algorithm,
    pub zt: f64,
    pub zu: f64,
    pub n_iter: usize,
}

impl Default for FluxConfig {
    fn default() -> Self {
        let heights = Heights::default();
        Self {
            algorithm: Algorithm::Coare,
            zt: heights.zt,
            zu: heights.zu,
            n_iter: DEFAULT_N_ITER,
        }
    }
}

impl FluxConfig {
    pub fn new(algorithm: Algorithm, zt: f64, zu: f64) -> Self {
        Self {
            algorithm,
            zt,
            zu,
            ..Default::default()
        }
    }

    pub fn with_n_iter(mut self, n_iter: usize) -> Self {
        self.n_iter = n_iter;
        self
    }

    pub fn heights(&self) -> Heights {
        Heights {
            zt: self.zt,
            zu: self.zu,
        }
    }
}

/// N co-located meteorological samples stored as parallel sequences.
///
/// - `sst`: sea-surface temperature [K]
/// - `t_zt`: absolute air temperature at `zt` [K]
/// - `q_zt`: specific humidity at `zt` [kg/kg]
/// - `u_zu`, `v_zu`: eastward/northward wind at `zu` [m/s]
/// - `slp`: sea-level pressure [Pa]
/// - `rad_sw`, `rad_lw`: downwelling shortwave/longwave radiation [W/m²],
///   both present or both absent
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeteoBatch {
    pub sst: Vec<f64>,
    pub t_zt: Vec<f64>,
    pub q_zt: Vec<f64>,
    pub u_zu: Vec<f64>,
    pub v_zu: Vec<f64>,
    pub slp: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rad_sw: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rad_lw: Option<Vec<f64>>,
}

impl MeteoBatch {
    pub fn new(
        sst: Vec<f64>,
        t_zt: Vec<f64>,
        q_zt: Vec<f64>,
        u_zu: Vec<f64>,
        v_zu: Vec<f64>,
        slp: Vec<f64>,
    ) -> Self {
        Self {
            sst,
            t_zt,
            q_zt,
            u_zu,
            v_zu,
            slp,
            rad_sw: None,
            rad_lw: None,
        }
    }

    pub fn with_radiation(mut self, rad_sw: Vec<f64>, rad_lw: Vec<f64>) -> Self {
        self.rad_sw = Some(rad_sw);
        self.rad_lw = Some(rad_lw);
        self
    }

    /// Number of samples, taken from `sst`. Only meaningful after
    /// [`MeteoBatch::validate`] succeeded.
    pub fn len(&self) -> usize {
        self.sst.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sst.is_empty()
    }

    pub fn has_radiation(&self) -> bool {
        self.rad_sw.is_some() && self.rad_lw.is_some()
    }

    /// Confirm every sequence has the same length as `sst`, including the
    /// radiative pair when present.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut lengths = vec![
            self.sst.len(),
            self.t_zt.len(),
            self.q_zt.len(),
            self.u_zu.len(),
            self.v_zu.len(),
            self.slp.len(),
        ];
        match (&self.rad_sw, &self.rad_lw) {
            (Some(sw), Some(lw)) => {
                lengths.push(sw.len());
                lengths.push(lw.len());
            }
            (None, None) => {}
            _ => return Err(AppError::IncompleteRadiation),
        }
        check_sizes(self.len(), &lengths)
    }

    /// Scalar view of sample `i`. Callers index only after validation.
    pub(crate) fn sample(&self, i: usize) -> Sample {
        let radiation = match (&self.rad_sw, &self.rad_lw) {
            (Some(sw), Some(lw)) => Some(Radiation {
                sw: sw[i],
                lw: lw[i],
            }),
            _ => None,
        };
        Sample {
            sst: self.sst[i],
            t_zt: self.t_zt[i],
            q_zt: self.q_zt[i],
            u_zu: self.u_zu[i],
            v_zu: self.v_zu[i],
            slp: self.slp[i],
            radiation,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Radiation {
    pub sw: f64,
    pub lw: f64,
}

/// One meteorological sample, in the units of [`MeteoBatch`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub sst: f64,
    pub t_zt: f64,
    pub q_zt: f64,
    pub u_zu: f64,
    pub v_zu: f64,
    pub slp: f64,
    pub radiation: Option<Radiation>,
}

/// Fluxes of one sample. Heat fluxes are positive into the ocean.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleFluxes {
    pub ql: f64,
    pub qh: f64,
    pub tau_x: f64,
    pub tau_y: f64,
    pub evap: f64,
    pub t_s: Option<f64>,
}

/// Per-sample outputs of a flux computation, index-aligned with the input
/// batch.
///
/// - `ql`, `qh`: latent and sensible heat flux [W/m²], positive downward
/// - `tau_x`, `tau_y`: wind-stress components [N/m²]
/// - `evap`: evaporation rate [kg/(m²·s)], positive when the ocean loses water
/// - `t_s`: cool-skin corrected surface temperature [K], only when the
///   batch carried radiative fluxes
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FluxResult {
    pub ql: Vec<f64>,
    pub qh: Vec<f64>,
    pub tau_x: Vec<f64>,
    pub tau_y: Vec<f64>,
    pub evap: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t_s: Option<Vec<f64>>,
}

impl FluxResult {
    pub(crate) fn from_samples(samples: Vec<SampleFluxes>, with_skin: bool) -> Self {
        let n = samples.len();
        let mut out = Self {
            ql: Vec::with_capacity(n),
            qh: Vec::with_capacity(n),
            tau_x: Vec::with_capacity(n),
            tau_y: Vec::with_capacity(n),
            evap: Vec::with_capacity(n),
            t_s: with_skin.then(|| Vec::with_capacity(n)),
        };
        for s in samples {
            out.ql.push(s.ql);
            out.qh.push(s.qh);
            out.tau_x.push(s.tau_x);
            out.tau_y.push(s.tau_y);
            out.evap.push(s.evap);
            if let Some(t_s) = out.t_s.as_mut() {
                t_s.push(s.t_s.unwrap_or(f64::NAN));
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.ql.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ql.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(n: usize) -> MeteoBatch {
        MeteoBatch::new(
            vec![300.0; n],
            vec![298.0; n],
            vec![0.01; n],
            vec![5.0; n],
            vec![0.0; n],
            vec![101_300.0; n],
        )
    }

    #[test]
    fn uniform_batch_validates() {
        assert!(batch(4).validate().is_ok());
        assert!(batch(0).validate().is_ok());
    }

    #[test]
    fn short_sequence_is_rejected() {
        let mut b = batch(3);
        b.t_zt.pop();
        assert!(matches!(
            b.validate(),
            Err(AppError::ShapeMismatch {
                expected: 3,
                position: 1,
                found: 2,
                ..
            })
        ));
    }

    #[test]
    fn radiation_pair_must_be_complete_and_aligned() {
        let mut b = batch(2);
        b.rad_sw = Some(vec![200.0, 200.0]);
        assert!(matches!(b.validate(), Err(AppError::IncompleteRadiation)));

        let b = batch(2).with_radiation(vec![200.0, 200.0], vec![350.0]);
        assert!(matches!(
            b.validate(),
            Err(AppError::ShapeMismatch { position: 7, .. })
        ));
    }

    #[test]
    fn config_defaults_follow_conventions() {
        let cfg: FluxConfig = serde_json::from_str(r#"{"algorithm": "ncar"}"#).unwrap();
        assert_eq!(cfg.algorithm, Algorithm::Ncar);
        assert_eq!(cfg.n_iter, DEFAULT_N_ITER);
        assert_eq!(cfg.heights(), Heights::default());
    }
}
