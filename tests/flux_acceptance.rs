use aerobulk_rs::bulk::closures::ConstantCharnock;
use aerobulk_rs::{
    Algorithm, AppError, FluxConfig, MeteoBatch, compute_fluxes, compute_fluxes_with, model,
    model_with, model_with_radiation, model_with_radiation_with,
};

fn approx_in_range(v: f64, min: f64, max: f64) {
    assert!((min..=max).contains(&v), "value {v} not in [{min}, {max}]");
}

fn reference_batch() -> MeteoBatch {
    MeteoBatch::new(
        vec![300.0],
        vec![298.0],
        vec![0.01],
        vec![5.0],
        vec![0.0],
        vec![101_300.0],
    )
}

#[test]
fn warm_ocean_loses_heat_for_every_algorithm() {
    for algo in Algorithm::BUILT_IN {
        let cfg = FluxConfig::new(algo, 2.0, 10.0);
        let out = compute_fluxes(&reference_batch(), &cfg).unwrap();

        assert_eq!(out.len(), 1);
        assert!(out.t_s.is_none());
        // ocean warmer than air: upward sensible heat, i.e. negative downward flux
        assert!(out.qh[0] < 0.0, "{algo}: QH = {}", out.qh[0]);
        approx_in_range(out.qh[0], -60.0, -2.0);
        // evaporation dominates the turbulent heat loss
        assert!(out.ql[0] < 0.0, "{algo}: QL = {}", out.ql[0]);
        assert!(out.ql[0].abs() > out.qh[0].abs());
        approx_in_range(out.ql[0], -400.0, -80.0);
        // stress along the wind, small at 5 m/s
        approx_in_range(out.tau_x[0], 0.01, 0.2);
        assert_eq!(out.tau_y[0], 0.0);
    }
}

#[test]
fn cool_skin_stays_close_to_bulk_sst() {
    let batch = reference_batch().with_radiation(vec![200.0], vec![-50.0]);
    let out = compute_fluxes(&batch, &FluxConfig::default()).unwrap();
    let t_s = out.t_s.as_ref().expect("radiative path returns T_s")[0];
    assert!(t_s.is_finite());
    // about 750 W/m² net loss: the skin runs roughly a degree cooler
    assert!(t_s < 300.0);
    approx_in_range(300.0 - t_s, 0.5, 1.5);

    let batch = reference_batch().with_radiation(vec![200.0], vec![350.0]);
    for algo in Algorithm::BUILT_IN {
        let out = compute_fluxes(&batch, &FluxConfig::new(algo, 2.0, 10.0)).unwrap();
        let t_s = out.t_s.unwrap()[0];
        approx_in_range(300.0 - t_s, 0.0, 1.0);
    }
}

#[test]
fn radiation_does_not_change_turbulent_fluxes() {
    let cfg = FluxConfig::default();
    let plain = compute_fluxes(&reference_batch(), &cfg).unwrap();
    let rad = compute_fluxes(
        &reference_batch().with_radiation(vec![200.0], vec![350.0]),
        &cfg,
    )
    .unwrap();
    assert_eq!(plain.ql, rad.ql);
    assert_eq!(plain.qh, rad.qh);
    assert_eq!(plain.tau_x, rad.tau_x);
}

#[test]
fn wind_stress_follows_wind_direction() {
    let batch = MeteoBatch::new(
        vec![290.0; 2],
        vec![289.0; 2],
        vec![0.008; 2],
        vec![6.0, 0.0],
        vec![-6.0, 8.0],
        vec![101_000.0; 2],
    );
    let out = compute_fluxes(&batch, &FluxConfig::default()).unwrap();
    assert!(out.tau_x[0] > 0.0 && out.tau_y[0] < 0.0);
    assert!((out.tau_x[0] + out.tau_y[0]).abs() < 1e-12);
    assert_eq!(out.tau_x[1], 0.0);
    assert!(out.tau_y[1] > 0.0);
}

#[test]
fn mismatched_lengths_fail_before_computing() {
    let batch = MeteoBatch::new(
        vec![300.0; 3],
        vec![298.0; 2],
        vec![0.01; 3],
        vec![5.0; 3],
        vec![0.0; 3],
        vec![101_300.0; 3],
    );
    let err = compute_fluxes(&batch, &FluxConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        AppError::ShapeMismatch {
            expected: 3,
            position: 1,
            found: 2,
            mismatches: 1
        }
    ));
}

#[test]
fn empty_batch_gives_empty_result() {
    let batch = MeteoBatch::default();
    let out = compute_fluxes(&batch, &FluxConfig::default()).unwrap();
    assert!(out.is_empty());
    assert!(out.qh.is_empty() && out.tau_y.is_empty() && out.evap.is_empty());

    let out = compute_fluxes(&batch.with_radiation(vec![], vec![]), &FluxConfig::default()).unwrap();
    assert_eq!(out.t_s, Some(vec![]));
}

#[test]
fn degenerate_sample_does_not_abort_the_batch() {
    let batch = MeteoBatch::new(
        vec![300.0, f64::NAN, 300.0],
        vec![298.0; 3],
        vec![0.01; 3],
        vec![5.0; 3],
        vec![0.0; 3],
        vec![101_300.0; 3],
    );
    let out = compute_fluxes(&batch, &FluxConfig::default()).unwrap();
    assert!(!out.ql[1].is_finite());
    assert!(out.ql[0].is_finite() && out.ql[2].is_finite());
    assert_eq!(out.ql[0], out.ql[2]);
}

#[test]
fn other_runs_the_supplied_closure() {
    let cfg = FluxConfig::new(Algorithm::Other, 2.0, 10.0);
    assert!(matches!(
        compute_fluxes(&reference_batch(), &cfg),
        Err(AppError::MissingCustomClosure)
    ));

    let smooth = ConstantCharnock {
        alpha: 0.005,
        ..Default::default()
    };
    let rough = ConstantCharnock {
        alpha: 0.05,
        ..Default::default()
    };
    let a = compute_fluxes_with(&reference_batch(), &cfg, &smooth).unwrap();
    let b = compute_fluxes_with(&reference_batch(), &cfg, &rough).unwrap();
    // a rougher sea exerts more drag
    assert!(b.tau_x[0] > a.tau_x[0]);
}

#[test]
fn slice_interface_matches_batch_interface() {
    let batch = reference_batch();
    let cfg = FluxConfig::new(Algorithm::Ecmwf, 2.0, 10.0);
    let expected = compute_fluxes(&batch, &cfg).unwrap();

    let (mut ql, mut qh, mut tx, mut ty) = (vec![0.0], vec![0.0], vec![0.0], vec![0.0]);
    model(
        Algorithm::Ecmwf,
        2.0,
        10.0,
        &batch.sst,
        &batch.t_zt,
        &batch.q_zt,
        &batch.u_zu,
        &batch.v_zu,
        &batch.slp,
        &mut ql,
        &mut qh,
        &mut tx,
        &mut ty,
        cfg.n_iter,
    )
    .unwrap();
    assert_eq!(ql, expected.ql);
    assert_eq!(qh, expected.qh);
    assert_eq!(tx, expected.tau_x);
    assert_eq!(ty, expected.tau_y);
}

#[test]
fn slice_interface_rejects_short_output_without_writing() {
    let batch = reference_batch();
    let mut ql = vec![-1.0];
    let mut qh = vec![-1.0];
    let mut tx = vec![-1.0];
    let mut ty = vec![-1.0];
    let mut t_s: Vec<f64> = vec![];
    let err = model_with_radiation(
        Algorithm::Coare,
        2.0,
        10.0,
        &batch.sst,
        &batch.t_zt,
        &batch.q_zt,
        &batch.u_zu,
        &batch.v_zu,
        &batch.slp,
        &mut ql,
        &mut qh,
        &mut tx,
        &mut ty,
        &[200.0],
        &[350.0],
        &mut t_s,
        5,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::ShapeMismatch { position: 12, .. }));
    assert_eq!(ql, vec![-1.0]);
    assert_eq!(qh, vec![-1.0]);
}

fn radiative_pair() -> MeteoBatch {
    MeteoBatch::new(
        vec![300.0, 290.0],
        vec![298.0, 291.0],
        vec![0.01, 0.009],
        vec![5.0, 8.0],
        vec![0.0, -2.0],
        vec![101_300.0, 101_000.0],
    )
    .with_radiation(vec![200.0, 0.0], vec![350.0, 320.0])
}

#[test]
fn slice_interface_with_radiation_matches_batch_interface() {
    let batch = radiative_pair();
    for algo in Algorithm::BUILT_IN {
        let cfg = FluxConfig::new(algo, 2.0, 10.0);
        let expected = compute_fluxes(&batch, &cfg).unwrap();

        let mut ql = vec![0.0; 2];
        let mut qh = vec![0.0; 2];
        let mut tx = vec![0.0; 2];
        let mut ty = vec![0.0; 2];
        let mut t_s = vec![0.0; 2];
        model_with_radiation(
            algo,
            2.0,
            10.0,
            &batch.sst,
            &batch.t_zt,
            &batch.q_zt,
            &batch.u_zu,
            &batch.v_zu,
            &batch.slp,
            &mut ql,
            &mut qh,
            &mut tx,
            &mut ty,
            batch.rad_sw.as_deref().unwrap(),
            batch.rad_lw.as_deref().unwrap(),
            &mut t_s,
            cfg.n_iter,
        )
        .unwrap();

        assert_eq!(ql, expected.ql, "{algo}");
        assert_eq!(qh, expected.qh, "{algo}");
        assert_eq!(tx, expected.tau_x, "{algo}");
        assert_eq!(ty, expected.tau_y, "{algo}");
        assert_eq!(Some(t_s.clone()), expected.t_s, "{algo}");
        // the skin temperature was written, not left at the initial value
        for (i, t) in t_s.iter().enumerate() {
            assert!((t - batch.sst[i]).abs() < 1.0, "{algo}: T_s[{i}] = {t}");
        }
    }
}

#[test]
fn slice_interface_runs_the_supplied_closure() {
    let batch = radiative_pair();
    let rough = ConstantCharnock {
        alpha: 0.05,
        ..Default::default()
    };
    let cfg = FluxConfig::new(Algorithm::Other, 2.0, 10.0);
    let expected = compute_fluxes_with(&batch, &cfg, &rough).unwrap();

    let mut ql = vec![0.0; 2];
    let mut qh = vec![0.0; 2];
    let mut tx = vec![0.0; 2];
    let mut ty = vec![0.0; 2];
    let err = model(
        Algorithm::Other,
        2.0,
        10.0,
        &batch.sst,
        &batch.t_zt,
        &batch.q_zt,
        &batch.u_zu,
        &batch.v_zu,
        &batch.slp,
        &mut ql,
        &mut qh,
        &mut tx,
        &mut ty,
        cfg.n_iter,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::MissingCustomClosure));

    model_with(
        Algorithm::Other,
        2.0,
        10.0,
        &batch.sst,
        &batch.t_zt,
        &batch.q_zt,
        &batch.u_zu,
        &batch.v_zu,
        &batch.slp,
        &mut ql,
        &mut qh,
        &mut tx,
        &mut ty,
        cfg.n_iter,
        &rough,
    )
    .unwrap();
    assert_eq!(ql, expected.ql);
    assert_eq!(tx, expected.tau_x);

    let mut t_s = vec![0.0; 2];
    model_with_radiation_with(
        Algorithm::Other,
        2.0,
        10.0,
        &batch.sst,
        &batch.t_zt,
        &batch.q_zt,
        &batch.u_zu,
        &batch.v_zu,
        &batch.slp,
        &mut ql,
        &mut qh,
        &mut tx,
        &mut ty,
        batch.rad_sw.as_deref().unwrap(),
        batch.rad_lw.as_deref().unwrap(),
        &mut t_s,
        cfg.n_iter,
        &rough,
    )
    .unwrap();
    assert_eq!(qh, expected.qh);
    assert_eq!(ty, expected.tau_y);
    assert_eq!(Some(t_s), expected.t_s);
}
