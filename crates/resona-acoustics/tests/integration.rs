//! Integration tests for resona-acoustics.
//!
//! End-to-end scenarios exercising the public API: sweep deconvolution,
//! octave-band decay estimation, and the Sabine/Eyring predictors, driven
//! by synthetic signals with known properties.

use resona_acoustics::{
    analyze, deconvolve, eyring_rt60, fft_convolve, generate_inverse, generate_sweep, materials,
    sabine_rt60, AcousticMaterial, AnalyzeOptions, CancelToken, FrequencyBand, Mode, RoomModel,
    Surface, SweepParams,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// 5 x 7 x 3 m shoebox room.
fn shoebox(surfaces: Vec<Surface>) -> RoomModel {
    RoomModel {
        name: "shoebox".into(),
        width_m: 5.0,
        length_m: 7.0,
        height_m: 3.0,
        surfaces,
        temperature_c: 20.0,
        humidity_pct: 50.0,
    }
}

/// Synthetic impulse response whose amplitude envelope drops 60 dB over
/// `rt60_s` seconds.
fn exponential_ir(rt60_s: f32, duration_s: f32, sample_rate: u32) -> Vec<f32> {
    let k = (1e3f32).ln() / rt60_s;
    (0..(duration_s * sample_rate as f32) as usize)
        .map(|n| (-k * n as f32 / sample_rate as f32).exp())
        .collect()
}

fn peak_index(samples: &[f32]) -> usize {
    samples
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.abs().partial_cmp(&b.abs()).unwrap())
        .map(|(i, _)| i)
        .unwrap()
}

// ===========================================================================
// 1. Geometric predictor scenarios
// ===========================================================================

#[test]
fn sabine_basic_shoebox() {
    // All surfaces at alpha = 0.1: T = 0.161 * 105 / 14.2 = 1.19 s
    let room = shoebox(Vec::new());

    let rt = sabine_rt60(&room, FrequencyBand::Khz1, false).unwrap();
    assert!((rt - 1.19).abs() < 0.01, "expected 1.19 s, got {rt}");
}

#[test]
fn eyring_below_sabine_at_high_absorption() {
    let area = shoebox(Vec::new()).total_surface_area_m2();
    let room = shoebox(vec![Surface::new(
        "boundary",
        area,
        AcousticMaterial::uniform("absorptive", 0.7),
    )]);

    let sab = sabine_rt60(&room, FrequencyBand::Khz1, false).unwrap();
    let eyr = eyring_rt60(&room, FrequencyBand::Khz1, false).unwrap();

    assert!(eyr < sab, "eyring {eyr} should be below sabine {sab}");
    assert!(sab.is_finite() && sab > 0.0);
    assert!(eyr.is_finite() && eyr > 0.0);
}

#[test]
fn carpet_floor_shortens_sabine_prediction() {
    let walls_and_ceiling = Surface::new("walls and ceiling", 107.0, materials::plaster());
    let before = shoebox(vec![
        Surface::new("floor", 35.0, materials::wood_floor()),
        walls_and_ceiling.clone(),
    ]);
    let after = shoebox(vec![
        Surface::new("floor", 35.0, materials::carpet()),
        walls_and_ceiling,
    ]);

    let rt_before = sabine_rt60(&before, FrequencyBand::Khz1, false).unwrap();
    let rt_after = sabine_rt60(&after, FrequencyBand::Khz1, false).unwrap();
    assert!(
        rt_after < rt_before,
        "carpet should shorten RT60: {rt_after} vs {rt_before}"
    );
}

// ===========================================================================
// 2. ESS sweep round trip
// ===========================================================================

#[test]
fn ess_sweep_self_test() {
    // Deconvolving the sweep itself (an anechoic "recording") must yield a
    // near-delta at the sweep length.
    let sample_rate = 44_100;
    let params = SweepParams::default(); // 20 Hz - 20 kHz, 3 s

    let sweep = generate_sweep(sample_rate, &params).unwrap();
    let inverse = generate_inverse(sample_rate, &params).unwrap();

    let result = deconvolve(
        &sweep,
        &inverse,
        sample_rate,
        params.duration_s,
        &CancelToken::new(),
    )
    .unwrap();

    // Peak within 2 samples of sample_rate * 3
    let expected = (sample_rate as f32 * params.duration_s) as i64;
    let got = result.peak_index as i64;
    assert!(
        (got - expected).abs() <= 2,
        "peak at {got}, expected near {expected}"
    );

    // 95% of the L2 energy within +-2.5 ms of the peak
    let ir_peak = peak_index(&result.ir);
    let half_window = (0.0025 * sample_rate as f32) as usize;
    let lo = ir_peak.saturating_sub(half_window);
    let hi = (ir_peak + half_window).min(result.ir.len());

    let total: f64 = result.ir.iter().map(|&x| (x as f64) * (x as f64)).sum();
    let windowed: f64 = result.ir[lo..hi]
        .iter()
        .map(|&x| (x as f64) * (x as f64))
        .sum();
    assert!(
        windowed / total > 0.95,
        "only {:.1}% of energy near the peak",
        100.0 * windowed / total
    );
}

#[test]
fn ess_measurement_recovers_synthetic_room() {
    // Simulate a measurement: the "recording" is the sweep convolved with
    // a synthetic exponential room response, then analyzed in ESS mode.
    let sample_rate = 16_000;
    let rt = 0.5f32;
    let params = SweepParams {
        start_hz: 40.0,
        end_hz: 7000.0,
        duration_s: 2.0,
    };

    let sweep = generate_sweep(sample_rate, &params).unwrap();
    let room_ir = exponential_ir(rt, 1.0, sample_rate);

    // Recording = sweep convolved with the room IR
    let (recording, _) =
        fft_convolve(&sweep, &room_ir, sample_rate, &CancelToken::new()).unwrap();
    let recording = &recording[..sweep.len() + room_ir.len() - 1];

    let options = AnalyzeOptions {
        skip_band_filter: true,
        ..Default::default()
    };
    let analysis = analyze(
        recording,
        sample_rate,
        Mode::Ess(params),
        &shoebox(Vec::new()),
        &options,
    )
    .unwrap();

    let measured = analysis
        .measured_rt60_seconds
        .get(FrequencyBand::Khz1)
        .expect("ESS measurement should produce a broadband RT60");
    assert!(
        (measured - rt).abs() < rt * 0.1,
        "recovered {measured} s from a {rt} s room"
    );
}

// ===========================================================================
// 3. Synthetic decay analysis
// ===========================================================================

#[test]
fn synthetic_exponential_broadband_estimates_agree() {
    let sample_rate = 44_100;
    let rt = 0.5f32;
    let ir = exponential_ir(rt, 2.0, sample_rate);

    let options = AnalyzeOptions {
        skip_band_filter: true,
        ..Default::default()
    };
    let analysis = analyze(&ir, sample_rate, Mode::Raw, &shoebox(Vec::new()), &options).unwrap();

    let band = FrequencyBand::Khz1;
    let rt60 = analysis.measured_rt60_seconds.get(band).unwrap();
    assert!((0.475..=0.525).contains(&rt60), "RT60 {rt60} out of range");

    // EDT, T20, and T30 agree to within 5% on a perfectly exponential decay
    let edt = analysis.edt_seconds.get(band).unwrap();
    let t20 = analysis.t20_seconds.get(band).unwrap();
    let t30 = analysis.t30_seconds.get(band).unwrap();
    for value in [edt, t20, t30] {
        assert!(
            (value - rt60).abs() < rt60 * 0.05,
            "estimator spread too wide: {value} vs {rt60}"
        );
    }
}

#[test]
fn banded_analysis_recovers_decay_in_every_band() {
    // White-ish noise with an exponential envelope has energy in all six
    // octave bands; every band should recover the same decay.
    let sample_rate = 44_100;
    let rt = 0.6f32;
    let k = (1e3f32).ln() / rt;

    let mut state = 0x12345678u32;
    let noise_envelope: Vec<f32> = (0..(2.0 * sample_rate as f32) as usize)
        .map(|n| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let noise = (state as i32 as f32) / (i32::MAX as f32);
            noise * (-k * n as f32 / sample_rate as f32).exp()
        })
        .collect();

    let analysis = analyze(
        &noise_envelope,
        sample_rate,
        Mode::Raw,
        &shoebox(Vec::new()),
        &AnalyzeOptions::default(),
    )
    .unwrap();

    for (band, value) in analysis.measured_rt60_seconds.iter() {
        let measured = value.unwrap_or_else(|| panic!("band {band} missing"));
        assert!(
            (measured - rt).abs() < rt * 0.15,
            "band {band}: {measured} s vs {rt} s"
        );
    }
}

// ===========================================================================
// 4. Degenerate inputs
// ===========================================================================

#[test]
fn short_buffer_yields_predictions_only() {
    // 50 ms at 44.1 kHz: measured map empty, Sabine/Eyring present
    let sample_rate = 44_100;
    let short = vec![0.5f32; (0.05 * sample_rate as f32) as usize];

    let options = AnalyzeOptions {
        skip_air_absorption: true,
        ..Default::default()
    };
    let analysis = analyze(&short, sample_rate, Mode::Raw, &shoebox(Vec::new()), &options).unwrap();

    assert!(analysis.measured_rt60_seconds.values().all(|v| v.is_none()));
    assert!(analysis.average_measured_rt60_seconds.is_none());

    for (_, &sab) in analysis.sabine_rt60_seconds.iter() {
        // Uniform default absorption, no air term: every band at 1.19 s
        assert!((sab - 1.19).abs() < 0.01);
    }
    assert!((analysis.average_sabine_rt60_seconds - 1.19).abs() < 0.01);
}

#[test]
fn cancelled_run_returns_no_partial_analysis() {
    let sample_rate = 44_100;
    let ir = exponential_ir(0.5, 2.0, sample_rate);

    let options = AnalyzeOptions::default();
    options.cancel.cancel();

    assert!(analyze(
        &ir,
        sample_rate,
        Mode::Raw,
        &shoebox(Vec::new()),
        &options
    )
    .is_err());
}

// ===========================================================================
// 5. Serialized report shape
// ===========================================================================

#[test]
fn analysis_serializes_with_band_keys_and_nulls() {
    let sample_rate = 44_100;
    let short = vec![0.5f32; 2205]; // too short to measure

    let analysis = analyze(
        &short,
        sample_rate,
        Mode::Raw,
        &shoebox(Vec::new()),
        &AnalyzeOptions::default(),
    )
    .unwrap();

    let json = serde_json::to_value(&analysis).unwrap();

    // Band keys follow the "125_hz" .. "4_khz" convention
    for key in ["125_hz", "250_hz", "500_hz", "1_khz", "2_khz", "4_khz"] {
        assert!(
            !json["sabine_rt60_seconds"][key].is_null(),
            "missing prediction for {key}"
        );
        // Unmeasured bands serialize as null, not 0
        assert!(json["measured_rt60_seconds"][key].is_null());
    }

    assert!(json["room"]["volume_m3"].as_f64().unwrap() > 104.9);
    assert!(json["average_measured_rt60_seconds"].is_null());
    assert!(json["quality"].is_string());
}
