use num_complex::Complex64;

/// A plausible set of harmonic constants for the canonical eight majors
/// (amplitudes in meters, phase lags in degrees), loosely shaped like a
/// mid-latitude Atlantic station.
pub fn station_constants() -> (Vec<&'static str>, Vec<Complex64>) {
    let constituents = vec!["q1", "o1", "p1", "k1", "n2", "m2", "s2", "k2"];
    let amp_phase = [
        (0.021, 241.0),
        (0.104, 253.0),
        (0.047, 166.0),
        (0.142, 161.0),
        (0.254, 87.0),
        (1.213, 68.0),
        (0.423, 95.0),
        (0.117, 92.0),
    ];
    let hc = amp_phase
        .iter()
        .map(|(amp, phase)| Complex64::from_polar(*amp, -phase * std::f64::consts::PI / 180.0))
        .collect();
    (constituents, hc)
}
