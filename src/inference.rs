//! # Minor constituent inference
//!
//! Estimates the harmonic constants of eighteen small-amplitude constituents
//! from a canonical subset of eight majors (q1, o1, p1, k1, n2, m2, s2, k2)
//! using fixed empirical ratios, then evaluates them through the same
//! equilibrium-argument and nodal machinery as the harmonic predictor. The
//! result is the minor-band height correction the caller adds to the major
//! series.
//!
//! Two invariants:
//!
//! - at least six of the eight canonical majors must be present (located by
//!   parsed name); absent ones contribute zero. Below six the estimate is
//!   meaningless and the engine refuses with
//!   [`MareeError::InsufficientConstituents`];
//! - any minor whose physical constituent already appears among the supplied
//!   majors is excluded from the sum, so the union of inferred and modeled
//!   constituents never double-counts (the m1b/l2b sidelines are excluded
//!   together with their parents m1 and l2).

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;

use crate::astro::mean_longitudes_vec;
use crate::constants::{Degree, TideDays, DEGH, MJD_TIDE_EPOCH, RADEG};
use crate::constituents::parse_name;
use crate::maree_errors::MareeError;
use crate::predict::PredictOptions;

/// The canonical majors, in the order of the ratio table.
pub const CANONICAL_MAJORS: [&str; 8] = ["q1", "o1", "p1", "k1", "n2", "m2", "s2", "k2"];

/// Minimum number of canonical majors required for inference.
pub const MINIMUM_MAJORS: usize = 6;

/// One minor constituent: physical name, argument-table row, and the two
/// (major index, weight) terms of its empirical estimate.
struct Minor {
    name: &'static str,
    physical: &'static str,
    row: [f64; 7],
    terms: [(usize, f64); 2],
}

/// Empirical inference table over `(t₁, s, h, p, N, pₛ, 90°)` rows.
static MINORS: &[Minor] = &[
    Minor { name: "2q1", physical: "2q1", row: [1., -4., 1., 2., 0., 0., -1.], terms: [(0, 0.263), (1, -0.0252)] },
    Minor { name: "sigma1", physical: "sigma1", row: [1., -4., 3., 0., 0., 0., -1.], terms: [(0, 0.297), (1, -0.0264)] },
    Minor { name: "rho1", physical: "rho1", row: [1., -3., 3., -1., 0., 0., -1.], terms: [(0, 0.164), (1, 0.0048)] },
    Minor { name: "m1b", physical: "m1", row: [1., -1., 1., -1., 0., 0., 1.], terms: [(1, 0.0140), (3, 0.0101)] },
    Minor { name: "m1", physical: "m1", row: [1., -1., 1., 1., 0., 0., 1.], terms: [(1, 0.0389), (3, 0.0282)] },
    Minor { name: "chi1", physical: "chi1", row: [1., -1., 3., -1., 0., 0., 1.], terms: [(1, 0.0064), (3, 0.0060)] },
    Minor { name: "pi1", physical: "pi1", row: [1., 0., -2., 0., 0., 1., -1.], terms: [(1, 0.0030), (3, 0.0171)] },
    Minor { name: "phi1", physical: "phi1", row: [1., 0., 3., 0., 0., 0., 1.], terms: [(1, -0.0015), (3, 0.0152)] },
    Minor { name: "theta1", physical: "theta1", row: [1., 1., -1., 1., 0., 0., 1.], terms: [(1, -0.0065), (3, 0.0155)] },
    Minor { name: "j1", physical: "j1", row: [1., 1., 1., -1., 0., 0., 1.], terms: [(1, -0.0389), (3, 0.0836)] },
    Minor { name: "oo1", physical: "oo1", row: [1., 2., 1., 0., 0., 0., 1.], terms: [(1, -0.0431), (3, 0.0613)] },
    Minor { name: "2n2", physical: "2n2", row: [2., -4., 2., 2., 0., 0., 0.], terms: [(4, 0.264), (5, -0.0253)] },
    Minor { name: "mu2", physical: "mu2", row: [2., -4., 4., 0., 0., 0., 0.], terms: [(4, 0.298), (5, -0.0264)] },
    Minor { name: "nu2", physical: "nu2", row: [2., -3., 4., -1., 0., 0., 0.], terms: [(4, 0.165), (5, 0.00487)] },
    Minor { name: "lambda2", physical: "lambda2", row: [2., -1., 0., 1., 0., 0., 2.], terms: [(5, 0.0040), (6, 0.0074)] },
    Minor { name: "l2", physical: "l2", row: [2., -1., 2., -1., 0., 0., 2.], terms: [(5, 0.0131), (6, 0.0326)] },
    Minor { name: "l2b", physical: "l2", row: [2., -1., 2., 1., 0., 0., 0.], terms: [(5, 0.0033), (6, 0.0082)] },
    Minor { name: "t2", physical: "t2", row: [2., 0., -1., 0., 0., 1., 0.], terms: [(6, 0.0585), (6, 0.0)] },
];

/// Nodal modulation of the minor band, a reduced table in the node
/// longitude only.
fn minor_nodal(name: &str, n: Degree) -> (f64, f64) {
    let nr = n * RADEG;
    let (sinn, cosn) = nr.sin_cos();
    let (sin2n, cos2n) = (2.0 * nr).sin_cos();
    let ratio = |num: f64, den: f64| ((num * num + den * den).sqrt(), -num.atan2(den) / RADEG);
    match name {
        "2q1" | "sigma1" | "rho1" => {
            let num = 0.189 * sinn - 0.0058 * sin2n;
            let den = 1.0 + 0.189 * cosn - 0.0058 * cos2n;
            ((num * num + den * den).sqrt(), num.atan2(den) / RADEG)
        }
        "m1b" => {
            let num = 0.185 * sinn;
            let den = 1.0 + 0.185 * cosn;
            ((num * num + den * den).sqrt(), num.atan2(den) / RADEG)
        }
        "m1" => ratio(0.201 * sinn, 1.0 + 0.201 * cosn),
        "chi1" => ratio(0.221 * sinn, 1.0 + 0.221 * cosn),
        "j1" => ratio(0.198 * sinn, 1.0 + 0.198 * cosn),
        "oo1" => ratio(
            0.640 * sinn + 0.134 * sin2n,
            1.0 + 0.640 * cosn + 0.134 * cos2n,
        ),
        "2n2" | "mu2" | "nu2" | "l2" => ratio(0.0373 * sinn, 1.0 - 0.0373 * cosn),
        "l2b" => ratio(0.441 * sinn, 1.0 + 0.441 * cosn),
        _ => (1.0, 0.0),
    }
}

/// Locate the canonical majors in the supplied constituent list and slice
/// out their harmonic constants per sample row.
fn canonical_indices(constituents: &[&str]) -> Result<[Option<usize>; 8], MareeError> {
    let parsed: Vec<&str> = constituents
        .iter()
        .map(|name| parse_name(name))
        .collect::<Result<_, _>>()?;
    let mut indices = [None; 8];
    for (slot, major) in CANONICAL_MAJORS.iter().enumerate() {
        indices[slot] = parsed.iter().position(|c| c == major);
    }
    let found = indices.iter().flatten().count();
    if found < MINIMUM_MAJORS {
        return Err(MareeError::InsufficientConstituents {
            required: MINIMUM_MAJORS,
            found,
        });
    }
    Ok(indices)
}

/// The minors that survive the exclusivity rule for a major list.
fn active_minors(constituents: &[&str]) -> Result<Vec<&'static Minor>, MareeError> {
    let parsed: Vec<&str> = constituents
        .iter()
        .map(|name| parse_name(name))
        .collect::<Result<_, _>>()?;
    Ok(MINORS
        .iter()
        .filter(|m| !parsed.contains(&m.physical))
        .collect())
}

/// Names of the minors that would be inferred for a major list, after the
/// exclusivity rule. Exposed for callers assembling diagnostics.
pub fn inferred_minor_names(constituents: &[&str]) -> Result<Vec<&'static str>, MareeError> {
    Ok(active_minors(constituents)?.iter().map(|m| m.name).collect())
}

/// Infer the minor-band height correction at a single point.
///
/// Arguments
/// ---------
/// * `t`: days relative to the ocean tide epoch, one per output sample
/// * `hc`: complex harmonic constant per supplied major at the point
/// * `constituents`: major constituent names, ordered like `hc`
/// * `deltat`: optional per-sample TT−UT1 offset in days
/// * `opts`: correction convention (the nodal policy does not apply; the
///   minor band carries its own reduced modulation table)
///
/// Return
/// ------
/// * minor-band heights, one per time sample, to add to the major series
pub fn infer_minor(
    t: &[TideDays],
    hc: &[Complex64],
    constituents: &[&str],
    deltat: Option<&[f64]>,
    opts: &PredictOptions,
) -> Result<DVector<f64>, MareeError> {
    if hc.len() != constituents.len() {
        return Err(MareeError::ShapeMismatch(format!(
            "{} harmonic constants for {} constituents",
            hc.len(),
            constituents.len()
        )));
    }
    let hc = DMatrix::from_fn(1, hc.len(), |_, k| hc[k]);
    infer_minor_rows(t, &hc, constituents, deltat, opts, false)
}

/// Infer the minor-band correction along a drift track: sample `i` pairs
/// time `t[i]` with the major constants in row `i` of `hc`.
pub fn infer_minor_drift(
    t: &[TideDays],
    hc: &DMatrix<Complex64>,
    constituents: &[&str],
    deltat: Option<&[f64]>,
    opts: &PredictOptions,
) -> Result<DVector<f64>, MareeError> {
    if hc.nrows() != t.len() || hc.ncols() != constituents.len() {
        return Err(MareeError::ShapeMismatch(format!(
            "harmonic constants are {}×{} for {} times and {} constituents",
            hc.nrows(),
            hc.ncols(),
            t.len(),
            constituents.len()
        )));
    }
    infer_minor_rows(t, hc, constituents, deltat, opts, true)
}

fn infer_minor_rows(
    t: &[TideDays],
    hc: &DMatrix<Complex64>,
    constituents: &[&str],
    deltat: Option<&[f64]>,
    opts: &PredictOptions,
    paired: bool,
) -> Result<DVector<f64>, MareeError> {
    let indices = canonical_indices(constituents)?;
    let minors = active_minors(constituents)?;

    if let Some(dt) = deltat {
        if dt.len() != t.len() {
            return Err(MareeError::ShapeMismatch(format!(
                "deltat has {} samples for {} times",
                dt.len(),
                t.len()
            )));
        }
    }
    let mjd: Vec<f64> = t
        .iter()
        .enumerate()
        .map(|(i, &ti)| {
            if !ti.is_finite() {
                return Err(MareeError::InvalidTime(ti));
            }
            Ok(ti + MJD_TIDE_EPOCH + deltat.map_or(0.0, |d| d[i]))
        })
        .collect::<Result<_, _>>()?;
    let longitudes = mean_longitudes_vec(&mjd, opts.convention.longitude_method())?;

    let mut ht = DVector::zeros(t.len());
    for i in 0..t.len() {
        let row = if paired { i } else { 0 };
        // canonical major constants at this sample, absent slots zero
        let z: Vec<Complex64> = indices
            .iter()
            .map(|slot| slot.map_or(Complex64::new(0.0, 0.0), |k| hc[(row, k)]))
            .collect();
        let lon = &longitudes[i];
        let hour = 24.0 * mjd[i].rem_euclid(1.0);
        let fargs = [DEGH * hour, lon.s, lon.h, lon.p, lon.n, lon.pp, 90.0];
        for minor in &minors {
            let zmin = z[minor.terms[0].0] * minor.terms[0].1
                + z[minor.terms[1].0] * minor.terms[1].1;
            let arg: f64 = minor
                .row
                .iter()
                .zip(fargs.iter())
                .map(|(c, a)| c * a)
                .sum();
            let (f, u) = minor_nodal(minor.name, lon.n);
            let theta = (arg + u) * RADEG;
            ht[i] += f * (zmin.re * theta.cos() - zmin.im * theta.sin());
        }
    }
    Ok(ht)
}
