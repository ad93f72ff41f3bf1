//! # Nodal corrections
//!
//! Computes the slowly varying amplitude factor `f` and phase correction `u`
//! that modulate each constituent over the 18.6-year regression of the lunar
//! node, from the node longitude `N` and (for a few constituents) the
//! perigee longitude `p`.
//!
//! Two correction conventions are implemented:
//!
//! - [`Convention::Otis`] (default): the exact trigonometric ratio forms used
//!   by the OTIS/ATLAS family of barotropic models,
//! - [`Convention::Got`] / [`Convention::Fes`]: the linearized sine-series
//!   forms of the PERTH3 program used by the GOT and FES model families.
//!
//! The conventions differ materially for k1, k2, o1 and the m2 band; they
//! also select the astronomical longitude method ([`LongitudeMethod::Astro5`]
//! for GOT/FES) and Doodson's 180° phase for s1.
//!
//! Constituents without a closed-form modulation (psi1, alpha1, the
//! meteorological sa, ...) are handled by [`NodalPolicy`]: either the reduced
//! default (f=1, u=0) or a hard [`MareeError::UnsupportedCorrection`].

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::astro::{LongitudeMethod, MeanLongitudes};
use crate::constants::{Degree, RADEG};
use crate::constituents::parse_name;
use crate::maree_errors::MareeError;

/// Nodal correction convention, following the tide model families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Convention {
    /// OTIS/ATLAS exact ratio forms (default)
    #[default]
    Otis,
    /// GOT linearized series (PERTH3)
    Got,
    /// FES linearized series (shares the GOT forms and phase conventions)
    Fes,
}

impl Convention {
    /// The astronomical longitude method paired with this convention.
    pub fn longitude_method(&self) -> LongitudeMethod {
        match self {
            Convention::Otis => LongitudeMethod::Cartwright,
            Convention::Got | Convention::Fes => LongitudeMethod::Astro5,
        }
    }

    /// Quarter-circle phase count of s1 under this convention.
    ///
    /// The OTIS family keeps the 90° phase of the argument table; GOT and
    /// FES use Doodson's 180° phase.
    pub fn s1_phase(&self) -> f64 {
        match self {
            Convention::Otis => 1.0,
            Convention::Got | Convention::Fes => 2.0,
        }
    }
}

impl FromStr for Convention {
    type Err = MareeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OTIS" | "ATLAS" | "TMD3" | "NETCDF" => Ok(Convention::Otis),
            "GOT" | "PERTH3" => Ok(Convention::Got),
            "FES" => Ok(Convention::Fes),
            _ => Err(MareeError::UnknownConvention(s.to_string())),
        }
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Convention::Otis => write!(f, "OTIS"),
            Convention::Got => write!(f, "GOT"),
            Convention::Fes => write!(f, "FES"),
        }
    }
}

/// Behavior for constituents without a nodal formula in the selected
/// convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NodalPolicy {
    /// Estimate with the reduced default (f=1, u=0)
    #[default]
    DefaultToUnity,
    /// Refuse with [`MareeError::UnsupportedCorrection`]
    Strict,
}

/// Nodal corrections for a set of constituents over a set of time samples.
///
/// Arguments
/// ---------
/// * `longitudes`: mean longitudes per time sample (only `n` and `p` are used)
/// * `constituents`: constituent names, any catalog spelling
/// * `convention`: correction convention
/// * `policy`: handling of constituents without a formula
///
/// Return
/// ------
/// * `(f, u)` matrices of shape time × constituents, `u` in degrees
pub fn nodal_factors(
    longitudes: &[MeanLongitudes],
    constituents: &[&str],
    convention: Convention,
    policy: NodalPolicy,
) -> Result<(DMatrix<f64>, DMatrix<f64>), MareeError> {
    let nt = longitudes.len();
    let nc = constituents.len();
    let mut f = DMatrix::from_element(nt, nc, 1.0);
    let mut u = DMatrix::zeros(nt, nc);
    for (k, name) in constituents.iter().enumerate() {
        let canonical = parse_name(name)?;
        for (i, lon) in longitudes.iter().enumerate() {
            match nodal_pair(canonical, lon.n, lon.p, convention) {
                Some((fk, uk)) => {
                    f[(i, k)] = fk;
                    u[(i, k)] = uk;
                }
                None => match policy {
                    NodalPolicy::DefaultToUnity => {}
                    NodalPolicy::Strict => {
                        return Err(MareeError::UnsupportedCorrection {
                            constituent: canonical.to_string(),
                            convention,
                        });
                    }
                },
            }
        }
    }
    Ok((f, u))
}

/// Single-constituent, single-epoch nodal correction.
///
/// Returns `None` when the convention carries no modulation formula for the
/// constituent; the caller applies its [`NodalPolicy`].
pub fn nodal_pair(
    canonical: &str,
    n: Degree,
    p: Degree,
    convention: Convention,
) -> Option<(f64, f64)> {
    let nr = n * RADEG;
    let pr = p * RADEG;
    let (sinn, cosn) = nr.sin_cos();
    let (sin2n, cos2n) = (2.0 * nr).sin_cos();
    let sin3n = (3.0 * nr).sin();

    // ratio-form correction: f·exp(iu) = den + i·num
    let ratio = |num: f64, den: f64| -> (f64, f64) {
        ((num * num + den * den).sqrt(), -num.atan2(den) / RADEG)
    };

    // base modulations of the four anchor constituents
    let (m2, k1, k2, o1) = match convention {
        Convention::Otis => (
            ratio(
                0.03731 * sinn - 0.00052 * sin2n,
                1.0 - 0.03731 * cosn + 0.00052 * cos2n,
            ),
            ratio(
                0.1554 * sinn - 0.0030 * sin2n,
                1.0 + 0.1158 * cosn - 0.0029 * cos2n,
            ),
            ratio(
                0.3108 * sinn + 0.0324 * sin2n,
                1.0 + 0.2852 * cosn + 0.0324 * cos2n,
            ),
            {
                let (fo, _) = ratio(
                    0.189 * sinn - 0.0058 * sin2n,
                    1.0 + 0.189 * cosn - 0.0058 * cos2n,
                );
                (fo, 10.8 * sinn - 1.3 * sin2n + 0.2 * sin3n)
            },
        ),
        Convention::Got | Convention::Fes => (
            (1.000 - 0.037 * cosn, -2.1 * sinn),
            (
                1.006 + 0.115 * cosn - 0.009 * cos2n,
                -8.9 * sinn + 0.7 * sin2n,
            ),
            (
                1.024 + 0.286 * cosn + 0.008 * cos2n,
                -17.7 * sinn + 0.7 * sin2n,
            ),
            (
                1.009 + 0.187 * cosn - 0.015 * cos2n,
                10.8 * sinn - 1.3 * sin2n + 0.2 * sin3n,
            ),
        ),
    };

    let pair = match canonical {
        // long-period band
        "mm" => (1.0 - 0.130 * cosn, 0.0),
        "mf" => (
            1.043 + 0.414 * cosn,
            -23.7 * sinn + 2.7 * sin2n - 0.4 * sin3n,
        ),
        "mt" | "mtm" => ratio(
            0.203 * sinn + 0.040 * sin2n,
            1.0 + 0.203 * cosn + 0.040 * cos2n,
        ),
        "ssa" | "msf" | "z0" => (1.0, 0.0),
        // diurnal band
        "2q1" | "q1" | "rho1" | "sigma1" | "o1" => o1,
        "tau1" => ratio(0.221 * sinn, 1.0 + 0.221 * cosn),
        "m1" => {
            let num = pr.sin() + 0.2 * (pr - nr).sin();
            let den = 2.0 * pr.cos() + 0.4 * (pr - nr).cos();
            ratio(num, den)
        }
        "chi1" => ratio(0.193 * sinn, 1.0 + 0.193 * cosn),
        "pi1" | "p1" | "s1" => (1.0, 0.0),
        "k1" => k1,
        "j1" | "theta1" => ratio(0.227 * sinn, 1.0 + 0.169 * cosn),
        "oo1" => ratio(
            0.702 * sinn + 0.268 * sin2n,
            1.0 + 0.640 * cosn + 0.134 * cos2n,
        ),
        // semi-diurnal band
        "2n2" | "mu2" | "n2" | "nu2" | "lambda2" | "m2" | "eps2" | "mns2" => m2,
        "l2" => {
            let num = 0.25 * (2.0 * pr).sin()
                + 0.11 * (2.0 * pr - nr).sin()
                + 0.04 * sinn;
            let den = 1.0
                - 0.25 * (2.0 * pr).cos()
                - 0.11 * (2.0 * pr - nr).cos()
                - 0.04 * cosn;
            ratio(num, den)
        }
        "t2" | "s2" | "r2" => (1.0, 0.0),
        "k2" => k2,
        "eta2" => ratio(0.436 * sinn, 1.0 + 0.436 * cosn),
        "2sm2" => (m2.0, -m2.1),
        // overtide and compound bands: products of the base modulations
        "m3" => (m2.0.powf(1.5), 1.5 * m2.1),
        "m4" | "mn4" | "n4" => (m2.0 * m2.0, 2.0 * m2.1),
        "ms4" => m2,
        "mk4" | "mks2" => (m2.0 * k2.0, m2.1 + k2.1),
        "mk3" => (m2.0 * k1.0, m2.1 + k1.1),
        "m6" => (m2.0.powi(3), 3.0 * m2.1),
        "m8" => (m2.0.powi(4), 4.0 * m2.1),
        "s3" | "s4" | "s5" | "s6" | "s7" | "s8" => (1.0, 0.0),
        // sa, msqm, alpha1, psi1, phi1, m2a, m2b, node: no closed-form modulation
        _ => return None,
    };
    Some(pair)
}

#[cfg(test)]
mod nodal_test {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn at(n: Degree, p: Degree) -> MeanLongitudes {
        MeanLongitudes {
            s: 0.0,
            h: 0.0,
            p,
            n,
            pp: 282.8,
        }
    }

    #[test]
    fn test_m2_at_node_zero() {
        // at N = 0 the m2 factor collapses to the fixed constant
        let (f, u) = nodal_pair("m2", 0.0, 0.0, Convention::Otis).unwrap();
        assert_relative_eq!(f, 1.0 - 0.03731 + 0.00052, max_relative = 1e-12);
        assert_eq!(u, 0.0);

        let (f, u) = nodal_pair("m2", 0.0, 0.0, Convention::Got).unwrap();
        assert_relative_eq!(f, 1.0 - 0.037, max_relative = 1e-12);
        assert_eq!(u, 0.0);
    }

    #[test]
    fn test_k1_k2_at_node_zero() {
        let (f, _) = nodal_pair("k1", 0.0, 0.0, Convention::Otis).unwrap();
        assert_relative_eq!(f, 1.0 + 0.1158 - 0.0029, max_relative = 1e-12);
        let (f, _) = nodal_pair("k1", 0.0, 0.0, Convention::Got).unwrap();
        assert_relative_eq!(f, 1.0 + 0.115 - 0.009, max_relative = 1e-12);

        let (f, _) = nodal_pair("k2", 0.0, 0.0, Convention::Otis).unwrap();
        assert_relative_eq!(f, 1.0 + 0.2852 + 0.0324, max_relative = 1e-12);
        let (f, _) = nodal_pair("k2", 0.0, 0.0, Convention::Got).unwrap();
        assert_relative_eq!(f, 1.024 + 0.286 + 0.008, max_relative = 1e-12);
    }

    #[test]
    fn test_conventions_differ_for_flagged_constituents() {
        // away from the node crossings the conventions disagree by design
        for name in ["k1", "k2", "o1", "m2"] {
            let a = nodal_pair(name, 60.0, 10.0, Convention::Otis).unwrap();
            let b = nodal_pair(name, 60.0, 10.0, Convention::Got).unwrap();
            assert!(
                (a.0 - b.0).abs() > 1e-5 || (a.1 - b.1).abs() > 1e-3,
                "{name}: {a:?} vs {b:?}"
            );
        }
    }

    #[test]
    fn test_linearized_forms_track_exact_forms() {
        // the PERTH3 series are first-order expansions of the ratio forms
        for n in [30.0, 120.0, 250.0, 330.0] {
            let (fa, ua) = nodal_pair("k1", n, 0.0, Convention::Otis).unwrap();
            let (fb, ub) = nodal_pair("k1", n, 0.0, Convention::Got).unwrap();
            assert_abs_diff_eq!(fa, fb, epsilon = 0.02);
            assert_abs_diff_eq!(ua, ub, epsilon = 1.5);
        }
    }

    #[test]
    fn test_compound_products() {
        let n = 123.4;
        let (fm2, um2) = nodal_pair("m2", n, 0.0, Convention::Otis).unwrap();
        let (f4, u4) = nodal_pair("m4", n, 0.0, Convention::Otis).unwrap();
        assert_relative_eq!(f4, fm2 * fm2, max_relative = 1e-12);
        assert_relative_eq!(u4, 2.0 * um2, max_relative = 1e-12);

        let (fk1, uk1) = nodal_pair("k1", n, 0.0, Convention::Otis).unwrap();
        let (f3, u3) = nodal_pair("mk3", n, 0.0, Convention::Otis).unwrap();
        assert_relative_eq!(f3, fm2 * fk1, max_relative = 1e-12);
        assert_relative_eq!(u3, um2 + uk1, max_relative = 1e-12);
    }

    #[test]
    fn test_u_sign_conventions() {
        // rising node: o1 phase leads, k1 and k2 lag
        let (_, uo1) = nodal_pair("o1", 45.0, 0.0, Convention::Otis).unwrap();
        let (_, uk1) = nodal_pair("k1", 45.0, 0.0, Convention::Otis).unwrap();
        let (_, uk2) = nodal_pair("k2", 45.0, 0.0, Convention::Otis).unwrap();
        assert!(uo1 > 0.0);
        assert!(uk1 < 0.0);
        assert!(uk2 < 0.0);
    }

    #[test]
    fn test_policy_default_to_unity() {
        let lon = vec![at(0.0, 0.0), at(127.0, 45.0)];
        let (f, u) = nodal_factors(
            &lon,
            &["psi1", "m2"],
            Convention::Otis,
            NodalPolicy::DefaultToUnity,
        )
        .unwrap();
        // psi1 has no closed-form modulation: reduced default
        assert_eq!(f[(0, 0)], 1.0);
        assert_eq!(u[(1, 0)], 0.0);
        // m2 still corrected
        assert!(f[(1, 1)] != 1.0);
    }

    #[test]
    fn test_policy_strict() {
        let lon = vec![at(0.0, 0.0)];
        let err = nodal_factors(&lon, &["psi1"], Convention::Otis, NodalPolicy::Strict)
            .unwrap_err();
        assert!(matches!(err, MareeError::UnsupportedCorrection { .. }));
    }

    #[test]
    fn test_unknown_constituent() {
        let lon = vec![at(0.0, 0.0)];
        let err = nodal_factors(&lon, &["xyz"], Convention::Otis, NodalPolicy::DefaultToUnity)
            .unwrap_err();
        assert_eq!(err, MareeError::UnknownConstituent("xyz".to_string()));
    }

    #[test]
    fn test_f_non_negative() {
        for name in ["m2", "k1", "k2", "o1", "mf", "mm", "l2", "m1", "oo1"] {
            for n in (0..360).step_by(30) {
                for conv in [Convention::Otis, Convention::Got] {
                    let (f, _) = nodal_pair(name, n as f64, 83.0, conv).unwrap();
                    assert!(f >= 0.0, "{name} at N={n}");
                }
            }
        }
    }
}
