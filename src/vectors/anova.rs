//! One-way analysis of variance.

/// F statistic and p-value of a one-way ANOVA.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnovaResult {
    /// F statistic (NaN when undefined).
    pub f_statistic: f64,
    /// Upper-tail probability of the F statistic (NaN when undefined).
    pub p_value: f64,
}

/// One-way ANOVA across groups of observations.
///
/// Empty groups are ignored. With fewer than two groups, no within-group
/// degrees of freedom, or no within-group variance, both values are NaN.
pub fn one_way_anova(groups: &[Vec<f64>]) -> AnovaResult {
    let undefined = AnovaResult {
        f_statistic: f64::NAN,
        p_value: f64::NAN,
    };

    let groups: Vec<&Vec<f64>> = groups.iter().filter(|g| !g.is_empty()).collect();
    let k = groups.len();
    let n: usize = groups.iter().map(|g| g.len()).sum();
    if k < 2 || n <= k {
        return undefined;
    }

    let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / n as f64;
    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in &groups {
        let mean = group.iter().sum::<f64>() / group.len() as f64;
        ss_between += group.len() as f64 * (mean - grand_mean).powi(2);
        ss_within += group.iter().map(|x| (x - mean).powi(2)).sum::<f64>();
    }

    let df_between = (k - 1) as f64;
    let df_within = (n - k) as f64;
    let ms_within = ss_within / df_within;
    if ms_within <= 0.0 || !ms_within.is_finite() {
        return undefined;
    }

    let f_statistic = (ss_between / df_between) / ms_within;
    AnovaResult {
        f_statistic,
        p_value: f_distribution_sf(f_statistic, df_between, df_within),
    }
}

/// Survival function of the F distribution, `P(X > f)`.
pub fn f_distribution_sf(f: f64, d1: f64, d2: f64) -> f64 {
    if !(f.is_finite() && d1 > 0.0 && d2 > 0.0) {
        return f64::NAN;
    }
    if f <= 0.0 {
        return 1.0;
    }
    regularized_incomplete_beta(d2 / 2.0, d1 / 2.0, d2 / d1.mul_add(f, d2))
}

/// Regularized incomplete beta function `I_x(a, b)`.
pub fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let ln_front = libm::lgamma(a + b) - libm::lgamma(a) - libm::lgamma(b)
        + a * x.ln()
        + b * (1.0 - x).ln();
    let front = ln_front.exp();

    // continued fraction converges fastest on this side of the mean
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(a, b, x) / a
    } else {
        1.0 - front * beta_continued_fraction(b, a, 1.0 - x) / b
    }
}

/// Lentz evaluation of the incomplete beta continued fraction.
fn beta_continued_fraction(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITERATIONS: u32 = 300;
    const EPSILON: f64 = 1e-15;
    const TINY: f64 = 1e-300;

    let clamp_tiny = |v: f64| if v.abs() < TINY { TINY } else { v };

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 / clamp_tiny(1.0 - qab * x / qap);
    let mut h = d;

    for m in 1..=MAX_ITERATIONS {
        let m = f64::from(m);
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 / clamp_tiny(aa.mul_add(d, 1.0));
        c = clamp_tiny(1.0 + aa / c);
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 / clamp_tiny(aa.mul_add(d, 1.0));
        c = clamp_tiny(1.0 + aa / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < EPSILON {
            break;
        }
    }
    h
}
