//! Numeric kernels shared by the statistical calculations

/// Running moments of a sequence of samples (Welford).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moments {
    pub count: usize,
    pub sum: f64,
    pub product: f64,
    pub min: f64,
    pub max: f64,
    pub non_zero: usize,
    mean: f64,
    m2: f64,
    saw_nan: bool,
}

impl Moments {
    /// Accumulate `values`; NaN samples are skipped when `ignore_nan` is
    /// set and poison every statistic otherwise.
    pub fn collect<I>(values: I, ignore_nan: bool) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut m = Moments {
            product: 1.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            ..Default::default()
        };
        for x in values {
            if x.is_nan() {
                if ignore_nan {
                    continue;
                }
                m.saw_nan = true;
            }
            m.count += 1;
            m.sum += x;
            m.product *= x;
            m.min = m.min.min(x);
            m.max = m.max.max(x);
            if x != 0.0 {
                m.non_zero += 1;
            }
            let delta = x - m.mean;
            m.mean += delta / m.count as f64;
            m.m2 += delta * (x - m.mean);
        }
        m
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 || self.saw_nan {
            f64::NAN
        } else {
            self.mean
        }
    }

    /// Smallest sample, NaN when empty or poisoned.
    pub fn minimum(&self) -> f64 {
        if self.count == 0 || self.saw_nan {
            f64::NAN
        } else {
            self.min
        }
    }

    pub fn maximum(&self) -> f64 {
        if self.count == 0 || self.saw_nan {
            f64::NAN
        } else {
            self.max
        }
    }

    /// Population variance, or sample variance with `bessel`.
    pub fn variance(&self, bessel: bool) -> f64 {
        let denominator = if bessel { self.count.saturating_sub(1) } else { self.count };
        if denominator == 0 || self.saw_nan {
            f64::NAN
        } else {
            self.m2 / denominator as f64
        }
    }

    pub fn std(&self, bessel: bool) -> f64 {
        self.variance(bessel).sqrt()
    }
}

/// Natural log of the gamma function (Lanczos, g = 7).
pub fn ln_gamma(x: f64) -> f64 {
    const COEFFICIENTS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];
    if x < 0.5 {
        // Reflection formula
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let mut a = COEFFICIENTS[0];
    let t = x + 7.5;
    for (i, c) in COEFFICIENTS.iter().enumerate().skip(1) {
        a += c / (x + i as f64);
    }
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + a.ln()
}

/// Regularized incomplete beta function `I_x(a, b)`.
pub fn incomplete_beta(x: f64, a: f64, b: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(x, a, b) / a
    } else {
        1.0 - front * beta_continued_fraction(1.0 - x, b, a) / b
    }
}

// Lentz's method for the continued fraction of I_x(a, b).
fn beta_continued_fraction(x: f64, a: f64, b: f64) -> f64 {
    const MAX_ITERATIONS: usize = 300;
    const EPSILON: f64 = 1e-15;
    const TINY: f64 = 1e-300;

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < TINY {
        d = TINY;
    }
    d = 1.0 / d;
    let mut h = d;
    for m in 1..=MAX_ITERATIONS {
        let m = m as f64;
        let m2 = 2.0 * m;
        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        h *= d * c;
        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < EPSILON {
            break;
        }
    }
    h
}

/// Two-sided p-value of Student's t with `df` degrees of freedom.
pub fn student_t_two_sided(t: f64, df: f64) -> f64 {
    if t.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    if t.is_infinite() {
        return 0.0;
    }
    incomplete_beta(df / (df + t * t), df / 2.0, 0.5)
}
