//! # Linear scales
//!
//! An affine map from a data domain onto a pixel range, with the usual
//! charting helpers:
//! - `nice`: widen the domain outward to round tick-aligned bounds
//! - `ticks`: evenly spaced round values inside the domain
//! - `tick_labels`: labels with just enough decimals for the tick step
//!
//! Tick steps are always 1, 2 or 5 times a power of ten. Fractional steps are
//! carried as their (negative) reciprocal, `-10.0` meaning a step of `0.1`, so
//! tick values come out as `i / 10.0` rather than accumulating `i * 0.1` error.

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

const NICE_ITERATIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

// (first tick index, last tick index, signed increment)
fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let inv = 10f64.powf(-power) / factor;
        i1 = (start * inv).round();
        i2 = (stop * inv).round();
        if i1 / inv < start {
            i1 += 1.0;
        }
        if i2 / inv > stop {
            i2 -= 1.0;
        }
        inc = -inv;
    } else {
        let step = 10f64.powf(power) * factor;
        i1 = (start / step).round();
        i2 = (stop / step).round();
        if i1 * step < start {
            i1 += 1.0;
        }
        if i2 * step > stop {
            i2 -= 1.0;
        }
        inc = step;
    }

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Signed tick increment for `[start, stop]`: positive is the step itself,
/// negative is the reciprocal of a fractional step, zero or NaN when the
/// interval is degenerate.
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    tick_spec(start, stop, count as f64).2
}

/// Round tick values covering `[start, stop]`, in ascending order.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }
    let (lo, hi) = if start < stop { (start, stop) } else { (stop, start) };
    let (i1, i2, inc) = tick_spec(lo, hi, count as f64);
    if i1.is_nan() || i2.is_nan() || i2 < i1 {
        return Vec::new();
    }

    let n = (i2 - i1) as usize + 1;
    (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 {
                k / -inc
            } else {
                k * inc
            }
        })
        .collect()
}

/// Min and max of `values`, `None` when there are no finite values.
pub fn extent<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

// decimal exponent of |x|, as in 0.05 -> -2, 250 -> 2
fn exponent(x: f64) -> i32 {
    if x == 0.0 || !x.is_finite() {
        0
    } else {
        x.abs().log10().floor() as i32
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Fixed-point label with comma thousands separators and a typographic minus.
pub fn format_fixed(value: f64, precision: usize) -> String {
    let text = format!("{:.*}", precision, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::new();
    // -0.00 prints as 0.00
    if value < 0.0 && text.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('\u{2212}');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        LinearScale { domain, range }
    }

    /// Scale over the extent of `values`, or over `[0, 1]` when there is none.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I, range: (f64, f64)) -> Self {
        let domain = extent(values).unwrap_or((0.0, 1.0));
        LinearScale::new(domain, range)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Widen the domain to multiples of the tick step for about `count` ticks.
    /// A nice domain comes back unchanged, and so does a degenerate one.
    pub fn nice(mut self, count: usize) -> Self {
        let (d0, d1) = self.domain;
        let reversed = d1 < d0;
        let (mut start, mut stop) = if reversed { (d1, d0) } else { (d0, d1) };
        if start == stop || !start.is_finite() || !stop.is_finite() {
            return self;
        }
        let mut prestep: Option<f64> = None;

        // the domain only changes once the step has settled
        for _ in 0..NICE_ITERATIONS {
            let step = tick_increment(start, stop, count);
            if prestep == Some(step) {
                self.domain = if reversed { (stop, start) } else { (start, stop) };
                return self;
            } else if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            prestep = Some(step);
        }

        self
    }

    /// Pixel position of `value`. A zero-width domain maps to the middle of the range.
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.5 } else { (value - d0) / span };
        r0 + t * (r1 - r0)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }

    /// Labels for [`LinearScale::ticks`] with the same `count`.
    pub fn tick_labels(&self, count: usize) -> Vec<String> {
        let (d0, d1) = self.domain;
        let (lo, hi) = if d0 < d1 { (d0, d1) } else { (d1, d0) };
        let precision = if lo == hi {
            // the single tick is the value itself, printed with its own decimals
            format!("{}", lo.abs())
                .split_once('.')
                .map_or(0, |(_, frac)| frac.len())
        } else {
            let inc = tick_increment(lo, hi, count);
            let step = if inc < 0.0 { -1.0 / inc } else { inc };
            (-exponent(step)).max(0) as usize
        };

        self.ticks(count)
            .into_iter()
            .map(|t| format_fixed(t, precision))
            .collect()
    }
}
