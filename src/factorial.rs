//! Factorials in floating point, sized for scoreline grids.

/// The largest `n` for which `n!` is finite in `f64`.
pub const MAX_FINITE: u8 = 170;

pub trait Factorial {
    fn get(&self, n: u8) -> f64;
}

/// Computes each factorial on demand.
#[derive(Default)]
pub struct Calculator;

impl Factorial for Calculator {
    #[inline]
    fn get(&self, n: u8) -> f64 {
        if n > MAX_FINITE {
            return f64::INFINITY;
        }
        (2..=n).fold(1.0, |product, i| product * i as f64)
    }
}

/// Tabulates factorials for `0..=max`. Lookups beyond `max` fall back to [Calculator].
#[derive(Debug, Clone)]
pub struct Lookup {
    entries: Vec<f64>,
}
impl Lookup {
    pub fn up_to(max: u8) -> Self {
        let max = u8::min(max, MAX_FINITE) as usize;
        let mut entries = Vec::with_capacity(max + 1);
        entries.push(1.0);
        for i in 1..=max {
            entries.push(i as f64 * entries[i - 1]);
        }
        Self { entries }
    }

    pub fn max(&self) -> u8 {
        (self.entries.len() - 1) as u8
    }
}

impl Factorial for Lookup {
    #[inline]
    fn get(&self, n: u8) -> f64 {
        match self.entries.get(n as usize) {
            Some(&entry) => entry,
            None => Calculator.get(n),
        }
    }
}

impl Default for Lookup {
    fn default() -> Self {
        Self::up_to(MAX_FINITE)
    }
}
