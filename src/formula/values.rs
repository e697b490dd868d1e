//! Accumulators that remember whether they were ever incremented.
//!
//! "Set to zero" and "never set" are different outcomes for a formula:
//! the first emits 0, the second emits nothing.

/// Numeric types a [`CounterValue`] can accumulate.
///
/// Integers are summed in a wider `Total` and only clamped back to `Self`
/// when read, so the result does not depend on the order of additions.
pub trait Accumulable: Copy + Default + PartialEq + std::fmt::Debug + 'static {
    type Total: Copy + Default + PartialEq + std::fmt::Debug;

    fn widen(self) -> Self::Total;
    fn accumulate(total: Self::Total, other: Self::Total) -> Self::Total;
    fn narrow(total: Self::Total) -> Self;
}

impl Accumulable for i32 {
    type Total = i64;

    fn widen(self) -> i64 {
        i64::from(self)
    }

    fn accumulate(total: i64, other: i64) -> i64 {
        total.saturating_add(other)
    }

    fn narrow(total: i64) -> i32 {
        i32::try_from(total).unwrap_or(if total < 0 { i32::MIN } else { i32::MAX })
    }
}

impl Accumulable for i64 {
    type Total = i128;

    fn widen(self) -> i128 {
        i128::from(self)
    }

    fn accumulate(total: i128, other: i128) -> i128 {
        total.saturating_add(other)
    }

    fn narrow(total: i128) -> i64 {
        i64::try_from(total).unwrap_or(if total < 0 { i64::MIN } else { i64::MAX })
    }
}

impl Accumulable for f64 {
    type Total = f64;

    fn widen(self) -> f64 {
        self
    }

    fn accumulate(total: f64, other: f64) -> f64 {
        total + other
    }

    fn narrow(total: f64) -> f64 {
        total
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CounterValue<T: Accumulable> {
    total: T::Total,
    set: bool,
}

pub type IntValue = CounterValue<i32>;
pub type LongValue = CounterValue<i64>;
pub type DoubleValue = CounterValue<f64>;

impl<T: Accumulable> CounterValue<T> {
    pub fn increment(&mut self, value: T) -> &mut Self {
        self.add_total(value.widen())
    }

    fn add_total(&mut self, total: T::Total) -> &mut Self {
        self.total = T::accumulate(self.total, total);
        self.set = true;
        self
    }

    /// Add `other` only if it was set; an unset value leaves this one untouched.
    pub fn increment_value(&mut self, other: &CounterValue<T>) -> &mut Self {
        if other.set {
            self.add_total(other.total);
        }
        self
    }

    pub fn is_set(&self) -> bool {
        self.set
    }

    pub fn value(&self) -> T {
        T::narrow(self.total)
    }

    pub fn get(&self) -> Option<T> {
        self.set.then(|| self.value())
    }
}
