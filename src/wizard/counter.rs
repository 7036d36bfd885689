// SPDX-License-Identifier: MIT

/// One-based position within a wizard
///
/// The counter never drops below 1 and has no upper bound; the wizard that
/// owns it decides when the flow is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCounter {
    current: usize,
}

impl Default for StepCounter {
    fn default() -> Self {
        Self { current: 1 }
    }
}

impl StepCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn set(&mut self, step: usize) {
        self.current = step.max(1);
    }

    /// Set from an arbitrary number, flooring and clamping to 1
    pub fn set_f64(&mut self, step: f64) {
        self.current = if step.is_finite() && step >= 1.0 {
            step.floor() as usize
        } else {
            1
        };
    }

    pub fn advance(&mut self) -> usize {
        self.current = self.current.saturating_add(1).max(1);
        self.current
    }

    pub fn retreat(&mut self) -> usize {
        self.current = self.current.saturating_sub(1).max(1);
        self.current
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retreat_stops_at_one() {
        let mut counter = StepCounter::new();
        assert_eq!(counter.retreat(), 1);
        counter.advance();
        counter.advance();
        assert_eq!(counter.current(), 3);
        counter.retreat();
        counter.retreat();
        counter.retreat();
        assert_eq!(counter.current(), 1);
    }

    #[test]
    fn test_set_clamps() {
        let mut counter = StepCounter::new();
        counter.set(0);
        assert_eq!(counter.current(), 1);
        counter.set(7);
        assert_eq!(counter.current(), 7);
        counter.reset();
        assert_eq!(counter.current(), 1);
    }

    #[test]
    fn test_set_f64_floors() {
        let mut counter = StepCounter::new();
        counter.set_f64(4.9);
        assert_eq!(counter.current(), 4);
        counter.set_f64(-3.0);
        assert_eq!(counter.current(), 1);
        counter.set_f64(f64::NAN);
        assert_eq!(counter.current(), 1);
    }
}
