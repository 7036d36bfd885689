// SPDX-License-Identifier: MIT

/// Ordered parent → child selection chain, e.g. country → region → city.
/// Changing a link resets every link after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cascade {
    chain: &'static [&'static str],
}

impl Cascade {
    pub const fn new(chain: &'static [&'static str]) -> Self {
        Self { chain }
    }

    /// Fields downstream of `field`; empty when `field` is not in the chain
    pub fn dependents_of(&self, field: &str) -> &'static [&'static str] {
        match self.chain.iter().position(|f| *f == field) {
            Some(i) => &self.chain[i + 1..],
            None => &[],
        }
    }
}
