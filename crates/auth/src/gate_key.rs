//! Shared gate-reader credential.
//!
//! Gate readers are devices, not users: they authenticate with a shared key
//! configured on both sides, carried on every gate read.

/// Shared secret expected from gate readers.
#[derive(Clone)]
pub struct GateKey(String);

impl GateKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Compare a presented key without short-circuiting on the first
    /// mismatching byte.
    pub fn verify(&self, presented: &str) -> bool {
        let expected = self.0.as_bytes();
        let presented = presented.as_bytes();
        if expected.len() != presented.len() {
            return false;
        }
        let mut diff = 0u8;
        for (a, b) in expected.iter().zip(presented.iter()) {
            diff |= a ^ b;
        }
        diff == 0
    }
}

impl core::fmt::Debug for GateKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("GateKey(..)")
    }
}
