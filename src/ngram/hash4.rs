//! `hash4`: XOR-folded pair of overlapping 3-grams over a 4-byte window.

use super::gram3::pack3;
use super::Token;

/// Emit one token per 4-byte window, `max(0, n-3)` tokens total. Each token
/// is `gram3(b0,b1,b2) XOR gram3(b1,b2,b3)`.
pub fn generate<F: FnMut(Token)>(bytes: &[u8], mut sink: F) {
    if bytes.len() < 4 {
        return;
    }
    for w in bytes.windows(4) {
        let lo = pack3(w[0], w[1], w[2]);
        let hi = pack3(w[1], w[2], w[3]);
        sink(lo ^ hi);
    }
}

#[cfg(test)]
#[path = "hash4_test.rs"]
mod hash4_test;
