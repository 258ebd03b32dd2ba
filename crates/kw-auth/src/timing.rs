/// Equality check for secret values that visits every byte of `actual`
/// regardless of where the first mismatch occurs.
///
/// `provided` is padded with trailing spaces to `actual`'s length, every
/// index of `actual` is compared with the mismatches folded into an
/// accumulator, and the original lengths must match separately. The
/// length check itself is not constant-time, so unequal-length inputs
/// still finish on a different profile than equal-length mismatches; that
/// residual leak is part of the upstream contract and is kept rather than
/// hardened here. Hash comparison does not go through this function: the
/// hashing library's own constant-time comparison covers it.
pub fn timing_safe_eql(provided: &str, actual: &str) -> bool {
    let padded = format!("{provided:<width$}", width = actual.len());
    let padded = padded.as_bytes();
    let mut diff = 0u8;
    for (i, byte) in actual.bytes().enumerate() {
        diff |= padded[i] ^ byte;
    }
    (diff == 0) & (provided.len() == actual.len())
}
