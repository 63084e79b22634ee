// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;
const FNV_OFFSET: u64 = 0xCBF2_9CE4_8422_2325;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// 64-bit FNV-1a hash of a fully qualified name.
///
/// Stable across runs and platforms, so generated tables can key on it.
#[must_use]
pub fn compute_type_id(qualified_name: &str) -> u64 {
    fnv1a(qualified_name.as_bytes())
}

/// Digest of a canonical manifest text, rendered as 16 hex digits.
#[must_use]
pub fn manifest_digest(canonical: &str) -> String {
    format!("{:016x}", fnv1a(canonical.as_bytes()))
}
