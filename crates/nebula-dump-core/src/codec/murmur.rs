//! 64-bit MurmurHash2 (the `MurmurHash64A` variant) as used by NebulaGraph to
//! route string vertex ids to partitions.
//!
//! Must stay bit-exact with the server: a different hash sends lookups to the
//! wrong partition.

/// Seed the graph servers use for vid hashing.
pub const MURMUR_SEED: u64 = 0xc70f_6907;

const M: u64 = 0xc6a4_a793_5bd1_e995;
const R: u32 = 47;

/// Hash `data` with [`MURMUR_SEED`].
pub fn murmur_hash64(data: &[u8]) -> u64 {
    murmur_hash64_with_seed(data, MURMUR_SEED)
}

/// `MurmurHash64A` over `data` with an explicit seed.
///
/// 8-byte blocks are read little-endian, matching the reference
/// implementation on x86-64 and aarch64.
pub fn murmur_hash64_with_seed(data: &[u8], seed: u64) -> u64 {
    let len = data.len();
    let mut h: u64 = seed ^ (len as u64).wrapping_mul(M);

    let mut blocks = data.chunks_exact(8);
    for block in &mut blocks {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(block);
        let mut k = u64::from_le_bytes(buf);
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);

        h ^= k;
        h = h.wrapping_mul(M);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        for (i, byte) in tail.iter().enumerate().rev() {
            h ^= (*byte as u64) << (8 * i);
        }
        h = h.wrapping_mul(M);
    }

    h ^= h >> R;
    h = h.wrapping_mul(M);
    h ^= h >> R;
    h
}
