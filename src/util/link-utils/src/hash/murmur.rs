//! MurmurHash3, x86 32-bit variant.
//!
//! This is the string hash used to derive instantiation suffixes. It must stay bit-for-bit stable
//! since its output ends up in emitted identifiers.

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

pub fn murmur3_32(key: &[u8], seed: u32) -> u32 {
    let mut h1 = seed;

    let mut blocks = key.chunks_exact(4);
    for block in &mut blocks {
        let k1 = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);

        h1 ^= scramble(k1);
        h1 = h1.rotate_left(13);
        h1 = h1.wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        let mut k1 = 0u32;
        for (i, &byte) in tail.iter().enumerate() {
            k1 ^= u32::from(byte) << (8 * i);
        }
        h1 ^= scramble(k1);
    }

    // The reference implementation mixes in the length modulo 2^32.
    h1 ^= key.len() as u32;
    fmix32(h1)
}

/// Hashes the UTF-8 encoding of `text` with a zero seed. For ASCII text this matches hashing the
/// string's UTF-16 code units truncated to their low byte. Other text hashes differently.
pub fn murmur3_str(text: &str) -> u32 {
    murmur3_32(text.as_bytes(), 0)
}

fn scramble(k1: u32) -> u32 {
    k1.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2)
}

fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}
