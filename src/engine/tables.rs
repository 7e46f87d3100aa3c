//! Bar/space pattern tables for the three PDF417 codeword clusters.
//!
//! Every PDF417 symbol character spans 17 modules split into 4 bars and
//! 4 spaces, each 1 to 6 modules wide, always starting with a bar. A
//! codeword therefore fits in a `u16` with the leading (always set) bit
//! implied; [`pattern`] restores it.

use std::sync::LazyLock;

/// Number of codeword values per cluster.
pub const CODEWORDS: usize = 929;

/// Row start pattern, 17 modules.
pub const START_PAT: u32 = 0b11111111010101000;
pub const START_PAT_LEN: u32 = 17;
/// Row stop pattern, 18 modules.
pub const STOP_PAT: u32 = 0b111111101000101001;
pub const STOP_PAT_LEN: u32 = 18;

/// Full 17-bit pattern for `value` in cluster `cluster` (0, 1 or 2 for the
/// symbology's clusters 0, 3 and 6).
#[inline]
pub fn pattern(cluster: usize, value: u16) -> u32 {
    (1 << 16) | HL_TO_LL[cluster][value as usize] as u32
}

/// High-level value to low-level pattern tables, one per cluster.
pub static HL_TO_LL: LazyLock<Box<[[u16; CODEWORDS]; 3]>> = LazyLock::new(build_clusters);

/// Enumerates the 4-bar/4-space width sequences of 17 modules in
/// lexicographic order and buckets them by cluster number
/// `(E1 - E2 + E5 - E6) mod 9`, keeping the first 929 of each of the
/// clusters 0, 3 and 6.
fn build_clusters() -> Box<[[u16; CODEWORDS]; 3]> {
    let mut tables = Box::new([[0u16; CODEWORDS]; 3]);
    let mut filled = [0usize; 3];

    // widths b1 s1 b2 s2 b3 s3 b4; s4 is forced by the 17-module total
    let mut w = [1u32; 8];
    'outer: loop {
        let used: u32 = w[..7].iter().sum();
        if (11..=16).contains(&used) {
            w[7] = 17 - used;

            let e = [w[0] + w[1], w[1] + w[2], w[4] + w[5], w[5] + w[6]];
            let cluster = (e[0] as i32 - e[1] as i32 + e[2] as i32 - e[3] as i32).rem_euclid(9);
            let slot = match cluster {
                0 => Some(0),
                3 => Some(1),
                6 => Some(2),
                _ => None,
            };

            if let Some(slot) = slot {
                if filled[slot] < CODEWORDS {
                    let mut bits: u32 = 0;
                    for (i, &width) in w.iter().enumerate() {
                        bits <<= width;
                        if i % 2 == 0 {
                            bits |= (1 << width) - 1;
                        }
                    }
                    tables[slot][filled[slot]] = (bits & 0xFFFF) as u16;
                    filled[slot] += 1;
                }
            }
        }

        // advance the width odometer, least significant slot last
        let mut i = 7;
        loop {
            if i == 0 {
                break 'outer;
            }
            i -= 1;
            if w[i] < 6 {
                w[i] += 1;
                break;
            }
            w[i] = 1;
        }
    }

    debug_assert_eq!(filled, [CODEWORDS; 3]);
    tables
}
