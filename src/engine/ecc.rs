//! Reed-Solomon error correction over GF(929).
//!
//! Level `l` appends `2^(l+1)` correction codewords. The coefficient tables
//! are expanded at compile time from the generator polynomial
//! `g(x) = (x - 3)(x - 3^2) ... (x - 3^n) mod 929`.

const MOD: u32 = 929;

/// Number of error correction codewords for the given level.
pub const fn ecc_count(level: u8) -> usize {
    assert!(level < 9, "ECC level must be between 0 and 8 inclusive");
    1 << (level as usize + 1)
}

/// Ascending coefficients `a0..a(N-1)` of the monic generator polynomial of
/// degree `N`, leading term dropped.
const fn factors<const N: usize>() -> [u16; N] {
    let mut poly = [0u32; 513];
    poly[0] = 1;
    let mut len = 1;
    let mut root: u32 = 1;

    let mut n = 0;
    while n < N {
        root = root * 3 % MOD;
        // poly *= (x - root), in place from the high coefficient down
        let mut j = len;
        while j > 0 {
            poly[j] = (poly[j - 1] + (MOD - root) * poly[j] % MOD) % MOD;
            j -= 1;
        }
        poly[0] = (MOD - root) * poly[0] % MOD;
        len += 1;
        n += 1;
    }

    let mut out = [0u16; N];
    let mut j = 0;
    while j < N {
        out[j] = poly[j] as u16;
        j += 1;
    }
    out
}

const ECC_L0: [u16; 2] = factors::<2>();
const ECC_L1: [u16; 4] = factors::<4>();
const ECC_L2: [u16; 8] = factors::<8>();
const ECC_L3: [u16; 16] = factors::<16>();
const ECC_L4: [u16; 32] = factors::<32>();
const ECC_L5: [u16; 64] = factors::<64>();
const ECC_L6: [u16; 128] = factors::<128>();
const ECC_L7: [u16; 256] = factors::<256>();
const ECC_L8: [u16; 512] = factors::<512>();

/// Computes the error correction codewords over the leading data section of
/// `codewords` and stores them in its trailing `ecc_count(level)` slots.
pub fn generate_ecc(codewords: &mut [u16], level: u8) {
    let factors: &[u16] = match level {
        0 => &ECC_L0,
        1 => &ECC_L1,
        2 => &ECC_L2,
        3 => &ECC_L3,
        4 => &ECC_L4,
        5 => &ECC_L5,
        6 => &ECC_L6,
        7 => &ECC_L7,
        8 => &ECC_L8,
        _ => unreachable!("ECC level must be between 0 and 8 inclusive"),
    };

    assert!(codewords.len() > factors.len());
    let (data, ecc) = codewords.split_at_mut(codewords.len() - factors.len());
    ecc.fill(0);

    for cw in data {
        let t = (*cw + ecc[0]) % MOD as u16;

        for i in (0..factors.len()).rev() {
            let factor = (t as u32 * factors[i] as u32 % MOD) as u16;
            let d = if i > 0 { ecc[factors.len() - i] } else { 0 };
            ecc[factors.len() - 1 - i] = (d + MOD as u16 - factor) % MOD as u16;
        }
    }

    for e in ecc {
        if *e != 0 {
            *e = MOD as u16 - *e;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{factors, generate_ecc};

    const INPUT_DATA: [u16; 16] = [
        16, 902, 1, 278, 827, 900, 295, 902, 2, 326, 823, 544, 900, 149, 900, 900,
    ];

    fn check(level: u8, expected: &[u16]) {
        let mut data = vec![0u16; INPUT_DATA.len() + expected.len()];
        data[..INPUT_DATA.len()].copy_from_slice(&INPUT_DATA);
        generate_ecc(&mut data, level);
        assert_eq!(&data[INPUT_DATA.len()..], expected);
    }

    #[test]
    fn test_factors_l0() {
        // published coefficients for the degree-2 generator polynomial
        assert_eq!(factors::<2>(), [27, 917]);
    }

    #[test]
    fn test_ecc_l0() {
        check(0, &[156, 765]);
    }

    #[test]
    fn test_ecc_l1() {
        check(1, &[168, 875, 63, 355]);
    }

    #[test]
    fn test_ecc_l2() {
        check(2, &[628, 715, 393, 299, 863, 601, 169, 708]);
    }

    #[test]
    fn test_ecc_l3() {
        check(
            3,
            &[232, 176, 793, 616, 476, 406, 855, 445, 84, 518, 522, 721, 607, 2, 42, 578],
        );
    }

    #[test]
    fn test_ecc_l4() {
        check(
            4,
            &[
                281, 156, 276, 668, 44, 252, 877, 30, 549, 856, 773, 639, 420, 330, 693, 329,
                283, 723, 480, 482, 102, 925, 535, 892, 374, 472, 837, 331, 343, 608, 390, 364,
            ],
        );
    }
}
