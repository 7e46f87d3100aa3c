//! User data to high level encoding conversion.
//!
//! Text is packed with the symbology's Text compaction sub-modes (Upper,
//! Lower, Mixed, Punctuation) at two characters per codeword, long digit
//! runs switch to Numeric compaction (base-900 groups of up to 44 digits)
//! and arbitrary bytes to Byte compaction (6 bytes into 5 codewords).

/// Codeword used to latch to text mode.
pub const M_LATCH_TEXT: u16 = 900;
/// Codeword used to latch to byte mode (for lengths not a multiple of 6).
pub const M_LATCH_BYTE: u16 = 901;
/// Codeword used to latch to numeric mode.
pub const M_LATCH_NUMERIC: u16 = 902;
/// Codeword used to shift to byte mode for a single codeword.
pub const M_SHIFT_BYTE: u16 = 913;
/// Codeword used to latch to byte mode when the length is a multiple of 6.
pub const M_LATCH_BYTE_M6: u16 = 924;
/// Codeword used to specify an ECI code page.
pub const ECI_CODE_PAGE: u16 = 927;

/// Codeword used as padding at the end of the data section.
pub const CW_PADDING: u16 = M_LATCH_TEXT;

const MIXED_CHAR_SET: [u8; 15] = [
    b'&', b'\r', b'\t', b',', b':', b'#', b'-', b'.', b'$', b'/', b'+', b'%', b'*', b'=', b'^',
];
const PUNC_CHAR_SET: [u8; 29] = [
    b';', b'<', b'>', b'@', b'[', b'\\', b']', b'_', b'`', b'~', b'!', b'\r', b'\t', b',', b':',
    b'\n', b'-', b'.', b'$', b'/', b'"', b'|', b'*', b'(', b')', b'?', b'{', b'}', b'\'',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Upper,
    Lower,
    Mixed,
    Punct,
    Numeric,
    Byte,
}

impl Mode {
    fn is_text(self) -> bool {
        !matches!(self, Mode::Numeric | Mode::Byte)
    }
}

/// Accumulates data segments into a data codeword sequence. The first slot
/// is reserved for the length indicator, written by [`Compactor::finish`].
#[derive(Debug)]
pub struct Compactor {
    out: Vec<u16>,
    /// Pending upper half of a text codeword.
    half: Option<u16>,
    mode: Mode,
}

impl Compactor {
    pub fn new() -> Self {
        Compactor { out: vec![0], half: None, mode: Mode::Upper }
    }

    /// Pushes one base-30 text value, pairing it with a pending one.
    fn push_half(&mut self, value: u16) {
        match self.half.take() {
            Some(high) => self.out.push(high * 30 + value),
            None => self.half = Some(value),
        }
    }

    /// Completes a pending half codeword with the padding value 29.
    fn flush(&mut self) {
        if let Some(high) = self.half.take() {
            self.out.push(high * 30 + 29);
        }
    }

    fn push_full(&mut self, codeword: u16) {
        self.flush();
        self.out.push(codeword);
    }

    /// Appends an ASCII text segment using table based encoding. Characters
    /// outside the text tables are escaped with a byte shift.
    pub fn append_ascii(&mut self, s: &str) {
        debug_assert!(s.is_ascii(), "use append_utf8 for UTF-8 strings");
        let s = s.as_bytes();

        if !self.mode.is_text() {
            self.out.push(M_LATCH_TEXT);
            self.mode = Mode::Upper;
        }

        let mut k = 0;
        while k < s.len() {
            let c = s[k];
            match c {
                c if c.is_ascii_uppercase() => {
                    match self.mode {
                        Mode::Upper => (),
                        Mode::Lower => {
                            if k + 1 < s.len() && s[k + 1].is_ascii_lowercase() {
                                self.push_half(27); // single shift
                            } else {
                                self.push_half(29);
                                self.push_half(29);
                                self.mode = Mode::Upper;
                            }
                        }
                        Mode::Mixed => {
                            self.push_half(28);
                            self.mode = Mode::Upper;
                        }
                        Mode::Punct => {
                            self.push_half(29);
                            self.mode = Mode::Upper;
                        }
                        _ => unreachable!(),
                    }
                    self.push_half((c - b'A') as u16);
                    k += 1;
                }
                c if c.is_ascii_lowercase() => {
                    match self.mode {
                        Mode::Upper | Mode::Mixed => {
                            self.push_half(27);
                            self.mode = Mode::Lower;
                        }
                        Mode::Lower => (),
                        Mode::Punct => {
                            self.push_half(29);
                            self.push_half(27);
                            self.mode = Mode::Lower;
                        }
                        _ => unreachable!(),
                    }
                    self.push_half((c - b'a') as u16);
                    k += 1;
                }
                c if c.is_ascii_digit() => {
                    let mut end = k + 1;
                    while end < s.len() && end - k < 44 && s[end].is_ascii_digit() {
                        end += 1;
                    }

                    if end - k <= 13 && self.mode != Mode::Numeric {
                        match self.mode {
                            Mode::Upper | Mode::Lower => {
                                self.push_half(28);
                                self.mode = Mode::Mixed;
                            }
                            Mode::Mixed => (),
                            Mode::Punct => {
                                self.push_half(29);
                                self.push_half(28);
                                self.mode = Mode::Mixed;
                            }
                            _ => unreachable!(),
                        }
                        while k < end {
                            self.push_half((s[k] - b'0') as u16);
                            k += 1;
                        }
                    } else {
                        if self.mode != Mode::Numeric {
                            self.push_full(M_LATCH_NUMERIC);
                            self.mode = Mode::Numeric;
                        }
                        self.append_digit_group(&s[k..end]);
                        k = end;
                    }

                    if self.mode == Mode::Numeric && k < s.len() && !s[k].is_ascii_digit() {
                        self.push_full(M_LATCH_TEXT);
                        self.mode = Mode::Upper;
                    }
                }
                b' ' => {
                    if self.mode == Mode::Punct {
                        self.push_half(29);
                        self.mode = Mode::Upper;
                    }
                    self.push_half(26);
                    k += 1;
                }
                c => {
                    if let Some(p) = MIXED_CHAR_SET.iter().position(|&r| r == c) {
                        match self.mode {
                            Mode::Upper | Mode::Lower => {
                                self.push_half(28);
                                self.mode = Mode::Mixed;
                            }
                            Mode::Mixed => (),
                            // no switch if the char is also present in the punc table
                            Mode::Punct if (1..=4).contains(&p) || (6..=9).contains(&p) => (),
                            Mode::Punct => {
                                self.push_half(29);
                                self.push_half(28);
                                self.mode = Mode::Mixed;
                            }
                            _ => unreachable!(),
                        }
                        self.push_half((p + 10) as u16);
                    } else if let Some(p) = PUNC_CHAR_SET.iter().position(|&r| r == c) {
                        if self.mode != Mode::Punct {
                            let mut end = k + 1;
                            while end < s.len() && end - k < 3 && PUNC_CHAR_SET.contains(&s[end]) {
                                end += 1;
                            }
                            if end - k >= 3 {
                                // latch, a run of punctuation follows
                                if self.mode != Mode::Mixed {
                                    self.push_half(28);
                                }
                                self.push_half(25);
                                self.mode = Mode::Punct;
                            } else {
                                self.push_half(29); // shift
                            }
                        }
                        self.push_half(p as u16);
                    } else {
                        self.flush();
                        self.out.push(M_SHIFT_BYTE);
                        self.out.push(c as u16);
                    }
                    k += 1;
                }
            }
        }

        self.flush();
    }

    /// Appends a bytes segment. An empty slice is a no-op: a latch or shift
    /// must be followed by at least one byte.
    pub fn append_bytes(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        self.flush();
        let mut k = 0;

        if bytes.len() > 1 {
            self.out.push(if bytes.len() % 6 == 0 { M_LATCH_BYTE_M6 } else { M_LATCH_BYTE });
            self.mode = Mode::Byte;

            while bytes.len() - k >= 6 {
                // pack six bytes into five codewords
                let mut acc: u64 = 0;
                for n in 0..6 {
                    acc = (acc << 8) + bytes[k + n] as u64;
                }
                let base = self.out.len();
                self.out.resize(base + 5, 0);
                for n in (0..5).rev() {
                    self.out[base + n] = (acc % 900) as u16;
                    acc /= 900;
                }
                k += 6;
            }
        } else if self.mode.is_text() {
            self.out.push(M_SHIFT_BYTE);
        } else {
            self.out.push(M_LATCH_BYTE);
            self.mode = Mode::Byte;
        }

        self.out.extend(bytes[k..].iter().map(|&b| b as u16));
    }

    /// Appends an UTF-8 string as an ECI code page switch (\000026) followed
    /// by a bytes segment.
    pub fn append_utf8(&mut self, s: &str) {
        self.flush();
        self.out.push(ECI_CODE_PAGE);
        self.out.push(26);
        self.append_bytes(s.as_bytes());
    }

    /// Converts a run of up to 44 digits to base 900 with the leading-1
    /// convention that preserves leading zeros.
    fn append_digit_group(&mut self, digits: &[u8]) {
        debug_assert!(!digits.is_empty() && digits.len() <= 44);

        // Horner evaluation of the decimal number "1" + digits directly in
        // base-900 limbs; prepending the 1 stands in for adding 10^n.
        let mut limbs: Vec<u16> = vec![1];
        for &d in digits {
            let mut carry = (d - b'0') as u32;
            for limb in limbs.iter_mut().rev() {
                let v = *limb as u32 * 10 + carry;
                *limb = (v % 900) as u16;
                carry = v / 900;
            }
            if carry > 0 {
                limbs.insert(0, carry as u16);
            }
        }

        self.out.extend_from_slice(&limbs);
    }

    /// Number of codewords accumulated so far, length indicator included.
    pub fn count(&self) -> usize {
        debug_assert!(self.half.is_none());
        self.out.len()
    }

    /// Seals the segments into data codewords: the first slot becomes the
    /// length indicator covering every data codeword.
    pub fn finish(mut self) -> Vec<u16> {
        self.flush();
        self.out[0] = self.out.len() as u16;
        self.out
    }
}
