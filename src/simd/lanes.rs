//! Fixed 4-lane vector types used by the SIMD kernels
//!
//! [`F32x4`] and [`I32x4`] hold four lanes in a plain array; every
//! operation is lowered to a backend chosen at compile time:
//! SSE2 on x86_64 (part of the baseline ISA, no runtime detection needed),
//! NEON on aarch64 (mandatory), and a portable per-lane loop elsewhere or
//! when the `portable-lanes` feature is enabled.
//!
//! Comparison results are returned as a [`Mask4`] bitmask rather than a
//! vector of all-ones/all-zeros lanes, so callers do their lane bookkeeping
//! on plain bits.

use std::fmt;

// ---------------------------------------------------------------------------
// Backend selection
// ---------------------------------------------------------------------------

#[cfg(all(target_arch = "x86_64", not(feature = "portable-lanes")))]
use sse as backend;

#[cfg(all(target_arch = "aarch64", not(feature = "portable-lanes")))]
use neon as backend;

#[cfg(any(
    feature = "portable-lanes",
    not(any(target_arch = "x86_64", target_arch = "aarch64"))
))]
use portable as backend;

/// Number of lanes in every vector type of this module
pub const LANES: usize = 4;

/// Backend the lane types were compiled against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneBackend {
    /// x86_64 SSE2 128-bit registers
    Sse2,
    /// aarch64 NEON 128-bit registers
    Neon,
    /// Per-lane scalar loop
    Portable,
}

impl LaneBackend {
    /// The backend used by [`F32x4`] / [`I32x4`] in this build
    pub const fn current() -> Self {
        backend::KIND
    }

    /// Whether lane operations map onto hardware vector instructions
    pub fn is_hardware(self) -> bool {
        self != LaneBackend::Portable
    }
}

impl fmt::Display for LaneBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaneBackend::Sse2 => write!(f, "SSE2"),
            LaneBackend::Neon => write!(f, "NEON"),
            LaneBackend::Portable => write!(f, "portable"),
        }
    }
}

// ---------------------------------------------------------------------------
// Mask4
// ---------------------------------------------------------------------------

/// Per-lane boolean mask, bit `i` set when lane `i` is true
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mask4(u8);

impl Mask4 {
    /// All four lanes set
    pub const ALL: Mask4 = Mask4(0b1111);
    /// No lane set
    pub const NONE: Mask4 = Mask4(0);

    /// Build a mask from the low four bits of `bits`
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Mask4(bits & 0b1111)
    }

    /// Build a mask from per-lane booleans
    pub fn from_bools(lanes: [bool; LANES]) -> Self {
        let mut bits = 0u8;
        for (i, &on) in lanes.iter().enumerate() {
            if on {
                bits |= 1 << i;
            }
        }
        Mask4(bits)
    }

    /// Raw bitmask (low four bits)
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether lane `lane` is set
    #[inline]
    pub const fn test(self, lane: usize) -> bool {
        lane < LANES && (self.0 >> lane) & 1 == 1
    }

    /// True when no lane is set
    #[inline]
    pub const fn none(self) -> bool {
        self.0 == 0
    }

    /// True when at least one lane is set
    #[inline]
    pub const fn any(self) -> bool {
        self.0 != 0
    }

    /// True when all four lanes are set
    #[inline]
    pub const fn all(self) -> bool {
        self.0 == Self::ALL.0
    }

    /// Number of set lanes
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Per-lane booleans
    pub fn to_bools(self) -> [bool; LANES] {
        [self.test(0), self.test(1), self.test(2), self.test(3)]
    }
}

impl fmt::Debug for Mask4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mask4({:04b})", self.0)
    }
}

// ---------------------------------------------------------------------------
// F32x4
// ---------------------------------------------------------------------------

/// Four single-precision lanes
#[derive(Clone, Copy, PartialEq, Default)]
#[repr(C, align(16))]
pub struct F32x4([f32; LANES]);

impl F32x4 {
    /// All lanes zero
    #[inline]
    pub const fn zero() -> Self {
        F32x4([0.0; LANES])
    }

    /// All lanes set to `v`
    #[inline]
    pub const fn splat(v: f32) -> Self {
        F32x4([v; LANES])
    }

    /// Lanes `[x, y, z, w]`
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        F32x4([x, y, z, w])
    }

    /// Lanes taken from an array
    #[inline]
    pub const fn from_array(lanes: [f32; LANES]) -> Self {
        F32x4(lanes)
    }

    /// Copy the lanes out
    #[inline]
    pub const fn to_array(self) -> [f32; LANES] {
        self.0
    }

    /// Single lane
    #[inline]
    pub fn lane(self, i: usize) -> f32 {
        self.0[i]
    }

    /// Lane-wise `self + rhs`
    #[inline]
    pub fn add(self, rhs: Self) -> Self {
        F32x4(backend::add_f32(self.0, rhs.0))
    }

    /// Lane-wise `self - rhs`
    #[inline]
    pub fn sub(self, rhs: Self) -> Self {
        F32x4(backend::sub_f32(self.0, rhs.0))
    }

    /// Lane-wise `self * rhs`
    #[inline]
    pub fn mul(self, rhs: Self) -> Self {
        F32x4(backend::mul_f32(self.0, rhs.0))
    }

    /// Lane-wise `self <= rhs`. NaN lanes compare false.
    #[inline]
    pub fn le(self, rhs: Self) -> Mask4 {
        Mask4::from_bits(backend::le_f32(self.0, rhs.0))
    }

    /// Sum of the lanes in `x + y + z + w` order, widened to `f64`
    #[inline]
    pub fn horizontal_sum(self) -> f64 {
        let [x, y, z, w] = self.0;
        f64::from(x) + f64::from(y) + f64::from(z) + f64::from(w)
    }
}

impl fmt::Debug for F32x4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z, w] = self.0;
        write!(f, "[{},{},{},{}]", x, y, z, w)
    }
}

// ---------------------------------------------------------------------------
// I32x4
// ---------------------------------------------------------------------------

/// Four 32-bit integer lanes
#[derive(Clone, Copy, PartialEq, Eq, Default)]
#[repr(C, align(16))]
pub struct I32x4([i32; LANES]);

impl I32x4 {
    /// All lanes set to `v`
    #[inline]
    pub const fn splat(v: i32) -> Self {
        I32x4([v; LANES])
    }

    /// Lanes taken from an array
    #[inline]
    pub const fn from_array(lanes: [i32; LANES]) -> Self {
        I32x4(lanes)
    }

    /// Copy the lanes out
    #[inline]
    pub const fn to_array(self) -> [i32; LANES] {
        self.0
    }

    /// Lane-wise wrapping `self + rhs`
    #[inline]
    pub fn add(self, rhs: Self) -> Self {
        I32x4(backend::add_i32(self.0, rhs.0))
    }

    /// Keep lanes selected by `mask`, zero the others
    #[inline]
    pub fn and_mask(self, mask: Mask4) -> Self {
        let mut out = self.0;
        for (i, lane) in out.iter_mut().enumerate() {
            if !mask.test(i) {
                *lane = 0;
            }
        }
        I32x4(out)
    }
}

impl fmt::Debug for I32x4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z, w] = self.0;
        write!(f, "[{},{},{},{}]", x, y, z, w)
    }
}

// ---------------------------------------------------------------------------
// Portable backend (per-lane loop)
// ---------------------------------------------------------------------------
#[cfg_attr(
    all(
        any(target_arch = "x86_64", target_arch = "aarch64"),
        not(feature = "portable-lanes")
    ),
    allow(dead_code)
)]
mod portable {
    use super::{LaneBackend, LANES};

    pub const KIND: LaneBackend = LaneBackend::Portable;

    #[inline]
    pub fn add_f32(a: [f32; LANES], b: [f32; LANES]) -> [f32; LANES] {
        [a[0] + b[0], a[1] + b[1], a[2] + b[2], a[3] + b[3]]
    }

    #[inline]
    pub fn sub_f32(a: [f32; LANES], b: [f32; LANES]) -> [f32; LANES] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2], a[3] - b[3]]
    }

    #[inline]
    pub fn mul_f32(a: [f32; LANES], b: [f32; LANES]) -> [f32; LANES] {
        [a[0] * b[0], a[1] * b[1], a[2] * b[2], a[3] * b[3]]
    }

    #[inline]
    pub fn le_f32(a: [f32; LANES], b: [f32; LANES]) -> u8 {
        let mut bits = 0u8;
        for i in 0..LANES {
            if a[i] <= b[i] {
                bits |= 1 << i;
            }
        }
        bits
    }

    #[inline]
    pub fn add_i32(a: [i32; LANES], b: [i32; LANES]) -> [i32; LANES] {
        [
            a[0].wrapping_add(b[0]),
            a[1].wrapping_add(b[1]),
            a[2].wrapping_add(b[2]),
            a[3].wrapping_add(b[3]),
        ]
    }
}

// ---------------------------------------------------------------------------
// SSE2 backend (x86_64)
// ---------------------------------------------------------------------------
#[cfg(all(target_arch = "x86_64", not(feature = "portable-lanes")))]
mod sse {
    use super::{LaneBackend, LANES};
    use std::arch::x86_64::*;

    pub const KIND: LaneBackend = LaneBackend::Sse2;

    // SAFETY (all functions below): SSE2 is part of the x86_64 baseline, and
    // every load/store is an unaligned access to a local array of exactly
    // four 32-bit lanes.

    #[inline]
    pub fn add_f32(a: [f32; LANES], b: [f32; LANES]) -> [f32; LANES] {
        let mut out = [0.0f32; LANES];
        unsafe {
            let r = _mm_add_ps(_mm_loadu_ps(a.as_ptr()), _mm_loadu_ps(b.as_ptr()));
            _mm_storeu_ps(out.as_mut_ptr(), r);
        }
        out
    }

    #[inline]
    pub fn sub_f32(a: [f32; LANES], b: [f32; LANES]) -> [f32; LANES] {
        let mut out = [0.0f32; LANES];
        unsafe {
            let r = _mm_sub_ps(_mm_loadu_ps(a.as_ptr()), _mm_loadu_ps(b.as_ptr()));
            _mm_storeu_ps(out.as_mut_ptr(), r);
        }
        out
    }

    #[inline]
    pub fn mul_f32(a: [f32; LANES], b: [f32; LANES]) -> [f32; LANES] {
        let mut out = [0.0f32; LANES];
        unsafe {
            let r = _mm_mul_ps(_mm_loadu_ps(a.as_ptr()), _mm_loadu_ps(b.as_ptr()));
            _mm_storeu_ps(out.as_mut_ptr(), r);
        }
        out
    }

    #[inline]
    pub fn le_f32(a: [f32; LANES], b: [f32; LANES]) -> u8 {
        unsafe {
            let m = _mm_cmple_ps(_mm_loadu_ps(a.as_ptr()), _mm_loadu_ps(b.as_ptr()));
            _mm_movemask_ps(m) as u8
        }
    }

    #[inline]
    pub fn add_i32(a: [i32; LANES], b: [i32; LANES]) -> [i32; LANES] {
        let mut out = [0i32; LANES];
        unsafe {
            let r = _mm_add_epi32(
                _mm_loadu_si128(a.as_ptr() as *const __m128i),
                _mm_loadu_si128(b.as_ptr() as *const __m128i),
            );
            _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, r);
        }
        out
    }
}

// ---------------------------------------------------------------------------
// NEON backend (aarch64)
// ---------------------------------------------------------------------------
#[cfg(all(target_arch = "aarch64", not(feature = "portable-lanes")))]
mod neon {
    use super::{LaneBackend, LANES};
    use std::arch::aarch64::*;

    pub const KIND: LaneBackend = LaneBackend::Neon;

    // SAFETY (all functions below): NEON is mandatory on aarch64, and every
    // load/store touches a local array of exactly four 32-bit lanes.

    #[inline]
    pub fn add_f32(a: [f32; LANES], b: [f32; LANES]) -> [f32; LANES] {
        let mut out = [0.0f32; LANES];
        unsafe {
            let r = vaddq_f32(vld1q_f32(a.as_ptr()), vld1q_f32(b.as_ptr()));
            vst1q_f32(out.as_mut_ptr(), r);
        }
        out
    }

    #[inline]
    pub fn sub_f32(a: [f32; LANES], b: [f32; LANES]) -> [f32; LANES] {
        let mut out = [0.0f32; LANES];
        unsafe {
            let r = vsubq_f32(vld1q_f32(a.as_ptr()), vld1q_f32(b.as_ptr()));
            vst1q_f32(out.as_mut_ptr(), r);
        }
        out
    }

    #[inline]
    pub fn mul_f32(a: [f32; LANES], b: [f32; LANES]) -> [f32; LANES] {
        let mut out = [0.0f32; LANES];
        unsafe {
            let r = vmulq_f32(vld1q_f32(a.as_ptr()), vld1q_f32(b.as_ptr()));
            vst1q_f32(out.as_mut_ptr(), r);
        }
        out
    }

    #[inline]
    pub fn le_f32(a: [f32; LANES], b: [f32; LANES]) -> u8 {
        let mut lanes = [0u32; LANES];
        unsafe {
            let m = vcleq_f32(vld1q_f32(a.as_ptr()), vld1q_f32(b.as_ptr()));
            vst1q_u32(lanes.as_mut_ptr(), m);
        }
        let mut bits = 0u8;
        for (i, &lane) in lanes.iter().enumerate() {
            if lane != 0 {
                bits |= 1 << i;
            }
        }
        bits
    }

    #[inline]
    pub fn add_i32(a: [i32; LANES], b: [i32; LANES]) -> [i32; LANES] {
        let mut out = [0i32; LANES];
        unsafe {
            let r = vaddq_s32(vld1q_s32(a.as_ptr()), vld1q_s32(b.as_ptr()));
            vst1q_s32(out.as_mut_ptr(), r);
        }
        out
    }
}
