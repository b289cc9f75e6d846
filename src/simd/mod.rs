//! Vector register adapters.
//!
//! Two families of registers implement [`LaneAdapter`]:
//!
//! - **Native width** (`wide::f32x8`, `wide::f64x4`): 256-bit registers, the
//!   width the vector math library picks for itself.
//! - **Explicit width** ([`F32x16`], [`F64x8`]): 512-bit registers used by the
//!   hand-written SIMD loop. They are built from two native halves so they run
//!   on every target `wide` supports; on AVX-512 hosts the compiler fuses them.

mod doubled;
mod native;
pub mod traits;

pub use doubled::DoubleWidth;
pub use traits::LaneAdapter;

/// 16 packed `f32` lanes.
pub type F32x16 = DoubleWidth<wide::f32x8>;

/// 8 packed `f64` lanes.
pub type F64x8 = DoubleWidth<wide::f64x4>;
