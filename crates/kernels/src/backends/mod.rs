//! SIMD backend implementations
//!
//! Each backend wraps one register width. Which ones are compiled depends on
//! the target architecture and the `avx2` / `avx512` / `neon` features; SSE2
//! is always present on x86.

pub mod sse;

#[cfg(feature = "avx2")]
pub mod avx2;

#[cfg(feature = "avx512")]
pub mod avx512;

#[cfg(feature = "neon")]
pub mod neon;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub use sse::SseVector;

#[cfg(all(feature = "avx2", any(target_arch = "x86", target_arch = "x86_64")))]
pub use avx2::Avx2Vector;

#[cfg(all(feature = "avx512", any(target_arch = "x86", target_arch = "x86_64")))]
pub use avx512::Avx512Vector;

#[cfg(all(feature = "neon", target_arch = "aarch64"))]
pub use neon::NeonVector;
