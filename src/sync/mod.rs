//! Synchronization primitives
//!
//! - [`ExclusionCell`]: critical-section protected interior mutability, the
//!   transport's single exclusion domain
//! - [`AtomicWaker`]: waker storage woken from the edge handler
//!   (feature `async`)
//!
//! # Example
//!
//! ```ignore
//! use ph_rp2040_spis::sync::ExclusionCell;
//!
//! static COUNTER: ExclusionCell<u32> = ExclusionCell::new(0);
//!
//! #[interrupt]
//! fn IO_IRQ_BANK0() {
//!     COUNTER.lock(|n| *n += 1);
//! }
//! ```

mod primitives;

#[cfg(feature = "async")]
pub use primitives::AtomicWaker;
pub use primitives::ExclusionCell;
