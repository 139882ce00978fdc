//! Internal Implementation Details
//!
//! Not part of the public API.
//!
//! # Contents
//!
//! - [`constants`]: Frame, FIFO and timing constants
//! - [`ring`]: Fixed-slot frame ring
//! - [`engine`]: Binds ring slots to the two DMA channels across frames
//! - [`register`]: Raw memory-mapped register definitions

pub(crate) mod constants;
pub(crate) mod engine;
pub(crate) mod register;
pub(crate) mod ring;
