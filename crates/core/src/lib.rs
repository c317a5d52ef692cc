//! Dataset preparation for person re-identification training.
//!
//! Discovers image files for several independent datasets, assigns
//! consistent identity and camera labels, merges datasets into one unified
//! label space, and applies a mask-guided background-replacement
//! augmentation.

pub mod augmentation;
pub mod datasets;
pub mod imaging;
pub mod pipeline;
pub mod shared;
