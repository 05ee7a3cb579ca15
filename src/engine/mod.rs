//! Core engine: one collect → record → surplus → project cycle.

pub mod cycle;
