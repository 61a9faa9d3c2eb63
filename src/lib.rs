//! Where is Todd?
//!
//! Polls a whereabouts service and shows the result on a Waveshare 2.13"
//! three-colour e-paper HAT: an ID card image, a headline, today's location
//! in a wide cell and the rest of the working week in narrow ones.
//!
//! ### Usage
//! One run is one render pass:
//!
//! 1. fetch the records from a [`source::LocationSource`]
//! 1. sort them and pick today's and the week's labels with [`schedule`]
//! 1. draw everything into a [`render::RenderContext`]
//! 1. flush the two planes to a [`sink::DisplaySink`]
//!
//! [`app`] strings these together for both the week and the status layouts.

pub mod app;
pub mod config;
pub mod render;
pub mod schedule;
pub mod sink;
pub mod source;
