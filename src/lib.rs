//! Patch-based texture resynthesis.
//!
//! Rebuilds a new raster image from a small example ("corpus") by copying
//! pixels one at a time into an initially empty output canvas, so that
//! local neighborhoods in the output statistically resemble neighborhoods
//! in the corpus. This is the non-parametric, Efros-Leung-lineage
//! algorithm behind the classic `resynthesizer` GIMP plugin: for every
//! output pixel, visited in a shuffled order, it gathers the
//! already-filled neighbors, looks up the corpus coordinates those
//! neighbors were copied from, proposes candidates by coherence and by
//! random probe, and copies the best-scoring candidate's pixel.
//!
//! ## Usage
//!
//! ```
//! use resynth::{synthesize, Image, Parameters};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let corpus = Image::from_pixels(2, 2, 3, vec![10; 2 * 2 * 3])?;
//! let mut params = Parameters::new();
//! params.set_seed(1).set_tries(16);
//!
//! let result = synthesize(corpus, 4, &params)?;
//! assert_eq!(result.width(), 8);
//! assert_eq!(result.height(), 8);
//! # Ok(())
//! # }
//! ```
//!
//! For finer control over a run's lifetime — inspecting or reusing the
//! working arena — construct a [`State`] directly and call
//! [`State::run`]/[`State::into_result`] yourself instead of going through
//! [`synthesize`].
#![forbid(
    absolute_paths_not_starting_with_crate,
    missing_docs,
    non_ascii_idents,
    noop_method_call,
    unsafe_code,
    unused_results
)]
#![warn(
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

pub mod coord;
pub mod error;
pub mod image;
pub mod params;
pub mod result;
pub mod state;

mod diff_table;
mod offsets;
mod pcg;
mod synth;
mod visit;

pub use coord::Coord;
pub use error::ResynthError;
pub use image::Image;
pub use params::Parameters;
pub use result::ResynthResult;
pub use state::{synthesize, State};
