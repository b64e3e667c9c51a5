//! Driver trait seam for LLM backends.
//!
//! The workflow engine talks to the generative capability exclusively
//! through [`Driver`]; provider implementations live in `hogarth_models`
//! and tests substitute scripted mocks.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::Driver;
