//! Core library for the gradesheet command line application.
//!
//! The library exposes high-level orchestration helpers that power the
//! command-line interface as well as the unit tests. The modules are structured
//! to keep responsibilities narrow and composable: IO adapters live under
//! [`io`], data representations inside [`model`], grade conversion in
//! [`grade`], header classification in [`classify`], spreadsheet heuristics in
//! [`roster`] and [`matching`], and the reconciliation orchestration under
//! [`engine`].

pub mod classify;
pub mod engine;
pub mod error;
pub mod grade;
pub mod io;
pub mod matching;
pub mod model;
pub mod report;
pub mod roster;

pub use error::{ProcessError, Result};
