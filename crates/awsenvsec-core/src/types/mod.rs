//! Core types shared by every stage of the pipeline

mod entry;
mod output;

pub use entry::{DecodedValue, NormalizedPair, Parameter, RawEntry, StoreKind};
pub use output::OutputMode;
