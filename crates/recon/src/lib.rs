//! `tallyrec-recon`: two-sided transaction reconciliation engine.
//!
//! Pure engine crate: receives already-parsed records, returns classified results.
//! No CLI or IO dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod similarity;

pub use config::{ReconConfig, ThresholdConfig};
pub use engine::{reconcile, run};
pub use error::ReconError;
pub use matcher::{evaluate_pair, is_likely_same, PairingPolicy};
pub use model::{
    FieldDifference, MatchResult, MismatchResult, PairEvaluation, Record, ReconResult,
    ReconSummary, Value,
};
pub use similarity::{edit_distance, similarity};
