pub mod ensemble;
pub mod lexicon;
pub mod sources;

pub use ensemble::{SentimentEnsemble, TextSentiment, ENSEMBLE_WEIGHTS};
pub use sources::{CompoundSource, FinbertSource, PolaritySource, SentimentSource};
