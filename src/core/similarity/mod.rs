mod default_similarity;
mod norm;
mod similarity;

pub use default_similarity::DefaultSimilarity;
pub use norm::{decode_norm, encode_norm};
pub use similarity::{FieldInvertState, Similarity};
