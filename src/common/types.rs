/// Document id inside one index reader, `-1` means "not positioned yet".
pub type DocId = i32;
pub type ScoreType = f32;
/// Token position inside one field of one document.
pub type Position = i32;
