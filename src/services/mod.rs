pub mod training;
pub mod evaluation;
pub mod recommendation;
