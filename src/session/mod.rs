pub mod cards;
pub mod input;
pub mod preview;
pub mod stats;
pub mod stream;
