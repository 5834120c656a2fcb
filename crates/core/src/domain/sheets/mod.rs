pub mod a1_notation;
pub mod mood_row;
