pub mod hash;
pub mod player;
pub mod track;
