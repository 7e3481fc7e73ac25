pub mod items;
pub mod points;
