pub mod duration;
pub mod geo;
pub mod slug;
pub mod xml;
