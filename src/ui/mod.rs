pub mod components;
pub mod layout;
pub mod text_area;
pub mod theme;
