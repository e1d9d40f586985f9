pub mod feature;
pub mod project;
