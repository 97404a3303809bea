pub mod output;
pub mod panels;
pub mod zone;
