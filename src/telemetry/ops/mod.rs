pub mod push;
pub mod settings;
