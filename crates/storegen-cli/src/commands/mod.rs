pub mod generate;
pub mod preview;
pub mod schema;
pub mod verify;
