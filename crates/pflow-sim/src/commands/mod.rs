pub mod convert;
pub mod solve;
pub mod version;
