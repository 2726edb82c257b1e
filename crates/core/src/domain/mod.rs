pub mod matching;
pub mod request;
pub mod supplier;
