//! Application services

pub mod media;

pub use media::MediaStore;
