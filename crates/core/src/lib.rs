pub mod acquisition;
pub mod audio;
pub mod pipeline;
pub mod shared;
pub mod transcript;
