pub mod constants;
pub mod model_resolver;
pub mod scratch;
pub mod timestamp;
