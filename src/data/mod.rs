pub mod dataset;
pub mod normalize;
pub mod record;
pub mod registry;
pub mod validate;
