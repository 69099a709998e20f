/// Built-in pixel functions.
pub mod algorithms;
/// Algorithm descriptors and plans.
pub mod descriptor;
/// Parameter values and schemas.
pub mod params;
/// Name-keyed algorithm registry.
pub mod registry;
