// Contract errors
//
// Entry points return the package error enum; codes raised inside the
// funding, tick and swap packages reach callers as-is.

pub use perpamm_math::PerpError;
