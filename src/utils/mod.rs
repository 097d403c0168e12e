pub mod id_generator;
pub mod rate_limit;
