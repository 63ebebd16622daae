// Domain layer: fare records and the ports the query core talks through.

pub mod model;
pub mod ports;
