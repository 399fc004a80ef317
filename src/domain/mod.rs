// Domain layer: value model, entities and ports. No I/O here.

pub mod model;
pub mod movie;
pub mod ports;
