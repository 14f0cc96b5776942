// Domain layer: core models and ports (interfaces) between the host and the identity provider.

pub mod model;
pub mod ports;
