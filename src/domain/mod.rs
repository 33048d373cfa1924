// Domain layer: core models and ports (interfaces). Concrete filesystem / HTTP
// implementations live under adapters.

pub mod model;
pub mod ports;
