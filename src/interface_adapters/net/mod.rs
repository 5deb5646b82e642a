// Network adapter modules split by client sockets vs internal HTTP routes.

pub mod client;
pub mod internal;

pub use client::{spawn_serializers, ws_handler};
pub use internal::spawn_projectile_handler;
