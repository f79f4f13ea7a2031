/// Middleware module
///
/// The access gate in front of the `/admin` scope.

mod access_gate;

pub use access_gate::AccessGate;
