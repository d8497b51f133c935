//! Domain layer of the Helm service broker.
//! - `registry`: service name to chart mappings, behind an injectable store.
//! - `installer`: `helm install` through a replaceable command runner.
//! - `broker`: the Open Service Broker operations built on the two above.

pub mod broker;
pub mod errors;
pub mod installer;
pub mod registry;
#[cfg(test)]
pub mod test_support;
