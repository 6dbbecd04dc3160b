// ABOUTME: Compile-fail test verifying ContainerId and NetworkId are not interchangeable.
// ABOUTME: This test should fail to compile, validating type safety.

use dockhand::types::{ContainerId, NetworkId};

fn takes_container_id(_id: ContainerId) {}

fn main() {
    let network_id = NetworkId::new("net123");
    takes_container_id(network_id); // ERROR: expected ContainerId, found NetworkId
}
