//! Storing move-only elements in a `DynamicArray`.
//!
//! This example defines an element type that cannot be duplicated and shows
//! how the array's relocation policy and whole-array operations adapt to it.

use dynamic_array::{DynamicArray, Element, ElementError, Error};

/// A connection handle: transferable between owners, never copyable.
#[derive(Debug, Default)]
struct Connection {
    descriptor: u64,
}

impl Element for Connection {
    const SUPPORTS_DUPLICATION: bool = false;

    fn fresh() -> Result<Self, ElementError> {
        Ok(Self::default())
    }

    fn duplicate(&self) -> Result<Self, ElementError> {
        Err(ElementError::new(
            "duplicate",
            "connections cannot be duplicated",
        ))
    }

    fn transfer(source: &mut Self) -> Result<Self, ElementError> {
        Ok(std::mem::take(source))
    }
}

fn main() -> Result<(), Error> {
    // With duplication unavailable, growth relocates by ownership transfer.
    assert!(DynamicArray::<Connection>::RELOCATES_BY_TRANSFER);

    let mut connections = DynamicArray::new();

    for descriptor in 1..=5_u64 {
        connections.push_back(Connection { descriptor })?;
    }

    println!(
        "Holding {} connections, capacity {}",
        connections.len(),
        connections.capacity()
    );

    // Growth worked fine without duplication; whole-array duplication is the
    // one operation that cannot, and it fails cleanly.
    let error = connections
        .duplicate()
        .expect_err("duplicating move-only elements must fail");
    println!("Duplication refused as expected: {error}");

    // Ordered removal still works: it shifts by transfer, not duplication.
    connections.erase(0)?;
    let first = connections
        .first()
        .expect("four connections remain after removing one");
    println!("First descriptor after removal: {}", first.descriptor);

    Ok(())
}
