//! Basic usage example for `DynamicArray`.
//!
//! This example demonstrates construction, growth, ordered insertion and
//! removal, and slice-based element access.

use dynamic_array::{DynamicArray, Error};

fn main() -> Result<(), Error> {
    let mut values = DynamicArray::new();

    println!(
        "Created an empty array: len {}, capacity {}",
        values.len(),
        values.capacity()
    );

    for value in 0..10_u64 {
        values.push_back(value * value)?;
    }

    println!(
        "After 10 appends: len {}, capacity {}",
        values.len(),
        values.capacity()
    );

    // Ordered insertion shifts later elements toward the end.
    values.insert(0, 999)?;
    println!("First element after front insertion: {:?}", values.first());

    // Removal shifts them back.
    values.erase(0)?;
    println!("First element after front removal: {:?}", values.first());

    // Elements are accessible as a plain slice.
    let total: u64 = values.iter().sum();
    println!("Sum of all elements: {total}");

    // Shrinking drops the tail; growing appends default values.
    values.resize(3)?;
    println!("After resize(3): {values:?}");
    values.resize(5)?;
    println!("After resize(5): {values:?}");

    // An independent copy with capacity trimmed to the length.
    let copy = values.duplicate()?;
    assert_eq!(copy, values);
    println!(
        "Duplicate: len {}, capacity {}",
        copy.len(),
        copy.capacity()
    );

    Ok(())
}
