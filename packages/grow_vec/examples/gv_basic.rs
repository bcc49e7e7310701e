//! Basic usage of the `grow_vec` crate:
//!
//! * Creating a container.
//! * Appending and inserting items.
//! * Iterating and mutating items.
//! * Removing items.

use grow_vec::GrowVec;

fn main() {
    let mut names = GrowVec::new();

    // Appending is amortized constant time - the capacity doubles whenever the
    // backing region fills up.
    names.push("Alice".to_string());
    names.push("Bob".to_string());
    names.push("Charlie".to_string());

    println!(
        "Container holds {} items in a region of capacity {}",
        names.len(),
        names.capacity()
    );

    // Insertion before an existing index shifts the tail one slot toward the back.
    names.insert(1, "Aaron".to_string());
    println!("After insert at 1: {:?}", names.as_slice());

    // The live elements are one contiguous slice, so all slice machinery applies.
    for name in &mut names {
        name.make_ascii_uppercase();
    }
    println!("After uppercasing: {:?}", names.as_slice());

    // Removal hands the value back and closes the gap.
    let removed = names.remove(2);
    println!("Removed {removed}, leaving {:?}", names.as_slice());

    // Popping drains from the back; `None` signals exhaustion rather than an error.
    while let Some(name) = names.pop() {
        println!("Popped {name}");
    }
}
