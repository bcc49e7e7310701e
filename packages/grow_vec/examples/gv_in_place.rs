//! Constructing elements in place instead of moving finished values.
//!
//! `push_with()` and `insert_with()` hand the caller a `&mut MaybeUninit<T>` pointing at
//! the element's final slot, so a large or composite value never has to travel through
//! the stack on its way into the container.

use grow_vec::GrowVec;

/// Large enough that constructing it on the stack and moving it in would be wasteful.
struct Page {
    label: String,
    payload: [u8; 4096],
}

fn main() {
    let mut pages = GrowVec::<Page>::new();

    for index in 0..4_u8 {
        // SAFETY: The closure fully initializes the slot.
        let page = unsafe {
            pages.push_with(|slot| {
                _ = slot.write(Page {
                    label: format!("page-{index}"),
                    payload: [index; 4096],
                });
            })
        };

        println!(
            "Constructed {} in place, first payload byte {}",
            page.label, page.payload[0]
        );
    }

    // Mid-sequence insertion works the same way - the slot handed to the closure is the
    // gap opened at the requested index.
    // SAFETY: The closure fully initializes the slot.
    _ = unsafe {
        pages.insert_with(2, |slot| {
            _ = slot.write(Page {
                label: "page-extra".to_string(),
                payload: [0xFF; 4096],
            });
        })
    };

    for page in &pages {
        println!("{}", page.label);
    }
}
