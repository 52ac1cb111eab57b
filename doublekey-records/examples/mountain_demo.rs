//! Demo of mountain grouping and ranking
//!
//! Run with `RUST_LOG=debug` to see table growth and cluster repair.

use doublekey_records::{Mountain, MountainManager, MountainOrganiser, RecordError};

fn main() -> Result<(), RecordError> {
    env_logger::init();

    println!("=== Mountain Manager Demo ===\n");

    let mountains = vec![
        Mountain::new("Everest", 9, 8849),
        Mountain::new("K2", 10, 8611),
        Mountain::new("Kilimanjaro", 3, 5895),
        Mountain::new("Ben Nevis", 2, 1345),
        Mountain::new("Fuji", 2, 3776),
        Mountain::new("Matterhorn", 7, 4478),
        Mountain::new("Eiger", 7, 3967),
    ];

    let mut manager = MountainManager::new();
    for mountain in &mountains {
        manager.add_mountain(mountain.clone())?;
    }
    println!("Added {} mountains", manager.len());

    for group in manager.group_by_difficulty() {
        if let Some(first) = group.first() {
            println!("Difficulty {}:", first.difficulty_level);
        }
        for mountain in group {
            println!("  {}", mountain);
        }
    }

    let old = Mountain::new("Eiger", 7, 3967);
    let new = Mountain::new("Eiger", 6, 3967);
    manager.edit_mountain(&old, new)?;
    println!("\nAfter re-grading the Eiger: {:?}", manager.difficulties());
    println!("Layout: {}", manager.stats().outer);

    println!("\n=== Mountain Organiser Demo ===\n");

    let mut organiser = MountainOrganiser::new();
    organiser.add_mountains(mountains.iter().cloned());
    for mountain in &mountains {
        println!("{:>2}  {}", organiser.cur_position(mountain)?, mountain);
    }

    Ok(())
}
