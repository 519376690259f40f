//! Demo driver for the B-tree.
//!
//! Runs an insert/find/remove workload and prints the tree and its stats
//! after every step.
//!
//! Usage:
//!   btree_cli [order] fixed
//!   btree_cli [order] random [count] [max_value] [seed]
//!
//! Set `RUST_LOG=debug` to see split, borrow and merge events.

use btree_core::{BTree, InsertOutcome, RemoveOutcome, DEFAULT_ORDER};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::env;
use std::process::exit;

const FIXED_INSERTS: [i64; 16] = [5, 7, 8, 3, 2, 4, 6, 9, 10, 8, 7, -2, 0, 11, 13, -1];
const FIXED_REMOVES: [i64; 4] = [3, 7, -20, -1];
const FIND_PROBES: [i64; 2] = [10, -20];

fn usage() -> ! {
    eprintln!("Usage: btree_cli [order] <workload> [args...]");
    eprintln!("Workloads:");
    eprintln!("  fixed                              - Built-in insert/remove sequence");
    eprintln!("  random [count] [max_value] [seed]  - Random values in 0..max_value");
    exit(1);
}

fn parse_arg<T: std::str::FromStr>(args: &[String], index: usize, name: &str, default: T) -> T {
    match args.get(index) {
        Some(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                eprintln!("ERROR: Invalid {}: {}", name, raw);
                exit(1);
            }
        },
        None => default,
    }
}

fn main() {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let order = match args.first().map(|arg| arg.parse::<usize>()) {
        Some(Ok(order)) => {
            args.remove(0);
            order
        }
        _ => DEFAULT_ORDER,
    };

    let (inserts, removes) = match args.first().map(String::as_str) {
        Some("fixed") | None => (FIXED_INSERTS.to_vec(), FIXED_REMOVES.to_vec()),
        Some("random") => {
            let count: usize = parse_arg(&args, 1, "count", 90);
            let max_value: i64 = parse_arg(&args, 2, "max_value", 100);
            if max_value <= 0 {
                eprintln!("ERROR: max_value must be positive");
                exit(1);
            }
            let mut rng = match args.get(3) {
                Some(_) => StdRng::seed_from_u64(parse_arg(&args, 3, "seed", 0)),
                None => StdRng::from_entropy(),
            };
            let inserts = (0..count).map(|_| rng.gen_range(0..max_value)).collect();
            let removes = (0..count / 4).map(|_| rng.gen_range(0..max_value)).collect();
            (inserts, removes)
        }
        Some(other) => {
            eprintln!("Unknown workload: {}", other);
            usage();
        }
    };

    let mut tree = match BTree::new(order) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            exit(1);
        }
    };

    println!();
    println!("{}", tree.describe_order());
    print!("{}", tree);
    print!("{}", tree.stats());

    for key in inserts {
        println!();
        println!("  Inserting {}  ", key);
        if tree.insert(key) == InsertOutcome::Duplicate {
            println!("This value is already present");
        }
        print!("{}", tree);
        print!("{}", tree.stats());
    }

    for key in FIND_PROBES {
        println!();
        println!("  Finding {}  ", key);
        if tree.contains(&key) {
            println!("value found");
        } else {
            println!("value not found");
        }
        print!("{}", tree);
    }

    for key in removes {
        println!();
        println!("  Removing {}  ", key);
        if tree.remove(&key) == RemoveOutcome::NotPresent {
            println!("This value is not present");
        }
        print!("{}", tree);
        print!("{}", tree.stats());
    }

    if let Err(e) = tree.validate() {
        eprintln!("ERROR: {}", e);
        exit(1);
    }
}
