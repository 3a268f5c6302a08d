use clap::Parser;
use probe_hash::HashMap;
use probe_hash::HashTable;
use probe_hash::hash_function::BuildHasherFunction;
use probe_hash::hash_table::Entry;
use siphasher::sip::SipHasher;
use std::hash::BuildHasherDefault;

type SipHash = BuildHasherFunction<BuildHasherDefault<SipHasher>>;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1024)]
    target_capacity: usize,

    /// Percentage of slots to fill before removing.
    #[arg(short = 'f', long = "fill_percent", default_value_t = 69)]
    fill_percent: usize,

    /// Remove every n-th key after filling.
    #[arg(short = 'r', long = "remove_every", default_value_t = 3)]
    remove_every: u64,
}

fn main() {
    let args = Args::parse();

    println!(
        "Creating HashTable with target capacity: {}",
        args.target_capacity
    );

    let mut table: HashTable<u64, u64, SipHash> =
        HashTable::with_capacity_and_hash_function(args.target_capacity, SipHash::default());
    println!("Actual capacity: {}", table.capacity());

    let num_values = (table.capacity() * args.fill_percent.min(100) / 100) as u64;
    println!("Filling table with {} u64 keys...", num_values);
    for key in 0..num_values {
        match table.set(key) {
            Some(Entry::Vacant(entry)) => {
                entry.insert(key);
            }
            Some(Entry::Occupied(_)) => panic!("Key already exists in table: {}", key),
            None => panic!("Table full at key {}", key),
        }
    }

    table.probe_histogram().print();
    table.debug_stats().print();

    let step = args.remove_every.max(1);
    println!("Removing every {} key(s)...", step);
    for key in (0..num_values).step_by(step as usize) {
        table.unset(&key);
    }
    table.debug_stats().print();

    println!("Enlarging to {} slots...", table.capacity() << 1);
    table.enlarge(table.capacity() << 1);
    table.debug_stats().print();

    println!();
    println!("Same keys through HashMap with its load-factor policy:");
    let mut map: HashMap<u64, u64> = HashMap::new();
    for key in 0..num_values {
        map.insert(key, key);
    }
    println!(
        "HashMap: {} entries, capacity {}, load factor {:.2}",
        map.len(),
        map.capacity(),
        map.load_factor()
    );
    map.probe_histogram().print();
    for key in (0..num_values).step_by(step as usize) {
        map.remove(&key);
    }
    map.debug_stats().print();
}
