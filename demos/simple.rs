//! A simple example showing the use of a Bloom filter.
use bloomkit::{params, BloomFilter, Fallible, HashFn};

fn main() -> Result<(), bloomkit::Error> {
    let capacity = 128;
    let (slots, hashes) = params::slots(capacity, 0.01)?;
    println!("{} items at 1%: {} bits, {} hash functions", capacity, slots, hashes);

    let mut bf = BloomFilter::new(capacity)?;
    let fns: Vec<Box<dyn HashFn>> = (1..=bf.hashes() as i64)
        .map(|seed| {
            Box::new(move |v: i64| v.wrapping_mul(0x9e37_79b9).rotate_left(seed as u32 * 7))
                as Box<dyn HashFn>
        })
        .collect();
    bf.set_hash_fns(fns)?;

    bf.set(1)?;
    bf.set(2)?;

    println!("1: {}", bf.is_set(1)?); // true
    println!("2: {}", bf.is_set(2)?); // true
    println!("3: {}", bf.is_set(3)?); // false
    println!("size: {}", bf.size()); // 2

    // A failing hash function aborts the set without touching the filter.
    let mut strict = BloomFilter::with_rate(capacity, 0.5)?;
    let checked = Fallible(|v: i64| {
        if v < 0 {
            Err("negative values are not supported")
        } else {
            Ok(v)
        }
    });
    strict.set_hash_fns(vec![Box::new(checked) as Box<dyn HashFn>])?;
    if let Err(err) = strict.set(-1) {
        println!("rejected: {}", err);
    }
    println!("size: {}", strict.size()); // 0

    Ok(())
}
