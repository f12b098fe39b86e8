//! Printed walkthroughs of both engines

use anyhow::Result;
use avltree::AvlTree;
use lrucache::{LruCache, SharedCache};
use std::io::{self, Write};
use std::thread;
use tracing::{debug, info};

/// Classic capacity-bounded walkthrough: fill, touch, evict, overwrite
pub fn lru_walkthrough<W: Write>(out: &mut W, capacity: usize) -> Result<()> {
    info!(capacity, "LRU walkthrough");
    writeln!(out, "== LRU cache (capacity {}) ==", capacity)?;

    let mut cache = LruCache::new(capacity)?;

    put(out, &mut cache, 1, 100)?;
    put(out, &mut cache, 2, 200)?;
    put(out, &mut cache, 3, 300)?;
    get(out, &mut cache, 1)?;
    put(out, &mut cache, 4, 400)?;
    get(out, &mut cache, 2)?;
    put(out, &mut cache, 1, 150)?;
    put(out, &mut cache, 5, 500)?;

    Ok(())
}

fn put<W: Write>(out: &mut W, cache: &mut LruCache<u32, u32>, key: u32, value: u32) -> io::Result<()> {
    match cache.put(key, value) {
        Some((old_key, old_value)) => writeln!(
            out,
            "put({},{}) evicted ({},{})",
            key, value, old_key, old_value
        )?,
        None => writeln!(out, "put({},{})", key, value)?,
    }
    print_cache(out, cache)
}

fn get<W: Write>(out: &mut W, cache: &mut LruCache<u32, u32>, key: u32) -> io::Result<()> {
    match cache.get(&key).copied() {
        Some(value) => writeln!(out, "get({}) -> {}", key, value)?,
        None => writeln!(out, "get({}) -> miss", key)?,
    }
    print_cache(out, cache)
}

fn print_cache<W: Write>(out: &mut W, cache: &LruCache<u32, u32>) -> io::Result<()> {
    write!(out, "  cache (MRU to LRU):")?;
    for (key, value) in cache {
        write!(out, " ({},{})", key, value)?;
    }
    writeln!(out)
}

/// Several threads reading through one shared cache, filling it on misses
pub fn shared_cache_workload<W: Write>(out: &mut W, capacity: usize, threads: usize) -> Result<()> {
    info!(capacity, threads, "shared cache workload");

    let cache = SharedCache::new(capacity)?;
    // Twice as many keys as slots keeps evictions going
    let keyspace = (capacity as u64).saturating_mul(2);

    thread::scope(|s| {
        for t in 0..threads as u64 {
            let cache = cache.clone();
            s.spawn(move || {
                for i in 0..1000u64 {
                    let key = (i * 31 + t) % keyspace;
                    if cache.get(&key).is_none() {
                        cache.put(key, key.saturating_mul(100));
                    }
                }
                debug!(thread = t, "worker finished");
            });
        }
    });

    writeln!(
        out,
        "shared cache: {} threads, {}/{} entries, {}",
        threads,
        cache.len(),
        cache.capacity(),
        cache.stats().snapshot()
    )?;

    Ok(())
}

/// Rotations on small inserts, successor promotion on delete, and the
/// sequential-insert balancing demo over `1..=count`
pub fn avl_walkthrough<W: Write>(out: &mut W, count: u32) -> Result<()> {
    info!(count, "AVL walkthrough");
    writeln!(out, "== AVL tree ==")?;

    let mut tree = AvlTree::new();
    for value in [10, 20, 30, 40, 50, 25] {
        tree.insert(value);
    }
    writeln!(out, "after inserting 10 20 30 40 50 25:")?;
    report(out, &tree)?;

    writeln!(out, "search(25) -> {}", tree.search(&25))?;
    writeln!(out, "search(55) -> {}", tree.search(&55))?;

    for value in [20, 30] {
        tree.delete(&value);
        writeln!(out, "after deleting {}:", value)?;
        report(out, &tree)?;
    }

    let sequential: AvlTree<u32> = (1..=count).collect();
    writeln!(out, "after inserting 1..={} in order:", count)?;
    report(out, &sequential)?;

    Ok(())
}

fn report<W: Write>(out: &mut W, tree: &AvlTree<u32>) -> Result<()> {
    tree.validate()?;

    writeln!(out, "  inorder:     {}", join(tree.inorder()))?;
    writeln!(out, "  level order: {}", join(tree.level_order()))?;
    writeln!(
        out,
        "  height: {}  valid AVL: {}",
        tree.height(),
        tree.is_valid_avl()
    )?;

    Ok(())
}

fn join<'a>(values: impl Iterator<Item = &'a u32>) -> String {
    let parts: Vec<String> = values.map(u32::to_string).collect();
    if parts.is_empty() {
        "(empty)".to_string()
    } else {
        parts.join(" ")
    }
}
