//! Replays a short allocate/free sequence against a [`DefaultBlockAllocator`]
//! and logs the allocator state after every step.
//!
//! ```text
//! alloc-demo [TOTAL_BLOCKS]        # default 512
//! ALLOC_DEMO_LOG=trace alloc-demo  # include free list operations
//! ```

mod logger;

use block_alloc::{AllocError, BlockAddress, BlockAllocator, DefaultBlockAllocator, Segment};
use log::{error, info};
use logger::StderrLogger;
use std::env;
use std::process::ExitCode;

const DEFAULT_TOTAL_BLOCKS: u64 = 512;

fn main() -> ExitCode {
    if let Err(e) = StderrLogger::from_env().init() {
        eprintln!("failed to install logger: {e}");
        return ExitCode::FAILURE;
    }

    // args: [total_blocks]
    let total = match env::args().nth(1) {
        None => DEFAULT_TOTAL_BLOCKS,
        Some(arg) => match arg.parse::<u64>() {
            Ok(total) if total > 0 => total,
            _ => {
                error!("expected a positive block count, got {arg:?}");
                return ExitCode::FAILURE;
            }
        },
    };

    match run(total) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(total: u64) -> Result<(), AllocError> {
    let mut allocator = DefaultBlockAllocator::new(Segment::new(BlockAddress::new(0), total));
    dump("initial", &allocator);

    let a = allocator.alloc(10)?;
    let b = allocator.alloc(20)?;
    dump("after alloc a=10, b=20", &allocator);

    allocator.free(a)?;
    dump("after free a", &allocator);

    let c = allocator.alloc(5)?;
    let d = allocator.alloc(5)?;
    let e = allocator.alloc(5)?;
    dump("after alloc c, d, e = 5", &allocator);

    for (name, handle) in [("b", b), ("c", c), ("d", d), ("e", e)] {
        allocator.free(handle)?;
        dump(&format!("after free {name}"), &allocator);
    }

    let usage = allocator.usage();
    info!(
        "done: {} of {} blocks free in {} segment(s)",
        usage.free_blocks,
        usage.total_blocks(),
        usage.free_segments
    );
    Ok(())
}

fn dump<const FREE: usize, const TABLE: usize>(
    title: &str,
    allocator: &BlockAllocator<FREE, TABLE>,
) {
    info!("== {title} ==");
    info!("free list:");
    for (slot, segment) in allocator.free_list().entries() {
        info!("  {slot} {segment} ({} blocks)", segment.length());
    }
    info!("allocation table:");
    for (index, slot) in allocator.allocation_table().slots().iter().enumerate() {
        match slot {
            Some(segment) => info!("  #{index} {segment} ({} blocks)", segment.length()),
            None => info!("  #{index} <unused>"),
        }
    }
}
