//! Stress tests for the module logger
//!
//! These tests verify:
//! - No lost or torn lines when many threads share one file writer
//! - Module lookup returns a single instance under contention
//! - Rotating writers stay consistent under concurrent writes
//! - Reconfiguration while logging does not lose records

use module_logger::formatters::DefaultFormatter;
use module_logger::prelude::*;
use module_logger::writers::{FileWriter, RotatingFileWriter};
use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

const THREADS: usize = 8;
const RECORDS_PER_THREAD: usize = 500;

#[test]
fn test_concurrent_writes_single_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("stress.log");

    let env = LogEnvironment::builder()
        .formatter(Arc::new(DefaultFormatter::new(false)))
        .writer(Arc::new(FileWriter::new(&path)))
        .build();
    let logger = env.module("stress");

    let mut handles = vec![];
    for thread_id in 0..THREADS {
        let logger = Arc::clone(&logger);
        handles.push(thread::spawn(move || {
            for i in 0..RECORDS_PER_THREAD {
                logger.info(format!("thread {} record {}", thread_id, i));
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    logger.close().expect("Failed to close");

    let content = fs::read_to_string(&path).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines.len(),
        THREADS * RECORDS_PER_THREAD,
        "Expected one line per record"
    );

    // Every line is whole and every record of every thread is present
    let mut per_thread: HashMap<usize, usize> = HashMap::new();
    for line in &lines {
        assert!(line.ends_with(" {}"), "Torn line: {}", line);
        let rest = line
            .split(" thread ")
            .nth(1)
            .expect("Line lost its message");
        let thread_id: usize = rest
            .split(' ')
            .next()
            .and_then(|id| id.parse().ok())
            .expect("Line lost its thread id");
        *per_thread.entry(thread_id).or_default() += 1;
    }
    assert_eq!(per_thread.len(), THREADS);
    assert!(per_thread.values().all(|count| *count == RECORDS_PER_THREAD));
    assert_eq!(
        logger.metrics().records_written(),
        (THREADS * RECORDS_PER_THREAD) as u64
    );
}

#[test]
fn test_concurrent_module_lookup_returns_one_instance() {
    let env = LogEnvironment::new();
    let barrier = Arc::new(Barrier::new(THREADS));

    let mut handles = vec![];
    for _ in 0..THREADS {
        let env = env.clone();
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            env.module("shared")
        }));
    }

    let loggers: Vec<Arc<Logger>> = handles
        .into_iter()
        .map(|handle| handle.join().expect("Thread panicked"))
        .collect();

    for logger in &loggers[1..] {
        assert!(Arc::ptr_eq(&loggers[0], logger));
    }
    assert_eq!(env.module_names(), vec!["shared".to_string()]);
}

#[test]
fn test_concurrent_rotating_writes() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let root = temp_dir.path().to_path_buf();
    let writer = Arc::new(RotatingFileWriter::new(move |_level, module: &str| {
        root.join(format!("{}.log", module))
    }));

    let env = LogEnvironment::builder()
        .formatter(Arc::new(DefaultFormatter::new(false)))
        .writer(writer.clone())
        .build();

    let mut handles = vec![];
    for thread_id in 0..THREADS {
        let logger = env.module(&format!("part{}", thread_id % 2));
        handles.push(thread::spawn(move || {
            for i in 0..RECORDS_PER_THREAD {
                logger.warning(format!("thread {} record {}", thread_id, i));
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    writer.close().expect("Failed to close");

    for part in ["part0.log", "part1.log"] {
        let content =
            fs::read_to_string(temp_dir.path().join(part)).expect("Failed to read log file");
        assert_eq!(
            content.lines().count(),
            THREADS / 2 * RECORDS_PER_THREAD,
            "Unexpected line count in {}",
            part
        );
    }
}

#[test]
fn test_reconfigure_while_logging() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let first = temp_dir.path().join("first.log");
    let second = temp_dir.path().join("second.log");

    let env = LogEnvironment::builder()
        .formatter(Arc::new(DefaultFormatter::new(false)))
        .writer(Arc::new(FileWriter::new(&first)))
        .build();
    let logger = env.module("swap");

    let writer_thread = {
        let logger = Arc::clone(&logger);
        thread::spawn(move || {
            for i in 0..RECORDS_PER_THREAD * 2 {
                logger.notice(format!("record {}", i));
            }
        })
    };

    thread::sleep(std::time::Duration::from_millis(1));
    env.set_writer(Arc::new(FileWriter::new(&second)));
    env.set_level(Level::Debug);

    writer_thread.join().expect("Thread panicked");
    env.close_all();

    let count = |path: &std::path::Path| {
        fs::read_to_string(path)
            .map(|content| content.lines().count())
            .unwrap_or(0)
    };
    assert_eq!(count(&first) + count(&second), RECORDS_PER_THREAD * 2);
}
