//! File-based timing harness for the crossreduce engine.
//!
//! Input files are comma-separated integers: a header line giving
//! `numRanks` (optionally followed by `numNodes,numEdges`), then the
//! buffer contents described in the crate's top-level docs, themselves
//! comma- and/or whitespace-separated.

use std::fs;
use std::path::Path;
use std::time::Instant;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("could not read input file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("input file is empty")]
    EmptyFile,
    #[error("malformed header: expected `numRanks` or `numRanks,numNodes,numEdges`, got {header:?}")]
    MalformedHeader { header: String },
    #[error("non-integer field {field:?} in {context}")]
    NonIntegerField { field: String, context: &'static str },
    #[error(transparent)]
    Engine(#[from] crossreduce::EngineError),
}

pub struct ParsedInput {
    pub num_ranks: usize,
    pub num_nodes: usize,
    pub num_edges: usize,
    pub buffer: Vec<i32>,
}

fn parse_int(field: &str, context: &'static str) -> Result<i32, HarnessError> {
    field
        .trim()
        .parse::<i32>()
        .map_err(|_| HarnessError::NonIntegerField { field: field.to_string(), context })
}

pub fn parse_input(contents: &str) -> Result<ParsedInput, HarnessError> {
    let mut lines = contents.splitn(2, '\n');
    let header = lines.next().ok_or(HarnessError::EmptyFile)?.trim();
    if header.is_empty() {
        return Err(HarnessError::EmptyFile);
    }
    let rest = lines.next().unwrap_or("");

    let header_fields: Vec<&str> = header.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
    let (num_ranks, num_nodes, num_edges) = match header_fields.len() {
        1 => (parse_int(header_fields[0], "header")? as usize, 0, 0),
        3 => (
            parse_int(header_fields[0], "header")? as usize,
            parse_int(header_fields[1], "header")? as usize,
            parse_int(header_fields[2], "header")? as usize,
        ),
        _ => {
            return Err(HarnessError::MalformedHeader { header: header.to_string() });
        }
    };

    let buffer = rest
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|field| parse_int(field, "buffer"))
        .collect::<Result<Vec<i32>, HarnessError>>()?;

    Ok(ParsedInput { num_ranks, num_nodes, num_edges, buffer })
}

fn read_input(path: &Path) -> Result<ParsedInput, HarnessError> {
    let contents = fs::read_to_string(path).map_err(|source| HarnessError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_input(&contents)
}

/// Run `reorder` once on the input at `path` and return the wall-clock duration in milliseconds.
pub fn run_once(path: &Path) -> Result<f64, HarnessError> {
    let mut input = read_input(path)?;
    let start = Instant::now();
    crossreduce::reorder(input.num_ranks, input.num_nodes, input.num_edges, &mut input.buffer)?;
    Ok(start.elapsed().as_secs_f64() * 1000.0)
}

/// Run `reorder` `repeat` times on fresh copies of the same parsed input,
/// returning `(min, mean, max)` wall-clock milliseconds.
pub fn run_bench(path: &Path, repeat: u32) -> Result<(f64, f64, f64), HarnessError> {
    let input = read_input(path)?;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut total = 0.0;

    for _ in 0..repeat.max(1) {
        let mut buffer = input.buffer.clone();
        let start = Instant::now();
        crossreduce::reorder(input.num_ranks, input.num_nodes, input.num_edges, &mut buffer)?;
        let elapsed = start.elapsed().as_secs_f64() * 1000.0;
        min = min.min(elapsed);
        max = max.max(elapsed);
        total += elapsed;
    }

    Ok((min, total / repeat.max(1) as f64, max))
}
