// Graph persistence: bincode over the serde representation.
//
// The byte layout is whatever bincode derives from the data model; the
// contract is only that decode(encode(g)) is structurally equal to g —
// same nodes, same edges in the same order, same timestamps, same index.

use std::fs;
use std::path::Path;

use crate::graph::PositionGraph;

/// Errors from the persistence layer. Always fatal to the calling
/// operation; a graph from a failed decode is never usable.
#[derive(thiserror::Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),
}

/// Serialize a graph to bytes.
pub fn encode(graph: &PositionGraph) -> Result<Vec<u8>, PersistenceError> {
    Ok(bincode::serialize(graph)?)
}

/// Deserialize a graph from bytes produced by [`encode`].
pub fn decode(bytes: &[u8]) -> Result<PositionGraph, PersistenceError> {
    Ok(bincode::deserialize(bytes)?)
}

/// Write an encoded graph to a file at `path`.
pub fn dump(graph: &PositionGraph, path: &Path) -> Result<(), PersistenceError> {
    let bytes = encode(graph)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Load a graph from a file written by [`dump`].
pub fn load(path: &Path) -> Result<PositionGraph, PersistenceError> {
    let bytes = fs::read(path)?;
    decode(&bytes)
}
