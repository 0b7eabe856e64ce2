use std::convert::TryInto;
use std::fs;

use crate::csr::CsrGraph;
use crate::graph::{Graph, VertexId};

/*
Layout (all fields little-endian u64):
    n, nb_arcs, offsets[0..=n], targets[0..nb_arcs]
where offsets[v]..offsets[v+1] indexes the neighbor slice of v and nb_arcs is
the number of directed arcs (twice the number of undirected edges).
*/

/// decodes the u64 at word index i
fn word(bytes: &[u8], i: usize) -> usize {
    let start = i * 8;
    u64::from_le_bytes(bytes[start..start + 8].try_into().unwrap()) as usize
}

/// reads a binary adjacency file, returns the adjacency list
pub fn read_from_file(filename: &str) -> Vec<Vec<VertexId>> {
    let bytes = fs::read(filename)
        .expect("Instance: unable to read binary file");
    assert!(bytes.len() >= 16 && bytes.len() % 8 == 0, "binary instance: truncated file");
    let n = word(&bytes, 0);
    let nb_arcs = word(&bytes, 1);
    assert_eq!(
        bytes.len() / 8, 2 + n + 1 + nb_arcs,
        "binary instance: size does not match header"
    );
    let offset_base = 2;
    let target_base = offset_base + n + 1;
    let mut adj_list = vec![Vec::new(); n];
    for (v, adj) in adj_list.iter_mut().enumerate() {
        let begin = word(&bytes, offset_base + v);
        let end = word(&bytes, offset_base + v + 1);
        assert!(begin <= end && end <= nb_arcs, "binary instance: bad offsets");
        for a in begin..end {
            adj.push(word(&bytes, target_base + a));
        }
    }
    adj_list
}

/// writes a graph into a binary adjacency file
pub fn write_to_file(g: &CsrGraph, filename: &str) {
    let (offsets, targets) = g.arcs();
    let mut bytes = Vec::with_capacity(8 * (2 + offsets.len() + targets.len()));
    bytes.extend_from_slice(&(g.nb_vertices() as u64).to_le_bytes());
    bytes.extend_from_slice(&(targets.len() as u64).to_le_bytes());
    for o in offsets {
        bytes.extend_from_slice(&(*o as u64).to_le_bytes());
    }
    for t in targets {
        bytes.extend_from_slice(&(*t as u64).to_le_bytes());
    }
    fs::write(filename, bytes)
        .unwrap_or_else(|_| panic!("write_to_file: unable to write {}", filename));
}
