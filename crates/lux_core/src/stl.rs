//! Binary STL ingestion.
//!
//! Layout: an 80-byte header, a little-endian `u32` triangle count, then one
//! 50-byte record per triangle (facet normal, three vertices, attribute word).
//! The file size must match the declared count exactly.

use std::path::Path;

use lux_math::Vec3;
use thiserror::Error;

use crate::mesh::Mesh;

const HEADER_LEN: usize = 80;
const PREAMBLE_LEN: usize = HEADER_LEN + 4;
const RECORD_LEN: usize = 50;
/// Offset of the first vertex inside a record (the facet normal is skipped).
const VERTEX_OFFSET: usize = 12;

/// Errors that can occur while reading STL data.
#[derive(Error, Debug)]
pub enum StlError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed STL: {0}")]
    Format(String),
}

/// Result type for STL operations.
pub type StlResult<T> = Result<T, StlError>;

/// Read and parse a binary STL file.
pub fn load_binary_stl(path: impl AsRef<Path>) -> StlResult<Mesh> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    log::info!("Loading STL {} ({} bytes)", path.display(), bytes.len());
    parse_binary_stl(&bytes)
}

/// Parse binary STL bytes into a welded mesh.
pub fn parse_binary_stl(bytes: &[u8]) -> StlResult<Mesh> {
    if bytes.len() < PREAMBLE_LEN {
        return Err(StlError::Format(format!(
            "expected at least {} bytes of header, found {}",
            PREAMBLE_LEN,
            bytes.len()
        )));
    }

    let count = u32::from_le_bytes([
        bytes[HEADER_LEN],
        bytes[HEADER_LEN + 1],
        bytes[HEADER_LEN + 2],
        bytes[HEADER_LEN + 3],
    ]) as u64;

    let expected = PREAMBLE_LEN as u64 + RECORD_LEN as u64 * count;
    if bytes.len() as u64 != expected {
        return Err(StlError::Format(format!(
            "header declares {} triangles ({} bytes) but file has {} bytes",
            count,
            expected,
            bytes.len()
        )));
    }

    let corners: Vec<Vec3> = bytes[PREAMBLE_LEN..]
        .chunks_exact(RECORD_LEN)
        .flat_map(|record| {
            (0..3).map(move |corner| read_vec3(record, VERTEX_OFFSET + corner * 12))
        })
        .collect();

    let mesh = Mesh::from_triangle_soup(&corners);
    log::info!(
        "Parsed {} triangles, {} unique vertices",
        mesh.triangle_count(),
        mesh.vertex_count()
    );
    Ok(mesh)
}

/// Read three little-endian `f32`s starting at `offset`.
fn read_vec3(record: &[u8], offset: usize) -> Vec3 {
    let component = |i: usize| {
        let start = offset + i * 4;
        f32::from_le_bytes([
            record[start],
            record[start + 1],
            record[start + 2],
            record[start + 3],
        ]) as f64
    };
    Vec3::new(component(0), component(1), component(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(vertices: [[f32; 3]; 3]) -> Vec<u8> {
        let mut out = Vec::with_capacity(RECORD_LEN);
        out.extend_from_slice(&[0u8; 12]);
        for v in vertices {
            for c in v {
                out.extend_from_slice(&c.to_le_bytes());
            }
        }
        out.extend_from_slice(&[0u8; 2]);
        out
    }

    fn stl(records: &[Vec<u8>], declared: u32) -> Vec<u8> {
        let mut out = vec![0u8; HEADER_LEN];
        out.extend_from_slice(&declared.to_le_bytes());
        for r in records {
            out.extend_from_slice(r);
        }
        out
    }

    #[test]
    fn test_parse_single_triangle() {
        let bytes = stl(
            &[record([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])],
            1,
        );
        let mesh = parse_binary_stl(&bytes).unwrap();

        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangle(0)[1], Vec3::X);
    }

    #[test]
    fn test_parse_empty_solid() {
        let mesh = parse_binary_stl(&stl(&[], 0)).unwrap();
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_short_header_is_format_error() {
        let result = parse_binary_stl(&[0u8; 40]);
        assert!(matches!(result, Err(StlError::Format(_))));
    }

    #[test]
    fn test_truncated_records_are_format_error() {
        let mut bytes = stl(
            &[record([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])],
            2,
        );
        assert!(matches!(parse_binary_stl(&bytes), Err(StlError::Format(_))));

        // Trailing garbage is rejected too
        bytes.truncate(PREAMBLE_LEN);
        bytes[HEADER_LEN] = 0;
        bytes.push(7);
        assert!(matches!(parse_binary_stl(&bytes), Err(StlError::Format(_))));
    }

    #[test]
    fn test_huge_declared_count_does_not_overflow() {
        let bytes = stl(&[], u32::MAX);
        assert!(matches!(parse_binary_stl(&bytes), Err(StlError::Format(_))));
    }
}
