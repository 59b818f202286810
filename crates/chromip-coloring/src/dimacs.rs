//! Reader for the line-oriented DIMACS graph format.
//!
//! ```text
//! c triangle
//! p edge 3 3
//! e 1 2
//! e 2 3
//! e 1 3
//! ```
//!
//! `c` lines are comments, the `p <format> N M` line declares vertices
//! `1..=N`, and each `e U V` line adds one edge. Repeated edges are kept.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::ColoringError;
use crate::graph::{Graph, Vertex};

/// Parse a DIMACS graph from any buffered reader.
///
/// Undecodable text is a [`ColoringError::Parse`] at its line; any other
/// read failure is a [`ColoringError::Io`].
pub fn parse_dimacs(reader: impl BufRead) -> Result<Graph, ColoringError> {
    parse_source(reader, "<input>")
}

fn parse_source(reader: impl BufRead, source: &str) -> Result<Graph, ColoringError> {
    let mut header: Option<(u32, usize)> = None;
    let mut edges: Vec<(Vertex, Vertex)> = Vec::new();
    let mut lines_read = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        lines_read = line_no;
        let line = line.map_err(|err| match err.kind() {
            io::ErrorKind::InvalidData => parse_error(line_no, format!("unreadable text: {err}")),
            _ => ColoringError::Io {
                path: source.to_string(),
                message: format!("line {line_no}: {err}"),
            },
        })?;
        let fields: Vec<&str> = line.split_whitespace().collect();

        match fields.as_slice() {
            [] => {}
            [kind, ..] if kind.starts_with('c') => {}
            ["p", _format, vertices, declared, ..] => {
                if header.is_some() {
                    return Err(parse_error(line_no, "second problem line"));
                }
                let vertices = parse_field::<u32>(line_no, "vertex count", vertices)?;
                let declared = parse_field::<usize>(line_no, "edge count", declared)?;
                header = Some((vertices, declared));
            }
            ["p", ..] => {
                return Err(parse_error(
                    line_no,
                    "problem line must read 'p <format> <vertices> <edges>'",
                ));
            }
            ["e", u, v, ..] => {
                let Some((num_vertices, _)) = header else {
                    return Err(parse_error(line_no, "edge before problem line"));
                };
                let u = parse_field::<Vertex>(line_no, "edge endpoint", u)?;
                let v = parse_field::<Vertex>(line_no, "edge endpoint", v)?;
                for endpoint in [u, v] {
                    if endpoint == 0 || endpoint > num_vertices {
                        return Err(parse_error(
                            line_no,
                            format!("vertex {endpoint} outside 1..={num_vertices}"),
                        ));
                    }
                }
                if u == v {
                    return Err(parse_error(line_no, format!("self-loop on vertex {u}")));
                }
                edges.push((u, v));
            }
            ["e", ..] => {
                return Err(parse_error(line_no, "edge line must read 'e <u> <v>'"));
            }
            [kind, ..] => {
                debug!(
                    component = "dimacs",
                    operation = "parse",
                    status = "skipped",
                    line = line_no,
                    kind = *kind,
                    "Ignoring unknown line type"
                );
            }
        }
    }

    let Some((num_vertices, declared)) = header else {
        return Err(parse_error(lines_read, "missing problem line"));
    };
    if declared != edges.len() {
        warn!(
            component = "dimacs",
            operation = "parse",
            status = "mismatch",
            declared,
            read = edges.len(),
            "Edge count differs from problem line"
        );
    }

    let graph = Graph::with_vertex_count(num_vertices, edges)?;
    debug!(
        component = "dimacs",
        operation = "parse",
        status = "success",
        vertices = graph.num_vertices(),
        edges = graph.num_edges(),
        max_degree = graph.max_degree(),
        "Parsed DIMACS graph"
    );
    Ok(graph)
}

pub fn parse_dimacs_str(input: &str) -> Result<Graph, ColoringError> {
    parse_dimacs(input.as_bytes())
}

/// Open and parse a DIMACS file.
pub fn read_dimacs_file(path: impl AsRef<Path>) -> Result<Graph, ColoringError> {
    let path = path.as_ref().display().to_string();
    let file = File::open(&path).map_err(|err| ColoringError::Io {
        path: path.clone(),
        message: err.to_string(),
    })?;
    parse_source(BufReader::new(file), &path)
}

fn parse_error(line: usize, reason: impl Into<String>) -> ColoringError {
    ColoringError::Parse {
        line,
        reason: reason.into(),
    }
}

fn parse_field<T: std::str::FromStr>(
    line: usize,
    what: &str,
    field: &str,
) -> Result<T, ColoringError> {
    field
        .parse()
        .map_err(|_| parse_error(line, format!("{what} '{field}' is not a number")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    /// Fails every read.
    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("device went away"))
        }
    }

    const TRIANGLE: &str = "c triangle\np edge 3 3\ne 1 2\ne 2 3\ne 1 3\n";

    #[test]
    fn test_parses_triangle() {
        let graph = parse_dimacs_str(TRIANGLE).unwrap();
        assert_eq!(graph.vertices(), &[1, 2, 3]);
        assert_eq!(graph.edges(), &[(1, 2), (2, 3), (1, 3)]);
        assert_eq!(graph.max_degree(), 2);
    }

    #[test]
    fn test_comments_blank_lines_and_unknown_lines_are_skipped() {
        let input = "\ncomment without space\np col 4 1\n\nn 1 5\ne 4 1\n";
        let graph = parse_dimacs_str(input).unwrap();
        assert_eq!(graph.num_vertices(), 4);
        assert_eq!(graph.edges(), &[(4, 1)]);
    }

    #[test]
    fn test_duplicate_edges_are_kept() {
        let graph = parse_dimacs_str("p edge 2 2\ne 1 2\ne 2 1\n").unwrap();
        assert_eq!(graph.num_edges(), 2);
        assert_eq!(graph.max_degree(), 2);
    }

    #[test]
    fn test_edge_count_mismatch_is_tolerated() {
        let graph = parse_dimacs_str("p edge 3 7\ne 1 2\n").unwrap();
        assert_eq!(graph.num_edges(), 1);
    }

    #[test]
    fn test_zero_vertices() {
        let graph = parse_dimacs_str("p edge 0 0\n").unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_malformed_input_reports_line() {
        let cases = [
            ("e 1 2\np edge 2 1\n", 1, "edge before problem line"),
            ("p edge 2 1\ne 1 x\n", 2, "'x' is not a number"),
            ("p edge two 1\n", 1, "'two' is not a number"),
            ("p edge 2 1\n\ne 1 3\n", 3, "vertex 3 outside 1..=2"),
            ("p edge 2 1\ne 0 1\n", 2, "vertex 0 outside"),
            ("p edge 2 1\ne 2 2\n", 2, "self-loop on vertex 2"),
            ("p edge 2\n", 1, "problem line"),
            ("p edge 2 1\ne 1\n", 2, "edge line"),
            ("p edge 2 0\np edge 2 0\n", 2, "second problem line"),
        ];
        for (input, expected_line, fragment) in cases {
            match parse_dimacs_str(input) {
                Err(ColoringError::Parse { line, reason }) => {
                    assert_eq!(line, expected_line, "{input:?}");
                    assert!(reason.contains(fragment), "{input:?}: {reason}");
                }
                other => panic!("{input:?} parsed to {other:?}"),
            }
        }
    }

    #[test]
    fn test_missing_problem_line() {
        let err = parse_dimacs_str("c nothing here\n").unwrap_err();
        assert_eq!(err.code(), "GRAPH_PARSE");
        assert!(err.to_string().contains("missing problem line"));
    }

    #[test]
    fn test_read_failure_mid_file_is_io_error() {
        let reader = BufReader::new((&b"p edge 2 1\n"[..]).chain(FailingReader));
        let err = parse_dimacs(reader).unwrap_err();
        assert_eq!(err.code(), "GRAPH_IO");
        match err {
            ColoringError::Io { path, message } => {
                assert_eq!(path, "<input>");
                assert!(message.contains("line 2"), "{message}");
                assert!(message.contains("device went away"), "{message}");
            }
            other => panic!("expected an I/O error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let err = parse_dimacs(&b"p edge 2 1\n\xff\xfe 1 2\n"[..]).unwrap_err();
        match err {
            ColoringError::Parse { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("unreadable text"), "{reason}");
            }
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_dimacs_file("/nonexistent/graph.col").unwrap_err();
        assert_eq!(err.code(), "GRAPH_IO");
        assert!(err.to_string().contains("/nonexistent/graph.col"));
    }
}
