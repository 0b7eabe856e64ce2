use std::fs;

use nom::branch::alt;
use nom::bytes::complete::{tag, take_until};
use nom::character::complete::{digit1, multispace0, space1};
use nom::combinator::map_res;
use nom::multi::many0;
use nom::sequence::{preceded, separated_pair};
use nom::IResult;

use crate::graph::VertexId;

/// reads an unsigned integer
fn integer(s: &str) -> IResult<&str, usize> {
    map_res(digit1, str::parse)(s)
}

/// skips a single comment line
fn skip_comment(s: &str) -> IResult<&str, &str> {
    preceded(tag("c"), take_until("\n"))(s)
}

/// skips all comments (with surrounding blank lines)
pub fn skip_comments(s: &str) -> IResult<&str, Vec<&str>> {
    many0(preceded(multispace0, skip_comment))(s)
}

/// reads the header containing (n,m)
pub fn read_header(s: &str) -> IResult<&str, (usize, usize)> {
    preceded(
        preceded(multispace0, alt((tag("p edge "), tag("p col ")))),
        separated_pair(integer, space1, integer),
    )(s)
}

/// reads an edge line (WARNING: indices start at 1 in the DIMACS format)
pub fn read_edge(s: &str) -> IResult<&str, (usize, usize)> {
    preceded(
        preceded(multispace0, tag("e ")),
        separated_pair(integer, space1, integer),
    )(s)
}

/// parses a DIMACS instance, returns (n,m,adj_list) with 0-based vertices
pub fn parse(content: &str) -> (usize, usize, Vec<Vec<VertexId>>) {
    let cleaned = content.replace('\r', "");
    let after_comments = skip_comments(cleaned.as_str()).unwrap().0;
    let (mut rest, (n, m)) = read_header(after_comments)
        .expect("Instance: invalid DIMACS header");
    let mut adj_list = vec![Vec::new(); n];
    let mut check_nb_edges = 0;
    while match read_edge(rest) {
        Ok((tmp, (a, b))) => {
            rest = tmp;
            adj_list[a - 1].push(b - 1);
            adj_list[b - 1].push(a - 1);
            check_nb_edges += 1;
            true
        }
        Err(_) => false,
    } {}
    assert!(
        check_nb_edges == m || 2 * check_nb_edges == m,
        "check: {}\t m: {}", check_nb_edges, m
    );
    (n, m, adj_list)
}

/// reads an instance from a file, returns (n,m,adj_list)
pub fn read_from_file(filename: &str) -> (usize, usize, Vec<Vec<VertexId>>) {
    let content = fs::read_to_string(filename)
        .expect("Instance: unable to read file");
    parse(content.as_str())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_comment() {
        let s = "c this is a test comment\np edge 2 1\ne 1 2\n";
        assert_eq!(
            skip_comments(s).unwrap().0,
            "\np edge 2 1\ne 1 2\n"
        );
    }

    #[test]
    fn test_read_header() {
        let s = "p edge 2 1\ne 1 2";
        assert_eq!(read_header(s).unwrap().0, "\ne 1 2");
        assert_eq!(read_header(s).unwrap().1, (2, 1));
    }

    #[test]
    fn test_read_header_col() {
        let s = "p col 2 1\ne 1 2";
        assert_eq!(read_header(s).unwrap().1, (2, 1));
    }

    #[test]
    fn test_read_edge() {
        let s = "e 1 2\n";
        assert_eq!(read_edge(s).unwrap().1, (1, 2));
        assert_eq!(read_edge(s).unwrap().0, "\n");
    }

    #[test]
    fn test_parse_instance() {
        let s = "c grid 2x2\np edge 4 4\ne 1 2\ne 2 4\ne 4 3\ne 3 1\n";
        let (n, m, adj) = parse(s);
        assert_eq!(n, 4);
        assert_eq!(m, 4);
        assert_eq!(adj[0], vec![1, 2]);
        assert_eq!(adj[3], vec![1, 2]);
    }

    #[test]
    fn test_parse_edges_on_one_line() {
        let s = "p edge 3 3\ne 1 2 e 2 3 e 3 1\n";
        let (n, m, adj) = parse(s);
        assert_eq!(n, 3);
        assert_eq!(m, 3);
        assert_eq!(adj[1], vec![0, 2]);
    }

    #[test]
    fn test_parse_doubled_edge_count() {
        // some instances declare the number of directed arcs in the header
        let s = "p edge 2 2\ne 1 2\n";
        let (_, _, adj) = parse(s);
        assert_eq!(adj[0], vec![1]);
        assert_eq!(adj[1], vec![0]);
    }
}
