/// STL file parser for binary and ASCII formats
use nalgebra::{Point3, Vector3};
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    combinator::map,
    multi::{count, many0},
    number::complete::{float, le_f32, le_u16, le_u32},
    sequence::{delimited, preceded, tuple},
    IResult,
};
use thiserror::Error;

use crate::geometry::{Mesh, Triangle};

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

#[derive(Debug, Error)]
pub enum StlError {
    #[error("file too small to be a valid STL ({0} bytes)")]
    TooShort(usize),
    #[error("binary STL declares {expected} triangles but only {found} fit in the file")]
    Truncated { expected: usize, found: usize },
    #[error("failed to parse ASCII STL: {0}")]
    Ascii(String),
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, StlError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(StlError::TooShort(data.len()));
    }

    let (body, triangle_count) = binary_header(data).map_err(|_| StlError::TooShort(data.len()))?;
    let triangle_count = triangle_count as usize;
    let available = body.len() / FACET_LEN;
    if available < triangle_count {
        return Err(StlError::Truncated {
            expected: triangle_count,
            found: available,
        });
    }

    let (_, triangles) = count(binary_facet, triangle_count)(body).map_err(|_| {
        StlError::Truncated {
            expected: triangle_count,
            found: available,
        }
    })?;

    Ok(Mesh { triangles })
}

fn binary_header(input: &[u8]) -> IResult<&[u8], u32> {
    preceded(take(HEADER_LEN), le_u32)(input)
}

fn binary_vector(input: &[u8]) -> IResult<&[u8], Vector3<f32>> {
    map(tuple((le_f32, le_f32, le_f32)), |(x, y, z)| Vector3::new(x, y, z))(input)
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Triangle> {
    let (input, normal) = binary_vector(input)?;
    let (input, v0) = binary_vector(input)?;
    let (input, v1) = binary_vector(input)?;
    let (input, v2) = binary_vector(input)?;
    // Attribute byte count, unused
    let (input, _) = le_u16(input)?;

    Ok((
        input,
        Triangle::with_normal([v0.into(), v1.into(), v2.into()], normal),
    ))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, StlError> {
    match parse_ascii_stl_impl(input) {
        Ok((_, mesh)) => Ok(mesh),
        Err(e) => Err(StlError::Ascii(e.to_string())),
    }
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, Mesh> {
    let (input, _) = keyword("solid")(input)?;
    // Optional name runs to the end of the line
    let (input, _) = not_line_ending(input)?;
    let (input, triangles) = many0(parse_facet)(input)?;
    let (input, _) = keyword("endsolid")(input)?;

    Ok((input, Mesh { triangles }))
}

/// Whitespace, then `keyword`
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    preceded(multispace0, tag(word))
}

/// Three whitespace-separated floats
fn ascii_vector(input: &str) -> IResult<&str, Vector3<f32>> {
    map(
        tuple((
            preceded(multispace0, float),
            preceded(multispace1, float),
            preceded(multispace1, float),
        )),
        |(x, y, z)| Vector3::new(x, y, z),
    )(input)
}

fn ascii_vertex(input: &str) -> IResult<&str, Point3<f32>> {
    map(preceded(keyword("vertex"), ascii_vector), Point3::from)(input)
}

fn parse_facet(input: &str) -> IResult<&str, Triangle> {
    let normal = preceded(
        tuple((keyword("facet"), multispace1, tag("normal"))),
        ascii_vector,
    );
    let corners = delimited(
        tuple((keyword("outer"), multispace1, tag("loop"))),
        tuple((ascii_vertex, ascii_vertex, ascii_vertex)),
        tuple((keyword("endloop"), keyword("endfacet"))),
    );
    map(tuple((normal, corners)), |(normal, (v0, v1, v2))| {
        Triangle::with_normal([v0, v1, v2], normal)
    })(input)
}

/// Whether the byte length matches the size a binary STL with the declared
/// triangle count must have.
fn looks_binary(data: &[u8]) -> bool {
    match binary_header(data) {
        Ok((_, n)) => data.len() == HEADER_LEN + 4 + n as usize * FACET_LEN,
        Err(_) => false,
    }
}

/// Detect and parse STL file (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Mesh, StlError> {
    // Many exporters write "solid" into binary headers too, so an exact binary
    // size match wins over the ASCII keyword.
    if data.starts_with(b"solid") && !looks_binary(data) {
        if let Ok(text) = std::str::from_utf8(data) {
            match parse_ascii_stl(text) {
                Ok(mesh) => return Ok(mesh),
                Err(e) => log::debug!("ASCII parse failed, retrying as binary: {}", e),
            }
        }
    }

    parse_binary_stl(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_vec(data: &mut Vec<u8>, v: [f32; 3]) {
        for c in v {
            data.extend_from_slice(&c.to_le_bytes());
        }
    }

    fn binary_stl(header: &[u8], facets: &[[[f32; 3]; 4]]) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_LEN];
        data[..header.len()].copy_from_slice(header);
        data.extend_from_slice(&(facets.len() as u32).to_le_bytes());
        for facet in facets {
            for v in facet {
                push_vec(&mut data, *v);
            }
            data.extend_from_slice(&0u16.to_le_bytes());
        }
        data
    }

    const FACET: [[f32; 3]; 4] = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
    ];

    #[test]
    fn test_parse_binary_header() {
        let data = binary_stl(b"", &[]);
        let mesh = parse_binary_stl(&data).unwrap();
        assert_eq!(mesh.triangles.len(), 0);
    }

    #[test]
    fn test_parse_binary_facet() {
        let data = binary_stl(b"", &[FACET, FACET]);
        let mesh = parse_binary_stl(&data).unwrap();
        assert_eq!(mesh.len(), 2);
        let t = &mesh.triangles[1];
        assert_eq!(t.normal, Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(t.vertices[1], Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_binary_too_short() {
        assert!(matches!(parse_stl(&[0u8; 10]), Err(StlError::TooShort(10))));
    }

    #[test]
    fn test_binary_truncated() {
        let mut data = binary_stl(b"", &[FACET, FACET]);
        data.truncate(data.len() - 10);
        assert!(matches!(
            parse_binary_stl(&data),
            Err(StlError::Truncated {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_binary_with_solid_header() {
        let data = binary_stl(b"solid exported by some CAD tool", &[FACET]);
        let mesh = parse_stl(&data).unwrap();
        assert_eq!(mesh.len(), 1);
    }

    #[test]
    fn test_parse_ascii() {
        let text = "solid tri\n\
            facet normal 0 0 1\n\
              outer loop\n\
                vertex 0 0 0\n\
                vertex 1.5e0 0 0\n\
                vertex 0 -2.25 0\n\
              endloop\n\
            endfacet\n\
            endsolid tri\n";
        let mesh = parse_stl(text.as_bytes()).unwrap();
        assert_eq!(mesh.len(), 1);
        assert_eq!(mesh.triangles[0].vertices[1], Point3::new(1.5, 0.0, 0.0));
        assert_eq!(mesh.triangles[0].vertices[2], Point3::new(0.0, -2.25, 0.0));
    }

    #[test]
    fn test_parse_ascii_indented_facets() {
        let facet = |z: f32| {
            format!(
                "  facet normal 0 0 1\r\n    outer loop\r\n      vertex 0 0 {z}\r\n      \
                 vertex 1 0 {z}\r\n      vertex 0 1 {z}\r\n    endloop\r\n  endfacet\r\n"
            )
        };
        let text = format!("solid plates\r\n{}{}endsolid plates\r\n", facet(0.0), facet(2.5));
        let mesh = parse_ascii_stl(&text).unwrap();
        assert_eq!(mesh.len(), 2);
        assert_eq!(mesh.triangles[1].vertices[2], Point3::new(0.0, 1.0, 2.5));
        assert_eq!(mesh.triangles[1].normal, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_parse_ascii_error() {
        let result = parse_ascii_stl("solid broken\nfacet normal 0 0\n");
        assert!(matches!(result, Err(StlError::Ascii(_))));
    }
}
