/// STL file parser for binary and ASCII formats
///
/// Stored facet normals are discarded; the pipeline derives normals from
/// vertex winding.
use nalgebra::Point3;
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::{count, many0},
    number::complete::{float, le_f32, le_u16, le_u32},
    sequence::{preceded, tuple},
    IResult,
};

use crate::error::MeshError;
use crate::geometry::{Mesh, Triangle};

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, MeshError> {
    let (body, triangle_count) = binary_header(data).map_err(|_| MeshError::Truncated)?;
    let triangle_count = triangle_count as usize;

    if body.len() < triangle_count.saturating_mul(FACET_LEN) {
        return Err(MeshError::Truncated);
    }

    let (_, triangles) = count(binary_facet, triangle_count)(body).map_err(|_| MeshError::Truncated)?;
    Ok(Mesh { triangles })
}

fn binary_header(input: &[u8]) -> IResult<&[u8], u32> {
    preceded(take(HEADER_LEN), le_u32)(input)
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Triangle> {
    let (input, _normal) = take(12usize)(input)?;
    let (input, (p0, p1, p2)) = tuple((le_point, le_point, le_point))(input)?;
    let (input, _attributes) = le_u16(input)?;
    Ok((input, Triangle::new(p0, p1, p2)))
}

fn le_point(input: &[u8]) -> IResult<&[u8], Point3<f32>> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Point3::new(x, y, z)))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, MeshError> {
    match ascii_solid(input) {
        Ok((_, triangles)) => Ok(Mesh { triangles }),
        Err(e) => Err(MeshError::Parse {
            line: error_line(input, &e),
            message: "malformed ASCII STL".to_string(),
        }),
    }
}

/// 1-based line of the position where a nom error stopped.
fn error_line(input: &str, err: &nom::Err<nom::error::Error<&str>>) -> usize {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let consumed = input.len() - e.input.len();
            input[..consumed].lines().count().max(1)
        }
        nom::Err::Incomplete(_) => 1,
    }
}

fn ascii_solid(input: &str) -> IResult<&str, Vec<Triangle>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _name) = not_line_ending(input)?;
    let (input, triangles) = many0(facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _name) = not_line_ending(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, triangles))
}

fn facet(input: &str) -> IResult<&str, Triangle> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _normal) = ascii_point(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, p0) = ascii_vertex(input)?;
    let (input, p1) = ascii_vertex(input)?;
    let (input, p2) = ascii_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, Triangle::new(p0, p1, p2)))
}

fn ascii_vertex(input: &str) -> IResult<&str, Point3<f32>> {
    preceded(preceded(multispace0, tag("vertex")), ascii_point)(input)
}

fn ascii_point(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, Point3::new(x, y, z)))
}

/// Detect and parse STL file (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Mesh, MeshError> {
    // Some binary exporters also start their header with "solid".
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    if data[start..].starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }

    parse_binary_stl(data)
}
