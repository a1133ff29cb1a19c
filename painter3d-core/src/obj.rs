/// Wavefront OBJ parser (positions and faces only)
use nalgebra::Point3;
use nom::{
    bytes::complete::take_while,
    character::complete::{char, i64 as signed_index, space0, space1},
    combinator::{all_consuming, opt, verify},
    multi::{many_m_n, separated_list1},
    number::complete::float,
    sequence::{delimited, preceded, terminated, tuple},
    IResult,
};

use crate::error::MeshError;
use crate::geometry::{Mesh, Triangle};

/// Parse OBJ text into a triangle mesh.
///
/// Supports `v` and `f` statements; faces may use `i`, `i/t`, `i//n` or
/// `i/t/n` references with 1-based or negative (relative) indices. Polygons
/// are fan-triangulated. Every other statement is ignored.
pub fn parse_obj(input: &str) -> Result<Mesh, MeshError> {
    let mut vertices: Vec<Point3<f32>> = Vec::new();
    let mut mesh = Mesh::new();

    for (i, raw) in input.lines().enumerate() {
        let line_no = i + 1;
        let line = match raw.split_once('#') {
            Some((content, _comment)) => content,
            None => raw,
        }
        .trim();

        if line.is_empty() {
            continue;
        }

        let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match keyword {
            "v" => vertices.push(complete(vertex, rest, line_no, "vertex")?),
            "f" => {
                let refs = complete(face, rest, line_no, "face")?;
                if refs.len() < 3 {
                    return Err(MeshError::Parse {
                        line: line_no,
                        message: format!("face needs at least 3 vertices, got {}", refs.len()),
                    });
                }

                let corners = refs
                    .into_iter()
                    .map(|r| resolve(r, vertices.len(), line_no).map(|idx| vertices[idx]))
                    .collect::<Result<Vec<_>, _>>()?;

                for k in 1..corners.len() - 1 {
                    mesh.add_triangle(Triangle::new(corners[0], corners[k], corners[k + 1]));
                }
            }
            _ => {}
        }
    }

    Ok(mesh)
}

fn complete<'a, T>(
    parser: fn(&'a str) -> IResult<&'a str, T>,
    input: &'a str,
    line: usize,
    what: &str,
) -> Result<T, MeshError> {
    all_consuming(delimited(space0, parser, space0))(input)
        .map(|(_, value)| value)
        .map_err(|_| MeshError::Parse {
            line,
            message: format!("malformed {what} statement"),
        })
}

/// `x y z [w]` or `x y z r g b`; the weight and vertex colour are ignored.
fn vertex(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, (x, y, z, _extra)) = tuple((
        float,
        preceded(space1, float),
        preceded(space1, float),
        verify(many_m_n(0, 3, preceded(space1, float)), |extra: &Vec<f32>| extra.len() != 2),
    ))(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn face(input: &str) -> IResult<&str, Vec<i64>> {
    separated_list1(space1, vertex_ref)(input)
}

/// Position index, discarding any `/texture/normal` suffix.
fn vertex_ref(input: &str) -> IResult<&str, i64> {
    terminated(
        signed_index,
        opt(preceded(
            char('/'),
            take_while(|c: char| c.is_ascii_digit() || c == '/' || c == '-'),
        )),
    )(input)
}

/// Turn a 1-based or negative OBJ index into a 0-based one.
fn resolve(index: i64, count: usize, line: usize) -> Result<usize, MeshError> {
    let resolved = if index > 0 {
        Some(index - 1)
    } else if index < 0 {
        Some(count as i64 + index)
    } else {
        None
    };

    resolved
        .filter(|&idx| idx >= 0 && (idx as usize) < count)
        .map(|idx| idx as usize)
        .ok_or(MeshError::IndexOutOfRange { line, index, count })
}
