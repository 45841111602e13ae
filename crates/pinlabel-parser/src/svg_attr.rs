//! Parsers for SVG presentation attributes: `transform` lists and `viewBox`.

use pinlabel_core::geometry::{Bounds, Point, Size, Transform};
use winnow::{
    Parser as _,
    ascii::{float, multispace0},
    combinator::{delimited, opt, preceded, repeat, terminated},
    error::{ContextError, ModalResult},
    token::take_while,
};

type IResult<O> = ModalResult<O, ContextError>;

/// Whitespace with at most one comma, the separator SVG allows between
/// numbers and between list items.
fn separator(input: &mut &str) -> IResult<()> {
    (multispace0, opt(','), multispace0).void().parse_next(input)
}

fn number(input: &mut &str) -> IResult<f32> {
    preceded(separator, float).parse_next(input)
}

/// One `name(args...)` item of a transform list.
fn transform_item<'a>(input: &mut &'a str) -> IResult<(&'a str, Vec<f32>)> {
    preceded(
        separator,
        (
            take_while(1.., |c: char| c.is_ascii_alphabetic()),
            delimited((multispace0, '('), repeat(0.., number), (separator, ')')),
        ),
    )
    .parse_next(input)
}

fn build_transform(name: &str, args: &[f32]) -> Result<Transform, String> {
    let transform = match (name, args) {
        ("matrix", [a, b, c, d, e, f]) => Transform::matrix(*a, *b, *c, *d, *e, *f),
        ("translate", [tx]) => Transform::translate(*tx, 0.0),
        ("translate", [tx, ty]) => Transform::translate(*tx, *ty),
        ("scale", [s]) => Transform::scale(*s, *s),
        ("scale", [sx, sy]) => Transform::scale(*sx, *sy),
        ("rotate", [angle]) => Transform::rotate(*angle, Point::default()),
        ("rotate", [angle, cx, cy]) => Transform::rotate(*angle, Point::new(*cx, *cy)),
        ("skewX", [angle]) => Transform::matrix(1.0, 0.0, angle.to_radians().tan(), 1.0, 0.0, 0.0),
        ("skewY", [angle]) => Transform::matrix(1.0, angle.to_radians().tan(), 0.0, 1.0, 0.0, 0.0),
        ("matrix" | "translate" | "scale" | "rotate" | "skewX" | "skewY", _) => {
            return Err(format!(
                "`{name}` does not take {} argument{}",
                args.len(),
                if args.len() == 1 { "" } else { "s" }
            ));
        }
        _ => return Err(format!("unknown transform function `{name}`")),
    };
    Ok(transform)
}

/// Parses an SVG `transform` attribute into a single matrix.
///
/// Items apply right to left, so `translate(10) scale(2)` scales first.
/// An empty list is the identity.
pub(crate) fn parse_transform(text: &str) -> Result<Transform, String> {
    let items: Vec<(&str, Vec<f32>)> = terminated(repeat(0.., transform_item), separator)
        .parse(text)
        .map_err(|_| format!("invalid transform `{}`", text.trim()))?;

    items
        .iter()
        .try_fold(Transform::IDENTITY, |acc, (name, args)| {
            build_transform(name, args).map(|item| acc.then_inner(item))
        })
}

/// Parses a whitespace or comma separated list of numbers.
pub(crate) fn parse_number_list(text: &str) -> Result<Vec<f32>, String> {
    terminated(repeat(0.., number), separator)
        .parse(text)
        .map_err(|_| format!("invalid number list `{}`", text.trim()))
}

/// Parses a `viewBox` attribute: `min-x min-y width height`.
pub(crate) fn parse_view_box(text: &str) -> Result<Bounds, String> {
    match parse_number_list(text)?.as_slice() {
        [x, y, width, height] if *width >= 0.0 && *height >= 0.0 => Ok(
            Bounds::new_from_top_left(Point::new(*x, *y), Size::new(*width, *height)),
        ),
        [_, _, _, _] => Err(format!("viewBox `{}` has a negative size", text.trim())),
        values => Err(format!(
            "viewBox needs 4 numbers, found {} in `{}`",
            values.len(),
            text.trim()
        )),
    }
}
