//! Text formats for operation scripts and key maps
//!
//! An operation line is
//!
//! ```text
//! rotate|scale|translate X Y Z [over <ms>ms] [in <steps>]
//! ```
//!
//! and a key map line binds one or more key names to an operation:
//!
//! ```text
//! ArrowLeft, a, A, 4 => rotate 0 -30 0 over 500ms in 30
//! ```
//!
//! Key names containing `#`, `,`, `=` or spaces are written in double
//! quotes, as in `"#", " " => scale 2 2 2`. Everything after an unquoted `#`
//! is a comment and blank lines are ignored.
use std::time::Duration;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, space0, space1, u32 as integer, u64 as long},
    combinator::{all_consuming, opt, value},
    multi::separated_list1,
    number::complete::double,
    sequence::{delimited, preceded, terminated, tuple},
    IResult,
};

use crate::error::EngineError;
use crate::operation::{Operation, OperationKind, Timing};

/// Operation as written, before its timing is validated
struct RawOperation {
    kind: OperationKind,
    amount: (f64, f64, f64),
    duration_ms: Option<u64>,
    steps: Option<u32>,
}

impl RawOperation {
    fn build(self, defaults: Timing, line: usize) -> Result<Operation, EngineError> {
        let duration = self
            .duration_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.duration);
        let steps = self.steps.unwrap_or(defaults.steps.get());
        let timing = Timing::new(duration, steps).map_err(|e| EngineError::Parse {
            line,
            message: e.to_string(),
        })?;
        let (x, y, z) = self.amount;
        Ok(Operation::new(self.kind, x, y, z).with_timing(timing))
    }
}

/// Parse one operation per line.
pub fn parse_script(input: &str, defaults: Timing) -> Result<Vec<Operation>, EngineError> {
    meaningful_lines(input)
        .map(|(line, text)| {
            let (_, raw) = all_consuming(operation)(text).map_err(|e| parse_error(line, e))?;
            raw.build(defaults, line)
        })
        .collect()
}

/// Parse key bindings into `(key name, operation)` pairs, in file order.
pub fn parse_keymap(input: &str, defaults: Timing) -> Result<Vec<(String, Operation)>, EngineError> {
    let mut bindings = Vec::new();
    for (line, text) in meaningful_lines(input) {
        let (_, (keys, raw)) = all_consuming(binding)(text).map_err(|e| parse_error(line, e))?;
        let op = raw.build(defaults, line)?;
        bindings.extend(keys.into_iter().map(|key| (key.to_string(), op)));
    }
    Ok(bindings)
}

/// Non-empty lines with comments removed, numbered from 1
fn meaningful_lines(input: &str) -> impl Iterator<Item = (usize, &str)> {
    input
        .lines()
        .enumerate()
        .map(|(i, text)| (i + 1, strip_comment(text).trim()))
        .filter(|(_, text)| !text.is_empty())
}

fn strip_comment(text: &str) -> &str {
    let mut quoted = false;
    for (at, c) in text.char_indices() {
        match c {
            '"' => quoted = !quoted,
            '#' if !quoted => return &text[..at],
            _ => {}
        }
    }
    text
}

fn parse_error(line: usize, error: nom::Err<nom::error::Error<&str>>) -> EngineError {
    let message = match error {
        nom::Err::Error(e) | nom::Err::Failure(e) if e.input.is_empty() => {
            "unexpected end of line".to_string()
        }
        nom::Err::Error(e) | nom::Err::Failure(e) => format!("unexpected `{}`", e.input),
        nom::Err::Incomplete(_) => "incomplete input".to_string(),
    };
    EngineError::Parse { line, message }
}

fn binding(input: &str) -> IResult<&str, (Vec<&str>, RawOperation)> {
    let (input, keys) = separated_list1(delimited(space0, char(','), space0), key_name)(input)?;
    let (input, _) = delimited(space0, tag("=>"), space0)(input)?;
    let (input, op) = operation(input)?;
    Ok((input, (keys, op)))
}

fn key_name(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_while1(|c: char| c != '"'), char('"')),
        take_while1(|c: char| !c.is_whitespace() && c != ',' && c != '='),
    ))(input)
}

fn operation(input: &str) -> IResult<&str, RawOperation> {
    let (input, kind) = alt((
        value(OperationKind::Rotate, tag("rotate")),
        value(OperationKind::Scale, tag("scale")),
        value(OperationKind::Translate, tag("translate")),
    ))(input)?;
    let (input, amount) = tuple((
        preceded(space1, double),
        preceded(space1, double),
        preceded(space1, double),
    ))(input)?;
    let (input, duration_ms) = opt(preceded(
        tuple((space1, tag("over"), space1)),
        terminated(long, tag("ms")),
    ))(input)?;
    let (input, steps) = opt(preceded(tuple((space1, tag("in"), space1)), integer))(input)?;
    let (input, _) = space0(input)?;

    Ok((
        input,
        RawOperation {
            kind,
            amount,
            duration_ms,
            steps,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Timing {
        Timing::new(Duration::from_millis(1000), 60).unwrap()
    }

    #[test]
    fn test_parse_script() {
        let script = "\
# start-up
rotate 0 0 90
scale 2 2 2 over 1500ms

translate -3 0 0.5 in 12   # trailing comment
rotate 0 360 0 over 2000ms in 120
";
        let ops = parse_script(script, defaults()).unwrap();
        assert_eq!(ops.len(), 4);
        assert_eq!(ops[0], Operation::rotate(0.0, 0.0, 90.0).with_timing(defaults()));
        assert_eq!(ops[1].kind, OperationKind::Scale);
        assert_eq!(ops[1].timing.duration, Duration::from_millis(1500));
        assert_eq!(ops[1].timing.steps.get(), 60);
        assert_eq!(ops[2].amount.z, 0.5);
        assert_eq!(ops[2].timing.steps.get(), 12);
        assert_eq!(ops[3].timing, Timing::new(Duration::from_millis(2000), 120).unwrap());
    }

    #[test]
    fn test_script_errors_name_the_line() {
        let err = parse_script("rotate 0 0 90\nspin 1 2 3\n", defaults()).unwrap_err();
        assert_eq!(
            err,
            EngineError::Parse {
                line: 2,
                message: "unexpected `spin 1 2 3`".to_string()
            }
        );

        let err = parse_script("scale 1 2\n", defaults()).unwrap_err();
        assert!(matches!(err, EngineError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_zero_steps_is_a_parse_error() {
        let err = parse_script("rotate 0 0 90 in 0", defaults()).unwrap_err();
        assert_eq!(
            err,
            EngineError::Parse {
                line: 1,
                message: EngineError::ZeroSteps.to_string()
            }
        );
    }

    #[test]
    fn test_parse_keymap() {
        let keymap = "\
ArrowLeft, a, A, 4 => rotate 0 -30 0
Home=>rotate -30 -30 0 in 10
";
        let bindings = parse_keymap(keymap, defaults()).unwrap();
        let keys: Vec<&str> = bindings.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["ArrowLeft", "a", "A", "4", "Home"]);
        assert_eq!(bindings[0].1, Operation::rotate(0.0, -30.0, 0.0).with_timing(defaults()));
        assert_eq!(bindings[4].1.timing.steps.get(), 10);
    }

    #[test]
    fn test_keymap_requires_operation() {
        let err = parse_keymap("x =>\n", defaults()).unwrap_err();
        assert!(matches!(err, EngineError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_quoted_key_names() {
        let keymap = "\"#\", \",\" => scale 2 2 2 # comment\n\"=\", \" \" => translate 1 0 0\n";
        let bindings = parse_keymap(keymap, defaults()).unwrap();
        let keys: Vec<&str> = bindings.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["#", ",", "=", " "]);
        assert_eq!(bindings[0].1.kind, OperationKind::Scale);
        assert_eq!(bindings[3].1.kind, OperationKind::Translate);
    }
}
