use crate::shapes::{Circle, Scalar, Shape, Square};

#[derive(Debug, Clone, PartialEq)]
#[union(String, u16)]
pub struct Problem;

/// Drawing either yields a shape or explains why not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[result(Shape, String)]
pub struct Drawn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[result(i32, String)]
pub struct Parsed;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[result(String)]
pub struct Saved;

// Scalar and Problem both carry a String, so neither side's variants
// convert directly.
#[derive(Debug, Clone, PartialEq)]
#[result(Scalar, Problem)]
pub struct Mixed;

#[derive(Debug, Clone, PartialEq)]
#[union(Circle, String)]
pub struct Sketch;

// The error type is also a sketch variant, so circles do not convert
// straight into the result.
#[derive(Debug, Clone, PartialEq)]
#[result(Sketch, String)]
pub struct Sketched;
