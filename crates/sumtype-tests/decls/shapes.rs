use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub radius: f64,
    pub label: String,
}

impl Circle {
    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Square {
    pub side: f64,
    pub label: String,
}

impl Square {
    pub fn area(&self) -> f64 {
        self.side * self.side
    }
}

/// A drawable shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[union(Circle, Square)]
pub struct Shape;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[union(String, i32)]
pub struct Scalar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[union(u8, u16, u32)]
pub struct Three;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[union(u8, u16, u32, u64)]
pub struct Four;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[union(u8, u16, u32, u64, i8)]
pub struct Five;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[union(Vec<u8>, Option<String>)]
pub struct Packet;
