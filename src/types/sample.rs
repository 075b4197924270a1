/// Raw acceleration triple as produced by a source, in g.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Reading {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A reading stamped with the session's logical clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub timestamp: u64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Sample {
    pub fn new(timestamp: u64, reading: Reading) -> Self {
        Self {
            timestamp,
            x: reading.x,
            y: reading.y,
            z: reading.z,
        }
    }
}
