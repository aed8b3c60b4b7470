#![allow(dead_code)]

use freehub::sans::{
    check::compute_checksum,
    frame::{COMMAND_SYNC, SENSOR_SYNC},
};

/// Build a tagged sensor frame around a page.
pub fn sensor_frame(device: u8, page: [u8; 8]) -> Vec<u8> {
    let mut body = vec![8, device];
    body.extend_from_slice(&page);
    wrap(SENSOR_SYNC, body)
}

/// Build an untagged sensor frame around a page.
pub fn untagged_frame(page: [u8; 8]) -> Vec<u8> {
    let mut body = vec![8];
    body.extend_from_slice(&page);
    wrap(SENSOR_SYNC, body)
}

/// Build a command frame around a text payload.
pub fn command_frame(text: &str) -> Vec<u8> {
    let mut body = vec![text.len() as u8];
    body.extend_from_slice(text.as_bytes());
    wrap(COMMAND_SYNC, body)
}

fn wrap(sync: u8, body: Vec<u8>) -> Vec<u8> {
    let checksum = compute_checksum(0, &body);
    let mut frame = vec![sync];
    frame.extend(body);
    frame.push(checksum);
    frame
}

pub const FITNESS_EQUIPMENT: u8 = 17;
pub const POWER_METER: u8 = 11;
pub const HEART_RATE: u8 = 120;
