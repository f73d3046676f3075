//! BDD step definitions for parameter classification

use cucumber::{given, then, when};

use aquasense::status::{Band, CartridgeTier};

use crate::world::AquaSenseWorld;

#[given(expr = "a band from {float} to {float}")]
fn ranged_band(world: &mut AquaSenseWorld, min: f64, max: f64) {
    world.band = Some(Band::new(min, max));
}

#[given(expr = "a reversed band with maximum {float}")]
fn reversed_band(world: &mut AquaSenseWorld, max: f64) {
    world.band = Some(Band::reversed(max));
}

#[when(expr = "the value {float} is classified")]
fn classify(world: &mut AquaSenseWorld, value: f64) {
    let band = world.band.expect("band not configured");
    world.status = Some(band.classify(value));
}

#[then(expr = "the status should be {string}")]
fn status_should_be(world: &mut AquaSenseWorld, expected: String) {
    let status = world.status.expect("no value classified");
    assert_eq!(status.to_string(), expected);
}

#[when(expr = "a cartridge reports a level of {float}")]
fn cartridge_level(world: &mut AquaSenseWorld, level: f64) {
    world.tier = Some(CartridgeTier::for_level(level));
}

#[then(expr = "the cartridge tier should be {string}")]
fn tier_should_be(world: &mut AquaSenseWorld, expected: String) {
    let tier = world.tier.expect("no cartridge level reported");
    assert_eq!(format!("{:?}", tier).to_lowercase(), expected);
}
