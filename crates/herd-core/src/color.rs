//! Herd colour derivation.
//!
//! A herd's display colour is a pure function of its leader's id: a
//! ChaCha8 generator seeded with the id draws a hue and then a
//! saturation and value inside fixed high bands. Every member of a herd
//! therefore renders identically, and re-linking a follower to the same
//! leader reproduces the same colour without any stored colour table.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::id::AgentId;

/// Lowest saturation a herd colour may have.
pub const SATURATION_FLOOR: u8 = 200;
/// Lowest value (brightness) a herd colour may have.
pub const VALUE_FLOOR: u8 = 200;

/// An HSV colour key shared by a leader and its herd.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HerdColor {
    /// Hue in degrees, `0..360`.
    pub hue: u16,
    /// Saturation, `200..=255`.
    pub saturation: u8,
    /// Value, `200..=255`.
    pub value: u8,
}

impl HerdColor {
    /// Derive the colour for the herd led by `leader`.
    pub fn for_leader(leader: AgentId) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(u64::from(leader.0));
        let hue = rng.gen_range(0..360u16);
        let saturation = rng.gen_range(SATURATION_FLOOR..=u8::MAX);
        let value = rng.gen_range(VALUE_FLOOR..=u8::MAX);
        Self {
            hue,
            saturation,
            value,
        }
    }

    /// Convert to 8-bit RGB.
    pub fn to_rgb(self) -> [u8; 3] {
        let h = f64::from(self.hue) / 60.0;
        let s = f64::from(self.saturation) / 255.0;
        let v = f64::from(self.value) / 255.0;

        let sector = h.floor();
        let frac = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * frac);
        let t = v * (1.0 - s * (1.0 - frac));

        let (r, g, b) = match sector as u32 % 6 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        let to_byte = |c: f64| (c * 255.0).round().clamp(0.0, 255.0) as u8;
        [to_byte(r), to_byte(g), to_byte(b)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn same_leader_same_color() {
        assert_eq!(
            HerdColor::for_leader(AgentId(4)),
            HerdColor::for_leader(AgentId(4))
        );
    }

    #[test]
    fn distinct_leaders_usually_differ() {
        let colors: std::collections::HashSet<_> =
            (1..=20).map(|i| HerdColor::for_leader(AgentId(i))).collect();
        assert!(colors.len() > 15, "only {} distinct colours", colors.len());
    }

    #[test]
    fn pure_red_converts() {
        let red = HerdColor {
            hue: 0,
            saturation: 255,
            value: 255,
        };
        assert_eq!(red.to_rgb(), [255, 0, 0]);
    }

    proptest! {
        #[test]
        fn derived_colors_stay_in_bands(id in 1u32..1_000_000) {
            let c = HerdColor::for_leader(AgentId(id));
            prop_assert!(c.hue < 360);
            prop_assert!(c.saturation >= SATURATION_FLOOR);
            prop_assert!(c.value >= VALUE_FLOOR);
        }
    }
}
