//! Square-root color scales shared by every facet being compared.

use anyhow::{Result, anyhow};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    /// Fill for regions with no value.
    pub const NO_DATA: Rgb = Rgb(0xCC, 0xCC, 0xCC);
}

impl FromStr for Rgb {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow!("expected #RRGGBB, got {s:?}"));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Global `[min, max]` over every value being compared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    /// `None` when there are no finite values.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Domain> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some(Domain { min: v, max: v }),
                Some(d) => Some(Domain {
                    min: d.min.min(v),
                    max: d.max.max(v),
                }),
            })
    }

    /// Position of `value` in the domain after the square-root transform.
    /// A degenerate domain maps everything to 0.5.
    pub fn sqrt_position(&self, value: f64) -> f64 {
        if self.max == self.min {
            return 0.5;
        }
        let linear = ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0);
        linear.sqrt()
    }
}

/// Interpolates from white toward `target` by the square-root position of
/// `value` in `domain`.
pub fn shade(value: f64, domain: Domain, target: Rgb) -> Rgb {
    let t = domain.sqrt_position(value);
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    let base = Rgb::WHITE;
    Rgb(
        lerp(base.0, target.0),
        lerp(base.1, target.1),
        lerp(base.2, target.2),
    )
}

/// Green lightness ramp used by the borough choropleth.
///
/// Never fully white: the position is lifted to `0.2 + 0.8 * sqrt(..)` and
/// mapped to HSL lightness 90% down to 40% at hue 105.
pub fn choropleth(value: f64, domain: Domain) -> Rgb {
    const HUE: f64 = 105.0;

    let t = 0.2 + 0.8 * domain.sqrt_position(value);
    let l = (90.0 - t * 50.0) / 100.0;
    let a = 40.0 * l.min(1.0 - l) / 100.0;
    let f = |n: f64| {
        let k = (n + HUE / 30.0) % 12.0;
        let c = l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0);
        (255.0 * c).round() as u8
    };
    Rgb(f(0.0), f(8.0), f(4.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain(min: f64, max: f64) -> Domain {
        Domain { min, max }
    }

    #[test]
    fn test_hex_parse_and_format() {
        let c: Rgb = "#F58518".parse().unwrap();
        assert_eq!(c, Rgb(0xF5, 0x85, 0x18));
        assert_eq!(c.to_string(), "#f58518");
        assert!("#F5851".parse::<Rgb>().is_err());
        assert!("#GG0000".parse::<Rgb>().is_err());
        assert!("#+F+F+F".parse::<Rgb>().is_err());
        assert!("#-1-1-1".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_domain_from_values() {
        let d = Domain::from_values([3.0, f64::NAN, 1.0, 7.0]).unwrap();
        assert_eq!(d, domain(1.0, 7.0));
        assert!(Domain::from_values(Vec::<f64>::new()).is_none());
    }

    #[test]
    fn test_shade_endpoints() {
        let target = Rgb(0x4C, 0x78, 0xA8);
        let d = domain(10.0, 50.0);
        assert_eq!(shade(10.0, d, target), Rgb::WHITE);
        assert_eq!(shade(50.0, d, target), target);
    }

    #[test]
    fn test_shade_uses_sqrt_not_linear() {
        let target = Rgb(0, 0, 0);
        // A quarter of the way linearly is half way after sqrt.
        let c = shade(25.0, domain(0.0, 100.0), target);
        assert_eq!(c, Rgb(128, 128, 128));
    }

    #[test]
    fn test_shade_degenerate_domain_is_midpoint() {
        let c = shade(5.0, domain(5.0, 5.0), Rgb(1, 1, 1));
        assert_eq!(c, Rgb(128, 128, 128));
    }

    #[test]
    fn test_shade_is_monotonic() {
        let target = Rgb(0x54, 0xA2, 0x4B);
        let d = domain(0.0, 1.0);
        let mut prev = shade(0.0, d, target);
        for i in 1..=100 {
            let next = shade(i as f64 / 100.0, d, target);
            // Every channel moves from 255 down toward a darker target.
            assert!(next.0 <= prev.0 && next.1 <= prev.1 && next.2 <= prev.2);
            prev = next;
        }
    }

    #[test]
    fn test_out_of_domain_values_clamp() {
        let target = Rgb(0, 0, 0);
        let d = domain(0.0, 1.0);
        assert_eq!(shade(-3.0, d, target), Rgb::WHITE);
        assert_eq!(shade(9.0, d, target), target);
    }

    #[test]
    fn test_choropleth_darkens_with_value() {
        let d = domain(0.0, 100.0);
        let low = choropleth(0.0, d);
        let high = choropleth(100.0, d);
        let lum = |c: Rgb| c.0 as u32 + c.1 as u32 + c.2 as u32;
        assert!(lum(low) > lum(high));
        // Green dominates at hue 105.
        assert!(high.1 > high.0 && high.1 > high.2);
    }

    #[test]
    fn test_choropleth_exact_colors() {
        let d = domain(0.0, 100.0);
        assert_eq!(choropleth(0.0, d).to_string(), "#c2e0b8");
        assert_eq!(choropleth(100.0, d).to_string(), "#528f3d");
        assert_eq!(choropleth(7.0, domain(7.0, 7.0)).to_string(), "#85c270");
    }
}
