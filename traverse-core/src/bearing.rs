use serde::{Deserialize, Serialize};

/// Compass octant used by quadrant bearings. `O` is west and `L` would be
/// east in Portuguese survey notation, but registries write east as `E`,
/// so the token set is N/S/E/O plus the four diagonals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardinalDirection {
    N,
    NE,
    E,
    SE,
    S,
    SO,
    O,
    NO,
}

impl CardinalDirection {
    /// Compass azimuth of the octant itself, in degrees clockwise from north.
    pub fn azimuth_deg(self) -> f64 {
        match self {
            CardinalDirection::N => 0.0,
            CardinalDirection::NE => 45.0,
            CardinalDirection::E => 90.0,
            CardinalDirection::SE => 135.0,
            CardinalDirection::S => 180.0,
            CardinalDirection::SO => 225.0,
            CardinalDirection::O => 270.0,
            CardinalDirection::NO => 315.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CardinalDirection::N => "N",
            CardinalDirection::NE => "NE",
            CardinalDirection::E => "E",
            CardinalDirection::SE => "SE",
            CardinalDirection::S => "S",
            CardinalDirection::SO => "SO",
            CardinalDirection::O => "O",
            CardinalDirection::NO => "NO",
        }
    }

    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "N" => Some(CardinalDirection::N),
            "NE" => Some(CardinalDirection::NE),
            "E" => Some(CardinalDirection::E),
            "SE" => Some(CardinalDirection::SE),
            "S" => Some(CardinalDirection::S),
            "SO" => Some(CardinalDirection::SO),
            "O" => Some(CardinalDirection::O),
            "NO" => Some(CardinalDirection::NO),
            _ => None,
        }
    }
}

/// All octants, in the order the segment editor offers them.
pub const CARDINAL_OPTIONS: [CardinalDirection; 8] = [
    CardinalDirection::N,
    CardinalDirection::S,
    CardinalDirection::E,
    CardinalDirection::O,
    CardinalDirection::NE,
    CardinalDirection::NO,
    CardinalDirection::SE,
    CardinalDirection::SO,
];

/// A quadrant bearing as parsed from a compact token such as `SO1235NE`
/// (SO 12°35'00" NE) or `N453015E` (N 45°30'15" E).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bearing {
    pub from: CardinalDirection,
    pub to: CardinalDirection,
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: u32,
}

// Two-letter codes first so "SO" never matches as "S" with a leftover "O".
const DIRECTION_TOKENS: [&str; 8] = ["NO", "NE", "SO", "SE", "N", "S", "E", "O"];

fn take_direction(s: &str) -> Option<(CardinalDirection, &str)> {
    for tok in DIRECTION_TOKENS {
        if let Some(rest) = s.strip_prefix(tok) {
            return CardinalDirection::from_token(tok).map(|d| (d, rest));
        }
    }
    None
}

/// Parse a compact bearing token: direction, 4 or 6 digits, direction.
///
/// Four digits are `ddmm` with seconds zero, six are `ddmmss`. Case does not
/// matter and surrounding whitespace is ignored. Anything else, including
/// out-of-range angle parts (deg > 89, min/sec > 59), yields `None` so the
/// caller can keep the raw text without touching the structured fields.
pub fn parse_bearing(raw: &str) -> Option<Bearing> {
    let token = raw.trim().to_ascii_uppercase();
    let (from, rest) = take_direction(&token)?;
    let digit_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digit_end];
    let (to, tail) = take_direction(&rest[digit_end..])?;
    if !tail.is_empty() {
        return None;
    }

    let (degrees, minutes, seconds) = match digits.len() {
        4 => (
            digits[0..2].parse().ok()?,
            digits[2..4].parse().ok()?,
            0u32,
        ),
        6 => (
            digits[0..2].parse().ok()?,
            digits[2..4].parse().ok()?,
            digits[4..6].parse().ok()?,
        ),
        _ => return None,
    };

    if degrees > 89 || minutes > 59 || seconds > 59 {
        return None;
    }

    Some(Bearing {
        from,
        to,
        degrees,
        minutes,
        seconds,
    })
}

/// Human-readable form of a bearing: `SO 12°35'0" NE`.
pub fn format_bearing(
    from: CardinalDirection,
    to: CardinalDirection,
    degrees: u32,
    minutes: u32,
    seconds: u32,
) -> String {
    format!(
        "{} {}\u{b0}{}'{}\" {}",
        from.as_str(),
        degrees,
        minutes,
        seconds,
        to.as_str()
    )
}

/// Convert a quadrant bearing into a compass azimuth in radians, [0, 2π).
///
/// The shortest signed delta between the two octant azimuths, canonicalized
/// into [-180, 180) by `((to - from + 540) mod 360) - 180`, decides whether
/// the traverse angle opens clockwise or counter-clockwise from the `from`
/// octant. This covers every octant pair, `from == to` included, with no
/// per-quadrant branching.
pub fn azimuth_rad(
    from: CardinalDirection,
    to: CardinalDirection,
    degrees: u32,
    minutes: u32,
    seconds: u32,
) -> f64 {
    let total_deg = degrees as f64 + minutes as f64 / 60.0 + seconds as f64 / 3600.0;
    let from_base = from.azimuth_deg();
    let to_base = to.azimuth_deg();
    let delta = (to_base - from_base + 540.0).rem_euclid(360.0) - 180.0;
    let signed = if delta >= 0.0 { total_deg } else { -total_deg };
    (from_base + signed).rem_euclid(360.0).to_radians()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_digit_token() {
        let b = parse_bearing("SO123500NE").unwrap();
        assert_eq!(b.from, CardinalDirection::SO);
        assert_eq!(b.to, CardinalDirection::NE);
        assert_eq!((b.degrees, b.minutes, b.seconds), (12, 35, 0));
    }

    #[test]
    fn parses_four_digit_token_with_zero_seconds() {
        let b = parse_bearing("n4530e").unwrap();
        assert_eq!(b.from, CardinalDirection::N);
        assert_eq!(b.to, CardinalDirection::E);
        assert_eq!((b.degrees, b.minutes, b.seconds), (45, 30, 0));
    }

    #[test]
    fn two_letter_directions_win_over_one_letter() {
        // "SO" must not parse as S followed by a stray O.
        let b = parse_bearing("SO0000SO").unwrap();
        assert_eq!(b.from, CardinalDirection::SO);
        assert_eq!(b.to, CardinalDirection::SO);
    }

    #[test]
    fn rejects_out_of_range_parts() {
        assert!(parse_bearing("N900000E").is_none()); // degrees > 89
        assert!(parse_bearing("N006000E").is_none()); // minutes > 59
        assert!(parse_bearing("N000060E").is_none()); // seconds > 59
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert!(parse_bearing("").is_none());
        assert!(parse_bearing("X1234N").is_none());
        assert!(parse_bearing("N12345E").is_none()); // five digits
        assert!(parse_bearing("N1234").is_none()); // missing second direction
        assert!(parse_bearing("N1234Ex").is_none()); // trailing junk
    }

    #[test]
    fn round_trips_through_format() {
        let b = parse_bearing("SO123545NE").unwrap();
        let s = format_bearing(b.from, b.to, b.degrees, b.minutes, b.seconds);
        assert_eq!(s, "SO 12\u{b0}35'45\" NE");
    }

    #[test]
    fn octant_bases_map_to_expected_azimuths() {
        assert_eq!(CardinalDirection::N.azimuth_deg(), 0.0);
        assert_eq!(CardinalDirection::E.azimuth_deg(), 90.0);
        assert_eq!(CardinalDirection::S.azimuth_deg(), 180.0);
        assert_eq!(CardinalDirection::O.azimuth_deg(), 270.0);
        assert_eq!(CardinalDirection::NO.azimuth_deg(), 315.0);
    }

    #[test]
    fn azimuth_opens_toward_the_to_octant() {
        // N toward E: azimuth equals the bearing angle itself.
        let az = azimuth_rad(CardinalDirection::N, CardinalDirection::E, 30, 0, 0);
        assert!((az.to_degrees() - 30.0).abs() < 1e-9);
        // N toward O: angle opens counter-clockwise, wraps below 360.
        let az = azimuth_rad(CardinalDirection::N, CardinalDirection::O, 30, 0, 0);
        assert!((az.to_degrees() - 330.0).abs() < 1e-9);
        // SO toward NE: opposite octants, the canonicalized delta lands on
        // -180, so the angle opens counter-clockwise from SO.
        let az = azimuth_rad(CardinalDirection::SO, CardinalDirection::NE, 12, 35, 0);
        let expected = 225.0 - (12.0 + 35.0 / 60.0);
        assert!((az.to_degrees() - expected).abs() < 1e-9);
    }

    #[test]
    fn azimuth_with_equal_octants_stays_on_base() {
        let az = azimuth_rad(CardinalDirection::SE, CardinalDirection::SE, 0, 0, 0);
        assert!((az.to_degrees() - 135.0).abs() < 1e-9);
    }

    #[test]
    fn fractional_minutes_and_seconds_accumulate() {
        let az = azimuth_rad(CardinalDirection::N, CardinalDirection::E, 10, 30, 36);
        assert!((az.to_degrees() - (10.0 + 0.5 + 0.01)).abs() < 1e-9);
    }
}
