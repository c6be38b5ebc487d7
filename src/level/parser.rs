//! Line-record level format
//!
//! One record per line, fields separated by `;`, first field is the tag.
//! Save games use the same format, so every record can also be written back
//! out through `Display`.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;

use crate::error::RecordError;

/// One parsed line
#[derive(Debug, Clone, PartialEq)]
pub enum LevelRecord {
    /// Static blocking body
    Platform { sprite: String, pos: Vec2, half: Vec2 },
    Coin { pos: Vec2 },
    /// Pushable dynamic body
    Box { sprite: String, pos: Vec2, half: Vec2 },
    IntermittentPlatform { pos: Vec2 },
    /// Basic patrol enemy
    Enemy { pos: Vec2 },
    Length(f32),
    StartingPosition(Vec2),
    /// Rebuild a built-in level (save games)
    Level(u32),
    Score(u32),
    /// Elapsed level time in seconds
    Time(u64),
    /// Player position relative to the scrolled view, plus the sword flag
    Player { pos: Vec2, has_sword: bool },
    /// Camera offset to restore
    Camera(f32),
}

impl LevelRecord {
    pub fn tag(&self) -> &'static str {
        match self {
            LevelRecord::Platform { .. } => "platform",
            LevelRecord::Coin { .. } => "coin",
            LevelRecord::Box { .. } => "box",
            LevelRecord::IntermittentPlatform { .. } => "intermittentplatform",
            LevelRecord::Enemy { .. } => "enemy",
            LevelRecord::Length(_) => "length",
            LevelRecord::StartingPosition(_) => "startingPosition",
            LevelRecord::Level(_) => "level",
            LevelRecord::Score(_) => "score",
            LevelRecord::Time(_) => "time",
            LevelRecord::Player { .. } => "player",
            LevelRecord::Camera(_) => "camera",
        }
    }
}

impl fmt::Display for LevelRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};", self.tag())?;
        match self {
            LevelRecord::Platform { sprite, pos, half } | LevelRecord::Box { sprite, pos, half } => {
                write!(f, "{sprite};{};{};{};{};", pos.x, pos.y, half.x, half.y)
            }
            LevelRecord::Coin { pos }
            | LevelRecord::IntermittentPlatform { pos }
            | LevelRecord::Enemy { pos }
            | LevelRecord::StartingPosition(pos) => write!(f, "{};{};", pos.x, pos.y),
            LevelRecord::Length(length) => write!(f, "{length};"),
            LevelRecord::Level(index) => write!(f, "{index};"),
            LevelRecord::Score(score) => write!(f, "{score};"),
            LevelRecord::Time(secs) => write!(f, "{secs};"),
            LevelRecord::Player { pos, has_sword } => {
                write!(f, "{};{};{has_sword};", pos.x, pos.y)
            }
            LevelRecord::Camera(offset) => write!(f, "{offset};"),
        }
    }
}

/// Sequential field reader for one line
struct Fields<'a> {
    tag: &'static str,
    values: std::vec::IntoIter<&'a str>,
}

impl<'a> Fields<'a> {
    fn text(&mut self, field: &'static str) -> Result<&'a str, RecordError> {
        self.values.next().ok_or(RecordError::MissingField {
            tag: self.tag,
            field,
        })
    }

    fn number<T: FromStr>(&mut self, field: &'static str) -> Result<T, RecordError> {
        let value = self.text(field)?;
        value.parse().map_err(|_| RecordError::InvalidNumber {
            tag: self.tag,
            field,
            value: value.to_string(),
        })
    }

    /// A finite float; `NaN` and infinities are rejected
    fn real(&mut self, field: &'static str) -> Result<f32, RecordError> {
        let value = self.text(field)?;
        value
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| RecordError::InvalidNumber {
                tag: self.tag,
                field,
                value: value.to_string(),
            })
    }

    /// Anything other than a case-insensitive `true` reads as false
    fn flag(&mut self, field: &'static str) -> Result<bool, RecordError> {
        Ok(self.text(field)?.eq_ignore_ascii_case("true"))
    }

    fn vec2(&mut self, x: &'static str, y: &'static str) -> Result<Vec2, RecordError> {
        Ok(Vec2::new(self.real(x)?, self.real(y)?))
    }
}

fn known_tag(tag: &str) -> Option<&'static str> {
    Some(match tag {
        "platform" => "platform",
        "coin" => "coin",
        "box" => "box",
        "intermittentplatform" => "intermittentplatform",
        "enemy" => "enemy",
        "length" => "length",
        "startingPosition" => "startingPosition",
        "level" => "level",
        "score" => "score",
        "time" => "time",
        "player" => "player",
        "camera" => "camera",
        _ => return None,
    })
}

/// Parse one line. Blank lines yield `Ok(None)`.
///
/// A trailing `;` is optional and fields beyond the ones a tag needs are
/// ignored.
pub fn parse_line(line: &str) -> Result<Option<LevelRecord>, RecordError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut values: Vec<&str> = line.split(';').map(str::trim).collect();
    if values.last() == Some(&"") {
        values.pop();
    }
    let mut values = values.into_iter();
    let raw_tag = values.next().unwrap_or_default();
    let tag = known_tag(raw_tag).ok_or_else(|| RecordError::UnknownTag(raw_tag.to_string()))?;
    let mut fields = Fields { tag, values };

    let record = match tag {
        "platform" | "box" => {
            let sprite = fields.text("sprite")?.to_string();
            let pos = fields.vec2("x", "y")?;
            let half = fields.vec2("half_width", "half_height")?;
            if tag == "platform" {
                LevelRecord::Platform { sprite, pos, half }
            } else {
                LevelRecord::Box { sprite, pos, half }
            }
        }
        "coin" => LevelRecord::Coin {
            pos: fields.vec2("x", "y")?,
        },
        "intermittentplatform" => LevelRecord::IntermittentPlatform {
            pos: fields.vec2("x", "y")?,
        },
        "enemy" => LevelRecord::Enemy {
            pos: fields.vec2("x", "y")?,
        },
        "length" => LevelRecord::Length(fields.real("length")?),
        "startingPosition" => LevelRecord::StartingPosition(fields.vec2("x", "y")?),
        "level" => LevelRecord::Level(fields.number("index")?),
        "score" => {
            // Negative scores load as zero
            let score: i64 = fields.number("score")?;
            LevelRecord::Score(u32::try_from(score.max(0)).unwrap_or(u32::MAX))
        }
        "time" => LevelRecord::Time(fields.number("seconds")?),
        "player" => LevelRecord::Player {
            pos: fields.vec2("x", "y")?,
            has_sword: fields.flag("has_sword")?,
        },
        "camera" => LevelRecord::Camera(fields.real("offset")?),
        _ => return Err(RecordError::UnknownTag(raw_tag.to_string())),
    };
    Ok(Some(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_coin() {
        assert_eq!(
            parse_line("coin;12.5;-3.0;"),
            Ok(Some(LevelRecord::Coin {
                pos: Vec2::new(12.5, -3.0)
            }))
        );
    }

    #[test]
    fn test_parse_platform() {
        let record = parse_line("platform;platform_wood_medium;6.575;-9.375;1.675;4.8;").unwrap();
        assert_eq!(
            record,
            Some(LevelRecord::Platform {
                sprite: "platform_wood_medium".to_string(),
                pos: Vec2::new(6.575, -9.375),
                half: Vec2::new(1.675, 4.8),
            })
        );
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        assert_eq!(parse_line(""), Ok(None));
        assert_eq!(parse_line("   \t"), Ok(None));
    }

    #[test]
    fn test_trailing_separator_is_optional() {
        assert_eq!(parse_line("score;42"), Ok(Some(LevelRecord::Score(42))));
        assert_eq!(parse_line("score;42;"), Ok(Some(LevelRecord::Score(42))));
    }

    #[test]
    fn test_player_sword_flag() {
        let parsed = |line| match parse_line(line) {
            Ok(Some(LevelRecord::Player { has_sword, .. })) => has_sword,
            other => panic!("unexpected {other:?}"),
        };
        assert!(parsed("player;1;2;true;"));
        assert!(parsed("player;1;2;TRUE;"));
        assert!(!parsed("player;1;2;false;"));
        assert!(!parsed("player;1;2;yes;"));
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(
            parse_line("spaceship;1;2;"),
            Err(RecordError::UnknownTag("spaceship".to_string()))
        );
    }

    #[test]
    fn test_missing_and_invalid_fields() {
        assert_eq!(
            parse_line("coin;1.0;"),
            Err(RecordError::MissingField {
                tag: "coin",
                field: "y"
            })
        );
        assert_eq!(
            parse_line("enemy;left;2;"),
            Err(RecordError::InvalidNumber {
                tag: "enemy",
                field: "x",
                value: "left".to_string()
            })
        );
        assert!(parse_line("score;five;").is_err());
    }

    #[test]
    fn test_negative_score_loads_as_zero() {
        assert_eq!(parse_line("score;-5;"), Ok(Some(LevelRecord::Score(0))));
        assert_eq!(
            parse_line("score;99999999999;"),
            Ok(Some(LevelRecord::Score(u32::MAX)))
        );
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        for line in ["camera;NaN;", "camera;inf;", "length;-inf;", "coin;1;nan;"] {
            assert!(
                matches!(parse_line(line), Err(RecordError::InvalidNumber { .. })),
                "{line} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_reads_back() {
        let records = [
            LevelRecord::Level(2),
            LevelRecord::Score(130),
            LevelRecord::Player {
                pos: Vec2::new(0.25, -6.5),
                has_sword: true,
            },
            LevelRecord::Time(37),
            LevelRecord::Camera(41.5),
            LevelRecord::Box {
                sprite: "crate".to_string(),
                pos: Vec2::new(3.0, 4.0),
                half: Vec2::new(0.5, 0.5),
            },
        ];
        for record in records {
            let line = record.to_string();
            assert!(line.ends_with(';'));
            assert_eq!(parse_line(&line), Ok(Some(record)));
        }
    }

    proptest! {
        #[test]
        fn prop_any_line_parses_or_errors(line in ".*") {
            let _ = parse_line(&line);
        }

        #[test]
        fn prop_known_tags_with_garbage_never_panic(
            tag in prop::sample::select(vec!["platform", "coin", "box", "player", "time", "camera"]),
            rest in "[-0-9a-z.;]{0,30}",
        ) {
            let _ = parse_line(&format!("{tag};{rest}"));
        }
    }
}
