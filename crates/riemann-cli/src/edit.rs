//! Text edits from the interactive surface.
//!
//! Each field parses its own text. A parse failure yields
//! [`RiemannError::InvalidEditInput`] and the caller keeps its previous
//! settings; nothing recomputes for a rejected edit.

use std::fmt;

use riemann_core::{RiemannError, RiemannResult, SamplingRule, Settings};

/// Largest sample count the harness will compute. Every count is
/// materialised as `n + 1` points, so anything above this is rejected before
/// it reaches the engine.
pub const MAX_SAMPLE_COUNT: usize = 10_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Samples,
    Task,
    Start,
    End,
    Rule,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Self::Samples,
        Self::Task,
        Self::Start,
        Self::End,
        Self::Rule,
    ];

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Current value of this field, as shown in its input box.
    pub fn current(self, settings: &Settings) -> String {
        match self {
            Self::Samples => settings.sample_count.to_string(),
            Self::Task => settings.formula_id.to_string(),
            Self::Start => settings.start.to_string(),
            Self::End => settings.end.to_string(),
            Self::Rule => settings.rule.to_string(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Samples => write!(f, "Samples"),
            Self::Task => write!(f, "Task"),
            Self::Start => write!(f, "Start"),
            Self::End => write!(f, "End"),
            Self::Rule => write!(f, "Rule"),
        }
    }
}

/// Parse `text` for `field` and return the replacement settings.
///
/// Samples, Task, Start and End accept integers only. Samples above
/// [`MAX_SAMPLE_COUNT`] are rejected like any other unparseable input.
pub fn apply_edit(settings: &Settings, field: Field, text: &str) -> RiemannResult<Settings> {
    let text = text.trim();
    let invalid = || RiemannError::InvalidEditInput {
        field: field.to_string(),
        input: text.to_string(),
    };

    let edited = match field {
        Field::Samples => {
            let n: usize = text.parse().map_err(|_| invalid())?;
            if n > MAX_SAMPLE_COUNT {
                return Err(invalid());
            }
            settings.with_sample_count(n)
        }
        Field::Task => settings.with_formula_id(text.parse().map_err(|_| invalid())?),
        Field::Start => settings.with_start(text.parse::<i64>().map_err(|_| invalid())? as f64),
        Field::End => settings.with_end(text.parse::<i64>().map_err(|_| invalid())? as f64),
        Field::Rule => settings.with_rule(text.parse::<SamplingRule>().map_err(|_| invalid())?),
    };
    Ok(edited)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_integer_edits() {
        let s = Settings::default();
        assert_eq!(apply_edit(&s, Field::Samples, "25").unwrap().sample_count, 25);
        assert_eq!(apply_edit(&s, Field::Task, " 22 ").unwrap().formula_id, 22);
        assert_eq!(apply_edit(&s, Field::Start, "-3").unwrap().start, -3.0);
        assert_eq!(apply_edit(&s, Field::End, "4").unwrap().end, 4.0);
    }

    #[test]
    fn test_non_integer_rejected() {
        let s = Settings::default();
        for (field, text) in [
            (Field::Samples, "ten"),
            (Field::Samples, "-5"),
            (Field::Task, "2.0"),
            (Field::Start, "0.5"),
            (Field::End, ""),
        ] {
            let err = apply_edit(&s, field, text).unwrap_err();
            assert!(matches!(err, RiemannError::InvalidEditInput { .. }));
        }
    }

    #[test]
    fn test_sample_ceiling() {
        let s = Settings::default();
        let at_max = apply_edit(&s, Field::Samples, &MAX_SAMPLE_COUNT.to_string()).unwrap();
        assert_eq!(at_max.sample_count, MAX_SAMPLE_COUNT);

        for text in ["10000001", "1000000000000"] {
            let err = apply_edit(&s, Field::Samples, text).unwrap_err();
            assert!(matches!(err, RiemannError::InvalidEditInput { .. }));
        }
    }

    #[test]
    fn test_unknown_task_is_accepted_by_edit() {
        // The formula table decides, not the edit parser.
        let s = apply_edit(&Settings::default(), Field::Task, "999").unwrap();
        assert_eq!(s.formula_id, 999);
    }

    #[test]
    fn test_rule_edit() {
        let s = Settings::default();
        assert_eq!(apply_edit(&s, Field::Rule, "left").unwrap().rule, SamplingRule::Left);
        assert_eq!(apply_edit(&s, Field::Rule, "4").unwrap().rule, SamplingRule::Random);
        assert!(apply_edit(&s, Field::Rule, "7").is_err());
    }

    #[test]
    fn test_edit_keeps_other_fields() {
        let s = Settings::new(31, -1.0, 3.0, 12, SamplingRule::Right);
        let edited = apply_edit(&s, Field::End, "5").unwrap();
        assert_eq!(edited, Settings::new(31, -1.0, 5.0, 12, SamplingRule::Right));
    }

    #[test]
    fn test_field_cycle() {
        assert_eq!(Field::Rule.next(), Field::Samples);
        assert_eq!(Field::Samples.prev(), Field::Rule);
        assert_eq!(Field::Task.next().prev(), Field::Task);
    }

    #[test]
    fn test_field_current() {
        let s = Settings::default();
        assert_eq!(Field::Samples.current(&s), "10");
        assert_eq!(Field::Rule.current(&s), "middle");
        assert_eq!(Field::Start.current(&s), "0");
    }
}
