// Tri-state cell parsing and the four-way merge.
//
// Every configurable text or integer field in a `Form` is a `Cell`: the user
// either left it blank (Autofill), typed SKIP (Omit: drop the line from the
// document), typed NONE (Disable: neutralize the parameter or module), or
// typed a concrete value (Literal). After resolution no Autofill remains; the
// field is a `Resolved` value that is either concrete, omitted or disabled.
//
// `resolve()` is the single authority for merging user cells with derived
// defaults. Nothing else in the engine is allowed to reinterpret a cell.
//
// Integer cells degrade silently: a literal that does not parse as an integer
// becomes Autofill and falls back to the derived default. This leniency is kept
// for compatibility with existing forms; the degrade is logged at debug level
// so hosts can surface it if they want stricter feedback.
//
// Serde support lets hosts write forms as JSON using the same grammar as the
// text cells ("" / "skip" / "none" / value), or plain JSON numbers for integer
// cells.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A user-supplied configuration value before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell<T> {
    /// Blank input: use the derived default.
    Autofill,
    /// "skip": suppress this line from the rendered document.
    Omit,
    /// "none": switch the parameter (or its whole module) off.
    Disable,
    /// A concrete user value, which always overrides the default.
    Literal(T),
}

impl<T> Default for Cell<T> {
    fn default() -> Self {
        Cell::Autofill
    }
}

pub type TextCell = Cell<String>;
pub type IntCell = Cell<i64>;

impl TextCell {
    /// Convenience for building literal text cells in presets and tests.
    pub fn text(value: &str) -> Self {
        Cell::Literal(value.to_string())
    }
}

/// A field after merging with its default. Never Autofill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<T> {
    Omit,
    Disable,
    Value(T),
}

impl<T: fmt::Display> Resolved<T> {
    /// The text to render for this field, or `None` when the line should be
    /// dropped (omitted, disabled, or an empty value).
    pub fn rendered(&self) -> Option<String> {
        match self {
            Resolved::Value(v) => {
                let text = v.to_string();
                if text.trim().is_empty() { None } else { Some(text) }
            }
            Resolved::Omit | Resolved::Disable => None,
        }
    }
}

impl<T> Resolved<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Resolved::Value(v) => Some(v),
            Resolved::Omit | Resolved::Disable => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
        match self {
            Resolved::Omit => Resolved::Omit,
            Resolved::Disable => Resolved::Disable,
            Resolved::Value(v) => Resolved::Value(f(v)),
        }
    }
}

/// Classify a raw text cell.
///
/// Empty or whitespace-only input is Autofill; "skip" and "none" (any case,
/// surrounding whitespace ignored) are Omit and Disable; everything else is a
/// Literal holding the trimmed text.
pub fn parse_cell(raw: &str) -> TextCell {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Cell::Autofill
    } else if trimmed.eq_ignore_ascii_case("skip") {
        Cell::Omit
    } else if trimmed.eq_ignore_ascii_case("none") {
        Cell::Disable
    } else {
        Cell::Literal(trimmed.to_string())
    }
}

/// Classify a raw integer cell. A literal that is not an integer degrades to
/// Autofill.
pub fn parse_int_cell(raw: &str) -> IntCell {
    match parse_cell(raw) {
        Cell::Autofill => Cell::Autofill,
        Cell::Omit => Cell::Omit,
        Cell::Disable => Cell::Disable,
        Cell::Literal(text) => match text.parse::<i64>() {
            Ok(n) => Cell::Literal(n),
            Err(_) => {
                tracing::debug!(input = %text, "non-integer cell treated as autofill");
                Cell::Autofill
            }
        },
    }
}

/// Merge a user cell with its default: Omit and Disable pass through,
/// Autofill takes the default, Literal overrides it.
pub fn resolve<T: Clone>(user: &Cell<T>, default: T) -> Resolved<T> {
    match user {
        Cell::Omit => Resolved::Omit,
        Cell::Disable => Resolved::Disable,
        Cell::Autofill => Resolved::Value(default),
        Cell::Literal(v) => Resolved::Value(v.clone()),
    }
}

/// Clamp an integer into the percentage range [0, 100].
pub fn clamp(n: i64) -> i64 {
    n.clamp(0, 100)
}

/// `resolve()` for percentage attributes: literals are clamped into [0, 100]
/// like the derived defaults are.
pub fn resolve_pct(user: &IntCell, default: i64) -> Resolved<i64> {
    resolve(user, default).map(clamp)
}

// ---------------------------------------------------------------------------
// Serde
// ---------------------------------------------------------------------------

impl<T: Serialize> Serialize for Cell<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Autofill => serializer.serialize_str(""),
            Cell::Omit => serializer.serialize_str("skip"),
            Cell::Disable => serializer.serialize_str("none"),
            Cell::Literal(v) => v.serialize(serializer),
        }
    }
}

struct TextCellVisitor;

impl Visitor<'_> for TextCellVisitor {
    type Value = TextCell;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<TextCell, E> {
        Ok(parse_cell(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<TextCell, E> {
        Ok(Cell::Literal(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<TextCell, E> {
        Ok(Cell::Literal(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<TextCell, E> {
        Ok(Cell::Literal(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<TextCell, E> {
        Ok(Cell::Autofill)
    }

    fn visit_none<E: de::Error>(self) -> Result<TextCell, E> {
        Ok(Cell::Autofill)
    }
}

impl<'de> Deserialize<'de> for TextCell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TextCellVisitor)
    }
}

struct IntCellVisitor;

impl Visitor<'_> for IntCellVisitor {
    type Value = IntCell;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer, a string, or null")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<IntCell, E> {
        Ok(parse_int_cell(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<IntCell, E> {
        Ok(Cell::Literal(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<IntCell, E> {
        Ok(i64::try_from(v).map_or(Cell::Autofill, Cell::Literal))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<IntCell, E> {
        // Same policy as text input: "72.5" is not an integer.
        tracing::debug!(input = v, "non-integer cell treated as autofill");
        Ok(Cell::Autofill)
    }

    fn visit_unit<E: de::Error>(self) -> Result<IntCell, E> {
        Ok(Cell::Autofill)
    }

    fn visit_none<E: de::Error>(self) -> Result<IntCell, E> {
        Ok(Cell::Autofill)
    }
}

impl<'de> Deserialize<'de> for IntCell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IntCellVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_classification() {
        assert_eq!(parse_cell(""), Cell::Autofill);
        assert_eq!(parse_cell("   \t"), Cell::Autofill);
        assert_eq!(parse_cell("skip"), Cell::Omit);
        assert_eq!(parse_cell(" SKIP "), Cell::Omit);
        assert_eq!(parse_cell("None"), Cell::Disable);
        assert_eq!(parse_cell("NONE"), Cell::Disable);
        assert_eq!(parse_cell("  radial seep "), Cell::text("radial seep"));
        // Only the exact keywords are special.
        assert_eq!(parse_cell("nonesuch"), Cell::text("nonesuch"));
    }

    #[test]
    fn test_parse_int_cell() {
        assert_eq!(parse_int_cell("72"), Cell::Literal(72));
        assert_eq!(parse_int_cell(" -5 "), Cell::Literal(-5));
        assert_eq!(parse_int_cell(""), Cell::Autofill);
        assert_eq!(parse_int_cell("skip"), Cell::Omit);
        assert_eq!(parse_int_cell("none"), Cell::Disable);
    }

    #[test]
    fn test_parse_int_cell_degrades_to_autofill() {
        assert_eq!(parse_int_cell("seventy"), Cell::Autofill);
        assert_eq!(parse_int_cell("72.5"), Cell::Autofill);
        assert_eq!(parse_int_cell("12%"), Cell::Autofill);
    }

    #[test]
    fn test_resolve_four_way() {
        for default in [0, 42, 100] {
            assert_eq!(resolve(&Cell::Omit, default), Resolved::Omit);
            assert_eq!(resolve(&Cell::Disable, default), Resolved::Disable);
            assert_eq!(resolve(&Cell::Autofill, default), Resolved::Value(default));
            assert_eq!(resolve(&Cell::Literal(7), default), Resolved::Value(7));
        }
        assert_eq!(
            resolve(&Cell::text("loop"), "drift".to_string()),
            Resolved::Value("loop".to_string())
        );
    }

    #[test]
    fn test_clamp_always_in_range() {
        for n in [i64::MIN, -1000, -1, 0, 1, 50, 99, 100, 101, 5000, i64::MAX] {
            let c = clamp(n);
            assert!((0..=100).contains(&c), "clamp({n}) = {c}");
        }
        assert_eq!(clamp(-3), 0);
        assert_eq!(clamp(55), 55);
        assert_eq!(clamp(140), 100);
    }

    #[test]
    fn test_resolve_pct_clamps_literals() {
        assert_eq!(resolve_pct(&Cell::Literal(150), 10), Resolved::Value(100));
        assert_eq!(resolve_pct(&Cell::Literal(-4), 10), Resolved::Value(0));
        assert_eq!(resolve_pct(&Cell::Omit, 10), Resolved::Omit);
    }

    #[test]
    fn test_rendered_suppresses_empty_and_off() {
        assert_eq!(Resolved::Value(72).rendered(), Some("72".to_string()));
        assert_eq!(Resolved::Value(String::new()).rendered(), None);
        assert_eq!(Resolved::<String>::Omit.rendered(), None);
        assert_eq!(Resolved::<String>::Disable.rendered(), None);
    }

    #[test]
    fn test_cells_from_json() {
        let text: Vec<TextCell> =
            serde_json::from_str(r#"["", "skip", "none", " ink ", 3, null]"#).unwrap();
        assert_eq!(
            text,
            vec![
                Cell::Autofill,
                Cell::Omit,
                Cell::Disable,
                Cell::text("ink"),
                Cell::text("3"),
                Cell::Autofill,
            ]
        );

        let ints: Vec<IntCell> =
            serde_json::from_str(r#"[72, "40", "SKIP", "none", "abc", 4.5, null]"#).unwrap();
        assert_eq!(
            ints,
            vec![
                Cell::Literal(72),
                Cell::Literal(40),
                Cell::Omit,
                Cell::Disable,
                Cell::Autofill,
                Cell::Autofill,
                Cell::Autofill,
            ]
        );
    }

    #[test]
    fn test_cells_serialize_in_input_grammar() {
        let cells = vec![Cell::Autofill, Cell::Omit, Cell::Disable, Cell::Literal(9)];
        assert_eq!(
            serde_json::to_string(&cells).unwrap(),
            r#"["","skip","none",9]"#
        );
    }
}
