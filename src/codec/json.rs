//! JSON-представление дерева NBT.
//!
//! Каждое значение пишется как `{"<Вариант>": payload}`, поэтому тип
//! сохраняется и обратное преобразование восстанавливает то же дерево.
//! JSON не умеет NaN и бесконечности: они выводятся как `null` и при
//! обратном чтении дают ошибку.
//!
//! Встроенный предел `serde_json` в 128 уровней отключён: глубину
//! ограничивает `max_depth`, как и в бинарном декодере. До разбора текст
//! проверяется сканером скобок, поэтому рекурсия `serde` не уходит глубже
//! [`json_nesting_limit`].

use nbtcodec_error::{NbtError, NbtResult};
use serde::Deserialize;
use serde_json::Value;

use super::decode::{DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};
use crate::{Compound, Tag};

fn json_error(e: serde_json::Error) -> NbtError {
    NbtError::Json {
        reason: e.to_string(),
    }
}

pub fn to_json_value(root: &Compound) -> NbtResult<Value> {
    serde_json::to_value(root).map_err(json_error)
}

/// Сериализует корень в строку; `pretty` включает отступы.
pub fn to_json_string(
    root: &Compound,
    pretty: bool,
) -> NbtResult<String> {
    if pretty {
        serde_json::to_string_pretty(root).map_err(json_error)
    } else {
        serde_json::to_string(root).map_err(json_error)
    }
}

/// Читает корень из JSON с лимитом глубины по умолчанию.
pub fn from_json_str(s: &str) -> NbtResult<Compound> {
    from_json_str_with(s, DEFAULT_MAX_DEPTH)
}

/// Читает корень из JSON. Однородность списков проверяется заново,
/// контейнер глубже `max_depth` даёт `DepthExceeded`.
pub fn from_json_str_with(
    s: &str,
    max_depth: usize,
) -> NbtResult<Compound> {
    let max_depth = max_depth.min(MAX_DEPTH_LIMIT);
    let nesting = json_nesting(s);
    let limit = json_nesting_limit(max_depth);
    if nesting > limit {
        return Err(NbtError::Json {
            reason: format!(
                "nesting of {nesting} levels exceeds {limit} allowed for max_depth {max_depth}"
            ),
        });
    }

    let mut de = serde_json::Deserializer::from_str(s);
    de.disable_recursion_limit();
    let root = Compound::deserialize(&mut de).map_err(json_error)?;
    de.end().map_err(json_error)?;

    check_compound_depth(&root, 0, max_depth)?;
    Ok(root)
}

/// Наибольшая вложенность JSON для дерева глубины `max_depth`.
///
/// Compound занимает два уровня (`{"Compound": {..}}`), List три
/// (`{"List": {"elements": [..]}}`), массивы на листьях ещё два.
pub fn json_nesting_limit(max_depth: usize) -> usize {
    (max_depth + 1) * 3
}

/// Глубина скобок `{`/`[` вне строковых литералов.
fn json_nesting(s: &str) -> usize {
    let (mut depth, mut max) = (0usize, 0usize);
    let (mut in_string, mut escaped) = (false, false);
    for b in s.bytes() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                max = max.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}

// Та же нумерация, что у кодека: тело корня на глубине 0.
fn check_compound_depth(
    compound: &Compound,
    depth: usize,
    max_depth: usize,
) -> NbtResult<()> {
    compound
        .values()
        .try_for_each(|tag| check_tag_depth(tag, depth + 1, max_depth))
}

fn check_tag_depth(
    tag: &Tag,
    depth: usize,
    max_depth: usize,
) -> NbtResult<()> {
    let guard = || {
        if depth > max_depth {
            Err(NbtError::DepthExceeded {
                depth,
                max: max_depth,
            })
        } else {
            Ok(())
        }
    };
    match tag {
        Tag::Compound(c) => {
            guard()?;
            check_compound_depth(c, depth, max_depth)
        }
        Tag::List(list) => {
            guard()?;
            list.iter()
                .try_for_each(|element| check_tag_depth(element, depth + 1, max_depth))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{List, TagType};

    fn nested_compounds(levels: usize) -> Compound {
        let mut root = Compound::new();
        root.insert("leaf".into(), Tag::IntArray(vec![1, 2]));
        for _ in 0..levels {
            let mut outer = Compound::new();
            outer.insert("n".into(), Tag::Compound(root));
            root = outer;
        }
        root
    }

    #[test]
    fn test_json_shape_is_typed() {
        let mut root = Compound::new();
        root.insert("a".into(), Tag::Short(5));
        assert_eq!(to_json_string(&root, false).unwrap(), r#"{"a":{"Short":5}}"#);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut inner = Compound::new();
        inner.insert("bytes".into(), Tag::ByteArray(vec![1, 2, 255]));
        let mut root = Compound::new();
        root.insert("z".into(), Tag::Long(i64::MIN));
        root.insert(
            "list".into(),
            Tag::List(List::new(TagType::String, vec!["x".into(), "y".into()]).unwrap()),
        );
        root.insert("empty".into(), Tag::List(List::empty(TagType::End)));
        root.insert("inner".into(), Tag::Compound(inner));

        for pretty in [false, true] {
            let s = to_json_string(&root, pretty).unwrap();
            assert_eq!(from_json_str(&s).unwrap(), root);
        }
    }

    #[test]
    fn test_json_rejects_mixed_list() {
        let s = r#"{"l":{"List":{"element_type":3,"elements":[{"Int":1},{"Byte":2}]}}}"#;
        let err = from_json_str(s).unwrap_err();
        assert!(matches!(err, NbtError::Json { .. }));
    }

    #[test]
    fn test_json_rejects_unknown_element_type() {
        let s = r#"{"l":{"List":{"element_type":42,"elements":[]}}}"#;
        assert!(from_json_str(s).is_err());
    }

    #[test]
    fn test_nan_does_not_survive() {
        let mut root = Compound::new();
        root.insert("f".into(), Tag::Float(f32::NAN));
        let s = to_json_string(&root, false).unwrap();
        assert_eq!(s, r#"{"f":{"Float":null}}"#);
        assert!(from_json_str(&s).is_err());
    }

    #[test]
    fn test_to_json_value() {
        let mut root = Compound::new();
        root.insert("i".into(), Tag::Int(3));
        let value = to_json_value(&root).unwrap();
        assert_eq!(value["i"]["Int"], 3);
    }

    /// Сто вложенных Compound: глубже встроенного предела `serde_json`.
    #[test]
    fn test_json_roundtrip_deep_nesting() {
        let root = nested_compounds(100);
        for pretty in [false, true] {
            let s = to_json_string(&root, pretty).unwrap();
            assert_eq!(from_json_str(&s).unwrap(), root);
        }
    }

    #[test]
    fn test_json_depth_limit() {
        let s = to_json_string(&nested_compounds(5), false).unwrap();
        assert_eq!(
            from_json_str_with(&s, 4).unwrap_err(),
            NbtError::DepthExceeded { depth: 5, max: 4 }
        );
        assert!(from_json_str_with(&s, 5).is_ok());
    }

    /// Вложенность скобок проверяется до разбора.
    #[test]
    fn test_json_nesting_rejected_before_parse() {
        let s = format!("{}{}", "[".repeat(100_000), "]".repeat(100_000));
        let err = from_json_str(&s).unwrap_err();
        assert!(matches!(err, NbtError::Json { .. }));
        assert!(err.to_string().contains("nesting of 100000 levels"));
    }

    #[test]
    fn test_json_nesting_ignores_strings() {
        assert_eq!(json_nesting(r#"{"a": "{[\"{"}"#), 1);
        assert_eq!(json_nesting(r#"{"a": [{"b": []}]}"#), 4);
    }

    #[test]
    fn test_json_trailing_garbage_rejected() {
        assert!(from_json_str(r#"{"a":{"Byte":1}} x"#).is_err());
    }
}
